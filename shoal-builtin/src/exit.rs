// This file is part of shoal, an interactive POSIX-style shell.
// Copyright (C) 2026 the shoal developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The `exit` built-in

use crate::common::{builtin_error, parse_integer};
use shoal_env::builtin::Result;
use shoal_env::semantics::{Divert, ExitStatus, Field};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let status = match args.first() {
        None => env.exit_status,
        Some(arg) => match parse_integer(&arg.value) {
            Some(n) => ExitStatus(n as i32),
            None => {
                return builtin_error(
                    env,
                    "exit",
                    format_args!("`{}` is not a valid exit status", arg.value),
                )
            }
        },
    };
    Result::with_divert(status, Divert::Exit(Some(status)))
}
