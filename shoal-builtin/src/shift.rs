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

//! The `shift` built-in

use crate::common::{builtin_error, builtin_failure, parse_integer};
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let count = match args.first() {
        None => 1,
        Some(arg) => match parse_integer(&arg.value) {
            Some(n) if n >= 0 => n as usize,
            _ => {
                return builtin_error(
                    env,
                    "shift",
                    format_args!("`{}` is not a valid shift count", arg.value),
                )
            }
        },
    };
    let params = env.variables.positional_params_mut();
    if count > params.len() {
        let length = params.len();
        return builtin_failure(
            env,
            "shift",
            format_args!("cannot shift {count} parameters, only {length} present"),
        );
    }
    params.drain(..count);
    Result::new(ExitStatus::SUCCESS)
}
