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

//! The `unset` built-in

use crate::common::builtin_failure;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut functions = false;
    let mut names = Vec::new();
    for arg in &args {
        match arg.value.as_str() {
            "-f" => functions = true,
            "-v" => functions = false,
            "--" => {}
            name => names.push(name.to_string()),
        }
    }

    for name in names {
        let result = if functions {
            env.functions.remove(&name).map(drop).map_err(|e| e.to_string())
        } else {
            env.variables.unset(&name).map(drop).map_err(|e| e.to_string())
        };
        if let Err(message) = result {
            return builtin_failure(env, "unset", format_args!("{message}"));
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
