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

//! The `local` built-in

use crate::common::{builtin_error, builtin_failure, is_valid_name, split_assignment};
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::variable::{Scope, Value, Variable};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if !env.variables.in_function() {
        return builtin_failure(
            env,
            "local",
            format_args!("can only be used in a function"),
        );
    }

    for arg in &args {
        let (name, value) = match split_assignment(&arg.value) {
            Some((name, value)) => (name, Some(value)),
            None if is_valid_name(&arg.value) => (arg.value.as_str(), None),
            None => {
                return builtin_error(
                    env,
                    "local",
                    format_args!("`{}` is not a valid variable name", arg.value),
                )
            }
        };
        let variable = Variable {
            value: value.map(Value::scalar),
            ..Variable::default()
        };
        if let Err(error) = env.variables.assign(Scope::Local, name.to_string(), variable) {
            return builtin_failure(env, "local", format_args!("{error}"));
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
