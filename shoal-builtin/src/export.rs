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

//! The `export` built-in

use crate::common::{builtin_error, builtin_failure, is_valid_name, output, split_assignment};
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::variable::{Scope, Value, Variable};
use shoal_env::Env;
use shoal_quote::quoted;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let args: Vec<&Field> = args.iter().filter(|f| f.value != "--").collect();

    // Without operands (or with -p), print the exported variables.
    if args.is_empty() || args[0].value == "-p" {
        let mut lines: Vec<String> = env
            .variables
            .iter()
            .filter(|(_, variable)| variable.is_exported)
            .map(|(name, variable)| match &variable.value {
                Some(Value::Scalar(value)) => {
                    format!("export {name}={}\n", quoted(value))
                }
                _ => format!("export {name}\n"),
            })
            .collect();
        lines.sort();
        return output(env, &lines.iter().format("").to_string());
    }

    for arg in args {
        let (name, value) = match split_assignment(&arg.value) {
            Some((name, value)) => (name, Some(value)),
            None if is_valid_name(&arg.value) => (arg.value.as_str(), None),
            None => {
                return builtin_error(
                    env,
                    "export",
                    format_args!("`{}` is not a valid variable name", arg.value),
                )
            }
        };
        if let Some(value) = value {
            let variable = Variable {
                value: Some(Value::scalar(value)),
                is_exported: true,
                ..Variable::default()
            };
            if let Err(error) = env.variables.assign(Scope::Global, name.to_string(), variable)
            {
                return builtin_failure(env, "export", format_args!("{error}"));
            }
        } else {
            env.variables.get_or_new(Scope::Global, name).is_exported = true;
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
