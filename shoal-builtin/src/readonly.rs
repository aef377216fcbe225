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

//! The `readonly` built-in

use crate::common::{builtin_error, builtin_failure, is_valid_name, output, split_assignment};
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::variable::{Scope, Value, Variable};
use shoal_env::Env;
use shoal_syntax::source::Location;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let args: Vec<&Field> = args.iter().filter(|f| f.value != "--").collect();

    if args.is_empty() || args[0].value == "-p" {
        let mut lines: Vec<String> = env
            .variables
            .iter()
            .filter(|(_, variable)| variable.is_read_only())
            .map(|(name, variable)| match &variable.value {
                Some(value) => format!("readonly {name}={}\n", value.quote()),
                None => format!("readonly {name}\n"),
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
                    "readonly",
                    format_args!("`{}` is not a valid variable name", arg.value),
                )
            }
        };
        if let Some(value) = value {
            let variable = Variable {
                value: Some(Value::scalar(value)),
                read_only_location: Some(arg.origin.clone()),
                ..Variable::default()
            };
            if let Err(error) = env.variables.assign(Scope::Global, name.to_string(), variable)
            {
                return builtin_failure(env, "readonly", format_args!("{error}"));
            }
        } else {
            let variable = env.variables.get_or_new(Scope::Global, name);
            if variable.read_only_location.is_none() {
                variable.read_only_location = Some(Location::dummy(name));
            }
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
