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

//! The `set` built-in

use crate::common::{builtin_error, output};
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::option::{self, State};
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    // Without arguments, print all variables as reusable assignments.
    if args.is_empty() {
        let mut lines: Vec<String> = env
            .variables
            .iter()
            .filter_map(|(name, variable)| {
                let value = variable.value.as_ref()?;
                Some(format!("{name}={}\n", value.quote()))
            })
            .collect();
        lines.sort();
        return output(env, &lines.iter().format("").to_string());
    }

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.peek() {
        let value = arg.value.clone();
        let value = value.as_str();
        let (enable, rest) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => match value.strip_prefix('+') {
                Some(rest) => (false, rest),
                None => break,
            },
        };
        if value == "--" {
            iter.next();
            break;
        }
        iter.next();

        if rest == "o" {
            // `-o NAME` or a listing without a name.
            match iter.next() {
                None => {
                    let listing = env
                        .options
                        .iter()
                        .map(|(option, state)| format!("{option:15} {state}\n"))
                        .format("")
                        .to_string();
                    return output(env, &listing);
                }
                Some(name) => match option::parse_long(&name.value) {
                    Ok((option, state)) if option.is_modifiable() => {
                        let state = if enable { state } else { !state };
                        env.options.set(option, state);
                    }
                    _ => {
                        return builtin_error(
                            env,
                            "set",
                            format_args!("`{}` is not a valid option name", name.value),
                        )
                    }
                },
            }
            continue;
        }

        for c in rest.chars() {
            match option::parse_short(c) {
                Some((option, state)) if option.is_modifiable() => {
                    let state = if enable { state } else { !state };
                    env.options.set(option, state);
                }
                _ => {
                    return builtin_error(
                        env,
                        "set",
                        format_args!("`-{c}` is not a valid option"),
                    )
                }
            }
        }
    }

    // Remaining operands replace the positional parameters.
    let rest: Vec<String> = iter.map(|f| f.value.clone()).collect();
    if !rest.is_empty() || args.iter().any(|a| a.value == "--") {
        *env.variables.positional_params_mut() = rest;
    }
    Result::new(ExitStatus::SUCCESS)
}
