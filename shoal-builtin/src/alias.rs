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

//! The `alias` built-in

use crate::common::{builtin_failure, output};
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;
use shoal_quote::quoted;
use shoal_syntax::alias::Alias;
use std::rc::Rc;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.is_empty() {
        let mut lines: Vec<String> = env
            .aliases
            .iter()
            .map(|alias| format!("alias {}={}\n", alias.name, quoted(&alias.replacement)))
            .collect();
        lines.sort();
        return output(env, &lines.iter().format("").to_string());
    }

    let mut status = ExitStatus::SUCCESS;
    let mut printed = String::new();
    for arg in &args {
        match arg.value.split_once('=') {
            Some((name, replacement)) if !name.is_empty() => {
                Rc::make_mut(&mut env.aliases).insert(Alias {
                    name: name.to_string(),
                    replacement: replacement.to_string(),
                    global: false,
                    origin: arg.origin.clone(),
                });
            }
            _ => match env.aliases.get(&arg.value) {
                Some(alias) => {
                    printed.push_str(&format!(
                        "alias {}={}\n",
                        alias.name,
                        quoted(&alias.replacement)
                    ));
                }
                None => {
                    let result =
                        builtin_failure(env, "alias", format_args!("{}: not found", arg.value));
                    status = result.exit_status;
                }
            },
        }
    }
    if !printed.is_empty() {
        let result = output(env, &printed);
        if !result.exit_status.is_successful() {
            return result;
        }
    }
    Result::new(status)
}
