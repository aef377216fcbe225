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

//! The `trap` built-in

use crate::common::{builtin_error, builtin_failure, output};
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::signal;
use shoal_env::trap::{Action, Condition};
use shoal_env::Env;
use shoal_quote::quoted;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.is_empty() || args[0].value == "-p" {
        let listing = env
            .traps
            .iter()
            .into_iter()
            .map(|(condition, state)| {
                let action = match &state.action {
                    Action::Default => "-".to_string(),
                    Action::Ignore => String::new(),
                    Action::Command(command) => command.to_string(),
                };
                format!("trap -- {} {condition}\n", quoted(&action))
            })
            .format("")
            .to_string();
        return output(env, &listing);
    }

    if args[0].value == "-l" {
        let listing = signal::iterator()
            .map(|sig| format!("{}) {}\n", sig as i32, signal::short_name(sig)))
            .format("")
            .to_string();
        return output(env, &listing);
    }

    let mut operands = &args[..];
    if operands[0].value == "--" {
        operands = &operands[1..];
    }
    if operands.len() < 2 {
        return builtin_error(env, "trap", format_args!("missing operands"));
    }

    // The first operand is the action unless it parses as a condition and
    // is the only operand style POSIX allows for resetting.
    let action_word = &operands[0];
    let action = match action_word.value.as_str() {
        "-" => Action::Default,
        "" => Action::Ignore,
        command => Action::Command(command.into()),
    };

    for condition in &operands[1..] {
        let condition: Condition = match condition.value.parse() {
            Ok(condition) => condition,
            Err(error) => {
                return builtin_error(env, "trap", format_args!("{error}"));
            }
        };
        let result = env.traps.set_action(
            &mut *env.system,
            condition,
            action.clone(),
            action_word.origin.clone(),
        );
        if let Err(error) = result {
            return builtin_failure(env, "trap", format_args!("{error}"));
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
