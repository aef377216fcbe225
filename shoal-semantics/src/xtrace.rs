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

//! Execution tracing (`set -x`)
//!
//! Each simple command is printed to the standard error after expansion
//! and before execution, prefixed by `$PS4`, with words quoted so the
//! line can be fed back to the shell.

use itertools::Itertools;
use shoal_env::option::{Option as ShellOption, State};
use shoal_env::semantics::Field;
use shoal_env::Env;
use shoal_env::system::System;
use shoal_quote::quoted;
use shoal_syntax::syntax::Assign;

/// Prints a trace line for a simple command, if `xtrace` is on.
pub fn trace_command(env: &mut Env, assigns: &[Assign], fields: &[Field]) {
    if env.options.get(ShellOption::Xtrace) != State::On {
        return;
    }
    if assigns.is_empty() && fields.is_empty() {
        return;
    }

    let ps4 = env.variables.get_scalar("PS4").unwrap_or("+ ").to_string();
    let words = assigns
        .iter()
        .map(ToString::to_string)
        .chain(fields.iter().map(|field| quoted(&field.value).into_owned()))
        .format(" ");
    let line = format!("{ps4}{words}\n");
    env.system.print_error(&line);
}
