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

//! The `break` built-in

use crate::common::{builtin_error, builtin_failure, parse_integer};
use shoal_env::builtin::Result;
use shoal_env::semantics::{Divert, ExitStatus, Field};
use shoal_env::Env;

/// Parses the operand of `break` and `continue`: a positive loop count.
pub(crate) fn loop_count(env: &mut Env, name: &str, args: &[Field]) -> std::result::Result<usize, Result> {
    let count = match args.first() {
        None => 1,
        Some(arg) => match parse_integer(&arg.value) {
            Some(n) if n >= 1 => n as usize,
            _ => {
                return Err(builtin_error(
                    env,
                    name,
                    format_args!("`{}` is not a positive loop count", arg.value),
                ))
            }
        },
    };
    let depth = env.stack.loop_depth();
    if depth == 0 {
        return Err(builtin_failure(
            env,
            name,
            format_args!("only meaningful in a loop"),
        ));
    }
    // Unwinding more loops than exist stops at the outermost one.
    Ok(count.min(depth))
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match loop_count(env, "break", &args) {
        Ok(count) => Result::with_divert(
            ExitStatus::SUCCESS,
            Divert::Break { count: count - 1 },
        ),
        Err(result) => result,
    }
}
