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

//! Helpers shared by the built-in implementations

use shoal_env::builtin::Result;
use shoal_env::semantics::ExitStatus;
use shoal_env::Env;
use shoal_env::system::System;
use shoal_syntax::syntax::Fd;

/// Writes text to the standard output, reporting failures on stderr.
pub fn output(env: &mut Env, text: &str) -> Result {
    match env.system.write_all(Fd::STDOUT, text.as_bytes()) {
        Ok(_) => Result::new(ExitStatus::SUCCESS),
        Err(errno) => {
            env.print_simple_error(format_args!("write error: {errno}"));
            Result::new(ExitStatus::FAILURE)
        }
    }
}

/// Reports a usage or operand error from a built-in.
pub fn builtin_error(env: &mut Env, name: &str, message: std::fmt::Arguments<'_>) -> Result {
    env.print_simple_error(format_args!("{name}: {message}"));
    Result::new(ExitStatus::ERROR)
}

/// Reports a runtime failure from a built-in.
pub fn builtin_failure(env: &mut Env, name: &str, message: std::fmt::Arguments<'_>) -> Result {
    env.print_simple_error(format_args!("{name}: {message}"));
    Result::new(ExitStatus::FAILURE)
}

/// Parses a signed decimal operand.
pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Whether a string is a valid variable name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Splits `NAME=VALUE`, if the argument has that form with a valid name.
pub fn split_assignment(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    is_valid_name(name).then_some((name, value))
}
