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

//! The `echo` built-in

use crate::common::output;
use shoal_env::builtin::Result;
use shoal_env::semantics::Field;
use shoal_env::Env;

/// Interprets the backslash escapes enabled by `-e`.
fn expand_escapes(s: &str) -> (String, bool) {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => result.push('\u{7}'),
            Some('b') => result.push('\u{8}'),
            Some('c') => return (result, true),
            Some('e') => result.push('\u{1B}'),
            Some('f') => result.push('\u{C}'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('v') => result.push('\u{B}'),
            Some('\\') => result.push('\\'),
            Some('0') => {
                let mut value = 0u32;
                for _ in 0..3 {
                    let mut peek = chars.clone();
                    match peek.next().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars = peek;
                        }
                        None => break,
                    }
                }
                if let Some(c) = char::from_u32(value) {
                    result.push(c);
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    (result, false)
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut newline = true;
    let mut escapes = false;
    let mut operands = &args[..];

    // Option parsing stops at the first non-option word.
    while let Some(first) = operands.first() {
        match first.value.as_str() {
            "-n" => newline = false,
            "-e" => escapes = true,
            "-E" => escapes = false,
            _ => break,
        }
        operands = &operands[1..];
    }

    let mut text = String::new();
    let mut suppressed = false;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        if escapes {
            let (expanded, stop) = expand_escapes(&operand.value);
            text.push_str(&expanded);
            if stop {
                suppressed = true;
                break;
            }
        } else {
            text.push_str(&operand.value);
        }
    }
    if newline && !suppressed {
        text.push('\n');
    }
    output(env, &text)
}
