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

//! Part of the lexer that parses parameter expansions not enclosed in braces

use super::core::Lexer;
use crate::parser::core::Result;
use crate::syntax::{Param, ParamType, SpecialParam, TextUnit};

/// Tests whether the character can start a variable name.
#[must_use]
pub fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Tests whether the character can continue a variable name.
#[must_use]
pub fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Classifies a parameter name.
///
/// The name must be a non-empty valid parameter spelling.
#[must_use]
pub fn classify_param(id: &str) -> ParamType {
    if id == "0" {
        return ParamType::Special(SpecialParam::Zero);
    }
    if id.chars().all(|c| c.is_ascii_digit()) {
        return ParamType::Positional(id.parse().unwrap_or(usize::MAX));
    }
    let mut chars = id.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(special) = SpecialParam::from_char(c) {
            return ParamType::Special(special);
        }
    }
    ParamType::Variable
}

impl Lexer {
    /// Parses a parameter expansion of the form `$name`, `$1`, `$@`, etc.
    ///
    /// The `$` must already be consumed; `begin` is its index. Returns
    /// `Ok(None)` when the character at the current position cannot be a
    /// parameter, leaving the position unchanged.
    pub fn raw_param(&mut self, begin: usize) -> Result<Option<TextUnit>> {
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let id = if is_name_start(c) {
            let mut id = String::new();
            while let Some(sc) = self.consume_char_if(is_name_char) {
                id.push(sc.value);
            }
            id
        } else if c.is_ascii_digit() {
            // Only a single digit: `$10` is `$1` followed by `0`.
            self.consume_char();
            c.to_string()
        } else if SpecialParam::from_char(c).is_some() {
            self.consume_char();
            c.to_string()
        } else {
            return Ok(None);
        };

        let r#type = classify_param(&id);
        let location = self.location_range(begin..self.index());
        Ok(Some(TextUnit::RawParam {
            param: Param { id, r#type },
            location,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    fn param(code: &str) -> Option<Param> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.consume_char_if(|c| c == '$').unwrap();
        match lexer.raw_param(0).unwrap() {
            Some(TextUnit::RawParam { param, .. }) => Some(param),
            _ => None,
        }
    }

    #[test]
    fn variable_names() {
        let p = param("$foo_2").unwrap();
        assert_eq!(p.id, "foo_2");
        assert_eq!(p.r#type, ParamType::Variable);
    }

    #[test]
    fn positional_parameters_are_single_digit() {
        let p = param("$12").unwrap();
        assert_eq!(p.id, "1");
        assert_eq!(p.r#type, ParamType::Positional(1));
    }

    #[test]
    fn special_parameters() {
        assert_eq!(
            param("$@").unwrap().r#type,
            ParamType::Special(SpecialParam::At)
        );
        assert_eq!(
            param("$?").unwrap().r#type,
            ParamType::Special(SpecialParam::Question)
        );
        assert_eq!(
            param("$0").unwrap().r#type,
            ParamType::Special(SpecialParam::Zero)
        );
        assert_eq!(
            param("$#").unwrap().r#type,
            ParamType::Special(SpecialParam::Number)
        );
    }

    #[test]
    fn not_a_parameter() {
        assert_eq!(param("$%"), None);
        assert_eq!(param("$"), None);
    }
}
