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

//! Part of the lexer that parses [`Text`]s
//!
//! A text is lexed in contexts where quotes are not recognized: inside
//! double quotes, in here-document bodies, and in arithmetic expressions.
//! The caller controls which characters delimit the text and which may be
//! backslash-escaped.

use super::core::Lexer;
use crate::parser::core::Result;
use crate::syntax::Text;
use crate::syntax::TextUnit::{self, Backslashed, Literal};

impl Lexer {
    /// Parses one text unit at the current position.
    ///
    /// `is_delimiter` decides which characters end the text without being
    /// consumed. `is_escapable` decides which characters a backslash
    /// protects; a backslash before any other character is left intact as a
    /// literal backslash.
    pub fn text_unit(
        &mut self,
        is_delimiter: &dyn Fn(char) -> bool,
        is_escapable: &dyn Fn(char) -> bool,
    ) -> Result<Option<TextUnit>> {
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };
        match c {
            '\\' => {
                self.consume_char();
                match self.peek_char_raw() {
                    Some(c2) if is_escapable(c2) => {
                        self.consume_char();
                        Ok(Some(Backslashed(c2)))
                    }
                    _ => Ok(Some(Literal('\\'))),
                }
            }
            '$' => match self.dollar_unit()? {
                Some(unit) => Ok(Some(unit)),
                None => {
                    self.consume_char();
                    Ok(Some(Literal('$')))
                }
            },
            '`' => {
                // Inside double quotes, `"` is escapable but a plain blank
                // is not; that distinguishes the context for the backquote
                // escape rules.
                let double_quoted = is_escapable('"') && !is_escapable(' ');
                self.backquote(double_quoted).map(Some)
            }
            c if is_delimiter(c) => Ok(None),
            c => {
                self.consume_char();
                Ok(Some(Literal(c)))
            }
        }
    }

    /// Parses a text, a possibly empty sequence of text units.
    pub fn text(
        &mut self,
        is_delimiter: &dyn Fn(char) -> bool,
        is_escapable: &dyn Fn(char) -> bool,
    ) -> Result<Text> {
        let mut units = Vec::new();
        while let Some(unit) = self.text_unit(is_delimiter, is_escapable)? {
            units.push(unit);
        }
        Ok(Text(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use crate::syntax::TextUnit::*;

    fn lex_text(code: &str, delimiter: char) -> Text {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer
            .text(&|c| c == delimiter, &|c| {
                matches!(c, '$' | '`' | '"' | '\\')
            })
            .unwrap()
    }

    #[test]
    fn literal_text() {
        let text = lex_text("abc", '"');
        assert_eq!(text.0, [Literal('a'), Literal('b'), Literal('c')]);
    }

    #[test]
    fn delimiter_is_not_consumed() {
        let mut lexer = Lexer::from_memory("ab\"rest", Source::Unknown);
        let text = lexer
            .text(&|c| c == '"', &|c| matches!(c, '$' | '`' | '"' | '\\'))
            .unwrap();
        assert_eq!(text.0, [Literal('a'), Literal('b')]);
        assert_eq!(lexer.peek_char(), Some('"'));
    }

    #[test]
    fn escapable_characters() {
        let text = lex_text(r#"a\$b\"c"#, '"');
        assert_eq!(
            text.0,
            [
                Literal('a'),
                Backslashed('$'),
                Literal('b'),
                Backslashed('"'),
                Literal('c'),
            ]
        );
    }

    #[test]
    fn non_escapable_backslash_stays() {
        let text = lex_text(r"a\bc", '"');
        assert_eq!(
            text.0,
            [Literal('a'), Literal('\\'), Literal('b'), Literal('c')]
        );
    }

    #[test]
    fn lone_dollar_is_literal() {
        let text = lex_text("a$", '"');
        assert_eq!(text.0, [Literal('a'), Literal('$')]);
    }

    #[test]
    fn raw_parameter_in_text() {
        let text = lex_text("$x!", '"');
        assert_eq!(text.0.len(), 2);
        assert!(matches!(&text.0[0], RawParam { param, .. } if param.id == "x"));
        assert_eq!(text.0[1], Literal('!'));
    }
}
