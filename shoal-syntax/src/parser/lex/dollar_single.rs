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

//! Part of the lexer that parses dollar-single-quoted strings (`$'...'`)

use super::core::Lexer;
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::{EscapeUnit, EscapedString};

impl Lexer {
    /// Parses a dollar-single-quoted string.
    ///
    /// The current position must be on the `$` immediately followed by `'`.
    pub fn dollar_single_quote(&mut self) -> Result<EscapedString> {
        let begin = self.index();
        debug_assert_eq!(self.peek_char(), Some('$'));
        self.consume_char();
        debug_assert_eq!(self.peek_char_raw(), Some('\''));
        self.consume_char();

        self.with_line_continuation_disabled(|lexer| {
            let mut units = Vec::new();
            loop {
                match lexer.peek_char_raw() {
                    None => {
                        let opening_location = lexer.location_range(begin..begin + 2);
                        return Err(Error {
                            cause: SyntaxError::UnclosedDollarSingleQuote { opening_location }
                                .into(),
                            location: lexer.location(),
                        });
                    }
                    Some('\'') => {
                        lexer.consume_char();
                        return Ok(EscapedString(units));
                    }
                    Some('\\') => {
                        lexer.consume_char();
                        units.push(lexer.escape_unit()?);
                    }
                    Some(c) => {
                        lexer.consume_char();
                        units.push(EscapeUnit::Literal(c));
                    }
                }
            }
        })
    }

    /// Parses one escape sequence after the backslash has been consumed.
    fn escape_unit(&mut self) -> Result<EscapeUnit> {
        use EscapeUnit::*;
        let location = self.location();
        let Some(c) = self.peek_char_raw() else {
            return Err(Error {
                cause: SyntaxError::IncompleteEscape.into(),
                location,
            });
        };
        self.consume_char();
        match c {
            '"' => Ok(DoubleQuote),
            '\'' => Ok(SingleQuote),
            '\\' => Ok(Backslash),
            '?' => Ok(Question),
            'a' => Ok(Alert),
            'b' => Ok(Backspace),
            'e' | 'E' => Ok(Escape),
            'f' => Ok(FormFeed),
            'n' => Ok(Newline),
            'r' => Ok(CarriageReturn),
            't' => Ok(Tab),
            'v' => Ok(VerticalTab),
            'c' => {
                let Some(c) = self.peek_char_raw() else {
                    return Err(Error {
                        cause: SyntaxError::IncompleteEscape.into(),
                        location: self.location(),
                    });
                };
                if !c.is_ascii() {
                    return Err(Error {
                        cause: SyntaxError::InvalidEscape.into(),
                        location: self.location(),
                    });
                }
                self.consume_char();
                Ok(Control((c.to_ascii_uppercase() as u8) ^ 0x40))
            }
            'x' => {
                let digits = self.hex_digits(2);
                if digits.is_empty() {
                    return Err(Error {
                        cause: SyntaxError::InvalidEscape.into(),
                        location: self.location(),
                    });
                }
                Ok(Hex(u8::from_str_radix(&digits, 16).unwrap()))
            }
            'u' => self.unicode_escape(4, location),
            'U' => self.unicode_escape(8, location),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap();
                let mut count = 1;
                while count < 3 {
                    match self.peek_char_raw().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            self.consume_char();
                            value = value * 8 + digit;
                            count += 1;
                        }
                        None => break,
                    }
                }
                u8::try_from(value).map(Octal).map_err(|_| Error {
                    cause: SyntaxError::OctalEscapeOutOfRange.into(),
                    location,
                })
            }
            _ => Err(Error {
                cause: SyntaxError::InvalidEscape.into(),
                location,
            }),
        }
    }

    fn hex_digits(&mut self, max: usize) -> String {
        let mut digits = String::new();
        while digits.len() < max {
            match self.peek_char_raw() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.consume_char();
                    digits.push(c);
                }
                _ => break,
            }
        }
        digits
    }

    fn unicode_escape(
        &mut self,
        max: usize,
        location: crate::source::Location,
    ) -> Result<EscapeUnit> {
        let digits = self.hex_digits(max);
        if digits.is_empty() {
            return Err(Error {
                cause: SyntaxError::IncompleteEscape.into(),
                location,
            });
        }
        let value = u32::from_str_radix(&digits, 16).map_err(|_| Error {
            cause: SyntaxError::UnicodeEscapeOutOfRange.into(),
            location: location.clone(),
        })?;
        match char::from_u32(value) {
            Some(c) => Ok(EscapeUnit::Unicode(c)),
            None => Err(Error {
                cause: SyntaxError::UnicodeEscapeOutOfRange.into(),
                location,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn lex(code: &str) -> Result<EscapedString> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.dollar_single_quote()
    }

    #[test]
    fn literal_content() {
        let s = lex("$'ab'").unwrap();
        assert_eq!(s.to_string_content(), "ab");
    }

    #[test]
    fn common_escapes() {
        let s = lex(r"$'a\nb\t\\\''").unwrap();
        assert_eq!(s.to_string_content(), "a\nb\t\\'");
    }

    #[test]
    fn numeric_escapes() {
        let s = lex(r"$'\101\x42C'").unwrap();
        assert_eq!(s.to_string_content(), "ABC");
    }

    #[test]
    fn control_escape() {
        let s = lex(r"$'\cA'").unwrap();
        assert_eq!(s.0, [EscapeUnit::Control(1)]);
    }

    #[test]
    fn octal_out_of_range() {
        let error = lex(r"$'\777'").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::OctalEscapeOutOfRange)
        );
    }

    #[test]
    fn backslash_newline_is_not_a_continuation_here() {
        let error = lex("$'a\\\nb'").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::InvalidEscape)
        );
    }

    #[test]
    fn unclosed_string() {
        let error = lex("$'abc").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedDollarSingleQuote { .. })
        );
        assert!(error.needs_more_input());
    }

    #[test]
    fn invalid_escape() {
        let error = lex(r"$'\q'").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::InvalidEscape)
        );
    }
}
