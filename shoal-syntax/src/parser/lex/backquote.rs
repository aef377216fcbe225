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

//! Part of the lexer that parses backquoted command substitutions

use super::core::Lexer;
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::{BackquoteUnit, TextUnit};

impl Lexer {
    /// Parses a backquoted command substitution at the current position.
    ///
    /// Inside backquotes, a backslash escapes `$`, `` ` ``, `\`, and, when
    /// the backquote itself appears inside double quotes, also `"`.
    pub fn backquote(&mut self, double_quoted: bool) -> Result<TextUnit> {
        let begin = self.index();
        debug_assert_eq!(self.peek_char(), Some('`'));
        self.consume_char();

        let mut content = Vec::new();
        loop {
            match self.peek_char() {
                None => {
                    let opening_location = self.location_range(begin..begin + 1);
                    return Err(Error {
                        cause: SyntaxError::UnclosedBackquote { opening_location }.into(),
                        location: self.location(),
                    });
                }
                Some('`') => {
                    self.consume_char();
                    break;
                }
                Some('\\') => {
                    self.consume_char();
                    match self.peek_char_raw() {
                        Some(c @ ('$' | '`' | '\\')) => {
                            self.consume_char();
                            content.push(BackquoteUnit::Backslashed(c));
                        }
                        Some('"') if double_quoted => {
                            self.consume_char();
                            content.push(BackquoteUnit::Backslashed('"'));
                        }
                        _ => content.push(BackquoteUnit::Literal('\\')),
                    }
                }
                Some(c) => {
                    self.consume_char();
                    content.push(BackquoteUnit::Literal(c));
                }
            }
        }

        let location = self.location_range(begin..self.index());
        Ok(TextUnit::Backquote { content, location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn lex(code: &str, double_quoted: bool) -> Result<TextUnit> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.backquote(double_quoted)
    }

    #[test]
    fn simple_backquote() {
        let unit = lex("`echo hi`", false).unwrap();
        assert_matches!(unit, TextUnit::Backquote { content, .. } => {
            let s: String = content
                .iter()
                .map(|u| match u {
                    BackquoteUnit::Literal(c) => *c,
                    BackquoteUnit::Backslashed(c) => *c,
                })
                .collect();
            assert_eq!(s, "echo hi");
        });
    }

    #[test]
    fn escapes_in_backquote() {
        let unit = lex(r"`\$x \a`", false).unwrap();
        assert_matches!(unit, TextUnit::Backquote { content, .. } => {
            assert_eq!(
                content,
                [
                    BackquoteUnit::Backslashed('$'),
                    BackquoteUnit::Literal('x'),
                    BackquoteUnit::Literal(' '),
                    BackquoteUnit::Literal('\\'),
                    BackquoteUnit::Literal('a'),
                ]
            );
        });
    }

    #[test]
    fn double_quote_escape_only_in_double_quotes() {
        let unit = lex(r#"`\"`"#, true).unwrap();
        assert_matches!(unit, TextUnit::Backquote { content, .. } => {
            assert_eq!(content, [BackquoteUnit::Backslashed('"')]);
        });
        let unit = lex(r#"`\"`"#, false).unwrap();
        assert_matches!(unit, TextUnit::Backquote { content, .. } => {
            assert_eq!(
                content,
                [BackquoteUnit::Literal('\\'), BackquoteUnit::Literal('"')]
            );
        });
    }

    #[test]
    fn unclosed_backquote() {
        let error = lex("`echo", false).unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedBackquote { .. })
        );
        assert!(error.needs_more_input());
    }
}
