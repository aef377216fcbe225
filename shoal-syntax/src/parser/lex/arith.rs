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

//! Part of the lexer that parses arithmetic expansions

use super::core::Lexer;
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::{Text, TextUnit};

impl Lexer {
    /// Reads arithmetic content up to an unbalanced `)`.
    ///
    /// The text may contain balanced parentheses of its own. Expansions are
    /// recognized; a backslash escapes `$`, `` ` ``, and `\`. On success the
    /// position is on the terminating `)`, which is not consumed. Returns
    /// `None` if the input ends first.
    pub(in crate::parser) fn arith_text(
        &mut self,
        extra_delimiter: &dyn Fn(char) -> bool,
    ) -> Result<Option<Text>> {
        fn is_escapable(c: char) -> bool {
            matches!(c, '$' | '`' | '\\')
        }

        let mut units = Vec::new();
        let mut depth = 0usize;
        loop {
            let inner = self.text(
                &|c| c == '(' || c == ')' || (depth == 0 && extra_delimiter(c)),
                &is_escapable,
            )?;
            units.extend(inner.0);
            match self.peek_char() {
                Some('(') => {
                    self.consume_char();
                    units.push(TextUnit::Literal('('));
                    depth += 1;
                }
                Some(')') if depth > 0 => {
                    self.consume_char();
                    units.push(TextUnit::Literal(')'));
                    depth -= 1;
                }
                Some(_) => return Ok(Some(Text(units))),
                None => return Ok(None),
            }
        }
    }

    /// Parses an arithmetic expansion after the `$` has been consumed.
    ///
    /// The current position must be on the first `(`; `begin` is the index
    /// of the `$`. Arithmetic is tried first: if the content turns out not
    /// to end in a double `))`, the position is rewound and `Ok(None)` is
    /// returned so the caller can parse a command substitution instead.
    pub fn arithmetic_expansion(&mut self, begin: usize) -> Result<Option<TextUnit>> {
        let save = self.index();
        debug_assert_eq!(self.peek_char(), Some('('));
        self.consume_char();
        if self.peek_char() != Some('(') {
            self.rewind(save);
            return Ok(None);
        }
        self.consume_char();

        let content = match self.arith_text(&|_| false)? {
            Some(content) => content,
            None => {
                let opening_location = self.location_range(begin..begin + 3);
                return Err(Error {
                    cause: SyntaxError::UnclosedArith { opening_location }.into(),
                    location: self.location(),
                });
            }
        };

        // On the first unbalanced `)` now; arithmetic requires another.
        debug_assert_eq!(self.peek_char(), Some(')'));
        self.consume_char();
        if self.peek_char() != Some(')') {
            self.rewind(save);
            return Ok(None);
        }
        self.consume_char();

        let location = self.location_range(begin..self.index());
        Ok(Some(TextUnit::Arith { content, location }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn lex(code: &str) -> Result<Option<TextUnit>> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.consume_char_if(|c| c == '$').unwrap();
        lexer.arithmetic_expansion(0)
    }

    #[test]
    fn simple_expansion() {
        let unit = lex("$((1+2))").unwrap().unwrap();
        assert_matches!(unit, TextUnit::Arith { content, .. } => {
            assert_eq!(content.to_string(), "1+2");
        });
    }

    #[test]
    fn nested_parentheses() {
        let unit = lex("$(((1+2)*3))").unwrap().unwrap();
        assert_matches!(unit, TextUnit::Arith { content, .. } => {
            assert_eq!(content.to_string(), "(1+2)*3");
        });
    }

    #[test]
    fn parameter_in_expression() {
        let unit = lex("$(($x+1))").unwrap().unwrap();
        assert_matches!(unit, TextUnit::Arith { content, .. } => {
            assert_matches!(&content.0[0], TextUnit::RawParam { param, .. } => {
                assert_eq!(param.id, "x");
            });
        });
    }

    #[test]
    fn falls_back_to_command_substitution() {
        // The content ends with a single parenthesis, so this must be
        // re-parsed as `$(` followed by a subshell.
        let result = lex("$((echo); echo))").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn unclosed_expansion() {
        let error = lex("$((1+2").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedArith { .. })
        );
        assert!(error.needs_more_input());
    }
}
