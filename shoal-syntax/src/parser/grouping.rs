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

//! Syntax parsers for brace groupings, subshells, and arithmetic commands
//!
//! All three share this module because `((` must be disambiguated from a
//! subshell opening: arithmetic is tried first and parsing falls back to a
//! subshell when the content does not end in `))`.

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{CloseBrace, OpenBrace};
use super::lex::Operator::CloseParen;
use super::lex::TokenId::{Operator, Token};
use crate::syntax::CompoundCommand;

impl Parser<'_> {
    /// Parses a brace grouping, starting at the `{` token.
    pub fn grouping(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(OpenBrace)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let body = self.maybe_compound_list()?;

        let close = self.peek_token()?;
        if close.id != Token(Some(CloseBrace)) {
            let location = close.word.location.clone();
            return Err(Error {
                cause: SyntaxError::UnclosedGrouping { opening_location }.into(),
                location,
            });
        }
        if body.0.is_empty() {
            let location = close.word.location.clone();
            return Err(Error {
                cause: SyntaxError::EmptyGrouping.into(),
                location,
            });
        }
        self.take_token_raw()?;
        Ok(CompoundCommand::Grouping(body))
    }

    /// Parses a subshell or an arithmetic command, starting at the `(`
    /// token.
    pub fn subshell_or_arithmetic(&mut self) -> Result<CompoundCommand> {
        let open = self.peek_token()?;
        debug_assert_eq!(open.id, Operator(super::lex::Operator::OpenParen));
        let index = open.index;
        let opening_location = open.word.location.clone();
        self.take_token_raw()?;

        if self.lexer().peek_char() == Some('(') {
            if let Some(arithmetic) = self.try_arithmetic_command(index)? {
                return Ok(arithmetic);
            }
            // Rewound to the `(`: consume it again and parse a subshell.
            let reopened = self.take_token_raw()?;
            debug_assert_eq!(reopened.id, Operator(super::lex::Operator::OpenParen));
        }

        let body = self.maybe_compound_list()?;

        let close = self.peek_token()?;
        if close.id != Operator(CloseParen) {
            let location = close.word.location.clone();
            return Err(Error {
                cause: SyntaxError::UnclosedSubshell { opening_location }.into(),
                location,
            });
        }
        if body.0.is_empty() {
            let location = close.word.location.clone();
            return Err(Error {
                cause: SyntaxError::EmptySubshell.into(),
                location,
            });
        }
        self.take_token_raw()?;
        Ok(CompoundCommand::Subshell(body))
    }

    /// Attempts to parse `((...))` as an arithmetic command.
    ///
    /// The `(` token has been consumed and the next character is the second
    /// `(`. On fallback the lexer is rewound to `index`, the position of
    /// the first `(`.
    fn try_arithmetic_command(&mut self, index: usize) -> Result<Option<CompoundCommand>> {
        self.assert_no_pending_token();
        let lexer = self.lexer();
        debug_assert_eq!(lexer.peek_char(), Some('('));
        lexer.consume_char();

        let content = match lexer.arith_text(&|_| false)? {
            Some(content) => content,
            None => {
                let opening_location = lexer.location_range(index..index + 2);
                return Err(Error {
                    cause: SyntaxError::UnclosedArithCommand { opening_location }.into(),
                    location: lexer.location(),
                });
            }
        };

        debug_assert_eq!(lexer.peek_char(), Some(')'));
        lexer.consume_char();
        if lexer.peek_char() != Some(')') {
            lexer.rewind(index);
            return Ok(None);
        }
        lexer.consume_char();

        let location = lexer.location_range(index..lexer.index());
        Ok(Some(CompoundCommand::Arithmetic {
            expr: content,
            location,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Result<CompoundCommand> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.compound_command()
    }

    #[test]
    fn grouping() {
        let command = parse("{ echo hi; }").unwrap();
        assert_matches!(command, CompoundCommand::Grouping(_));
    }

    #[test]
    fn grouping_with_newlines() {
        let command = parse("{\necho hi\n}").unwrap();
        assert_matches!(command, CompoundCommand::Grouping(list) => {
            assert_eq!(list.to_string(), "echo hi");
        });
    }

    #[test]
    fn empty_grouping_is_an_error() {
        let error = parse("{ }").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::EmptyGrouping)
        );
    }

    #[test]
    fn unclosed_grouping() {
        let error = parse("{ x;").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedGrouping { .. })
        );
        assert!(error.needs_more_input());
    }

    #[test]
    fn subshell() {
        let command = parse("(echo hi; date)").unwrap();
        assert_matches!(command, CompoundCommand::Subshell(list) => {
            assert_eq!(list.0.len(), 2);
        });
    }

    #[test]
    fn arithmetic_command() {
        let command = parse("((x = 1 + 2))").unwrap();
        assert_matches!(command, CompoundCommand::Arithmetic { expr, .. } => {
            assert_eq!(expr.to_string(), "x = 1 + 2");
        });
    }

    #[test]
    fn nested_parens_in_arithmetic() {
        let command = parse("(((1+2)*3))").unwrap();
        assert_matches!(command, CompoundCommand::Arithmetic { expr, .. } => {
            assert_eq!(expr.to_string(), "(1+2)*3");
        });
    }

    #[test]
    fn subshell_starting_with_subshell() {
        let command = parse("((echo a); echo b)").unwrap();
        assert_matches!(command, CompoundCommand::Subshell(list) => {
            assert_eq!(list.0.len(), 2);
        });
    }

    #[test]
    fn unclosed_subshell() {
        let error = parse("(x").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedSubshell { .. })
        );
        assert!(error.needs_more_input());
    }
}
