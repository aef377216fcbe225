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

//! Syntax parsers for while and until loops and the shared do clause

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{Do, Done, Until, While};
use super::lex::TokenId::Token;
use crate::source::Location;
use crate::syntax::{CompoundCommand, List};

impl Parser<'_> {
    /// Parses a do clause: `do` compound-list `done`.
    pub fn do_clause(&mut self) -> Result<List> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(Do)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let body = self.maybe_compound_list()?;

        let close = self.peek_token()?;
        if close.id != Token(Some(Done)) {
            let location = close.word.location.clone();
            return Err(Error {
                cause: SyntaxError::UnclosedDoClause { opening_location }.into(),
                location,
            });
        }
        if body.0.is_empty() {
            let location = close.word.location.clone();
            return Err(Error {
                cause: SyntaxError::EmptyDoClause.into(),
                location,
            });
        }
        self.take_token_raw()?;
        Ok(body)
    }

    /// Consumes the `do` keyword of a loop, or reports `error`.
    pub(super) fn expect_do(
        &mut self,
        error: impl FnOnce() -> SyntaxError,
    ) -> Result<()> {
        let token = self.peek_token()?;
        if token.id == Token(Some(Do)) {
            return Ok(());
        }
        let location = token.word.location.clone();
        Err(Error {
            cause: error().into(),
            location,
        })
    }

    /// Parses a while loop, starting at the `while` token.
    pub fn while_loop(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(While)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let (condition, body) = self.loop_clauses(opening_location, false)?;
        Ok(CompoundCommand::While { condition, body })
    }

    /// Parses an until loop, starting at the `until` token.
    pub fn until_loop(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(Until)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let (condition, body) = self.loop_clauses(opening_location, true)?;
        Ok(CompoundCommand::Until { condition, body })
    }

    fn loop_clauses(
        &mut self,
        opening_location: Location,
        until: bool,
    ) -> Result<(List, List)> {
        let condition = self.maybe_compound_list()?;
        if condition.0.is_empty() {
            let location = self.peek_token()?.word.location.clone();
            let cause = if until {
                SyntaxError::EmptyUntilCondition
            } else {
                SyntaxError::EmptyWhileCondition
            };
            return Err(Error {
                cause: cause.into(),
                location,
            });
        }

        self.expect_do(|| {
            if until {
                SyntaxError::UnclosedUntilClause { opening_location }
            } else {
                SyntaxError::UnclosedWhileClause { opening_location }
            }
        })?;

        let body = self.do_clause()?;
        Ok((condition, body))
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
    fn while_loop() {
        let command = parse("while true; do work; done").unwrap();
        assert_eq!(command.to_string(), "while true; do work; done");
    }

    #[test]
    fn until_loop() {
        let command = parse("until done2; do retry; done").unwrap();
        assert_matches!(command, CompoundCommand::Until { .. });
    }

    #[test]
    fn multiline_loop() {
        let command = parse("while a\nb\ndo\nc\ndone").unwrap();
        assert_matches!(command, CompoundCommand::While { condition, body } => {
            assert_eq!(condition.0.len(), 2);
            assert_eq!(body.0.len(), 1);
        });
    }

    #[test]
    fn empty_condition() {
        let error = parse("while do x; done").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::EmptyWhileCondition)
        );
    }

    #[test]
    fn missing_do() {
        let error = parse("while x; y; done").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedWhileClause { .. })
        );
    }

    #[test]
    fn empty_body() {
        let error = parse("while x; do done").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::EmptyDoClause)
        );
    }

    #[test]
    fn unclosed_loop_needs_more_input() {
        let error = parse("until x; do y;").unwrap_err();
        assert!(error.needs_more_input());
    }
}
