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

//! Syntax parser for pipelines

use super::core::{Parser, Rec, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::Bang;
use super::lex::Operator::{Bar, BarAnd};
use super::lex::TokenId::{Operator, Token};
use crate::syntax::Pipeline;

impl Parser<'_> {
    /// Parses a pipeline: an optional `!` followed by commands joined with
    /// `|` or `|&`.
    ///
    /// Returns `Ok(Rec::Parsed(None))` if the current token cannot start a
    /// pipeline.
    pub fn pipeline(&mut self) -> Result<Rec<Option<Pipeline>>> {
        let negation = if self.peek_token()?.id == Token(Some(Bang)) {
            self.take_token_raw()?;
            if self.peek_token()?.id == Token(Some(Bang)) {
                let location = self.peek_token()?.word.location.clone();
                return Err(Error {
                    cause: SyntaxError::DoubleNegation.into(),
                    location,
                });
            }
            true
        } else {
            false
        };

        let maybe_first = loop {
            match self.command()? {
                Rec::AliasSubstituted => {
                    if !negation {
                        return Ok(Rec::AliasSubstituted);
                    }
                }
                Rec::Parsed(maybe_command) => break maybe_command,
            }
        };
        let Some(first) = maybe_first else {
            if negation {
                let location = self.peek_token()?.word.location.clone();
                return Err(Error {
                    cause: SyntaxError::MissingCommandAfterBang.into(),
                    location,
                });
            }
            return Ok(Rec::Parsed(None));
        };

        let mut commands = vec![first];
        let mut pipe_stderr = false;
        loop {
            match self.peek_token()?.id {
                Operator(Bar) => {}
                Operator(BarAnd) => pipe_stderr = true,
                _ => break,
            }
            self.take_token_raw()?;
            self.skip_newlines()?;

            if self.peek_token()?.id == Token(Some(Bang)) {
                let location = self.peek_token()?.word.location.clone();
                return Err(Error {
                    cause: SyntaxError::BangAfterBar.into(),
                    location,
                });
            }

            let maybe_command = loop {
                match self.command()? {
                    Rec::AliasSubstituted => continue,
                    Rec::Parsed(maybe_command) => break maybe_command,
                }
            };
            let Some(command) = maybe_command else {
                let location = self.peek_token()?.word.location.clone();
                return Err(Error {
                    cause: SyntaxError::MissingCommandAfterBar.into(),
                    location,
                });
            };
            commands.push(command);
        }

        Ok(Rec::Parsed(Some(Pipeline {
            commands,
            negation,
            pipe_stderr,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Result<Option<Pipeline>> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        Ok(parser.pipeline()?.unwrap())
    }

    #[test]
    fn single_command() {
        let pipeline = parse("date").unwrap().unwrap();
        assert_eq!(pipeline.commands.len(), 1);
        assert!(!pipeline.negation);
        assert!(!pipeline.pipe_stderr);
    }

    #[test]
    fn multi_stage_pipeline() {
        let pipeline = parse("a | b | c").unwrap().unwrap();
        assert_eq!(pipeline.commands.len(), 3);
        assert_eq!(pipeline.to_string(), "a | b | c");
    }

    #[test]
    fn negated_pipeline() {
        let pipeline = parse("! false").unwrap().unwrap();
        assert!(pipeline.negation);
    }

    #[test]
    fn stderr_pipe() {
        let pipeline = parse("a |& b").unwrap().unwrap();
        assert!(pipeline.pipe_stderr);
    }

    #[test]
    fn newline_after_bar() {
        let pipeline = parse("a |\nb").unwrap().unwrap();
        assert_eq!(pipeline.commands.len(), 2);
    }

    #[test]
    fn double_negation_is_an_error() {
        let error = parse("! ! x").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::DoubleNegation)
        );
    }

    #[test]
    fn bang_after_bar_is_an_error() {
        let error = parse("a | ! b").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::BangAfterBar)
        );
    }

    #[test]
    fn missing_command_after_bar() {
        let error = parse("a |").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::MissingCommandAfterBar)
        );
        assert!(error.needs_more_input());
    }
}
