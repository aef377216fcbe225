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

//! Syntax parser for the if command

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{Elif, Else, Fi, If, Then};
use super::lex::TokenId::Token;
use crate::syntax::{CompoundCommand, ElifThen};

impl Parser<'_> {
    /// Parses an if command, starting at the `if` token.
    pub fn if_command(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(If)));
        let open = self.take_token_raw()?;
        let if_location = open.word.location;

        let condition = self.maybe_compound_list()?;
        if condition.0.is_empty() {
            return self.empty_clause_error(SyntaxError::EmptyIfCondition);
        }

        self.then_clause(&if_location, false)?;
        let body = self.maybe_compound_list()?;
        if body.0.is_empty() {
            return self.empty_clause_error(SyntaxError::EmptyIfBody);
        }

        let mut elifs = Vec::new();
        let r#else = loop {
            let token = self.peek_token()?;
            match token.id {
                Token(Some(Fi)) => {
                    self.take_token_raw()?;
                    break None;
                }
                Token(Some(Else)) => {
                    self.take_token_raw()?;
                    let body = self.maybe_compound_list()?;
                    if body.0.is_empty() {
                        return self.empty_clause_error(SyntaxError::EmptyElse);
                    }
                    let close = self.peek_token()?;
                    if close.id != Token(Some(Fi)) {
                        let location = close.word.location.clone();
                        return Err(Error {
                            cause: SyntaxError::UnclosedIf {
                                opening_location: if_location,
                            }
                            .into(),
                            location,
                        });
                    }
                    self.take_token_raw()?;
                    break Some(body);
                }
                Token(Some(Elif)) => {
                    let elif_location = token.word.location.clone();
                    self.take_token_raw()?;
                    let condition = self.maybe_compound_list()?;
                    if condition.0.is_empty() {
                        return self.empty_clause_error(SyntaxError::EmptyElifCondition);
                    }
                    self.then_clause(&elif_location, true)?;
                    let body = self.maybe_compound_list()?;
                    if body.0.is_empty() {
                        return self.empty_clause_error(SyntaxError::EmptyElifBody);
                    }
                    elifs.push(ElifThen { condition, body });
                }
                _ => {
                    let location = token.word.location.clone();
                    return Err(Error {
                        cause: SyntaxError::UnclosedIf {
                            opening_location: if_location,
                        }
                        .into(),
                        location,
                    });
                }
            }
        };

        Ok(CompoundCommand::If {
            condition,
            body,
            elifs,
            r#else,
        })
    }

    /// Consumes the `then` keyword or reports the appropriate error.
    fn then_clause(&mut self, opening: &crate::source::Location, elif: bool) -> Result<()> {
        let token = self.peek_token()?;
        if token.id == Token(Some(Then)) {
            self.take_token_raw()?;
            return Ok(());
        }
        let location = token.word.location.clone();
        let cause = if elif {
            SyntaxError::ElifMissingThen {
                elif_location: opening.clone(),
            }
        } else {
            SyntaxError::IfMissingThen {
                if_location: opening.clone(),
            }
        };
        Err(Error {
            cause: cause.into(),
            location,
        })
    }

    /// Reports an empty-clause error at the current token.
    fn empty_clause_error<T>(&mut self, cause: SyntaxError) -> Result<T> {
        let location = self.peek_token()?.word.location.clone();
        Err(Error {
            cause: cause.into(),
            location,
        })
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
    fn simple_if() {
        let command = parse("if true; then echo y; fi").unwrap();
        assert_eq!(command.to_string(), "if true; then echo y; fi");
    }

    #[test]
    fn if_with_else() {
        let command = parse("if a; then b; else c; fi").unwrap();
        assert_matches!(command, CompoundCommand::If { r#else, .. } => {
            assert!(r#else.is_some());
        });
    }

    #[test]
    fn if_with_elifs() {
        let command = parse("if a; then b; elif c; then d; elif e; then f; fi").unwrap();
        assert_matches!(command, CompoundCommand::If { elifs, r#else, .. } => {
            assert_eq!(elifs.len(), 2);
            assert_eq!(r#else, None);
        });
    }

    #[test]
    fn multiline_if() {
        let command = parse("if a\nthen\nb\nfi").unwrap();
        assert_eq!(command.to_string(), "if a; then b; fi");
    }

    #[test]
    fn missing_then() {
        let error = parse("if a; b; fi").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::IfMissingThen { .. })
        );
    }

    #[test]
    fn empty_condition() {
        let error = parse("if then b; fi").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::EmptyIfCondition)
        );
    }

    #[test]
    fn unclosed_if_needs_more_input() {
        let error = parse("if a; then b;").unwrap_err();
        assert!(error.needs_more_input());
    }
}
