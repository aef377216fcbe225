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

//! Syntax parser for function definition commands
//!
//! Two forms are recognized: the POSIX `name() body` form, entered from the
//! simple-command parser, and the `function name [()] body` form, entered
//! from the command dispatcher.

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::Function;
use super::lex::Operator::{CloseParen, OpenParen};
use super::lex::TokenId::{EndOfInput, Operator, Token};
use crate::syntax::{FunctionDefinition, Word};
use std::rc::Rc;

impl Parser<'_> {
    /// Parses a function definition after the name and `(` have been
    /// recognized by the simple-command parser.
    ///
    /// The current token is the `(`.
    pub(super) fn short_function_definition(&mut self, name: Word) -> Result<FunctionDefinition> {
        debug_assert_eq!(self.peek_token()?.id, Operator(OpenParen));
        self.take_token_raw()?;
        self.expect_close_paren()?;
        let body = self.function_body()?;
        Ok(FunctionDefinition {
            has_keyword: false,
            name,
            body: Rc::new(body),
        })
    }

    /// Parses a function definition command beginning with the `function`
    /// keyword.
    pub fn function_definition(&mut self) -> Result<FunctionDefinition> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(Function)));
        self.take_token_raw()?;

        let token = self.take_token_auto(&[])?;
        let Token(_) = token.id else {
            return Err(Error {
                cause: SyntaxError::MissingFunctionBody.into(),
                location: token.word.location.clone(),
            });
        };
        let name = token.word;

        if self.peek_token()?.id == Operator(OpenParen) {
            self.take_token_raw()?;
            self.expect_close_paren()?;
        }

        let body = self.function_body()?;
        Ok(FunctionDefinition {
            has_keyword: true,
            name,
            body: Rc::new(body),
        })
    }

    fn expect_close_paren(&mut self) -> Result<()> {
        let token = self.peek_token()?;
        if token.id != Operator(CloseParen) {
            let location = token.word.location.clone();
            return Err(Error {
                cause: SyntaxError::UnmatchedParenthesis.into(),
                location,
            });
        }
        self.take_token_raw()?;
        Ok(())
    }

    /// Parses the compound command serving as a function body.
    fn function_body(&mut self) -> Result<crate::syntax::FullCompoundCommand> {
        self.skip_newlines()?;
        let token = self.peek_token()?;
        match token.id {
            EndOfInput => {
                let location = token.word.location.clone();
                Err(Error {
                    cause: SyntaxError::MissingFunctionBody.into(),
                    location,
                })
            }
            Operator(OpenParen) => self.full_compound_command(),
            Token(Some(keyword)) if super::command::starts_compound_command(keyword) => {
                self.full_compound_command()
            }
            _ => {
                let location = token.word.location.clone();
                Err(Error {
                    cause: SyntaxError::InvalidFunctionBody.into(),
                    location,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use crate::syntax::Command;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Result<Option<Command>> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        Ok(parser.command()?.unwrap())
    }

    #[test]
    fn keyword_form() {
        let command = parse("function f { echo x; }").unwrap().unwrap();
        assert_matches!(command, Command::Function(function) => {
            assert!(function.has_keyword);
            assert_eq!(function.name.to_string(), "f");
        });
    }

    #[test]
    fn keyword_form_with_parens() {
        let command = parse("function f() { echo x; }").unwrap().unwrap();
        assert_matches!(command, Command::Function(function) => {
            assert!(function.has_keyword);
        });
    }

    #[test]
    fn posix_form_with_subshell_body() {
        let command = parse("f() (echo x)").unwrap().unwrap();
        assert_matches!(command, Command::Function(function) => {
            assert!(!function.has_keyword);
        });
    }

    #[test]
    fn body_on_next_line() {
        let command = parse("f()\n{ echo x; }").unwrap().unwrap();
        assert_matches!(command, Command::Function(_));
    }

    #[test]
    fn body_with_redirections() {
        let command = parse("f() { echo x; } > log").unwrap().unwrap();
        assert_matches!(command, Command::Function(function) => {
            assert_eq!(function.body.redirs.len(), 1);
        });
    }

    #[test]
    fn missing_close_paren() {
        let error = parse("f( { echo x; }").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnmatchedParenthesis)
        );
    }

    #[test]
    fn simple_command_body_is_invalid() {
        let error = parse("f() echo x").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::InvalidFunctionBody)
        );
    }

    #[test]
    fn missing_body_needs_more_input() {
        let error = parse("f()").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::MissingFunctionBody)
        );
        assert!(error.needs_more_input());
    }
}
