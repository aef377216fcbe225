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

//! Syntax parser for commands

use super::core::{Parser, Rec, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{self, Function, In};
use super::lex::Operator::OpenParen;
use super::lex::TokenId::{EndOfInput, IoNumber, Operator, Token};
use crate::syntax::Command;

impl Parser<'_> {
    /// Parses a command, dispatching on the first meaningful token.
    ///
    /// Returns `Ok(Rec::Parsed(None))` if the current token cannot start a
    /// command, leaving the token for the caller.
    pub fn command(&mut self) -> Result<Rec<Option<Command>>> {
        let token = self.peek_token()?;
        match token.id {
            EndOfInput => Ok(Rec::Parsed(None)),
            Operator(OpenParen) => {
                let command = self.full_compound_command()?;
                Ok(Rec::Parsed(Some(Command::Compound(command))))
            }
            Operator(op) if super::redir::initiates_redirection(op) => self.simple_command(),
            Operator(_) => Ok(Rec::Parsed(None)),
            IoNumber(_) => self.simple_command(),
            Token(Some(keyword)) => match keyword {
                Function => {
                    let function = self.function_definition()?;
                    Ok(Rec::Parsed(Some(Command::Function(function))))
                }
                In => {
                    let location = token.word.location.clone();
                    Err(Error {
                        cause: SyntaxError::InAsCommandName.into(),
                        location,
                    })
                }
                keyword if starts_compound_command(keyword) => {
                    let command = self.full_compound_command()?;
                    Ok(Rec::Parsed(Some(Command::Compound(command))))
                }
                // `time` has no grammar role of its own (yet); clause
                // delimiters and `!` belong to the enclosing construct.
                Keyword::Time => self.simple_command(),
                _ => Ok(Rec::Parsed(None)),
            },
            Token(None) => self.simple_command(),
        }
    }
}

/// Tests whether the keyword opens a compound command.
pub(super) fn starts_compound_command(keyword: Keyword) -> bool {
    use Keyword::*;
    matches!(
        keyword,
        OpenBrace | If | While | Until | For | Case | Select | OpenBracketBracket
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Result<Option<Command>> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        Ok(parser.command()?.unwrap())
    }

    #[test]
    fn simple_command() {
        let command = parse("ls -l").unwrap().unwrap();
        assert_matches!(command, Command::Simple(_));
    }

    #[test]
    fn compound_commands() {
        assert_matches!(
            parse("{ x; }").unwrap().unwrap(),
            Command::Compound(_)
        );
        assert_matches!(parse("(x)").unwrap().unwrap(), Command::Compound(_));
        assert_matches!(
            parse("if a; then b; fi").unwrap().unwrap(),
            Command::Compound(_)
        );
    }

    #[test]
    fn function_definitions() {
        assert_matches!(
            parse("function f { x; }").unwrap().unwrap(),
            Command::Function(_)
        );
        assert_matches!(parse("f() { x; }").unwrap().unwrap(), Command::Function(_));
    }

    #[test]
    fn redirection_only_command() {
        let command = parse("> file").unwrap().unwrap();
        assert_matches!(command, Command::Simple(simple) => {
            assert!(simple.words.is_empty());
            assert_eq!(simple.redirs.len(), 1);
        });
    }

    #[test]
    fn clause_delimiter_is_not_a_command() {
        assert_eq!(parse("fi").unwrap(), None);
        assert_eq!(parse(")").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn in_as_command_name() {
        let error = parse("in x").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::InAsCommandName)
        );
    }
}
