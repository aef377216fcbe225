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

//! Syntax parser for compound commands

use super::core::{Parser, Result};
use super::lex::Keyword;
use super::lex::Operator::OpenParen;
use super::lex::TokenId::{Operator, Token};
use crate::syntax::{CompoundCommand, FullCompoundCommand};

impl Parser<'_> {
    /// Parses a compound command at the current position.
    ///
    /// The current token must be one that opens a compound command; the
    /// caller (the [command](Self::command) dispatcher) guarantees this.
    pub fn compound_command(&mut self) -> Result<CompoundCommand> {
        match self.peek_token()?.id {
            Operator(OpenParen) => self.subshell_or_arithmetic(),
            Token(Some(Keyword::OpenBrace)) => self.grouping(),
            Token(Some(Keyword::If)) => self.if_command(),
            Token(Some(Keyword::While)) => self.while_loop(),
            Token(Some(Keyword::Until)) => self.until_loop(),
            Token(Some(Keyword::For)) => self.for_loop(),
            Token(Some(Keyword::Select)) => self.select_command(),
            Token(Some(Keyword::Case)) => self.case_command(),
            Token(Some(Keyword::OpenBracketBracket)) => self.double_bracket(),
            id => unreachable!("not a compound command starter: {id:?}"),
        }
    }

    /// Parses a compound command with its trailing redirections.
    pub fn full_compound_command(&mut self) -> Result<FullCompoundCommand> {
        let command = self.compound_command()?;
        let redirs = self.redirections()?;
        Ok(FullCompoundCommand { command, redirs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;

    #[test]
    fn compound_command_with_redirections() {
        let mut lexer = Lexer::from_memory("{ x; } >out 2>&1", Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        let command = parser.full_compound_command().unwrap();
        assert_eq!(command.redirs.len(), 2);
        assert_eq!(command.to_string(), "{ x; } >out 2>&1");
    }
}
