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

//! Syntax parsers for for loops (word-list and C-style) and select commands

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{For, In, Select};
use super::lex::Operator::{Newline, Semicolon};
use super::lex::TokenId::{EndOfInput, Operator, Token};
use crate::source::Location;
use crate::syntax::{CompoundCommand, Text, Word};

impl Parser<'_> {
    /// Parses a for loop, starting at the `for` token.
    pub fn for_loop(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(For)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        // C-style header: `for ((init; cond; update))`
        self.assert_no_pending_token();
        self.lexer().skip_blanks()?;
        if self.lexer().peek_char() == Some('(') && self.lexer().peek_char_after() == Some('(') {
            return self.c_style_for(opening_location);
        }

        let name = self.loop_name(|| SyntaxError::MissingForName)?;
        let values = self.loop_values()?;
        self.expect_do(|| SyntaxError::MissingForBody { opening_location })?;
        let body = self.do_clause()?;
        Ok(CompoundCommand::For { name, values, body })
    }

    /// Parses a select command, starting at the `select` token.
    pub fn select_command(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(Select)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let name = self.loop_name(|| SyntaxError::MissingSelectName)?;
        let values = self.loop_values()?;
        self.expect_do(|| SyntaxError::MissingSelectBody { opening_location })?;
        let body = self.do_clause()?;
        Ok(CompoundCommand::Select { name, values, body })
    }

    /// Parses the variable name of a for or select command.
    fn loop_name(&mut self, missing: impl FnOnce() -> SyntaxError) -> Result<Word> {
        let token = self.take_token_auto(&[])?;
        let Token(_) = token.id else {
            return Err(Error {
                cause: missing().into(),
                location: token.word.location.clone(),
            });
        };
        let valid = token.word.to_string_if_literal().is_some_and(|name| {
            !name.is_empty()
                && name.chars().next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
                && name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
        });
        if !valid {
            return Err(Error {
                cause: SyntaxError::InvalidForName.into(),
                location: token.word.location.clone(),
            });
        }
        Ok(token.word)
    }

    /// Parses the optional `in word...` clause and the following separator.
    ///
    /// Returns `None` when no `in` clause is present, which means iterating
    /// over the positional parameters.
    fn loop_values(&mut self) -> Result<Option<Vec<Word>>> {
        // A newline or `;` may precede `do`; `in` may follow directly.
        if self.peek_token()?.id == Operator(Semicolon) {
            self.take_token_raw()?;
            self.skip_newlines()?;
            return Ok(None);
        }
        self.skip_newlines()?;

        if self.peek_token()?.id != Token(Some(In)) {
            return Ok(None);
        }
        self.take_token_raw()?;

        let mut values = Vec::new();
        loop {
            let token = self.peek_token()?;
            match token.id {
                Operator(Semicolon) => {
                    self.take_token_raw()?;
                    break;
                }
                Operator(Newline) => break,
                Token(_) => {
                    let token = self.take_token_raw()?;
                    let mut word = token.word;
                    word.parse_tilde_front();
                    values.push(word);
                }
                EndOfInput => break,
                _ => {
                    return Err(Error {
                        cause: SyntaxError::InvalidForValue.into(),
                        location: token.word.location.clone(),
                    });
                }
            }
        }
        self.skip_newlines()?;
        Ok(Some(values))
    }

    /// Parses the rest of a C-style for loop after the `for` keyword.
    ///
    /// The current position is on the first of the two opening parentheses.
    fn c_style_for(&mut self, opening_location: Location) -> Result<CompoundCommand> {
        let lexer = self.lexer();
        let begin = lexer.index();
        lexer.consume_char();
        lexer.consume_char();

        let unclosed = |lexer: &mut super::lex::Lexer| Error {
            cause: SyntaxError::UnclosedArithFor {
                opening_location: lexer.location_range(begin..begin + 2),
            }
            .into(),
            location: lexer.location(),
        };

        let mut sections = Vec::new();
        for _ in 0..2 {
            let Some(section) = self.lexer().arith_text(&|c| c == ';')? else {
                let lexer = self.lexer();
                return Err(unclosed(lexer));
            };
            let lexer = self.lexer();
            if lexer.peek_char() != Some(';') {
                return Err(unclosed(lexer));
            }
            lexer.consume_char();
            sections.push(section);
        }

        let Some(update) = self.lexer().arith_text(&|_| false)? else {
            let lexer = self.lexer();
            return Err(unclosed(lexer));
        };
        let lexer = self.lexer();
        debug_assert_eq!(lexer.peek_char(), Some(')'));
        lexer.consume_char();
        if lexer.peek_char() != Some(')') {
            return Err(unclosed(lexer));
        }
        lexer.consume_char();

        // Optional `;` or newlines before `do`
        if self.peek_token()?.id == Operator(Semicolon) {
            self.take_token_raw()?;
        }
        self.skip_newlines()?;
        self.expect_do(|| SyntaxError::MissingForBody { opening_location })?;
        let body = self.do_clause()?;

        let mut sections = sections.into_iter();
        let init = sections.next().unwrap();
        let condition = sections.next().unwrap();
        let non_empty = |text: Text| if text.0.is_empty() { None } else { Some(text) };
        Ok(CompoundCommand::CStyleFor {
            init: non_empty(init),
            condition: non_empty(condition),
            update: non_empty(update),
            body,
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
    fn for_with_values() {
        let command = parse("for i in 1 2 3; do echo $i; done").unwrap();
        assert_matches!(command, CompoundCommand::For { name, values, .. } => {
            assert_eq!(name.to_string(), "i");
            assert_eq!(values.unwrap().len(), 3);
        });
    }

    #[test]
    fn for_without_in_iterates_positional_parameters() {
        let command = parse("for arg; do use \"$arg\"; done").unwrap();
        assert_matches!(command, CompoundCommand::For { values, .. } => {
            assert_eq!(values, None);
        });

        let command = parse("for arg do x; done").unwrap();
        assert_matches!(command, CompoundCommand::For { values, .. } => {
            assert_eq!(values, None);
        });
    }

    #[test]
    fn for_with_empty_value_list() {
        let command = parse("for i in; do x; done").unwrap();
        assert_matches!(command, CompoundCommand::For { values, .. } => {
            assert_eq!(values, Some(vec![]));
        });
    }

    #[test]
    fn for_with_newline_before_do() {
        let command = parse("for i in a b\ndo x; done").unwrap();
        assert_matches!(command, CompoundCommand::For { values, .. } => {
            assert_eq!(values.unwrap().len(), 2);
        });
    }

    #[test]
    fn invalid_name() {
        let error = parse("for 1x; do y; done").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::InvalidForName)
        );
    }

    #[test]
    fn c_style_for() {
        let command = parse("for ((i=0; i<5; i++)); do echo $i; done").unwrap();
        assert_matches!(command, CompoundCommand::CStyleFor { init, condition, update, .. } => {
            assert_eq!(init.unwrap().to_string(), "i=0");
            assert_eq!(condition.unwrap().to_string(), " i<5");
            assert_eq!(update.unwrap().to_string(), " i++");
        });
    }

    #[test]
    fn c_style_for_with_empty_sections() {
        let command = parse("for ((;;)); do x; done").unwrap();
        assert_matches!(command, CompoundCommand::CStyleFor { init, condition, update, .. } => {
            assert_eq!(init, None);
            assert_eq!(condition, None);
            assert_eq!(update, None);
        });
    }

    #[test]
    fn select_command() {
        let command = parse("select choice in a b; do echo $choice; done").unwrap();
        assert_matches!(command, CompoundCommand::Select { name, values, .. } => {
            assert_eq!(name.to_string(), "choice");
            assert_eq!(values.unwrap().len(), 2);
        });
    }

    #[test]
    fn missing_do_clause() {
        let error = parse("for i in x; y; done").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::MissingForBody { .. })
        );
    }
}
