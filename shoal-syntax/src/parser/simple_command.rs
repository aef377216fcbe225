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

//! Syntax parser for simple commands
//!
//! This module also recognizes POSIX-style function definitions
//! (`name() body`), which syntactically begin like a simple command.

use super::core::{Parser, Rec, Result};
use super::error::{Error, SyntaxError};
use super::lex::Operator::{CloseParen, Newline, OpenParen};
use super::lex::TokenId::{Operator, Token};
use crate::syntax::TextUnit::Literal;
use crate::syntax::WordUnit::Unquoted;
use crate::syntax::{Assign, Command, SimpleCommand, Text, TextUnit, Value, Word};

impl Parser<'_> {
    /// Parses a simple command, or a function definition if the first word
    /// is immediately followed by `()`.
    pub fn simple_command(&mut self) -> Result<Rec<Option<Command>>> {
        let mut assigns: Vec<Assign> = Vec::new();
        let mut words: Vec<Word> = Vec::new();
        let mut redirs = Vec::new();

        loop {
            if let Some(redir) = self.redirection()? {
                redirs.push(redir);
                continue;
            }

            let token = self.peek_token()?;
            let Token(_) = token.id else { break };

            let is_command_name = words.is_empty();
            let token = match self.take_token_manual(is_command_name)? {
                Rec::AliasSubstituted => {
                    if assigns.is_empty() && words.is_empty() && redirs.is_empty() {
                        return Ok(Rec::AliasSubstituted);
                    }
                    continue;
                }
                Rec::Parsed(token) => token,
            };

            // Assignment words are recognized before the command name only.
            if words.is_empty() {
                match split_assignment(token.word) {
                    Ok(mut assign) => {
                        if self.is_array_value_next(&assign)? {
                            assign.value = self.array_values()?;
                        } else if let Value::Scalar(word) = &mut assign.value {
                            word.parse_tilde_everywhere();
                        }
                        assigns.push(assign);
                        continue;
                    }
                    Err(word) => {
                        // The first word may open a function definition.
                        if assigns.is_empty() && redirs.is_empty() {
                            if self.peek_token()?.id == Operator(OpenParen) {
                                let function = self.short_function_definition(word)?;
                                return Ok(Rec::Parsed(Some(Command::Function(function))));
                            }
                        }
                        let mut word = word;
                        word.parse_tilde_front();
                        words.push(word);
                        continue;
                    }
                }
            }

            let mut word = token.word;
            word.parse_tilde_front();
            words.push(word);
        }

        if assigns.is_empty() && words.is_empty() && redirs.is_empty() {
            return Ok(Rec::Parsed(None));
        }
        Ok(Rec::Parsed(Some(Command::Simple(SimpleCommand {
            assigns,
            words,
            redirs,
        }))))
    }

    /// Tests whether an array value (`=( ... )`) follows the just-taken
    /// assignment token.
    fn is_array_value_next(&mut self, assign: &Assign) -> Result<bool> {
        let empty_scalar = matches!(&assign.value, Value::Scalar(word) if word.units.is_empty());
        if !empty_scalar || self.has_blank()? {
            return Ok(false);
        }
        Ok(self.peek_token()?.id == Operator(OpenParen))
    }

    /// Parses the words of an array assignment value up to the closing `)`.
    fn array_values(&mut self) -> Result<Value> {
        let opening_location = self.peek_token()?.word.location.clone();
        self.take_token_raw()?;

        let mut words = Vec::new();
        loop {
            let token = self.take_token_raw()?;
            match token.id {
                Operator(Newline) => {
                    self.here_doc_contents()?;
                    continue;
                }
                Operator(CloseParen) => return Ok(Value::Array(words)),
                Token(_) => {
                    let mut word = token.word;
                    word.parse_tilde_front();
                    words.push(word);
                }
                _ => {
                    return Err(Error {
                        cause: SyntaxError::UnclosedArrayValue { opening_location }.into(),
                        location: token.word.location.clone(),
                    })
                }
            }
        }
    }
}

/// Splits a token word into an assignment, or returns the word unchanged.
///
/// An assignment word starts with a literal `NAME=` prefix, optionally with
/// a `[subscript]` between the name and the `=`.
fn split_assignment(word: Word) -> std::result::Result<Assign, Word> {
    let mut name = String::new();
    let mut units = word.units.iter();
    let mut consumed = 0;

    // Leading name characters
    loop {
        match units.next() {
            Some(Unquoted(Literal(c))) if *c == '=' && !name.is_empty() && consumed > 0 => {
                consumed += 1;
                let value_units: Vec<_> = word.units[consumed..].to_vec();
                let value = Word {
                    units: value_units,
                    location: word.location.clone(),
                };
                return Ok(Assign {
                    name,
                    index: None,
                    value: Value::Scalar(value),
                    location: word.location,
                });
            }
            Some(Unquoted(Literal(c))) if *c == '[' && !name.is_empty() => {
                // Subscripted assignment: NAME[expr]=value
                let mut index_units: Vec<TextUnit> = Vec::new();
                consumed += 1;
                loop {
                    match units.next() {
                        Some(Unquoted(Literal(']'))) => {
                            consumed += 1;
                            break;
                        }
                        Some(Unquoted(unit)) => {
                            consumed += 1;
                            index_units.push(unit.clone());
                        }
                        _ => return Err(word),
                    }
                }
                match units.next() {
                    Some(Unquoted(Literal('='))) => {
                        consumed += 1;
                        let value_units: Vec<_> = word.units[consumed..].to_vec();
                        let value = Word {
                            units: value_units,
                            location: word.location.clone(),
                        };
                        return Ok(Assign {
                            name,
                            index: Some(Text(index_units)),
                            value: Value::Scalar(value),
                            location: word.location,
                        });
                    }
                    _ => return Err(word),
                }
            }
            Some(Unquoted(Literal(c)))
                if (name.is_empty() && (c.is_ascii_alphabetic() || *c == '_'))
                    || (!name.is_empty() && (c.is_ascii_alphanumeric() || *c == '_')) =>
            {
                name.push(*c);
                consumed += 1;
            }
            _ => return Err(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Option<Command> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.simple_command().unwrap().unwrap()
    }

    fn parse_simple(code: &str) -> SimpleCommand {
        match parse(code) {
            Some(Command::Simple(simple)) => simple,
            other => panic!("not a simple command: {other:?}"),
        }
    }

    #[test]
    fn words_only() {
        let simple = parse_simple("echo one two");
        assert!(simple.assigns.is_empty());
        assert_eq!(simple.words.len(), 3);
        assert_eq!(simple.to_string(), "echo one two");
    }

    #[test]
    fn assignments_before_command() {
        let simple = parse_simple("a=1 b=2 env");
        assert_eq!(simple.assigns.len(), 2);
        assert_eq!(simple.assigns[0].name, "a");
        assert_eq!(simple.assigns[0].value.to_string(), "1");
        assert_eq!(simple.words.len(), 1);
    }

    #[test]
    fn assignment_after_command_is_a_word() {
        let simple = parse_simple("env a=1");
        assert!(simple.assigns.is_empty());
        assert_eq!(simple.words.len(), 2);
    }

    #[test]
    fn empty_assignment_value() {
        let simple = parse_simple("x=");
        assert_eq!(simple.assigns.len(), 1);
        assert_matches!(&simple.assigns[0].value, Value::Scalar(word) => {
            assert!(word.units.is_empty());
        });
    }

    #[test]
    fn invalid_names_are_words() {
        let simple = parse_simple("1x=y");
        assert!(simple.assigns.is_empty());
        assert_eq!(simple.words.len(), 1);

        let simple = parse_simple("=y");
        assert!(simple.assigns.is_empty());
        assert_eq!(simple.words.len(), 1);
    }

    #[test]
    fn array_assignment() {
        let simple = parse_simple("a=(1 2 3)");
        assert_matches!(&simple.assigns[0].value, Value::Array(words) => {
            assert_eq!(words.len(), 3);
        });
    }

    #[test]
    fn array_assignment_with_newlines() {
        let simple = parse_simple("a=(1\n2)");
        assert_matches!(&simple.assigns[0].value, Value::Array(words) => {
            assert_eq!(words.len(), 2);
        });
    }

    #[test]
    fn blank_before_paren_is_not_an_array() {
        // `a= (x)` is an assignment followed by... nothing parsable here,
        // so the command ends after the assignment.
        let simple = parse_simple("a= x");
        assert_eq!(simple.assigns.len(), 1);
        assert_eq!(simple.words.len(), 1);
    }

    #[test]
    fn subscripted_assignment() {
        let simple = parse_simple("a[2]=x");
        assert_eq!(simple.assigns[0].name, "a");
        assert_matches!(&simple.assigns[0].index, Some(text) => {
            assert_eq!(text.to_string(), "2");
        });
    }

    #[test]
    fn redirections_anywhere() {
        let simple = parse_simple(">out echo <in x 2>err");
        assert_eq!(simple.redirs.len(), 3);
        assert_eq!(simple.words.len(), 2);
    }

    #[test]
    fn tilde_in_command_word() {
        let simple = parse_simple("ls ~/docs");
        assert_matches!(
            &simple.words[1].units[0],
            crate::syntax::WordUnit::Tilde(name) if name.is_empty()
        );
    }

    #[test]
    fn tilde_after_colon_in_assignment() {
        let simple = parse_simple("PATH=~/bin:~/sbin");
        assert_matches!(&simple.assigns[0].value, Value::Scalar(word) => {
            let tildes = word
                .units
                .iter()
                .filter(|u| matches!(u, crate::syntax::WordUnit::Tilde(_)))
                .count();
            assert_eq!(tildes, 2);
        });
    }

    #[test]
    fn short_function_definition() {
        let command = parse("greet() { echo hi; }").unwrap();
        assert_matches!(command, Command::Function(function) => {
            assert!(!function.has_keyword);
            assert_eq!(function.name.to_string(), "greet");
        });
    }
}
