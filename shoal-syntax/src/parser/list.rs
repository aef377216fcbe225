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

//! Syntax parser for lists and and-or lists

use super::core::{Parser, Rec, Result};
use super::error::{Error, SyntaxError};
use super::lex::Operator::{And, AndAnd, BarBar, Newline, Semicolon};
use super::lex::TokenId::{EndOfInput, Operator};
use crate::syntax::{AndOr, AndOrList, Item, List};

impl Parser<'_> {
    /// Consumes newline tokens, reading pending here-document contents
    /// after each.
    pub fn skip_newlines(&mut self) -> Result<()> {
        while self.peek_token()?.id == Operator(Newline) {
            self.take_token_raw()?;
            self.here_doc_contents()?;
        }
        Ok(())
    }

    /// Parses an and-or list: pipelines joined by `&&` and `||`.
    ///
    /// Returns `Ok(Rec::Parsed(None))` if the current token cannot start a
    /// pipeline.
    pub fn and_or_list(&mut self) -> Result<Rec<Option<AndOrList>>> {
        let first = match self.pipeline()? {
            Rec::AliasSubstituted => return Ok(Rec::AliasSubstituted),
            Rec::Parsed(None) => return Ok(Rec::Parsed(None)),
            Rec::Parsed(Some(pipeline)) => pipeline,
        };

        let mut rest = Vec::new();
        loop {
            let op = match self.peek_token()?.id {
                Operator(AndAnd) => AndOr::AndThen,
                Operator(BarBar) => AndOr::OrElse,
                _ => break,
            };
            self.take_token_raw()?;
            self.skip_newlines()?;

            let maybe_pipeline = loop {
                match self.pipeline()? {
                    Rec::AliasSubstituted => continue,
                    Rec::Parsed(maybe_pipeline) => break maybe_pipeline,
                }
            };
            let Some(pipeline) = maybe_pipeline else {
                let location = self.peek_token()?.word.location.clone();
                return Err(Error {
                    cause: SyntaxError::MissingPipeline(op).into(),
                    location,
                });
            };
            rest.push((op, pipeline));
        }

        Ok(Rec::Parsed(Some(AndOrList { first, rest })))
    }

    /// Parses a list: and-or lists separated by `;` and `&`.
    ///
    /// The list ends before a newline or any token that cannot start an
    /// and-or list.
    pub fn list(&mut self) -> Result<Rec<List>> {
        let mut items = Vec::new();
        loop {
            let maybe_and_or = match self.and_or_list()? {
                Rec::AliasSubstituted => {
                    if items.is_empty() {
                        return Ok(Rec::AliasSubstituted);
                    }
                    continue;
                }
                Rec::Parsed(maybe_and_or) => maybe_and_or,
            };
            let Some(and_or) = maybe_and_or else { break };

            let (async_flag, done) = match self.peek_token()? {
                token if token.id == Operator(Semicolon) => (None, false),
                token if token.id == Operator(And) => {
                    (Some(token.word.location.clone()), false)
                }
                _ => (None, true),
            };
            if !done {
                self.take_token_raw()?;
            }
            items.push(Item { and_or, async_flag });
            if done {
                break;
            }
        }
        Ok(Rec::Parsed(List(items)))
    }

    /// Parses an optional compound list: lists separated by newlines,
    /// ending at a token that cannot continue the list.
    ///
    /// This is the production used for the bodies of compound commands and
    /// for the content of command substitutions. The result may be empty.
    pub fn maybe_compound_list(&mut self) -> Result<List> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;
            let list = loop {
                match self.list()? {
                    Rec::AliasSubstituted => continue,
                    Rec::Parsed(list) => break list,
                }
            };
            items.extend(list.0);
            if self.peek_token()?.id != Operator(Newline) {
                break;
            }
        }
        Ok(List(items))
    }

    /// Parses a single command line for the read-eval loop.
    ///
    /// A command line is a list terminated by a newline or the end of
    /// input. `Ok(None)` means the end of input was reached without any
    /// command. An empty line yields `Ok(Some(empty list))`.
    pub fn command_line(&mut self) -> Result<Option<List>> {
        let list = loop {
            match self.list()? {
                Rec::AliasSubstituted => continue,
                Rec::Parsed(list) => break list,
            }
        };

        let token = self.peek_token()?;
        match token.id {
            Operator(Newline) => {
                self.take_token_raw()?;
                self.here_doc_contents()?;
                Ok(Some(list))
            }
            EndOfInput => {
                self.ensure_no_unread_here_doc()?;
                if self.lexer().input_ended_with_line_continuation() {
                    let location = self.lexer().location();
                    return Err(Error {
                        cause: SyntaxError::IncompleteEscape.into(),
                        location,
                    });
                }
                if list.0.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(list))
                }
            }
            _ => {
                let cause = if list.0.is_empty() {
                    SyntaxError::InvalidCommandToken
                } else {
                    SyntaxError::RedundantToken
                };
                Err(Error {
                    cause: cause.into(),
                    location: token.word.location.clone(),
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
    use assert_matches::assert_matches;

    fn parse_line(code: &str) -> Result<Option<List>> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.command_line()
    }

    #[test]
    fn single_command() {
        let list = parse_line("echo hello\n").unwrap().unwrap();
        assert_eq!(list.to_string(), "echo hello");
    }

    #[test]
    fn sequential_commands() {
        let list = parse_line("a; b ;c\n").unwrap().unwrap();
        assert_eq!(list.to_string(), "a; b; c");
    }

    #[test]
    fn asynchronous_command() {
        let list = parse_line("sleep 1& echo done\n").unwrap().unwrap();
        assert!(list.0[0].async_flag.is_some());
        assert!(list.0[1].async_flag.is_none());
        assert_eq!(list.to_string(), "sleep 1& echo done");
    }

    #[test]
    fn and_or_chains() {
        let list = parse_line("a && b || c\n").unwrap().unwrap();
        let and_or = &list.0[0].and_or;
        assert_eq!(and_or.rest.len(), 2);
        assert_eq!(and_or.rest[0].0, AndOr::AndThen);
        assert_eq!(and_or.rest[1].0, AndOr::OrElse);
    }

    #[test]
    fn newline_allowed_after_and_and() {
        let list = parse_line("a &&\n\nb\n").unwrap().unwrap();
        assert_eq!(list.to_string(), "a && b");
    }

    #[test]
    fn missing_pipeline_after_and_and() {
        let error = parse_line("a && \n").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::MissingPipeline(AndOr::AndThen))
        );
    }

    #[test]
    fn empty_line() {
        let list = parse_line("\n").unwrap().unwrap();
        assert_eq!(list.0, []);
    }

    #[test]
    fn end_of_input() {
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn command_without_trailing_newline() {
        let list = parse_line("echo hi").unwrap().unwrap();
        assert_eq!(list.to_string(), "echo hi");
    }

    #[test]
    fn trailing_backslash_requests_more_input() {
        let error = parse_line("echo \\\n").unwrap_err();
        assert!(error.needs_more_input());
    }

    #[test]
    fn redundant_token() {
        let error = parse_line("echo hi )\n").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::RedundantToken)
        );
        assert!(!error.needs_more_input());
    }
}
