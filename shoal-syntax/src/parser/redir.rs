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

//! Syntax parser for redirections

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Operator;
use super::lex::TokenId::{IoNumber, Operator as OperatorId, Token};
use crate::syntax::{Fd, HereDoc, Redir, RedirBody, RedirOp};
use std::cell::OnceCell;
use std::rc::Rc;

/// What kind of redirection an operator token introduces
enum RedirKind {
    Normal(RedirOp),
    HereDoc { remove_tabs: bool },
}

/// Maps an operator token to the redirection it introduces, if any.
fn redir_kind(op: Operator) -> Option<RedirKind> {
    use Operator::*;
    use RedirOp::*;
    Some(match op {
        Less => RedirKind::Normal(FileIn),
        LessGreater => RedirKind::Normal(FileInOut),
        Greater => RedirKind::Normal(FileOut),
        GreaterGreater => RedirKind::Normal(FileAppend),
        GreaterBar => RedirKind::Normal(FileClobber),
        LessAnd => RedirKind::Normal(FdIn),
        GreaterAnd => RedirKind::Normal(FdOut),
        LessLessLess => RedirKind::Normal(HereString),
        AndGreater => RedirKind::Normal(OutErr),
        LessLess => RedirKind::HereDoc { remove_tabs: false },
        LessLessDash => RedirKind::HereDoc { remove_tabs: true },
        _ => return None,
    })
}

/// Tests whether the operator can start a redirection (without a preceding
/// IO_NUMBER).
#[must_use]
pub(super) fn initiates_redirection(op: Operator) -> bool {
    redir_kind(op).is_some()
}

impl Parser<'_> {
    /// Parses a redirection at the current position, if any.
    pub fn redirection(&mut self) -> Result<Option<Redir>> {
        let fd = match self.peek_token()?.id {
            IoNumber(n) => {
                self.take_token_raw()?;
                Some(Fd(n))
            }
            _ => None,
        };

        let kind = match self.peek_token()?.id {
            OperatorId(op) => match redir_kind(op) {
                Some(kind) => kind,
                // The lexer emits IO_NUMBER only before `<` or `>`.
                None => {
                    debug_assert!(fd.is_none());
                    return Ok(None);
                }
            },
            _ => {
                debug_assert!(fd.is_none());
                return Ok(None);
            }
        };
        self.take_token_raw()?;

        let operand = self.take_token_raw()?;
        let Token(_) = operand.id else {
            let cause = match kind {
                RedirKind::Normal(_) => SyntaxError::MissingRedirOperand,
                RedirKind::HereDoc { .. } => SyntaxError::MissingHereDocDelimiter,
            };
            return Err(Error {
                cause: cause.into(),
                location: operand.word.location.clone(),
            });
        };

        let body = match kind {
            RedirKind::Normal(operator) => {
                let mut operand = operand.word;
                operand.parse_tilde_front();
                RedirBody::Normal { operator, operand }
            }
            RedirKind::HereDoc { remove_tabs } => {
                let here_doc = Rc::new(HereDoc {
                    delimiter: operand.word,
                    remove_tabs,
                    content: OnceCell::new(),
                });
                self.memorize_unread_here_doc(Rc::clone(&here_doc));
                RedirBody::HereDoc(here_doc)
            }
        };

        Ok(Some(Redir { fd, body }))
    }

    /// Parses redirections following a compound command.
    pub fn redirections(&mut self) -> Result<Vec<Redir>> {
        let mut redirs = Vec::new();
        while let Some(redir) = self.redirection()? {
            redirs.push(redir);
        }
        Ok(redirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Result<Option<Redir>> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.redirection()
    }

    #[test]
    fn output_redirection() {
        let redir = parse("> file").unwrap().unwrap();
        assert_eq!(redir.fd, None);
        assert_eq!(redir.fd_or_default(), Fd::STDOUT);
        assert_matches!(redir.body, RedirBody::Normal { operator, operand } => {
            assert_eq!(operator, RedirOp::FileOut);
            assert_eq!(operand.to_string(), "file");
        });
    }

    #[test]
    fn input_with_explicit_fd() {
        let redir = parse("3< data").unwrap().unwrap();
        assert_eq!(redir.fd, Some(Fd(3)));
        assert_matches!(redir.body, RedirBody::Normal { operator, .. } => {
            assert_eq!(operator, RedirOp::FileIn);
        });
    }

    #[test]
    fn fd_duplication() {
        let redir = parse("2>&1").unwrap().unwrap();
        assert_eq!(redir.fd, Some(Fd(2)));
        assert_matches!(redir.body, RedirBody::Normal { operator, operand } => {
            assert_eq!(operator, RedirOp::FdOut);
            assert_eq!(operand.to_string(), "1");
        });
    }

    #[test]
    fn here_string() {
        let redir = parse("<<< word").unwrap().unwrap();
        assert_matches!(redir.body, RedirBody::Normal { operator, .. } => {
            assert_eq!(operator, RedirOp::HereString);
        });
    }

    #[test]
    fn out_err_redirection() {
        let redir = parse("&> log").unwrap().unwrap();
        assert_matches!(redir.body, RedirBody::Normal { operator, .. } => {
            assert_eq!(operator, RedirOp::OutErr);
        });
    }

    #[test]
    fn here_doc_operator_is_memorized() {
        let mut lexer = Lexer::from_memory("<<EOF x\nbody\nEOF\n", Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        let redir = parser.redirection().unwrap().unwrap();
        assert_matches!(&redir.body, RedirBody::HereDoc(here_doc) => {
            assert_eq!(here_doc.delimiter.to_string(), "EOF");
            assert!(!here_doc.remove_tabs);
        });
        // The content is not read until the newline is consumed.
        assert_matches!(&redir.body, RedirBody::HereDoc(here_doc) => {
            assert!(here_doc.content.get().is_none());
        });
    }

    #[test]
    fn missing_operand() {
        let error = parse(">").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::MissingRedirOperand)
        );
        assert!(error.needs_more_input());
    }

    #[test]
    fn operator_after_operand_is_not_consumed() {
        let mut lexer = Lexer::from_memory("< a < b", Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.redirection().unwrap().unwrap();
        let second = parser.redirection().unwrap().unwrap();
        assert_matches!(second.body, RedirBody::Normal { operand, .. } => {
            assert_eq!(operand.to_string(), "b");
        });
    }

    #[test]
    fn not_a_redirection() {
        assert!(parse("word").unwrap().is_none());
        assert!(parse("&& x").unwrap().is_none());
    }
}
