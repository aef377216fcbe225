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

//! Syntax parser for the case command

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{Case, Esac, In};
use super::lex::Operator::{
    Bar, CloseParen, OpenParen, SemicolonAnd, SemicolonSemicolon, SemicolonSemicolonAnd,
};
use super::lex::TokenId::{Operator, Token};
use crate::syntax::{CaseContinuation, CaseItem, CompoundCommand};

impl Parser<'_> {
    /// Parses a case command, starting at the `case` token.
    pub fn case_command(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(Case)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let subject = self.take_token_auto(&[])?;
        let Token(_) = subject.id else {
            let cause = if subject.id == super::lex::TokenId::EndOfInput {
                SyntaxError::MissingCaseSubject
            } else {
                SyntaxError::InvalidCaseSubject
            };
            return Err(Error {
                cause: cause.into(),
                location: subject.word.location.clone(),
            });
        };
        let mut subject = subject.word;
        subject.parse_tilde_front();

        self.skip_newlines()?;
        let token = self.peek_token()?;
        if token.id != Token(Some(In)) {
            let location = token.word.location.clone();
            return Err(Error {
                cause: SyntaxError::MissingIn { opening_location }.into(),
                location,
            });
        }
        self.take_token_raw()?;

        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;

            // `esac` closes the command unless parenthesized as a pattern.
            if self.peek_token()?.id == Token(Some(Esac)) {
                self.take_token_raw()?;
                break;
            }
            if self.peek_token()?.id == Operator(OpenParen) {
                self.take_token_raw()?;
            }

            let patterns = self.case_patterns()?;
            let body = self.maybe_compound_list()?;

            let token = self.peek_token()?;
            let continuation = match token.id {
                Operator(SemicolonSemicolon) => CaseContinuation::Break,
                Operator(SemicolonAnd) => CaseContinuation::FallThrough,
                Operator(SemicolonSemicolonAnd) => CaseContinuation::Continue,
                Token(Some(Esac)) => {
                    self.take_token_raw()?;
                    items.push(CaseItem {
                        patterns,
                        body,
                        continuation: CaseContinuation::Break,
                    });
                    return Ok(CompoundCommand::Case { subject, items });
                }
                _ => {
                    let location = token.word.location.clone();
                    return Err(Error {
                        cause: SyntaxError::UnclosedCase { opening_location }.into(),
                        location,
                    });
                }
            };
            self.take_token_raw()?;
            items.push(CaseItem {
                patterns,
                body,
                continuation,
            });
        }

        Ok(CompoundCommand::Case { subject, items })
    }

    /// Parses the pattern list of a case item, up to the closing `)`.
    fn case_patterns(&mut self) -> Result<Vec<crate::syntax::Word>> {
        let mut patterns = Vec::new();
        loop {
            let token = self.take_token_raw()?;
            let Token(_) = token.id else {
                let cause = if token.id == Operator(CloseParen) && patterns.is_empty() {
                    SyntaxError::MissingPattern
                } else if patterns.is_empty() {
                    SyntaxError::MissingPattern
                } else {
                    SyntaxError::InvalidPattern
                };
                return Err(Error {
                    cause: cause.into(),
                    location: token.word.location.clone(),
                });
            };
            let mut pattern = token.word;
            pattern.parse_tilde_front();
            patterns.push(pattern);

            let token = self.peek_token()?;
            match token.id {
                Operator(Bar) => {
                    self.take_token_raw()?;
                }
                Operator(CloseParen) => {
                    self.take_token_raw()?;
                    return Ok(patterns);
                }
                _ => {
                    let location = token.word.location.clone();
                    return Err(Error {
                        cause: SyntaxError::UnclosedPatternList.into(),
                        location,
                    });
                }
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

    fn parse(code: &str) -> Result<CompoundCommand> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        parser.compound_command()
    }

    #[test]
    fn simple_case() {
        let command = parse("case $x in (a) one;; (b) two;; esac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].continuation, CaseContinuation::Break);
        });
    }

    #[test]
    fn patterns_without_open_paren() {
        let command = parse("case x in a|b) y;; esac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items[0].patterns.len(), 2);
        });
    }

    #[test]
    fn terminators() {
        let command = parse("case x in (a) y;& (b) z;;& (c) w;; esac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items[0].continuation, CaseContinuation::FallThrough);
            assert_eq!(items[1].continuation, CaseContinuation::Continue);
            assert_eq!(items[2].continuation, CaseContinuation::Break);
        });
    }

    #[test]
    fn last_item_without_terminator() {
        let command = parse("case x in (a) y\nesac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items.len(), 1);
        });
    }

    #[test]
    fn empty_case() {
        let command = parse("case x in esac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert!(items.is_empty());
        });
    }

    #[test]
    fn empty_item_bodies() {
        let command = parse("case x in (a) ;; (b) ;; esac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items.len(), 2);
            assert!(items[0].body.0.is_empty());
        });
    }

    #[test]
    fn multiline_case() {
        let command = parse("case x in\n(a)\ny\n;;\nesac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items.len(), 1);
        });
    }

    #[test]
    fn esac_as_pattern_with_paren() {
        let command = parse("case x in (esac) y;; esac").unwrap();
        assert_matches!(command, CompoundCommand::Case { items, .. } => {
            assert_eq!(items[0].patterns[0].to_string(), "esac");
        });
    }

    #[test]
    fn missing_in() {
        let error = parse("case x (a) y;; esac").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::MissingIn { .. })
        );
    }

    #[test]
    fn unclosed_case_needs_more_input() {
        let error = parse("case x in (a) y;;").unwrap_err();
        assert!(error.needs_more_input());
    }
}
