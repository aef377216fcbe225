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

//! Syntax parser for the conditional command (`[[ ... ]]`)

use super::core::{Parser, Result};
use super::error::{Error, SyntaxError};
use super::lex::Keyword::{Bang, CloseBracketBracket, OpenBracketBracket};
use super::lex::Operator::{AndAnd, BarBar, CloseParen, Greater, Less, OpenParen};
use super::lex::TokenId::{EndOfInput, Operator, Token};
use crate::syntax::{CompoundCommand, TestBinaryOp, TestExpr, TestUnaryOp, Word};

/// Maps a word to the unary operator it spells, if any.
fn unary_op(word: &Word) -> Option<TestUnaryOp> {
    use TestUnaryOp::*;
    Some(match word.to_string_if_literal()?.as_str() {
        "-n" => NonEmpty,
        "-z" => Empty,
        "-e" => Exists,
        "-f" => IsFile,
        "-d" => IsDir,
        "-r" => Readable,
        "-w" => Writable,
        "-x" => Executable,
        "-s" => NonEmptyFile,
        _ => return None,
    })
}

/// Maps a word to the binary operator it spells, if any.
///
/// `Err(())` means the word is a known but unsupported operator.
fn binary_op(word: &Word) -> std::result::Result<Option<TestBinaryOp>, ()> {
    use TestBinaryOp::*;
    let Some(literal) = word.to_string_if_literal() else {
        return Ok(None);
    };
    Ok(Some(match literal.as_str() {
        "=" | "==" => Match,
        "!=" => NoMatch,
        "-eq" => Eq,
        "-ne" => Ne,
        "-lt" => Lt,
        "-le" => Le,
        "-gt" => Gt,
        "-ge" => Ge,
        "=~" => return Err(()),
        _ => return Ok(None),
    }))
}

impl Parser<'_> {
    /// Parses a conditional command, starting at the `[[` token.
    pub fn double_bracket(&mut self) -> Result<CompoundCommand> {
        debug_assert_eq!(self.peek_token()?.id, Token(Some(OpenBracketBracket)));
        let open = self.take_token_raw()?;
        let opening_location = open.word.location;

        let expr = self.test_or()?;

        self.skip_newlines()?;
        let close = self.peek_token()?;
        if close.id != Token(Some(CloseBracketBracket)) {
            let location = close.word.location.clone();
            let cause = if close.id == EndOfInput {
                SyntaxError::UnclosedDoubleBracket {
                    opening_location: opening_location.clone(),
                }
            } else {
                SyntaxError::InvalidTestExpression
            };
            return Err(Error {
                cause: cause.into(),
                location,
            });
        }
        self.take_token_raw()?;

        let location = opening_location;
        Ok(CompoundCommand::DoubleBracket { expr, location })
    }

    fn test_or(&mut self) -> Result<TestExpr> {
        let mut expr = self.test_and()?;
        loop {
            self.skip_newlines()?;
            if self.peek_token()?.id != Operator(BarBar) {
                return Ok(expr);
            }
            self.take_token_raw()?;
            self.skip_newlines()?;
            let rhs = self.test_and()?;
            expr = TestExpr::Or(Box::new(expr), Box::new(rhs));
        }
    }

    fn test_and(&mut self) -> Result<TestExpr> {
        let mut expr = self.test_not()?;
        loop {
            self.skip_newlines()?;
            if self.peek_token()?.id != Operator(AndAnd) {
                return Ok(expr);
            }
            self.take_token_raw()?;
            self.skip_newlines()?;
            let rhs = self.test_not()?;
            expr = TestExpr::And(Box::new(expr), Box::new(rhs));
        }
    }

    fn test_not(&mut self) -> Result<TestExpr> {
        if self.peek_token()?.id == Token(Some(Bang)) {
            self.take_token_raw()?;
            let inner = self.test_not()?;
            return Ok(TestExpr::Not(Box::new(inner)));
        }
        self.test_primary()
    }

    fn test_primary(&mut self) -> Result<TestExpr> {
        self.skip_newlines()?;
        let token = self.peek_token()?;
        match token.id {
            Operator(OpenParen) => {
                self.take_token_raw()?;
                let inner = self.test_or()?;
                self.skip_newlines()?;
                let close = self.peek_token()?;
                if close.id != Operator(CloseParen) {
                    let location = close.word.location.clone();
                    return Err(Error {
                        cause: SyntaxError::InvalidTestExpression.into(),
                        location,
                    });
                }
                self.take_token_raw()?;
                Ok(TestExpr::Paren(Box::new(inner)))
            }
            Token(Some(CloseBracketBracket)) | EndOfInput => {
                let location = token.word.location.clone();
                Err(Error {
                    cause: if token.id == EndOfInput {
                        SyntaxError::UnclosedDoubleBracket {
                            opening_location: location.clone(),
                        }
                        .into()
                    } else {
                        SyntaxError::InvalidTestExpression.into()
                    },
                    location,
                })
            }
            Token(_) => {
                let token = self.take_token_raw()?;
                if let Some(op) = unary_op(&token.word) {
                    let operand = self.test_word()?;
                    return Ok(TestExpr::Unary(op, operand));
                }
                let lhs = token.word;
                self.test_binary_tail(lhs)
            }
            _ => {
                let location = token.word.location.clone();
                Err(Error {
                    cause: SyntaxError::InvalidTestExpression.into(),
                    location,
                })
            }
        }
    }

    /// Parses the optional binary operator and right operand after `lhs`.
    fn test_binary_tail(&mut self, lhs: Word) -> Result<TestExpr> {
        let token = self.peek_token()?;
        let op = match token.id {
            Operator(Less) => Some(TestBinaryOp::StringLess),
            Operator(Greater) => Some(TestBinaryOp::StringGreater),
            Token(_) => match binary_op(&token.word) {
                Ok(op) => op,
                Err(()) => {
                    let location = token.word.location.clone();
                    return Err(Error {
                        cause: SyntaxError::UnsupportedTestOperator.into(),
                        location,
                    });
                }
            },
            _ => None,
        };
        let Some(op) = op else {
            return Ok(TestExpr::Str(lhs));
        };
        self.take_token_raw()?;
        let rhs = self.test_word()?;
        Ok(TestExpr::Binary(op, lhs, rhs))
    }

    /// Takes a word operand inside `[[ ]]`.
    fn test_word(&mut self) -> Result<Word> {
        let token = self.take_token_raw()?;
        match token.id {
            Token(Some(CloseBracketBracket)) | EndOfInput => Err(Error {
                cause: if token.id == EndOfInput {
                    SyntaxError::UnclosedDoubleBracket {
                        opening_location: token.word.location.clone(),
                    }
                    .into()
                } else {
                    SyntaxError::InvalidTestExpression.into()
                },
                location: token.word.location.clone(),
            }),
            Token(_) => Ok(token.word),
            _ => Err(Error {
                cause: SyntaxError::InvalidTestExpression.into(),
                location: token.word.location.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Result<TestExpr> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        match parser.compound_command()? {
            CompoundCommand::DoubleBracket { expr, .. } => Ok(expr),
            other => panic!("not a double bracket: {other:?}"),
        }
    }

    #[test]
    fn bare_word() {
        let expr = parse("[[ hello ]]").unwrap();
        assert_matches!(expr, TestExpr::Str(word) => {
            assert_eq!(word.to_string(), "hello");
        });
    }

    #[test]
    fn unary_operators() {
        let expr = parse("[[ -z $x ]]").unwrap();
        assert_matches!(expr, TestExpr::Unary(TestUnaryOp::Empty, _));

        let expr = parse("[[ -f /etc/passwd ]]").unwrap();
        assert_matches!(expr, TestExpr::Unary(TestUnaryOp::IsFile, _));
    }

    #[test]
    fn binary_operators() {
        let expr = parse("[[ $x == a* ]]").unwrap();
        assert_matches!(expr, TestExpr::Binary(TestBinaryOp::Match, _, rhs) => {
            assert_eq!(rhs.to_string(), "a*");
        });

        let expr = parse("[[ 1 -lt 2 ]]").unwrap();
        assert_matches!(expr, TestExpr::Binary(TestBinaryOp::Lt, _, _));

        let expr = parse("[[ a < b ]]").unwrap();
        assert_matches!(expr, TestExpr::Binary(TestBinaryOp::StringLess, _, _));
    }

    #[test]
    fn logical_connectives() {
        let expr = parse("[[ a && b || c ]]").unwrap();
        assert_matches!(expr, TestExpr::Or(lhs, _) => {
            assert_matches!(*lhs, TestExpr::And(_, _));
        });
    }

    #[test]
    fn negation_and_parens() {
        let expr = parse("[[ ! ( a && b ) ]]").unwrap();
        assert_matches!(expr, TestExpr::Not(inner) => {
            assert_matches!(*inner, TestExpr::Paren(_));
        });
    }

    #[test]
    fn regex_operator_is_unsupported() {
        let error = parse("[[ x =~ y ]]").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnsupportedTestOperator)
        );
    }

    #[test]
    fn unclosed_double_bracket() {
        let error = parse("[[ x").unwrap_err();
        assert!(error.needs_more_input());
    }
}
