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

//! Tokenization of arithmetic expressions

use std::ops::Range;
use thiserror::Error;

/// Operator token
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `|`
    Bar,
    /// `||`
    BarBar,
    /// `|=`
    BarEqual,
    /// `^`
    Caret,
    /// `^=`
    CaretEqual,
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `&=`
    AndEqual,
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `!`
    Bang,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `<<`
    LessLess,
    /// `<<=`
    LessLessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `>>`
    GreaterGreater,
    /// `>>=`
    GreaterGreaterEqual,
    /// `+`
    Plus,
    /// `++`
    PlusPlus,
    /// `+=`
    PlusEqual,
    /// `-`
    Minus,
    /// `--`
    MinusMinus,
    /// `-=`
    MinusEqual,
    /// `*`
    Asterisk,
    /// `**`
    AsteriskAsterisk,
    /// `*=`
    AsteriskEqual,
    /// `/`
    Slash,
    /// `/=`
    SlashEqual,
    /// `%`
    Percent,
    /// `%=`
    PercentEqual,
    /// `~`
    Tilde,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
}

/// Cause of a tokenization error
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum TokenError {
    /// A character that cannot start any token
    #[error("invalid character in arithmetic expression")]
    InvalidCharacter,
    /// A numeric constant containing invalid digits
    #[error("invalid numeric constant")]
    InvalidNumber,
}

/// Tokenization error with its position
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    pub cause: TokenError,
    pub location: Range<usize>,
}

/// Unit of the expression as seen by the evaluator
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenValue<'a> {
    /// Integer constant
    Number(i64),
    /// Identifier naming a variable
    Identifier(&'a str),
    /// Operator or punctuation
    Operator(Operator),
}

/// Token with its position in the expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub value: TokenValue<'a>,
    pub location: Range<usize>,
}

/// Iterator decomposing an expression into tokens
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Tokens<'a> {
    /// Creates a tokenizer over the given expression.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Tokens { source, index: 0 }
    }

    /// Returns the next token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<Result<Token<'a>, Error>> {
        self.clone().next()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.index..]
    }

    fn operator(&mut self) -> Option<Operator> {
        use Operator::*;
        // Longest operators first so that `<<=` beats `<<` beats `<`.
        const TABLE: &[(&str, Operator)] = &[
            ("<<=", LessLessEqual),
            (">>=", GreaterGreaterEqual),
            ("**", AsteriskAsterisk),
            ("||", BarBar),
            ("&&", AndAnd),
            ("==", EqualEqual),
            ("!=", BangEqual),
            ("<=", LessEqual),
            (">=", GreaterEqual),
            ("<<", LessLess),
            (">>", GreaterGreater),
            ("++", PlusPlus),
            ("--", MinusMinus),
            ("+=", PlusEqual),
            ("-=", MinusEqual),
            ("*=", AsteriskEqual),
            ("/=", SlashEqual),
            ("%=", PercentEqual),
            ("&=", AndEqual),
            ("|=", BarEqual),
            ("^=", CaretEqual),
            ("?", Question),
            (":", Colon),
            (",", Comma),
            ("|", Bar),
            ("^", Caret),
            ("&", And),
            ("=", Equal),
            ("!", Bang),
            ("<", Less),
            (">", Greater),
            ("+", Plus),
            ("-", Minus),
            ("*", Asterisk),
            ("/", Slash),
            ("%", Percent),
            ("~", Tilde),
            ("(", OpenParen),
            (")", CloseParen),
        ];
        let rest = self.rest();
        for &(text, op) in TABLE {
            if rest.starts_with(text) {
                self.index += text.len();
                return Some(op);
            }
        }
        None
    }

    fn number(&mut self) -> Result<i64, TokenError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let text = &rest[..len];
        self.index += len;

        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
        {
            i64::from_str_radix(hex, 16)
        } else if text != "0" && text.starts_with('0') {
            i64::from_str_radix(&text[1..], 8)
        } else {
            text.parse()
        };
        parsed.map_err(|_| TokenError::InvalidNumber)
    }

    fn identifier(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        self.index += len;
        &rest[..len]
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let blanks = self
            .rest()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or_else(|| self.rest().len());
        self.index += blanks;

        let start = self.index;
        let c = self.rest().chars().next()?;
        let result = if c.is_ascii_digit() {
            match self.number() {
                Ok(n) => Ok(TokenValue::Number(n)),
                Err(cause) => Err(cause),
            }
        } else if c.is_ascii_alphabetic() || c == '_' {
            Ok(TokenValue::Identifier(self.identifier()))
        } else {
            match self.operator() {
                Some(op) => Ok(TokenValue::Operator(op)),
                None => {
                    self.index += c.len_utf8();
                    Err(TokenError::InvalidCharacter)
                }
            }
        };

        let location = start..self.index;
        Some(match result {
            Ok(value) => Ok(Token { value, location }),
            Err(cause) => Err(Error { cause, location }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(source: &str) -> Vec<TokenValue<'_>> {
        Tokens::new(source).map(|r| r.unwrap().value).collect()
    }

    #[test]
    fn numbers() {
        assert_eq!(values("42"), [TokenValue::Number(42)]);
        assert_eq!(values("0"), [TokenValue::Number(0)]);
        assert_eq!(values("010"), [TokenValue::Number(8)]);
        assert_eq!(values("0x1F"), [TokenValue::Number(31)]);
    }

    #[test]
    fn bad_octal_digit() {
        let error = Tokens::new("08").next().unwrap().unwrap_err();
        assert_eq!(error.cause, TokenError::InvalidNumber);
        assert_eq!(error.location, 0..2);
    }

    #[test]
    fn identifiers_and_operators() {
        assert_eq!(
            values("a+b"),
            [
                TokenValue::Identifier("a"),
                TokenValue::Operator(Operator::Plus),
                TokenValue::Identifier("b"),
            ]
        );
    }

    #[test]
    fn greedy_operator_matching() {
        assert_eq!(
            values("a<<=b"),
            [
                TokenValue::Identifier("a"),
                TokenValue::Operator(Operator::LessLessEqual),
                TokenValue::Identifier("b"),
            ]
        );
        assert_eq!(
            values("1**2"),
            [
                TokenValue::Number(1),
                TokenValue::Operator(Operator::AsteriskAsterisk),
                TokenValue::Number(2),
            ]
        );
    }

    #[test]
    fn locations() {
        let tokens: Vec<_> = Tokens::new(" x + 1").map(|r| r.unwrap()).collect();
        assert_eq!(tokens[0].location, 1..2);
        assert_eq!(tokens[1].location, 3..4);
        assert_eq!(tokens[2].location, 5..6);
    }

    #[test]
    fn invalid_character() {
        let error = Tokens::new("#").next().unwrap().unwrap_err();
        assert_eq!(error.cause, TokenError::InvalidCharacter);
    }
}
