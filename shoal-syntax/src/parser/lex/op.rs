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

//! Part of the lexer that parses operators

use super::core::{Lexer, Token, TokenId};
use crate::parser::core::Result;
use crate::syntax::{Literal, Unquoted, Word};
use std::fmt;

/// Operator token identifier
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    /// Newline
    Newline,
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `&>`
    AndGreater,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `;`
    Semicolon,
    /// `;;`
    SemicolonSemicolon,
    /// `;&`
    SemicolonAnd,
    /// `;;&`
    SemicolonSemicolonAnd,
    /// `<`
    Less,
    /// `<&`
    LessAnd,
    /// `<<`
    LessLess,
    /// `<<-`
    LessLessDash,
    /// `<<<`
    LessLessLess,
    /// `<>`
    LessGreater,
    /// `>`
    Greater,
    /// `>&`
    GreaterAnd,
    /// `>>`
    GreaterGreater,
    /// `>|`
    GreaterBar,
    /// `|`
    Bar,
    /// `||`
    BarBar,
    /// `|&`
    BarAnd,
}

impl Operator {
    /// Returns the string representation of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use Operator::*;
        match self {
            Newline => "\n",
            And => "&",
            AndAnd => "&&",
            AndGreater => "&>",
            OpenParen => "(",
            CloseParen => ")",
            Semicolon => ";",
            SemicolonSemicolon => ";;",
            SemicolonAnd => ";&",
            SemicolonSemicolonAnd => ";;&",
            Less => "<",
            LessAnd => "<&",
            LessLess => "<<",
            LessLessDash => "<<-",
            LessLessLess => "<<<",
            LessGreater => "<>",
            Greater => ">",
            GreaterAnd => ">&",
            GreaterGreater => ">>",
            GreaterBar => ">|",
            Bar => "|",
            BarBar => "||",
            BarAnd => "|&",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trie node defining the set of operator tokens
///
/// A node is a sorted array of [`Edge`]s, binary-searched by character.
#[derive(Copy, Clone, Debug)]
struct Trie(&'static [Edge]);

#[derive(Copy, Clone, Debug)]
struct Edge {
    /// Character consumed by taking this edge
    key: char,
    /// Operator delimited here if no longer match follows
    value: Option<Operator>,
    /// Continuations sharing this prefix
    next: Trie,
}

impl Trie {
    fn edge(&self, key: char) -> Option<&'static Edge> {
        self.0
            .binary_search_by_key(&key, |edge| edge.key)
            .ok()
            .map(|i| &self.0[i])
    }
}

const NONE: Trie = Trie(&[]);

/// Trie of the operators that start with `&`.
const AND: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::AndAnd),
        next: NONE,
    },
    Edge {
        key: '>',
        value: Some(Operator::AndGreater),
        next: NONE,
    },
]);

/// Trie of the operators that start with `;`.
const SEMICOLON: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::SemicolonAnd),
        next: NONE,
    },
    Edge {
        key: ';',
        value: Some(Operator::SemicolonSemicolon),
        next: SEMICOLON_SEMICOLON,
    },
]);

/// Trie of the operators that start with `;;`.
const SEMICOLON_SEMICOLON: Trie = Trie(&[Edge {
    key: '&',
    value: Some(Operator::SemicolonSemicolonAnd),
    next: NONE,
}]);

/// Trie of the operators that start with `<`.
const LESS: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::LessAnd),
        next: NONE,
    },
    Edge {
        key: '<',
        value: Some(Operator::LessLess),
        next: LESS_LESS,
    },
    Edge {
        key: '>',
        value: Some(Operator::LessGreater),
        next: NONE,
    },
]);

/// Trie of the operators that start with `<<`.
const LESS_LESS: Trie = Trie(&[
    Edge {
        key: '-',
        value: Some(Operator::LessLessDash),
        next: NONE,
    },
    Edge {
        key: '<',
        value: Some(Operator::LessLessLess),
        next: NONE,
    },
]);

/// Trie of the operators that start with `>`.
const GREATER: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::GreaterAnd),
        next: NONE,
    },
    Edge {
        key: '>',
        value: Some(Operator::GreaterGreater),
        next: NONE,
    },
    Edge {
        key: '|',
        value: Some(Operator::GreaterBar),
        next: NONE,
    },
]);

/// Trie of the operators that start with `|`.
const BAR: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::BarAnd),
        next: NONE,
    },
    Edge {
        key: '|',
        value: Some(Operator::BarBar),
        next: NONE,
    },
]);

/// Trie containing all the operators.
const OPERATORS: Trie = Trie(&[
    Edge {
        key: '\n',
        value: Some(Operator::Newline),
        next: NONE,
    },
    Edge {
        key: '&',
        value: Some(Operator::And),
        next: AND,
    },
    Edge {
        key: '(',
        value: Some(Operator::OpenParen),
        next: NONE,
    },
    Edge {
        key: ')',
        value: Some(Operator::CloseParen),
        next: NONE,
    },
    Edge {
        key: ';',
        value: Some(Operator::Semicolon),
        next: SEMICOLON,
    },
    Edge {
        key: '<',
        value: Some(Operator::Less),
        next: LESS,
    },
    Edge {
        key: '>',
        value: Some(Operator::Greater),
        next: GREATER,
    },
    Edge {
        key: '|',
        value: Some(Operator::Bar),
        next: BAR,
    },
]);

/// Tests whether the character starts an operator.
#[must_use]
pub fn is_operator_start(c: char) -> bool {
    OPERATORS.edge(c).is_some()
}

impl Lexer {
    /// Parses an operator token at the current position, if any.
    ///
    /// Matching is greedy: the longest operator wins, so `&&` beats `&` and
    /// `<<-` beats `<<`.
    pub fn operator(&mut self) -> Result<Option<Token>> {
        let begin = self.index();
        let mut trie = OPERATORS;
        let mut longest: Option<(Operator, usize)> = None;

        while let Some(c) = self.peek_char() {
            let Some(edge) = trie.edge(c) else {
                break;
            };
            self.consume_char();
            if let Some(op) = edge.value {
                longest = Some((op, self.index()));
            }
            trie = edge.next;
        }

        let Some((operator, end)) = longest else {
            self.rewind(begin);
            return Ok(None);
        };
        self.rewind(end);

        let location = self.location_range(begin..end);
        let units = operator
            .as_str()
            .chars()
            .map(|c| Unquoted(Literal(c)))
            .collect();
        let word = Word { units, location };
        Ok(Some(Token {
            word,
            id: TokenId::Operator(operator),
            index: begin,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    fn lex_operator(code: &str) -> Option<Operator> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        match lexer.operator().unwrap()?.id {
            TokenId::Operator(op) => Some(op),
            _ => None,
        }
    }

    #[test]
    fn single_character_operators() {
        assert_eq!(lex_operator(";"), Some(Operator::Semicolon));
        assert_eq!(lex_operator("("), Some(Operator::OpenParen));
        assert_eq!(lex_operator("\n"), Some(Operator::Newline));
        assert_eq!(lex_operator("x"), None);
    }

    #[test]
    fn greedy_matching() {
        assert_eq!(lex_operator("&&"), Some(Operator::AndAnd));
        assert_eq!(lex_operator("&x"), Some(Operator::And));
        assert_eq!(lex_operator(">>"), Some(Operator::GreaterGreater));
        assert_eq!(lex_operator("<<-"), Some(Operator::LessLessDash));
        assert_eq!(lex_operator("<<<"), Some(Operator::LessLessLess));
        assert_eq!(lex_operator(";;&"), Some(Operator::SemicolonSemicolonAnd));
        assert_eq!(lex_operator(";&"), Some(Operator::SemicolonAnd));
        assert_eq!(lex_operator("|&"), Some(Operator::BarAnd));
        assert_eq!(lex_operator("&>"), Some(Operator::AndGreater));
    }

    #[test]
    fn operator_split_by_line_continuation() {
        let mut lexer = Lexer::from_memory("&\\\n&", Source::Unknown);
        let token = lexer.operator().unwrap().unwrap();
        assert_eq!(token.id, TokenId::Operator(Operator::AndAnd));
    }

    #[test]
    fn remaining_input_after_operator() {
        let mut lexer = Lexer::from_memory(">>rest", Source::Unknown);
        let token = lexer.operator().unwrap().unwrap();
        assert_eq!(token.id, TokenId::Operator(Operator::GreaterGreater));
        assert_eq!(lexer.peek_char(), Some('r'));
    }
}
