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

//! Top level of the lexer: recognizing whole tokens

use super::core::{is_blank, Lexer, Token, TokenId};
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::Word;

/// Tests whether the character delimits a token.
#[must_use]
pub fn is_token_delimiter(c: char) -> bool {
    is_blank(c) || matches!(c, '\n' | '|' | '&' | ';' | '<' | '>' | '(' | ')')
}

impl Lexer {
    /// Parses one token at the current position.
    ///
    /// Blanks and comments before the token must have been skipped with
    /// [`skip_blanks_and_comment`](Self::skip_blanks_and_comment). At the
    /// end of input, the result has [`TokenId::EndOfInput`] and an empty
    /// word.
    pub fn token(&mut self) -> Result<Token> {
        let begin = self.index();

        // `<(` and `>(` start process substitutions, which are words even
        // though they begin with an operator character.
        let procsub = matches!(self.peek_char(), Some('<' | '>'))
            && self.peek_char_after() == Some('(');

        if !procsub {
            if let Some(token) = self.io_number()? {
                return Ok(token);
            }
            if let Some(token) = self.operator()? {
                return Ok(token);
            }
        }

        let word = self.word(&is_token_delimiter)?;
        let id = if word.units.is_empty() {
            TokenId::EndOfInput
        } else {
            TokenId::Token(keyword_of(&word))
        };
        Ok(Token {
            word,
            id,
            index: begin,
        })
    }

    /// Parses an IO_NUMBER token: a digit sequence immediately followed by
    /// `<` or `>`.
    fn io_number(&mut self) -> Result<Option<Token>> {
        if !matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            return Ok(None);
        }

        let begin = self.index();
        let mut digits = String::new();
        while let Some(sc) = self.consume_char_if(|c| c.is_ascii_digit()) {
            digits.push(sc.value);
        }
        if !matches!(self.peek_char(), Some('<' | '>')) {
            self.rewind(begin);
            return Ok(None);
        }

        let fd: i32 = digits.parse().map_err(|_| Error {
            cause: SyntaxError::FdOutOfRange.into(),
            location: self.location_range(begin..self.index()),
        })?;

        let location = self.location_range(begin..self.index());
        let units = digits
            .chars()
            .map(|c| crate::syntax::WordUnit::Unquoted(crate::syntax::TextUnit::Literal(c)))
            .collect();
        Ok(Some(Token {
            word: Word { units, location },
            id: TokenId::IoNumber(fd),
            index: begin,
        }))
    }
}

/// Returns the keyword the word is spelled as, if any.
fn keyword_of(word: &Word) -> Option<super::keyword::Keyword> {
    word.to_string_if_literal()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::{Keyword, Operator};
    use crate::source::Source;

    fn tokens(code: &str) -> Vec<Token> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        let mut result = Vec::new();
        loop {
            lexer.skip_blanks_and_comment().unwrap();
            let token = lexer.token().unwrap();
            if token.id == TokenId::EndOfInput {
                return result;
            }
            result.push(token);
        }
    }

    #[test]
    fn words_and_operators() {
        let ts = tokens("echo hi | cat");
        assert_eq!(ts.len(), 4);
        assert_eq!(ts[0].id, TokenId::Token(None));
        assert_eq!(ts[0].to_string(), "echo");
        assert_eq!(ts[2].id, TokenId::Operator(Operator::Bar));
        assert_eq!(ts[3].to_string(), "cat");
    }

    #[test]
    fn keywords_are_tagged() {
        let ts = tokens("if x");
        assert_eq!(ts[0].id, TokenId::Token(Some(Keyword::If)));
        assert_eq!(ts[1].id, TokenId::Token(None));
    }

    #[test]
    fn io_numbers() {
        let ts = tokens("2> file");
        assert_eq!(ts[0].id, TokenId::IoNumber(2));
        assert_eq!(ts[1].id, TokenId::Operator(Operator::Greater));
        assert_eq!(ts[2].to_string(), "file");
    }

    #[test]
    fn digits_not_followed_by_redirection_are_a_word() {
        let ts = tokens("42 x");
        assert_eq!(ts[0].id, TokenId::Token(None));
        assert_eq!(ts[0].to_string(), "42");
    }

    #[test]
    fn token_indexes() {
        let ts = tokens("ab  cd");
        assert_eq!(ts[0].index, 0);
        assert_eq!(ts[1].index, 4);
    }

    #[test]
    fn comment_is_skipped() {
        let ts = tokens("word # comment");
        assert_eq!(ts.len(), 1);
    }

    #[test]
    fn process_substitution_token_is_a_word() {
        let ts = tokens("<(ls)");
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].id, TokenId::Token(None));
    }
}
