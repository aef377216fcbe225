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

//! Part of the lexer that parses [`Word`]s

use super::core::Lexer;
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::WordUnit::{self, DollarSingleQuote, DoubleQuote, ProcSubst, SingleQuote, Unquoted};
use crate::syntax::{ProcSubstDirection, Word};

impl Lexer {
    /// Parses one word unit at the current position.
    ///
    /// `is_delimiter` decides which unquoted characters end the word.
    pub fn word_unit(&mut self, is_delimiter: &dyn Fn(char) -> bool) -> Result<Option<WordUnit>> {
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };
        match c {
            '\'' => self.single_quote().map(Some),
            '"' => self.double_quote().map(Some),
            '$' if self.peek_char_after() == Some('\'') => {
                self.dollar_single_quote().map(|s| Some(DollarSingleQuote(s)))
            }
            '<' | '>' if self.peek_char_after() == Some('(') => {
                self.process_substitution(c).map(Some)
            }
            c if is_delimiter(c) => Ok(None),
            _ => self
                .text_unit(is_delimiter, &|_| true)
                .map(|unit| unit.map(Unquoted)),
        }
    }

    /// Parses a word, a possibly empty sequence of word units.
    pub fn word(&mut self, is_delimiter: &dyn Fn(char) -> bool) -> Result<Word> {
        let begin = self.index();
        let mut units = Vec::new();
        while let Some(unit) = self.word_unit(is_delimiter)? {
            units.push(unit);
        }
        let location = self.location_range(begin..self.index());
        Ok(Word { units, location })
    }

    fn single_quote(&mut self) -> Result<WordUnit> {
        let begin = self.index();
        debug_assert_eq!(self.peek_char(), Some('\''));
        self.consume_char();

        self.with_line_continuation_disabled(|lexer| {
            let mut content = String::new();
            loop {
                match lexer.peek_char_raw() {
                    None => {
                        let opening_location = lexer.location_range(begin..begin + 1);
                        return Err(Error {
                            cause: SyntaxError::UnclosedSingleQuote { opening_location }.into(),
                            location: lexer.location(),
                        });
                    }
                    Some('\'') => {
                        lexer.consume_char();
                        return Ok(SingleQuote(content));
                    }
                    Some(c) => {
                        lexer.consume_char();
                        content.push(c);
                    }
                }
            }
        })
    }

    fn double_quote(&mut self) -> Result<WordUnit> {
        let begin = self.index();
        debug_assert_eq!(self.peek_char(), Some('"'));
        self.consume_char();

        let text = self.text(&|c| c == '"', &|c| matches!(c, '$' | '`' | '"' | '\\'))?;

        if self.peek_char() != Some('"') {
            let opening_location = self.location_range(begin..begin + 1);
            return Err(Error {
                cause: SyntaxError::UnclosedDoubleQuote { opening_location }.into(),
                location: self.location(),
            });
        }
        self.consume_char();
        Ok(DoubleQuote(text))
    }

    fn process_substitution(&mut self, direction_char: char) -> Result<WordUnit> {
        let begin = self.index();
        self.consume_char();
        debug_assert_eq!(self.peek_char(), Some('('));
        self.consume_char();

        let content = self.inner_program()?;

        if self.peek_char() != Some(')') {
            let opening_location = self.location_range(begin..begin + 2);
            return Err(Error {
                cause: SyntaxError::UnclosedProcSubst { opening_location }.into(),
                location: self.location(),
            });
        }
        self.consume_char();

        let direction = if direction_char == '<' {
            ProcSubstDirection::In
        } else {
            ProcSubstDirection::Out
        };
        let location = self.location_range(begin..self.index());
        Ok(ProcSubst {
            direction,
            content: content.into(),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::is_blank;
    use crate::source::Source;
    use crate::syntax::TextUnit::*;
    use assert_matches::assert_matches;

    fn is_delimiter(c: char) -> bool {
        is_blank(c) || matches!(c, '\n' | '|' | '&' | ';' | '<' | '>' | '(' | ')')
    }

    fn lex_word(code: &str) -> Result<Word> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.word(&is_delimiter)
    }

    #[test]
    fn plain_word() {
        let word = lex_word("hello world").unwrap();
        assert_eq!(word.to_string(), "hello");
        assert_eq!(word.location.range, 0..5);
    }

    #[test]
    fn quotes_in_word() {
        let word = lex_word(r#"a'b c'"d e""#).unwrap();
        assert_eq!(
            word.units,
            [
                Unquoted(Literal('a')),
                SingleQuote("b c".to_string()),
                DoubleQuote(crate::syntax::Text(vec![
                    Literal('d'),
                    Literal(' '),
                    Literal('e'),
                ])),
            ]
        );
    }

    #[test]
    fn newline_inside_single_quotes() {
        let word = lex_word("'a\nb'").unwrap();
        assert_eq!(word.units, [SingleQuote("a\nb".to_string())]);
    }

    #[test]
    fn backslash_in_single_quotes_is_literal() {
        let word = lex_word(r"'a\'").unwrap();
        assert_eq!(word.units, [SingleQuote(r"a\".to_string())]);
    }

    #[test]
    fn escaped_delimiter_continues_word() {
        let word = lex_word(r"a\ b").unwrap();
        assert_eq!(
            word.units,
            [
                Unquoted(Literal('a')),
                Unquoted(Backslashed(' ')),
                Unquoted(Literal('b')),
            ]
        );
    }

    #[test]
    fn dollar_single_quote_unit() {
        let word = lex_word(r"$'x\n'").unwrap();
        assert_matches!(&word.units[0], DollarSingleQuote(_));
    }

    #[test]
    fn process_substitutions() {
        let word = lex_word("<(ls -l)").unwrap();
        assert_matches!(&word.units[0], ProcSubst { direction, content, .. } => {
            assert_eq!(*direction, ProcSubstDirection::In);
            assert_eq!(&**content, "ls -l");
        });

        let word = lex_word(">(cat)").unwrap();
        assert_matches!(&word.units[0], ProcSubst { direction, .. } => {
            assert_eq!(*direction, ProcSubstDirection::Out);
        });
    }

    #[test]
    fn process_substitution_mid_word() {
        let word = lex_word("a<(b)c").unwrap();
        assert_eq!(word.units.len(), 3);
        assert_matches!(&word.units[1], ProcSubst { .. });
        assert_eq!(word.units[2], Unquoted(Literal('c')));
    }

    #[test]
    fn unclosed_double_quote() {
        let error = lex_word("\"abc").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedDoubleQuote { .. })
        );
        assert!(error.needs_more_input());
    }

    #[test]
    fn empty_word_at_delimiter() {
        let word = lex_word("|x").unwrap();
        assert_eq!(word.units, []);
    }
}
