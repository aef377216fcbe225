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

//! `FromStr` implementations for syntax types
//!
//! These parse source code of [unknown](crate::source::Source::Unknown)
//! origin, which is convenient in tests and for re-parsing generated code.

use super::core::{Parser, Rec, Result};
use super::error::{Error, SyntaxError};
use super::lex::{is_token_delimiter, Lexer};
use crate::source::Source;
use crate::syntax::{Command, List, Word};
use std::str::FromStr;

/// Ensures the lexer has reached the end of input.
fn ensure_eof(lexer: &mut Lexer) -> Result<()> {
    match lexer.peek_char() {
        None => Ok(()),
        Some(_) => Err(Error {
            cause: SyntaxError::RedundantToken.into(),
            location: lexer.location(),
        }),
    }
}

impl FromStr for Word {
    type Err = Error;
    fn from_str(s: &str) -> Result<Word> {
        let mut lexer = Lexer::from_memory(s, Source::Unknown);
        let word = lexer.word(&is_token_delimiter)?;
        ensure_eof(&mut lexer)?;
        Ok(word)
    }
}

impl FromStr for Command {
    type Err = Error;
    fn from_str(s: &str) -> Result<Command> {
        let mut lexer = Lexer::from_memory(s, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        let command = loop {
            match parser.command()? {
                Rec::AliasSubstituted => continue,
                Rec::Parsed(command) => break command,
            }
        };
        let location = parser.peek_token()?.word.location.clone();
        parser.ensure_no_unread_here_doc()?;
        match command {
            Some(command) => Ok(command),
            None => Err(Error {
                cause: SyntaxError::InvalidCommandToken.into(),
                location,
            }),
        }
    }
}

impl FromStr for List {
    type Err = Error;
    fn from_str(s: &str) -> Result<List> {
        let mut lexer = Lexer::from_memory(s, Source::Unknown);
        let mut parser = Parser::new(&mut lexer);
        let list = parser.maybe_compound_list()?;
        let token = parser.peek_token()?;
        if token.id != super::lex::TokenId::EndOfInput {
            return Err(Error {
                cause: SyntaxError::RedundantToken.into(),
                location: token.word.location.clone(),
            });
        }
        parser.ensure_no_unread_here_doc()?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_from_str() {
        let word: Word = "'hello world'".parse().unwrap();
        assert_eq!(word.to_string(), "'hello world'");
    }

    #[test]
    fn command_from_str() {
        let command: Command = "echo ok".parse().unwrap();
        assert_eq!(command.to_string(), "echo ok");
    }

    #[test]
    fn list_from_str_round_trip() {
        for code in [
            "echo a; echo b",
            "a | b && c",
            "if true; then x; else y; fi",
            "for i in 1 2 3; do echo \"n:$i\"; done",
            "case $x in (a) one;; (b) two;; esac",
            "while read line; do use $line; done",
            "f() { echo hi; }",
            "{ a; b; } >out",
            "(sub shell)",
            "[[ -n $x && $y == z* ]]",
            "((x = x + 1))",
            "x=1 y=$((x+2)) cmd ~/file <input",
        ] {
            let list: List = code.parse().unwrap();
            let printed = list.to_string();
            let reparsed: List = printed.parse().unwrap();
            assert_eq!(reparsed.to_string(), printed, "for input: {code}");
        }
    }

    #[test]
    fn multiline_list_from_str() {
        let list: List = "a\nb\nc".parse().unwrap();
        assert_eq!(list.0.len(), 3);
    }

    #[test]
    fn heredoc_in_list_from_str() {
        let list: List = "cat <<EOF\nhello\nEOF\n".parse().unwrap();
        assert_eq!(list.to_string(), "cat <<EOF");
    }

    #[test]
    fn syntax_error_from_str() {
        let result: Result<List> = "if then".parse();
        assert!(result.is_err());
    }
}
