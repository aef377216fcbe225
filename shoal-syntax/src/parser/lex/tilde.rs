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

//! Recognition of tilde prefixes in words
//!
//! Tilde recognition is a post-processing step on parsed words: the parser
//! applies it to words in contexts where tilde expansion is defined (command
//! words, redirection operands, assignment values). A tilde prefix is only
//! recognized when the `~` and the following login name are all unquoted
//! literals.

use crate::syntax::TextUnit::Literal;
use crate::syntax::Word;
use crate::syntax::WordUnit::{Tilde, Unquoted};

impl Word {
    /// Recognizes a tilde prefix at the beginning of the word.
    pub fn parse_tilde_front(&mut self) {
        self.parse_tilde(false)
    }

    /// Recognizes tilde prefixes at the beginning of the word and after each
    /// unquoted colon, as in assignment values like `PATH=~/bin:~/sbin`.
    pub fn parse_tilde_everywhere(&mut self) {
        self.parse_tilde(true)
    }

    fn parse_tilde(&mut self, everywhere: bool) {
        let mut i = 0;
        loop {
            if self.units.get(i) == Some(&Unquoted(Literal('~'))) {
                let mut j = i + 1;
                let mut name = String::new();
                let mut all_literal = true;
                while let Some(unit) = self.units.get(j) {
                    match unit {
                        Unquoted(Literal('/' | ':')) => break,
                        Unquoted(Literal(c)) => {
                            name.push(*c);
                            j += 1;
                        }
                        // A quoted or expanded part defeats the tilde prefix.
                        _ => {
                            all_literal = false;
                            break;
                        }
                    }
                }
                if all_literal {
                    self.units.splice(i..j, std::iter::once(Tilde(name)));
                }
            }

            if !everywhere {
                return;
            }
            loop {
                match self.units.get(i) {
                    None => return,
                    Some(Unquoted(Literal(':'))) => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
        }
    }
}
