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

//! Iterators that feed characters to the pattern parser
//!
//! The expansion engine knows which characters of a word were quoted, so the
//! parser does not take a plain `&str` but an iterator of [`PatternChar`]s
//! where each character is tagged normal or literal.

use std::str::Chars;

/// Character appearing in a pattern
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PatternChar {
    /// Character with its usual meaning: `?`, `*`, `[`, and `]` are special.
    Normal(char),
    /// Character that matches itself only, even if it is `?`, `*`, `[`, or `]`.
    Literal(char),
}

pub use PatternChar::*;

impl PatternChar {
    /// Returns the contained character.
    #[inline]
    #[must_use]
    pub const fn char_value(self) -> char {
        match self {
            Normal(c) | Literal(c) => c,
        }
    }
}

/// Iterator returned by [`with_escape`]
#[derive(Clone, Debug)]
pub struct WithEscape<'a> {
    chars: Chars<'a>,
}

impl Iterator for WithEscape<'_> {
    type Item = PatternChar;
    fn next(&mut self) -> Option<PatternChar> {
        match self.chars.next() {
            None => None,
            Some('\\') => self.chars.next().map(Literal),
            Some(c) => Some(Normal(c)),
        }
    }
}

/// Yields pattern characters treating backslashes as escapes.
///
/// A backslash makes the following character literal; the backslash itself is
/// not yielded. A trailing lone backslash is dropped.
#[must_use]
pub fn with_escape(pattern: &str) -> WithEscape<'_> {
    WithEscape {
        chars: pattern.chars(),
    }
}

/// Iterator returned by [`without_escape`]
#[derive(Clone, Debug)]
pub struct WithoutEscape<'a> {
    chars: Chars<'a>,
}

impl Iterator for WithoutEscape<'_> {
    type Item = PatternChar;
    fn next(&mut self) -> Option<PatternChar> {
        self.chars.next().map(Normal)
    }
}

/// Yields pattern characters verbatim, with no escape processing.
#[must_use]
pub fn without_escape(pattern: &str) -> WithoutEscape<'_> {
    WithoutEscape {
        chars: pattern.chars(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_escape_makes_escaped_chars_literal() {
        let chars: Vec<_> = with_escape(r"a\*c").collect();
        assert_eq!(chars, [Normal('a'), Literal('*'), Normal('c')]);
    }

    #[test]
    fn with_escape_drops_trailing_backslash() {
        let chars: Vec<_> = with_escape(r"x\").collect();
        assert_eq!(chars, [Normal('x')]);
    }

    #[test]
    fn without_escape_keeps_backslashes() {
        let chars: Vec<_> = without_escape(r"a\c").collect();
        assert_eq!(chars, [Normal('a'), Normal('\\'), Normal('c')]);
    }
}
