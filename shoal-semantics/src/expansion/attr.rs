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

//! Intermediate expansion results
//!
//! The initial expansion produces characters annotated with how they came
//! to be ([`AttrChar`]). The later phases inspect the annotations: field
//! splitting only considers unquoted characters of soft-expansion origin,
//! pathname expansion treats quoted characters literally, and quote
//! removal drops the quoting characters themselves.

use shoal_fnmatch::PatternChar;
use shoal_env::semantics::Field;
use shoal_syntax::source::Location;

/// Origin of an expanded character
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    /// The character was written literally in the word.
    Literal,
    /// The character came from a tilde expansion or similar, and is
    /// literal in pathname expansion but not subject to field splitting.
    HardExpansion,
    /// The character came from a parameter expansion, command
    /// substitution, or arithmetic expansion, and is subject to field
    /// splitting where unquoted.
    SoftExpansion,
}

/// Character with attributes describing its origin
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AttrChar {
    /// Character value
    pub value: char,
    /// Where the character came from
    pub origin: Origin,
    /// Whether the character is quoted by another character
    pub is_quoted: bool,
    /// Whether this character quotes other characters
    ///
    /// A character can be both quoting and quoted: in `"\$"`, the
    /// backslash quotes the dollar and is itself quoted by the double
    /// quotes.
    pub is_quoting: bool,
}

impl AttrChar {
    /// Plain unquoted literal character.
    #[must_use]
    pub fn literal(value: char) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        }
    }

    /// Quoting character, like a quote mark or escaping backslash.
    #[must_use]
    pub fn quoting(value: char, is_quoted: bool) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted,
            is_quoting: true,
        }
    }
}

/// String of attributed characters with the location of the word it came
/// from
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttrField {
    /// Characters of the field
    pub chars: Vec<AttrChar>,
    /// Location of the originating word
    pub origin: Location,
}

impl AttrField {
    /// Performs quote removal and attribute stripping in one pass,
    /// yielding a plain field.
    #[must_use]
    pub fn remove_quotes_and_strip(self) -> Field {
        let value = self
            .chars
            .into_iter()
            .filter(|c| !c.is_quoting)
            .map(|c| c.value)
            .collect();
        Field {
            value,
            origin: self.origin,
        }
    }
}

/// Converts attributed characters to pattern characters for matching.
///
/// Quoted characters and hard-expansion characters match themselves
/// literally; quoting characters disappear.
pub fn to_pattern_chars(chars: &[AttrChar]) -> impl Iterator<Item = PatternChar> + Clone + '_ {
    chars.iter().filter(|c| !c.is_quoting).map(|c| {
        if c.is_quoted || c.origin == Origin::HardExpansion {
            PatternChar::Literal(c.value)
        } else {
            PatternChar::Normal(c.value)
        }
    })
}

/// Removes quoting characters and returns the plain string value.
#[must_use]
pub fn strip(chars: &[AttrChar]) -> String {
    chars
        .iter()
        .filter(|c| !c.is_quoting)
        .map(|c| c.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_removal_drops_quoting_chars() {
        let field = AttrField {
            chars: vec![
                AttrChar::quoting('\'', false),
                AttrChar {
                    value: 'a',
                    origin: Origin::Literal,
                    is_quoted: true,
                    is_quoting: false,
                },
                AttrChar::quoting('\'', false),
            ],
            origin: Location::dummy("'a'"),
        };
        assert_eq!(field.remove_quotes_and_strip().value, "a");
    }

    #[test]
    fn pattern_chars_honor_quoting() {
        let chars = [
            AttrChar::literal('*'),
            AttrChar {
                value: '*',
                origin: Origin::Literal,
                is_quoted: true,
                is_quoting: false,
            },
            AttrChar {
                value: '*',
                origin: Origin::HardExpansion,
                is_quoted: false,
                is_quoting: false,
            },
        ];
        let pattern: Vec<_> = to_pattern_chars(&chars).collect();
        assert_eq!(
            pattern,
            [
                PatternChar::Normal('*'),
                PatternChar::Literal('*'),
                PatternChar::Literal('*'),
            ]
        );
    }
}
