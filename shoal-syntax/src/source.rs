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

//! Source code description
//!
//! Every token and AST node carries a [`Location`] pointing back into a
//! [`Code`] instance, which pairs the source text with a description of its
//! [origin](Source). Locations are character index ranges, so diagnostics can
//! quote the offending fragment with line and column computed on demand.

pub mod pretty;

use crate::alias::Alias;
use std::num::NonZeroU64;
use std::ops::Range;
use std::rc::Rc;

/// Origin of source code
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Source of unknown origin, mainly for tests
    Unknown,
    /// Standard input
    Stdin,
    /// Script file
    CommandFile { path: String },
    /// String passed with the `-c` option
    CommandString,
    /// Initialization file sourced at startup
    InitFile { path: String },
    /// Argument of the `.`/`source` built-in
    DotScript { path: String },
    /// Command string executed by the `eval` built-in
    Eval,
    /// Command substitution output re-read as code
    CommandSubst,
    /// Trap action run on a caught condition
    Trap { condition: String },
    /// Result of alias substitution
    Alias {
        /// Location of the word that was replaced
        original: Location,
        /// Alias definition that provided the replacement
        alias: Rc<Alias>,
    },
}

impl Source {
    /// Tests whether this source or any of its ancestors results from
    /// substituting the named alias.
    ///
    /// Used to prevent infinitely recursive alias substitution.
    #[must_use]
    pub fn is_alias_for(&self, name: &str) -> bool {
        match self {
            Source::Alias { original, alias } => {
                alias.name == name || original.code.source.is_alias_for(name)
            }
            _ => false,
        }
    }

    /// Short human-readable label of the source, used in diagnostics.
    #[must_use]
    pub fn label(&self) -> &str {
        use Source::*;
        match self {
            Unknown => "<?>",
            Stdin => "<stdin>",
            CommandFile { path } | InitFile { path } | DotScript { path } => path,
            CommandString => "<command>",
            Eval => "<eval>",
            CommandSubst => "<command substitution>",
            Trap { .. } => "<trap>",
            Alias { .. } => "<alias>",
        }
    }
}

/// Source code fragment with its origin
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Code {
    /// The source text
    pub value: String,
    /// Line number of the first line of `value` in the original input,
    /// counted from 1
    pub start_line_number: NonZeroU64,
    /// Origin of `value`
    pub source: Rc<Source>,
}

impl Code {
    /// Computes the line and column (both counted from 1) of the character at
    /// the given index.
    #[must_use]
    pub fn line_column(&self, index: usize) -> (NonZeroU64, NonZeroU64) {
        let mut line = self.start_line_number.get();
        let mut column = 1;
        for (i, c) in self.value.chars().enumerate() {
            if i >= index {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (
            NonZeroU64::new(line).unwrap(),
            NonZeroU64::new(column).unwrap(),
        )
    }
}

/// Position of a source fragment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    /// Code containing the fragment
    pub code: Rc<Code>,
    /// Character index range of the fragment in `code.value`
    pub range: Range<usize>,
}

impl Location {
    /// Creates a location of unknown origin covering the whole given string.
    ///
    /// Mainly for use in tests.
    #[must_use]
    pub fn dummy<S: Into<String>>(value: S) -> Location {
        fn with_value(value: String) -> Location {
            let range = 0..value.chars().count();
            let code = Rc::new(Code {
                value,
                start_line_number: NonZeroU64::new(1).unwrap(),
                source: Rc::new(Source::Unknown),
            });
            Location { code, range }
        }
        with_value(value.into())
    }

    /// Returns a new location whose range is extended to the given end.
    #[must_use]
    pub fn through(&self, end: usize) -> Location {
        Location {
            code: Rc::clone(&self.code),
            range: self.range.start..end.max(self.range.start),
        }
    }
}

/// Character tagged with its location
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceChar {
    /// Character value
    pub value: char,
    /// Location of this character
    pub location: Location,
}

/// Creates an iterator of [`SourceChar`]s from a string.
///
/// `index_offset` is the location index of the first character; following
/// characters increment it by one each.
pub fn source_chars<'a>(
    s: &'a str,
    code: &'a Rc<Code>,
    index_offset: usize,
) -> impl Iterator<Item = SourceChar> + 'a {
    s.chars().enumerate().map(move |(i, value)| SourceChar {
        value,
        location: Location {
            code: Rc::clone(code),
            range: index_offset + i..index_offset + i + 1,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_computation() {
        fn pair(line: u64, column: u64) -> (NonZeroU64, NonZeroU64) {
            (
                NonZeroU64::new(line).unwrap(),
                NonZeroU64::new(column).unwrap(),
            )
        }
        let code = Code {
            value: "one\ntwo\nthree".to_string(),
            start_line_number: NonZeroU64::new(1).unwrap(),
            source: Rc::new(Source::Unknown),
        };
        assert_eq!(code.line_column(0), pair(1, 1));
        assert_eq!(code.line_column(2), pair(1, 3));
        assert_eq!(code.line_column(4), pair(2, 1));
        assert_eq!(code.line_column(9), pair(3, 2));
    }

    #[test]
    fn alias_ancestry() {
        let alias = Rc::new(Alias {
            name: "ll".to_string(),
            replacement: "ls -l".to_string(),
            global: false,
            origin: Location::dummy("alias ll='ls -l'"),
        });
        let original = Location::dummy("ll");
        let source = Source::Alias {
            original,
            alias: Rc::clone(&alias),
        };
        assert!(source.is_alias_for("ll"));
        assert!(!source.is_alias_for("ls"));
        assert!(!Source::Unknown.is_alias_for("ll"));
    }

    #[test]
    fn source_chars_locations() {
        let code = Rc::new(Code {
            value: "echo hi".to_string(),
            start_line_number: NonZeroU64::new(1).unwrap(),
            source: Rc::new(Source::Unknown),
        });
        let chars: Vec<_> = source_chars("hi", &code, 5).collect();
        assert_eq!(chars[0].value, 'h');
        assert_eq!(chars[0].location.range, 5..6);
        assert_eq!(chars[1].value, 'i');
        assert_eq!(chars[1].location.range, 6..7);
    }
}
