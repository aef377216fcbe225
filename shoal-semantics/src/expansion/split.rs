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

//! Field splitting
//!
//! Fields are divided at unquoted separator characters of soft-expansion
//! origin. Whitespace separators at the edges are dropped and runs of them
//! collapse; each non-whitespace separator, together with adjacent
//! whitespace, delimits exactly one field, so `a::b` has an empty middle
//! field while `a : b` does not.

use super::attr::{AttrField, Origin};

/// Splits fields on the separators in `ifs`.
///
/// An empty `ifs` disables splitting. Input fields that produce no
/// characters vanish; quoted empty strings keep their (quoting) characters
/// and survive.
pub fn split_fields(
    ifs: &str,
    fields: impl IntoIterator<Item = AttrField>,
) -> Vec<AttrField> {
    let mut result = Vec::new();
    for field in fields {
        split_one(ifs, field, &mut result);
    }
    result
}

fn split_one(ifs: &str, field: AttrField, result: &mut Vec<AttrField>) {
    if ifs.is_empty() {
        if !field.chars.is_empty() {
            result.push(field);
        }
        return;
    }

    let origin = field.origin;
    let mut current = Vec::new();
    // Whether the character just before was a whitespace separator that
    // ended a field; a following non-whitespace separator is then part of
    // the same delimiter and must not produce an empty field.
    let mut just_delimited_by_whitespace = false;

    for c in field.chars {
        let is_separator =
            !c.is_quoted && c.origin == Origin::SoftExpansion && ifs.contains(c.value);
        if !is_separator {
            current.push(c);
            just_delimited_by_whitespace = false;
            continue;
        }

        if c.value.is_whitespace() {
            if !current.is_empty() {
                result.push(AttrField {
                    chars: std::mem::take(&mut current),
                    origin: origin.clone(),
                });
                just_delimited_by_whitespace = true;
            }
        } else if just_delimited_by_whitespace {
            just_delimited_by_whitespace = false;
        } else {
            result.push(AttrField {
                chars: std::mem::take(&mut current),
                origin: origin.clone(),
            });
        }
    }

    if !current.is_empty() {
        result.push(AttrField {
            chars: current,
            origin,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::attr::AttrChar;
    use super::*;
    use shoal_syntax::source::Location;

    fn soft_field(s: &str) -> AttrField {
        AttrField {
            chars: s
                .chars()
                .map(|c| AttrChar {
                    value: c,
                    origin: Origin::SoftExpansion,
                    is_quoted: false,
                    is_quoting: false,
                })
                .collect(),
            origin: Location::dummy(s),
        }
    }

    fn values(ifs: &str, input: &str) -> Vec<String> {
        split_fields(ifs, [soft_field(input)])
            .into_iter()
            .map(|f| f.chars.iter().map(|c| c.value).collect())
            .collect()
    }

    #[test]
    fn whitespace_splitting() {
        assert_eq!(values(" \t\n", "a b  c"), ["a", "b", "c"]);
        assert_eq!(values(" \t\n", "  lead trail  "), ["lead", "trail"]);
        assert_eq!(values(" \t\n", "   "), Vec::<String>::new());
    }

    #[test]
    fn non_whitespace_separators() {
        assert_eq!(values(":", "a:b"), ["a", "b"]);
        assert_eq!(values(":", "a::b"), ["a", "", "b"]);
        assert_eq!(values(":", ":a"), ["", "a"]);
        assert_eq!(values(":", "a:"), ["a"]);
    }

    #[test]
    fn mixed_separators() {
        assert_eq!(values(": ", "a : b"), ["a", "b"]);
        assert_eq!(values(": ", "a: :b"), ["a", "", "b"]);
        assert_eq!(values(": ", " :a"), ["", "a"]);
    }

    #[test]
    fn quoted_characters_do_not_split() {
        let mut field = soft_field("a b");
        field.chars[1].is_quoted = true;
        let fields = split_fields(" ", [field]);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn literal_characters_do_not_split() {
        let mut field = soft_field("a b");
        field.chars[1].origin = Origin::Literal;
        let fields = split_fields(" ", [field]);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn empty_ifs_disables_splitting() {
        assert_eq!(values("", "a b"), ["a b"]);
    }
}
