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

//! Array of fields as an intermediate expansion result
//!
//! Most expansions produce one field, but `"$@"` and `"${a[@]}"` produce
//! any number. A [`Phrase`] holds either shape without allocating for the
//! common cases. Joining phrases concatenates the last field of the first
//! with the first field of the second; other fields stay separate, which
//! is how `"pre$@post"` attaches `pre` and `post` to the outer parameters.

use super::attr::AttrChar;

/// Array of fields with an optimized representation
#[derive(Clone, Debug, Eq)]
pub enum Phrase {
    /// One field of one character
    Char(AttrChar),
    /// One field
    Field(Vec<AttrChar>),
    /// Any number of fields
    Full(Vec<Vec<AttrChar>>),
}

pub use Phrase::*;

impl Phrase {
    /// Phrase of no fields at all
    #[inline]
    #[must_use]
    pub fn zero_fields() -> Phrase {
        Full(Vec::new())
    }

    /// Phrase of one empty field
    #[inline]
    #[must_use]
    pub fn one_empty_field() -> Phrase {
        Field(Vec::new())
    }

    /// Creates a single-field phrase from a string with uniform attributes.
    pub fn from_str_attrs(
        value: &str,
        origin: super::attr::Origin,
        is_quoted: bool,
    ) -> Phrase {
        Field(
            value
                .chars()
                .map(|c| AttrChar {
                    value: c,
                    origin,
                    is_quoted,
                    is_quoting: false,
                })
                .collect(),
        )
    }

    /// Number of fields in the phrase.
    #[must_use]
    pub fn field_count(&self) -> usize {
        match self {
            Char(_) | Field(_) => 1,
            Full(fields) => fields.len(),
        }
    }

    /// Converts into the general form.
    #[must_use]
    pub fn into_full(self) -> Vec<Vec<AttrChar>> {
        match self {
            Char(c) => vec![vec![c]],
            Field(chars) => vec![chars],
            Full(fields) => fields,
        }
    }

    /// Joins another phrase onto the end of this one.
    ///
    /// The last field of `self` and the first field of `other` are
    /// concatenated; all other fields keep their boundaries.
    pub fn append(&mut self, other: Phrase) {
        match (&mut *self, other) {
            (Char(c), Field(mut chars)) => {
                chars.insert(0, *c);
                *self = Field(chars);
            }
            (Char(c), Char(d)) => *self = Field(vec![*c, d]),
            (Field(chars), Char(d)) => chars.push(d),
            (Field(chars), Field(mut other_chars)) => chars.append(&mut other_chars),
            (_, other) => {
                let mut fields = std::mem::replace(self, Phrase::zero_fields()).into_full();
                let mut other_fields = other.into_full();
                match (fields.last_mut(), other_fields.first_mut()) {
                    (Some(last), Some(first)) => {
                        last.append(first);
                        other_fields.remove(0);
                    }
                    _ => {}
                }
                fields.append(&mut other_fields);
                *self = Full(fields);
            }
        }
    }
}

impl PartialEq for Phrase {
    fn eq(&self, other: &Phrase) -> bool {
        match (self, other) {
            (Char(left), Char(right)) => left == right,
            (Field(left), Field(right)) => left == right,
            (Full(left), Full(right)) => left == right,
            (Char(c), Field(f)) | (Field(f), Char(c)) => [*c].as_slice() == f.as_slice(),
            (Char(c), Full(v)) | (Full(v), Char(c)) => {
                matches!(v.as_slice(), [f] if [*c].as_slice() == f.as_slice())
            }
            (Field(f), Full(v)) | (Full(v), Field(f)) => {
                matches!(v.as_slice(), [fv] if f == fv)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::attr::Origin;
    use super::*;

    fn ch(c: char) -> AttrChar {
        AttrChar {
            value: c,
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        }
    }

    #[test]
    fn representations_compare_equal() {
        assert_eq!(Char(ch('a')), Field(vec![ch('a')]));
        assert_eq!(Field(vec![ch('a')]), Full(vec![vec![ch('a')]]));
        assert_ne!(Char(ch('a')), Phrase::zero_fields());
        assert_ne!(Phrase::zero_fields(), Phrase::one_empty_field());
    }

    #[test]
    fn appending_single_fields() {
        let mut phrase = Char(ch('a'));
        phrase.append(Char(ch('b')));
        assert_eq!(phrase, Field(vec![ch('a'), ch('b')]));
    }

    #[test]
    fn appending_multi_fields_joins_at_the_seam() {
        let mut phrase = Field(vec![ch('p')]);
        phrase.append(Full(vec![vec![ch('1')], vec![ch('2')]]));
        phrase.append(Field(vec![ch('s')]));
        assert_eq!(
            phrase,
            Full(vec![vec![ch('p'), ch('1')], vec![ch('2'), ch('s')]])
        );
    }

    #[test]
    fn appending_zero_fields() {
        let mut phrase = Phrase::zero_fields();
        phrase.append(Char(ch('x')));
        assert_eq!(phrase, Full(vec![vec![ch('x')]]));
    }
}
