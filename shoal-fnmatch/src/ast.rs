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

//! Abstract syntax tree for matching patterns
//!
//! A pattern is parsed into an [`Ast`] first and then compiled to a regular
//! expression. Keeping the intermediate tree around lets callers inspect the
//! pattern, e.g. to apply the leading-period rule in pathname expansion.

use crate::Error;
use crate::PatternChar;
use std::ops::RangeInclusive;

/// Names of the POSIX character classes usable in `[:name:]`.
const CHAR_CLASSES: &[&str] = &[
    "alnum", "alpha", "ascii", "blank", "cntrl", "digit", "graph", "lower", "print", "punct",
    "space", "upper", "word", "xdigit",
];

/// Component of a bracket expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketAtom {
    /// Single character
    Char(char),
    /// Collating symbol (`[.x.]`)
    CollatingSymbol(String),
    /// Equivalence class (`[=x=]`)
    EquivalenceClass(String),
    /// Named character class (`[:digit:]`)
    CharClass(&'static str),
}

/// Item of a bracket expression: an atom or a range
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketItem {
    Atom(BracketAtom),
    Range(RangeInclusive<char>),
}

/// Bracket expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bracket {
    /// Whether the expression starts with `!` (or `^`), inverting the set
    pub complement: bool,
    /// Items of the expression
    pub items: Vec<BracketItem>,
}

/// Pattern component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Atom {
    /// Character that matches itself
    Char(char),
    /// `?`
    AnyChar,
    /// `*`
    AnyString,
    /// Bracket expression
    Bracket(Bracket),
}

/// Whole parsed pattern
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ast {
    pub atoms: Vec<Atom>,
}

impl Ast {
    /// Parses a pattern.
    pub fn new<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
    {
        let chars: Vec<PatternChar> = pattern.into_iter().collect();
        let mut atoms = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                PatternChar::Normal('?') => {
                    atoms.push(Atom::AnyChar);
                    i += 1;
                }
                PatternChar::Normal('*') => {
                    // Consecutive asterisks are redundant.
                    if atoms.last() != Some(&Atom::AnyString) {
                        atoms.push(Atom::AnyString);
                    }
                    i += 1;
                }
                PatternChar::Normal('[') => match parse_bracket(&chars, i) {
                    Some((bracket, next)) => {
                        atoms.push(Atom::Bracket(bracket));
                        i = next;
                    }
                    // An unmatched `[` is an ordinary character.
                    None => {
                        atoms.push(Atom::Char('['));
                        i += 1;
                    }
                },
                c => {
                    atoms.push(Atom::Char(c.char_value()));
                    i += 1;
                }
            }
        }
        Ok(Ast { atoms })
    }

    /// Returns the literal string the pattern is equivalent to, if any.
    ///
    /// A pattern containing no `?`, `*`, or bracket expression matches one
    /// fixed string. Callers use this to bypass regex compilation.
    #[must_use]
    pub fn to_literal(&self) -> Option<String> {
        self.atoms
            .iter()
            .map(|atom| match atom {
                Atom::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Tests whether the pattern begins with a literal `.`.
    #[must_use]
    pub fn starts_with_literal_period(&self) -> bool {
        self.atoms.first() == Some(&Atom::Char('.'))
    }
}

/// Parses a bracket expression starting at `chars[start]`, which must be `[`.
///
/// Returns the bracket and the index just past the closing `]`, or `None` if
/// the expression is not terminated.
fn parse_bracket(chars: &[PatternChar], start: usize) -> Option<(Bracket, usize)> {
    let mut i = start + 1;
    let mut complement = false;
    if let Some(PatternChar::Normal('!')) | Some(PatternChar::Normal('^')) = chars.get(i) {
        complement = true;
        i += 1;
    }

    let mut items = Vec::new();
    loop {
        let pc = *chars.get(i)?;
        match pc {
            // `]` ends the expression unless it is the first item.
            PatternChar::Normal(']') if !items.is_empty() => {
                return Some((Bracket { complement, items }, i + 1));
            }
            PatternChar::Normal('[') => {
                if let Some((item, next)) = parse_bracket_special(chars, i) {
                    items.push(item);
                    i = next;
                } else {
                    i = push_atom_or_range(chars, i, '[', &mut items)?;
                }
            }
            c => {
                i = push_atom_or_range(chars, i, c.char_value(), &mut items)?;
            }
        }
    }
}

/// Adds `c` at position `i` as an atom, or as a range if followed by `-x`.
fn push_atom_or_range(
    chars: &[PatternChar],
    i: usize,
    c: char,
    items: &mut Vec<BracketItem>,
) -> Option<usize> {
    if chars.get(i + 1) == Some(&PatternChar::Normal('-')) {
        match chars.get(i + 2) {
            // `-` before the closing `]` is a literal hyphen.
            Some(PatternChar::Normal(']')) | None => {}
            Some(end) => {
                items.push(BracketItem::Range(c..=end.char_value()));
                return Some(i + 3);
            }
        }
    }
    items.push(BracketItem::Atom(BracketAtom::Char(c)));
    Some(i + 1)
}

/// Parses `[:class:]`, `[.symbol.]`, or `[=equiv=]` at `chars[start]`.
fn parse_bracket_special(chars: &[PatternChar], start: usize) -> Option<(BracketItem, usize)> {
    let kind = match chars.get(start + 1)? {
        PatternChar::Normal(c @ (':' | '.' | '=')) => *c,
        _ => return None,
    };

    let mut content = String::new();
    let mut i = start + 2;
    loop {
        let c = chars.get(i)?.char_value();
        if c == kind && chars.get(i + 1).map(|c| c.char_value()) == Some(']') {
            break;
        }
        content.push(c);
        i += 1;
    }
    let end = i + 2;

    let atom = match kind {
        ':' => BracketAtom::CharClass(
            CHAR_CLASSES
                .iter()
                .find(|name| **name == content)
                .copied()?,
        ),
        '.' => BracketAtom::CollatingSymbol(content),
        '=' => BracketAtom::EquivalenceClass(content),
        _ => unreachable!(),
    };
    Some((BracketItem::Atom(atom), end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::with_escape;
    use crate::without_escape;

    #[test]
    fn literal_pattern() {
        let ast = Ast::new(without_escape("abc")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Char('a'), Atom::Char('b'), Atom::Char('c')]
        );
        assert_eq!(ast.to_literal(), Some("abc".to_string()));
    }

    #[test]
    fn wildcards() {
        let ast = Ast::new(without_escape("a?*")).unwrap();
        assert_eq!(ast.atoms, [Atom::Char('a'), Atom::AnyChar, Atom::AnyString]);
        assert_eq!(ast.to_literal(), None);
    }

    #[test]
    fn consecutive_asterisks_collapse() {
        let ast = Ast::new(without_escape("**a**")).unwrap();
        assert_eq!(ast.atoms, [Atom::AnyString, Atom::Char('a'), Atom::AnyString]);
    }

    #[test]
    fn escaped_wildcard_is_literal() {
        let ast = Ast::new(with_escape(r"\*")).unwrap();
        assert_eq!(ast.atoms, [Atom::Char('*')]);
    }

    #[test]
    fn simple_bracket() {
        let ast = Ast::new(without_escape("[abc]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('a')),
                    BracketItem::Atom(BracketAtom::Char('b')),
                    BracketItem::Atom(BracketAtom::Char('c')),
                ],
            })]
        );
    }

    #[test]
    fn complement_bracket_with_range() {
        let ast = Ast::new(without_escape("[!0-9]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: true,
                items: vec![BracketItem::Range('0'..='9')],
            })]
        );
    }

    #[test]
    fn bracket_with_leading_close_bracket() {
        let ast = Ast::new(without_escape("[]a]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char(']')),
                    BracketItem::Atom(BracketAtom::Char('a')),
                ],
            })]
        );
    }

    #[test]
    fn unterminated_bracket_is_literal() {
        let ast = Ast::new(without_escape("[ab")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Char('['), Atom::Char('a'), Atom::Char('b')]
        );
    }

    #[test]
    fn character_class() {
        let ast = Ast::new(without_escape("[[:digit:]]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![BracketItem::Atom(BracketAtom::CharClass("digit"))],
            })]
        );
    }

    #[test]
    fn trailing_hyphen_is_literal() {
        let ast = Ast::new(without_escape("[a-]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('a')),
                    BracketItem::Atom(BracketAtom::Char('-')),
                ],
            })]
        );
    }
}
