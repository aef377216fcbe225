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

//! POSIX pattern matching
//!
//! This crate implements the pattern matching notation used for pathname
//! expansion, `case` patterns, `[[ ]]` comparisons, and the prefix/suffix
//! removal parameter expansions:
//!
//! - `?` matches any single character.
//! - `*` matches any (possibly empty) string.
//! - `[...]` matches one character in the bracket expression, which supports
//!   ranges (`[a-z]`), complements (`[!a-z]`), and character classes
//!   (`[[:alpha:]]`).
//!
//! Matching is performed by compiling the pattern to a [`regex`] regular
//! expression. Patterns without any special character shortcut to plain
//! string comparison.
//!
//! ```
//! # use shoal_fnmatch::{Config, Pattern, without_escape};
//! let p = Pattern::parse_with_config(without_escape("*.rs"), Config::full_match()).unwrap();
//! assert!(p.is_match("main.rs"));
//! assert!(!p.is_match("main.rc"));
//! ```

pub mod ast;
mod char_iter;

pub use self::char_iter::{with_escape, without_escape, PatternChar};

use self::ast::{Ast, Atom, Bracket, BracketAtom, BracketItem};
use regex::Regex;
use std::ops::Range;
use thiserror::Error;

/// Error in pattern compilation
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// The compiled regular expression was rejected by the `regex` crate.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Options deciding how a pattern matches
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Whether the pattern must match at the start of the subject
    pub anchor_begin: bool,
    /// Whether the pattern must match at the end of the subject
    pub anchor_end: bool,
    /// Whether matching ignores case
    pub case_insensitive: bool,
}

impl Config {
    /// Configuration requiring the pattern to match the whole subject.
    #[must_use]
    pub fn full_match() -> Self {
        Config {
            anchor_begin: true,
            anchor_end: true,
            ..Config::default()
        }
    }
}

/// How the pattern body is matched
#[derive(Clone, Debug)]
enum Body {
    /// Pattern without special characters, compared as a plain string
    Literal(String),
    /// General pattern compiled to a regular expression
    Regex(Regex),
}

/// Compiled matching pattern
#[derive(Clone, Debug)]
pub struct Pattern {
    ast: Ast,
    body: Body,
    config: Config,
}

impl Pattern {
    /// Parses and compiles a pattern with the given configuration.
    pub fn parse_with_config<I>(pattern: I, config: Config) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
    {
        let ast = Ast::new(pattern)?;
        let body = match ast.to_literal() {
            Some(s) if !config.case_insensitive => Body::Literal(s),
            _ => {
                let mut regex = String::new();
                if config.anchor_begin {
                    regex.push_str(r"\A");
                }
                for atom in &ast.atoms {
                    atom_to_regex(atom, &mut regex);
                }
                if config.anchor_end {
                    regex.push_str(r"\z");
                }
                let regex = regex::RegexBuilder::new(&regex)
                    .dot_matches_new_line(true)
                    .case_insensitive(config.case_insensitive)
                    .build()?;
                Body::Regex(regex)
            }
        };
        Ok(Pattern { ast, body, config })
    }

    /// Parses and compiles a pattern with the default configuration.
    pub fn parse<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
    {
        Self::parse_with_config(pattern, Config::default())
    }

    /// Returns the parsed form of the pattern.
    #[must_use]
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Returns the literal string this pattern is equivalent to, if any.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match &self.body {
            Body::Literal(s) => Some(s),
            Body::Regex(_) => None,
        }
    }

    /// Tests whether this pattern matches the given subject.
    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        match &self.body {
            Body::Literal(s) => match (self.config.anchor_begin, self.config.anchor_end) {
                (true, true) => subject == s,
                (true, false) => subject.starts_with(s.as_str()),
                (false, true) => subject.ends_with(s.as_str()),
                (false, false) => subject.contains(s.as_str()),
            },
            Body::Regex(regex) => regex.is_match(subject),
        }
    }

    /// Returns the byte range of the leftmost match in the subject.
    #[must_use]
    pub fn find(&self, subject: &str) -> Option<Range<usize>> {
        match &self.body {
            Body::Literal(s) => {
                if self.is_match(subject) {
                    let start = match (self.config.anchor_begin, self.config.anchor_end) {
                        (true, _) => 0,
                        (false, true) => subject.len() - s.len(),
                        (false, false) => subject.find(s.as_str())?,
                    };
                    Some(start..start + s.len())
                } else {
                    None
                }
            }
            Body::Regex(regex) => regex.find(subject).map(|m| m.range()),
        }
    }
}

/// Appends the regular expression for one pattern atom.
fn atom_to_regex(atom: &Atom, out: &mut String) {
    match atom {
        Atom::Char(c) => push_escaped(*c, out),
        Atom::AnyChar => out.push('.'),
        Atom::AnyString => out.push_str(".*"),
        Atom::Bracket(bracket) => bracket_to_regex(bracket, out),
    }
}

fn bracket_to_regex(bracket: &Bracket, out: &mut String) {
    out.push('[');
    if bracket.complement {
        out.push('^');
    }
    for item in &bracket.items {
        match item {
            BracketItem::Atom(atom) => bracket_atom_to_regex(atom, out),
            BracketItem::Range(range) => {
                push_class_escaped(*range.start(), out);
                out.push('-');
                push_class_escaped(*range.end(), out);
            }
        }
    }
    out.push(']');
}

fn bracket_atom_to_regex(atom: &BracketAtom, out: &mut String) {
    match atom {
        BracketAtom::Char(c) => push_class_escaped(*c, out),
        // Collating symbols and equivalence classes match their literal
        // content only; locale tables are not consulted.
        BracketAtom::CollatingSymbol(s) | BracketAtom::EquivalenceClass(s) => {
            for c in s.chars() {
                push_class_escaped(c, out);
            }
        }
        BracketAtom::CharClass(name) => {
            out.push_str("[:");
            out.push_str(name);
            out.push_str(":]");
        }
    }
}

fn push_escaped(c: char, out: &mut String) {
    if regex_syntax::is_meta_character(c) {
        out.push('\\');
    }
    out.push(c);
}

fn push_class_escaped(c: char, out: &mut String) {
    if matches!(c, '[' | ']' | '^' | '-' | '\\' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(pattern: &str) -> Pattern {
        Pattern::parse_with_config(without_escape(pattern), Config::full_match()).unwrap()
    }

    #[test]
    fn literal_shortcut() {
        let p = full("hello");
        assert_eq!(p.as_literal(), Some("hello"));
        assert!(p.is_match("hello"));
        assert!(!p.is_match("hell"));
        assert!(!p.is_match("hello "));
    }

    #[test]
    fn question_mark() {
        let p = full("a?c");
        assert!(p.is_match("abc"));
        assert!(p.is_match("a.c"));
        assert!(!p.is_match("ac"));
        assert!(!p.is_match("abbc"));
    }

    #[test]
    fn asterisk() {
        let p = full("a*c");
        assert!(p.is_match("ac"));
        assert!(p.is_match("abc"));
        assert!(p.is_match("a b c"));
        assert!(!p.is_match("ab"));
    }

    #[test]
    fn asterisk_matches_newline() {
        let p = full("a*c");
        assert!(p.is_match("a\nc"));
    }

    #[test]
    fn bracket_range() {
        let p = full("[a-c]");
        assert!(p.is_match("b"));
        assert!(!p.is_match("d"));
        let p = full("[!a-c]");
        assert!(!p.is_match("b"));
        assert!(p.is_match("d"));
    }

    #[test]
    fn character_class() {
        let p = full("[[:digit:]][[:alpha:]]");
        assert!(p.is_match("1a"));
        assert!(!p.is_match("a1"));
    }

    #[test]
    fn regex_metacharacters_are_inert() {
        let p = full("a.c+d(e)");
        assert!(p.is_match("a.c+d(e)"));
        assert!(!p.is_match("abc+d(e)"));
    }

    #[test]
    fn unanchored_find() {
        let p = Pattern::parse(without_escape("b*d")).unwrap();
        assert_eq!(p.find("abcde"), Some(1..4));
        assert_eq!(p.find("xyz"), None);
    }

    #[test]
    fn anchored_prefix_match() {
        let config = Config {
            anchor_begin: true,
            ..Config::default()
        };
        let p = Pattern::parse_with_config(without_escape("ab"), config).unwrap();
        assert!(p.is_match("abc"));
        assert!(!p.is_match("cab"));
        assert_eq!(p.find("abc"), Some(0..2));
    }

    #[test]
    fn escaped_special_characters() {
        let p = Pattern::parse_with_config(with_escape(r"\*\?"), Config::full_match()).unwrap();
        assert_eq!(p.as_literal(), Some("*?"));
        assert!(p.is_match("*?"));
        assert!(!p.is_match("ab"));
    }

    #[test]
    fn case_insensitive_match() {
        let config = Config {
            case_insensitive: true,
            ..Config::full_match()
        };
        let p = Pattern::parse_with_config(without_escape("a*z"), config).unwrap();
        assert!(p.is_match("ABCZ"));
    }
}
