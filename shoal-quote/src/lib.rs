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

//! Quoting of strings so they can be fed back to the shell as a single word.
//!
//! [`quoted`] returns a form of its argument that, when read by the shell
//! again, expands to a single field equal to the original string. The
//! lightest sufficient quoting style is chosen:
//!
//! 1. A non-empty string made only of harmless characters is returned as is.
//! 2. A string without single quotes is wrapped in single quotes.
//! 3. Anything else is wrapped in double quotes with `"`, `` ` ``, `$`, and
//!    `\` backslash-escaped.
//!
//! The result is used when the shell prints values meant to be reusable as
//! input: `trap` output, `set` output, job names, and xtrace lines.

use std::borrow::Cow;

/// Quoting style sufficient for a given string
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Style {
    Bare,
    Single,
    Double,
}

/// Characters that force quoting wherever they occur.
fn is_meta(c: char) -> bool {
    matches!(
        c,
        '|' | '&' | ';' | '(' | ')' | '<' | '>' | '$' | '`' | '\\' | '"' | '\'' | '*' | '?' | '='
    ) || c.is_whitespace()
}

fn style_for(s: &str) -> Style {
    if s.is_empty() {
        return Style::Single;
    }
    let mut style = Style::Bare;
    match s.chars().next() {
        Some('#') | Some('~') => style = Style::Single,
        _ => {}
    }
    // An unquoted `{...}` or `[...]` could be brace expansion or a bracket
    // expression, so a closer following its opener forces quoting.
    if let Some(open) = s.find('{') {
        if s[open + 1..].contains('}') {
            style = Style::Single;
        }
    }
    if let Some(open) = s.find('[') {
        if s[open + 1..].contains(']') {
            style = Style::Single;
        }
    }
    for c in s.chars() {
        if c == '\'' {
            return Style::Double;
        }
        if is_meta(c) {
            style = Style::Single;
        }
    }
    style
}

/// Quotes the argument for reinput to the shell.
///
/// Returns `Cow::Borrowed` when no quoting is needed.
///
/// ```
/// # use std::borrow::Cow;
/// # use shoal_quote::quoted;
/// assert_eq!(quoted("word"), Cow::Borrowed("word"));
/// assert_eq!(quoted("two words"), "'two words'");
/// assert_eq!(quoted("it's"), r#""it's""#);
/// ```
pub fn quoted(s: &str) -> Cow<'_, str> {
    match style_for(s) {
        Style::Bare => Cow::Borrowed(s),
        Style::Single => Cow::Owned(format!("'{s}'")),
        Style::Double => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            for c in s.chars() {
                if matches!(c, '"' | '`' | '$' | '\\') {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
            Cow::Owned(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_strings_pass_through() {
        for s in ["word", "/usr/bin/env", "a,b,c", "x{", "}x", "[x", "x]", "%1"] {
            assert_eq!(quoted(s), Cow::Borrowed(s));
        }
    }

    #[test]
    fn empty_string_is_single_quoted() {
        assert_eq!(quoted(""), "''");
    }

    #[test]
    fn metacharacters_get_single_quotes() {
        assert_eq!(quoted("a b"), "'a b'");
        assert_eq!(quoted("echo $x"), "'echo $x'");
        assert_eq!(quoted("a|b"), "'a|b'");
        assert_eq!(quoted("*.rs"), "'*.rs'");
        assert_eq!(quoted("~user"), "'~user'");
        assert_eq!(quoted("#comment"), "'#comment'");
        assert_eq!(quoted("{a}"), "'{a}'");
        assert_eq!(quoted("[a]"), "'[a]'");
    }

    #[test]
    fn single_quotes_force_double_quoting() {
        assert_eq!(quoted("don't"), r#""don't""#);
        assert_eq!(quoted("'$HOME'"), r#""'\$HOME'""#);
        assert_eq!(quoted(r"'\'"), r#""'\\'""#);
    }
}
