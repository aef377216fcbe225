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

//! Part of the lexer that parses dollar units
//!
//! A dollar unit is an expansion introduced by `$`: a raw or braced
//! parameter expansion, a command substitution, or an arithmetic expansion.

use super::core::Lexer;
use crate::parser::core::Result;
use crate::syntax::TextUnit;

impl Lexer {
    /// Parses the expansion starting with `$` at the current position.
    ///
    /// Returns `Ok(None)` when the `$` does not start any expansion, in
    /// which case the position is left on the `$` so the caller can treat it
    /// as a literal character.
    pub fn dollar_unit(&mut self) -> Result<Option<TextUnit>> {
        let begin = self.index();
        debug_assert_eq!(self.peek_char(), Some('$'));
        self.consume_char();

        match self.peek_char() {
            Some('{') => self.braced_param(begin).map(Some),
            Some('(') => {
                if let Some(arith) = self.arithmetic_expansion(begin)? {
                    return Ok(Some(arith));
                }
                self.command_substitution(begin).map(Some)
            }
            _ => match self.raw_param(begin)? {
                Some(unit) => Ok(Some(unit)),
                None => {
                    self.rewind(begin);
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use crate::syntax::TextUnit::*;

    fn dollar(code: &str) -> Option<TextUnit> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.dollar_unit().unwrap()
    }

    #[test]
    fn raw_parameter() {
        assert!(matches!(
            dollar("$foo"),
            Some(RawParam { param, .. }) if param.id == "foo"
        ));
    }

    #[test]
    fn braced_parameter() {
        assert!(matches!(
            dollar("${foo}"),
            Some(BracedParam(param)) if param.param.id == "foo"
        ));
    }

    #[test]
    fn command_substitution() {
        assert!(matches!(
            dollar("$(echo hi)"),
            Some(CommandSubst { content, .. }) if &*content == "echo hi"
        ));
    }

    #[test]
    fn arithmetic_expansion() {
        assert!(matches!(dollar("$((1+2))"), Some(Arith { .. })));
    }

    #[test]
    fn subshell_in_command_substitution() {
        assert!(matches!(
            dollar("$((echo a); (echo b))"),
            Some(CommandSubst { content, .. }) if &*content == "(echo a); (echo b)"
        ));
    }

    #[test]
    fn plain_dollar() {
        assert_eq!(dollar("$"), None);
        assert_eq!(dollar("$+"), None);
    }
}
