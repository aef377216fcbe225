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

//! Part of the lexer that parses command substitutions of the form `$(...)`

use super::core::Lexer;
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::TextUnit;

impl Lexer {
    /// Parses a command substitution after the `$` has been consumed.
    ///
    /// The current position must be on the opening `(`; `begin` is the index
    /// of the `$`. The content is recognized by running the syntax parser
    /// over the lexer, which respects nested parentheses, quotes, and
    /// here-documents.
    pub fn command_substitution(&mut self, begin: usize) -> Result<TextUnit> {
        debug_assert_eq!(self.peek_char(), Some('('));
        self.consume_char();

        let content = self.inner_program()?;

        if self.peek_char() != Some(')') {
            let opening_location = self.location_range(begin..begin + 2);
            return Err(Error {
                cause: SyntaxError::UnclosedCommandSubstitution { opening_location }.into(),
                location: self.location(),
            });
        }
        self.consume_char();

        let location = self.location_range(begin..self.index());
        Ok(TextUnit::CommandSubst {
            content: content.into(),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use assert_matches::assert_matches;

    fn lex(code: &str) -> Result<TextUnit> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.consume_char_if(|c| c == '$').unwrap();
        lexer.command_substitution(0)
    }

    #[test]
    fn empty_substitution() {
        let unit = lex("$()").unwrap();
        assert_matches!(unit, TextUnit::CommandSubst { content, .. } => {
            assert_eq!(&*content, "");
        });
    }

    #[test]
    fn nested_parentheses() {
        let unit = lex("$( (echo a); echo b )").unwrap();
        assert_matches!(unit, TextUnit::CommandSubst { content, .. } => {
            assert_eq!(&*content, " (echo a); echo b ");
        });
    }

    #[test]
    fn quotes_hide_parentheses() {
        let unit = lex(r#"$(echo ')' "(")"#).unwrap();
        assert_matches!(unit, TextUnit::CommandSubst { content, .. } => {
            assert_eq!(&*content, r#"echo ')' "(""#);
        });
    }

    #[test]
    fn unclosed_substitution() {
        let error = lex("$(echo").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedCommandSubstitution { .. })
        );
        assert!(error.needs_more_input());
    }

    #[test]
    fn multiline_substitution() {
        let unit = lex("$(echo a\necho b\n)").unwrap();
        assert_matches!(unit, TextUnit::CommandSubst { content, .. } => {
            assert_eq!(&*content, "echo a\necho b\n");
        });
    }
}
