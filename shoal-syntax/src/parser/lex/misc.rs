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

//! Small lexer helpers for blanks and comments

use super::core::{is_blank, Lexer};
use crate::parser::core::Result;

impl Lexer {
    /// Skips blank characters at the current position.
    pub fn skip_blanks(&mut self) -> Result<()> {
        while self.consume_char_if(is_blank).is_some() {}
        Ok(())
    }

    /// Skips a comment at the current position, if any.
    ///
    /// A comment runs from `#` up to, but not including, the next newline.
    pub fn skip_comment(&mut self) -> Result<()> {
        if self.peek_char() == Some('#') {
            self.with_line_continuation_disabled(|lexer| {
                while lexer.consume_char_if(|c| c != '\n').is_some() {}
            });
        }
        Ok(())
    }

    /// Skips blanks and a comment.
    pub fn skip_blanks_and_comment(&mut self) -> Result<()> {
        self.skip_blanks()?;
        self.skip_comment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    #[test]
    fn skipping_blanks() {
        let mut lexer = Lexer::from_memory("  \t x", Source::Unknown);
        lexer.skip_blanks().unwrap();
        assert_eq!(lexer.peek_char(), Some('x'));
    }

    #[test]
    fn newline_is_not_a_blank() {
        let mut lexer = Lexer::from_memory(" \n x", Source::Unknown);
        lexer.skip_blanks().unwrap();
        assert_eq!(lexer.peek_char(), Some('\n'));
    }

    #[test]
    fn comment_runs_to_newline() {
        let mut lexer = Lexer::from_memory("# hi there\nnext", Source::Unknown);
        lexer.skip_blanks_and_comment().unwrap();
        assert_eq!(lexer.peek_char(), Some('\n'));
    }

    #[test]
    fn backslash_does_not_continue_comment() {
        let mut lexer = Lexer::from_memory("# comment \\\nword", Source::Unknown);
        lexer.skip_blanks_and_comment().unwrap();
        assert_eq!(lexer.peek_char(), Some('\n'));
    }
}
