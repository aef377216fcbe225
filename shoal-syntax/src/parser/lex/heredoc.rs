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

//! Here-document content parser

use super::core::Lexer;
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::HereDoc;
use crate::syntax::Text;
use crate::syntax::TextUnit::Literal;

const NEWLINE: char = '\n';

/// Counts leading literal tab characters.
fn leading_tabs<'a, I: IntoIterator<Item = &'a crate::syntax::TextUnit>>(units: I) -> usize {
    units
        .into_iter()
        .take_while(|&unit| unit == &Literal('\t'))
        .count()
}

impl Lexer {
    /// Reads a line literally, up to but not including the next newline.
    ///
    /// No quotes, expansions, or line continuations are recognized.
    pub fn line(&mut self) -> Result<String> {
        self.with_line_continuation_disabled(|lexer| {
            let mut line = String::new();
            while let Some(sc) = lexer.consume_char_if(|c| c != NEWLINE) {
                line.push(sc.value);
            }
            Ok(line)
        })
    }

    /// Reads the content of a here-document, filling `here_doc.content`.
    ///
    /// Lines are captured until one equals the delimiter (after tab
    /// stripping for `<<-`). If the delimiter was quoted in any part, the
    /// content is literal; otherwise expansions are recognized so they can
    /// be performed when the here-document is used.
    pub fn here_doc_content(&mut self, here_doc: &HereDoc) -> Result<()> {
        fn is_escapable(c: char) -> bool {
            matches!(c, '$' | '`' | '\\')
        }

        let (delimiter_string, literal) = here_doc.delimiter.unquote();
        let mut content = Vec::new();
        loop {
            let (line_text, line_string) = if literal {
                let line_string = self.line()?;
                let line_text = Text::from_literal_chars(line_string.chars());
                (line_text, line_string)
            } else {
                let begin = self.index();
                let line_text = self.text(&|c| c == NEWLINE, &is_escapable)?;
                let end = self.index();
                (line_text, self.source_string(begin..end))
            };

            let newline_seen = self.consume_char_if(|c| c == NEWLINE).is_some();

            let skip_count = if here_doc.remove_tabs {
                leading_tabs(&line_text.0)
            } else {
                0
            };
            if line_string[skip_count..] == delimiter_string {
                break;
            }

            if !newline_seen {
                let redir_op_location = here_doc.delimiter.location.clone();
                let cause = SyntaxError::UnclosedHereDocContent { redir_op_location }.into();
                let location = self.location();
                return Err(Error { cause, location });
            }

            content.extend({ line_text }.0.drain(skip_count..));
            content.push(Literal(NEWLINE));
        }

        here_doc
            .content
            .set(Text(content))
            .expect("here-doc content must be filled just once");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use assert_matches::assert_matches;
    use std::cell::OnceCell;

    fn operator(delimiter: &str, remove_tabs: bool) -> HereDoc {
        HereDoc {
            delimiter: delimiter.parse().unwrap(),
            remove_tabs,
            content: OnceCell::new(),
        }
    }

    fn content(code: &str, delimiter: &str, remove_tabs: bool) -> Result<String> {
        let here_doc = operator(delimiter, remove_tabs);
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.here_doc_content(&here_doc)?;
        Ok(here_doc.content.get().unwrap().to_string())
    }

    #[test]
    fn empty_content() {
        assert_eq!(content("END\n", "END", false).unwrap(), "");
    }

    #[test]
    fn simple_content() {
        assert_eq!(
            content("one\ntwo\nEND\n", "END", false).unwrap(),
            "one\ntwo\n"
        );
    }

    #[test]
    fn delimiter_must_match_whole_line() {
        assert_eq!(
            content("END x\nxEND\nEND\n", "END", false).unwrap(),
            "END x\nxEND\n"
        );
    }

    #[test]
    fn tab_stripping() {
        assert_eq!(
            content("\t\thi\n\tEND\n", "END", true).unwrap(),
            "hi\n"
        );
        // Spaces are not stripped.
        assert_eq!(
            content("  hi\nEND\n", "END", true).unwrap(),
            "  hi\n"
        );
    }

    #[test]
    fn tabs_kept_without_dash() {
        let error = content("\tEND\nEND\n", "END", false);
        // The first line is content because the tab is not stripped.
        assert_eq!(error.unwrap(), "\tEND\n");
    }

    #[test]
    fn expansions_recognized_with_unquoted_delimiter() {
        let here_doc = operator("END", false);
        let mut lexer = Lexer::from_memory("value: $x\nEND\n", Source::Unknown);
        lexer.here_doc_content(&here_doc).unwrap();
        let text = here_doc.content.get().unwrap();
        assert!(text
            .0
            .iter()
            .any(|unit| matches!(unit, crate::syntax::TextUnit::RawParam { param, .. } if param.id == "x")));
    }

    #[test]
    fn literal_content_with_quoted_delimiter() {
        let here_doc = HereDoc {
            delimiter: "'END'".parse().unwrap(),
            remove_tabs: false,
            content: OnceCell::new(),
        };
        let mut lexer = Lexer::from_memory("$x\nEND\n", Source::Unknown);
        lexer.here_doc_content(&here_doc).unwrap();
        assert_eq!(here_doc.content.get().unwrap().0, [
            Literal('$'),
            Literal('x'),
            Literal('\n'),
        ]);
    }

    #[test]
    fn missing_delimiter_line() {
        let error = content("text\n", "END", false).unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedHereDocContent { .. })
        );
        assert!(error.needs_more_input());
    }
}
