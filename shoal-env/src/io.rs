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

//! Rendering of diagnostic messages
//!
//! [`Message`]s built by error types across the shell are rendered with
//! `annotate-snippets`, quoting the offending source fragment with line
//! numbers.

use annotate_snippets::{Level, Renderer, Snippet};
use shoal_syntax::source::pretty::{AnnotationType, Message};
use shoal_syntax::syntax::Fd;

/// Lowest file descriptor the shell uses for its internal bookkeeping.
///
/// Descriptors the user can redirect are below this; the shell moves its
/// own descriptors (saved copies, script input) at or above it so they do
/// not collide.
pub const MIN_INTERNAL_FD: Fd = Fd(10);

fn level(r#type: AnnotationType) -> Level {
    match r#type {
        AnnotationType::Error => Level::Error,
        AnnotationType::Warning => Level::Warning,
        AnnotationType::Info => Level::Info,
        AnnotationType::Note => Level::Note,
        AnnotationType::Help => Level::Help,
    }
}

/// Converts a character index range to a byte range in `value`.
fn byte_range(value: &str, chars: &std::ops::Range<usize>) -> std::ops::Range<usize> {
    let mut indices = value
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(value.len()));
    let start = indices.nth(chars.start).unwrap_or(value.len());
    let end = if chars.end > chars.start {
        value
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(value.len()))
            .nth(chars.end)
            .unwrap_or(value.len())
    } else {
        start
    };
    start..end
}

/// Renders a message to a string, without trailing newline.
#[must_use]
pub fn render_message(message: &Message) -> String {
    let title = message.title.as_ref();
    let mut rendered = level(message.r#type).title(title);

    for annotation in &message.annotations {
        let code = &annotation.location.code;
        let range = byte_range(&code.value, &annotation.location.range);
        // An annotation pointing at the end of input needs a character to
        // attach to; widen it to the last character if possible.
        let range = if range.is_empty() {
            range.start.saturating_sub(1)..range.start.min(code.value.len())
        } else {
            range
        };
        let label = annotation.label.as_ref();
        let snippet = Snippet::source(&code.value)
            .line_start(code.start_line_number.get() as usize)
            .origin(code.source.label())
            .fold(true)
            .annotation(level(annotation.r#type).span(range).label(label));
        rendered = rendered.snippet(snippet);
    }

    Renderer::plain().render(rendered).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_syntax::source::pretty::Annotation;
    use shoal_syntax::source::Location;

    #[test]
    fn renders_title_and_annotation() {
        let location = Location::dummy("echo $((1/0))");
        let message = Message {
            r#type: AnnotationType::Error,
            title: "division by zero".into(),
            annotations: vec![Annotation::new(
                AnnotationType::Error,
                "divisor is zero".into(),
                &location,
            )],
        };
        let rendered = render_message(&message);
        assert!(rendered.contains("division by zero"));
        assert!(rendered.contains("echo $((1/0))"));
    }

    #[test]
    fn byte_ranges_for_multibyte_text() {
        let value = "héllo wörld";
        let range = byte_range(value, &(6..11));
        assert_eq!(&value[range], "wörld");
    }
}
