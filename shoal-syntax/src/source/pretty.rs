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

//! Message model for diagnostics
//!
//! Error types across the shell implement [`MessageBase`] to describe
//! themselves as a titled message with source-located annotations. The
//! renderer (in the environment crate) turns a [`Message`] into an
//! `annotate-snippets` snippet for display.

use super::Location;
use std::borrow::Cow;

/// Severity of an annotation
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnnotationType {
    Error,
    Warning,
    Info,
    Note,
    Help,
}

/// Source-located remark inside a message
#[derive(Clone, Debug)]
pub struct Annotation<'a> {
    /// Severity of this annotation
    pub r#type: AnnotationType,
    /// Text of this annotation
    pub label: Cow<'a, str>,
    /// Source position the annotation points at
    pub location: &'a Location,
}

impl<'a> Annotation<'a> {
    pub fn new(r#type: AnnotationType, label: Cow<'a, str>, location: &'a Location) -> Self {
        Annotation {
            r#type,
            label,
            location,
        }
    }
}

/// Whole diagnostic message
#[derive(Clone, Debug)]
pub struct Message<'a> {
    /// Severity of the message
    pub r#type: AnnotationType,
    /// Headline of the message
    pub title: Cow<'a, str>,
    /// Source-located annotations
    pub annotations: Vec<Annotation<'a>>,
}

/// Types that can present themselves as a diagnostic message
pub trait MessageBase {
    /// Severity of the whole message. Defaults to `Error`.
    fn message_type(&self) -> AnnotationType {
        AnnotationType::Error
    }

    /// Headline of the message
    fn message_title(&self) -> Cow<'_, str>;

    /// Annotation pointing at the main cause
    fn main_annotation(&self) -> Annotation<'_>;

    /// Supplementary annotations, appended after the main one
    fn additional_annotations<'a, T: Extend<Annotation<'a>>>(&'a self, _results: &mut T) {}
}

impl<'a, T: MessageBase> From<&'a T> for Message<'a> {
    fn from(base: &'a T) -> Self {
        let mut annotations = vec![base.main_annotation()];
        base.additional_annotations(&mut annotations);
        Message {
            r#type: base.message_type(),
            title: base.message_title(),
            annotations,
        }
    }
}
