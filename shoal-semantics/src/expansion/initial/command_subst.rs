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

//! Command substitution
//!
//! The embedded command runs in a subshell with its standard output
//! connected to a pipe. The captured output, with trailing newlines
//! removed, becomes the expansion result. The exit status is recorded in
//! the context so that a command consisting only of substitutions can
//! propagate it to `$?`.

use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::super::{Error, ErrorCause};
use super::ExpandContext;
use shoal_syntax::source::Location;

/// Expands a `$(...)` command substitution.
pub fn expand_command_subst(
    content: &str,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    expand_command_subst_str(content, location, cx)
}

/// Expands a command substitution given as a plain string.
pub fn expand_command_subst_str(
    content: &str,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let (output, exit_status) = crate::subshell::command_substitution(cx.env, content, location)
        .map_err(|errno| Error {
            cause: ErrorCause::SubstSystemError(errno),
            location: location.clone(),
        })?;
    cx.last_command_subst_status = Some(exit_status);

    let trimmed = output.trim_end_matches('\n');
    Ok(Phrase::from_str_attrs(
        trimmed,
        Origin::SoftExpansion,
        cx.in_double_quotes,
    ))
}
