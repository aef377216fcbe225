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

//! Process substitution
//!
//! `<(cmd)` and `>(cmd)` start `cmd` asynchronously with one end of a pipe
//! connected to its standard output or input, and expand to a `/dev/fd/N`
//! path naming the other end. The path's descriptor stays open in the
//! shell until the command using the word has finished; the substituted
//! process is reaped asynchronously and never appears in the jobs table.

use crate::expansion::attr::Origin;
use crate::expansion::initial::ExpandContext;
use crate::expansion::phrase::Phrase;
use crate::expansion::{Error, ErrorCause};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{Fd, ProcSubstDirection};
use shoal_env::system::System;

/// Expands a process substitution to a `/dev/fd/N` path.
pub fn expand_proc_subst(
    direction: ProcSubstDirection,
    content: &str,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let env = &mut *cx.env;
    let system_error = |errno| Error {
        cause: ErrorCause::SubstSystemError(errno),
        location: location.clone(),
    };

    let (reader, writer) = env.system.pipe().map_err(system_error)?;
    let (kept, child_end, child_stdio) = match direction {
        ProcSubstDirection::In => (reader, writer, Fd::STDOUT),
        ProcSubstDirection::Out => (writer, reader, Fd::STDIN),
    };

    let source = content.to_string();
    let line = location.code.line_column(location.range.start).0;
    let child = crate::subshell::start_subshell(env, move |env| {
        _ = env.system.close(kept);
        _ = env.system.dup2(child_end, child_stdio);
        if child_end != child_stdio {
            _ = env.system.close(child_end);
        }
        crate::runner::run_source(
            env,
            &source,
            shoal_syntax::source::Source::CommandSubst,
            line,
        );
    })
    .map_err(system_error)?;

    _ = env.system.close(child_end);
    env.pending_substitution_fds.push(kept);
    env.pending_substitution_pids.push(child);

    let path = format!("/dev/fd/{}", kept.0);
    Ok(Phrase::from_str_attrs(
        &path,
        Origin::HardExpansion,
        cx.in_double_quotes,
    ))
}
