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

//! Type definitions for command execution

use crate::signal;
use shoal_syntax::source::Location;
use std::ffi::c_int;
use std::ops::ControlFlow;

/// Resultant string of word expansion
///
/// A field is a string accompanied by the location of the word it came
/// from, which diagnostics use to point back at the source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// String value of the field
    pub value: String,
    /// Location of the originating word
    pub origin: Location,
}

impl Field {
    /// Creates a field with a dummy origin location, mainly for tests.
    #[inline]
    pub fn dummy<S: Into<String>>(value: S) -> Field {
        fn with_value(value: String) -> Field {
            let origin = Location::dummy(value.clone());
            Field { value, origin }
        }
        with_value(value.into())
    }

    /// Creates fields with dummy origin locations.
    pub fn dummies<I, S>(values: I) -> Vec<Field>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::dummy).collect()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

/// Number summarizing the result of command execution
///
/// The special parameter `$?` expands to the exit status of the last
/// executed foreground command.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub c_int);

impl ExitStatus {
    /// Exit status of a successful command
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    /// Exit status of a generally failed command
    pub const FAILURE: ExitStatus = ExitStatus(1);
    /// Exit status for a syntax error in the shell input
    pub const ERROR: ExitStatus = ExitStatus(2);
    /// Exit status when a command was found but could not be executed
    pub const NOEXEC: ExitStatus = ExitStatus(126);
    /// Exit status when a command was not found
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);

    /// Tests whether the exit status is zero.
    #[must_use]
    pub fn is_successful(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<c_int> for ExitStatus {
    fn from(value: c_int) -> ExitStatus {
        ExitStatus(value)
    }
}

impl From<ExitStatus> for c_int {
    fn from(exit_status: ExitStatus) -> c_int {
        exit_status.0
    }
}

/// Converts a signal to the exit status of a process killed by it.
///
/// The result is `128 + N` for signal number `N`.
impl From<signal::Signal> for ExitStatus {
    fn from(signal: signal::Signal) -> Self {
        ExitStatus(128 + signal as c_int)
    }
}

/// Result of executing a command, possibly aborting the surrounding
/// constructs
///
/// Executor functions return `ControlFlow::Continue(())` for normal
/// completion and `ControlFlow::Break(divert)` to unwind: `break` and
/// `continue` unwind loops, `return` unwinds a function call, and the exit
/// variants unwind the whole shell.
pub type Result<T = ()> = ControlFlow<Divert, T>;

/// Kinds of non-local control flow in the executor
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Divert {
    /// Continue the current loop.
    Continue {
        /// Number of loop levels to exit before continuing: `0` continues
        /// the innermost loop.
        count: usize,
    },

    /// Break the current loop.
    Break {
        /// Number of loop levels to break out of, less one: `0` breaks the
        /// innermost loop.
        count: usize,
    },

    /// Return from the current function or sourced script.
    Return(Option<ExitStatus>),

    /// Abort the current command line.
    ///
    /// In an interactive shell this resumes the prompt; otherwise it is the
    /// same as `Exit`.
    Interrupt(Option<ExitStatus>),

    /// Exit the shell after running the EXIT trap.
    Exit(Option<ExitStatus>),

    /// Exit the shell immediately, without running the EXIT trap.
    Abort(Option<ExitStatus>),
}

impl Divert {
    /// Returns the exit status the divert carries, if any.
    #[must_use]
    pub fn exit_status(&self) -> Option<ExitStatus> {
        use Divert::*;
        match self {
            Continue { .. } | Break { .. } => None,
            Return(status) | Interrupt(status) | Exit(status) | Abort(status) => *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_exit_status() {
        assert_eq!(ExitStatus::from(signal::Signal::SIGTERM), ExitStatus(143));
        assert_eq!(ExitStatus::from(signal::Signal::SIGINT), ExitStatus(130));
        assert_eq!(ExitStatus::from(signal::Signal::SIGKILL), ExitStatus(137));
    }

    #[test]
    fn divert_exit_status() {
        assert_eq!(Divert::Break { count: 0 }.exit_status(), None);
        assert_eq!(
            Divert::Exit(Some(ExitStatus(7))).exit_status(),
            Some(ExitStatus(7))
        );
    }
}
