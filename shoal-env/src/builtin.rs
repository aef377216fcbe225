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

//! Type definitions for built-in utilities
//!
//! Implementations of the built-ins live in the `shoal-builtin` crate;
//! this module defines the contract between the executor and a built-in: a
//! built-in receives the environment and its arguments, performs I/O
//! through the environment's file descriptor table, and returns an exit
//! status together with any control-flow divert (`break`, `return`,
//! `exit`, …).

use crate::semantics::{Divert, ExitStatus};
use crate::Env;
use std::fmt::Debug;
use std::ops::ControlFlow;

/// Types of built-in utilities
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    /// Special built-in
    ///
    /// Special built-ins run in the shell process, their assignment
    /// prefixes persist, and errors in them abort a non-interactive shell.
    /// They are found before functions in command search.
    Special,

    /// Ordinary built-in
    ///
    /// Ordinary built-ins are found after functions but without a `$PATH`
    /// search. Functions may override them.
    Mandatory,
}

/// Result of running a built-in
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use = "the result must be returned to the executor"]
pub struct Result {
    /// Exit status of the built-in
    pub exit_status: ExitStatus,
    /// Control-flow divert requested by the built-in, if any
    pub divert: ControlFlow<Divert>,
}

impl Result {
    /// Creates a result with the given exit status and no divert.
    #[must_use]
    pub fn new(exit_status: ExitStatus) -> Self {
        Result {
            exit_status,
            divert: ControlFlow::Continue(()),
        }
    }

    /// Creates a result with a divert.
    #[must_use]
    pub fn with_divert(exit_status: ExitStatus, divert: Divert) -> Self {
        Result {
            exit_status,
            divert: ControlFlow::Break(divert),
        }
    }
}

impl From<ExitStatus> for Result {
    fn from(exit_status: ExitStatus) -> Self {
        Result::new(exit_status)
    }
}

/// Function implementing a built-in
pub type Main = fn(&mut Env, Vec<crate::semantics::Field>) -> Result;

/// Built-in utility definition
#[derive(Clone, Copy)]
pub struct Builtin {
    /// How the built-in is found and treated
    pub r#type: Type,
    /// Implementation
    pub execute: Main,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("type", &self.r#type)
            .finish_non_exhaustive()
    }
}
