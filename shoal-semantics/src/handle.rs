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

//! Error handling in the executor
//!
//! Implementors of [`Handle`] know how an error is reported and what
//! happens to the shell afterwards: the diagnostic is printed, the exit
//! status is set, and fatal errors divert. Following POSIX:
//!
//! - Expansion errors abort the current command with status 1; an
//!   explicit `${x?}` error or `nounset` violation also aborts a
//!   non-interactive shell.
//! - Redirection errors abort the current command with status 1.
//! - Syntax errors in executed code abort a non-interactive shell with
//!   status 2.

use crate::expansion;
use crate::redir;
use shoal_env::semantics::{Divert, ExitStatus, Result};
use shoal_env::Env;
use std::ops::ControlFlow::{Break, Continue};

/// Errors that know how to report themselves to the shell
pub trait Handle {
    /// Prints the error and applies its consequences.
    fn handle(&self, env: &mut Env) -> Result;
}

impl Handle for expansion::Error {
    fn handle(&self, env: &mut Env) -> Result {
        env.print_error(self);
        env.exit_status = self.exit_status();
        match &self.cause {
            expansion::ErrorCause::UnsetParameter { .. } if !env.is_interactive() => {
                Break(Divert::Exit(Some(env.exit_status)))
            }
            _ => Continue(()),
        }
    }
}

impl Handle for redir::Error {
    fn handle(&self, env: &mut Env) -> Result {
        env.print_error(self);
        env.exit_status = ExitStatus::FAILURE;
        Continue(())
    }
}

impl Handle for shoal_syntax::parser::Error {
    fn handle(&self, env: &mut Env) -> Result {
        env.print_error(self);
        env.exit_status = ExitStatus::ERROR;
        if env.is_interactive() {
            Break(Divert::Interrupt(Some(ExitStatus::ERROR)))
        } else {
            Break(Divert::Exit(Some(ExitStatus::ERROR)))
        }
    }
}
