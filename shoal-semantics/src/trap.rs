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

//! Trap execution
//!
//! Signals caught while the shell was busy are processed here, between
//! commands; a trap action never interrupts an expansion midway. The
//! `EXIT`, `ERR`, `DEBUG`, and `RETURN` traps hook their respective
//! execution points.

use crate::command::with_frame;
use shoal_env::semantics::Result;
use shoal_env::signal::Signal;
use shoal_env::stack::Frame;
use shoal_env::trap::{Action, Condition};
use shoal_env::Env;
use std::ops::ControlFlow::Continue;
use std::rc::Rc;

/// Runs the trap action for a condition, preserving `$?` around it.
fn run_trap_action(env: &mut Env, condition: Condition, command: Rc<str>) -> Result {
    let saved_status = env.exit_status;
    let result = with_frame(env, Frame::Trap(condition), |env| {
        crate::runner::run_source(
            env,
            &command,
            shoal_syntax::source::Source::Trap {
                condition: condition.to_string(),
            },
            std::num::NonZeroU64::new(1).unwrap(),
        )
    });
    env.exit_status = saved_status;
    result
}

/// Processes all signals caught since the last check.
///
/// SIGCHLD always triggers a reap of finished children; a user trap on it
/// runs afterwards. Trap actions do not run recursively: signals caught
/// while a trap action runs are processed after it finishes.
pub fn run_pending_traps(env: &mut Env) -> Result {
    if env.stack.in_trap() {
        return Continue(());
    }
    while let Some(signal) = env.traps.take_caught_signal() {
        if signal == Signal::SIGCHLD {
            crate::job::reap_children(env);
        }
        let action = env.traps.action(Condition::Signal(signal)).clone();
        if let Action::Command(command) = action {
            run_trap_action(env, Condition::Signal(signal), command)?;
        }
    }
    Continue(())
}

/// Runs the `EXIT` trap, if set.
///
/// Diverts from the action are ignored; the shell is exiting anyway.
pub fn run_exit_trap(env: &mut Env) {
    if let Action::Command(command) = env.traps.action(Condition::Exit).clone() {
        // Prevent recursion if the action itself exits.
        let origin = env
            .traps
            .get(Condition::Exit)
            .map(|state| state.origin.clone())
            .unwrap();
        _ = env
            .traps
            .set_action(&mut *env.system, Condition::Exit, Action::Default, origin);
        _ = run_trap_action(env, Condition::Exit, command);
    }
}

/// Runs the `DEBUG` trap before a simple command.
pub fn run_debug_trap(env: &mut Env) -> Result {
    if env.stack.in_trap() {
        return Continue(());
    }
    if let Action::Command(command) = env.traps.action(Condition::Debug).clone() {
        run_trap_action(env, Condition::Debug, command)?;
    }
    Continue(())
}

/// Runs the `ERR` trap after a failed command.
pub fn run_err_trap(env: &mut Env) -> Result {
    if env.stack.in_trap() {
        return Continue(());
    }
    if let Action::Command(command) = env.traps.action(Condition::Err).clone() {
        run_trap_action(env, Condition::Err, command)?;
    }
    Continue(())
}

/// Runs the `RETURN` trap after a function call or sourced script.
pub fn run_return_trap(env: &mut Env) -> Result {
    if env.stack.in_trap() {
        return Continue(());
    }
    if let Action::Command(command) = env.traps.action(Condition::Return).clone() {
        run_trap_action(env, Condition::Return, command)?;
    }
    Continue(())
}
