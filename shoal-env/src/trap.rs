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

//! Traps and deferred signal handling
//!
//! The signal handler installed by the shell only records the caught signal
//! in a process-global flag array; that array is the one piece of state the
//! kernel forces to be global. Everything else lives in the [`TrapSet`].
//! Pending signals are [drained](TrapSet::take_caught_signal) between
//! commands, never in the middle of an expansion.

use crate::signal::{self, Signal};
use crate::system::{SignalHandling, System};
use shoal_syntax::source::Location;
use std::collections::HashMap;
use std::ffi::c_int;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Largest signal number we track, inclusive.
const SIGNAL_MAX: usize = 64;

/// Flags set by the signal handler for signals not yet processed.
static CAUGHT: [AtomicBool; SIGNAL_MAX + 1] = {
    #[allow(clippy::declare_interior_mutable_const)]
    const FALSE: AtomicBool = AtomicBool::new(false);
    [FALSE; SIGNAL_MAX + 1]
};

/// Signal handler: records the signal and nothing else.
pub(crate) extern "C" fn catch_signal(signo: c_int) {
    if let Ok(index) = usize::try_from(signo) {
        if let Some(flag) = CAUGHT.get(index) {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

/// Condition that can have a trap
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Condition {
    /// Exiting the shell (`EXIT` or `0`)
    Exit,
    /// A command returning a non-zero status (`ERR`)
    Err,
    /// Before every simple command (`DEBUG`)
    Debug,
    /// Returning from a function or sourced script (`RETURN`)
    Return,
    /// Receipt of a signal
    Signal(Signal),
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Exit => "EXIT".fmt(f),
            Condition::Err => "ERR".fmt(f),
            Condition::Debug => "DEBUG".fmt(f),
            Condition::Return => "RETURN".fmt(f),
            Condition::Signal(signal) => signal::short_name(*signal).fmt(f),
        }
    }
}

/// Error parsing a condition name
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("`{0}` is not a valid trap condition")]
pub struct ParseConditionError(pub String);

impl FromStr for Condition {
    type Err = ParseConditionError;
    fn from_str(s: &str) -> Result<Condition, ParseConditionError> {
        match s.to_ascii_uppercase().as_str() {
            "EXIT" | "0" => Ok(Condition::Exit),
            "ERR" => Ok(Condition::Err),
            "DEBUG" => Ok(Condition::Debug),
            "RETURN" => Ok(Condition::Return),
            _ => signal::parse_signal(s)
                .map(Condition::Signal)
                .map_err(|_| ParseConditionError(s.to_string())),
        }
    }
}

/// What to do when a condition occurs
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Action {
    /// Perform the default action for the condition.
    #[default]
    Default,
    /// Ignore the condition.
    Ignore,
    /// Execute the command string.
    Command(Rc<str>),
}

/// Trap with the location of the command that set it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrapState {
    pub action: Action,
    pub origin: Location,
}

/// Error setting a trap
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SetActionError {
    /// SIGKILL cannot be caught or ignored.
    #[error("SIGKILL cannot be trapped")]
    SIGKILL,
    /// SIGSTOP cannot be caught or ignored.
    #[error("SIGSTOP cannot be trapped")]
    SIGSTOP,
    /// Error from the underlying system call
    #[error("system error: {0}")]
    SystemError(crate::system::Errno),
}

/// Collection of traps and the signal dispositions they imply
#[derive(Clone, Debug, Default)]
pub struct TrapSet {
    traps: HashMap<Condition, TrapState>,
    /// Signals whose disposition the shell forces regardless of traps:
    /// SIGCHLD for job tracking, and the job-control stop/interrupt
    /// signals while the shell is interactive.
    internally_handled: Vec<Signal>,
}

impl TrapSet {
    #[must_use]
    pub fn new() -> TrapSet {
        TrapSet::default()
    }

    /// Returns the trap set for the given condition, if any.
    #[must_use]
    pub fn get(&self, condition: Condition) -> Option<&TrapState> {
        self.traps.get(&condition)
    }

    /// Returns the action for the given condition.
    #[must_use]
    pub fn action(&self, condition: Condition) -> &Action {
        self.traps
            .get(&condition)
            .map(|state| &state.action)
            .unwrap_or(&Action::Default)
    }

    /// Returns all set traps, sorted by condition name for stable output.
    pub fn iter(&self) -> Vec<(&Condition, &TrapState)> {
        let mut traps: Vec<_> = self.traps.iter().collect();
        traps.sort_by_key(|(condition, _)| condition.to_string());
        traps
    }

    /// Sets the action for a condition, updating the signal disposition.
    pub fn set_action(
        &mut self,
        system: &mut dyn System,
        condition: Condition,
        action: Action,
        origin: Location,
    ) -> Result<(), SetActionError> {
        if let Condition::Signal(signal) = condition {
            match signal {
                Signal::SIGKILL => return Err(SetActionError::SIGKILL),
                Signal::SIGSTOP => return Err(SetActionError::SIGSTOP),
                _ => {}
            }
            let handling = match &action {
                Action::Default if self.internally_handled.contains(&signal) => {
                    SignalHandling::Catch
                }
                Action::Default => SignalHandling::Default,
                Action::Ignore => SignalHandling::Ignore,
                Action::Command(_) => SignalHandling::Catch,
            };
            system
                .sigaction(signal, handling)
                .map_err(SetActionError::SystemError)?;
        }

        if action == Action::Default {
            self.traps.remove(&condition);
        } else {
            self.traps.insert(condition, TrapState { action, origin });
        }
        Ok(())
    }

    /// Marks a signal as internally handled and installs the catching
    /// handler for it.
    ///
    /// Used for SIGCHLD, and for the interactive job-control signals the
    /// shell must not die from.
    pub fn enable_internal_handler(
        &mut self,
        system: &mut dyn System,
        signal: Signal,
        handling: SignalHandling,
    ) -> Result<(), crate::system::Errno> {
        if !self.internally_handled.contains(&signal) {
            self.internally_handled.push(signal);
        }
        system.sigaction(signal, handling)?;
        Ok(())
    }

    /// Returns one signal caught since the last call, clearing its flag.
    ///
    /// The signal is returned whether or not a trap is set on it; the
    /// caller decides what to do.
    #[must_use]
    pub fn take_caught_signal(&mut self) -> Option<Signal> {
        for (number, flag) in CAUGHT.iter().enumerate() {
            if flag.swap(false, Ordering::Relaxed) {
                if let Ok(signal) = Signal::try_from(number as c_int) {
                    return Some(signal);
                }
            }
        }
        None
    }

    /// Adjusts traps on entering a subshell.
    ///
    /// Traps set to commands are reset to the default action (their
    /// dispositions are restored in the child); ignored conditions stay
    /// ignored.
    pub fn enter_subshell(&mut self, system: &mut dyn System) {
        let commands: Vec<Condition> = self
            .traps
            .iter()
            .filter(|(_, state)| matches!(state.action, Action::Command(_)))
            .map(|(condition, _)| *condition)
            .collect();
        for condition in commands {
            self.traps.remove(&condition);
            if let Condition::Signal(signal) = condition {
                let handling = if self.internally_handled.contains(&signal) {
                    SignalHandling::Catch
                } else {
                    SignalHandling::Default
                };
                let _ = system.sigaction(signal, handling);
            }
        }
    }

    /// Restores default dispositions for all internally handled signals,
    /// for use in child processes about to exec.
    pub fn disable_internal_handlers(&mut self, system: &mut dyn System) {
        for signal in self.internally_handled.drain(..) {
            let _ = system.sigaction(signal, SignalHandling::Default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parsing() {
        assert_eq!("EXIT".parse(), Ok(Condition::Exit));
        assert_eq!("0".parse(), Ok(Condition::Exit));
        assert_eq!("err".parse(), Ok(Condition::Err));
        assert_eq!("INT".parse(), Ok(Condition::Signal(Signal::SIGINT)));
        assert_eq!("SIGTERM".parse(), Ok(Condition::Signal(Signal::SIGTERM)));
        assert!("BOGUS".parse::<Condition>().is_err());
    }

    #[test]
    fn condition_display() {
        assert_eq!(Condition::Exit.to_string(), "EXIT");
        assert_eq!(Condition::Signal(Signal::SIGHUP).to_string(), "HUP");
    }

    #[test]
    fn caught_signal_flags() {
        let mut set = TrapSet::new();
        assert_eq!(set.take_caught_signal(), None);
        catch_signal(Signal::SIGUSR1 as c_int);
        assert_eq!(set.take_caught_signal(), Some(Signal::SIGUSR1));
        assert_eq!(set.take_caught_signal(), None);
    }
}
