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

//! Shell execution environment
//!
//! The [`Env`] struct aggregates all of the shell's runtime state:
//! variables, functions, aliases, options, the jobs table, traps, the
//! execution context stack, and the [`System`](system::System) interface
//! through which every system call goes. The environment is passed
//! explicitly through every executor and expansion function; the only
//! process-global state is the kernel-owned signal dispositions and the
//! flag array their handler writes to.

pub mod builtin;
pub mod function;
pub mod io;
pub mod job;
pub mod option;
pub mod semantics;
pub mod signal;
pub mod stack;
pub mod system;
pub mod trap;
pub mod variable;

use self::builtin::Builtin;
use self::function::FunctionSet;
use self::job::JobSet;
use self::option::{Option as ShellOption, OptionSet, State};
use self::semantics::ExitStatus;
use self::stack::Stack;
use self::system::{Pid, System};
use self::trap::TrapSet;
use self::variable::VariableSet;
use shoal_syntax::alias::AliasSet;
use shoal_syntax::source::pretty::{Message, MessageBase};
use std::collections::HashMap;
use std::rc::Rc;

/// Whole state of the shell
#[derive(Debug)]
pub struct Env {
    /// Aliases defined in the environment
    ///
    /// Reference-counted so the parser can hold the set while the
    /// environment is borrowed elsewhere; mutate with [`Rc::make_mut`].
    pub aliases: Rc<AliasSet>,

    /// Name the shell was invoked as, for the special parameter `$0`
    pub arg0: String,

    /// Built-in utilities
    pub builtins: HashMap<&'static str, Builtin>,

    /// Exit status of the last executed command (`$?`)
    pub exit_status: ExitStatus,

    /// Functions defined in the environment
    pub functions: FunctionSet,

    /// Jobs started by the shell
    pub jobs: JobSet,

    /// Process ID of the main shell process
    ///
    /// Subshells inherit this value, so `$$` stays the original shell's
    /// PID.
    pub main_pid: Pid,

    /// Shell option states
    pub options: OptionSet,

    /// Descriptors opened for process substitutions of the current
    /// command, closed when the command finishes
    pub pending_substitution_fds: Vec<shoal_syntax::syntax::Fd>,

    /// Helper processes (substitution writers and process substitutions)
    /// to reap asynchronously
    pub pending_substitution_pids: Vec<Pid>,

    /// Execution context stack
    pub stack: Stack,

    /// Interface to the operating system
    pub system: Box<dyn System>,

    /// Traps and pending caught signals
    pub traps: TrapSet,

    /// Variables and positional parameters
    pub variables: VariableSet,
}

impl Env {
    /// Creates an environment with the given system interface.
    #[must_use]
    pub fn with_system(system: Box<dyn System>) -> Env {
        let main_pid = system.getpid();
        Env {
            aliases: Rc::new(AliasSet::new()),
            arg0: String::new(),
            builtins: HashMap::new(),
            exit_status: ExitStatus::SUCCESS,
            functions: FunctionSet::new(),
            jobs: JobSet::new(),
            main_pid,
            options: OptionSet::default(),
            pending_substitution_fds: Vec::new(),
            pending_substitution_pids: Vec::new(),
            stack: Stack::new(),
            system,
            traps: TrapSet::new(),
            variables: VariableSet::new(),
        }
    }

    /// Whether the shell is interactive.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.options.get(ShellOption::Interactive) == State::On
    }

    /// Whether job control is active.
    #[must_use]
    pub fn controls_jobs(&self) -> bool {
        self.options.get(ShellOption::Monitor) == State::On
    }

    /// Prints a rendered diagnostic message to the standard error.
    pub fn print_message(&mut self, message: &Message<'_>) {
        let rendered = io::render_message(message);
        self.system.print_error(&rendered);
        self.system.print_error("\n");
    }

    /// Prints the diagnostic for an error type.
    pub fn print_error<E: MessageBase>(&mut self, error: &E) {
        self.print_message(&Message::from(error));
    }

    /// Prints a plain one-line error message prefixed with the shell name.
    pub fn print_simple_error(&mut self, message: std::fmt::Arguments<'_>) {
        let arg0 = if self.arg0.is_empty() {
            "shoal"
        } else {
            &self.arg0
        };
        let text = format!("{arg0}: {message}\n");
        self.system.print_error(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{
        Errno, ForkResult, Mode, OFlag, Result, SignalHandling, WaitPidFlag, WaitStatus,
    };
    use shoal_syntax::syntax::Fd;
    use std::convert::Infallible;
    use std::ffi::{CStr, CString};
    use std::path::PathBuf;

    /// System stub for tests that never touch the kernel
    #[derive(Debug)]
    struct NullSystem;

    impl System for NullSystem {
        fn fork(&mut self) -> Result<ForkResult> {
            Err(Errno::ENOSYS)
        }
        fn execve(
            &mut self,
            _: &CStr,
            _: &[CString],
            _: &[CString],
        ) -> Result<Infallible> {
            Err(Errno::ENOSYS)
        }
        fn exit_process(&mut self, status: i32) -> ! {
            panic!("exit_process({status})")
        }
        fn pipe(&mut self) -> Result<(Fd, Fd)> {
            Err(Errno::ENOSYS)
        }
        fn dup2(&mut self, _: Fd, to: Fd) -> Result<Fd> {
            Ok(to)
        }
        fn dup_cloexec_above(&mut self, fd: Fd, _: Fd) -> Result<Fd> {
            Ok(fd)
        }
        fn clear_cloexec(&mut self, _: Fd) -> Result<()> {
            Ok(())
        }
        fn close(&mut self, _: Fd) -> Result<()> {
            Ok(())
        }
        fn open(&mut self, _: &CStr, _: OFlag, _: Mode) -> Result<Fd> {
            Err(Errno::ENOSYS)
        }
        fn read(&mut self, _: Fd, _: &mut [u8]) -> Result<usize> {
            Ok(0)
        }
        fn write(&mut self, _: Fd, buffer: &[u8]) -> Result<usize> {
            Ok(buffer.len())
        }
        fn isatty(&self, _: Fd) -> bool {
            false
        }
        fn getpid(&self) -> Pid {
            Pid::from_raw(1234)
        }
        fn getpgrp(&self) -> Pid {
            Pid::from_raw(1234)
        }
        fn setpgid(&mut self, _: Pid, _: Pid) -> Result<()> {
            Ok(())
        }
        fn tcgetpgrp(&self, _: Fd) -> Result<Pid> {
            Ok(Pid::from_raw(1234))
        }
        fn tcsetpgrp(&mut self, _: Fd, _: Pid) -> Result<()> {
            Ok(())
        }
        fn kill(&mut self, _: Pid, _: std::option::Option<signal::Signal>) -> Result<()> {
            Ok(())
        }
        fn killpg(&mut self, _: Pid, _: std::option::Option<signal::Signal>) -> Result<()> {
            Ok(())
        }
        fn waitpid(&mut self, _: Pid, _: WaitPidFlag) -> Result<WaitStatus> {
            Ok(WaitStatus::StillAlive)
        }
        fn sigaction(
            &mut self,
            _: signal::Signal,
            _: SignalHandling,
        ) -> Result<SignalHandling> {
            Ok(SignalHandling::Default)
        }
        fn chdir(&mut self, _: &CStr) -> Result<()> {
            Ok(())
        }
        fn getcwd(&self) -> Result<PathBuf> {
            Ok(PathBuf::from("/"))
        }
        fn umask(&mut self, _: Mode) -> Mode {
            Mode::empty()
        }
        fn is_executable_file(&self, _: &CStr) -> bool {
            false
        }
        fn is_directory(&self, _: &CStr) -> bool {
            false
        }
        fn file_exists(&self, _: &CStr) -> bool {
            false
        }
        fn is_regular_file(&self, _: &CStr) -> bool {
            false
        }
        fn is_readable(&self, _: &CStr) -> bool {
            false
        }
        fn is_writable(&self, _: &CStr) -> bool {
            false
        }
        fn file_size(&self, _: &CStr) -> std::option::Option<u64> {
            None
        }
        fn home_directory(&self, _: &str) -> std::option::Option<PathBuf> {
            None
        }
    }

    #[test]
    fn environment_defaults() {
        let env = Env::with_system(Box::new(NullSystem));
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        assert_eq!(env.main_pid, Pid::from_raw(1234));
        assert!(!env.is_interactive());
        assert!(!env.controls_jobs());
        assert!(env.jobs.is_empty());
    }
}
