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

//! Shell language semantics
//!
//! This crate implements the meaning of the syntax defined in
//! `shoal-syntax` against the environment defined in `shoal-env`: the
//! [word expansion](expansion) phases, [command execution](command),
//! [command search](command_search), [redirections](redir),
//! [subshells](subshell) and substitutions, the
//! [job-control runtime](job), [traps](trap), and the
//! [read-eval loop](runner).

pub mod command;
pub mod command_search;
pub mod expansion;
pub mod handle;
pub mod job;
pub mod proc_subst;
pub mod redir;
pub mod runner;
pub mod subshell;
pub mod trap;
pub mod xtrace;

pub use command::Execute;
pub use handle::Handle;
pub use runner::{read_eval_loop, run_source};
#[doc(no_inline)]
pub use shoal_env::semantics::{Divert, ExitStatus, Field, Result};

#[cfg(test)]
pub(crate) mod tests {
    use shoal_env::system::{
        Errno, ForkResult, Mode, OFlag, Result, SignalHandling, System, WaitPidFlag, WaitStatus,
    };
    use shoal_env::system::Pid;
    use shoal_env::Env;
    use shoal_syntax::syntax::Fd;
    use std::convert::Infallible;
    use std::ffi::{CStr, CString};
    use std::path::PathBuf;

    /// System stub for tests that never reach the kernel.
    ///
    /// Pure expansion and search logic is testable against it; anything
    /// that would fork or wait returns `ENOSYS`.
    #[derive(Debug)]
    pub struct NullSystem;

    impl System for NullSystem {
        fn fork(&mut self) -> Result<ForkResult> {
            Err(Errno::ENOSYS)
        }
        fn execve(&mut self, _: &CStr, _: &[CString], _: &[CString]) -> Result<Infallible> {
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
            Pid::from_raw(9999)
        }
        fn getpgrp(&self) -> Pid {
            Pid::from_raw(9999)
        }
        fn setpgid(&mut self, _: Pid, _: Pid) -> Result<()> {
            Ok(())
        }
        fn tcgetpgrp(&self, _: Fd) -> Result<Pid> {
            Ok(Pid::from_raw(9999))
        }
        fn tcsetpgrp(&mut self, _: Fd, _: Pid) -> Result<()> {
            Ok(())
        }
        fn kill(&mut self, _: Pid, _: Option<shoal_env::signal::Signal>) -> Result<()> {
            Ok(())
        }
        fn killpg(&mut self, _: Pid, _: Option<shoal_env::signal::Signal>) -> Result<()> {
            Ok(())
        }
        fn waitpid(&mut self, _: Pid, _: WaitPidFlag) -> Result<WaitStatus> {
            Ok(WaitStatus::StillAlive)
        }
        fn sigaction(
            &mut self,
            _: shoal_env::signal::Signal,
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
        fn file_size(&self, _: &CStr) -> Option<u64> {
            None
        }
        fn home_directory(&self, _: &str) -> Option<PathBuf> {
            None
        }
    }

    /// Creates an environment over the [`NullSystem`].
    pub fn dummy_env() -> Env {
        Env::with_system(Box::new(NullSystem))
    }
}
