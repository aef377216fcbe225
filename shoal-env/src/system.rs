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

//! System call interface
//!
//! All interaction with the operating system goes through the [`System`]
//! trait, implemented for the real kernel by [`RealSystem`](real::RealSystem).
//! Keeping the syscall surface behind one trait keeps the executor honest
//! about which effects it has and gives tests a seam.

pub mod real;

#[doc(no_inline)]
pub use nix::errno::Errno;
#[doc(no_inline)]
pub use nix::fcntl::OFlag;
#[doc(no_inline)]
pub use nix::sys::stat::Mode;
#[doc(no_inline)]
pub use nix::sys::wait::{WaitPidFlag, WaitStatus};
#[doc(no_inline)]
pub use nix::unistd::{ForkResult, Pid};

use crate::signal::Signal;
use shoal_syntax::syntax::Fd;
use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::fmt::Debug;
use std::path::PathBuf;

/// Result of a system call
pub type Result<T> = std::result::Result<T, Errno>;

/// Disposition of a signal, as the shell sees it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignalHandling {
    /// Perform the signal's default action.
    Default,
    /// Ignore the signal.
    Ignore,
    /// Catch the signal with the shell's flag-setting handler.
    Catch,
}

/// Interface to the operating system
pub trait System: Debug {
    /// Creates a child process.
    ///
    /// In the parent, returns `ForkResult::Parent`; in the child,
    /// `ForkResult::Child`. The child must not return into the caller's
    /// logic except to execute a command and exit.
    fn fork(&mut self) -> Result<ForkResult>;

    /// Replaces the process image.
    fn execve(&mut self, path: &CStr, args: &[CString], envs: &[CString])
        -> Result<Infallible>;

    /// Terminates the process immediately without unwinding.
    fn exit_process(&mut self, status: i32) -> !;

    /// Creates a pipe; returns `(reader, writer)`.
    fn pipe(&mut self) -> Result<(Fd, Fd)>;

    /// Duplicates `from` onto `to`, closing `to` first if open.
    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd>;

    /// Duplicates `fd` to the lowest free descriptor at or above `min`,
    /// with close-on-exec set.
    fn dup_cloexec_above(&mut self, fd: Fd, min: Fd) -> Result<Fd>;

    /// Clears the close-on-exec flag.
    fn clear_cloexec(&mut self, fd: Fd) -> Result<()>;

    /// Closes a file descriptor.
    ///
    /// Closing an already-closed descriptor is not an error.
    fn close(&mut self, fd: Fd) -> Result<()>;

    /// Opens a file.
    fn open(&mut self, path: &CStr, flags: OFlag, mode: Mode) -> Result<Fd>;

    /// Reads bytes, blocking as needed.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize>;

    /// Writes bytes once.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize>;

    /// Whether the descriptor refers to a terminal.
    fn isatty(&self, fd: Fd) -> bool;

    /// Process ID of this process.
    fn getpid(&self) -> Pid;

    /// Process group ID of this process.
    fn getpgrp(&self) -> Pid;

    /// Moves a process into a process group.
    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()>;

    /// Returns the foreground process group of the terminal.
    fn tcgetpgrp(&self, fd: Fd) -> Result<Pid>;

    /// Makes a process group the foreground job of the terminal.
    fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<()>;

    /// Sends a signal to a process, or checks it with `None`.
    fn kill(&mut self, pid: Pid, signal: Option<Signal>) -> Result<()>;

    /// Sends a signal to a process group.
    fn killpg(&mut self, pgid: Pid, signal: Option<Signal>) -> Result<()>;

    /// Waits for a child process to change state.
    fn waitpid(&mut self, pid: Pid, flags: WaitPidFlag) -> Result<WaitStatus>;

    /// Changes the disposition of a signal, returning the previous
    /// shell-visible disposition.
    fn sigaction(&mut self, signal: Signal, handling: SignalHandling)
        -> Result<SignalHandling>;

    /// Changes the working directory.
    fn chdir(&mut self, path: &CStr) -> Result<()>;

    /// Returns the working directory.
    fn getcwd(&self) -> Result<PathBuf>;

    /// Sets the file mode creation mask, returning the previous one.
    fn umask(&mut self, mask: Mode) -> Mode;

    /// Whether the path names an executable regular file.
    fn is_executable_file(&self, path: &CStr) -> bool;

    /// Whether the path names a directory.
    fn is_directory(&self, path: &CStr) -> bool;

    /// Whether the path names any existing file.
    fn file_exists(&self, path: &CStr) -> bool;

    /// Whether the path names a regular file.
    fn is_regular_file(&self, path: &CStr) -> bool;

    /// Whether the process may read the file.
    fn is_readable(&self, path: &CStr) -> bool;

    /// Whether the process may write the file.
    fn is_writable(&self, path: &CStr) -> bool;

    /// Size of the file in bytes, or `None` if it cannot be examined.
    fn file_size(&self, path: &CStr) -> Option<u64>;

    /// Home directory of the named user, for tilde expansion.
    fn home_directory(&self, user: &str) -> Option<PathBuf>;

    /// Writes the whole buffer, retrying on partial writes and `EINTR`.
    fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> Result<usize> {
        let len = buffer.len();
        while !buffer.is_empty() {
            match self.write(fd, buffer) {
                Ok(count) => buffer = &buffer[count..],
                Err(Errno::EINTR) => {}
                Err(error) => return Err(error),
            }
        }
        Ok(len)
    }

    /// Writes a message to the standard error, ignoring failures.
    fn print_error(&mut self, message: &str) {
        _ = self.write_all(Fd::STDERR, message.as_bytes());
    }
}
