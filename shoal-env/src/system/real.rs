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

//! Implementation of [`System`] that actually interacts with the kernel
//!
//! Structured calls go through `nix`; the few descriptor-level calls whose
//! `nix` signatures have churned across versions use `libc` with explicit
//! errno checks.

use super::{Errno, OFlag, Mode, Result, SignalHandling, System, WaitPidFlag, WaitStatus};
use crate::signal::Signal;
use crate::trap;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet};
use nix::unistd::{ForkResult, Pid};
use shoal_syntax::syntax::Fd;
use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::os::fd::IntoRawFd;
use std::path::PathBuf;

/// System implementation talking to the real kernel
///
/// Only one instance should exist in a process: signal dispositions and
/// file descriptors are process-global resources.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Creates the real system interface.
    ///
    /// # Safety
    ///
    /// The caller must ensure this is the only instance in the process, as
    /// methods mutate process-global state (signal dispositions, file
    /// descriptors, the working directory).
    #[must_use]
    pub unsafe fn new() -> RealSystem {
        RealSystem(())
    }
}

fn check(result: libc::c_int) -> Result<libc::c_int> {
    if result < 0 {
        Err(Errno::last())
    } else {
        Ok(result)
    }
}

impl System for RealSystem {
    fn fork(&mut self) -> Result<ForkResult> {
        // SAFETY: the shell is single-threaded, and children either call
        // execve or exit without returning to unrelated code.
        unsafe { nix::unistd::fork() }
    }

    fn execve(
        &mut self,
        path: &CStr,
        args: &[CString],
        envs: &[CString],
    ) -> Result<Infallible> {
        nix::unistd::execve(path, args, envs)
    }

    fn exit_process(&mut self, status: i32) -> ! {
        std::process::exit(status)
    }

    fn pipe(&mut self) -> Result<(Fd, Fd)> {
        let (reader, writer) = nix::unistd::pipe()?;
        Ok((Fd(reader.into_raw_fd()), Fd(writer.into_raw_fd())))
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd> {
        check(unsafe { libc::dup2(from.0, to.0) }).map(Fd)
    }

    fn dup_cloexec_above(&mut self, fd: Fd, min: Fd) -> Result<Fd> {
        check(unsafe { libc::fcntl(fd.0, libc::F_DUPFD_CLOEXEC, min.0) }).map(Fd)
    }

    fn clear_cloexec(&mut self, fd: Fd) -> Result<()> {
        let flags = check(unsafe { libc::fcntl(fd.0, libc::F_GETFD) })?;
        check(unsafe { libc::fcntl(fd.0, libc::F_SETFD, flags & !libc::FD_CLOEXEC) })?;
        Ok(())
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        match check(unsafe { libc::close(fd.0) }) {
            Ok(_) | Err(Errno::EBADF) => Ok(()),
            Err(error) => Err(error),
        }
    }

    fn open(&mut self, path: &CStr, flags: OFlag, mode: Mode) -> Result<Fd> {
        check(unsafe {
            libc::open(
                path.as_ptr(),
                flags.bits(),
                libc::c_uint::from(mode.bits()),
            )
        })
        .map(Fd)
    }

    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        let count = unsafe {
            libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len())
        };
        if count < 0 {
            Err(Errno::last())
        } else {
            Ok(count as usize)
        }
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize> {
        let count = unsafe { libc::write(fd.0, buffer.as_ptr().cast(), buffer.len()) };
        if count < 0 {
            Err(Errno::last())
        } else {
            Ok(count as usize)
        }
    }

    fn isatty(&self, fd: Fd) -> bool {
        unsafe { libc::isatty(fd.0) == 1 }
    }

    fn getpid(&self) -> Pid {
        nix::unistd::getpid()
    }

    fn getpgrp(&self) -> Pid {
        nix::unistd::getpgrp()
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()> {
        nix::unistd::setpgid(pid, pgid)
    }

    fn tcgetpgrp(&self, fd: Fd) -> Result<Pid> {
        check(unsafe { libc::tcgetpgrp(fd.0) }).map(Pid::from_raw)
    }

    fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<()> {
        check(unsafe { libc::tcsetpgrp(fd.0, pgid.as_raw()) })?;
        Ok(())
    }

    fn kill(&mut self, pid: Pid, signal: Option<Signal>) -> Result<()> {
        nix::sys::signal::kill(pid, signal)
    }

    fn killpg(&mut self, pgid: Pid, signal: Option<Signal>) -> Result<()> {
        nix::sys::signal::killpg(pgid, signal)
    }

    fn waitpid(&mut self, pid: Pid, flags: WaitPidFlag) -> Result<WaitStatus> {
        nix::sys::wait::waitpid(pid, Some(flags))
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> Result<SignalHandling> {
        let handler = match handling {
            SignalHandling::Default => SigHandler::SigDfl,
            SignalHandling::Ignore => SigHandler::SigIgn,
            SignalHandling::Catch => SigHandler::Handler(trap::catch_signal),
        };
        let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
        // SAFETY: the catching handler only stores to an atomic flag.
        let old = unsafe { nix::sys::signal::sigaction(signal, &action)? };
        Ok(match old.handler() {
            SigHandler::SigDfl => SignalHandling::Default,
            SigHandler::SigIgn => SignalHandling::Ignore,
            _ => SignalHandling::Catch,
        })
    }

    fn chdir(&mut self, path: &CStr) -> Result<()> {
        nix::unistd::chdir(path)
    }

    fn getcwd(&self) -> Result<PathBuf> {
        nix::unistd::getcwd()
    }

    fn umask(&mut self, mask: Mode) -> Mode {
        nix::sys::stat::umask(mask)
    }

    fn is_executable_file(&self, path: &CStr) -> bool {
        (unsafe { libc::access(path.as_ptr(), libc::X_OK) == 0 })
            && unsafe {
                let mut status = std::mem::zeroed::<libc::stat>();
                libc::stat(path.as_ptr(), &mut status) == 0
                    && status.st_mode & libc::S_IFMT == libc::S_IFREG
            }
    }

    fn is_directory(&self, path: &CStr) -> bool {
        unsafe {
            let mut status = std::mem::zeroed::<libc::stat>();
            libc::stat(path.as_ptr(), &mut status) == 0
                && status.st_mode & libc::S_IFMT == libc::S_IFDIR
        }
    }

    fn file_exists(&self, path: &CStr) -> bool {
        unsafe { libc::access(path.as_ptr(), libc::F_OK) == 0 }
    }

    fn is_regular_file(&self, path: &CStr) -> bool {
        unsafe {
            let mut status = std::mem::zeroed::<libc::stat>();
            libc::stat(path.as_ptr(), &mut status) == 0
                && status.st_mode & libc::S_IFMT == libc::S_IFREG
        }
    }

    fn is_readable(&self, path: &CStr) -> bool {
        unsafe { libc::access(path.as_ptr(), libc::R_OK) == 0 }
    }

    fn is_writable(&self, path: &CStr) -> bool {
        unsafe { libc::access(path.as_ptr(), libc::W_OK) == 0 }
    }

    fn file_size(&self, path: &CStr) -> Option<u64> {
        unsafe {
            let mut status = std::mem::zeroed::<libc::stat>();
            if libc::stat(path.as_ptr(), &mut status) == 0 {
                u64::try_from(status.st_size).ok()
            } else {
                None
            }
        }
    }

    fn home_directory(&self, user: &str) -> Option<PathBuf> {
        let user = nix::unistd::User::from_name(user).ok()??;
        Some(user.dir)
    }
}
