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

//! Subshell creation
//!
//! A subshell is a forked child that continues running shell code with a
//! copy of the environment. Changes to variables, the working directory,
//! options, and the descriptor table stay in the child. The child clears
//! its jobs table and resets command traps before running its task.

use shoal_env::semantics::ExitStatus;
use shoal_env::system::{Errno, ForkResult, System, WaitPidFlag, WaitStatus};
use shoal_env::system::Pid;
use shoal_env::Env;
use shoal_syntax::source::Location;
use shoal_syntax::syntax::Fd;

/// Forks a subshell running the given task.
///
/// In the parent, returns the child's process ID. The child runs `task`
/// and exits with the resulting environment's exit status; it never
/// returns.
pub fn start_subshell<F>(env: &mut Env, task: F) -> Result<Pid, Errno>
where
    F: FnOnce(&mut Env),
{
    match env.system.fork()? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => {
            env.jobs = shoal_env::job::JobSet::new();
            env.pending_substitution_fds.clear();
            env.pending_substitution_pids.clear();
            env.traps.enter_subshell(&mut *env.system);
            env.stack.push(shoal_env::stack::Frame::Subshell);
            task(env);
            let status = env.exit_status.0;
            env.system.exit_process(status)
        }
    }
}

/// Waits for a direct child that is not job-controlled.
pub fn wait_for_child(env: &mut Env, pid: Pid) -> Result<ExitStatus, Errno> {
    loop {
        match env.system.waitpid(pid, WaitPidFlag::empty()) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitStatus(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(ExitStatus::from(signal)),
            Ok(_) => {}
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(errno),
        }
    }
}

/// Performs a command substitution: runs `content` in a subshell and
/// captures its standard output.
///
/// Returns the raw output and the subshell's exit status.
pub fn command_substitution(
    env: &mut Env,
    content: &str,
    location: &Location,
) -> Result<(String, ExitStatus), Errno> {
    let (reader, writer) = env.system.pipe()?;

    let source = content.to_string();
    let line = start_line_of(location);
    let child = start_subshell(env, move |env| {
        _ = env.system.close(reader);
        _ = env.system.dup2(writer, Fd::STDOUT);
        if writer != Fd::STDOUT {
            _ = env.system.close(writer);
        }
        crate::runner::run_source(
            env,
            &source,
            shoal_syntax::source::Source::CommandSubst,
            line,
        );
    })?;

    _ = env.system.close(writer);
    let mut output = Vec::new();
    let mut buffer = [0; 4096];
    loop {
        match env.system.read(reader, &mut buffer) {
            Ok(0) => break,
            Ok(count) => output.extend_from_slice(&buffer[..count]),
            Err(Errno::EINTR) => {}
            Err(_) => break,
        }
    }
    _ = env.system.close(reader);

    let exit_status = wait_for_child(env, child)?;
    Ok((String::from_utf8_lossy(&output).into_owned(), exit_status))
}

/// Line number at which a location starts, for error reports from
/// substituted code.
fn start_line_of(location: &Location) -> std::num::NonZeroU64 {
    location.code.line_column(location.range.start).0
}
