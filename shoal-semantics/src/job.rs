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

//! Job-control runtime
//!
//! Child state changes flow in through `waitpid` and update the jobs
//! table. While a foreground job runs, the shell blocks in `waitpid`; the
//! terminal is granted to the job's process group first and reclaimed
//! afterwards. Background job state changes are reported before the next
//! prompt.

use shoal_env::job::{fmt, JobState, Pid, ProcessState};
use shoal_env::semantics::ExitStatus;
use shoal_env::system::{Errno, System, WaitPidFlag, WaitStatus};
use shoal_env::Env;
use shoal_syntax::syntax::Fd;

/// Applies one `waitpid` result to the jobs table.
///
/// Returns the process the status belongs to, if any.
pub fn apply_wait_status(env: &mut Env, status: WaitStatus) -> Option<Pid> {
    let (pid, state) = match status {
        WaitStatus::Exited(pid, code) => (pid, ProcessState::Exited(ExitStatus(code))),
        WaitStatus::Signaled(pid, signal, core_dumped) => (
            pid,
            ProcessState::Signaled {
                signal,
                core_dumped,
            },
        ),
        WaitStatus::Stopped(pid, signal) => (pid, ProcessState::Stopped(signal)),
        WaitStatus::Continued(pid) => (pid, ProcessState::Running),
        _ => return None,
    };

    // Substitution helpers are reaped silently.
    if let Some(i) = env
        .pending_substitution_pids
        .iter()
        .position(|&helper| helper == pid)
    {
        if !state.is_alive() {
            env.pending_substitution_pids.remove(i);
        }
        return Some(pid);
    }

    env.jobs.update_process_state(pid, state);
    Some(pid)
}

/// Reaps all children that have changed state, without blocking.
pub fn reap_children(env: &mut Env) {
    loop {
        match env.system.waitpid(
            Pid::from_raw(-1),
            WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED,
        ) {
            Ok(WaitStatus::StillAlive) => return,
            Ok(status) => {
                if apply_wait_status(env, status).is_none() {
                    return;
                }
            }
            Err(Errno::EINTR) => {}
            Err(_) => return,
        }
    }
}

/// Grants the terminal to a process group if job control is active.
pub fn give_terminal_to(env: &mut Env, pgid: Pid) {
    if env.controls_jobs() {
        _ = env.system.tcsetpgrp(Fd::STDIN, pgid);
    }
}

/// Reclaims the terminal for the shell itself.
pub fn reclaim_terminal(env: &mut Env) {
    if env.controls_jobs() {
        let own = env.system.getpgrp();
        _ = env.system.tcsetpgrp(Fd::STDIN, own);
    }
}

/// Waits until the job at `index` is done or stopped, reaping every child
/// state change on the way.
///
/// Returns the job's exit status once it is done, or the conventional
/// `128 + SIGTSTP` status when it stopped.
pub fn wait_for_job(env: &mut Env, index: usize) -> ExitStatus {
    loop {
        let Some(job) = env.jobs.get(index) else {
            return ExitStatus::SUCCESS;
        };
        match job.state() {
            JobState::Done => {
                let status = exit_status_of_job(env, index);
                env.jobs.remove(index);
                return status;
            }
            JobState::Stopped => {
                report_stopped_job(env, index);
                let signal = shoal_env::signal::Signal::SIGTSTP;
                return ExitStatus::from(signal);
            }
            JobState::Running => {}
        }

        match env
            .system
            .waitpid(Pid::from_raw(-1), WaitPidFlag::WUNTRACED)
        {
            Ok(status) => {
                apply_wait_status(env, status);
            }
            Err(Errno::EINTR) => {}
            Err(Errno::ECHILD) => {
                // No children left: the job can never finish normally.
                env.jobs.remove(index);
                return ExitStatus::SUCCESS;
            }
            Err(_) => return ExitStatus::FAILURE,
        }
    }
}

/// Computes the exit status of a finished job, honoring `pipefail`.
fn exit_status_of_job(env: &Env, index: usize) -> ExitStatus {
    use shoal_env::option::{Option as ShellOption, State};
    let Some(job) = env.jobs.get(index) else {
        return ExitStatus::SUCCESS;
    };
    if env.options.get(ShellOption::PipeFail) == State::On {
        let mut status = ExitStatus::SUCCESS;
        for process in &job.processes {
            let s = process.state.exit_status();
            if !s.is_successful() {
                status = s;
            }
        }
        status
    } else {
        job.exit_status()
    }
}

fn report_stopped_job(env: &mut Env, index: usize) {
    let current = env.jobs.current_job();
    let previous = env.jobs.previous_job();
    if let Some(job) = env.jobs.get_mut(index) {
        job.state_reported = true;
        let mark = if current == Some(index) {
            fmt::Mark::Current
        } else if previous == Some(index) {
            fmt::Mark::Previous
        } else {
            fmt::Mark::None
        };
        let line = format!("{}\n", fmt::report(index, mark, job, false));
        env.system.print_error(&line);
    }
}

/// Reports jobs whose state changed, as done before an interactive
/// prompt. Reported finished jobs leave the table.
pub fn notify_job_changes(env: &mut Env) {
    reap_children(env);
    let indices: Vec<usize> = env
        .jobs
        .iter()
        .filter(|(_, job)| !job.state_reported && job.state() != JobState::Running)
        .map(|(index, _)| index)
        .collect();
    let current = env.jobs.current_job();
    let previous = env.jobs.previous_job();
    for index in indices {
        let Some(job) = env.jobs.get_mut(index) else {
            continue;
        };
        job.state_reported = true;
        let mark = if current == Some(index) {
            fmt::Mark::Current
        } else if previous == Some(index) {
            fmt::Mark::Previous
        } else {
            fmt::Mark::None
        };
        let line = format!("{}\n", fmt::report(index, mark, job, false));
        env.system.print_error(&line);
    }
    env.jobs.remove_reported_done_jobs();
}
