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

//! Job status formatting, as shown by the `jobs` built-in and by job
//! status change reports

use super::{Job, JobState, ProcessState};
use crate::signal;
use std::fmt::Write as _;

/// Which mark distinguishes the job in a listing
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mark {
    /// The current job (`+`)
    Current,
    /// The previous job (`-`)
    Previous,
    /// Any other job (space)
    None,
}

impl Mark {
    fn as_char(self) -> char {
        match self {
            Mark::Current => '+',
            Mark::Previous => '-',
            Mark::None => ' ',
        }
    }
}

/// Describes a job state for display.
#[must_use]
pub fn state_description(job: &Job) -> String {
    match job.state() {
        JobState::Running => "Running".to_string(),
        JobState::Stopped => {
            let signal = job
                .processes
                .iter()
                .find_map(|p| match p.state {
                    ProcessState::Stopped(signal) => Some(signal),
                    _ => None,
                })
                .unwrap_or(signal::Signal::SIGTSTP);
            match signal {
                signal::Signal::SIGTSTP => "Stopped".to_string(),
                signal => format!("Stopped({})", signal::short_name(signal)),
            }
        }
        JobState::Done => {
            let status = job.exit_status();
            match job.processes.last().map(|p| p.state) {
                Some(ProcessState::Signaled {
                    signal,
                    core_dumped,
                }) => {
                    let name = signal::short_name(signal);
                    if core_dumped {
                        format!("Killed({name}: core dumped)")
                    } else {
                        format!("Killed({name})")
                    }
                }
                _ if status.is_successful() => "Done".to_string(),
                _ => format!("Done({status})"),
            }
        }
    }
}

/// Formats one line of a `jobs` listing.
///
/// `index` is the slab index; the printed job number is `index + 1`. With
/// `show_pids`, the process group ID is included (`jobs -l`).
#[must_use]
pub fn report(index: usize, mark: Mark, job: &Job, show_pids: bool) -> String {
    let mut line = format!("[{}]{} ", index + 1, mark.as_char());
    if show_pids {
        write!(line, "{} ", job.pgid).unwrap();
    }
    write!(line, "{} {}", state_description(job), job.name).unwrap();
    if job.state() == JobState::Running {
        line.push_str(" &");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::super::Pid;
    use super::*;
    use crate::semantics::ExitStatus;

    fn job(name: &str) -> Job {
        Job::new(Pid::from_raw(42), name)
    }

    #[test]
    fn running_job() {
        assert_eq!(
            report(0, Mark::Current, &job("sleep 30"), false),
            "[1]+ Running sleep 30 &"
        );
    }

    #[test]
    fn stopped_job() {
        let mut j = job("vi letter");
        j.processes[0].state = ProcessState::Stopped(signal::Signal::SIGTSTP);
        assert_eq!(
            report(1, Mark::Previous, &j, false),
            "[2]- Stopped vi letter"
        );
    }

    #[test]
    fn done_jobs() {
        let mut j = job("true");
        j.processes[0].state = ProcessState::Exited(ExitStatus::SUCCESS);
        assert_eq!(report(2, Mark::None, &j, false), "[3]  Done true");

        j.processes[0].state = ProcessState::Exited(ExitStatus(4));
        assert_eq!(report(2, Mark::None, &j, false), "[3]  Done(4) true");
    }

    #[test]
    fn killed_job() {
        let mut j = job("loop");
        j.processes[0].state = ProcessState::Signaled {
            signal: signal::Signal::SIGKILL,
            core_dumped: false,
        };
        assert_eq!(report(0, Mark::None, &j, false), "[1]  Killed(KILL) loop");
    }

    #[test]
    fn listing_with_pid() {
        assert_eq!(
            report(0, Mark::Current, &job("cat"), true),
            "[1]+ 42 Running cat &"
        );
    }
}
