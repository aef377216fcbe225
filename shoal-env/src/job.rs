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

//! Job management
//!
//! The [`JobSet`] tracks the pipelines the shell has started and not yet
//! forgotten. Jobs are kept in a slab so a removed job's number is reused
//! by the next job, which yields the familiar small job numbers: job number
//! `n` is slab index `n - 1`.

pub mod fmt;
pub mod id;

use crate::semantics::ExitStatus;
use crate::signal::Signal;
#[doc(no_inline)]
pub use nix::unistd::Pid;
use slab::Slab;

/// State of a single process in a job
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessState {
    /// Still running
    Running,
    /// Suspended by a signal
    Stopped(Signal),
    /// Exited of its own accord
    Exited(ExitStatus),
    /// Killed by a signal
    Signaled {
        signal: Signal,
        core_dumped: bool,
    },
}

impl ProcessState {
    /// Whether the process has finished for good.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        matches!(self, ProcessState::Running | ProcessState::Stopped(_))
    }

    /// The exit status the process contributes to its pipeline.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ProcessState::Running | ProcessState::Stopped(_) => ExitStatus::SUCCESS,
            ProcessState::Exited(status) => *status,
            ProcessState::Signaled { signal, .. } => ExitStatus::from(*signal),
        }
    }
}

/// One process of a job
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Process {
    /// Process ID
    pub pid: Pid,
    /// Command text of this pipeline stage
    pub name: String,
    /// Last known state
    pub state: ProcessState,
}

/// Overall state of a job
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobState {
    Running,
    Stopped,
    Done,
}

/// Set of processes executing a pipeline
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Process group ID, equal to the first process's ID when the job runs
    /// in its own process group
    pub pgid: Pid,

    /// Whether the job runs in its own process group
    pub job_controlled: bool,

    /// Command text of the whole pipeline, shown by `jobs`
    pub name: String,

    /// Member processes in pipeline order; never empty
    pub processes: Vec<Process>,

    /// Whether the current state has been reported to the user
    pub state_reported: bool,
}

impl Job {
    /// Creates a job for a single process.
    pub fn new<S: Into<String>>(pid: Pid, name: S) -> Job {
        let name = name.into();
        Job {
            pgid: pid,
            job_controlled: false,
            name: name.clone(),
            processes: vec![Process {
                pid,
                name,
                state: ProcessState::Running,
            }],
            state_reported: false,
        }
    }

    /// Computes the overall state from the member processes.
    ///
    /// A job is `Done` when no process is alive, `Stopped` when any process
    /// is stopped, and `Running` otherwise.
    #[must_use]
    pub fn state(&self) -> JobState {
        if self.processes.iter().all(|p| !p.state.is_alive()) {
            return JobState::Done;
        }
        if self
            .processes
            .iter()
            .any(|p| matches!(p.state, ProcessState::Stopped(_)))
        {
            return JobState::Stopped;
        }
        JobState::Running
    }

    /// The exit status of the job: that of its last process.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        self.processes
            .last()
            .map(|p| p.state.exit_status())
            .unwrap_or_default()
    }
}

/// Collection of jobs
#[derive(Clone, Debug)]
pub struct JobSet {
    jobs: Slab<Job>,
    /// Index of the current job (`%+`)
    current: Option<usize>,
    /// Index of the previous job (`%-`)
    previous: Option<usize>,
    /// Process ID of the most recent asynchronous command, for `$!`
    last_async_pid: Pid,
}

impl JobSet {
    #[must_use]
    pub fn new() -> JobSet {
        JobSet {
            jobs: Slab::new(),
            current: None,
            previous: None,
            last_async_pid: Pid::from_raw(0),
        }
    }

    /// Adds a job and returns its index.
    ///
    /// The smallest free index is reused, and the new job becomes the
    /// current job.
    pub fn add(&mut self, job: Job) -> usize {
        let index = self.jobs.insert(job);
        self.set_current(index);
        index
    }

    /// Removes the job at the given index.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        let job = self.jobs.try_remove(index);
        if job.is_some() {
            if self.current == Some(index) {
                self.current = self.previous.take();
            } else if self.previous == Some(index) {
                self.previous = None;
            }
            if self.previous.is_none() {
                let current = self.current;
                let previous = self.iter().map(|(i, _)| i).find(|&i| Some(i) != current);
                self.previous = previous;
            }
        }
        job
    }

    /// Returns the job at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    /// Returns a mutable reference to the job at the given index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    /// Iterates over jobs with their indices, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Job)> {
        self.jobs.iter()
    }

    /// Number of jobs in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the set has no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Index of the current job (`%+`).
    #[must_use]
    pub fn current_job(&self) -> Option<usize> {
        self.current
    }

    /// Index of the previous job (`%-`).
    #[must_use]
    pub fn previous_job(&self) -> Option<usize> {
        self.previous
    }

    /// Makes the job at the given index the current job.
    pub fn set_current(&mut self, index: usize) {
        if self.current != Some(index) {
            self.previous = self.current;
            self.current = Some(index);
        }
    }

    /// Finds the job containing the given process ID.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<usize> {
        self.jobs
            .iter()
            .find(|(_, job)| job.processes.iter().any(|p| p.pid == pid))
            .map(|(index, _)| index)
    }

    /// Records a state change of the given process.
    ///
    /// Returns the index of the job the process belongs to, if any. A job
    /// that becomes stopped is made the current job, following the rule
    /// that `%+` is the most recently stopped or started job.
    pub fn update_process_state(&mut self, pid: Pid, state: ProcessState) -> Option<usize> {
        let index = self.find_by_pid(pid)?;
        let job = &mut self.jobs[index];
        for process in &mut job.processes {
            if process.pid == pid {
                if process.state != state {
                    process.state = state;
                    job.state_reported = false;
                }
                break;
            }
        }
        if job.state() == JobState::Stopped {
            self.set_current(index);
        }
        Some(index)
    }

    /// Removes jobs whose state is `Done` and has been reported.
    pub fn remove_reported_done_jobs(&mut self) {
        let indices: Vec<usize> = self
            .jobs
            .iter()
            .filter(|(_, job)| job.state() == JobState::Done && job.state_reported)
            .map(|(index, _)| index)
            .collect();
        for index in indices {
            self.remove(index);
        }
    }

    /// Process ID of the most recent asynchronous command, for `$!`.
    #[must_use]
    pub fn last_async_pid(&self) -> Pid {
        self.last_async_pid
    }

    /// Records the process ID of an asynchronous command.
    pub fn set_last_async_pid(&mut self, pid: Pid) {
        self.last_async_pid = pid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(pid: i32) -> Job {
        Job::new(Pid::from_raw(pid), format!("job {pid}"))
    }

    #[test]
    fn indices_are_reused_smallest_first() {
        let mut set = JobSet::new();
        let a = set.add(job(10));
        let b = set.add(job(11));
        let c = set.add(job(12));
        assert_eq!((a, b, c), (0, 1, 2));
        set.remove(b);
        assert_eq!(set.add(job(13)), 1);
        assert_eq!(set.add(job(14)), 3);
    }

    #[test]
    fn current_and_previous() {
        let mut set = JobSet::new();
        let a = set.add(job(10));
        assert_eq!(set.current_job(), Some(a));
        assert_eq!(set.previous_job(), None);
        let b = set.add(job(11));
        assert_eq!(set.current_job(), Some(b));
        assert_eq!(set.previous_job(), Some(a));
    }

    #[test]
    fn removing_current_promotes_previous() {
        let mut set = JobSet::new();
        let a = set.add(job(10));
        let b = set.add(job(11));
        set.remove(b);
        assert_eq!(set.current_job(), Some(a));
    }

    #[test]
    fn stopping_a_job_makes_it_current() {
        let mut set = JobSet::new();
        let _a = set.add(job(10));
        let b = set.add(job(11));
        let c = set.add(job(12));
        assert_eq!(set.current_job(), Some(c));
        set.update_process_state(Pid::from_raw(11), ProcessState::Stopped(Signal::SIGTSTP));
        assert_eq!(set.current_job(), Some(b));
        assert_eq!(set.previous_job(), Some(c));
    }

    #[test]
    fn job_state_from_processes() {
        let mut j = job(10);
        assert_eq!(j.state(), JobState::Running);
        j.processes[0].state = ProcessState::Stopped(Signal::SIGSTOP);
        assert_eq!(j.state(), JobState::Stopped);
        j.processes[0].state = ProcessState::Exited(ExitStatus(0));
        assert_eq!(j.state(), JobState::Done);
    }

    #[test]
    fn exit_status_is_last_processes() {
        let mut j = job(10);
        j.processes.push(Process {
            pid: Pid::from_raw(11),
            name: "tail".to_string(),
            state: ProcessState::Exited(ExitStatus(3)),
        });
        j.processes[0].state = ProcessState::Exited(ExitStatus(0));
        assert_eq!(j.exit_status(), ExitStatus(3));
    }

    #[test]
    fn update_process_state_finds_job() {
        let mut set = JobSet::new();
        let a = set.add(job(10));
        let index =
            set.update_process_state(Pid::from_raw(10), ProcessState::Exited(ExitStatus(0)));
        assert_eq!(index, Some(a));
        assert_eq!(set.get(a).unwrap().state(), JobState::Done);
        assert_eq!(
            set.update_process_state(Pid::from_raw(99), ProcessState::Running),
            None
        );
    }

    #[test]
    fn reported_done_jobs_are_removed() {
        let mut set = JobSet::new();
        let a = set.add(job(10));
        let b = set.add(job(11));
        set.update_process_state(Pid::from_raw(10), ProcessState::Exited(ExitStatus(0)));
        set.get_mut(a).unwrap().state_reported = true;
        set.remove_reported_done_jobs();
        assert!(set.get(a).is_none());
        assert!(set.get(b).is_some());
    }
}
