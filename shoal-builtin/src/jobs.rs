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

//! The `jobs` built-in

use crate::common::output;
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::job::{fmt, JobState};
use shoal_env::semantics::Field;
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut show_pids = false;
    let mut pids_only = false;
    let mut running_only = false;
    let mut stopped_only = false;
    for arg in &args {
        match arg.value.as_str() {
            "-l" => show_pids = true,
            "-p" => pids_only = true,
            "-r" => running_only = true,
            "-s" => stopped_only = true,
            _ => {}
        }
    }

    shoal_semantics::job::reap_children(env);

    let current = env.jobs.current_job();
    let previous = env.jobs.previous_job();
    let mut lines = Vec::new();
    let mut listed = Vec::new();
    for (index, job) in env.jobs.iter() {
        let state = job.state();
        if running_only && state != JobState::Running {
            continue;
        }
        if stopped_only && state != JobState::Stopped {
            continue;
        }
        if pids_only {
            lines.push(format!("{}\n", job.pgid));
        } else {
            let mark = if current == Some(index) {
                fmt::Mark::Current
            } else if previous == Some(index) {
                fmt::Mark::Previous
            } else {
                fmt::Mark::None
            };
            lines.push(format!("{}\n", fmt::report(index, mark, job, show_pids)));
        }
        listed.push(index);
    }

    // Jobs that have been listed as done are forgotten.
    for index in listed {
        if let Some(job) = env.jobs.get_mut(index) {
            job.state_reported = true;
        }
    }
    env.jobs.remove_reported_done_jobs();

    output(env, &lines.iter().format("").to_string())
}
