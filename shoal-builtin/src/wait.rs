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

//! The `wait` built-in

use crate::common::builtin_failure;
use shoal_env::builtin::Result;
use shoal_env::job::{id, JobState, Pid};
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.is_empty() {
        // Wait for every job the shell knows about.
        loop {
            let running = env
                .jobs
                .iter()
                .find(|(_, job)| job.state() == JobState::Running)
                .map(|(index, _)| index);
            match running {
                Some(index) => {
                    _ = shoal_semantics::job::wait_for_job(env, index);
                }
                None => break,
            }
        }
        env.jobs.remove_reported_done_jobs();
        return Result::new(ExitStatus::SUCCESS);
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        let index = if arg.value.starts_with('%') {
            match id::parse(&arg.value) {
                Ok(job_id) => match job_id.find(&env.jobs) {
                    Ok(index) => Some(index),
                    Err(_) => None,
                },
                Err(_) => None,
            }
        } else {
            match arg.value.parse::<i32>() {
                Ok(pid) => env.jobs.find_by_pid(Pid::from_raw(pid)),
                Err(_) => None,
            }
        };
        match index {
            Some(index) => {
                status = shoal_semantics::job::wait_for_job(env, index);
            }
            None => {
                // An unknown process yields 127, as POSIX specifies.
                let result =
                    builtin_failure(env, "wait", format_args!("{}: no such job", arg.value));
                _ = result;
                status = ExitStatus::NOT_FOUND;
            }
        }
    }
    Result::new(status)
}
