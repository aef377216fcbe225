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

//! The `fg` built-in

use crate::common::{builtin_failure, output};
use shoal_env::builtin::Result;
use shoal_env::job::{id, ProcessState};
use shoal_env::semantics::Field;
use shoal_env::Env;
use shoal_env::system::System;

/// Finds the job named by the first operand, or the current job.
pub(crate) fn find_job(env: &mut Env, args: &[Field], name: &str) -> std::result::Result<usize, Result> {
    let job_id = match args.first() {
        None => id::JobId::CurrentJob,
        Some(arg) => match id::parse(&arg.value) {
            Ok(job_id) => job_id,
            Err(error) => {
                return Err(builtin_failure(env, name, format_args!("{error}")))
            }
        },
    };
    // The parsed ID borrows the operand, so resolve before reporting.
    match job_id.find(&env.jobs) {
        Ok(index) => Ok(index),
        Err(error) => Err(builtin_failure(env, name, format_args!("{error}"))),
    }
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if !env.controls_jobs() {
        return builtin_failure(env, "fg", format_args!("job control is not enabled"));
    }
    let index = match find_job(env, &args, "fg") {
        Ok(index) => index,
        Err(result) => return result,
    };

    let (pgid, name) = {
        let job = env.jobs.get_mut(index).unwrap();
        for process in &mut job.processes {
            if let ProcessState::Stopped(_) = process.state {
                process.state = ProcessState::Running;
            }
        }
        (job.pgid, job.name.clone())
    };

    let print = output(env, &format!("{name}\n"));
    if !print.exit_status.is_successful() {
        return print;
    }

    shoal_semantics::job::give_terminal_to(env, pgid);
    _ = env.system.killpg(pgid, Some(shoal_env::signal::Signal::SIGCONT));
    let status = shoal_semantics::job::wait_for_job(env, index);
    shoal_semantics::job::reclaim_terminal(env);
    Result::new(status)
}
