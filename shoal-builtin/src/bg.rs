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

//! The `bg` built-in

use crate::common::{builtin_failure, output};
use shoal_env::builtin::Result;
use shoal_env::job::ProcessState;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;
use shoal_env::system::System;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if !env.controls_jobs() {
        return builtin_failure(env, "bg", format_args!("job control is not enabled"));
    }
    let index = match crate::fg::find_job(env, &args, "bg") {
        Ok(index) => index,
        Err(result) => return result,
    };

    let (pgid, line) = {
        let job = env.jobs.get_mut(index).unwrap();
        for process in &mut job.processes {
            if let ProcessState::Stopped(_) = process.state {
                process.state = ProcessState::Running;
            }
        }
        job.state_reported = true;
        (job.pgid, format!("[{}]+ {} &\n", index + 1, job.name))
    };

    _ = env.system.killpg(pgid, Some(shoal_env::signal::Signal::SIGCONT));
    let print = output(env, &line);
    if !print.exit_status.is_successful() {
        return print;
    }
    Result::new(ExitStatus::SUCCESS)
}
