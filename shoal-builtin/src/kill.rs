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

//! The `kill` built-in

use crate::common::{builtin_error, builtin_failure, output};
use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::job::{id, Pid};
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::signal::{self, Signal};
use shoal_env::Env;
use shoal_env::system::System;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut signal = Signal::SIGTERM;
    let mut operands = &args[..];

    match operands.first().map(|f| f.value.as_str()) {
        Some("-l") => {
            let listing = signal::iterator()
                .map(|sig| format!("{}) {}\n", sig as i32, signal::short_name(sig)))
                .format("")
                .to_string();
            return output(env, &listing);
        }
        Some("-s") => {
            let Some(name) = operands.get(1) else {
                return builtin_error(env, "kill", format_args!("missing signal name"));
            };
            match signal::parse_signal(&name.value) {
                Ok(sig) => signal = sig,
                Err(error) => return builtin_error(env, "kill", format_args!("{error}")),
            }
            operands = &operands[2..];
        }
        Some(first) if first.starts_with('-') && first.len() > 1 => {
            match signal::parse_signal(&first[1..]) {
                Ok(sig) => {
                    signal = sig;
                    operands = &operands[1..];
                }
                Err(error) => return builtin_error(env, "kill", format_args!("{error}")),
            }
        }
        _ => {}
    }

    if operands.is_empty() {
        return builtin_error(env, "kill", format_args!("missing target operand"));
    }

    let mut status = ExitStatus::SUCCESS;
    for operand in operands {
        let result = if operand.value.starts_with('%') {
            match id::parse(&operand.value) {
                Ok(job_id) => match job_id.find(&env.jobs) {
                    Ok(index) => {
                        let job = env.jobs.get(index).unwrap();
                        let pgid = job.pgid;
                        if job.job_controlled {
                            env.system.killpg(pgid, Some(signal))
                        } else {
                            env.system.kill(pgid, Some(signal))
                        }
                    }
                    Err(_) => {
                        let failure = builtin_failure(
                            env,
                            "kill",
                            format_args!("{}: no such job", operand.value),
                        );
                        status = failure.exit_status;
                        continue;
                    }
                },
                Err(_) => {
                    status = ExitStatus::FAILURE;
                    continue;
                }
            }
        } else {
            match operand.value.parse::<i32>() {
                Ok(pid) => env.system.kill(Pid::from_raw(pid), Some(signal)),
                Err(_) => {
                    let failure = builtin_failure(
                        env,
                        "kill",
                        format_args!("{}: not a valid process ID", operand.value),
                    );
                    status = failure.exit_status;
                    continue;
                }
            }
        };
        if let Err(errno) = result {
            let failure =
                builtin_failure(env, "kill", format_args!("{}: {errno}", operand.value));
            status = failure.exit_status;
        }
    }
    Result::new(status)
}
