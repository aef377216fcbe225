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

//! The `disown` built-in

use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.is_empty() || args.iter().any(|arg| arg.value == "-a") {
        let indices: Vec<usize> = env.jobs.iter().map(|(index, _)| index).collect();
        for index in indices {
            env.jobs.remove(index);
        }
        return Result::new(ExitStatus::SUCCESS);
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        match crate::fg::find_job(env, std::slice::from_ref(arg), "disown") {
            Ok(index) => {
                env.jobs.remove(index);
            }
            Err(result) => status = result.exit_status,
        }
    }
    Result::new(status)
}
