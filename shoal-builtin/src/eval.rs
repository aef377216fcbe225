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

//! The `eval` built-in

use itertools::Itertools;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;
use std::num::NonZeroU64;
use std::ops::ControlFlow::{Break, Continue};

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let code = args.iter().map(|f| &f.value).format(" ").to_string();
    if code.is_empty() {
        return Result::new(ExitStatus::SUCCESS);
    }
    let flow = shoal_semantics::run_source(
        env,
        &code,
        shoal_syntax::source::Source::Eval,
        NonZeroU64::new(1).unwrap(),
    );
    match flow {
        Continue(()) => Result::new(env.exit_status),
        Break(divert) => Result {
            exit_status: divert.exit_status().unwrap_or(env.exit_status),
            divert: Break(divert),
        },
    }
}
