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

//! The `unalias` built-in

use crate::common::builtin_failure;
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::Env;
use shoal_syntax::alias::AliasSet;
use std::rc::Rc;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.iter().any(|arg| arg.value == "-a") {
        env.aliases = Rc::new(AliasSet::new());
        return Result::new(ExitStatus::SUCCESS);
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        if !Rc::make_mut(&mut env.aliases).remove(&arg.value) {
            let result =
                builtin_failure(env, "unalias", format_args!("{}: not found", arg.value));
            status = result.exit_status;
        }
    }
    Result::new(status)
}
