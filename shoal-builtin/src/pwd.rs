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

//! The `pwd` built-in

use crate::common::{builtin_failure, output};
use shoal_env::builtin::Result;
use shoal_env::semantics::Field;
use shoal_env::Env;
use shoal_env::system::System;

pub fn main(env: &mut Env, _args: Vec<Field>) -> Result {
    match env.system.getcwd() {
        Ok(path) => output(env, &format!("{}\n", path.display())),
        Err(errno) => builtin_failure(env, "pwd", format_args!("{errno}")),
    }
}
