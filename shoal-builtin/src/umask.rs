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

//! The `umask` built-in

use crate::common::{builtin_error, output};
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::system::Mode;
use shoal_env::system::System;
use shoal_env::Env;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match args.first() {
        None => {
            let current = env.system.umask(Mode::empty());
            env.system.umask(current);
            output(env, &format!("{:04o}\n", current.bits()))
        }
        Some(arg) => match u32::from_str_radix(&arg.value, 8) {
            Ok(bits) if bits <= 0o777 => {
                env.system.umask(Mode::from_bits_truncate(bits as _));
                Result::new(ExitStatus::SUCCESS)
            }
            _ => builtin_error(env, "umask", format_args!("`{}` is not a valid mask", arg.value)),
        },
    }
}
