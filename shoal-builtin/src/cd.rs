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

//! The `cd` built-in

use crate::common::{builtin_failure, output};
use shoal_env::builtin::Result;
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::variable::Scope;
use shoal_env::Env;
use shoal_env::system::System;
use std::ffi::CString;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let operand = args.iter().map(|f| f.value.as_str()).find(|v| *v != "--");

    let mut print_new_dir = false;
    let target = match operand {
        None => match env.variables.get_scalar("HOME") {
            Some(home) => home.to_string(),
            None => {
                return builtin_failure(env, "cd", format_args!("HOME is not set"));
            }
        },
        Some("-") => match env.variables.get_scalar("OLDPWD") {
            Some(oldpwd) => {
                print_new_dir = true;
                oldpwd.to_string()
            }
            None => {
                return builtin_failure(env, "cd", format_args!("OLDPWD is not set"));
            }
        },
        Some(dir) => dir.to_string(),
    };

    let Ok(c_target) = CString::new(target.clone()) else {
        return builtin_failure(env, "cd", format_args!("invalid directory name"));
    };
    let old_pwd = env.system.getcwd().ok();
    if let Err(errno) = env.system.chdir(&c_target) {
        return builtin_failure(env, "cd", format_args!("{target}: {errno}"));
    }

    if let Some(old) = old_pwd {
        _ = env
            .variables
            .assign_scalar(Scope::Global, "OLDPWD", old.display().to_string());
    }
    let new_pwd = match env.system.getcwd() {
        Ok(path) => path.display().to_string(),
        Err(_) => target,
    };
    _ = env
        .variables
        .assign_scalar(Scope::Global, "PWD", new_pwd.clone());

    if print_new_dir {
        return output(env, &format!("{new_pwd}\n"));
    }
    Result::new(ExitStatus::SUCCESS)
}
