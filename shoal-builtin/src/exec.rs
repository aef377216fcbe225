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

//! The `exec` built-in
//!
//! With operands, the named utility replaces the shell without forking.
//! Without operands, `exec` succeeds and any redirections applied to it
//! have already taken effect on the shell's descriptors.

use shoal_env::builtin::Result;
use shoal_env::semantics::{Divert, ExitStatus, Field};
use shoal_env::system::Errno;
use shoal_env::system::System;
use shoal_env::Env;
use std::ffi::CString;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let Some(name) = args.first() else {
        return Result::new(ExitStatus::SUCCESS);
    };
    let name = name.value.clone();

    let path = if name.contains('/') {
        CString::new(name.clone()).ok()
    } else {
        shoal_semantics::command_search::search_path(env, &name)
    };
    let Some(path) = path else {
        env.print_simple_error(format_args!("exec: {name}: command not found"));
        return exec_failure(env, ExitStatus::NOT_FOUND);
    };

    env.traps.disable_internal_handlers(&mut *env.system);
    let argv: Vec<CString> = args
        .iter()
        .filter_map(|f| CString::new(f.value.clone()).ok())
        .collect();
    let envs = env.variables.env_c_strings();
    let error = match env.system.execve(&path, &argv, &envs) {
        Err(errno) => errno,
        Ok(never) => match never {},
    };
    env.print_simple_error(format_args!("exec: {name}: cannot execute: {error}"));
    let status = match error {
        Errno::ENOENT | Errno::ENOTDIR => ExitStatus::NOT_FOUND,
        _ => ExitStatus::NOEXEC,
    };
    exec_failure(env, status)
}

/// A failed `exec` terminates a non-interactive shell.
fn exec_failure(env: &mut Env, status: ExitStatus) -> Result {
    if env.is_interactive() {
        Result::new(status)
    } else {
        Result::with_divert(status, Divert::Exit(Some(status)))
    }
}
