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

//! The `.` (`source`) built-in

use crate::common::{builtin_error, builtin_failure};
use shoal_env::builtin::Result;
use shoal_env::semantics::{Divert, Field};
use shoal_env::stack::Frame;
use shoal_env::system::{Mode, OFlag, System};
use shoal_env::Env;
use shoal_syntax::source::Source;
use std::ffi::CString;
use std::num::NonZeroU64;
use std::ops::ControlFlow::{Break, Continue};

/// Reads a whole file through the system interface.
fn read_file(env: &mut Env, path: &str) -> std::result::Result<String, String> {
    let c_path = CString::new(path).map_err(|_| "invalid file name".to_string())?;
    let fd = env
        .system
        .open(&c_path, OFlag::O_RDONLY, Mode::empty())
        .map_err(|errno| errno.to_string())?;
    let mut content = Vec::new();
    let mut buffer = [0; 4096];
    loop {
        match env.system.read(fd, &mut buffer) {
            Ok(0) => break,
            Ok(count) => content.extend_from_slice(&buffer[..count]),
            Err(shoal_env::system::Errno::EINTR) => {}
            Err(errno) => {
                _ = env.system.close(fd);
                return Err(errno.to_string());
            }
        }
    }
    _ = env.system.close(fd);
    String::from_utf8(content).map_err(|_| "file is not valid UTF-8".to_string())
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let Some(path) = args.first() else {
        return builtin_error(env, ".", format_args!("missing file operand"));
    };
    let path = path.value.clone();

    let content = match read_file(env, &path) {
        Ok(content) => content,
        Err(message) => {
            return builtin_failure(env, ".", format_args!("{path}: {message}"));
        }
    };

    env.stack.push(Frame::DotScript);
    let flow = shoal_semantics::run_source(
        env,
        &content,
        Source::DotScript { path },
        NonZeroU64::new(1).unwrap(),
    );
    env.stack.pop();

    match flow {
        Continue(()) => Result::new(env.exit_status),
        Break(Divert::Return(status)) => {
            Result::new(status.unwrap_or(env.exit_status))
        }
        Break(divert) => Result {
            exit_status: divert.exit_status().unwrap_or(env.exit_status),
            divert: Break(divert),
        },
    }
}
