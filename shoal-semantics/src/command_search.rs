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

//! Command search
//!
//! A command name resolves, in order, to: a special built-in, a function,
//! an ordinary built-in, or an external utility found in `$PATH`. A name
//! containing a slash bypasses the search and is used as a path directly.

use shoal_env::builtin::{Builtin, Type};
use shoal_env::function::Function;
use shoal_env::Env;
use shoal_env::system::System;
use std::ffi::CString;
use std::rc::Rc;

/// Result of command search
#[derive(Clone, Debug)]
pub enum Target {
    /// Built-in utility
    Builtin {
        builtin: Builtin,
        is_special: bool,
    },
    /// Function
    Function(Rc<Function>),
    /// External utility at the given path
    External { path: CString },
    /// Nothing found
    NotFound,
}

/// Searches for the target of a command name.
pub fn search(env: &mut Env, name: &str) -> Target {
    if name.contains('/') {
        return match CString::new(name) {
            Ok(path) => Target::External { path },
            Err(_) => Target::NotFound,
        };
    }

    if let Some(&builtin) = env.builtins.get(name) {
        if builtin.r#type == Type::Special {
            return Target::Builtin {
                builtin,
                is_special: true,
            };
        }
    }

    if let Some(function) = env.functions.get(name) {
        return Target::Function(Rc::clone(function));
    }

    if let Some(&builtin) = env.builtins.get(name) {
        return Target::Builtin {
            builtin,
            is_special: false,
        };
    }

    match search_path(env, name) {
        Some(path) => Target::External { path },
        None => Target::NotFound,
    }
}

/// Searches `$PATH` for an executable file with the given name.
pub fn search_path(env: &mut Env, name: &str) -> Option<CString> {
    let path = env.variables.get_scalar("PATH").unwrap_or("").to_string();
    for dir in path.split(':') {
        let candidate = if dir.is_empty() {
            name.to_string()
        } else {
            format!("{dir}/{name}")
        };
        let Ok(candidate) = CString::new(candidate) else {
            continue;
        };
        if env.system.is_executable_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dummy_env;
    use assert_matches::assert_matches;
    use shoal_env::semantics::ExitStatus;

    fn stub_builtin(r#type: Type) -> Builtin {
        fn execute(
            _env: &mut Env,
            _args: Vec<shoal_env::semantics::Field>,
        ) -> shoal_env::builtin::Result {
            shoal_env::builtin::Result::new(ExitStatus::SUCCESS)
        }
        Builtin { r#type, execute }
    }

    fn stub_function(name: &str) -> Function {
        let body: shoal_syntax::syntax::Command = "{ :; }".parse().unwrap();
        let shoal_syntax::syntax::Command::Compound(body) = body else {
            unreachable!()
        };
        Function::new(
            name,
            Rc::new(body),
            shoal_syntax::source::Location::dummy(name),
        )
    }

    #[test]
    fn special_builtins_beat_functions() {
        let mut env = dummy_env();
        env.builtins.insert("set", stub_builtin(Type::Special));
        env.functions.define(stub_function("set")).unwrap();
        assert_matches!(
            search(&mut env, "set"),
            Target::Builtin {
                is_special: true,
                ..
            }
        );
    }

    #[test]
    fn functions_beat_ordinary_builtins() {
        let mut env = dummy_env();
        env.builtins.insert("jobs", stub_builtin(Type::Mandatory));
        env.functions.define(stub_function("jobs")).unwrap();
        assert_matches!(search(&mut env, "jobs"), Target::Function(_));
    }

    #[test]
    fn slash_bypasses_search() {
        let mut env = dummy_env();
        assert_matches!(search(&mut env, "./script"), Target::External { path } => {
            assert_eq!(path.to_str().unwrap(), "./script");
        });
    }

    #[test]
    fn unknown_command_is_not_found() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(shoal_env::variable::Scope::Global, "PATH", "/nonexistent")
            .unwrap();
        assert_matches!(search(&mut env, "no-such-thing"), Target::NotFound);
    }
}
