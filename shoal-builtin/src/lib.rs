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

//! Built-in utilities
//!
//! Each module implements one built-in with the signature required by the
//! [contract](shoal_env::builtin): it receives the environment and its
//! arguments (without the command name) and returns an exit status with
//! an optional control-flow divert. [`builtins`] produces the registry
//! the shell starts with.

pub mod alias;
pub mod bg;
pub mod r#break;
pub mod cd;
pub mod colon;
pub mod common;
pub mod r#continue;
pub mod disown;
pub mod echo;
pub mod eval;
pub mod exec;
pub mod exit;
pub mod export;
pub mod fg;
pub mod jobs;
pub mod kill;
pub mod local;
pub mod pwd;
pub mod readonly;
pub mod r#return;
pub mod set;
pub mod shift;
pub mod source;
pub mod trap;
pub mod umask;
pub mod unalias;
pub mod unset;
pub mod wait;

use shoal_env::builtin::{Builtin, Type};
use std::collections::HashMap;

/// Returns the standard set of built-ins.
#[must_use]
pub fn builtins() -> HashMap<&'static str, Builtin> {
    fn special(execute: shoal_env::builtin::Main) -> Builtin {
        Builtin {
            r#type: Type::Special,
            execute,
        }
    }
    fn mandatory(execute: shoal_env::builtin::Main) -> Builtin {
        Builtin {
            r#type: Type::Mandatory,
            execute,
        }
    }

    let mut map = HashMap::new();
    map.insert(":", special(colon::main));
    map.insert(".", special(source::main));
    map.insert("source", special(source::main));
    map.insert("break", special(r#break::main));
    map.insert("continue", special(r#continue::main));
    map.insert("eval", special(eval::main));
    map.insert("exec", special(exec::main));
    map.insert("exit", special(exit::main));
    map.insert("export", special(export::main));
    map.insert("readonly", special(readonly::main));
    map.insert("return", special(r#return::main));
    map.insert("set", special(set::main));
    map.insert("shift", special(shift::main));
    map.insert("trap", special(trap::main));
    map.insert("unset", special(unset::main));

    map.insert("alias", mandatory(alias::main));
    map.insert("bg", mandatory(bg::main));
    map.insert("cd", mandatory(cd::main));
    map.insert("disown", mandatory(disown::main));
    map.insert("echo", mandatory(echo::main));
    map.insert("fg", mandatory(fg::main));
    map.insert("jobs", mandatory(jobs::main));
    map.insert("kill", mandatory(kill::main));
    map.insert("local", mandatory(local::main));
    map.insert("pwd", mandatory(pwd::main));
    map.insert("umask", mandatory(umask::main));
    map.insert("unalias", mandatory(unalias::main));
    map.insert("wait", mandatory(wait::main));
    map
}
