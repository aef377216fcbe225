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

//! Tilde expansion
//!
//! `~` expands to `$HOME`, `~user` to the user's home directory from the
//! password database, `~+` to `$PWD`, and `~-` to `$OLDPWD`. The result is
//! a hard expansion: it undergoes neither field splitting nor pathname
//! expansion. An unresolvable tilde prefix is left as written.

use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::ExpandContext;
use shoal_env::system::System;

/// Expands a tilde prefix with the given login name.
pub fn expand_tilde(name: &str, cx: &mut ExpandContext) -> Phrase {
    let value = match name {
        "" => cx.env.variables.get_scalar("HOME").map(str::to_string),
        "+" => cx.env.variables.get_scalar("PWD").map(str::to_string),
        "-" => cx.env.variables.get_scalar("OLDPWD").map(str::to_string),
        user => cx
            .env
            .system
            .home_directory(user)
            .map(|path| path.to_string_lossy().into_owned()),
    };

    match value {
        Some(value) => Phrase::from_str_attrs(&value, Origin::HardExpansion, cx.in_double_quotes),
        // Unresolvable: keep the original spelling.
        None => Phrase::from_str_attrs(
            &format!("~{name}"),
            Origin::Literal,
            cx.in_double_quotes,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::attr::strip;
    use super::*;
    use crate::tests::dummy_env;
    use shoal_env::variable::Scope;

    #[test]
    fn home_and_pwd() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "HOME", "/home/me")
            .unwrap();
        env.variables
            .assign_scalar(Scope::Global, "PWD", "/tmp")
            .unwrap();
        let mut cx = ExpandContext::new(&mut env);

        let fields = expand_tilde("", &mut cx).into_full();
        assert_eq!(strip(&fields[0]), "/home/me");
        assert_eq!(fields[0][0].origin, Origin::HardExpansion);

        let fields = expand_tilde("+", &mut cx).into_full();
        assert_eq!(strip(&fields[0]), "/tmp");
    }

    #[test]
    fn unknown_user_stays_verbatim() {
        let mut env = dummy_env();
        let mut cx = ExpandContext::new(&mut env);
        let fields = expand_tilde("no_such_user_here", &mut cx).into_full();
        assert_eq!(strip(&fields[0]), "~no_such_user_here");
        assert_eq!(fields[0][0].origin, Origin::Literal);
    }
}
