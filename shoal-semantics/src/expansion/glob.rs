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

//! Pathname expansion
//!
//! A field containing unquoted pattern characters is matched against the
//! file system, one path component at a time. Names starting with a period
//! are only matched by patterns that spell the period literally. A pattern
//! matching nothing stays as written, unless the `nullglob` option removes
//! it.

use super::attr::{to_pattern_chars, AttrField, Origin};
use shoal_env::option::{Option as ShellOption, State};
use shoal_env::semantics::Field;
use shoal_env::Env;
use shoal_fnmatch::{Config, Pattern, PatternChar};

/// Performs pathname expansion on the fields, appending results to `out`.
///
/// Quote removal is part of this step: fields that do not glob are
/// stripped of their quoting characters and passed through.
pub fn glob_fields(env: &mut Env, fields: Vec<AttrField>, out: &mut Vec<Field>) {
    let glob_enabled = env.options.get(ShellOption::Glob) == State::On;
    let null_glob = env.options.get(ShellOption::NullGlob) == State::On;

    for field in fields {
        let has_pattern = field.chars.iter().any(|c| {
            !c.is_quoted
                && !c.is_quoting
                && c.origin != Origin::HardExpansion
                && matches!(c.value, '*' | '?' | '[')
        });
        if !glob_enabled || !has_pattern {
            out.push(field.remove_quotes_and_strip());
            continue;
        }

        let pattern: Vec<PatternChar> = to_pattern_chars(&field.chars).collect();
        let mut matches = glob_pattern(&pattern);
        if matches.is_empty() {
            if !null_glob {
                out.push(field.remove_quotes_and_strip());
            }
        } else {
            matches.sort();
            let origin = field.origin;
            out.extend(matches.into_iter().map(|value| Field {
                value,
                origin: origin.clone(),
            }));
        }
    }
}

/// Joins a directory prefix and an entry name.
fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if prefix.ends_with('/') {
        format!("{prefix}{name}")
    } else {
        format!("{prefix}/{name}")
    }
}

/// Expands a whole pattern to matching pathnames.
fn glob_pattern(pattern: &[PatternChar]) -> Vec<String> {
    let components: Vec<&[PatternChar]> = pattern
        .split(|c| c.char_value() == '/')
        .collect();

    let mut prefixes: Vec<String> = if pattern.first().map(|c| c.char_value()) == Some('/')
    {
        vec!["/".to_string()]
    } else {
        vec![String::new()]
    };
    let components = if prefixes[0] == "/" {
        &components[1..]
    } else {
        &components[..]
    };

    for (i, component) in components.iter().enumerate() {
        let last = i + 1 == components.len();
        let mut next = Vec::new();
        for prefix in &prefixes {
            expand_component(prefix, component, last, &mut next);
        }
        prefixes = next;
        if prefixes.is_empty() {
            break;
        }
    }
    prefixes
}

/// Expands one path component against one directory prefix.
fn expand_component(prefix: &str, component: &[PatternChar], last: bool, out: &mut Vec<String>) {
    // An empty component comes from consecutive or trailing slashes.
    if component.is_empty() {
        let candidate = format!("{}/", prefix.trim_end_matches('/'));
        let candidate = if prefix.is_empty() { "/".to_string() } else { candidate };
        if std::path::Path::new(&candidate).is_dir() {
            out.push(candidate);
        }
        return;
    }

    let Ok(pattern) =
        Pattern::parse_with_config(component.iter().copied(), Config::full_match())
    else {
        return;
    };

    // A literal component needs no directory scan, just an existence test.
    if let Some(literal) = pattern.as_literal() {
        let candidate = join(prefix, literal);
        let exists = if last {
            std::fs::symlink_metadata(&candidate).is_ok()
        } else {
            std::path::Path::new(&candidate).is_dir()
        };
        if exists {
            out.push(candidate);
        }
        return;
    }

    let read_from = if prefix.is_empty() { "." } else { prefix };
    let Ok(entries) = std::fs::read_dir(read_from) else {
        return;
    };
    let explicit_period = pattern.ast().starts_with_literal_period();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with('.') && !explicit_period {
            continue;
        }
        if pattern.is_match(name) {
            let candidate = join(prefix, name);
            if last || std::path::Path::new(&candidate).is_dir() {
                out.push(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::attr::AttrChar;
    use super::*;
    use crate::tests::dummy_env;
    use shoal_syntax::source::Location;
    use std::fs::File;

    fn unquoted_field(s: &str) -> AttrField {
        AttrField {
            chars: s.chars().map(AttrChar::literal).collect(),
            origin: Location::dummy(s),
        }
    }

    fn glob_in_dir(dir: &std::path::Path, pattern: &str) -> Vec<String> {
        let mut env = dummy_env();
        let pattern = format!("{}/{}", dir.display(), pattern);
        let mut out = Vec::new();
        glob_fields(&mut env, vec![unquoted_field(&pattern)], &mut out);
        out.into_iter()
            .map(|f| {
                f.value
                    .strip_prefix(&format!("{}/", dir.display()))
                    .map(str::to_string)
                    .unwrap_or(f.value)
            })
            .collect()
    }

    #[test]
    fn matching_files() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.rs")).unwrap();
        File::create(dir.path().join("b.rs")).unwrap();
        File::create(dir.path().join("c.txt")).unwrap();

        assert_eq!(glob_in_dir(dir.path(), "*.rs"), ["a.rs", "b.rs"]);
        assert_eq!(glob_in_dir(dir.path(), "?.txt"), ["c.txt"]);
    }

    #[test]
    fn hidden_files_need_explicit_period() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("shown")).unwrap();

        assert_eq!(glob_in_dir(dir.path(), "*"), ["shown"]);
        assert_eq!(glob_in_dir(dir.path(), ".h*"), [".hidden"]);
    }

    #[test]
    fn unmatched_pattern_stays_literal() {
        let dir = tempfile::tempdir().unwrap();
        let results = glob_in_dir(dir.path(), "*.nope");
        assert_eq!(results, ["*.nope"]);
    }

    #[test]
    fn unmatched_pattern_with_nullglob_vanishes() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = dummy_env();
        env.options.set(ShellOption::NullGlob, State::On);
        let pattern = format!("{}/{}", dir.path().display(), "*.nope");
        let mut out = Vec::new();
        glob_fields(&mut env, vec![unquoted_field(&pattern)], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn quoted_pattern_characters_do_not_glob() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("x")).unwrap();
        let mut env = dummy_env();
        let mut field = unquoted_field("*");
        field.chars[0].is_quoted = true;
        let mut out = Vec::new();
        glob_fields(&mut env, vec![field], &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, "*");
    }

    #[test]
    fn multi_component_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/inner.rs")).unwrap();

        assert_eq!(glob_in_dir(dir.path(), "s*/inner.rs"), ["sub/inner.rs"]);
        assert_eq!(glob_in_dir(dir.path(), "s*/*.rs"), ["sub/inner.rs"]);
    }
}
