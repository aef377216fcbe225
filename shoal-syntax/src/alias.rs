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

//! Alias definitions
//!
//! The parser performs alias substitution while reading command words. It
//! accesses the alias table through the [`Glossary`] trait so the table
//! itself can live in the execution environment.

use crate::source::Location;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

/// Alias definition
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    /// Name that triggers the substitution
    pub name: String,
    /// Text the name is replaced with
    pub replacement: String,
    /// Whether the alias applies even where a command name is not expected
    pub global: bool,
    /// Location of the word that defined this alias
    pub origin: Location,
}

/// Collection of aliases searchable by name
pub trait Glossary: Debug {
    /// Returns the alias definition with the given name, if any.
    fn look_up(&self, name: &str) -> Option<Rc<Alias>>;

    /// Returns true if the glossary contains no aliases.
    ///
    /// The parser skips the substitution machinery entirely for an empty
    /// glossary.
    fn is_empty(&self) -> bool;
}

/// Glossary that contains no aliases
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EmptyGlossary;

impl Glossary for EmptyGlossary {
    fn look_up(&self, _name: &str) -> Option<Rc<Alias>> {
        None
    }
    fn is_empty(&self) -> bool {
        true
    }
}

/// Alias table
#[derive(Clone, Debug, Default)]
pub struct AliasSet {
    entries: HashMap<String, Rc<Alias>>,
}

impl AliasSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines an alias, replacing any previous definition of the same name.
    pub fn insert(&mut self, alias: Alias) {
        self.entries.insert(alias.name.clone(), Rc::new(alias));
    }

    /// Undefines an alias. Returns true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Iterates over all definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Alias>> {
        self.entries.values()
    }

    /// Returns the definition with the given name, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Alias>> {
        self.entries.get(name)
    }
}

impl Glossary for AliasSet {
    fn look_up(&self, name: &str) -> Option<Rc<Alias>> {
        self.entries.get(name).map(Rc::clone)
    }
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(name: &str, replacement: &str) -> Alias {
        Alias {
            name: name.to_string(),
            replacement: replacement.to_string(),
            global: false,
            origin: Location::dummy(name.to_string()),
        }
    }

    #[test]
    fn insert_look_up_remove() {
        let mut set = AliasSet::new();
        assert!(Glossary::is_empty(&set));
        set.insert(alias("ll", "ls -l"));
        assert!(!Glossary::is_empty(&set));
        assert_eq!(set.look_up("ll").unwrap().replacement, "ls -l");
        assert_eq!(set.look_up("ls"), None);
        assert!(set.remove("ll"));
        assert!(!set.remove("ll"));
    }

    #[test]
    fn redefinition_replaces() {
        let mut set = AliasSet::new();
        set.insert(alias("g", "git"));
        set.insert(alias("g", "grep"));
        assert_eq!(set.look_up("g").unwrap().replacement, "grep");
    }
}
