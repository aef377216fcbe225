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

//! Type definitions for functions

use shoal_syntax::source::Location;
use shoal_syntax::syntax::FullCompoundCommand;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Shell function
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
    /// Name by which the function is called
    pub name: String,

    /// Command executed when the function is called
    ///
    /// The body is shared with the syntax tree the function was defined in.
    pub body: Rc<FullCompoundCommand>,

    /// Location of the defining command
    pub origin: Location,

    /// Location of the command that made the function read-only, if any
    pub read_only_location: Option<Location>,
}

impl Function {
    /// Creates a new function.
    pub fn new<N: Into<String>>(
        name: N,
        body: Rc<FullCompoundCommand>,
        origin: Location,
    ) -> Function {
        Function {
            name: name.into(),
            body,
            origin,
            read_only_location: None,
        }
    }

    /// Whether the function is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only_location.is_some()
    }
}

/// Error redefining or removing a read-only function
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("read-only function `{name}` cannot be modified")]
pub struct ModifyError {
    pub name: String,
    pub read_only_location: Location,
}

/// Collection of functions, searchable by name
#[derive(Clone, Debug, Default)]
pub struct FunctionSet {
    functions: HashMap<String, Rc<Function>>,
}

impl FunctionSet {
    #[must_use]
    pub fn new() -> FunctionSet {
        FunctionSet::default()
    }

    /// Returns the function with the given name, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Function>> {
        self.functions.get(name)
    }

    /// Defines a function, replacing any existing definition of the same
    /// name.
    pub fn define(&mut self, function: Function) -> Result<(), ModifyError> {
        if let Some(existing) = self.functions.get(&function.name) {
            if let Some(location) = &existing.read_only_location {
                return Err(ModifyError {
                    name: function.name,
                    read_only_location: location.clone(),
                });
            }
        }
        self.functions
            .insert(function.name.clone(), Rc::new(function));
        Ok(())
    }

    /// Removes the function with the given name.
    pub fn remove(&mut self, name: &str) -> Result<Option<Rc<Function>>, ModifyError> {
        if let Some(existing) = self.functions.get(name) {
            if let Some(location) = &existing.read_only_location {
                return Err(ModifyError {
                    name: name.to_string(),
                    read_only_location: location.clone(),
                });
            }
        }
        Ok(self.functions.remove(name))
    }

    /// Iterates over all functions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Function>> {
        self.functions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> Function {
        let body: shoal_syntax::syntax::Command = "{ :; }".parse().unwrap();
        let shoal_syntax::syntax::Command::Compound(body) = body else {
            unreachable!()
        };
        Function::new(name, Rc::new(body), Location::dummy(name))
    }

    #[test]
    fn define_get_remove() {
        let mut set = FunctionSet::new();
        assert!(set.get("f").is_none());
        set.define(function("f")).unwrap();
        assert_eq!(set.get("f").unwrap().name, "f");
        set.remove("f").unwrap();
        assert!(set.get("f").is_none());
    }

    #[test]
    fn read_only_functions_cannot_be_replaced() {
        let mut set = FunctionSet::new();
        let mut f = function("f");
        f.read_only_location = Some(Location::dummy("readonly -f f"));
        set.define(f).unwrap();
        let error = set.define(function("f")).unwrap_err();
        assert_eq!(error.name, "f");
        let error = set.remove("f").unwrap_err();
        assert_eq!(error.name, "f");
    }
}
