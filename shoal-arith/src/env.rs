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

//! Variable access interface
//!
//! This crate stores no variables itself. The caller of
//! [`eval`](crate::eval) supplies an implementation of [`Env`] through which
//! the evaluator reads identifiers and writes assignments back.

use std::collections::HashMap;
use std::convert::Infallible;
use std::ops::Range;

/// Interface for accessing variables during evaluation
pub trait Env {
    /// Error returned when assigning to a variable fails
    type AssignError;

    /// Returns the value of the named variable, or `None` if unset.
    fn get_variable(&self, name: &str) -> Option<&str>;

    /// Assigns a new value to the named variable.
    ///
    /// `location` is the index range in the evaluated expression where the
    /// assignment occurs, for use in error reports.
    fn assign_variable(
        &mut self,
        name: &str,
        value: String,
        location: Range<usize>,
    ) -> Result<(), Self::AssignError>;
}

/// Minimal environment for tests and standalone evaluation
impl Env for HashMap<String, String> {
    type AssignError = Infallible;

    fn get_variable(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn assign_variable(
        &mut self,
        name: &str,
        value: String,
        _location: Range<usize>,
    ) -> Result<(), Infallible> {
        self.insert(name.to_string(), value);
        Ok(())
    }
}
