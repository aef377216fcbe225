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

//! Variables and positional parameters
//!
//! A [`VariableSet`] is a stack of contexts. The base context holds global
//! variables; a function call [pushes](VariableSet::push_context) a context
//! that holds its local variables and positional parameters. Name lookup
//! walks the stack from the top; plain assignment updates the context where
//! the name is found (dynamic scoping) and otherwise defines the variable
//! globally.

use shoal_quote::quoted;
use shoal_syntax::source::Location;
use std::collections::HashMap;
use std::ffi::CString;
use std::fmt::Write as _;
use thiserror::Error;

/// Value of a variable
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// Single string value
    Scalar(String),
    /// Indexed array
    Array(Vec<String>),
    /// Associative array
    Associative(HashMap<String, String>),
}

pub use Value::*;

impl Value {
    /// Creates a scalar value.
    pub fn scalar<S: Into<String>>(value: S) -> Value {
        Scalar(value.into())
    }

    /// Creates an indexed array value.
    pub fn array<I, S>(values: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Array(values.into_iter().map(Into::into).collect())
    }

    /// Formats the value as it would be written in an assignment.
    #[must_use]
    pub fn quote(&self) -> String {
        match self {
            Scalar(value) => quoted(value).into_owned(),
            Array(values) => {
                let mut result = "(".to_string();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        result.push(' ');
                    }
                    result.push_str(&quoted(value));
                }
                result.push(')');
                result
            }
            Associative(values) => {
                let mut pairs: Vec<_> = values.iter().collect();
                pairs.sort();
                let mut result = "(".to_string();
                for (i, (key, value)) in pairs.into_iter().enumerate() {
                    if i > 0 {
                        result.push(' ');
                    }
                    write!(result, "[{}]={}", quoted(key), quoted(value)).unwrap();
                }
                result.push(')');
                result
            }
        }
    }
}

/// Variable with its attributes
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    /// Value, or `None` for a declared but unset variable
    pub value: Option<Value>,

    /// Whether the variable is exported to child process environments
    pub is_exported: bool,

    /// Location of the command that made the variable read-only, if any
    pub read_only_location: Option<Location>,

    /// Whether assigned values are evaluated as arithmetic expressions
    pub is_integer: bool,

    /// Whether the variable holds an associative array
    ///
    /// A subscripted assignment to such a variable uses the subscript as a
    /// string key instead of an arithmetic index.
    pub is_associative: bool,
}

impl Variable {
    /// Creates a variable with a scalar value and no attributes.
    pub fn new_scalar<S: Into<String>>(value: S) -> Variable {
        Variable {
            value: Some(Value::scalar(value)),
            ..Variable::default()
        }
    }

    /// Whether the variable is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only_location.is_some()
    }

    /// Returns the scalar string form of the value.
    ///
    /// An array converts to its first element for contexts that require a
    /// scalar, matching the behavior of referencing an array without a
    /// subscript.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.value {
            Some(Scalar(value)) => Some(value),
            Some(Array(values)) => values.first().map(String::as_str),
            Some(Associative(_)) | None => None,
        }
    }
}

/// Error assigning to a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("read-only variable `{name}` cannot be assigned")]
pub struct AssignError {
    /// Name of the variable
    pub name: String,
    /// Location of the command that made the variable read-only
    pub read_only_location: Location,
}

/// Error unsetting a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("read-only variable `{name}` cannot be unset")]
pub struct UnsetError {
    pub name: String,
    pub read_only_location: Location,
}

/// Where an assignment takes effect
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// Update the variable where visible, or define it globally.
    Global,
    /// Define the variable in the current (topmost) context.
    Local,
}

/// Kind of a variable context
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextKind {
    /// Base context holding global variables
    Regular,
    /// Context for a function call, holding local variables and the
    /// function's positional parameters
    Function,
}

#[derive(Clone, Debug)]
struct Context {
    kind: ContextKind,
    variables: HashMap<String, Variable>,
    /// Positional parameters, present in the base context and in function
    /// contexts
    positional_params: Option<Vec<String>>,
}

/// Collection of variables and positional parameters
#[derive(Clone, Debug)]
pub struct VariableSet {
    contexts: Vec<Context>,
}

impl Default for VariableSet {
    fn default() -> Self {
        VariableSet {
            contexts: vec![Context {
                kind: ContextKind::Regular,
                variables: HashMap::new(),
                positional_params: Some(Vec::new()),
            }],
        }
    }
}

impl VariableSet {
    #[must_use]
    pub fn new() -> VariableSet {
        VariableSet::default()
    }

    /// Returns the variable with the given name, if visible.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.contexts
            .iter()
            .rev()
            .find_map(|context| context.variables.get(name))
    }

    /// Returns the scalar value of the named variable, if any.
    #[must_use]
    pub fn get_scalar(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_scalar()
    }

    /// Assigns a variable.
    ///
    /// With [`Scope::Global`], the assignment updates the variable in the
    /// context where it is visible, keeping its attributes, or defines it
    /// in the base context. With [`Scope::Local`], the variable is defined
    /// in the topmost context.
    ///
    /// Returns the previous value, if any.
    pub fn assign(
        &mut self,
        scope: Scope,
        name: String,
        value: Variable,
    ) -> Result<Option<Variable>, AssignError> {
        let context_index = match scope {
            Scope::Local => self.contexts.len() - 1,
            Scope::Global => self
                .contexts
                .iter()
                .rposition(|context| context.variables.contains_key(&name))
                .unwrap_or(0),
        };
        let variables = &mut self.contexts[context_index].variables;

        if let Some(existing) = variables.get(&name) {
            if let Some(location) = &existing.read_only_location {
                return Err(AssignError {
                    name,
                    read_only_location: location.clone(),
                });
            }
        }

        // Merge attributes of the existing variable unless explicitly set.
        let mut value = value;
        if let Some(existing) = variables.get(&name) {
            value.is_exported |= existing.is_exported;
            value.is_integer |= existing.is_integer;
            value.is_associative |= existing.is_associative;
        }
        Ok(variables.insert(name, value))
    }

    /// Assigns a scalar value with default attributes, a convenience for
    /// the common case.
    pub fn assign_scalar<N, V>(
        &mut self,
        scope: Scope,
        name: N,
        value: V,
    ) -> Result<Option<Variable>, AssignError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.assign(scope, name.into(), Variable::new_scalar(value.into()))
    }

    /// Returns a mutable reference to the named variable, creating an
    /// unset one in the given scope if missing.
    pub fn get_or_new(&mut self, scope: Scope, name: &str) -> &mut Variable {
        let context_index = match scope {
            Scope::Local => self.contexts.len() - 1,
            Scope::Global => self
                .contexts
                .iter()
                .rposition(|context| context.variables.contains_key(name))
                .unwrap_or(0),
        };
        self.contexts[context_index]
            .variables
            .entry(name.to_string())
            .or_default()
    }

    /// Unsets the named variable wherever it is visible.
    pub fn unset(&mut self, name: &str) -> Result<Option<Variable>, UnsetError> {
        for context in self.contexts.iter_mut().rev() {
            if let Some(variable) = context.variables.get(name) {
                if let Some(location) = &variable.read_only_location {
                    return Err(UnsetError {
                        name: name.to_string(),
                        read_only_location: location.clone(),
                    });
                }
                return Ok(context.variables.remove(name));
            }
        }
        Ok(None)
    }

    /// Iterates over all visible variables.
    ///
    /// A name shadowed by a local variable is reported once, with the
    /// shadowing definition.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        let mut seen = std::collections::HashSet::new();
        self.contexts
            .iter()
            .rev()
            .flat_map(|context| context.variables.iter())
            .filter(move |(name, _)| seen.insert(name.as_str().to_string()))
            .map(|(name, variable)| (name.as_str(), variable))
    }

    /// Returns the exported variables as `NAME=VALUE` C strings for
    /// passing to `execve`.
    #[must_use]
    pub fn env_c_strings(&self) -> Vec<CString> {
        self.iter()
            .filter(|(_, variable)| variable.is_exported)
            .filter_map(|(name, variable)| {
                let value = variable.as_scalar()?;
                CString::new(format!("{name}={value}")).ok()
            })
            .collect()
    }

    /// Imports variables from the process environment.
    pub fn extend_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in vars {
            let variable = Variable {
                value: Some(Value::scalar(value.into())),
                is_exported: true,
                ..Variable::default()
            };
            // Imported variables are never read-only, so this cannot fail.
            self.assign(Scope::Global, name.into(), variable).unwrap();
        }
    }

    /// Pushes a variable context.
    pub fn push_context(&mut self, kind: ContextKind, positional_params: Option<Vec<String>>) {
        self.contexts.push(Context {
            kind,
            variables: HashMap::new(),
            positional_params,
        });
    }

    /// Pops the topmost variable context.
    ///
    /// # Panics
    ///
    /// If the base context would be popped.
    pub fn pop_context(&mut self) {
        assert!(
            self.contexts.len() > 1,
            "the base variable context must not be popped"
        );
        self.contexts.pop();
    }

    /// Returns the positional parameters.
    #[must_use]
    pub fn positional_params(&self) -> &[String] {
        self.contexts
            .iter()
            .rev()
            .find_map(|context| context.positional_params.as_deref())
            .unwrap()
    }

    /// Returns a mutable reference to the positional parameters.
    pub fn positional_params_mut(&mut self) -> &mut Vec<String> {
        self.contexts
            .iter_mut()
            .rev()
            .find_map(|context| context.positional_params.as_mut())
            .unwrap()
    }

    /// Whether the set currently has a function context.
    #[must_use]
    pub fn in_function(&self) -> bool {
        self.contexts
            .iter()
            .any(|context| context.kind == ContextKind::Function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_assignment_and_lookup() {
        let mut set = VariableSet::new();
        set.assign_scalar(Scope::Global, "x", "1").unwrap();
        assert_eq!(set.get_scalar("x"), Some("1"));
        assert_eq!(set.get_scalar("y"), None);
    }

    #[test]
    fn local_variables_shadow_and_disappear() {
        let mut set = VariableSet::new();
        set.assign_scalar(Scope::Global, "x", "global").unwrap();
        set.push_context(ContextKind::Function, Some(vec![]));
        set.assign_scalar(Scope::Local, "x", "local").unwrap();
        assert_eq!(set.get_scalar("x"), Some("local"));
        set.pop_context();
        assert_eq!(set.get_scalar("x"), Some("global"));
    }

    #[test]
    fn global_assignment_updates_visible_local() {
        let mut set = VariableSet::new();
        set.push_context(ContextKind::Function, Some(vec![]));
        set.assign_scalar(Scope::Local, "x", "a").unwrap();
        set.assign_scalar(Scope::Global, "x", "b").unwrap();
        assert_eq!(set.get_scalar("x"), Some("b"));
        set.pop_context();
        // The update happened in the function context, not globally.
        assert_eq!(set.get_scalar("x"), None);
    }

    #[test]
    fn read_only_variables_reject_assignment() {
        let mut set = VariableSet::new();
        let variable = Variable {
            value: Some(Value::scalar("fixed")),
            read_only_location: Some(Location::dummy("readonly x")),
            ..Variable::default()
        };
        set.assign(Scope::Global, "x".to_string(), variable).unwrap();
        let error = set.assign_scalar(Scope::Global, "x", "other").unwrap_err();
        assert_eq!(error.name, "x");
        let error = set.unset("x").unwrap_err();
        assert_eq!(error.name, "x");
    }

    #[test]
    fn export_attribute_survives_reassignment() {
        let mut set = VariableSet::new();
        let exported = Variable {
            value: Some(Value::scalar("1")),
            is_exported: true,
            ..Variable::default()
        };
        set.assign(Scope::Global, "x".to_string(), exported).unwrap();
        set.assign_scalar(Scope::Global, "x", "2").unwrap();
        assert!(set.get("x").unwrap().is_exported);
    }

    #[test]
    fn positional_params_per_function() {
        let mut set = VariableSet::new();
        set.positional_params_mut().extend(["a".to_string()]);
        set.push_context(ContextKind::Function, Some(vec!["b".to_string()]));
        assert_eq!(set.positional_params(), ["b".to_string()]);
        set.pop_context();
        assert_eq!(set.positional_params(), ["a".to_string()]);
    }

    #[test]
    fn env_c_strings_contain_exported_scalars() {
        let mut set = VariableSet::new();
        set.extend_env([("PATH", "/bin")]);
        set.assign_scalar(Scope::Global, "local_only", "x").unwrap();
        let env = set.env_c_strings();
        assert!(env.contains(&CString::new("PATH=/bin").unwrap()));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn value_quoting() {
        assert_eq!(Value::scalar("plain").quote(), "plain");
        assert_eq!(Value::scalar("two words").quote(), "'two words'");
        assert_eq!(
            Value::array(["a", "b c"]).quote(),
            "(a 'b c')"
        );
    }

    #[test]
    fn unset_removes_from_inner_context() {
        let mut set = VariableSet::new();
        set.assign_scalar(Scope::Global, "x", "g").unwrap();
        set.push_context(ContextKind::Function, None);
        set.assign_scalar(Scope::Local, "x", "l").unwrap();
        set.unset("x").unwrap();
        assert_eq!(set.get_scalar("x"), Some("g"));
    }
}
