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

//! Shell arithmetic evaluation
//!
//! This crate evaluates the integer expressions appearing in `$((...))` and
//! `((...))`: C-like precedence, 64-bit signed arithmetic, the full operator
//! set including assignments, increments, the conditional operator, and the
//! comma. Identifiers are resolved through the caller-supplied [`Env`] trait,
//! and assignments are written back through the same trait.
//!
//! ```
//! # use std::collections::HashMap;
//! # use shoal_arith::{eval, Value};
//! let mut env = HashMap::new();
//! env.insert("x".to_string(), "6".to_string());
//! assert_eq!(eval("x * 7", &mut env).unwrap(), Value::Integer(42));
//! ```

mod env;
mod eval;
mod token;

pub use self::env::Env;
pub use self::token::TokenError;

use std::fmt::Display;
use std::ops::Range;

/// Result of arithmetic evaluation
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    Integer(i64),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => i.fmt(f),
        }
    }
}

/// Cause of an evaluation error
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorCause<E> {
    /// Error in tokenization
    TokenError(TokenError),
    /// A token where none or a different one was expected
    UnexpectedToken,
    /// The expression ended where more tokens were expected
    IncompleteExpression,
    /// The left-hand side of an assignment or `++`/`--` is not a variable
    AssignmentToValue,
    /// A variable value that does not parse as a number
    InvalidVariableValue(String),
    /// Result out of the 64-bit signed range
    Overflow,
    /// Division or remainder by zero
    DivisionByZero,
    /// Exponentiation with a negative exponent
    NegativeExponent,
    /// Error assigning a variable
    AssignVariableError(E),
}

impl<E: Display> Display for ErrorCause<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorCause::*;
        match self {
            TokenError(e) => e.fmt(f),
            UnexpectedToken => "unexpected token".fmt(f),
            IncompleteExpression => "incomplete expression".fmt(f),
            AssignmentToValue => "cannot assign to a value".fmt(f),
            InvalidVariableValue(v) => {
                write!(f, "variable value {v:?} cannot be parsed as a number")
            }
            Overflow => "overflow".fmt(f),
            DivisionByZero => "division by zero".fmt(f),
            NegativeExponent => "exponent less than zero".fmt(f),
            AssignVariableError(e) => e.fmt(f),
        }
    }
}

impl<E> From<TokenError> for ErrorCause<E> {
    fn from(e: TokenError) -> Self {
        ErrorCause::TokenError(e)
    }
}

/// Evaluation error with its position in the expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error<E> {
    pub cause: ErrorCause<E>,
    pub location: Range<usize>,
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cause.fmt(f)
    }
}

impl<E: std::fmt::Debug + Display> std::error::Error for Error<E> {}

impl<E> From<token::Error> for Error<E> {
    fn from(e: token::Error) -> Self {
        Error {
            cause: e.cause.into(),
            location: e.location,
        }
    }
}

/// Parses and evaluates an arithmetic expression.
pub fn eval<E: Env>(expression: &str, env: &mut E) -> Result<Value, Error<E::AssignError>> {
    eval::Evaluator::new(expression, env).run()
}
