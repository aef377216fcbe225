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

//! Arithmetic expansion

use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::super::{Error, ErrorCause};
use super::{Expand, ExpandContext};
use shoal_env::variable::{AssignError, Scope};
use shoal_env::Env;
use shoal_syntax::source::Location;
use shoal_syntax::syntax::Text;

/// Adapter exposing shell variables to the arithmetic evaluator
#[derive(Debug)]
pub struct VarEnv<'a> {
    pub env: &'a mut Env,
}

impl shoal_arith::Env for VarEnv<'_> {
    type AssignError = AssignError;

    fn get_variable(&self, name: &str) -> Option<&str> {
        self.env.variables.get_scalar(name)
    }

    fn assign_variable(
        &mut self,
        name: &str,
        value: String,
        _location: std::ops::Range<usize>,
    ) -> Result<(), AssignError> {
        self.env
            .variables
            .assign_scalar(Scope::Global, name, value)
            .map(drop)
    }
}

/// Evaluates an arithmetic expression string against the environment.
pub fn eval_expression(
    env: &mut Env,
    expression: &str,
    location: &Location,
) -> Result<i64, Error> {
    let mut var_env = VarEnv { env };
    match shoal_arith::eval(expression, &mut var_env) {
        Ok(shoal_arith::Value::Integer(value)) => Ok(value),
        Err(error) => Err(Error {
            cause: ErrorCause::Arith(error.cause),
            location: location.clone(),
        }),
    }
}

/// Expands `$((...))`.
///
/// The content text is expanded first (parameter expansions and nested
/// substitutions apply), then the result is evaluated as an integer
/// expression.
pub fn expand_arith(
    content: &Text,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let in_double_quotes = cx.in_double_quotes;

    let content_phrase = {
        // The expression is a single string; no field generation inside.
        let was_quotes = cx.in_double_quotes;
        let was_split = cx.will_split;
        cx.will_split = false;
        let result = content.expand(cx);
        cx.in_double_quotes = was_quotes;
        cx.will_split = was_split;
        result?
    };
    let expression: String = content_phrase
        .into_full()
        .into_iter()
        .map(|chars| super::super::attr::strip(&chars))
        .collect();

    let value = eval_expression(cx.env, &expression, location)?;
    Ok(Phrase::from_str_attrs(
        &value.to_string(),
        Origin::SoftExpansion,
        in_double_quotes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dummy_env;
    use assert_matches::assert_matches;
    use shoal_syntax::syntax::TextUnit;

    fn arith_phrase(env: &mut Env, source: &str) -> Result<String, Error> {
        let text: Text = Text(source.chars().map(TextUnit::Literal).collect());
        let mut cx = ExpandContext::new(env);
        let location = Location::dummy(source);
        let phrase = expand_arith(&text, &location, &mut cx)?;
        Ok(phrase
            .into_full()
            .into_iter()
            .map(|chars| super::super::super::attr::strip(&chars))
            .collect())
    }

    #[test]
    fn evaluates_constant_expressions() {
        let mut env = dummy_env();
        assert_eq!(arith_phrase(&mut env, "6 * 7").unwrap(), "42");
    }

    #[test]
    fn reads_and_writes_variables() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "n", "5")
            .unwrap();
        assert_eq!(arith_phrase(&mut env, "n += 2").unwrap(), "7");
        assert_eq!(env.variables.get_scalar("n"), Some("7"));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let mut env = dummy_env();
        let error = arith_phrase(&mut env, "1 / 0").unwrap_err();
        assert_matches!(
            error.cause,
            ErrorCause::Arith(shoal_arith::ErrorCause::DivisionByZero)
        );
    }
}
