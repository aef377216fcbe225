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

//! Initial expansion: tilde, parameter, command substitution, arithmetic
//!
//! The initial expansion turns syntactic word parts into [`Phrase`]s of
//! attributed characters, in a single left-to-right pass. Field splitting,
//! pathname expansion, and quote removal run afterwards on the result.

mod arith;
mod command_subst;
pub mod param;
mod text;
mod tilde;
mod word;

use super::phrase::Phrase;
use super::Error;
use shoal_env::semantics::ExitStatus;
use shoal_env::Env;

/// Context of an initial expansion
///
/// Wraps the environment with the quoting state of the expansion site and
/// collects the exit status of the last command substitution, which
/// becomes `$?` when the substitution is the whole command.
#[derive(Debug)]
pub struct ExpandContext<'a> {
    /// Shell environment
    pub env: &'a mut Env,
    /// Whether the expansion site is inside double quotes
    pub in_double_quotes: bool,
    /// Whether the result will undergo field splitting
    ///
    /// This is false inside double quotes and for words that expand to a
    /// single field, such as the subject of a `case` command.
    pub will_split: bool,
    /// Exit status of the last command substitution performed
    pub last_command_subst_status: Option<ExitStatus>,
}

impl<'a> ExpandContext<'a> {
    /// Creates a context for expanding a word to multiple fields.
    pub fn new(env: &'a mut Env) -> Self {
        ExpandContext {
            env,
            in_double_quotes: false,
            will_split: true,
            last_command_subst_status: None,
        }
    }

    /// Creates a context for expanding a word to a single field.
    pub fn new_single(env: &'a mut Env) -> Self {
        ExpandContext {
            env,
            in_double_quotes: false,
            will_split: false,
            last_command_subst_status: None,
        }
    }
}

/// Evaluates an arithmetic expression string in the environment.
///
/// This is the entry point used by the arithmetic command, the C-style
/// for loop, and numeric `[[ ]]` comparisons.
pub fn eval_in_env(
    env: &mut Env,
    expression: &str,
    location: &shoal_syntax::source::Location,
) -> std::result::Result<i64, Error> {
    self::arith::eval_expression(env, expression, location)
}

/// Syntactic elements that can perform the initial expansion
pub trait Expand {
    /// Expands `self` to a phrase.
    fn expand(&self, cx: &mut ExpandContext) -> Result<Phrase, Error>;
}

impl<T: Expand> Expand for [T] {
    fn expand(&self, cx: &mut ExpandContext) -> Result<Phrase, Error> {
        let mut phrase = Phrase::one_empty_field();
        for item in self {
            phrase.append(item.expand(cx)?);
        }
        Ok(phrase)
    }
}
