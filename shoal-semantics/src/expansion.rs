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

//! Word expansion
//!
//! Expansion of a word proceeds in phases, in this order:
//!
//! 1. The [initial expansion](initial) performs tilde expansion and, in one
//!    left-to-right pass, parameter expansion, command substitution, and
//!    arithmetic expansion. The result is a [phrase](phrase::Phrase) of
//!    [attributed characters](attr::AttrChar) that remember quoting.
//! 2. [Field splitting](split) divides the result at unquoted separator
//!    characters from `$IFS`.
//! 3. [Pathname expansion](glob) turns fields with unquoted pattern
//!    characters into matching pathnames.
//! 4. Quote removal strips the quoting characters; the attributes are
//!    dropped and plain [`Field`]s remain.

pub mod attr;
pub mod glob;
pub mod initial;
pub mod phrase;
pub mod split;

use self::attr::AttrField;
use self::initial::{Expand, ExpandContext};
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::system::Errno;
use shoal_env::variable::AssignError;
use shoal_env::Env;
use shoal_syntax::source::pretty::{Annotation, AnnotationType, MessageBase};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{Text, Word};
use std::borrow::Cow;
use thiserror::Error as ThisError;

/// Types of expansion errors
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorCause {
    /// Expansion of an unset parameter with `nounset` in effect, or an
    /// explicit `${param?}` error switch
    #[error("{message}: parameter `{name}` is not set")]
    UnsetParameter { name: String, message: String },

    /// Assignment switch (`${param=word}`) on a parameter that is not a
    /// variable
    #[error("cannot assign to parameter `{name}`")]
    NonassignableParameter { name: String },

    /// Assignment to a read-only variable during expansion
    #[error(transparent)]
    AssignReadOnly(#[from] AssignError),

    /// Error evaluating an arithmetic expansion
    #[error("arithmetic error: {0}")]
    Arith(shoal_arith::ErrorCause<AssignError>),

    /// System error performing a command or process substitution
    #[error("cannot perform the substitution: {0}")]
    SubstSystemError(Errno),

    /// Array subscript that does not evaluate to a usable index
    #[error("invalid subscript `{subscript}`")]
    BadSubscript { subscript: String },
}

/// Explanation of an expansion failure
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    pub cause: ErrorCause,
    pub location: Location,
}

impl Error {
    /// The exit status the failed command should report.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::FAILURE
    }
}

impl MessageBase for Error {
    fn message_title(&self) -> Cow<'_, str> {
        self.cause.to_string().into()
    }

    fn main_annotation(&self) -> Annotation<'_> {
        Annotation::new(
            AnnotationType::Error,
            self.cause.to_string().into(),
            &self.location,
        )
    }
}

/// Result of word expansion
pub type Result<T> = std::result::Result<T, Error>;

/// Expands words to fields for a command.
///
/// All phases are applied. The second return value is the exit status of
/// the last command substitution performed, if any; it becomes `$?` when a
/// command consists solely of substitutions.
pub fn expand_words(env: &mut Env, words: &[Word]) -> Result<(Vec<Field>, Option<ExitStatus>)> {
    let ifs = env
        .variables
        .get_scalar("IFS")
        .unwrap_or(" \t\n")
        .to_string();

    let mut fields = Vec::new();
    let mut last_status = None;
    for word in words {
        let mut cx = ExpandContext::new(env);
        let phrase = word.expand(&mut cx)?;
        if let Some(status) = cx.last_command_subst_status {
            last_status = Some(status);
        }

        let attr_fields = phrase.into_full().into_iter().map(|chars| AttrField {
            chars,
            origin: word.location.clone(),
        });
        let split_fields = split::split_fields(&ifs, attr_fields);
        glob::glob_fields(env, split_fields, &mut fields);
    }
    Ok((fields, last_status))
}

/// Expands a word to exactly one field.
///
/// No field splitting or pathname expansion is performed; multiple fields
/// from `"$@"` are joined with spaces.
pub fn expand_word(env: &mut Env, word: &Word) -> Result<(Field, Option<ExitStatus>)> {
    let mut cx = ExpandContext::new_single(env);
    let phrase = word.expand(&mut cx)?;
    let status = cx.last_command_subst_status;

    let mut fields = phrase.into_full();
    let chars = match fields.len() {
        0 => Vec::new(),
        1 => fields.pop().unwrap(),
        _ => {
            let mut joined = Vec::new();
            for (i, mut field) in fields.into_iter().enumerate() {
                if i > 0 {
                    joined.push(attr::AttrChar {
                        value: ' ',
                        origin: attr::Origin::SoftExpansion,
                        is_quoted: false,
                        is_quoting: false,
                    });
                }
                joined.append(&mut field);
            }
            joined
        }
    };
    let field = AttrField {
        chars,
        origin: word.location.clone(),
    }
    .remove_quotes_and_strip();
    Ok((field, status))
}

/// Expands a text to a string, as in a here-document body.
pub fn expand_text(env: &mut Env, text: &Text) -> Result<(String, Option<ExitStatus>)> {
    let mut cx = ExpandContext::new_single(env);
    let phrase = text.expand(&mut cx)?;
    let status = cx.last_command_subst_status;
    let value = phrase
        .into_full()
        .into_iter()
        .map(|chars| attr::strip(&chars))
        .collect::<Vec<_>>()
        .join(" ");
    Ok((value, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dummy_env;
    use shoal_env::variable::Scope;

    fn fields(env: &mut Env, word: &str) -> Vec<String> {
        let word: Word = word.parse().unwrap();
        let (fields, _) = expand_words(env, &[word]).unwrap();
        fields.into_iter().map(|f| f.value).collect()
    }

    #[test]
    fn splitting_of_unquoted_expansion() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "x", "a b  c")
            .unwrap();
        assert_eq!(fields(&mut env, "$x"), ["a", "b", "c"]);
        assert_eq!(fields(&mut env, "\"$x\""), ["a b  c"]);
    }

    #[test]
    fn empty_unquoted_expansion_produces_no_field() {
        let mut env = dummy_env();
        assert_eq!(fields(&mut env, "$unset_thing"), Vec::<String>::new());
        assert_eq!(fields(&mut env, "\"\""), [""]);
    }

    #[test]
    fn literal_text_is_not_split() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "IFS", "a")
            .unwrap();
        assert_eq!(fields(&mut env, "banana"), ["banana"]);
    }

    #[test]
    fn expand_word_joins_fields() {
        let mut env = dummy_env();
        env.variables
            .positional_params_mut()
            .extend(["x".to_string(), "y".to_string()]);
        let word: Word = "\"$@\"".parse().unwrap();
        let (field, _) = expand_word(&mut env, &word).unwrap();
        assert_eq!(field.value, "x y");
    }

    #[test]
    fn quote_removal_drops_quotes_only() {
        let mut env = dummy_env();
        assert_eq!(fields(&mut env, r#"a\ b'c d'"e""#), ["a bc de"]);
    }
}
