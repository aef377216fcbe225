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

//! Parameter expansion
//!
//! This module resolves parameters (variables with optional subscripts,
//! special parameters, positionals) to values and applies the braced
//! expansion modifiers: switches, trims, pattern substitution, case
//! conversion, substrings, length, indirection, and name listing.

mod modifier;

use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::super::{Error, ErrorCause};
use super::{Expand, ExpandContext};
use shoal_env::option::{Option as ShellOption, State};
use shoal_env::variable::Value;
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{BracedParam, Modifier, Param, ParamType, SpecialParam, Subscript};

/// Resolved value of a parameter before modifiers
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParamValue {
    /// The parameter is not set.
    Unset,
    /// Single string value
    Scalar(String),
    /// Multiple values (`$@`, `$*`, whole arrays), with a flag telling
    /// whether a quoted expansion keeps the fields separate (`@`) or joins
    /// them (`*`)
    Fields { values: Vec<String>, split: bool },
}

impl ParamValue {
    fn is_unset(&self) -> bool {
        matches!(self, ParamValue::Unset)
    }

    fn is_unset_or_empty(&self) -> bool {
        match self {
            ParamValue::Unset => true,
            ParamValue::Scalar(value) => value.is_empty(),
            ParamValue::Fields { values, .. } => {
                values.is_empty() || (values.len() == 1 && values[0].is_empty())
            }
        }
    }
}

/// Expands a parameter without braces (`$foo`, `$1`, `$@`).
pub fn expand_raw_param(
    param: &Param,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let value = resolve(param, None, location, cx)?;
    let value = check_unset(value, param, location, cx)?;
    Ok(into_phrase(value, cx))
}

/// Expands a braced parameter expansion (`${...}`).
pub fn expand_braced_param(braced: &BracedParam, cx: &mut ExpandContext) -> Result<Phrase, Error> {
    let location = &braced.location;

    if let Modifier::Names { joined } = braced.modifier {
        let mut names: Vec<String> = cx
            .env
            .variables
            .iter()
            .filter(|(name, _)| name.starts_with(&braced.param.id))
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort();
        let value = ParamValue::Fields {
            values: names,
            split: !joined,
        };
        return Ok(into_phrase(value, cx));
    }

    // `${!arr[@]}` lists the keys of an array.
    if braced.indirect && matches!(braced.index, Some(Subscript::At | Subscript::Star)) {
        let keys = array_keys(&braced.param, cx);
        let value = ParamValue::Fields {
            values: keys,
            split: matches!(braced.index, Some(Subscript::At)),
        };
        return Ok(into_phrase(value, cx));
    }

    let indirect_param;
    let (param, index) = if braced.indirect {
        let target = resolve(&braced.param, braced.index.as_ref(), location, cx)?;
        let name = match target {
            ParamValue::Scalar(name) => name,
            _ => String::new(),
        };
        indirect_param = Param {
            r#type: classify(&name),
            id: name,
        };
        (&indirect_param, None)
    } else {
        (&braced.param, braced.index.as_ref())
    };

    let value = resolve(param, index, location, cx)?;

    if braced.modifier == Modifier::Length {
        let length = match &value {
            ParamValue::Unset => 0,
            ParamValue::Scalar(value) => value.chars().count(),
            ParamValue::Fields { values, .. } => values.len(),
        };
        return Ok(Phrase::from_str_attrs(
            &length.to_string(),
            Origin::SoftExpansion,
            cx.in_double_quotes,
        ));
    }

    match &braced.modifier {
        Modifier::None => {
            let value = check_unset(value, param, location, cx)?;
            Ok(into_phrase(value, cx))
        }
        Modifier::Switch(switch) => modifier::apply_switch(switch, value, param, location, cx),
        Modifier::Trim(trim) => {
            let value = check_unset(value, param, location, cx)?;
            modifier::apply_trim(trim, value, cx)
        }
        Modifier::Subst(subst) => {
            let value = check_unset(value, param, location, cx)?;
            modifier::apply_subst(subst, value, cx)
        }
        Modifier::CaseConv(conv) => {
            let value = check_unset(value, param, location, cx)?;
            modifier::apply_case_conv(conv, value, cx)
        }
        Modifier::Substring(substring) => {
            let value = check_unset(value, param, location, cx)?;
            modifier::apply_substring(substring, value, location, cx)
        }
        Modifier::Length | Modifier::Names { .. } => unreachable!("handled above"),
    }
}

/// Classifies a parameter name string, as for indirection targets.
fn classify(id: &str) -> ParamType {
    if id == "0" {
        return ParamType::Special(SpecialParam::Zero);
    }
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        return ParamType::Positional(id.parse().unwrap_or(usize::MAX));
    }
    let mut chars = id.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(special) = SpecialParam::from_char(c) {
            return ParamType::Special(special);
        }
    }
    ParamType::Variable
}

/// Looks up the value of a parameter with an optional subscript.
pub fn resolve(
    param: &Param,
    index: Option<&Subscript>,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<ParamValue, Error> {
    use SpecialParam::*;
    let value = match param.r#type {
        ParamType::Special(At) => ParamValue::Fields {
            values: cx.env.variables.positional_params().to_vec(),
            split: true,
        },
        ParamType::Special(Asterisk) => ParamValue::Fields {
            values: cx.env.variables.positional_params().to_vec(),
            split: false,
        },
        ParamType::Special(Number) => {
            ParamValue::Scalar(cx.env.variables.positional_params().len().to_string())
        }
        ParamType::Special(Question) => ParamValue::Scalar(cx.env.exit_status.to_string()),
        ParamType::Special(Hyphen) => ParamValue::Scalar(cx.env.options.short_flags()),
        ParamType::Special(Dollar) => ParamValue::Scalar(cx.env.main_pid.to_string()),
        ParamType::Special(Exclamation) => {
            let pid = cx.env.jobs.last_async_pid();
            if pid.as_raw() == 0 {
                ParamValue::Unset
            } else {
                ParamValue::Scalar(pid.to_string())
            }
        }
        ParamType::Special(Zero) => ParamValue::Scalar(cx.env.arg0.clone()),
        ParamType::Positional(n) => match n
            .checked_sub(1)
            .and_then(|i| cx.env.variables.positional_params().get(i))
        {
            Some(value) => ParamValue::Scalar(value.clone()),
            None => ParamValue::Unset,
        },
        ParamType::Variable => {
            let Some(variable) = cx.env.variables.get(&param.id) else {
                return Ok(ParamValue::Unset);
            };
            let value = variable.value.clone();
            return subscripted(value, index, location, cx);
        }
    };

    // Subscripts on non-variables are not meaningful; `$@` and `$*` ignore
    // them quietly like an index into the whole list.
    Ok(value)
}

/// Applies a subscript to a variable value.
fn subscripted(
    value: Option<Value>,
    index: Option<&Subscript>,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<ParamValue, Error> {
    let Some(value) = value else {
        return Ok(ParamValue::Unset);
    };
    match index {
        None => Ok(match &value {
            Value::Scalar(s) => ParamValue::Scalar(s.clone()),
            // A whole array used as a scalar is its first element.
            Value::Array(values) => match values.first() {
                Some(first) => ParamValue::Scalar(first.clone()),
                None => ParamValue::Unset,
            },
            Value::Associative(map) => match map.get("0") {
                Some(first) => ParamValue::Scalar(first.clone()),
                None => ParamValue::Unset,
            },
        }),
        Some(Subscript::At | Subscript::Star) => {
            let split = matches!(index, Some(Subscript::At));
            let values = match value {
                Value::Scalar(s) => vec![s],
                Value::Array(values) => values,
                Value::Associative(map) => {
                    let mut pairs: Vec<_> = map.into_iter().collect();
                    pairs.sort();
                    pairs.into_iter().map(|(_, v)| v).collect()
                }
            };
            Ok(ParamValue::Fields { values, split })
        }
        Some(Subscript::Expr(text)) => {
            let key = expand_subscript_text(text, location, cx)?;
            match value {
                Value::Associative(map) => Ok(match map.get(&key) {
                    Some(value) => ParamValue::Scalar(value.clone()),
                    None => ParamValue::Unset,
                }),
                Value::Scalar(s) => {
                    let i = super::arith::eval_expression(cx.env, &key, location)?;
                    Ok(if i == 0 {
                        ParamValue::Scalar(s)
                    } else {
                        ParamValue::Unset
                    })
                }
                Value::Array(values) => {
                    let i = super::arith::eval_expression(cx.env, &key, location)?;
                    let len = values.len() as i64;
                    let i = if i < 0 { i + len } else { i };
                    Ok(match usize::try_from(i).ok().and_then(|i| values.get(i)) {
                        Some(value) => ParamValue::Scalar(value.clone()),
                        None => ParamValue::Unset,
                    })
                }
            }
        }
    }
}

/// Expands the text of a subscript to a plain string.
fn expand_subscript_text(
    text: &shoal_syntax::syntax::Text,
    _location: &Location,
    cx: &mut ExpandContext,
) -> Result<String, Error> {
    let was_split = cx.will_split;
    cx.will_split = false;
    let result = text.expand(cx);
    cx.will_split = was_split;
    Ok(result?
        .into_full()
        .into_iter()
        .map(|chars| super::super::attr::strip(&chars))
        .collect())
}

/// Returns the keys of an array variable.
fn array_keys(param: &Param, cx: &mut ExpandContext) -> Vec<String> {
    match cx.env.variables.get(&param.id).and_then(|v| v.value.as_ref()) {
        Some(Value::Array(values)) => (0..values.len()).map(|i| i.to_string()).collect(),
        Some(Value::Associative(map)) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            keys
        }
        Some(Value::Scalar(_)) => vec!["0".to_string()],
        None => Vec::new(),
    }
}

/// Evaluates a subscript string to a non-negative array index.
///
/// Used for subscripted assignments, where a negative index is not
/// meaningful.
pub fn eval_index(
    env: &mut shoal_env::Env,
    key: &str,
    location: &Location,
) -> Result<usize, Error> {
    let index = {
        let mut var_env = super::arith::VarEnv { env };
        match shoal_arith::eval(key, &mut var_env) {
            Ok(shoal_arith::Value::Integer(i)) => i,
            Err(error) => {
                return Err(Error {
                    cause: ErrorCause::Arith(error.cause),
                    location: location.clone(),
                })
            }
        }
    };
    usize::try_from(index).map_err(|_| Error {
        cause: ErrorCause::BadSubscript {
            subscript: key.to_string(),
        },
        location: location.clone(),
    })
}

/// Rejects unset parameters when `nounset` is in effect.
fn check_unset(
    value: ParamValue,
    param: &Param,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<ParamValue, Error> {
    if value.is_unset() && cx.env.options.get(ShellOption::Unset) == State::Off {
        return Err(Error {
            cause: ErrorCause::UnsetParameter {
                name: param.id.clone(),
                message: "unset parameter".to_string(),
            },
            location: location.clone(),
        });
    }
    Ok(value)
}

/// Converts a resolved value to a phrase, honoring quoting context.
pub fn into_phrase(value: ParamValue, cx: &mut ExpandContext) -> Phrase {
    let quoted = cx.in_double_quotes;
    match value {
        ParamValue::Unset => {
            if quoted {
                Phrase::one_empty_field()
            } else {
                // Empty soft expansion: removed by field splitting.
                Phrase::from_str_attrs("", Origin::SoftExpansion, false)
            }
        }
        ParamValue::Scalar(value) => {
            Phrase::from_str_attrs(&value, Origin::SoftExpansion, quoted)
        }
        ParamValue::Fields { values, split } => {
            if quoted && !split {
                // "$*": join on the first character of IFS.
                let sep = cx
                    .env
                    .variables
                    .get_scalar("IFS")
                    .unwrap_or(" \t\n")
                    .chars()
                    .next()
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                Phrase::from_str_attrs(&values.join(&sep), Origin::SoftExpansion, true)
            } else if quoted {
                // "$@": one field per parameter.
                Phrase::Full(
                    values
                        .into_iter()
                        .map(|value| {
                            value
                                .chars()
                                .map(|c| super::super::attr::AttrChar {
                                    value: c,
                                    origin: Origin::SoftExpansion,
                                    is_quoted: true,
                                    is_quoting: false,
                                })
                                .collect()
                        })
                        .collect(),
                )
            } else {
                // Unquoted $@ and $*: separate fields, further split later.
                Phrase::Full(
                    values
                        .into_iter()
                        .filter(|value| !value.is_empty())
                        .map(|value| {
                            value
                                .chars()
                                .map(|c| super::super::attr::AttrChar {
                                    value: c,
                                    origin: Origin::SoftExpansion,
                                    is_quoted: false,
                                    is_quoting: false,
                                })
                                .collect()
                        })
                        .collect(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dummy_env;
    use assert_matches::assert_matches;
    use shoal_env::variable::Scope;
    use shoal_env::Env;
    use shoal_syntax::syntax::Word;

    fn expand(env: &mut Env, word: &str) -> Result<Vec<String>, Error> {
        let word: Word = word.parse().unwrap();
        let mut cx = ExpandContext::new(env);
        let phrase = word.expand(&mut cx)?;
        Ok(phrase
            .into_full()
            .into_iter()
            .map(|chars| super::super::super::attr::strip(&chars))
            .collect())
    }

    #[test]
    fn scalar_variable() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "x", "value")
            .unwrap();
        assert_eq!(expand(&mut env, "$x").unwrap(), ["value"]);
        assert_eq!(expand(&mut env, "${x}").unwrap(), ["value"]);
    }

    #[test]
    fn special_parameters() {
        let mut env = dummy_env();
        env.exit_status = shoal_env::semantics::ExitStatus(3);
        env.arg0 = "shoal".to_string();
        env.variables
            .positional_params_mut()
            .extend(["a".to_string(), "b".to_string()]);
        assert_eq!(expand(&mut env, "$?").unwrap(), ["3"]);
        assert_eq!(expand(&mut env, "$#").unwrap(), ["2"]);
        assert_eq!(expand(&mut env, "$0").unwrap(), ["shoal"]);
        assert_eq!(expand(&mut env, "$1").unwrap(), ["a"]);
    }

    #[test]
    fn length_modifier() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "x", "hello")
            .unwrap();
        assert_eq!(expand(&mut env, "${#x}").unwrap(), ["5"]);
    }

    #[test]
    fn array_subscripts() {
        let mut env = dummy_env();
        let variable = shoal_env::variable::Variable {
            value: Some(Value::array(["p", "q", "r"])),
            ..Default::default()
        };
        env.variables
            .assign(Scope::Global, "a".to_string(), variable)
            .unwrap();
        assert_eq!(expand(&mut env, "${a[1]}").unwrap(), ["q"]);
        assert_eq!(expand(&mut env, "${a[-1]}").unwrap(), ["r"]);
        assert_eq!(expand(&mut env, "${a[@]}").unwrap(), ["p", "q", "r"]);
        assert_eq!(expand(&mut env, "${#a[@]}").unwrap(), ["3"]);
        assert_eq!(expand(&mut env, "$a").unwrap(), ["p"]);
    }

    #[test]
    fn indirection() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "ref", "target")
            .unwrap();
        env.variables
            .assign_scalar(Scope::Global, "target", "hit")
            .unwrap();
        assert_eq!(expand(&mut env, "${!ref}").unwrap(), ["hit"]);
    }

    #[test]
    fn name_listing() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "PSA", "1")
            .unwrap();
        env.variables
            .assign_scalar(Scope::Global, "PSB", "2")
            .unwrap();
        assert_eq!(expand(&mut env, "${!PS@}").unwrap(), ["PSA", "PSB"]);
    }

    #[test]
    fn nounset_errors_on_unset() {
        let mut env = dummy_env();
        env.options.set(ShellOption::Unset, State::Off);
        let error = expand(&mut env, "$nope").unwrap_err();
        assert_matches!(error.cause, ErrorCause::UnsetParameter { name, .. } => {
            assert_eq!(name, "nope");
        });
    }
}
