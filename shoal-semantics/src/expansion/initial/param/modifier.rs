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

//! Application of braced parameter expansion modifiers

use super::super::super::attr::{strip, to_pattern_chars, AttrChar};
use super::super::super::phrase::Phrase;
use super::super::super::{Error, ErrorCause};
use super::super::{Expand, ExpandContext};
use super::{into_phrase, ParamValue};
use shoal_env::variable::Scope;
use shoal_fnmatch::{Config, Pattern};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{
    CaseConv, CaseConvKind, Param, ParamType, Subst, SubstAnchor, Substring, Switch, SwitchCondition,
    SwitchType, Trim, TrimLength, TrimSide, Word,
};

/// Expands a modifier word without field generation, keeping attributes.
fn expand_word_chars(word: &Word, cx: &mut ExpandContext) -> Result<Vec<AttrChar>, Error> {
    let was_split = cx.will_split;
    cx.will_split = false;
    let result = word.expand(cx);
    cx.will_split = was_split;
    Ok(result?.into_full().into_iter().flatten().collect())
}

/// Expands a modifier word to a plain string.
fn expand_word_string(word: &Word, cx: &mut ExpandContext) -> Result<String, Error> {
    Ok(strip(&expand_word_chars(word, cx)?))
}

/// Compiles a modifier word to a matching pattern.
///
/// Quoted parts of the word match literally. `None` is returned when the
/// pattern cannot be compiled, in which case the modifier matches nothing.
fn compile_pattern(word: &Word, cx: &mut ExpandContext) -> Result<Option<Pattern>, Error> {
    let chars = expand_word_chars(word, cx)?;
    Ok(Pattern::parse_with_config(to_pattern_chars(&chars), Config::full_match()).ok())
}

/// Applies a string function to each value of a parameter.
fn map_value(value: ParamValue, f: impl Fn(&str) -> String) -> ParamValue {
    match value {
        ParamValue::Unset => ParamValue::Scalar(f("")),
        ParamValue::Scalar(s) => ParamValue::Scalar(f(&s)),
        ParamValue::Fields { values, split } => ParamValue::Fields {
            values: values.iter().map(|s| f(s)).collect(),
            split,
        },
    }
}

/// Applies a switch modifier (`${x:-word}` and friends).
pub fn apply_switch(
    switch: &Switch,
    value: ParamValue,
    param: &Param,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let triggered = match switch.condition {
        SwitchCondition::Unset => value.is_unset(),
        SwitchCondition::UnsetOrEmpty => value.is_unset_or_empty(),
    };

    match switch.r#type {
        SwitchType::Alter => {
            if triggered {
                Ok(into_phrase(ParamValue::Scalar(String::new()), cx))
            } else {
                switch.word.expand(cx)
            }
        }
        SwitchType::Default => {
            if triggered {
                switch.word.expand(cx)
            } else {
                Ok(into_phrase(value, cx))
            }
        }
        SwitchType::Assign => {
            if !triggered {
                return Ok(into_phrase(value, cx));
            }
            if param.r#type != ParamType::Variable {
                return Err(Error {
                    cause: ErrorCause::NonassignableParameter {
                        name: param.id.clone(),
                    },
                    location: location.clone(),
                });
            }
            let new_value = expand_word_string(&switch.word, cx)?;
            cx.env
                .variables
                .assign_scalar(Scope::Global, param.id.clone(), new_value.clone())
                .map_err(|e| Error {
                    cause: ErrorCause::AssignReadOnly(e),
                    location: location.clone(),
                })?;
            Ok(into_phrase(ParamValue::Scalar(new_value), cx))
        }
        SwitchType::Error => {
            if !triggered {
                return Ok(into_phrase(value, cx));
            }
            let message = expand_word_string(&switch.word, cx)?;
            let message = if message.is_empty() {
                "parameter is unset or empty".to_string()
            } else {
                message
            };
            Err(Error {
                cause: ErrorCause::UnsetParameter {
                    name: param.id.clone(),
                    message,
                },
                location: location.clone(),
            })
        }
    }
}

/// Byte indices of all character boundaries in `s`, including `s.len()`.
fn boundaries(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect()
}

/// Applies a trim modifier (`${x#pat}` and friends).
pub fn apply_trim(
    trim: &Trim,
    value: ParamValue,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let Some(pattern) = compile_pattern(&trim.pattern, cx)? else {
        return Ok(into_phrase(value, cx));
    };

    let trimmed = map_value(value, |s| {
        let bounds = boundaries(s);
        match (trim.side, trim.length) {
            (TrimSide::Prefix, TrimLength::Shortest) => bounds
                .iter()
                .find(|&&i| pattern.is_match(&s[..i]))
                .map(|&i| s[i..].to_string()),
            (TrimSide::Prefix, TrimLength::Longest) => bounds
                .iter()
                .rev()
                .find(|&&i| pattern.is_match(&s[..i]))
                .map(|&i| s[i..].to_string()),
            (TrimSide::Suffix, TrimLength::Shortest) => bounds
                .iter()
                .rev()
                .find(|&&i| pattern.is_match(&s[i..]))
                .map(|&i| s[..i].to_string()),
            (TrimSide::Suffix, TrimLength::Longest) => bounds
                .iter()
                .find(|&&i| pattern.is_match(&s[i..]))
                .map(|&i| s[..i].to_string()),
        }
        .unwrap_or_else(|| s.to_string())
    });
    Ok(into_phrase(trimmed, cx))
}

/// Finds the longest match of `pattern` starting at byte `start`.
fn longest_match_at(s: &str, start: usize, pattern: &Pattern) -> Option<usize> {
    let bounds = boundaries(&s[start..]);
    bounds
        .iter()
        .rev()
        .map(|&i| start + i)
        .find(|&end| end > start && pattern.is_match(&s[start..end]))
}

/// Applies a pattern substitution modifier (`${x/pat/repl}`).
pub fn apply_subst(
    subst: &Subst,
    value: ParamValue,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let Some(pattern) = compile_pattern(&subst.pattern, cx)? else {
        return Ok(into_phrase(value, cx));
    };
    let replacement = match &subst.replacement {
        Some(word) => expand_word_string(word, cx)?,
        None => String::new(),
    };

    let result = map_value(value, |s| match subst.anchor {
        Some(SubstAnchor::Prefix) => match longest_match_at(s, 0, &pattern) {
            Some(end) => format!("{replacement}{}", &s[end..]),
            None => s.to_string(),
        },
        Some(SubstAnchor::Suffix) => {
            let bounds = boundaries(s);
            match bounds
                .iter()
                .find(|&&start| start < s.len() && pattern.is_match(&s[start..]))
            {
                Some(&start) => format!("{}{replacement}", &s[..start]),
                None => s.to_string(),
            }
        }
        None if subst.global => {
            let mut result = String::new();
            let bounds = boundaries(s);
            let mut b = 0;
            while b < bounds.len() - 1 {
                let start = bounds[b];
                match longest_match_at(s, start, &pattern) {
                    Some(end) => {
                        result.push_str(&replacement);
                        while b < bounds.len() - 1 && bounds[b] < end {
                            b += 1;
                        }
                    }
                    None => {
                        let next = bounds[b + 1];
                        result.push_str(&s[start..next]);
                        b += 1;
                    }
                }
            }
            result
        }
        None => {
            let bounds = boundaries(s);
            for &start in &bounds {
                if let Some(end) = longest_match_at(s, start, &pattern) {
                    return format!("{}{replacement}{}", &s[..start], &s[end..]);
                }
            }
            s.to_string()
        }
    });
    Ok(into_phrase(result, cx))
}

/// Applies a case conversion modifier (`${x^^}` and friends).
pub fn apply_case_conv(
    conv: &CaseConv,
    value: ParamValue,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let pattern = match &conv.pattern {
        Some(word) => compile_pattern(word, cx)?,
        None => None,
    };
    let matches = |c: char| match &pattern {
        Some(pattern) => pattern.is_match(&c.to_string()),
        None => true,
    };
    let convert = |c: char| -> String {
        match conv.kind {
            CaseConvKind::Upper => c.to_uppercase().collect(),
            CaseConvKind::Lower => c.to_lowercase().collect(),
        }
    };

    let result = map_value(value, |s| {
        let mut result = String::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            if (conv.all || i == 0) && matches(c) {
                result.push_str(&convert(c));
            } else {
                result.push(c);
            }
        }
        result
    });
    Ok(into_phrase(result, cx))
}

/// Applies a substring modifier (`${x:off:len}`).
pub fn apply_substring(
    substring: &Substring,
    value: ParamValue,
    location: &Location,
    cx: &mut ExpandContext,
) -> Result<Phrase, Error> {
    let offset_expr = expand_text_string(&substring.offset, cx)?;
    let offset = super::super::arith::eval_expression(cx.env, &offset_expr, location)?;
    let length = match &substring.length {
        Some(text) => {
            let expr = expand_text_string(text, cx)?;
            Some(super::super::arith::eval_expression(cx.env, &expr, location)?)
        }
        None => None,
    };

    fn slice<T: Clone>(items: &[T], offset: i64, length: Option<i64>) -> Vec<T> {
        let len = items.len() as i64;
        let start = if offset < 0 {
            (len + offset).max(0)
        } else {
            offset.min(len)
        };
        let end = match length {
            None => len,
            Some(l) if l < 0 => (len + l).max(start),
            Some(l) => (start + l).min(len),
        };
        items[start as usize..end as usize].to_vec()
    }

    let result = match value {
        ParamValue::Unset => ParamValue::Scalar(String::new()),
        ParamValue::Scalar(s) => {
            let chars: Vec<char> = s.chars().collect();
            ParamValue::Scalar(slice(&chars, offset, length).into_iter().collect())
        }
        ParamValue::Fields { values, split } => ParamValue::Fields {
            values: slice(&values, offset, length),
            split,
        },
    };
    Ok(into_phrase(result, cx))
}

/// Expands a text to a plain string, for arithmetic operands.
fn expand_text_string(
    text: &shoal_syntax::syntax::Text,
    cx: &mut ExpandContext,
) -> Result<String, Error> {
    let was_split = cx.will_split;
    cx.will_split = false;
    let result = text.expand(cx);
    cx.will_split = was_split;
    Ok(result?
        .into_full()
        .into_iter()
        .map(|chars| strip(&chars))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::super::super::super::attr::strip;
    use super::*;
    use crate::tests::dummy_env;
    use assert_matches::assert_matches;
    use shoal_env::Env;

    fn expand(env: &mut Env, word: &str) -> Result<Vec<String>, Error> {
        let word: Word = word.parse().unwrap();
        let mut cx = ExpandContext::new(env);
        let phrase = word.expand(&mut cx)?;
        Ok(phrase
            .into_full()
            .into_iter()
            .map(|chars| strip(&chars))
            .collect())
    }

    fn env_with(name: &str, value: &str) -> Env {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, name, value)
            .unwrap();
        env
    }

    #[test]
    fn default_switch() {
        let mut env = dummy_env();
        assert_eq!(expand(&mut env, "${x:-fallback}").unwrap(), ["fallback"]);
        let mut env = env_with("x", "set");
        assert_eq!(expand(&mut env, "${x:-fallback}").unwrap(), ["set"]);
    }

    #[test]
    fn empty_triggers_colon_switch_only() {
        let mut env = env_with("x", "");
        assert_eq!(expand(&mut env, "${x:-colon}").unwrap(), ["colon"]);
        assert_eq!(expand(&mut env, "${x-nocolon}").unwrap(), [""]);
    }

    #[test]
    fn alternate_switch() {
        let mut env = env_with("x", "set");
        assert_eq!(expand(&mut env, "${x:+alt}").unwrap(), ["alt"]);
        let mut env = dummy_env();
        assert_eq!(expand(&mut env, "${x:+alt}").unwrap(), [""]);
    }

    #[test]
    fn assign_switch() {
        let mut env = dummy_env();
        assert_eq!(expand(&mut env, "${x:=new}").unwrap(), ["new"]);
        assert_eq!(env.variables.get_scalar("x"), Some("new"));
        // Now set: the existing value is used.
        assert_eq!(expand(&mut env, "${x:=other}").unwrap(), ["new"]);
    }

    #[test]
    fn error_switch() {
        let mut env = dummy_env();
        let error = expand(&mut env, "${x:?custom message}").unwrap_err();
        assert_matches!(error.cause, ErrorCause::UnsetParameter { name, message } => {
            assert_eq!(name, "x");
            assert_eq!(message, "custom message");
        });
    }

    #[test]
    fn prefix_trims() {
        let mut env = env_with("path", "a/b/c");
        assert_eq!(expand(&mut env, "${path#*/}").unwrap(), ["b/c"]);
        assert_eq!(expand(&mut env, "${path##*/}").unwrap(), ["c"]);
    }

    #[test]
    fn suffix_trims() {
        let mut env = env_with("file", "name.tar.gz");
        assert_eq!(expand(&mut env, "${file%.*}").unwrap(), ["name.tar"]);
        assert_eq!(expand(&mut env, "${file%%.*}").unwrap(), ["name"]);
    }

    #[test]
    fn unmatched_trim_keeps_value() {
        let mut env = env_with("x", "abc");
        assert_eq!(expand(&mut env, "${x#z}").unwrap(), ["abc"]);
    }

    #[test]
    fn quoted_pattern_is_literal() {
        let mut env = env_with("x", "a*b");
        assert_eq!(expand(&mut env, "${x#'a*'}").unwrap(), ["b"]);
        let mut env = env_with("y", "aXb");
        assert_eq!(expand(&mut env, "${y#'a*'}").unwrap(), ["aXb"]);
    }

    #[test]
    fn substitution() {
        let mut env = env_with("x", "banana");
        assert_eq!(expand(&mut env, "${x/an/AN}").unwrap(), ["bANana"]);
        assert_eq!(expand(&mut env, "${x//an/AN}").unwrap(), ["bANANa"]);
        assert_eq!(expand(&mut env, "${x//an}").unwrap(), ["ba"]);
    }

    #[test]
    fn anchored_substitution() {
        let mut env = env_with("x", "aba");
        assert_eq!(expand(&mut env, "${x/#a/X}").unwrap(), ["Xba"]);
        assert_eq!(expand(&mut env, "${x/%a/X}").unwrap(), ["abX"]);
        assert_eq!(expand(&mut env, "${x/#b/X}").unwrap(), ["aba"]);
    }

    #[test]
    fn case_conversion() {
        let mut env = env_with("x", "hello world");
        assert_eq!(expand(&mut env, "${x^}").unwrap(), ["Hello world"]);
        assert_eq!(expand(&mut env, "${x^^}").unwrap(), ["HELLO WORLD"]);
        let mut env = env_with("y", "HELLO");
        assert_eq!(expand(&mut env, "${y,}").unwrap(), ["hELLO"]);
        assert_eq!(expand(&mut env, "${y,,}").unwrap(), ["hello"]);
    }

    #[test]
    fn case_conversion_with_pattern() {
        let mut env = env_with("x", "abcabc");
        assert_eq!(expand(&mut env, "${x^^[ab]}").unwrap(), ["ABcABc"]);
    }

    #[test]
    fn substrings() {
        let mut env = env_with("x", "abcdef");
        assert_eq!(expand(&mut env, "${x:2}").unwrap(), ["cdef"]);
        assert_eq!(expand(&mut env, "${x:2:3}").unwrap(), ["cde"]);
        assert_eq!(expand(&mut env, "${x: -2}").unwrap(), ["ef"]);
        assert_eq!(expand(&mut env, "${x:1:-1}").unwrap(), ["bcdef"[..4].to_string()]);
        assert_eq!(expand(&mut env, "${x:9}").unwrap(), [""]);
    }
}
