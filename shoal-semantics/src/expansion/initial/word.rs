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

//! Initial expansion of [`WordUnit`] and [`Word`]

use super::super::attr::AttrChar;
use super::super::phrase::Phrase;
use super::super::Error;
use super::{Expand, ExpandContext};
use shoal_syntax::syntax::{Word, WordUnit};

impl Expand for WordUnit {
    fn expand(&self, cx: &mut ExpandContext) -> Result<Phrase, Error> {
        match self {
            WordUnit::Unquoted(unit) => unit.expand(cx),

            WordUnit::SingleQuote(content) => {
                let mut chars = Vec::with_capacity(content.len() + 2);
                chars.push(AttrChar::quoting('\'', cx.in_double_quotes));
                chars.extend(content.chars().map(|c| AttrChar {
                    value: c,
                    origin: super::super::attr::Origin::Literal,
                    is_quoted: true,
                    is_quoting: false,
                }));
                chars.push(AttrChar::quoting('\'', cx.in_double_quotes));
                Ok(Phrase::Field(chars))
            }

            WordUnit::DoubleQuote(text) => {
                let was_quoted = cx.in_double_quotes;
                let was_splitting = cx.will_split;
                cx.in_double_quotes = true;
                cx.will_split = false;
                let inner = text.expand(cx);
                cx.in_double_quotes = was_quoted;
                cx.will_split = was_splitting;

                let inner = inner?;
                // `"$@"` with no positional parameters produces no fields;
                // the quote marks must not resurrect an empty field.
                if inner.field_count() == 0 {
                    return Ok(Phrase::zero_fields());
                }
                let mut phrase = Phrase::Char(AttrChar::quoting('"', was_quoted));
                phrase.append(inner);
                phrase.append(Phrase::Char(AttrChar::quoting('"', was_quoted)));
                Ok(phrase)
            }

            WordUnit::DollarSingleQuote(escaped) => {
                let content = escaped.to_string_content();
                let mut chars = Vec::with_capacity(content.len() + 2);
                chars.push(AttrChar::quoting('\'', cx.in_double_quotes));
                chars.extend(content.chars().map(|c| AttrChar {
                    value: c,
                    origin: super::super::attr::Origin::Literal,
                    is_quoted: true,
                    is_quoting: false,
                }));
                chars.push(AttrChar::quoting('\'', cx.in_double_quotes));
                Ok(Phrase::Field(chars))
            }

            WordUnit::Tilde(name) => Ok(super::tilde::expand_tilde(name, cx)),

            WordUnit::ProcSubst {
                direction,
                content,
                location,
            } => crate::proc_subst::expand_proc_subst(*direction, content, location, cx),
        }
    }
}

impl Expand for Word {
    fn expand(&self, cx: &mut ExpandContext) -> Result<Phrase, Error> {
        self.units.expand(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::attr::strip;
    use super::*;
    use crate::tests::dummy_env;
    use shoal_env::variable::Scope;

    fn expand_to_strings(word: &str, env: &mut shoal_env::Env) -> Vec<String> {
        let word: Word = word.parse().unwrap();
        let mut cx = ExpandContext::new(env);
        let phrase = word.expand(&mut cx).unwrap();
        phrase
            .into_full()
            .into_iter()
            .map(|chars| strip(&chars))
            .collect()
    }

    #[test]
    fn quoted_and_unquoted_parts_concatenate() {
        let mut env = dummy_env();
        env.variables
            .assign_scalar(Scope::Global, "x", "mid")
            .unwrap();
        let fields = expand_to_strings("a'b'\"$x\"c", &mut env);
        assert_eq!(fields, ["abmidc"]);
    }

    #[test]
    fn quoted_at_expands_to_one_field_per_parameter() {
        let mut env = dummy_env();
        env.variables
            .positional_params_mut()
            .extend(["one".to_string(), "two".to_string()]);
        let fields = expand_to_strings("\"$@\"", &mut env);
        assert_eq!(fields, ["one", "two"]);
    }

    #[test]
    fn affixes_around_quoted_at() {
        let mut env = dummy_env();
        env.variables
            .positional_params_mut()
            .extend(["1".to_string(), "2".to_string(), "3".to_string()]);
        let fields = expand_to_strings("pre\"$@\"suf", &mut env);
        assert_eq!(fields, ["pre1", "2", "3suf"]);
    }
}
