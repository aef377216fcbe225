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

//! Initial expansion of [`TextUnit`] and [`Text`]

use super::super::attr::{AttrChar, Origin};
use super::super::phrase::Phrase;
use super::super::Error;
use super::{Expand, ExpandContext};
use shoal_syntax::syntax::{Text, TextUnit};

impl Expand for TextUnit {
    fn expand(&self, cx: &mut ExpandContext) -> Result<Phrase, Error> {
        match self {
            TextUnit::Literal(c) => Ok(Phrase::Char(AttrChar {
                value: *c,
                origin: Origin::Literal,
                is_quoted: cx.in_double_quotes,
                is_quoting: false,
            })),
            TextUnit::Backslashed(c) => Ok(Phrase::Field(vec![
                AttrChar {
                    value: '\\',
                    origin: Origin::Literal,
                    is_quoted: cx.in_double_quotes,
                    is_quoting: true,
                },
                AttrChar {
                    value: *c,
                    origin: Origin::Literal,
                    is_quoted: true,
                    is_quoting: false,
                },
            ])),
            TextUnit::RawParam { param, location } => {
                param::expand_raw_param(param, location, cx)
            }
            TextUnit::BracedParam(braced) => param::expand_braced_param(braced, cx),
            TextUnit::CommandSubst { content, location } => {
                super::command_subst::expand_command_subst(content, location, cx)
            }
            TextUnit::Backquote { content, location } => {
                let mut source = String::new();
                for unit in content {
                    match unit {
                        shoal_syntax::syntax::BackquoteUnit::Literal(c) => source.push(*c),
                        shoal_syntax::syntax::BackquoteUnit::Backslashed(c) => source.push(*c),
                    }
                }
                super::command_subst::expand_command_subst_str(&source, location, cx)
            }
            TextUnit::Arith { content, location } => {
                super::arith::expand_arith(content, location, cx)
            }
        }
    }
}

use super::param;

impl Expand for Text {
    fn expand(&self, cx: &mut ExpandContext) -> Result<Phrase, Error> {
        self.0.expand(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::attr::Origin;
    use super::*;
    use crate::tests::dummy_env;

    #[test]
    fn literal_characters() {
        let mut env = dummy_env();
        let mut cx = ExpandContext::new(&mut env);
        let text: Text = Text(vec![TextUnit::Literal('o'), TextUnit::Literal('k')]);
        let phrase = text.expand(&mut cx).unwrap();
        let fields = phrase.into_full();
        assert_eq!(fields.len(), 1);
        let value: String = fields[0].iter().map(|c| c.value).collect();
        assert_eq!(value, "ok");
        assert!(fields[0].iter().all(|c| c.origin == Origin::Literal));
    }

    #[test]
    fn backslash_is_a_quoting_character() {
        let mut env = dummy_env();
        let mut cx = ExpandContext::new(&mut env);
        let text = Text(vec![TextUnit::Backslashed('x')]);
        let fields = text.expand(&mut cx).unwrap().into_full();
        assert_eq!(fields[0].len(), 2);
        assert!(fields[0][0].is_quoting);
        assert!(fields[0][1].is_quoted);
        assert_eq!(fields[0][1].value, 'x');
    }
}
