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

//! Part of the lexer that parses braced parameter expansions (`${...}`)

use super::core::Lexer;
use super::raw_param::{classify_param, is_name_char, is_name_start};
use crate::parser::core::Result;
use crate::parser::error::{Error, SyntaxError};
use crate::syntax::{
    CaseConv, CaseConvKind, Modifier, Param, SpecialParam, Subscript, Subst, SubstAnchor,
    Substring, Switch, SwitchCondition, SwitchType, TextUnit, Trim, TrimLength, TrimSide,
};

impl Lexer {
    /// Parses a braced parameter expansion after the `$` has been consumed.
    ///
    /// The current position must be on the `{`; `begin` is the index of the
    /// `$`.
    pub fn braced_param(&mut self, begin: usize) -> Result<TextUnit> {
        debug_assert_eq!(self.peek_char(), Some('{'));
        self.consume_char();
        let opening_location = self.location_range(begin..begin + 2);

        // `${#...}` is the length modifier if a parameter name directly
        // followed by `}` comes next; otherwise `#` is the parameter itself.
        if self.peek_char() == Some('#') {
            let save = self.index();
            self.consume_char();
            if let Some(param) = self.braced_param_name() {
                let index = self.subscript()?;
                if self.peek_char() == Some('}') {
                    self.consume_char();
                    let location = self.location_range(begin..self.index());
                    return Ok(TextUnit::BracedParam(crate::syntax::BracedParam {
                        indirect: false,
                        param,
                        index,
                        modifier: Modifier::Length,
                        location,
                    }));
                }
            }
            self.rewind(save);
        }

        // `${!...}` is indirection unless the `!` is the whole parameter.
        let mut indirect = false;
        if self.peek_char() == Some('!') && self.peek_char_after() != Some('}') {
            self.consume_char();
            indirect = true;
        }

        let Some(param) = self.braced_param_name() else {
            let cause = if self.peek_char() == Some('}') {
                SyntaxError::EmptyParam
            } else {
                SyntaxError::InvalidParam
            };
            return Err(Error {
                cause: cause.into(),
                location: self.location(),
            });
        };

        let index = self.subscript()?;

        // `${!prefix*}` and `${!prefix@}` list variable names.
        let modifier = if indirect
            && matches!(self.peek_char(), Some('*' | '@'))
            && self.peek_char_after() == Some('}')
        {
            let joined = self.peek_char() == Some('*');
            self.consume_char();
            Modifier::Names { joined }
        } else {
            self.param_modifier()?
        };

        if self.peek_char() != Some('}') {
            return Err(Error {
                cause: SyntaxError::UnclosedParam { opening_location }.into(),
                location: self.location(),
            });
        }
        self.consume_char();

        let location = self.location_range(begin..self.index());
        Ok(TextUnit::BracedParam(crate::syntax::BracedParam {
            indirect,
            param,
            index,
            modifier,
            location,
        }))
    }

    /// Parses a parameter name inside braces, if one is present.
    ///
    /// Unlike [`raw_param`](Self::raw_param), positional parameters may have
    /// multiple digits here (`${10}`).
    fn braced_param_name(&mut self) -> Option<Param> {
        let c = self.peek_char()?;
        let id = if is_name_start(c) {
            let mut id = String::new();
            while let Some(sc) = self.consume_char_if(is_name_char) {
                id.push(sc.value);
            }
            id
        } else if c.is_ascii_digit() {
            let mut id = String::new();
            while let Some(sc) = self.consume_char_if(|c| c.is_ascii_digit()) {
                id.push(sc.value);
            }
            id
        } else if SpecialParam::from_char(c).is_some() {
            self.consume_char();
            c.to_string()
        } else {
            return None;
        };
        let r#type = classify_param(&id);
        Some(Param { id, r#type })
    }

    /// Parses an array subscript, if one is present.
    fn subscript(&mut self) -> Result<Option<Subscript>> {
        if self.peek_char() != Some('[') {
            return Ok(None);
        }
        let opening_index = self.index();
        self.consume_char();

        let subscript = match (self.peek_char(), self.peek_char_after()) {
            (Some('@'), Some(']')) => {
                self.consume_char();
                Subscript::At
            }
            (Some('*'), Some(']')) => {
                self.consume_char();
                Subscript::Star
            }
            _ => {
                let text = self.text(&|c| c == ']', &|c| matches!(c, '$' | '`' | '\\' | ']'))?;
                Subscript::Expr(text)
            }
        };

        if self.peek_char() != Some(']') {
            let opening_location = self.location_range(opening_index..opening_index + 1);
            return Err(Error {
                cause: SyntaxError::UnclosedSubscript { opening_location }.into(),
                location: self.location(),
            });
        }
        self.consume_char();
        Ok(Some(subscript))
    }

    /// Parses the modifier part of a braced parameter expansion.
    fn param_modifier(&mut self) -> Result<Modifier> {
        match self.peek_char() {
            None | Some('}') => Ok(Modifier::None),
            Some(':') => match self.peek_char_after() {
                Some(t @ ('-' | '=' | '?' | '+')) => {
                    self.consume_char();
                    self.consume_char();
                    let word = self.word(&|c| c == '}')?;
                    Ok(Modifier::Switch(Switch {
                        r#type: switch_type(t),
                        condition: SwitchCondition::UnsetOrEmpty,
                        word,
                    }))
                }
                _ => {
                    self.consume_char();
                    let offset = self.text(&|c| c == ':' || c == '}', &|c| {
                        matches!(c, '$' | '`' | '\\')
                    })?;
                    let length = if self.peek_char() == Some(':') {
                        self.consume_char();
                        Some(self.text(&|c| c == '}', &|c| matches!(c, '$' | '`' | '\\'))?)
                    } else {
                        None
                    };
                    Ok(Modifier::Substring(Substring { offset, length }))
                }
            },
            Some(t @ ('-' | '=' | '?' | '+')) => {
                self.consume_char();
                let word = self.word(&|c| c == '}')?;
                Ok(Modifier::Switch(Switch {
                    r#type: switch_type(t),
                    condition: SwitchCondition::Unset,
                    word,
                }))
            }
            Some(side @ ('#' | '%')) => {
                self.consume_char();
                let length = if self.peek_char() == Some(side) {
                    self.consume_char();
                    TrimLength::Longest
                } else {
                    TrimLength::Shortest
                };
                let pattern = self.word(&|c| c == '}')?;
                Ok(Modifier::Trim(Trim {
                    side: if side == '#' {
                        TrimSide::Prefix
                    } else {
                        TrimSide::Suffix
                    },
                    length,
                    pattern,
                }))
            }
            Some('/') => {
                self.consume_char();
                let global = self.peek_char() == Some('/');
                if global {
                    self.consume_char();
                }
                let anchor = match self.peek_char() {
                    Some('#') => {
                        self.consume_char();
                        Some(SubstAnchor::Prefix)
                    }
                    Some('%') => {
                        self.consume_char();
                        Some(SubstAnchor::Suffix)
                    }
                    _ => None,
                };
                let pattern = self.word(&|c| c == '/' || c == '}')?;
                let replacement = if self.peek_char() == Some('/') {
                    self.consume_char();
                    Some(self.word(&|c| c == '}')?)
                } else {
                    None
                };
                Ok(Modifier::Subst(Subst {
                    pattern,
                    replacement,
                    global,
                    anchor,
                }))
            }
            Some(kind @ ('^' | ',')) => {
                self.consume_char();
                let all = self.peek_char() == Some(kind);
                if all {
                    self.consume_char();
                }
                let pattern = if self.peek_char() == Some('}') {
                    None
                } else {
                    Some(self.word(&|c| c == '}')?)
                };
                Ok(Modifier::CaseConv(CaseConv {
                    kind: if kind == '^' {
                        CaseConvKind::Upper
                    } else {
                        CaseConvKind::Lower
                    },
                    all,
                    pattern,
                }))
            }
            Some(_) => Err(Error {
                cause: SyntaxError::InvalidModifier.into(),
                location: self.location(),
            }),
        }
    }
}

fn switch_type(c: char) -> SwitchType {
    match c {
        '+' => SwitchType::Alter,
        '-' => SwitchType::Default,
        '=' => SwitchType::Assign,
        '?' => SwitchType::Error,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use crate::syntax::ParamType;
    use assert_matches::assert_matches;

    fn lex(code: &str) -> Result<crate::syntax::BracedParam> {
        let mut lexer = Lexer::from_memory(code, Source::Unknown);
        lexer.consume_char_if(|c| c == '$').unwrap();
        match lexer.braced_param(0)? {
            TextUnit::BracedParam(param) => Ok(param),
            other => panic!("not a braced param: {other:?}"),
        }
    }

    #[test]
    fn plain_expansion() {
        let param = lex("${foo}").unwrap();
        assert_eq!(param.param.id, "foo");
        assert_eq!(param.modifier, Modifier::None);
        assert!(!param.indirect);
    }

    #[test]
    fn multi_digit_positional() {
        let param = lex("${10}").unwrap();
        assert_eq!(param.param.r#type, ParamType::Positional(10));
    }

    #[test]
    fn length_modifier() {
        let param = lex("${#foo}").unwrap();
        assert_eq!(param.param.id, "foo");
        assert_eq!(param.modifier, Modifier::Length);
    }

    #[test]
    fn hash_alone_is_a_parameter() {
        let param = lex("${#}").unwrap();
        assert_eq!(param.param.r#type, ParamType::Special(SpecialParam::Number));
        assert_eq!(param.modifier, Modifier::None);
    }

    #[test]
    fn switches() {
        let param = lex("${x:-default}").unwrap();
        assert_matches!(param.modifier, Modifier::Switch(switch) => {
            assert_eq!(switch.r#type, SwitchType::Default);
            assert_eq!(switch.condition, SwitchCondition::UnsetOrEmpty);
            assert_eq!(switch.word.to_string(), "default");
        });

        let param = lex("${x=y}").unwrap();
        assert_matches!(param.modifier, Modifier::Switch(switch) => {
            assert_eq!(switch.r#type, SwitchType::Assign);
            assert_eq!(switch.condition, SwitchCondition::Unset);
        });
    }

    #[test]
    fn trims() {
        let param = lex("${x##*/}").unwrap();
        assert_matches!(param.modifier, Modifier::Trim(trim) => {
            assert_eq!(trim.side, TrimSide::Prefix);
            assert_eq!(trim.length, TrimLength::Longest);
            assert_eq!(trim.pattern.to_string(), "*/");
        });

        let param = lex("${x%.rs}").unwrap();
        assert_matches!(param.modifier, Modifier::Trim(trim) => {
            assert_eq!(trim.side, TrimSide::Suffix);
            assert_eq!(trim.length, TrimLength::Shortest);
        });
    }

    #[test]
    fn substitution() {
        let param = lex("${x/foo/bar}").unwrap();
        assert_matches!(param.modifier, Modifier::Subst(subst) => {
            assert!(!subst.global);
            assert_eq!(subst.anchor, None);
            assert_eq!(subst.pattern.to_string(), "foo");
            assert_eq!(subst.replacement.unwrap().to_string(), "bar");
        });

        let param = lex("${x//foo}").unwrap();
        assert_matches!(param.modifier, Modifier::Subst(subst) => {
            assert!(subst.global);
            assert_eq!(subst.replacement, None);
        });

        let param = lex("${x/#foo/bar}").unwrap();
        assert_matches!(param.modifier, Modifier::Subst(subst) => {
            assert_eq!(subst.anchor, Some(SubstAnchor::Prefix));
        });
    }

    #[test]
    fn case_conversions() {
        let param = lex("${x^^}").unwrap();
        assert_matches!(param.modifier, Modifier::CaseConv(conv) => {
            assert_eq!(conv.kind, CaseConvKind::Upper);
            assert!(conv.all);
            assert_eq!(conv.pattern, None);
        });

        let param = lex("${x,}").unwrap();
        assert_matches!(param.modifier, Modifier::CaseConv(conv) => {
            assert_eq!(conv.kind, CaseConvKind::Lower);
            assert!(!conv.all);
        });
    }

    #[test]
    fn substrings() {
        let param = lex("${x:2}").unwrap();
        assert_matches!(param.modifier, Modifier::Substring(s) => {
            assert_eq!(s.offset.to_string(), "2");
            assert_eq!(s.length, None);
        });

        let param = lex("${x:2:5}").unwrap();
        assert_matches!(param.modifier, Modifier::Substring(s) => {
            assert_eq!(s.offset.to_string(), "2");
            assert_eq!(s.length.unwrap().to_string(), "5");
        });

        let param = lex("${x: -3}").unwrap();
        assert_matches!(param.modifier, Modifier::Substring(s) => {
            assert_eq!(s.offset.to_string(), " -3");
        });
    }

    #[test]
    fn indirection() {
        let param = lex("${!ref}").unwrap();
        assert!(param.indirect);
        assert_eq!(param.param.id, "ref");

        let param = lex("${!}").unwrap();
        assert!(!param.indirect);
        assert_eq!(
            param.param.r#type,
            ParamType::Special(SpecialParam::Exclamation)
        );
    }

    #[test]
    fn name_listing() {
        let param = lex("${!PS*}").unwrap();
        assert!(param.indirect);
        assert_eq!(param.param.id, "PS");
        assert_eq!(param.modifier, Modifier::Names { joined: true });

        let param = lex("${!PS@}").unwrap();
        assert_eq!(param.modifier, Modifier::Names { joined: false });
    }

    #[test]
    fn subscripts() {
        let param = lex("${a[@]}").unwrap();
        assert_eq!(param.index, Some(Subscript::At));

        let param = lex("${a[*]}").unwrap();
        assert_eq!(param.index, Some(Subscript::Star));

        let param = lex("${a[1+1]}").unwrap();
        assert_matches!(param.index, Some(Subscript::Expr(text)) => {
            assert_eq!(text.to_string(), "1+1");
        });

        let param = lex("${#a[@]}").unwrap();
        assert_eq!(param.index, Some(Subscript::At));
        assert_eq!(param.modifier, Modifier::Length);
    }

    #[test]
    fn empty_param_error() {
        let error = lex("${}").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::EmptyParam)
        );
    }

    #[test]
    fn unclosed_param() {
        let error = lex("${x").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::UnclosedParam { .. })
        );
        assert!(error.needs_more_input());
    }

    #[test]
    fn invalid_modifier() {
        let error = lex("${x;}").unwrap_err();
        assert_matches!(
            error.cause,
            crate::parser::ErrorCause::Syntax(SyntaxError::InvalidModifier)
        );
    }
}
