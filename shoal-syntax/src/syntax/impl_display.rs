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

//! Display implementations for the syntax types
//!
//! The output is single-line source code that parses back to the same tree.
//! Here-document contents are omitted; only the operator and delimiter are
//! printed.

use super::*;
use itertools::Itertools;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write as _;

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl Display for SwitchType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use SwitchType::*;
        f.write_char(match self {
            Alter => '+',
            Default => '-',
            Assign => '=',
            Error => '?',
        })
    }
}

impl Display for SwitchCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SwitchCondition::Unset => Ok(()),
            SwitchCondition::UnsetOrEmpty => f.write_char(':'),
        }
    }
}

impl Display for Switch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.condition, self.r#type, self.word)
    }
}

impl Display for Trim {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self.side {
            TrimSide::Prefix => '#',
            TrimSide::Suffix => '%',
        };
        f.write_char(c)?;
        if self.length == TrimLength::Longest {
            f.write_char(c)?;
        }
        self.pattern.fmt(f)
    }
}

impl Display for Subst {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('/')?;
        if self.global {
            f.write_char('/')?;
        }
        match self.anchor {
            Some(SubstAnchor::Prefix) => f.write_char('#')?,
            Some(SubstAnchor::Suffix) => f.write_char('%')?,
            None => {}
        }
        self.pattern.fmt(f)?;
        if let Some(replacement) = &self.replacement {
            write!(f, "/{replacement}")?;
        }
        Ok(())
    }
}

impl Display for CaseConv {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match self.kind {
            CaseConvKind::Upper => '^',
            CaseConvKind::Lower => ',',
        };
        f.write_char(c)?;
        if self.all {
            f.write_char(c)?;
        }
        if let Some(pattern) = &self.pattern {
            pattern.fmt(f)?;
        }
        Ok(())
    }
}

impl Display for Substring {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.offset)?;
        if let Some(length) = &self.length {
            write!(f, ":{length}")?;
        }
        Ok(())
    }
}

impl Display for Subscript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Subscript::At => f.write_str("[@]"),
            Subscript::Star => f.write_str("[*]"),
            Subscript::Expr(text) => write!(f, "[{text}]"),
        }
    }
}

impl Display for BracedParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("${")?;
        if self.modifier == Modifier::Length {
            f.write_char('#')?;
        }
        if self.indirect {
            f.write_char('!')?;
        }
        self.param.fmt(f)?;
        if let Some(index) = &self.index {
            index.fmt(f)?;
        }
        match &self.modifier {
            Modifier::None | Modifier::Length => {}
            Modifier::Switch(switch) => switch.fmt(f)?,
            Modifier::Trim(trim) => trim.fmt(f)?,
            Modifier::Subst(subst) => subst.fmt(f)?,
            Modifier::CaseConv(conv) => conv.fmt(f)?,
            Modifier::Substring(substring) => substring.fmt(f)?,
            Modifier::Names { joined } => f.write_char(if *joined { '*' } else { '@' })?,
        }
        f.write_char('}')
    }
}

impl Display for TextUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal(c) => f.write_char(*c),
            Backslashed(c) => write!(f, "\\{c}"),
            RawParam { param, .. } => write!(f, "${param}"),
            BracedParam(param) => param.fmt(f),
            CommandSubst { content, .. } => write!(f, "$({content})"),
            Backquote { content, .. } => {
                f.write_char('`')?;
                for unit in content {
                    unit.fmt(f)?;
                }
                f.write_char('`')
            }
            Arith { content, .. } => write!(f, "$(({content}))"),
        }
    }
}

impl Display for BackquoteUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BackquoteUnit::Literal(c) => f.write_char(*c),
            BackquoteUnit::Backslashed(c) => write!(f, "\\{c}"),
        }
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|unit| unit.fmt(f))
    }
}

impl Display for EscapeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use EscapeUnit::*;
        match self {
            Literal(c) => f.write_char(*c),
            DoubleQuote => f.write_str("\\\""),
            SingleQuote => f.write_str("\\'"),
            Backslash => f.write_str("\\\\"),
            Question => f.write_str("\\?"),
            Alert => f.write_str("\\a"),
            Backspace => f.write_str("\\b"),
            Escape => f.write_str("\\e"),
            FormFeed => f.write_str("\\f"),
            Newline => f.write_str("\\n"),
            CarriageReturn => f.write_str("\\r"),
            Tab => f.write_str("\\t"),
            VerticalTab => f.write_str("\\v"),
            Control(b) => write!(f, "\\c{}", (b ^ 0x40) as char),
            Octal(b) => write!(f, "\\{b:03o}"),
            Hex(b) => write!(f, "\\x{b:02X}"),
            Unicode(c) if (*c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", *c as u32),
            Unicode(c) => write!(f, "\\U{:08X}", *c as u32),
        }
    }
}

impl Display for EscapedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|unit| unit.fmt(f))
    }
}

impl Display for WordUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Unquoted(unit) => unit.fmt(f),
            SingleQuote(s) => write!(f, "'{s}'"),
            DoubleQuote(text) => write!(f, "\"{text}\""),
            DollarSingleQuote(escaped) => write!(f, "$'{escaped}'"),
            Tilde(name) => write!(f, "~{name}"),
            ProcSubst {
                direction, content, ..
            } => {
                let c = match direction {
                    ProcSubstDirection::In => '<',
                    ProcSubstDirection::Out => '>',
                };
                write!(f, "{c}({content})")
            }
        }
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.units.iter().try_for_each(|unit| unit.fmt(f))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar(word) => word.fmt(f),
            Array(words) => write!(f, "({})", words.iter().format(" ")),
        }
    }
}

impl Display for Assign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(index) = &self.index {
            write!(f, "[{index}]")?;
        }
        write!(f, "={}", self.value)
    }
}

impl Display for RedirOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use RedirOp::*;
        f.write_str(match self {
            FileIn => "<",
            FileInOut => "<>",
            FileOut => ">",
            FileAppend => ">>",
            FileClobber => ">|",
            FdIn => "<&",
            FdOut => ">&",
            HereString => "<<<",
            OutErr => "&>",
        })
    }
}

impl Display for Redir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(Fd(fd)) = self.fd {
            write!(f, "{fd}")?;
        }
        match &self.body {
            RedirBody::Normal { operator, operand } => write!(f, "{operator}{operand}"),
            RedirBody::HereDoc(here_doc) => {
                let op = if here_doc.remove_tabs { "<<-" } else { "<<" };
                write!(f, "{op}{}", here_doc.delimiter)
            }
        }
    }
}

impl Display for SimpleCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut space = |f: &mut Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_char(' ')
            }
        };
        for assign in &self.assigns {
            space(f)?;
            assign.fmt(f)?;
        }
        for word in &self.words {
            space(f)?;
            word.fmt(f)?;
        }
        for redir in &self.redirs {
            space(f)?;
            redir.fmt(f)?;
        }
        Ok(())
    }
}

/// Writes a list where every item, including the last, is followed by its
/// separator (`&` for asynchronous items, `;` otherwise).
fn write_terminated(f: &mut Formatter<'_>, list: &List) -> fmt::Result {
    for (i, item) in list.0.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        item.and_or.fmt(f)?;
        f.write_char(if item.async_flag.is_some() { '&' } else { ';' })?;
    }
    Ok(())
}

impl Display for TestUnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use TestUnaryOp::*;
        f.write_str(match self {
            NonEmpty => "-n",
            Empty => "-z",
            Exists => "-e",
            IsFile => "-f",
            IsDir => "-d",
            Readable => "-r",
            Writable => "-w",
            Executable => "-x",
            NonEmptyFile => "-s",
        })
    }
}

impl Display for TestBinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use TestBinaryOp::*;
        f.write_str(match self {
            Match => "==",
            NoMatch => "!=",
            StringLess => "<",
            StringGreater => ">",
            Eq => "-eq",
            Ne => "-ne",
            Lt => "-lt",
            Le => "-le",
            Gt => "-gt",
            Ge => "-ge",
        })
    }
}

impl Display for TestExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use TestExpr::*;
        match self {
            Str(word) => word.fmt(f),
            Unary(op, word) => write!(f, "{op} {word}"),
            Binary(op, lhs, rhs) => write!(f, "{lhs} {op} {rhs}"),
            Not(inner) => write!(f, "! {inner}"),
            And(lhs, rhs) => write!(f, "{lhs} && {rhs}"),
            Or(lhs, rhs) => write!(f, "{lhs} || {rhs}"),
            Paren(inner) => write!(f, "( {inner} )"),
        }
    }
}

impl Display for CompoundCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use CompoundCommand::*;
        match self {
            Grouping(list) => {
                f.write_str("{ ")?;
                write_terminated(f, list)?;
                f.write_str(" }")
            }
            Subshell(list) => {
                f.write_char('(')?;
                write_terminated(f, list)?;
                f.write_char(')')
            }
            For { name, values, body } => {
                write!(f, "for {name}")?;
                if let Some(values) = values {
                    f.write_str(" in")?;
                    for value in values {
                        write!(f, " {value}")?;
                    }
                    f.write_char(';')?;
                }
                f.write_str(" do ")?;
                write_terminated(f, body)?;
                f.write_str(" done")
            }
            CStyleFor {
                init,
                condition,
                update,
                body,
            } => {
                let or_empty = |text: &Option<Text>| match text {
                    Some(text) => text.to_string(),
                    None => String::new(),
                };
                write!(
                    f,
                    "for (({}; {}; {})); do ",
                    or_empty(init),
                    or_empty(condition),
                    or_empty(update),
                )?;
                write_terminated(f, body)?;
                f.write_str(" done")
            }
            While { condition, body } => {
                f.write_str("while ")?;
                write_terminated(f, condition)?;
                f.write_str(" do ")?;
                write_terminated(f, body)?;
                f.write_str(" done")
            }
            Until { condition, body } => {
                f.write_str("until ")?;
                write_terminated(f, condition)?;
                f.write_str(" do ")?;
                write_terminated(f, body)?;
                f.write_str(" done")
            }
            If {
                condition,
                body,
                elifs,
                r#else,
            } => {
                f.write_str("if ")?;
                write_terminated(f, condition)?;
                f.write_str(" then ")?;
                write_terminated(f, body)?;
                for elif in elifs {
                    f.write_str(" elif ")?;
                    write_terminated(f, &elif.condition)?;
                    f.write_str(" then ")?;
                    write_terminated(f, &elif.body)?;
                }
                if let Some(r#else) = r#else {
                    f.write_str(" else ")?;
                    write_terminated(f, r#else)?;
                }
                f.write_str(" fi")
            }
            Case { subject, items } => {
                write!(f, "case {subject} in")?;
                for item in items {
                    write!(f, " ({})", item.patterns.iter().format(" | "))?;
                    if !item.body.0.is_empty() {
                        f.write_char(' ')?;
                        write_terminated(f, &item.body)?;
                        // write_terminated ends the last item with `;`, which
                        // combines with the continuation below.
                        let s = match item.continuation {
                            CaseContinuation::Break => ";",
                            CaseContinuation::FallThrough => "&",
                            CaseContinuation::Continue => ";&",
                        };
                        f.write_str(s)?;
                    } else {
                        let s = match item.continuation {
                            CaseContinuation::Break => " ;;",
                            CaseContinuation::FallThrough => " ;&",
                            CaseContinuation::Continue => " ;;&",
                        };
                        f.write_str(s)?;
                    }
                }
                f.write_str(" esac")
            }
            Select { name, values, body } => {
                write!(f, "select {name}")?;
                if let Some(values) = values {
                    f.write_str(" in")?;
                    for value in values {
                        write!(f, " {value}")?;
                    }
                    f.write_char(';')?;
                }
                f.write_str(" do ")?;
                write_terminated(f, body)?;
                f.write_str(" done")
            }
            Arithmetic { expr, .. } => write!(f, "(({expr}))"),
            DoubleBracket { expr, .. } => write!(f, "[[ {expr} ]]"),
        }
    }
}

impl Display for FullCompoundCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.command.fmt(f)?;
        self.redirs.iter().try_for_each(|redir| write!(f, " {redir}"))
    }
}

impl Display for FunctionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.has_keyword {
            f.write_str("function ")?;
        }
        write!(f, "{}() {}", self.name, self.body)
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::Simple(command) => command.fmt(f),
            Command::Compound(command) => command.fmt(f),
            Command::Function(command) => command.fmt(f),
        }
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.negation {
            f.write_str("! ")?;
        }
        let separator = if self.pipe_stderr { " |& " } else { " | " };
        write!(f, "{}", self.commands.iter().format(separator))
    }
}

impl Display for AndOr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AndOr::AndThen => f.write_str("&&"),
            AndOr::OrElse => f.write_str("||"),
        }
    }
}

impl Display for AndOrList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.first.fmt(f)?;
        self.rest
            .iter()
            .try_for_each(|(op, pipeline)| write!(f, " {op} {pipeline}"))
    }
}

impl Display for List {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            item.and_or.fmt(f)?;
            if item.async_flag.is_some() {
                f.write_char('&')?;
            } else if i + 1 < self.0.len() {
                f.write_char(';')?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Location;

    fn word(s: &str) -> Word {
        Word {
            units: s.chars().map(|c| Unquoted(Literal(c))).collect(),
            location: Location::dummy(s),
        }
    }

    fn simple(words: &[&str]) -> Command {
        Command::Simple(SimpleCommand {
            assigns: vec![],
            words: words.iter().copied().map(word).collect(),
            redirs: vec![],
        })
    }

    fn item(words: &[&str]) -> Item {
        Item {
            and_or: AndOrList {
                first: Pipeline {
                    commands: vec![simple(words)],
                    negation: false,
                    pipe_stderr: false,
                },
                rest: vec![],
            },
            async_flag: None,
        }
    }

    #[test]
    fn simple_command_display() {
        assert_eq!(simple(&["echo", "hello"]).to_string(), "echo hello");
    }

    #[test]
    fn list_display() {
        let list = List(vec![item(&["a"]), item(&["b"])]);
        assert_eq!(list.to_string(), "a; b");
    }

    #[test]
    fn async_item_display() {
        let mut it = item(&["sleep", "9"]);
        it.async_flag = Some(Location::dummy("&"));
        let list = List(vec![it]);
        assert_eq!(list.to_string(), "sleep 9&");
    }

    #[test]
    fn grouping_display() {
        let grouping = CompoundCommand::Grouping(List(vec![item(&["pwd"])]));
        assert_eq!(grouping.to_string(), "{ pwd; }");
    }

    #[test]
    fn if_display() {
        let command = CompoundCommand::If {
            condition: List(vec![item(&["true"])]),
            body: List(vec![item(&["foo"])]),
            elifs: vec![],
            r#else: Some(List(vec![item(&["bar"])])),
        };
        assert_eq!(command.to_string(), "if true; then foo; else bar; fi");
    }

    #[test]
    fn braced_param_display() {
        let param = BracedParam {
            indirect: false,
            param: Param::variable("x"),
            index: None,
            modifier: Modifier::Switch(Switch {
                r#type: SwitchType::Default,
                condition: SwitchCondition::UnsetOrEmpty,
                word: word("fallback"),
            }),
            location: Location::dummy("${x:-fallback}"),
        };
        assert_eq!(param.to_string(), "${x:-fallback}");
    }

    #[test]
    fn redir_display() {
        let redir = Redir {
            fd: Some(Fd(2)),
            body: RedirBody::Normal {
                operator: RedirOp::FileAppend,
                operand: word("log"),
            },
        };
        assert_eq!(redir.to_string(), "2>>log");
    }

    #[test]
    fn pipeline_display() {
        let pipeline = Pipeline {
            commands: vec![simple(&["a"]), simple(&["b"])],
            negation: true,
            pipe_stderr: false,
        };
        assert_eq!(pipeline.to_string(), "! a | b");
    }
}
