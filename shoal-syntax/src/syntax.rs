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

//! Shell command language syntax
//!
//! This module defines the abstract syntax tree of the shell language.
//!
//! The whole of a parsed script is a [`List`] of [`Item`]s; an item is a
//! possibly asynchronous [`AndOrList`]; an and-or list chains [`Pipeline`]s;
//! a pipeline is a sequence of [`Command`]s. Commands come in three flavors:
//! [`SimpleCommand`], [`CompoundCommand`] (with many variants), and
//! [`FunctionDefinition`].
//!
//! Tokens that undergo expansion are represented structurally: a [`Word`] is
//! a sequence of [`WordUnit`]s that remembers which spans were quoted, and a
//! [`Text`] is a sequence of [`TextUnit`]s for contexts where quotes are not
//! recognized (double-quoted content, here-document bodies, arithmetic
//! expressions). Preserving the quoting shape through parsing is what lets
//! the expansion engine apply field splitting and pathname expansion to
//! unquoted spans only.
//!
//! Most types implement `Display`, producing single-line source code with
//! here-document contents omitted, and `FromStr` (see
//! [`parser::from_str`](crate::parser)) for convenient construction in tests.

use crate::parser::lex::Keyword;
use crate::source::Location;
use std::cell::OnceCell;
use std::rc::Rc;

/// File descriptor number in the syntax
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fd(pub i32);

impl Fd {
    /// File descriptor of the standard input
    pub const STDIN: Fd = Fd(0);
    /// File descriptor of the standard output
    pub const STDOUT: Fd = Fd(1);
    /// File descriptor of the standard error
    pub const STDERR: Fd = Fd(2);
}

/// Special parameter
///
/// A special parameter is a single character with a fixed meaning, like `@`
/// for all positional parameters or `?` for the last exit status.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpecialParam {
    /// `@` (all positional parameters, split into fields when quoted)
    At,
    /// `*` (all positional parameters, joined when quoted)
    Asterisk,
    /// `#` (number of positional parameters)
    Number,
    /// `?` (exit status of the last command)
    Question,
    /// `-` (currently active short options)
    Hyphen,
    /// `$` (process ID of the shell)
    Dollar,
    /// `!` (process ID of the last asynchronous command)
    Exclamation,
    /// `0` (name of the shell or script)
    Zero,
}

impl SpecialParam {
    /// Returns the special parameter for the given character, if any.
    #[must_use]
    pub fn from_char(c: char) -> Option<SpecialParam> {
        use SpecialParam::*;
        match c {
            '@' => Some(At),
            '*' => Some(Asterisk),
            '#' => Some(Number),
            '?' => Some(Question),
            '-' => Some(Hyphen),
            '$' => Some(Dollar),
            '!' => Some(Exclamation),
            '0' => Some(Zero),
            _ => None,
        }
    }
}

/// Type of a parameter
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParamType {
    /// Named parameter (a variable)
    Variable,
    /// Special parameter
    Special(SpecialParam),
    /// Positional parameter, indexed from 1
    ///
    /// An index too large for `usize` is stored as `usize::MAX`, which always
    /// names a nonexistent parameter.
    Positional(usize),
}

/// Parameter occurring in a parameter expansion
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Param {
    /// Name of the parameter as written (`foo`, `@`, `12`, …)
    pub id: String,
    /// Classification of `id`, precomputed by the parser
    pub r#type: ParamType,
}

impl Param {
    /// Creates a variable parameter.
    #[must_use]
    pub fn variable<S: Into<String>>(id: S) -> Param {
        Param {
            id: id.into(),
            r#type: ParamType::Variable,
        }
    }
}

/// How a [switch](Switch) substitutes the value
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchType {
    /// `+`: use the alternate value if the parameter is set
    Alter,
    /// `-`: use the default if the parameter is missing
    Default,
    /// `=`: assign the default if the parameter is missing
    Assign,
    /// `?`: error out if the parameter is missing
    Error,
}

/// When a [switch](Switch) triggers
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchCondition {
    /// Without `:`: triggers only when the parameter is unset
    Unset,
    /// With `:`: triggers when the parameter is unset or empty
    UnsetOrEmpty,
}

/// Conditional substitution modifier (`${foo:-bar}` and friends)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Switch {
    pub r#type: SwitchType,
    pub condition: SwitchCondition,
    pub word: Word,
}

/// Which end a [trim](Trim) removes from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimSide {
    /// `#`: remove a prefix
    Prefix,
    /// `%`: remove a suffix
    Suffix,
}

/// How much a [trim](Trim) removes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimLength {
    /// Single operator: shortest match
    Shortest,
    /// Doubled operator: longest match
    Longest,
}

/// Prefix/suffix removal modifier (`${foo##*/}` and friends)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trim {
    pub side: TrimSide,
    pub length: TrimLength,
    pub pattern: Word,
}

/// Where a [substitution](Subst) pattern is anchored
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubstAnchor {
    /// `/#pat`: the pattern must match at the beginning
    Prefix,
    /// `/%pat`: the pattern must match at the end
    Suffix,
}

/// Pattern substitution modifier (`${foo/pat/repl}`)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subst {
    /// Pattern selecting what to replace
    pub pattern: Word,
    /// Replacement text; an absent replacement deletes the match
    pub replacement: Option<Word>,
    /// Whether all matches are replaced (`//`)
    pub global: bool,
    /// Optional anchoring of the pattern
    pub anchor: Option<SubstAnchor>,
}

/// Direction of a case conversion modifier
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaseConvKind {
    /// `^`: convert to uppercase
    Upper,
    /// `,`: convert to lowercase
    Lower,
}

/// Case conversion modifier (`${foo^^}` and friends)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseConv {
    pub kind: CaseConvKind,
    /// Whether all characters are converted (doubled operator) or only the
    /// first
    pub all: bool,
    /// Optional pattern restricting which characters are converted
    pub pattern: Option<Word>,
}

/// Substring modifier (`${foo:off}` and `${foo:off:len}`)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Substring {
    /// Arithmetic expression giving the starting offset
    pub offset: Text,
    /// Arithmetic expression giving the length, if present
    pub length: Option<Text>,
}

/// Attribute that modifies a braced parameter expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Modifier {
    /// No modifier
    None,
    /// `#` prefix (`${#foo}`)
    Length,
    /// Conditional substitution
    Switch(Switch),
    /// Prefix/suffix removal
    Trim(Trim),
    /// Pattern substitution
    Subst(Subst),
    /// Case conversion
    CaseConv(CaseConv),
    /// Substring extraction
    Substring(Substring),
    /// Name listing (`${!prefix*}` and `${!prefix@}`), valid only with the
    /// indirection flag
    Names {
        /// Whether the result is joined into one field (`*`) rather than
        /// one field per name (`@`)
        joined: bool,
    },
}

/// Array subscript in a parameter expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Subscript {
    /// `[@]`: all elements as separate fields when quoted
    At,
    /// `[*]`: all elements joined
    Star,
    /// Arbitrary subscript, an arithmetic expression for indexed arrays or a
    /// key for associative arrays
    Expr(Text),
}

/// Parameter expansion enclosed in braces
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracedParam {
    /// Whether the expansion starts with `!` (indirection or name listing)
    pub indirect: bool,
    /// Parameter to be expanded
    pub param: Param,
    /// Array subscript, if any
    pub index: Option<Subscript>,
    /// Modifier applied to the value
    pub modifier: Modifier,
    /// Position of the whole `${...}` in the source code
    pub location: Location,
}

/// Element of a backquoted command substitution
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackquoteUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped single character
    Backslashed(char),
}

/// Element of a [`Text`], i.e., something that can be expanded
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped single character
    Backslashed(char),
    /// Parameter expansion not enclosed in braces (`$foo`)
    RawParam {
        param: Param,
        location: Location,
    },
    /// Parameter expansion enclosed in braces
    BracedParam(BracedParam),
    /// Command substitution of the form `$(...)`
    CommandSubst {
        /// Command source, parsed and executed when the substitution is
        /// expanded
        content: Rc<str>,
        location: Location,
    },
    /// Command substitution of the form `` `...` ``
    Backquote {
        content: Vec<BackquoteUnit>,
        location: Location,
    },
    /// Arithmetic expansion `$((...))`
    Arith {
        content: Text,
        location: Location,
    },
}

pub use TextUnit::*;

/// String that may contain expansions
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Text(pub Vec<TextUnit>);

impl Text {
    /// Creates a text of literal characters.
    pub fn from_literal_chars<I: IntoIterator<Item = char>>(chars: I) -> Text {
        Text(chars.into_iter().map(Literal).collect())
    }

    /// Returns the literal string value if the text contains no expansions.
    #[must_use]
    pub fn to_string_if_literal(&self) -> Option<String> {
        self.0
            .iter()
            .map(|unit| match unit {
                Literal(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

/// Element of an [`EscapedString`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscapeUnit {
    /// Literal single character
    Literal(char),
    /// `\"`
    DoubleQuote,
    /// `\'`
    SingleQuote,
    /// `\\`
    Backslash,
    /// `\?`
    Question,
    /// `\a` (bell, ASCII 7)
    Alert,
    /// `\b` (backspace, ASCII 8)
    Backspace,
    /// `\e` (escape, ASCII 27)
    Escape,
    /// `\f` (form feed, ASCII 12)
    FormFeed,
    /// `\n` (newline)
    Newline,
    /// `\r` (carriage return)
    CarriageReturn,
    /// `\t` (horizontal tab)
    Tab,
    /// `\v` (vertical tab)
    VerticalTab,
    /// Control character notation `\cX`
    Control(u8),
    /// Octal byte `\OOO`
    Octal(u8),
    /// Hexadecimal byte `\xHH`
    Hex(u8),
    /// Unicode scalar `\uHHHH` or `\UHHHHHHHH`
    Unicode(char),
}

/// Content of a dollar-single-quoted string (`$'...'`)
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EscapedString(pub Vec<EscapeUnit>);

/// Direction of a process substitution
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcSubstDirection {
    /// `<(...)`: the command's output is readable at the substituted path
    In,
    /// `>(...)`: data written to the substituted path feeds the command
    Out,
}

/// Element of a [`Word`], i.e., text with quotes and tilde expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordUnit {
    /// Unquoted [`TextUnit`]
    Unquoted(TextUnit),
    /// String surrounded by single quotes
    SingleQuote(String),
    /// Text surrounded by double quotes
    DoubleQuote(Text),
    /// Dollar-single-quoted string
    DollarSingleQuote(EscapedString),
    /// Tilde expansion; the string does not contain the initial `~`
    Tilde(String),
    /// Process substitution `<(...)` or `>(...)`
    ProcSubst {
        direction: ProcSubstDirection,
        /// Command source, parsed and executed when the word is expanded
        content: Rc<str>,
        location: Location,
    },
}

pub use WordUnit::*;

/// Token that may involve expansions and quotes
///
/// Whether an empty word is valid depends on context; the parser never
/// produces an empty word where the grammar requires one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    /// Word units constituting the word
    pub units: Vec<WordUnit>,
    /// Position of the word in the source code
    pub location: Location,
}

impl Word {
    /// Returns the literal string value if the word contains only unquoted
    /// literal characters.
    #[must_use]
    pub fn to_string_if_literal(&self) -> Option<String> {
        self.units
            .iter()
            .map(|unit| match unit {
                Unquoted(Literal(c)) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Removes quotes, returning the resulting string and whether any part
    /// of the word was quoted.
    ///
    /// Expansions are rendered in their source form. The flag is used, for
    /// example, to decide whether a here-document body is literal.
    #[must_use]
    pub fn unquote(&self) -> (String, bool) {
        let mut result = String::new();
        let mut quoted = false;
        for unit in &self.units {
            match unit {
                Unquoted(Literal(c)) => result.push(*c),
                Unquoted(Backslashed(c)) => {
                    result.push(*c);
                    quoted = true;
                }
                Unquoted(other) => result.push_str(&other.to_string()),
                SingleQuote(s) => {
                    result.push_str(s);
                    quoted = true;
                }
                DoubleQuote(text) => {
                    for unit in &text.0 {
                        match unit {
                            Literal(c) | Backslashed(c) => result.push(*c),
                            other => result.push_str(&other.to_string()),
                        }
                    }
                    quoted = true;
                }
                DollarSingleQuote(escaped) => {
                    result.push_str(&escaped.to_string_content());
                    quoted = true;
                }
                Tilde(name) => {
                    result.push('~');
                    result.push_str(name);
                }
                ProcSubst { .. } => result.push_str(&unit.to_string()),
            }
        }
        (result, quoted)
    }
}

impl EscapedString {
    /// Returns the string the escapes denote.
    #[must_use]
    pub fn to_string_content(&self) -> String {
        use EscapeUnit::*;
        let mut result = String::new();
        for unit in &self.0 {
            match unit {
                Literal(c) => result.push(*c),
                DoubleQuote => result.push('"'),
                SingleQuote => result.push('\''),
                Backslash => result.push('\\'),
                Question => result.push('?'),
                Alert => result.push('\u{7}'),
                Backspace => result.push('\u{8}'),
                Escape => result.push('\u{1B}'),
                FormFeed => result.push('\u{C}'),
                Newline => result.push('\n'),
                CarriageReturn => result.push('\r'),
                Tab => result.push('\t'),
                VerticalTab => result.push('\u{B}'),
                Control(b) | Octal(b) | Hex(b) => result.push(*b as char),
                Unicode(c) => result.push(*c),
            }
        }
        result
    }
}

/// Value of an [assignment](Assign)
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// Scalar value
    Scalar(Word),
    /// Array of words (`a=(1 2 3)`)
    Array(Vec<Word>),
}

pub use Value::*;

/// Assignment word
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assign {
    /// Name of the variable, non-empty
    pub name: String,
    /// Optional array subscript on the name (`a[i]=v`)
    pub index: Option<Text>,
    /// Assigned value
    pub value: Value,
    /// Location of the whole assignment word
    pub location: Location,
}

/// Redirection operators other than here-documents
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirOp {
    /// `<`
    FileIn,
    /// `<>`
    FileInOut,
    /// `>`
    FileOut,
    /// `>>`
    FileAppend,
    /// `>|`
    FileClobber,
    /// `<&`
    FdIn,
    /// `>&`
    FdOut,
    /// `<<<`
    HereString,
    /// `&>`: both stdout and stderr to a file
    OutErr,
}

/// Here-document
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HereDoc {
    /// Token marking the end of the content
    pub delimiter: Word,

    /// Whether leading tabs are stripped from content lines (`<<-`)
    pub remove_tabs: bool,

    /// Content of the here-document
    ///
    /// The operator and the content are parsed at different times, so the
    /// content is filled into the cell when the line containing the operator
    /// has been consumed. Reading an already-parsed here-document's content
    /// may safely unwrap the cell.
    pub content: OnceCell<Text>,
}

/// Part of a redirection defining the nature of the resulting file descriptor
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirBody {
    /// Normal redirection with a word operand
    Normal { operator: RedirOp, operand: Word },
    /// Here-document
    HereDoc(Rc<HereDoc>),
}

impl RedirBody {
    /// Returns the operand word of the redirection.
    #[must_use]
    pub fn operand(&self) -> &Word {
        match self {
            RedirBody::Normal { operand, .. } => operand,
            RedirBody::HereDoc(here_doc) => &here_doc.delimiter,
        }
    }
}

/// Redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    /// Explicit file descriptor preceding the operator, if any
    pub fd: Option<Fd>,
    /// Nature of the redirection
    pub body: RedirBody,
}

impl Redir {
    /// Returns the file descriptor this redirection modifies, applying the
    /// operator's default when no explicit descriptor was given.
    #[must_use]
    pub fn fd_or_default(&self) -> Fd {
        use RedirOp::*;
        self.fd.unwrap_or(match &self.body {
            RedirBody::Normal { operator, .. } => match operator {
                FileIn | FileInOut | FdIn | HereString => Fd::STDIN,
                FileOut | FileAppend | FileClobber | FdOut | OutErr => Fd::STDOUT,
            },
            RedirBody::HereDoc(_) => Fd::STDIN,
        })
    }
}

/// Command that involves assignments, words, and redirections
///
/// A valid simple command has at least one assignment, word, or redirection;
/// the parser never produces an entirely empty one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimpleCommand {
    pub assigns: Vec<Assign>,
    pub words: Vec<Word>,
    pub redirs: Vec<Redir>,
}

impl SimpleCommand {
    /// Tests whether this simple command is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigns.is_empty() && self.words.is_empty() && self.redirs.is_empty()
    }

    /// Tests whether the first word looks like a keyword.
    #[must_use]
    pub fn first_word_is_keyword(&self) -> bool {
        self.words.first().map_or(false, |word| {
            word.to_string_if_literal()
                .map_or(false, |s| s.parse::<Keyword>().is_ok())
        })
    }

    /// Returns the location of this command, which is that of its first
    /// element.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        if let Some(assign) = self.assigns.first() {
            Some(&assign.location)
        } else if let Some(word) = self.words.first() {
            Some(&word.location)
        } else {
            self.redirs.first().map(|redir| &redir.body.operand().location)
        }
    }
}

/// `elif … then …` clause of an if command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElifThen {
    pub condition: List,
    pub body: List,
}

/// Terminator of a case branch, deciding what happens next
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CaseContinuation {
    /// `;;`: leave the case construct
    #[default]
    Break,
    /// `;&`: run the next branch's body unconditionally
    FallThrough,
    /// `;;&`: resume pattern matching with the next branch
    Continue,
}

/// Branch of a `case` compound command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseItem {
    /// Patterns matched against the subject; at least one
    pub patterns: Vec<Word>,
    /// Commands executed when a pattern matches
    pub body: List,
    /// What happens after the body
    pub continuation: CaseContinuation,
}

/// Operand of a unary `[[ ]]` primary
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestUnaryOp {
    /// `-n`: the string is non-empty
    NonEmpty,
    /// `-z`: the string is empty
    Empty,
    /// `-e`: the file exists
    Exists,
    /// `-f`: the file is a regular file
    IsFile,
    /// `-d`: the file is a directory
    IsDir,
    /// `-r`: the file is readable
    Readable,
    /// `-w`: the file is writable
    Writable,
    /// `-x`: the file is executable
    Executable,
    /// `-s`: the file has a size greater than zero
    NonEmptyFile,
}

/// Operator of a binary `[[ ]]` primary
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestBinaryOp {
    /// `=` or `==`: pattern match
    Match,
    /// `!=`: pattern mismatch
    NoMatch,
    /// `<`: lexicographically less
    StringLess,
    /// `>`: lexicographically greater
    StringGreater,
    /// `-eq`
    Eq,
    /// `-ne`
    Ne,
    /// `-lt`
    Lt,
    /// `-le`
    Le,
    /// `-gt`
    Gt,
    /// `-ge`
    Ge,
}

/// Conditional expression inside `[[ ]]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestExpr {
    /// Bare word, true when it expands to a non-empty string
    Str(Word),
    /// Unary primary
    Unary(TestUnaryOp, Word),
    /// Binary primary
    Binary(TestBinaryOp, Word, Word),
    /// `!` negation
    Not(Box<TestExpr>),
    /// `&&`
    And(Box<TestExpr>, Box<TestExpr>),
    /// `||`
    Or(Box<TestExpr>, Box<TestExpr>),
    /// Parenthesized subexpression
    Paren(Box<TestExpr>),
}

/// Command that contains other commands
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompoundCommand {
    /// List in `{ … }`
    Grouping(List),
    /// List executed in a subshell
    Subshell(List),
    /// For loop
    For {
        name: Word,
        /// Words after `in`; `None` means iterating over `"$@"`
        values: Option<Vec<Word>>,
        body: List,
    },
    /// C-style for loop `for ((init; cond; update))`
    CStyleFor {
        init: Option<Text>,
        condition: Option<Text>,
        update: Option<Text>,
        body: List,
    },
    /// While loop
    While { condition: List, body: List },
    /// Until loop
    Until { condition: List, body: List },
    /// If conditional construct
    If {
        condition: List,
        body: List,
        elifs: Vec<ElifThen>,
        r#else: Option<List>,
    },
    /// Case conditional construct
    Case { subject: Word, items: Vec<CaseItem> },
    /// Select loop, prompting the user to pick a word
    Select {
        name: Word,
        values: Option<Vec<Word>>,
        body: List,
    },
    /// Arithmetic command `((…))`
    Arithmetic { expr: Text, location: Location },
    /// Conditional command `[[ … ]]`
    DoubleBracket { expr: TestExpr, location: Location },
}

/// Compound command with redirections
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FullCompoundCommand {
    /// The main part
    pub command: CompoundCommand,
    /// Redirections attached after the closing keyword
    pub redirs: Vec<Redir>,
}

/// Function definition command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDefinition {
    /// Whether the definition starts with the `function` reserved word
    pub has_keyword: bool,
    /// Function name
    pub name: Word,
    /// Function body, shared with the function table after execution
    pub body: Rc<FullCompoundCommand>,
}

/// Element of a pipeline
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Simple command
    Simple(SimpleCommand),
    /// Compound command
    Compound(FullCompoundCommand),
    /// Function definition command
    Function(FunctionDefinition),
}

/// Commands separated by `|` or `|&`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    /// Commands of the pipeline; at least one
    pub commands: Vec<Command>,
    /// Whether the pipeline begins with `!`
    pub negation: bool,
    /// Whether the commands were connected with `|&`, which pipes the
    /// standard error along with the standard output
    pub pipe_stderr: bool,
}

/// Connective between pipelines in an and-or list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AndOr {
    /// `&&`
    AndThen,
    /// `||`
    OrElse,
}

/// Pipelines separated by `&&` and `||`, evaluated left to right
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AndOrList {
    pub first: Pipeline,
    pub rest: Vec<(AndOr, Pipeline)>,
}

/// Element of a [`List`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    /// Main part of the item
    pub and_or: AndOrList,
    /// Location of the `&` making this item asynchronous, if any
    pub async_flag: Option<Location>,
}

/// Sequence of [`Item`]s separated by `;` or `&`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List(pub Vec<Item>);

mod impl_display;
