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

//! Definition of errors that happen in the parser

use crate::source::pretty::{Annotation, AnnotationType, MessageBase};
use crate::source::Location;
use crate::syntax::AndOr;
use std::borrow::Cow;
use thiserror::Error;

/// Types of syntax errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{}", self.message())]
#[non_exhaustive]
pub enum SyntaxError {
    /// A backslash at the end of the input
    IncompleteEscape,
    /// A backslash not followed by a character that makes a valid escape
    InvalidEscape,
    /// An octal escape above `\377` in a dollar-single-quoted string
    OctalEscapeOutOfRange,
    /// A Unicode escape denoting no valid scalar value
    UnicodeEscapeOutOfRange,
    /// A single quotation lacking a closing `'`
    UnclosedSingleQuote { opening_location: Location },
    /// A double quotation lacking a closing `"`
    UnclosedDoubleQuote { opening_location: Location },
    /// A `$'` lacking a closing `'`
    UnclosedDollarSingleQuote { opening_location: Location },
    /// A parameter expansion lacking a closing `}`
    UnclosedParam { opening_location: Location },
    /// A parameter expansion lacking a name
    EmptyParam,
    /// A parameter expansion with an invalid name
    InvalidParam,
    /// A parameter expansion with an unterminated subscript
    UnclosedSubscript { opening_location: Location },
    /// A modifier in a parameter expansion that has no valid form
    InvalidModifier,
    /// A `$(` lacking a closing `)`
    UnclosedCommandSubstitution { opening_location: Location },
    /// A backquote lacking a closing backquote
    UnclosedBackquote { opening_location: Location },
    /// A `$((` lacking a closing `))`
    UnclosedArith { opening_location: Location },
    /// A `<(` or `>(` lacking a closing `)`
    UnclosedProcSubst { opening_location: Location },
    /// A command beginning with an inappropriate token
    InvalidCommandToken,
    /// A missing separator between commands
    MissingSeparator,
    /// A redirection file descriptor too large to be used
    FdOutOfRange,
    /// A redirection operator without its operand
    MissingRedirOperand,
    /// A here-document operator without its delimiter token
    MissingHereDocDelimiter,
    /// A here-document operator whose content was never read
    MissingHereDocContent,
    /// A here-document content without its delimiter line
    UnclosedHereDocContent { redir_op_location: Location },
    /// An array assignment `=(` lacking a closing `)`
    UnclosedArrayValue { opening_location: Location },
    /// A `}` without a matching `{`
    UnopenedGrouping,
    /// A grouping that is not closed
    UnclosedGrouping { opening_location: Location },
    /// A grouping without any commands
    EmptyGrouping,
    /// A `)` without a matching `(`
    UnopenedSubshell,
    /// A subshell that is not closed
    UnclosedSubshell { opening_location: Location },
    /// A subshell without any commands
    EmptySubshell,
    /// A `do` or `done` outside a loop
    UnopenedLoop,
    /// A do clause that is not closed
    UnclosedDoClause { opening_location: Location },
    /// A do clause without any commands
    EmptyDoClause,
    /// A for loop without a variable name
    MissingForName,
    /// A for loop whose variable name is not a valid word
    InvalidForName,
    /// A for loop value that is not a valid word
    InvalidForValue,
    /// A for loop without a do clause
    MissingForBody { opening_location: Location },
    /// A C-style for loop header lacking the closing `))`
    UnclosedArithFor { opening_location: Location },
    /// A select command without a variable name
    MissingSelectName,
    /// A select command without a do clause
    MissingSelectBody { opening_location: Location },
    /// A while loop without a do clause
    UnclosedWhileClause { opening_location: Location },
    /// A while loop with an empty condition
    EmptyWhileCondition,
    /// An until loop without a do clause
    UnclosedUntilClause { opening_location: Location },
    /// An until loop with an empty condition
    EmptyUntilCondition,
    /// An if command without a then clause
    IfMissingThen { if_location: Location },
    /// An if command with an empty condition
    EmptyIfCondition,
    /// An if command with an empty body
    EmptyIfBody,
    /// An elif clause without a then clause
    ElifMissingThen { elif_location: Location },
    /// An elif clause with an empty condition
    EmptyElifCondition,
    /// An elif clause with an empty body
    EmptyElifBody,
    /// An empty else clause
    EmptyElse,
    /// An `elif`, `else`, `then`, or `fi` outside an if command
    UnopenedIf,
    /// An if command that is not closed
    UnclosedIf { opening_location: Location },
    /// A case command without a subject
    MissingCaseSubject,
    /// A case command whose subject is not a valid word
    InvalidCaseSubject,
    /// A case command without `in` after the subject
    MissingIn { opening_location: Location },
    /// A case item lacking its closing `)`
    UnclosedPatternList,
    /// A case item without a pattern
    MissingPattern,
    /// A case item whose pattern is not a valid word
    InvalidPattern,
    /// An `esac` or `;;` outside a case command
    UnopenedCase,
    /// A case command that is not closed
    UnclosedCase { opening_location: Location },
    /// An arithmetic command lacking its closing `))`
    UnclosedArithCommand { opening_location: Location },
    /// A `[[` command lacking its closing `]]`
    UnclosedDoubleBracket { opening_location: Location },
    /// An operand or operator in `[[ ]]` that makes no valid expression
    InvalidTestExpression,
    /// A binary `[[ ]]` operator that is not supported
    UnsupportedTestOperator,
    /// A `(` not followed by `)` in a function definition
    UnmatchedParenthesis,
    /// A function definition without a body
    MissingFunctionBody,
    /// A function body that is not a compound command
    InvalidFunctionBody,
    /// The keyword `in` used as a command name
    InAsCommandName,
    /// A pipeline missing after `&&` or `||`
    MissingPipeline(AndOr),
    /// Two successive `!` tokens
    DoubleNegation,
    /// A `|` followed by a `!`
    BangAfterBar,
    /// A command missing after `!`
    MissingCommandAfterBang,
    /// A command missing after `|`
    MissingCommandAfterBar,
    /// A redundant token after a complete command line
    RedundantToken,
}

impl SyntaxError {
    /// Returns a message describing the error.
    #[must_use]
    pub fn message(&self) -> &'static str {
        use SyntaxError::*;
        match self {
            IncompleteEscape => "the backslash is not followed by a character",
            InvalidEscape => "invalid escape sequence",
            OctalEscapeOutOfRange => "octal escape out of range",
            UnicodeEscapeOutOfRange => "Unicode escape out of range",
            UnclosedSingleQuote { .. } => "the single quote is not closed",
            UnclosedDoubleQuote { .. } => "the double quote is not closed",
            UnclosedDollarSingleQuote { .. } => "the $' quote is not closed",
            UnclosedParam { .. } => "the parameter expansion is not closed",
            EmptyParam => "the parameter name is missing",
            InvalidParam => "invalid parameter name",
            UnclosedSubscript { .. } => "the subscript is not closed",
            InvalidModifier => "invalid parameter expansion modifier",
            UnclosedCommandSubstitution { .. } => "the command substitution is not closed",
            UnclosedBackquote { .. } => "the backquote is not closed",
            UnclosedArith { .. } => "the arithmetic expansion is not closed",
            UnclosedProcSubst { .. } => "the process substitution is not closed",
            InvalidCommandToken => "the token cannot start a command",
            MissingSeparator => "a separator is missing between commands",
            FdOutOfRange => "the file descriptor is out of range",
            MissingRedirOperand => "the redirection operator is missing its operand",
            MissingHereDocDelimiter => "the here-document operator is missing its delimiter",
            MissingHereDocContent => "the here-document content is missing",
            UnclosedHereDocContent { .. } => "the here-document is missing its delimiter line",
            UnclosedArrayValue { .. } => "the array assignment is not closed",
            UnopenedGrouping => "the `}` has no matching `{`",
            UnclosedGrouping { .. } => "the grouping is not closed",
            EmptyGrouping => "the grouping is empty",
            UnopenedSubshell => "the `)` has no matching `(`",
            UnclosedSubshell { .. } => "the subshell is not closed",
            EmptySubshell => "the subshell is empty",
            UnopenedLoop => "the `do` or `done` is not in a loop",
            UnclosedDoClause { .. } => "the `do` clause is missing its `done`",
            EmptyDoClause => "the `do` clause is empty",
            MissingForName => "the variable name is missing in the `for` loop",
            InvalidForName => "invalid variable name in the `for` loop",
            InvalidForValue => "invalid word in the `for` loop values",
            MissingForBody { .. } => "the `for` loop is missing its `do` clause",
            UnclosedArithFor { .. } => "the `for ((...))` header is not closed",
            MissingSelectName => "the variable name is missing in the `select` command",
            MissingSelectBody { .. } => "the `select` command is missing its `do` clause",
            UnclosedWhileClause { .. } => "the `while` loop is missing its `do` clause",
            EmptyWhileCondition => "the `while` loop is missing its condition",
            UnclosedUntilClause { .. } => "the `until` loop is missing its `do` clause",
            EmptyUntilCondition => "the `until` loop is missing its condition",
            IfMissingThen { .. } => "the `if` command is missing the `then` clause",
            EmptyIfCondition => "the `if` command is missing its condition",
            EmptyIfBody => "the `if` command is missing its body",
            ElifMissingThen { .. } => "the `elif` clause is missing the `then` clause",
            EmptyElifCondition => "the `elif` clause is missing its condition",
            EmptyElifBody => "the `elif` clause is missing its body",
            EmptyElse => "the `else` clause is empty",
            UnopenedIf => "this token is not in an `if` command",
            UnclosedIf { .. } => "the `if` command is missing its `fi`",
            MissingCaseSubject => "the subject is missing after `case`",
            InvalidCaseSubject => "invalid subject in the `case` command",
            MissingIn { .. } => "`in` is missing in the `case` command",
            UnclosedPatternList => "the pattern list is missing its `)`",
            MissingPattern => "a pattern is missing in the `case` command",
            InvalidPattern => "invalid pattern in the `case` command",
            UnopenedCase => "this token is not in a `case` command",
            UnclosedCase { .. } => "the `case` command is missing its `esac`",
            UnclosedArithCommand { .. } => "the arithmetic command is missing its `))`",
            UnclosedDoubleBracket { .. } => "the `[[` command is missing its `]]`",
            InvalidTestExpression => "invalid conditional expression",
            UnsupportedTestOperator => "the operator is not supported in `[[ ]]`",
            UnmatchedParenthesis => "`)` is missing after `(`",
            MissingFunctionBody => "the function body is missing",
            InvalidFunctionBody => "the function body must be a compound command",
            InAsCommandName => "`in` cannot be used as a command name",
            MissingPipeline(AndOr::AndThen) => "a command is missing after `&&`",
            MissingPipeline(AndOr::OrElse) => "a command is missing after `||`",
            DoubleNegation => "`!` cannot be used twice in a row",
            BangAfterBar => "`!` cannot follow `|`",
            MissingCommandAfterBang => "a command is missing after `!`",
            MissingCommandAfterBar => "a command is missing after `|`",
            RedundantToken => "the token is redundant",
        }
    }

    /// Returns the location of a related open construct, if any.
    #[must_use]
    pub fn opening_location(&self) -> Option<&Location> {
        use SyntaxError::*;
        match self {
            UnclosedSingleQuote { opening_location }
            | UnclosedDoubleQuote { opening_location }
            | UnclosedDollarSingleQuote { opening_location }
            | UnclosedParam { opening_location }
            | UnclosedSubscript { opening_location }
            | UnclosedCommandSubstitution { opening_location }
            | UnclosedBackquote { opening_location }
            | UnclosedArith { opening_location }
            | UnclosedProcSubst { opening_location }
            | UnclosedArrayValue { opening_location }
            | UnclosedGrouping { opening_location }
            | UnclosedSubshell { opening_location }
            | UnclosedDoClause { opening_location }
            | MissingForBody { opening_location }
            | UnclosedArithFor { opening_location }
            | MissingSelectBody { opening_location }
            | UnclosedWhileClause { opening_location }
            | UnclosedUntilClause { opening_location }
            | UnclosedIf { opening_location }
            | MissingIn { opening_location }
            | UnclosedCase { opening_location }
            | UnclosedArithCommand { opening_location }
            | UnclosedDoubleBracket { opening_location } => Some(opening_location),
            IfMissingThen { if_location } => Some(if_location),
            ElifMissingThen { elif_location } => Some(elif_location),
            UnclosedHereDocContent { redir_op_location } => Some(redir_op_location),
            _ => None,
        }
    }
}

/// Cause of a parser error
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ErrorCause {
    /// Error in the syntax of the source code
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Explanation of a failure in parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{cause}")]
pub struct Error {
    pub cause: ErrorCause,
    pub location: Location,
}

impl Error {
    /// Tests whether extending the input could resolve this error.
    ///
    /// This is true when the error arose at the very end of the input, which
    /// means an open construct (quote, substitution, compound command,
    /// here-document) was awaiting its closer when the buffer ran out. The
    /// interactive driver uses this to print `PS2` and read another line
    /// instead of diagnosing the error.
    #[must_use]
    pub fn needs_more_input(&self) -> bool {
        let ErrorCause::Syntax(_) = &self.cause;
        self.location.range.start >= self.location.code.value.chars().count()
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

    fn additional_annotations<'a, T: Extend<Annotation<'a>>>(&'a self, results: &mut T) {
        let ErrorCause::Syntax(error) = &self.cause;
        if let Some(location) = error.opening_location() {
            results.extend(std::iter::once(Annotation::new(
                AnnotationType::Info,
                "the construct started here".into(),
                location,
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_more_input_at_end_of_code() {
        let location = Location::dummy("if true");
        let mut error = Error {
            cause: SyntaxError::UnclosedIf {
                opening_location: location.clone(),
            }
            .into(),
            location: location.clone(),
        };
        // The dummy location covers the whole string, not its end.
        error.location.range = 7..7;
        assert!(error.needs_more_input());
    }

    #[test]
    fn does_not_need_more_input_in_the_middle() {
        let location = Location::dummy("fi");
        let error = Error {
            cause: SyntaxError::UnopenedIf.into(),
            location: Location {
                range: 0..2,
                ..location
            },
        };
        assert!(!error.needs_more_input());
    }
}
