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

//! Expression evaluation
//!
//! The evaluator parses and computes in a single pass, climbing operator
//! precedence. Short-circuited subexpressions are still parsed but in
//! [`Mode::Skip`], which performs no variable access and raises no numeric
//! errors; `1 || x/0` therefore evaluates to 1.

use crate::env::Env;
use crate::token::{Operator, Token, TokenValue, Tokens};
use crate::{Error, ErrorCause, Value};
use std::ops::Range;

/// Whether a subexpression contributes to the result
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Compute values and perform assignments.
    Eval,
    /// Parse only; every operand is treated as zero and nothing is assigned.
    Skip,
}

/// Partial result that may still refer to a variable
///
/// Keeping the variable name around (rather than resolving it immediately)
/// is what lets `=`, compound assignments, and `++`/`--` find their target.
#[derive(Clone, Debug)]
enum Term<'a> {
    Value(i64),
    Variable { name: &'a str, location: Range<usize> },
}

/// Binding powers of the binary operators, tighter bindings higher.
fn binary_precedence(op: Operator) -> Option<u8> {
    use Operator::*;
    match op {
        BarBar => Some(1),
        AndAnd => Some(2),
        Bar => Some(3),
        Caret => Some(4),
        And => Some(5),
        EqualEqual | BangEqual => Some(6),
        Less | LessEqual | Greater | GreaterEqual => Some(7),
        LessLess | GreaterGreater => Some(8),
        Plus | Minus => Some(9),
        Asterisk | Slash | Percent => Some(10),
        AsteriskAsterisk => Some(11),
        _ => None,
    }
}

fn is_assignment(op: Operator) -> bool {
    use Operator::*;
    matches!(
        op,
        Equal
            | PlusEqual
            | MinusEqual
            | AsteriskEqual
            | SlashEqual
            | PercentEqual
            | LessLessEqual
            | GreaterGreaterEqual
            | AndEqual
            | BarEqual
            | CaretEqual
    )
}

pub struct Evaluator<'a, 'e, E> {
    tokens: Tokens<'a>,
    env: &'e mut E,
    /// Length of the source, for locating errors at the end of input.
    end: usize,
}

type EvalResult<'a, E> = Result<Term<'a>, Error<<E as Env>::AssignError>>;

impl<'a, 'e, E: Env> Evaluator<'a, 'e, E> {
    pub fn new(source: &'a str, env: &'e mut E) -> Self {
        Evaluator {
            tokens: Tokens::new(source),
            env,
            end: source.len(),
        }
    }

    /// Evaluates the whole expression.
    pub fn run(&mut self) -> Result<Value, Error<E::AssignError>> {
        let term = self.expression(Mode::Eval)?;
        let value = self.value_of(term, Mode::Eval)?;
        match self.tokens.next().transpose()? {
            None => Ok(Value::Integer(value)),
            Some(token) => Err(Error {
                cause: ErrorCause::UnexpectedToken,
                location: token.location,
            }),
        }
    }

    fn peek_operator(&self) -> Option<(Operator, Range<usize>)> {
        match self.tokens.peek() {
            Some(Ok(Token {
                value: TokenValue::Operator(op),
                location,
            })) => Some((op, location)),
            _ => None,
        }
    }

    fn take_token(&mut self) -> Result<Option<Token<'a>>, Error<E::AssignError>> {
        Ok(self.tokens.next().transpose()?)
    }

    fn end_location(&self) -> Range<usize> {
        self.end..self.end
    }

    /// Resolves a term to its numeric value.
    fn value_of(&self, term: Term<'a>, mode: Mode) -> Result<i64, Error<E::AssignError>> {
        match term {
            Term::Value(v) => Ok(v),
            Term::Variable { name, location } => match mode {
                Mode::Skip => Ok(0),
                Mode::Eval => match self.env.get_variable(name) {
                    None => Ok(0),
                    Some(value) => {
                        if value.is_empty() {
                            return Ok(0);
                        }
                        value.trim().parse().map_err(|_| Error {
                            cause: ErrorCause::InvalidVariableValue(value.to_string()),
                            location,
                        })
                    }
                },
            },
        }
    }

    fn assign(
        &mut self,
        term: &Term<'a>,
        value: i64,
        mode: Mode,
        op_location: &Range<usize>,
    ) -> Result<(), Error<E::AssignError>> {
        if mode == Mode::Skip {
            return Ok(());
        }
        match term {
            Term::Variable { name, location } => self
                .env
                .assign_variable(name, value.to_string(), location.clone())
                .map_err(|e| Error {
                    cause: ErrorCause::AssignVariableError(e),
                    location: location.clone(),
                }),
            Term::Value(_) => Err(Error {
                cause: ErrorCause::AssignmentToValue,
                location: op_location.clone(),
            }),
        }
    }

    /// `expression = assignment ("," assignment)*`
    pub(crate) fn expression(&mut self, mode: Mode) -> EvalResult<'a, E> {
        let mut term = self.assignment(mode)?;
        while let Some((Operator::Comma, _)) = self.peek_operator() {
            self.take_token()?;
            // The left operand is evaluated for its side effects only.
            self.value_of(term, mode)?;
            term = self.assignment(mode)?;
        }
        Ok(term)
    }

    /// `assignment = conditional | variable assign_op assignment`
    fn assignment(&mut self, mode: Mode) -> EvalResult<'a, E> {
        let target = self.conditional(mode)?;
        let Some((op, op_location)) = self.peek_operator() else {
            return Ok(target);
        };
        if !is_assignment(op) {
            return Ok(target);
        }
        self.take_token()?;
        let rhs_term = self.assignment(mode)?;
        let rhs = self.value_of(rhs_term, mode)?;

        use Operator::*;
        let value = if op == Equal {
            rhs
        } else {
            let old = self.value_of(target.clone(), mode)?;
            match mode {
                Mode::Skip => 0,
                Mode::Eval => match op {
                    PlusEqual => self.arith(old.checked_add(rhs), &op_location)?,
                    MinusEqual => self.arith(old.checked_sub(rhs), &op_location)?,
                    AsteriskEqual => self.arith(old.checked_mul(rhs), &op_location)?,
                    SlashEqual => self.divide(old, rhs, &op_location)?,
                    PercentEqual => self.remainder(old, rhs, &op_location)?,
                    LessLessEqual => old.wrapping_shl(rhs as u32),
                    GreaterGreaterEqual => old.wrapping_shr(rhs as u32),
                    AndEqual => old & rhs,
                    BarEqual => old | rhs,
                    CaretEqual => old ^ rhs,
                    _ => unreachable!(),
                },
            }
        };
        self.assign(&target, value, mode, &op_location)?;
        Ok(Term::Value(value))
    }

    /// `conditional = binary | binary "?" expression ":" conditional`
    fn conditional(&mut self, mode: Mode) -> EvalResult<'a, E> {
        let condition = self.binary(1, mode)?;
        let Some((Operator::Question, _)) = self.peek_operator() else {
            return Ok(condition);
        };
        self.take_token()?;
        let condition = self.value_of(condition, mode)?;

        let (then_mode, else_mode) = match mode {
            Mode::Skip => (Mode::Skip, Mode::Skip),
            Mode::Eval if condition != 0 => (Mode::Eval, Mode::Skip),
            Mode::Eval => (Mode::Skip, Mode::Eval),
        };

        let then_term = self.expression(then_mode)?;
        let then_value = self.value_of(then_term, then_mode)?;
        match self.take_token()? {
            Some(Token {
                value: TokenValue::Operator(Operator::Colon),
                ..
            }) => {}
            Some(token) => {
                return Err(Error {
                    cause: ErrorCause::UnexpectedToken,
                    location: token.location,
                })
            }
            None => {
                return Err(Error {
                    cause: ErrorCause::IncompleteExpression,
                    location: self.end_location(),
                })
            }
        }
        let else_term = self.conditional(else_mode)?;
        let else_value = self.value_of(else_term, else_mode)?;

        Ok(Term::Value(if condition != 0 {
            then_value
        } else {
            else_value
        }))
    }

    /// Precedence-climbing loop over the binary operators.
    fn binary(&mut self, min_precedence: u8, mode: Mode) -> EvalResult<'a, E> {
        let mut lhs_term = self.unary(mode)?;
        while let Some((op, op_location)) = self.peek_operator() {
            let Some(precedence) = binary_precedence(op) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.take_token()?;

            use Operator::*;
            let lhs = self.value_of(lhs_term, mode)?;
            let rhs_mode = match (op, mode) {
                (_, Mode::Skip) => Mode::Skip,
                (AndAnd, _) if lhs == 0 => Mode::Skip,
                (BarBar, _) if lhs != 0 => Mode::Skip,
                _ => mode,
            };
            // `**` is right-associative; everything else is left-associative.
            let next_min = if op == AsteriskAsterisk {
                precedence
            } else {
                precedence + 1
            };
            let rhs_term = self.binary(next_min, rhs_mode)?;
            let rhs = self.value_of(rhs_term, rhs_mode)?;

            let value = match mode {
                Mode::Skip => 0,
                Mode::Eval => match op {
                    BarBar => i64::from(lhs != 0 || rhs != 0),
                    AndAnd => i64::from(lhs != 0 && rhs != 0),
                    Bar => lhs | rhs,
                    Caret => lhs ^ rhs,
                    And => lhs & rhs,
                    EqualEqual => i64::from(lhs == rhs),
                    BangEqual => i64::from(lhs != rhs),
                    Less => i64::from(lhs < rhs),
                    LessEqual => i64::from(lhs <= rhs),
                    Greater => i64::from(lhs > rhs),
                    GreaterEqual => i64::from(lhs >= rhs),
                    LessLess => lhs.wrapping_shl(rhs as u32),
                    GreaterGreater => lhs.wrapping_shr(rhs as u32),
                    Plus => self.arith(lhs.checked_add(rhs), &op_location)?,
                    Minus => self.arith(lhs.checked_sub(rhs), &op_location)?,
                    Asterisk => self.arith(lhs.checked_mul(rhs), &op_location)?,
                    Slash => self.divide(lhs, rhs, &op_location)?,
                    Percent => self.remainder(lhs, rhs, &op_location)?,
                    AsteriskAsterisk => self.power(lhs, rhs, &op_location)?,
                    _ => unreachable!(),
                },
            };
            lhs_term = Term::Value(value);
        }
        Ok(lhs_term)
    }

    /// `unary = postfix | unary_op unary`
    fn unary(&mut self, mode: Mode) -> EvalResult<'a, E> {
        use Operator::*;
        let Some((op, op_location)) = self.peek_operator() else {
            return self.postfix(mode);
        };
        match op {
            Plus | Minus | Bang | Tilde => {
                self.take_token()?;
                let term = self.unary(mode)?;
                let value = self.value_of(term, mode)?;
                let value = match mode {
                    Mode::Skip => 0,
                    Mode::Eval => match op {
                        Plus => value,
                        Minus => self.arith(value.checked_neg(), &op_location)?,
                        Bang => i64::from(value == 0),
                        Tilde => !value,
                        _ => unreachable!(),
                    },
                };
                Ok(Term::Value(value))
            }
            PlusPlus | MinusMinus => {
                self.take_token()?;
                let term = self.unary(mode)?;
                let old = self.value_of(term.clone(), mode)?;
                let delta = if op == PlusPlus { 1 } else { -1 };
                let new = self.arith(old.checked_add(delta), &op_location)?;
                self.assign(&term, new, mode, &op_location)?;
                Ok(Term::Value(new))
            }
            _ => self.postfix(mode),
        }
    }

    /// `postfix = primary ("++" | "--")*`
    fn postfix(&mut self, mode: Mode) -> EvalResult<'a, E> {
        use Operator::*;
        let mut term = self.primary(mode)?;
        while let Some((op @ (PlusPlus | MinusMinus), op_location)) = self.peek_operator() {
            self.take_token()?;
            let old = self.value_of(term.clone(), mode)?;
            let delta = if op == PlusPlus { 1 } else { -1 };
            let new = self.arith(old.checked_add(delta), &op_location)?;
            self.assign(&term, new, mode, &op_location)?;
            term = Term::Value(old);
        }
        Ok(term)
    }

    /// `primary = number | identifier | "(" expression ")"`
    fn primary(&mut self, mode: Mode) -> EvalResult<'a, E> {
        match self.take_token()? {
            None => Err(Error {
                cause: ErrorCause::IncompleteExpression,
                location: self.end_location(),
            }),
            Some(Token { value, location }) => match value {
                TokenValue::Number(n) => Ok(Term::Value(n)),
                TokenValue::Identifier(name) => Ok(Term::Variable { name, location }),
                TokenValue::Operator(Operator::OpenParen) => {
                    let term = self.expression(mode)?;
                    match self.take_token()? {
                        Some(Token {
                            value: TokenValue::Operator(Operator::CloseParen),
                            ..
                        }) => Ok(term),
                        Some(token) => Err(Error {
                            cause: ErrorCause::UnexpectedToken,
                            location: token.location,
                        }),
                        None => Err(Error {
                            cause: ErrorCause::IncompleteExpression,
                            location: self.end_location(),
                        }),
                    }
                }
                TokenValue::Operator(_) => Err(Error {
                    cause: ErrorCause::UnexpectedToken,
                    location,
                }),
            },
        }
    }

    fn arith(
        &self,
        value: Option<i64>,
        location: &Range<usize>,
    ) -> Result<i64, Error<E::AssignError>> {
        value.ok_or_else(|| Error {
            cause: ErrorCause::Overflow,
            location: location.clone(),
        })
    }

    fn divide(
        &self,
        lhs: i64,
        rhs: i64,
        location: &Range<usize>,
    ) -> Result<i64, Error<E::AssignError>> {
        if rhs == 0 {
            return Err(Error {
                cause: ErrorCause::DivisionByZero,
                location: location.clone(),
            });
        }
        self.arith(lhs.checked_div(rhs), location)
    }

    fn remainder(
        &self,
        lhs: i64,
        rhs: i64,
        location: &Range<usize>,
    ) -> Result<i64, Error<E::AssignError>> {
        if rhs == 0 {
            return Err(Error {
                cause: ErrorCause::DivisionByZero,
                location: location.clone(),
            });
        }
        self.arith(lhs.checked_rem(rhs), location)
    }

    fn power(
        &self,
        base: i64,
        exponent: i64,
        location: &Range<usize>,
    ) -> Result<i64, Error<E::AssignError>> {
        if exponent < 0 {
            return Err(Error {
                cause: ErrorCause::NegativeExponent,
                location: location.clone(),
            });
        }
        let exponent = u32::try_from(exponent).map_err(|_| Error {
            cause: ErrorCause::Overflow,
            location: location.clone(),
        })?;
        self.arith(base.checked_pow(exponent), location)
    }
}

#[cfg(test)]
mod tests {
    use crate::eval;
    use crate::ErrorCause;
    use crate::Value::Integer;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn compute(source: &str) -> i64 {
        let mut env = HashMap::new();
        assert_matches!(eval(source, &mut env).unwrap(), Integer(i) => i)
    }

    #[test]
    fn precedence() {
        assert_eq!(compute("1+2*3"), 7);
        assert_eq!(compute("(1+2)*3"), 9);
        assert_eq!(compute("2**3**2"), 512);
        assert_eq!(compute("-2**2"), 4);
        assert_eq!(compute("1<<4|1"), 17);
        assert_eq!(compute("7%3+1"), 2);
        assert_eq!(compute("1+1==2"), 1);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(compute("!0"), 1);
        assert_eq!(compute("!7"), 0);
        assert_eq!(compute("~0"), -1);
        assert_eq!(compute("- -3"), 3);
    }

    #[test]
    fn short_circuit_skips_errors() {
        assert_eq!(compute("1 || 1/0"), 1);
        assert_eq!(compute("0 && 1/0"), 0);
        assert_eq!(compute("1 ? 2 : 1/0"), 2);
        assert_eq!(compute("0 ? 1/0 : 3"), 3);
    }

    #[test]
    fn division_by_zero() {
        let mut env = HashMap::new();
        let error = eval("1/0", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::DivisionByZero);
        assert_eq!(error.location, 1..2);
        let error = eval("1%0", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::DivisionByZero);
    }

    #[test]
    fn variables() {
        let mut env = HashMap::new();
        env.insert("x".to_string(), "5".to_string());
        assert_matches!(eval("x*2", &mut env), Ok(Integer(10)));
        // Unset variables evaluate to zero.
        assert_matches!(eval("y+1", &mut env), Ok(Integer(1)));
    }

    #[test]
    fn invalid_variable_value() {
        let mut env = HashMap::new();
        env.insert("x".to_string(), "oops".to_string());
        let error = eval("x", &mut env).unwrap_err();
        assert_matches!(error.cause, ErrorCause::InvalidVariableValue(v) if v == "oops");
    }

    #[test]
    fn assignment() {
        let mut env = HashMap::new();
        assert_matches!(eval("x = 2 + 3", &mut env), Ok(Integer(5)));
        assert_eq!(env["x"], "5");
        assert_matches!(eval("x += 10", &mut env), Ok(Integer(15)));
        assert_eq!(env["x"], "15");
        assert_matches!(eval("x <<= 2", &mut env), Ok(Integer(60)));
        assert_matches!(eval("x %= 7", &mut env), Ok(Integer(4)));
    }

    #[test]
    fn assignment_is_right_associative() {
        let mut env = HashMap::new();
        assert_matches!(eval("a = b = 3", &mut env), Ok(Integer(3)));
        assert_eq!(env["a"], "3");
        assert_eq!(env["b"], "3");
    }

    #[test]
    fn increment_and_decrement() {
        let mut env = HashMap::new();
        env.insert("i".to_string(), "5".to_string());
        assert_matches!(eval("i++", &mut env), Ok(Integer(5)));
        assert_eq!(env["i"], "6");
        assert_matches!(eval("++i", &mut env), Ok(Integer(7)));
        assert_eq!(env["i"], "7");
        assert_matches!(eval("i--", &mut env), Ok(Integer(7)));
        assert_matches!(eval("--i", &mut env), Ok(Integer(5)));
    }

    #[test]
    fn comma_evaluates_left_to_right() {
        let mut env = HashMap::new();
        assert_matches!(eval("x = 1, x + 9", &mut env), Ok(Integer(10)));
        assert_eq!(env["x"], "1");
    }

    #[test]
    fn ternary_chains() {
        assert_eq!(compute("0 ? 1 : 0 ? 2 : 3"), 3);
        assert_eq!(compute("1 ? 0 ? 4 : 5 : 6"), 5);
    }

    #[test]
    fn assignment_to_non_variable() {
        let mut env = HashMap::new();
        let error = eval("3 = 4", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::AssignmentToValue);
    }

    #[test]
    fn overflow() {
        let mut env = HashMap::new();
        let error = eval("9223372036854775807 + 1", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::Overflow);
        let error = eval("2 ** 9999", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::Overflow);
    }

    #[test]
    fn negative_exponent() {
        let mut env = HashMap::new();
        let error = eval("2 ** -1", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::NegativeExponent);
    }

    #[test]
    fn trailing_garbage() {
        let mut env = HashMap::new();
        let error = eval("1 2", &mut env).unwrap_err();
        assert_eq!(error.cause, ErrorCause::UnexpectedToken);
    }
}
