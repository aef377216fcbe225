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

//! Compound command execution

use super::{run_foreground_child, with_frame, Execute};
use crate::expansion::{self, expand_word, expand_words};
use crate::handle::Handle;
use crate::redir::{apply_redirs, undo_redirs};
use shoal_env::semantics::{Divert, ExitStatus, Result};
use shoal_env::stack::Frame;
use shoal_env::variable::Scope;
use shoal_env::Env;
use shoal_env::system::System;
use shoal_fnmatch::{Config, Pattern};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{
    CaseContinuation, CaseItem, CompoundCommand, FullCompoundCommand, List, TestBinaryOp,
    TestExpr, TestUnaryOp, Text, Word,
};
use std::ffi::CString;
use std::ops::ControlFlow::{Break, Continue};

impl Execute for FullCompoundCommand {
    fn execute(&self, env: &mut Env) -> Result {
        let saved = match apply_redirs(env, &self.redirs) {
            Ok(saved) => saved,
            Err(error) => return error.handle(env),
        };
        let result = self.command.execute(env);
        undo_redirs(env, saved);
        result
    }
}

impl Execute for CompoundCommand {
    fn execute(&self, env: &mut Env) -> Result {
        use CompoundCommand::*;
        match self {
            Grouping(body) => body.execute(env),
            Subshell(body) => execute_subshell(env, body),
            For { name, values, body } => execute_for(env, name, values.as_deref(), body),
            CStyleFor {
                init,
                condition,
                update,
                body,
            } => execute_c_style_for(
                env,
                init.as_ref(),
                condition.as_ref(),
                update.as_ref(),
                body,
            ),
            While { condition, body } => execute_loop(env, condition, body, false),
            Until { condition, body } => execute_loop(env, condition, body, true),
            If {
                condition,
                body,
                elifs,
                r#else,
            } => execute_if(env, condition, body, elifs, r#else.as_ref()),
            Case { subject, items } => execute_case(env, subject, items),
            Select { name, values, body } => execute_select(env, name, values.as_deref(), body),
            Arithmetic { expr, location } => execute_arithmetic(env, expr, location),
            DoubleBracket { expr, location } => execute_double_bracket(env, expr, location),
        }
    }
}

fn execute_subshell(env: &mut Env, body: &List) -> Result {
    let body = body.clone();
    let display = format!("({body})");
    let child = crate::subshell::start_subshell(env, move |env| {
        _ = body.execute(env);
    });
    match child {
        Ok(pid) => {
            env.exit_status = run_foreground_child(env, pid, display);
            Continue(())
        }
        Err(errno) => {
            env.print_simple_error(format_args!("cannot fork: {errno}"));
            env.exit_status = ExitStatus::FAILURE;
            Continue(())
        }
    }
}

/// Runs one iteration of a loop body, translating `break` and `continue`.
///
/// Returns `Break(flow)` to leave the whole loop, propagating outer-level
/// diverts as needed.
enum LoopFlow {
    NextIteration,
    ExitLoop,
    Propagate(Divert),
}

fn run_loop_body(env: &mut Env, body: &List) -> LoopFlow {
    match with_frame(env, Frame::Loop, |env| body.execute(env)) {
        Continue(()) => LoopFlow::NextIteration,
        Break(Divert::Break { count: 0 }) => LoopFlow::ExitLoop,
        Break(Divert::Break { count }) => LoopFlow::Propagate(Divert::Break { count: count - 1 }),
        Break(Divert::Continue { count: 0 }) => LoopFlow::NextIteration,
        Break(Divert::Continue { count }) => {
            LoopFlow::Propagate(Divert::Continue { count: count - 1 })
        }
        Break(other) => LoopFlow::Propagate(other),
    }
}

fn execute_for(env: &mut Env, name: &Word, values: Option<&[Word]>, body: &List) -> Result {
    let name = match name.to_string_if_literal() {
        Some(name) => name,
        None => match expand_word(env, name) {
            Ok((field, _)) => field.value,
            Err(error) => return error.handle(env),
        },
    };

    let values: Vec<String> = match values {
        Some(words) => match expand_words(env, words) {
            Ok((fields, _)) => fields.into_iter().map(|f| f.value).collect(),
            Err(error) => return error.handle(env),
        },
        None => env.variables.positional_params().to_vec(),
    };

    if values.is_empty() {
        env.exit_status = ExitStatus::SUCCESS;
        return Continue(());
    }

    for value in values {
        if let Err(error) = env.variables.assign_scalar(Scope::Global, name.clone(), value) {
            env.print_simple_error(format_args!("{error}"));
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
        match run_loop_body(env, body) {
            LoopFlow::NextIteration => {}
            LoopFlow::ExitLoop => break,
            LoopFlow::Propagate(divert) => return Break(divert),
        }
    }
    Continue(())
}

fn execute_c_style_for(
    env: &mut Env,
    init: Option<&Text>,
    condition: Option<&Text>,
    update: Option<&Text>,
    body: &List,
) -> Result {
    if let Some(init) = init {
        eval_section(env, init)?;
    }
    loop {
        if let Some(condition) = condition {
            let value = with_frame(env, Frame::Condition, |env| eval_section(env, condition))?;
            if value == 0 {
                break;
            }
        }
        match run_loop_body(env, body) {
            LoopFlow::NextIteration => {}
            LoopFlow::ExitLoop => break,
            LoopFlow::Propagate(divert) => return Break(divert),
        }
        if let Some(update) = update {
            eval_section(env, update)?;
        }
    }
    Continue(())
}

/// Evaluates one header section of a C-style for loop.
///
/// An arithmetic error aborts the whole command.
fn eval_section(env: &mut Env, text: &Text) -> Result<i64> {
    match eval_arith_text(env, text) {
        Ok(value) => Continue(value),
        Err(error) => {
            let _ = error.handle(env);
            Break(Divert::Interrupt(Some(ExitStatus::ERROR)))
        }
    }
}

/// Expands and evaluates an arithmetic text.
fn eval_arith_text(env: &mut Env, text: &Text) -> std::result::Result<i64, expansion::Error> {
    let (expression, _) = expansion::expand_text(env, text)?;
    let location = Location::dummy(expression.clone());
    crate::expansion::initial::eval_in_env(env, &expression, &location)
}

fn execute_loop(env: &mut Env, condition: &List, body: &List, until: bool) -> Result {
    let mut status = ExitStatus::SUCCESS;
    loop {
        with_frame(env, Frame::Condition, |env| condition.execute(env))?;
        let run_body = env.exit_status.is_successful() != until;
        if !run_body {
            break;
        }
        match run_loop_body(env, body) {
            LoopFlow::NextIteration => {}
            LoopFlow::ExitLoop => {
                status = env.exit_status;
                break;
            }
            LoopFlow::Propagate(divert) => return Break(divert),
        }
        status = env.exit_status;
    }
    env.exit_status = status;
    Continue(())
}

fn execute_if(
    env: &mut Env,
    condition: &List,
    body: &List,
    elifs: &[shoal_syntax::syntax::ElifThen],
    r#else: Option<&List>,
) -> Result {
    with_frame(env, Frame::Condition, |env| condition.execute(env))?;
    if env.exit_status.is_successful() {
        return body.execute(env);
    }
    for elif in elifs {
        with_frame(env, Frame::Condition, |env| elif.condition.execute(env))?;
        if env.exit_status.is_successful() {
            return elif.body.execute(env);
        }
    }
    match r#else {
        Some(r#else) => r#else.execute(env),
        None => {
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
    }
}

/// Compiles a case pattern or `[[ ]]` pattern operand.
fn compile_word_pattern(
    env: &mut Env,
    word: &Word,
) -> std::result::Result<Option<Pattern>, expansion::Error> {
    use crate::expansion::attr::to_pattern_chars;
    use crate::expansion::initial::{Expand, ExpandContext};

    let mut cx = ExpandContext::new_single(env);
    let phrase = word.expand(&mut cx)?;
    let chars: Vec<_> = phrase.into_full().into_iter().flatten().collect();
    Ok(Pattern::parse_with_config(to_pattern_chars(&chars), Config::full_match()).ok())
}

fn execute_case(env: &mut Env, subject: &Word, items: &[CaseItem]) -> Result {
    let (subject, _) = match expand_word(env, subject) {
        Ok(subject) => subject,
        Err(error) => return error.handle(env),
    };

    env.exit_status = ExitStatus::SUCCESS;
    let mut fall_through = false;
    for item in items {
        let matched = fall_through
            || item_matches(env, item, &subject.value)?;
        if !matched {
            continue;
        }

        item.body.execute(env)?;
        match item.continuation {
            CaseContinuation::Break => return Continue(()),
            CaseContinuation::FallThrough => {
                fall_through = true;
            }
            CaseContinuation::Continue => {
                fall_through = false;
            }
        }
    }
    Continue(())
}

fn item_matches(env: &mut Env, item: &CaseItem, subject: &str) -> Result<bool> {
    for pattern_word in &item.patterns {
        match compile_word_pattern(env, pattern_word) {
            Ok(Some(pattern)) => {
                if pattern.is_match(subject) {
                    return Continue(true);
                }
            }
            Ok(None) => {}
            Err(error) => {
                error.handle(env)?;
                return Continue(false);
            }
        }
    }
    Continue(false)
}

fn execute_select(env: &mut Env, name: &Word, values: Option<&[Word]>, body: &List) -> Result {
    let name = match name.to_string_if_literal() {
        Some(name) => name,
        None => return Continue(()),
    };
    let values: Vec<String> = match values {
        Some(words) => match expand_words(env, words) {
            Ok((fields, _)) => fields.into_iter().map(|f| f.value).collect(),
            Err(error) => return error.handle(env),
        },
        None => env.variables.positional_params().to_vec(),
    };
    if values.is_empty() {
        env.exit_status = ExitStatus::SUCCESS;
        return Continue(());
    }

    loop {
        // Menu and prompt go to the standard error.
        let mut menu = String::new();
        for (i, value) in values.iter().enumerate() {
            menu.push_str(&format!("{}) {}\n", i + 1, value));
        }
        let ps3 = env
            .variables
            .get_scalar("PS3")
            .unwrap_or("#? ")
            .to_string();
        env.system.print_error(&menu);
        env.system.print_error(&ps3);

        let Some(line) = read_line(env) else {
            // End of input leaves the loop.
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        };
        let reply = line.trim().to_string();
        _ = env
            .variables
            .assign_scalar(Scope::Global, "REPLY", reply.clone());

        let chosen = reply
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| values.get(i))
            .cloned()
            .unwrap_or_default();
        if env
            .variables
            .assign_scalar(Scope::Global, name.clone(), chosen)
            .is_err()
        {
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }

        match run_loop_body(env, body) {
            LoopFlow::NextIteration => {}
            LoopFlow::ExitLoop => return Continue(()),
            LoopFlow::Propagate(divert) => return Break(divert),
        }
    }
}

/// Reads one line from the standard input, byte by byte.
fn read_line(env: &mut Env) -> Option<String> {
    let mut line = Vec::new();
    loop {
        let mut byte = [0; 1];
        match env.system.read(shoal_syntax::syntax::Fd::STDIN, &mut byte) {
            Ok(0) => {
                if line.is_empty() {
                    return None;
                }
                break;
            }
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
            }
            Err(shoal_env::system::Errno::EINTR) => {}
            Err(_) => return None,
        }
    }
    Some(String::from_utf8_lossy(&line).into_owned())
}

fn execute_arithmetic(env: &mut Env, expr: &Text, location: &Location) -> Result {
    match expansion::expand_text(env, expr) {
        Ok((expression, _)) => {
            match crate::expansion::initial::eval_in_env(env, &expression, location) {
                Ok(value) => {
                    env.exit_status = if value != 0 {
                        ExitStatus::SUCCESS
                    } else {
                        ExitStatus::FAILURE
                    };
                    Continue(())
                }
                Err(error) => error.handle(env),
            }
        }
        Err(error) => error.handle(env),
    }
}

fn execute_double_bracket(env: &mut Env, expr: &TestExpr, location: &Location) -> Result {
    match eval_test(env, expr, location) {
        Ok(value) => {
            env.exit_status = if value {
                ExitStatus::SUCCESS
            } else {
                ExitStatus::FAILURE
            };
            Continue(())
        }
        Err(error) => error.handle(env),
    }
}

fn eval_test(
    env: &mut Env,
    expr: &TestExpr,
    location: &Location,
) -> std::result::Result<bool, expansion::Error> {
    use TestExpr::*;
    match expr {
        Str(word) => {
            let (field, _) = expand_word(env, word)?;
            Ok(!field.value.is_empty())
        }
        Not(inner) => Ok(!eval_test(env, inner, location)?),
        And(lhs, rhs) => Ok(eval_test(env, lhs, location)? && eval_test(env, rhs, location)?),
        Or(lhs, rhs) => Ok(eval_test(env, lhs, location)? || eval_test(env, rhs, location)?),
        Paren(inner) => eval_test(env, inner, location),
        Unary(op, word) => {
            let (field, _) = expand_word(env, word)?;
            eval_unary_test(env, *op, &field.value)
        }
        Binary(op, lhs, rhs) => {
            use TestBinaryOp::*;
            let (left, _) = expand_word(env, lhs)?;
            match op {
                Match | NoMatch => {
                    let matched = match compile_word_pattern(env, rhs)? {
                        Some(pattern) => pattern.is_match(&left.value),
                        None => false,
                    };
                    Ok(matched == (*op == Match))
                }
                StringLess => {
                    let (right, _) = expand_word(env, rhs)?;
                    Ok(left.value < right.value)
                }
                StringGreater => {
                    let (right, _) = expand_word(env, rhs)?;
                    Ok(left.value > right.value)
                }
                Eq | Ne | Lt | Le | Gt | Ge => {
                    let (right, _) = expand_word(env, rhs)?;
                    let l = crate::expansion::initial::eval_in_env(env, &left.value, location)?;
                    let r = crate::expansion::initial::eval_in_env(env, &right.value, location)?;
                    Ok(match op {
                        Eq => l == r,
                        Ne => l != r,
                        Lt => l < r,
                        Le => l <= r,
                        Gt => l > r,
                        Ge => l >= r,
                        _ => unreachable!(),
                    })
                }
            }
        }
    }
}

fn eval_unary_test(
    env: &mut Env,
    op: TestUnaryOp,
    operand: &str,
) -> std::result::Result<bool, expansion::Error> {
    use TestUnaryOp::*;
    match op {
        NonEmpty => return Ok(!operand.is_empty()),
        Empty => return Ok(operand.is_empty()),
        _ => {}
    }
    let Ok(path) = CString::new(operand) else {
        return Ok(false);
    };
    Ok(match op {
        Exists => env.system.file_exists(&path),
        IsFile => env.system.is_regular_file(&path),
        IsDir => env.system.is_directory(&path),
        Readable => env.system.is_readable(&path),
        Writable => env.system.is_writable(&path),
        Executable => env.system.is_executable_file(&path),
        NonEmptyFile => env.system.file_size(&path).is_some_and(|size| size > 0),
        NonEmpty | Empty => unreachable!(),
    })
}
