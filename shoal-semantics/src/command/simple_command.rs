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

//! Simple command execution
//!
//! A simple command expands its words, resolves the command name through
//! [command search](crate::command_search), and dispatches: built-ins and
//! functions run in the shell process, external utilities in a forked
//! child. Assignments persist in the shell when there is no command word
//! or the command is a special built-in; otherwise they are in effect only
//! for the single command.

use super::{reset_signals_in_child, run_foreground_child, with_frame, Execute};
use crate::command_search::{search, Target};
use crate::expansion::{self, expand_words};
use crate::handle::Handle;
use crate::redir::{apply_redirs, undo_redirs};
use crate::xtrace;
use shoal_env::function::Function;
use shoal_env::semantics::{Divert, ExitStatus, Field, Result};
use shoal_env::stack::Frame;
use shoal_env::system::{Errno, ForkResult, System};
use shoal_env::variable::{ContextKind, Scope, Value, Variable};
use shoal_env::Env;
use shoal_syntax::syntax::{Assign, FunctionDefinition, SimpleCommand};
use std::ffi::CString;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;

impl Execute for SimpleCommand {
    fn execute(&self, env: &mut Env) -> Result {
        crate::trap::run_debug_trap(env)?;

        let (fields, subst_status) = match expand_words(env, &self.words) {
            Ok(result) => result,
            Err(error) => return error.handle(env),
        };

        xtrace::trace_command(env, &self.assigns, &fields);

        if fields.is_empty() {
            return execute_assignments_only(env, self, subst_status);
        }

        match search(env, &fields[0].value) {
            Target::Builtin { builtin, is_special } => {
                execute_builtin(env, self, builtin, is_special, fields)
            }
            Target::Function(function) => execute_function(env, self, &function, fields),
            Target::External { path } => execute_external(env, self, path, fields),
            Target::NotFound => {
                env.print_simple_error(format_args!("{}: command not found", fields[0].value));
                env.exit_status = ExitStatus::NOT_FOUND;
                Continue(())
            }
        }
    }
}

/// Runs a simple command that has no command word.
///
/// Redirections are performed and undone; assignments persist in the
/// shell. The exit status is that of the last command substitution, or 0.
fn execute_assignments_only(
    env: &mut Env,
    command: &SimpleCommand,
    subst_status: Option<ExitStatus>,
) -> Result {
    let saved = match apply_redirs(env, &command.redirs) {
        Ok(saved) => saved,
        Err(error) => return error.handle(env),
    };
    let result = apply_assignments(env, &command.assigns, Scope::Global, false);
    undo_redirs(env, saved);
    match result {
        Ok(assign_status) => {
            env.exit_status = assign_status
                .or(subst_status)
                .unwrap_or(ExitStatus::SUCCESS);
            Continue(())
        }
        Err(error) => error.handle(env),
    }
}

/// Expands and applies assignments.
///
/// Returns the exit status of the last command substitution in the
/// assigned values, if any.
fn apply_assignments(
    env: &mut Env,
    assigns: &[Assign],
    scope: Scope,
    export: bool,
) -> std::result::Result<Option<ExitStatus>, expansion::Error> {
    let mut last_status = None;
    for assign in assigns {
        let status = match (&assign.index, &assign.value) {
            (None, shoal_syntax::syntax::Value::Scalar(word)) => {
                let (field, status) = expansion::expand_word(env, word)?;
                assign_variable(env, assign, scope, export, Value::Scalar(field.value))?;
                status
            }
            (None, shoal_syntax::syntax::Value::Array(words)) => {
                let (fields, status) = expand_words(env, words)?;
                let values = fields.into_iter().map(|f| f.value).collect();
                assign_variable(env, assign, scope, export, Value::Array(values))?;
                status
            }
            (Some(index), shoal_syntax::syntax::Value::Scalar(word)) => {
                let (field, status) = expansion::expand_word(env, word)?;
                assign_element(env, assign, index, scope, field.value)?;
                status
            }
            (Some(_), shoal_syntax::syntax::Value::Array(_)) => {
                // `a[i]=(...)` is not a meaningful assignment.
                return Err(expansion::Error {
                    cause: expansion::ErrorCause::NonassignableParameter {
                        name: assign.name.clone(),
                    },
                    location: assign.location.clone(),
                });
            }
        };
        if status.is_some() {
            last_status = status;
        }
    }
    Ok(last_status)
}

fn assign_variable(
    env: &mut Env,
    assign: &Assign,
    scope: Scope,
    export: bool,
    value: Value,
) -> std::result::Result<(), expansion::Error> {
    let variable = Variable {
        value: Some(value),
        is_exported: export,
        ..Variable::default()
    };
    env.variables
        .assign(scope, assign.name.clone(), variable)
        .map(drop)
        .map_err(|e| expansion::Error {
            cause: expansion::ErrorCause::AssignReadOnly(e),
            location: assign.location.clone(),
        })
}

/// Assigns one element of an array variable (`a[i]=v`).
fn assign_element(
    env: &mut Env,
    assign: &Assign,
    index: &shoal_syntax::syntax::Text,
    scope: Scope,
    value: String,
) -> std::result::Result<(), expansion::Error> {
    let (key, _) = expansion::expand_text(env, index)?;

    let read_only = env
        .variables
        .get(&assign.name)
        .is_some_and(|v| v.is_read_only());
    if read_only {
        let variable = env.variables.get(&assign.name).unwrap();
        return Err(expansion::Error {
            cause: expansion::ErrorCause::AssignReadOnly(shoal_env::variable::AssignError {
                name: assign.name.clone(),
                read_only_location: variable.read_only_location.clone().unwrap(),
            }),
            location: assign.location.clone(),
        });
    }

    let is_associative = env
        .variables
        .get(&assign.name)
        .is_some_and(|v| v.is_associative);
    let i = if is_associative {
        None
    } else {
        Some(
            crate::expansion::initial::param::eval_index(env, &key, &assign.location)?,
        )
    };

    let variable = env.variables.get_or_new(scope, &assign.name);
    match (&mut variable.value, i) {
        (value_slot @ None, Some(i)) => {
            let mut values = vec![String::new(); i + 1];
            values[i] = value;
            *value_slot = Some(Value::Array(values));
        }
        (value_slot @ None, None) => {
            let mut map = std::collections::HashMap::new();
            map.insert(key, value);
            *value_slot = Some(Value::Associative(map));
        }
        (Some(Value::Array(values)), Some(i)) => {
            if i >= values.len() {
                values.resize(i + 1, String::new());
            }
            values[i] = value;
        }
        (Some(Value::Associative(map)), _) => {
            map.insert(key, value);
        }
        (Some(Value::Scalar(_)), Some(0)) => {
            variable.value = Some(Value::Scalar(value));
        }
        (Some(Value::Scalar(s)), Some(i)) => {
            let mut values = vec![String::new(); i + 1];
            values[0] = s.clone();
            values[i] = value;
            variable.value = Some(Value::Array(values));
        }
        (Some(Value::Array(_)) | Some(Value::Scalar(_)), None) => unreachable!(),
    }
    Ok(())
}

/// Runs a built-in utility in the shell process.
fn execute_builtin(
    env: &mut Env,
    command: &SimpleCommand,
    builtin: shoal_env::builtin::Builtin,
    is_special: bool,
    fields: Vec<Field>,
) -> Result {
    let saved = match apply_redirs(env, &command.redirs) {
        Ok(saved) => saved,
        Err(error) => {
            let result = error.handle(env);
            // Redirection errors on a special built-in are fatal in a
            // non-interactive shell.
            if is_special && !env.is_interactive() {
                result?;
                return Break(Divert::Exit(Some(env.exit_status)));
            }
            return result;
        }
    };

    // Assignments on a special built-in persist; otherwise they last for
    // this command only.
    let temporary_context = !is_special && !command.assigns.is_empty();
    if temporary_context {
        env.variables.push_context(ContextKind::Regular, None);
    }
    let assign_result = apply_assignments(
        env,
        &command.assigns,
        if temporary_context {
            Scope::Local
        } else {
            Scope::Global
        },
        temporary_context,
    );

    let result = match assign_result {
        Err(error) => error.handle(env),
        Ok(_) => {
            let mut args = fields;
            args.remove(0);
            let result = (builtin.execute)(env, args);
            env.exit_status = result.exit_status;
            match result.divert {
                Continue(()) => Continue(()),
                Break(divert) => Break(divert),
            }
        }
    };

    if temporary_context {
        env.variables.pop_context();
    }
    undo_redirs(env, saved);
    result
}

/// Calls a function.
fn execute_function(
    env: &mut Env,
    command: &SimpleCommand,
    function: &Rc<Function>,
    fields: Vec<Field>,
) -> Result {
    let saved = match apply_redirs(env, &command.redirs) {
        Ok(saved) => saved,
        Err(error) => return error.handle(env),
    };

    let mut args: Vec<String> = fields.into_iter().map(|f| f.value).collect();
    let name = args.remove(0);
    env.variables
        .push_context(ContextKind::Function, Some(args));

    let assign_result = apply_assignments(env, &command.assigns, Scope::Local, true);
    let result = match assign_result {
        Err(error) => error.handle(env),
        Ok(_) => {
            let body = Rc::clone(&function.body);
            let result = with_frame(env, Frame::Function { name }, |env| body.execute(env));
            match result {
                Break(Divert::Return(status)) => {
                    if let Some(status) = status {
                        env.exit_status = status;
                    }
                    Continue(())
                }
                other => other,
            }
        }
    };

    env.variables.pop_context();
    undo_redirs(env, saved);
    crate::trap::run_return_trap(env)?;
    result
}

/// Runs an external utility in a forked child.
fn execute_external(
    env: &mut Env,
    command: &SimpleCommand,
    path: CString,
    fields: Vec<Field>,
) -> Result {
    let name = fields[0].value.clone();
    match env.system.fork() {
        Err(errno) => {
            env.print_simple_error(format_args!("cannot fork: {errno}"));
            env.exit_status = ExitStatus::FAILURE;
            Continue(())
        }
        Ok(ForkResult::Parent { child }) => {
            let display = command.to_string();
            let status = run_foreground_child(env, child, display);
            env.exit_status = status;
            Continue(())
        }
        Ok(ForkResult::Child) => {
            if env.controls_jobs() {
                let pid = env.system.getpid();
                _ = env.system.setpgid(pid, pid);
            }
            reset_signals_in_child(env);
            if apply_redirs(env, &command.redirs).is_err() {
                env.system.exit_process(ExitStatus::FAILURE.0)
            }
            if apply_assignments(env, &command.assigns, Scope::Global, true).is_err() {
                env.system.exit_process(ExitStatus::FAILURE.0)
            }

            let args: Vec<CString> = std::iter::once(name.clone())
                .chain(fields.into_iter().skip(1).map(|f| f.value))
                .filter_map(|value| CString::new(value).ok())
                .collect();
            let envs = env.variables.env_c_strings();
            let error = match env.system.execve(&path, &args, &envs) {
                Err(errno) => errno,
                Ok(never) => match never {},
            };
            let status = match error {
                Errno::ENOENT | Errno::ENOTDIR => ExitStatus::NOT_FOUND,
                _ => ExitStatus::NOEXEC,
            };
            let message = format!("shoal: {name}: cannot execute: {error}\n");
            env.system.print_error(&message);
            env.system.exit_process(status.0)
        }
    }
}

impl Execute for FunctionDefinition {
    fn execute(&self, env: &mut Env) -> Result {
        let name = match self.name.to_string_if_literal() {
            Some(name) => name,
            None => match expansion::expand_word(env, &self.name) {
                Ok((field, _)) => field.value,
                Err(error) => return error.handle(env),
            },
        };
        let function = Function::new(name, Rc::clone(&self.body), self.name.location.clone());
        match env.functions.define(function) {
            Ok(()) => {
                env.exit_status = ExitStatus::SUCCESS;
            }
            Err(error) => {
                env.print_simple_error(format_args!("{error}"));
                env.exit_status = ExitStatus::FAILURE;
            }
        }
        Continue(())
    }
}
