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

//! Command execution
//!
//! The [`Execute`] trait walks the syntax tree. Each node type has one
//! implementation; non-local control flow (`break`, `return`, `exit`)
//! travels up as `ControlFlow::Break` values. The exit status of the last
//! completed command lives in the environment.

mod compound_command;
mod simple_command;

use crate::job;
use shoal_env::job::{Job, JobSet, Pid, Process, ProcessState};
use shoal_env::option::{Option as ShellOption, State};
use shoal_env::semantics::{Divert, ExitStatus, Result};
use shoal_env::signal::Signal;
use shoal_env::stack::Frame;
use shoal_env::system::{ForkResult, SignalHandling, System};
use shoal_env::Env;
use shoal_syntax::syntax::{AndOr, AndOrList, Command, Fd, Item, List, Pipeline};
use std::ops::ControlFlow::{Break, Continue};

/// Syntactic constructs that can be executed
pub trait Execute {
    /// Executes `self`, leaving the exit status in the environment.
    fn execute(&self, env: &mut Env) -> Result;
}

/// Runs a function with a frame pushed on the execution stack.
pub(crate) fn with_frame<T>(
    env: &mut Env,
    frame: Frame,
    f: impl FnOnce(&mut Env) -> T,
) -> T {
    env.stack.push(frame);
    let result = f(env);
    env.stack.pop();
    result
}

impl Execute for List {
    fn execute(&self, env: &mut Env) -> Result {
        for item in &self.0 {
            item.execute(env)?;
            crate::trap::run_pending_traps(env)?;
            errexit(env)?;
        }
        Continue(())
    }
}

/// Runs the `ERR` trap and enforces the `errexit` option against the
/// current exit status.
fn errexit(env: &mut Env) -> Result {
    if env.exit_status.is_successful() || env.stack.in_condition() {
        return Continue(());
    }
    crate::trap::run_err_trap(env)?;
    if env.options.get(ShellOption::ErrExit) == State::On {
        Break(Divert::Exit(Some(env.exit_status)))
    } else {
        Continue(())
    }
}

impl Execute for Item {
    fn execute(&self, env: &mut Env) -> Result {
        match &self.async_flag {
            None => self.and_or.execute(env),
            Some(_) => start_async(env, &self.and_or),
        }
    }
}

/// Starts an and-or list as an asynchronous job.
fn start_async(env: &mut Env, and_or: &AndOrList) -> Result {
    let name = and_or.to_string();
    let job_controlled = env.controls_jobs();
    let list = and_or.clone();
    let child = crate::subshell::start_subshell(env, move |env| {
        if job_controlled {
            let pid = env.system.getpid();
            _ = env.system.setpgid(pid, pid);
        } else {
            // Without job control, an asynchronous command must not be
            // killed by the keyboard.
            _ = env.system.sigaction(Signal::SIGINT, SignalHandling::Ignore);
            _ = env.system.sigaction(Signal::SIGQUIT, SignalHandling::Ignore);
        }
        _ = list.execute(env);
    });
    match child {
        Ok(pid) => {
            if job_controlled {
                _ = env.system.setpgid(pid, pid);
            }
            let mut job = Job::new(pid, name);
            job.job_controlled = job_controlled;
            let index = env.jobs.add(job);
            env.jobs.set_last_async_pid(pid);
            if env.is_interactive() {
                let line = format!("[{}] {}\n", index + 1, pid);
                env.system.print_error(&line);
            }
            env.exit_status = ExitStatus::SUCCESS;
        }
        Err(errno) => {
            env.print_simple_error(format_args!("cannot start background job: {errno}"));
            env.exit_status = ExitStatus::FAILURE;
        }
    }
    Continue(())
}

impl Execute for AndOrList {
    fn execute(&self, env: &mut Env) -> Result {
        let in_chain = !self.rest.is_empty();
        if in_chain {
            with_frame(env, Frame::Condition, |env| self.first.execute(env))?;
        } else {
            self.first.execute(env)?;
        }

        for (i, (op, pipeline)) in self.rest.iter().enumerate() {
            let run = match op {
                AndOr::AndThen => env.exit_status.is_successful(),
                AndOr::OrElse => !env.exit_status.is_successful(),
            };
            if !run {
                continue;
            }
            let last = i + 1 == self.rest.len();
            if last {
                pipeline.execute(env)?;
            } else {
                with_frame(env, Frame::Condition, |env| pipeline.execute(env))?;
            }
        }
        Continue(())
    }
}

impl Execute for Pipeline {
    fn execute(&self, env: &mut Env) -> Result {
        if self.negation {
            with_frame(env, Frame::Condition, |env| {
                run_pipeline_commands(env, self)
            })?;
            env.exit_status = if env.exit_status.is_successful() {
                ExitStatus::FAILURE
            } else {
                ExitStatus::SUCCESS
            };
            Continue(())
        } else {
            run_pipeline_commands(env, self)
        }
    }
}

fn run_pipeline_commands(env: &mut Env, pipeline: &Pipeline) -> Result {
    let result = match pipeline.commands.as_slice() {
        [] => Continue(()),
        [command] => command.execute(env),
        commands => run_multi_stage(env, commands, pipeline),
    };
    // Descriptors opened for process substitutions in this pipeline are no
    // longer needed once it completes.
    for fd in std::mem::take(&mut env.pending_substitution_fds) {
        _ = env.system.close(fd);
    }
    result
}

/// Resets the dispositions the shell has customized, for use in children.
pub(crate) fn reset_signals_in_child(env: &mut Env) {
    env.traps.disable_internal_handlers(&mut *env.system);
}

/// Executes a multi-command pipeline.
///
/// All children are forked before any wait. With job control active, the
/// children share a new process group led by the first child, which owns
/// the terminal until the pipeline finishes.
fn run_multi_stage(env: &mut Env, commands: &[Command], pipeline: &Pipeline) -> Result {
    let n = commands.len();
    let mut pipes: Vec<(Fd, Fd)> = Vec::with_capacity(n - 1);
    for _ in 1..n {
        match env.system.pipe() {
            Ok(pipe) => pipes.push(pipe),
            Err(errno) => {
                for (r, w) in pipes {
                    _ = env.system.close(r);
                    _ = env.system.close(w);
                }
                env.print_simple_error(format_args!("cannot create pipe: {errno}"));
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        }
    }

    let job_controlled = env.controls_jobs();
    let mut pgid: Option<Pid> = None;
    let mut processes = Vec::new();

    for (i, command) in commands.iter().enumerate() {
        match env.system.fork() {
            Err(errno) => {
                env.print_simple_error(format_args!("cannot fork: {errno}"));
                break;
            }
            Ok(ForkResult::Child) => {
                if job_controlled {
                    let pid = env.system.getpid();
                    _ = env.system.setpgid(pid, pgid.unwrap_or(pid));
                }
                reset_signals_in_child(env);
                if i > 0 {
                    _ = env.system.dup2(pipes[i - 1].0, Fd::STDIN);
                }
                if i < n - 1 {
                    _ = env.system.dup2(pipes[i].1, Fd::STDOUT);
                    if pipeline.pipe_stderr {
                        _ = env.system.dup2(pipes[i].1, Fd::STDERR);
                    }
                }
                for (r, w) in &pipes {
                    _ = env.system.close(*r);
                    _ = env.system.close(*w);
                }
                env.jobs = JobSet::new();
                env.stack.push(Frame::Subshell);
                env.traps.enter_subshell(&mut *env.system);
                let result = command.execute(env);
                let status = match result {
                    Continue(()) => env.exit_status,
                    Break(divert) => divert.exit_status().unwrap_or(env.exit_status),
                };
                env.system.exit_process(status.0)
            }
            Ok(ForkResult::Parent { child }) => {
                let lead = *pgid.get_or_insert(child);
                if job_controlled {
                    _ = env.system.setpgid(child, lead);
                }
                processes.push(Process {
                    pid: child,
                    name: command.to_string(),
                    state: ProcessState::Running,
                });
            }
        }
    }

    for (r, w) in pipes {
        _ = env.system.close(r);
        _ = env.system.close(w);
    }

    let Some(pgid) = pgid else {
        env.exit_status = ExitStatus::FAILURE;
        return Continue(());
    };

    let job = Job {
        pgid,
        job_controlled,
        name: pipeline.to_string(),
        processes,
        state_reported: false,
    };
    let index = env.jobs.add(job);
    job::give_terminal_to(env, pgid);
    let status = job::wait_for_job(env, index);
    job::reclaim_terminal(env);
    env.exit_status = status;
    Continue(())
}

impl Execute for Command {
    fn execute(&self, env: &mut Env) -> Result {
        match self {
            Command::Simple(command) => command.execute(env),
            Command::Compound(command) => command.execute(env),
            Command::Function(command) => command.execute(env),
        }
    }
}

/// Runs an already-forked foreground child to completion as a job.
pub(crate) fn run_foreground_child(env: &mut Env, pid: Pid, name: String) -> ExitStatus {
    let job_controlled = env.controls_jobs();
    if job_controlled {
        _ = env.system.setpgid(pid, pid);
    }
    let mut job = Job::new(pid, name);
    job.job_controlled = job_controlled;
    let index = env.jobs.add(job);
    if job_controlled {
        job::give_terminal_to(env, pid);
    }
    let status = job::wait_for_job(env, index);
    job::reclaim_terminal(env);
    status
}
