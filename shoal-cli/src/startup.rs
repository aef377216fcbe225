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

//! Shell startup: environment initialization and the rcfile

pub mod args;

use shoal_env::option::{Option as ShellOption, State};
use shoal_env::signal::Signal;
use shoal_env::system::SignalHandling;
use shoal_env::system::System;
use shoal_env::variable::Scope;
use shoal_env::Env;
use shoal_syntax::syntax::Fd;

/// Decides whether the shell is implicitly interactive.
///
/// Per POSIX, a shell without operands whose standard input and error are
/// terminals is interactive.
pub fn auto_interactive(env: &Env, run: &args::Run) -> bool {
    if run.source != args::Source::Stdin {
        return false;
    }
    if !run.positional_params.is_empty() {
        return false;
    }
    env.system.isatty(Fd::STDIN) && env.system.isatty(Fd::STDERR)
}

/// Sets the variables the shell provides or refreshes at startup.
pub fn init_variables(env: &mut Env) {
    let defaults: &[(&str, &str)] = &[
        ("IFS", " \t\n"),
        ("PS1", "$ "),
        ("PS2", "> "),
        ("PS4", "+ "),
        ("PATH", "/usr/local/bin:/usr/bin:/bin"),
    ];
    for &(name, value) in defaults {
        if env.variables.get_scalar(name).is_none() {
            _ = env.variables.assign_scalar(Scope::Global, name, value);
        }
    }

    if let Ok(pwd) = env.system.getcwd() {
        _ = env
            .variables
            .assign_scalar(Scope::Global, "PWD", pwd.display().to_string());
    }

    let shlvl = env
        .variables
        .get_scalar("SHLVL")
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(0)
        + 1;
    let mut variable = shoal_env::variable::Variable::new_scalar(shlvl.to_string());
    variable.is_exported = true;
    _ = env
        .variables
        .assign(Scope::Global, "SHLVL".to_string(), variable);
}

/// Configures signal dispositions and process-group state for an
/// interactive shell.
///
/// The shell must survive the keyboard signals that kill its jobs, and
/// with job control it runs in its own process group owning the terminal.
pub fn init_interactive(env: &mut Env) {
    _ = env
        .traps
        .enable_internal_handler(&mut *env.system, Signal::SIGINT, SignalHandling::Catch);
    _ = env
        .traps
        .enable_internal_handler(&mut *env.system, Signal::SIGQUIT, SignalHandling::Ignore);
    _ = env
        .traps
        .enable_internal_handler(&mut *env.system, Signal::SIGCHLD, SignalHandling::Catch);

    if env.controls_jobs() {
        for signal in [Signal::SIGTSTP, Signal::SIGTTIN, Signal::SIGTTOU] {
            _ = env
                .traps
                .enable_internal_handler(&mut *env.system, signal, SignalHandling::Ignore);
        }
        let pid = env.system.getpid();
        _ = env.system.setpgid(pid, pid);
        _ = env.system.tcsetpgrp(Fd::STDIN, pid);
    }
}

/// Runs the initialization file of an interactive shell.
pub fn run_rcfile(env: &mut Env, rcfile: Option<&str>) {
    let path = match rcfile {
        Some(path) => path.to_string(),
        None => {
            let Some(home) = env.variables.get_scalar("HOME") else {
                return;
            };
            format!("{home}/.shoalrc")
        }
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    _ = shoal_semantics::run_source(
        env,
        &content,
        shoal_syntax::source::Source::InitFile { path },
        std::num::NonZeroU64::new(1).unwrap(),
    );
}

/// Applies the option settings given on the command line.
pub fn apply_options(env: &mut Env, options: &[(ShellOption, State)]) {
    for &(option, state) in options {
        env.options.set(option, state);
    }
}
