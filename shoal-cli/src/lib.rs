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

//! Command-line front end for the shell
//!
//! The [`main`] function builds the environment, parses the command line,
//! applies startup configuration, and enters the appropriate loop: the
//! [interactive driver](driver) or the non-interactive
//! [read-eval loop](shoal_semantics::runner) over a script, a command
//! string, or the standard input.

pub mod driver;
pub mod startup;

use shoal_env::option::{Option as ShellOption, State};
use shoal_env::semantics::ExitStatus;
use shoal_env::system::real::RealSystem;
use shoal_env::variable::Scope;
use shoal_env::Env;
use shoal_env::system::System;
use shoal_syntax::source::Source as SyntaxSource;
use startup::args::{parse, Parse, Run, Source};
use std::num::NonZeroU64;
use std::ops::ControlFlow::{Break, Continue};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version(env: &mut Env) -> ExitStatus {
    let text = format!("shoal {VERSION}\n");
    match env.system.write_all(shoal_syntax::syntax::Fd::STDOUT, text.as_bytes()) {
        Ok(_) => ExitStatus::SUCCESS,
        Err(_) => ExitStatus::FAILURE,
    }
}

fn print_help(env: &mut Env) -> ExitStatus {
    let text = "\
usage: shoal [options] [script [arguments...]]
       shoal -c command [name [arguments...]]

options:
  -c              run the command string given as the first operand
  -s              read commands from the standard input
  -i              be interactive
  -e, -u, -x, ... set the corresponding shell option
  -o NAME, +o NAME
                  enable or disable a long-named option
  --norc          do not read the initialization file
  --rcfile FILE   read FILE instead of ~/.shoalrc
  --posix         disable extensions that conflict with POSIX
  --debug-ast     print the syntax tree of parsed input
  --debug-tokens  print the token stream of the input
";
    match env.system.write_all(shoal_syntax::syntax::Fd::STDOUT, text.as_bytes()) {
        Ok(_) => ExitStatus::SUCCESS,
        Err(_) => ExitStatus::FAILURE,
    }
}

/// Prints the syntax trees or token streams of a source string.
fn debug_dump(env: &mut Env, run: &Run, code: &str) {
    use shoal_syntax::parser::lex::{Lexer, TokenId};
    use shoal_syntax::parser::Parser;

    if run.debug_tokens {
        let mut lexer = Lexer::from_memory(code, SyntaxSource::Unknown);
        let mut dump = String::new();
        loop {
            if lexer.skip_blanks_and_comment().is_err() {
                break;
            }
            match lexer.token() {
                Ok(token) => {
                    if token.id == TokenId::EndOfInput {
                        break;
                    }
                    dump.push_str(&format!("{:?} {:?}\n", token.id, token.to_string()));
                }
                Err(error) => {
                    dump.push_str(&format!("error: {error}\n"));
                    break;
                }
            }
        }
        env.system.print_error(&dump);
    }

    if run.debug_ast {
        let mut lexer = Lexer::from_memory(code, SyntaxSource::Unknown);
        let mut parser = Parser::new(&mut lexer);
        loop {
            match parser.command_line() {
                Ok(Some(list)) => {
                    let dump = format!("{list:#?}\n");
                    drop(parser);
                    env.system.print_error(&dump);
                    parser = Parser::new(&mut lexer);
                }
                Ok(None) => break,
                Err(error) => {
                    let dump = format!("error: {error}\n");
                    drop(parser);
                    env.system.print_error(&dump);
                    break;
                }
            }
        }
    }
}

/// Reads all of the standard input, for a non-interactive stdin shell.
fn read_stdin(env: &mut Env) -> String {
    let mut content = Vec::new();
    let mut buffer = [0; 4096];
    loop {
        match env.system.read(shoal_syntax::syntax::Fd::STDIN, &mut buffer) {
            Ok(0) => break,
            Ok(count) => content.extend_from_slice(&buffer[..count]),
            Err(shoal_env::system::Errno::EINTR) => {}
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&content).into_owned()
}

/// Appends the session's history to `$HISTFILE`.
fn append_history(env: &mut Env, history: &[String]) {
    if history.is_empty() {
        return;
    }
    let Some(path) = env.variables.get_scalar("HISTFILE") else {
        return;
    };
    let path = path.to_string();
    use std::io::Write as _;
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        for line in history {
            _ = writeln!(file, "{line}");
        }
    }
}

fn run_shell(env: &mut Env, run: Run) -> ExitStatus {
    startup::init_variables(env);
    startup::apply_options(env, &run.options);
    env.arg0 = run.arg0.clone();
    *env.variables.positional_params_mut() = run.positional_params.clone();

    if !env.is_interactive() && startup::auto_interactive(env, &run) {
        env.options.set(ShellOption::Interactive, State::On);
    }
    // Job control defaults to on in interactive shells unless the command
    // line said otherwise.
    let monitor_given = run
        .options
        .iter()
        .any(|&(option, _)| option == ShellOption::Monitor);
    if env.is_interactive() && !monitor_given {
        env.options.set(ShellOption::Monitor, State::On);
    }

    if env.is_interactive() {
        startup::init_interactive(env);
        if !run.norc {
            startup::run_rcfile(env, run.rcfile.as_deref());
        }
    }

    let flow = match &run.source {
        Source::String(command) => {
            debug_dump(env, &run, command);
            shoal_semantics::run_source(
                env,
                command,
                SyntaxSource::CommandString,
                NonZeroU64::new(1).unwrap(),
            )
        }
        Source::File { path } => match std::fs::read_to_string(path) {
            Ok(content) => {
                debug_dump(env, &run, &content);
                shoal_semantics::run_source(
                    env,
                    &content,
                    SyntaxSource::CommandFile { path: path.clone() },
                    NonZeroU64::new(1).unwrap(),
                )
            }
            Err(error) => {
                env.print_simple_error(format_args!("cannot read {path}: {error}"));
                return ExitStatus::NOT_FOUND;
            }
        },
        Source::Stdin => {
            if env.is_interactive() {
                let mut history = Vec::new();
                let status = driver::interactive_loop(env, &mut history);
                append_history(env, &history);
                env.exit_status = status;
                Continue(())
            } else {
                let content = read_stdin(env);
                debug_dump(env, &run, &content);
                shoal_semantics::run_source(
                    env,
                    &content,
                    SyntaxSource::Stdin,
                    NonZeroU64::new(1).unwrap(),
                )
            }
        }
    };

    let status = match flow {
        Continue(()) => env.exit_status,
        Break(divert) => divert.exit_status().unwrap_or(env.exit_status),
    };
    env.exit_status = status;
    status
}

/// Entry point of the shell.
pub fn main() -> ! {
    // SAFETY: this is the only RealSystem in the process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::with_system(Box::new(system));
    env.builtins = shoal_builtin::builtins();
    env.variables.extend_env(std::env::vars());
    // HOME from the environment is needed before any tilde expansion.
    if env.variables.get_scalar("HOME").is_none() {
        if let Some(home) = std::env::var_os("HOME") {
            _ = env.variables.assign_scalar(
                Scope::Global,
                "HOME",
                home.to_string_lossy().into_owned(),
            );
        }
    }

    let status = match parse(std::env::args()) {
        Ok(Parse::Help) => print_help(&mut env),
        Ok(Parse::Version) => print_version(&mut env),
        Ok(Parse::Run(run)) => {
            let status = run_shell(&mut env, *run);
            shoal_semantics::trap::run_exit_trap(&mut env);
            status
        }
        Err(error) => {
            env.print_simple_error(format_args!("{error}"));
            ExitStatus::ERROR
        }
    };
    std::process::exit(status.0)
}
