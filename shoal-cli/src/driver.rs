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

//! The interactive driver
//!
//! The driver reads physical lines, accumulating them in a buffer that is
//! re-parsed as a whole after every line. When the parser reports that
//! more input could complete the command (an open quote, substitution,
//! compound command, or here-document), the driver prompts with `PS2` and
//! appends another line; otherwise the line is executed or its syntax
//! error is reported. Job state changes are reported before each `PS1`
//! prompt.

use shoal_env::semantics::{Divert, ExitStatus, Result as ExecResult};
use shoal_env::system::Errno;
use shoal_env::system::System;
use shoal_env::Env;
use shoal_semantics::Execute;
use shoal_syntax::parser::lex::Lexer;
use shoal_syntax::parser::Parser;
use shoal_syntax::source::Source;
use shoal_syntax::syntax::Fd;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;

/// What reading one physical line produced
enum Line {
    /// A line, including its trailing newline
    Text(String),
    /// End of input
    Eof,
    /// The read was interrupted by a signal
    Interrupted,
}

/// Reads one line from the standard input, byte by byte.
fn read_line(env: &mut Env) -> Line {
    let mut line = Vec::new();
    loop {
        let mut byte = [0; 1];
        match env.system.read(Fd::STDIN, &mut byte) {
            Ok(0) => {
                if line.is_empty() {
                    return Line::Eof;
                }
                line.push(b'\n');
                break;
            }
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(Errno::EINTR) => return Line::Interrupted,
            Err(_) => return Line::Eof,
        }
    }
    Line::Text(String::from_utf8_lossy(&line).into_owned())
}

fn prompt(env: &mut Env, name: &str, fallback: &str) {
    let text = env
        .variables
        .get_scalar(name)
        .unwrap_or(fallback)
        .to_string();
    env.system.print_error(&text);
}

/// Outcome of parsing the accumulated buffer
enum Outcome {
    /// A command line was parsed and executed.
    Executed(ExecResult),
    /// The buffer held nothing to execute.
    Empty,
    /// More input could complete the command.
    NeedMore,
}

/// Parses the whole accumulated buffer and executes its command line.
fn parse_and_execute(env: &mut Env, buffer: &str) -> Outcome {
    let mut lexer = Lexer::from_memory(buffer, Source::Stdin);
    let aliases = Rc::clone(&env.aliases);
    let mut parser = Parser::config().aliases(&*aliases).input(&mut lexer);
    let parsed = parser.command_line();
    drop(parser);

    match parsed {
        Ok(Some(list)) => Outcome::Executed(list.execute(env)),
        Ok(None) => Outcome::Empty,
        Err(error) if error.needs_more_input() => Outcome::NeedMore,
        Err(error) => {
            env.print_error(&error);
            env.exit_status = ExitStatus::ERROR;
            Outcome::Executed(Continue(()))
        }
    }
}

/// Reports the syntax error in a buffer that can no longer be completed.
fn report_parse_error(env: &mut Env, buffer: &str) {
    let mut lexer = Lexer::from_memory(buffer, Source::Stdin);
    let mut parser = Parser::new(&mut lexer);
    let parsed = parser.command_line();
    drop(parser);
    if let Err(error) = parsed {
        env.print_error(&error);
        env.exit_status = ExitStatus::ERROR;
    }
}

/// Runs the interactive read-eval loop until end of input or an exit.
///
/// Returns the exit status the shell should exit with.
pub fn interactive_loop(env: &mut Env, history: &mut Vec<String>) -> ExitStatus {
    loop {
        let _ = shoal_semantics::trap::run_pending_traps(env);
        shoal_semantics::job::notify_job_changes(env);

        prompt(env, "PS1", "$ ");
        let mut buffer = match read_line(env) {
            Line::Text(line) => line,
            Line::Eof => return env.exit_status,
            Line::Interrupted => {
                env.system.print_error("\n");
                continue;
            }
        };

        let flow = loop {
            match parse_and_execute(env, &buffer) {
                Outcome::Executed(flow) => {
                    history.push(buffer.trim_end_matches('\n').to_string());
                    break flow;
                }
                Outcome::Empty => break Continue(()),
                Outcome::NeedMore => {
                    prompt(env, "PS2", "> ");
                    match read_line(env) {
                        Line::Text(line) => buffer.push_str(&line),
                        Line::Eof => {
                            // The construct can never be completed now.
                            report_parse_error(env, &buffer);
                            break Continue(());
                        }
                        Line::Interrupted => {
                            env.system.print_error("\n");
                            break Continue(());
                        }
                    }
                }
            }
        };

        match flow {
            Continue(()) => {}
            Break(Divert::Interrupt(status)) => {
                if let Some(status) = status {
                    env.exit_status = status;
                }
            }
            Break(Divert::Break { .. } | Divert::Continue { .. } | Divert::Return(_)) => {
                // Not meaningful at the top level; the command that issued
                // them has already reported any error.
            }
            Break(Divert::Exit(status) | Divert::Abort(status)) => {
                return status.unwrap_or(env.exit_status);
            }
        }
    }
}
