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

//! The read-eval loop
//!
//! This loop drives non-interactive execution: scripts, `-c` strings,
//! command substitutions, `eval`, and trap actions. It parses one command
//! line at a time from a lexer, executes it, and processes pending
//! signals in between. The interactive front end implements its own loop
//! (with prompting and incomplete-line handling) on top of the same
//! pieces.

use crate::command::Execute;
use crate::handle::Handle;
use shoal_env::semantics::Result;
use shoal_env::Env;
use shoal_syntax::parser::lex::Lexer;
use shoal_syntax::parser::Parser;
use shoal_syntax::source::{Code, Source};
use std::num::NonZeroU64;
use std::ops::ControlFlow::Continue;
use std::rc::Rc;

/// Parses and executes all command lines from the lexer.
pub fn read_eval_loop(env: &mut Env, lexer: &mut Lexer) -> Result {
    loop {
        let aliases = Rc::clone(&env.aliases);
        let mut parser = Parser::config().aliases(&*aliases).input(lexer);
        match parser.command_line() {
            Ok(None) => return Continue(()),
            Ok(Some(list)) => {
                drop(parser);
                list.execute(env)?;
                crate::trap::run_pending_traps(env)?;
            }
            Err(error) => {
                drop(parser);
                // In this non-interactive loop, running out of input
                // inside an open construct is a plain syntax error.
                return error.handle(env);
            }
        }
    }
}

/// Runs shell code from a string.
///
/// Used for command substitutions, trap actions, `eval`, and `.` scripts.
pub fn run_source(
    env: &mut Env,
    code: &str,
    source: Source,
    start_line_number: NonZeroU64,
) -> Result {
    let code = Rc::new(Code {
        value: code.to_string(),
        start_line_number,
        source: Rc::new(source),
    });
    let mut lexer = Lexer::new(code);
    read_eval_loop(env, &mut lexer)
}
