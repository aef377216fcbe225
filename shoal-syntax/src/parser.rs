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

//! Syntax parser for the shell language
//!
//! The parser is a recursive-descent consumer of the token stream produced
//! by the [lexer](lex). Parsing is synchronous: when the input ends inside
//! an open construct, the parse fails with an [`Error`] whose
//! [`needs_more_input`](Error::needs_more_input) returns true, and the
//! caller re-parses after extending the buffer.
//!
//! The entry point for whole command lines is
//! [`Parser::command_line`](Parser::command_line), which also reads pending
//! here-document contents when it consumes a newline.

pub mod lex;

mod case;
mod command;
mod compound_command;
mod core;
mod double_bracket;
mod error;
mod for_loop;
mod from_str;
mod function;
mod grouping;
mod r#if;
mod list;
mod pipeline;
mod redir;
mod simple_command;
mod while_loop;

pub use self::core::{Config, Parser, Rec, Result};
pub use self::error::{Error, ErrorCause, SyntaxError};
