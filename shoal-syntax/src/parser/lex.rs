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

//! Lexical analyzer
//!
//! The lexer works on a complete in-memory buffer of accumulated input. It
//! provides character-level primitives in [`core`] and token recognizers in
//! the other submodules. When the buffer ends inside an open construct, the
//! recognizers return an error whose
//! [`needs_more_input`](crate::parser::Error::needs_more_input) is true so
//! the interactive driver can extend the buffer and parse again.

mod arith;
mod backquote;
mod braced_param;
mod command_subst;
mod core;
mod dollar;
mod dollar_single;
mod heredoc;
mod keyword;
mod misc;
mod op;
mod raw_param;
mod text;
mod tilde;
mod token;
mod word;

pub use self::core::{is_blank, Lexer, Token, TokenId};
pub use self::keyword::{Keyword, ParseKeywordError};
pub use self::op::Operator;
pub use self::token::is_token_delimiter;
