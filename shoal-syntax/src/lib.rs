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

//! Shell command language syntax
//!
//! This crate defines the token and syntax-tree model of the shell language
//! ([`syntax`]), the lexer and recursive-descent parser producing it
//! ([`parser`]), source-code descriptions for diagnostics ([`source`]), and
//! alias definitions substituted during parsing ([`alias`]).
//!
//! Parsing a string of source code:
//!
//! ```
//! use shoal_syntax::parser::lex::Lexer;
//! use shoal_syntax::parser::Parser;
//! use shoal_syntax::source::Source;
//!
//! let mut lexer = Lexer::from_memory("echo $((6 * 7))\n", Source::Unknown);
//! let mut parser = Parser::new(&mut lexer);
//! let line = parser.command_line().unwrap().unwrap();
//! assert_eq!(line.to_string(), "echo $((6 * 7))");
//! ```
//!
//! Most syntax types also implement `FromStr` and `Display`, which round-trip
//! through single-line source code.

pub mod alias;
pub mod parser;
pub mod source;
pub mod syntax;
