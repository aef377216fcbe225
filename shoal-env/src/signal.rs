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

//! Signal names and numbers
//!
//! The `trap` and `kill` built-ins accept signals as numbers (`2`), plain
//! names (`INT`), or prefixed names (`SIGINT`). This module converts
//! between those spellings and [`Signal`] values.

#[doc(no_inline)]
pub use nix::sys::signal::Signal;

use std::str::FromStr;
use thiserror::Error;

/// Error parsing a signal name or number
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("`{0}` is not a valid signal")]
pub struct ParseSignalError(pub String);

/// Parses a signal given as a name or number.
pub fn parse_signal(s: &str) -> Result<Signal, ParseSignalError> {
    if let Ok(number) = s.parse::<i32>() {
        return Signal::try_from(number).map_err(|_| ParseSignalError(s.to_string()));
    }

    let upper = s.to_ascii_uppercase();
    let prefixed;
    let name = if upper.starts_with("SIG") {
        upper.as_str()
    } else {
        prefixed = format!("SIG{upper}");
        prefixed.as_str()
    };
    Signal::from_str(name).map_err(|_| ParseSignalError(s.to_string()))
}

/// Returns the name of the signal without the `SIG` prefix.
#[must_use]
pub fn short_name(signal: Signal) -> &'static str {
    signal.as_str().strip_prefix("SIG").unwrap_or(signal.as_str())
}

/// Iterates over all signals supported on this platform.
pub fn iterator() -> impl Iterator<Item = Signal> {
    Signal::iterator()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_names_and_numbers() {
        assert_eq!(parse_signal("INT"), Ok(Signal::SIGINT));
        assert_eq!(parse_signal("SIGINT"), Ok(Signal::SIGINT));
        assert_eq!(parse_signal("int"), Ok(Signal::SIGINT));
        assert_eq!(parse_signal("15"), Ok(Signal::SIGTERM));
        assert_eq!(parse_signal("TERM"), Ok(Signal::SIGTERM));
        assert!(parse_signal("NOSUCH").is_err());
        assert!(parse_signal("99999").is_err());
    }

    #[test]
    fn short_names() {
        assert_eq!(short_name(Signal::SIGHUP), "HUP");
        assert_eq!(short_name(Signal::SIGCHLD), "CHLD");
    }
}
