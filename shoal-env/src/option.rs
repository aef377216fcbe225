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

//! Type definitions for shell options
//!
//! The [`OptionSet`] records whether each [`Option`] is on or off. It only
//! stores state; honoring an option is the business of the code it
//! concerns. Some long option names express the *off* state of an option
//! (e.g. `noclobber` disables [`Clobber`](Option::Clobber)); parsing
//! returns the canonical option together with the state the name denotes.

use enumset::{EnumSet, EnumSetType};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::ops::Not;
use std::str::FromStr;
use thiserror::Error;

/// State of an option
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    On,
    Off,
}

pub use State::*;

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            On => "on".fmt(f),
            Off => "off".fmt(f),
        }
    }
}

impl Not for State {
    type Output = Self;
    #[must_use]
    fn not(self) -> Self {
        match self {
            On => Off,
            Off => On,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> State {
        if value {
            On
        } else {
            Off
        }
    }
}

/// Shell option
#[derive(Clone, Copy, Debug, EnumSetType, Eq, Hash, PartialEq)]
#[enumset(no_super_impls)]
pub enum Option {
    /// Exports all variables when they are assigned (`-a`).
    AllExport,
    /// Allows `>` to overwrite an existing file; `noclobber` (`-C`) turns
    /// this off.
    Clobber,
    /// The shell was invoked with a command string (`-c`).
    CmdLine,
    /// Exits the shell when a command fails (`-e`).
    ErrExit,
    /// Actually executes commands; `-n` turns this off.
    Exec,
    /// Performs pathname expansion; `noglob` (`-f`) turns this off.
    Glob,
    /// Keeps an interactive shell alive on end-of-file.
    IgnoreEof,
    /// Enables interactive behavior (`-i`).
    Interactive,
    /// The shell is a login shell.
    Login,
    /// Enables job control (`-m`).
    Monitor,
    /// Reports finished background jobs before each prompt (`-b`).
    Notify,
    /// Expands unmatched globs to no field instead of the pattern itself.
    NullGlob,
    /// Makes a pipeline's status the rightmost non-zero status.
    PipeFail,
    /// Disables non-POSIX extensions where they conflict.
    PosixlyCorrect,
    /// Reads commands from the standard input (`-s`).
    Stdin,
    /// Expands unset variables to an empty string; `nounset` (`-u`) turns
    /// this off.
    Unset,
    /// Echoes input lines as they are read (`-v`).
    Verbose,
    /// Prints expanded commands before running them (`-x`).
    Xtrace,
}

impl Option {
    /// Returns the canonical long name of the option.
    #[must_use]
    pub fn long_name(self) -> &'static str {
        use self::Option::*;
        match self {
            AllExport => "allexport",
            Clobber => "clobber",
            CmdLine => "cmdline",
            ErrExit => "errexit",
            Exec => "exec",
            Glob => "glob",
            IgnoreEof => "ignoreeof",
            Interactive => "interactive",
            Login => "login",
            Monitor => "monitor",
            Notify => "notify",
            NullGlob => "nullglob",
            PipeFail => "pipefail",
            PosixlyCorrect => "posixlycorrect",
            Stdin => "stdin",
            Unset => "unset",
            Verbose => "verbose",
            Xtrace => "xtrace",
        }
    }

    /// Whether the option can be changed with the `set` built-in.
    #[must_use]
    pub fn is_modifiable(self) -> bool {
        use self::Option::*;
        !matches!(self, CmdLine | Interactive | Login | Stdin)
    }
}

impl Display for Option {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.long_name().fmt(f)
    }
}

/// Error parsing an option name
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("no such option")]
pub struct UnknownOption;

/// Parses a short option character as used in `set -e` or `sh -x`.
///
/// Returns the option and the state that *enabling* the character denotes;
/// `+e` would request the opposite state.
#[must_use]
pub fn parse_short(name: char) -> std::option::Option<(Option, State)> {
    use self::Option::*;
    match name {
        'a' => Some((AllExport, On)),
        'b' => Some((Notify, On)),
        'C' => Some((Clobber, Off)),
        'c' => Some((CmdLine, On)),
        'e' => Some((ErrExit, On)),
        'f' => Some((Glob, Off)),
        'i' => Some((Interactive, On)),
        'l' => Some((Login, On)),
        'm' => Some((Monitor, On)),
        'n' => Some((Exec, Off)),
        's' => Some((Stdin, On)),
        'u' => Some((Unset, Off)),
        'v' => Some((Verbose, On)),
        'x' => Some((Xtrace, On)),
        _ => None,
    }
}

/// Returns the short option character for an option, if it has one.
#[must_use]
pub fn short_name(option: Option) -> std::option::Option<(char, State)> {
    use self::Option::*;
    match option {
        AllExport => Some(('a', On)),
        Notify => Some(('b', On)),
        Clobber => Some(('C', Off)),
        CmdLine => Some(('c', On)),
        ErrExit => Some(('e', On)),
        Glob => Some(('f', Off)),
        Interactive => Some(('i', On)),
        Login => Some(('l', On)),
        Monitor => Some(('m', On)),
        Exec => Some(('n', Off)),
        Stdin => Some(('s', On)),
        Unset => Some(('u', Off)),
        Verbose => Some(('v', On)),
        Xtrace => Some(('x', On)),
        _ => None,
    }
}

/// Normalizes a long option name for comparison.
///
/// Case is folded and `-` and `_` are removed, so `err-exit`, `Err_Exit`,
/// and `errexit` all compare equal.
#[must_use]
pub fn canonicalize(name: &str) -> Cow<'_, str> {
    if name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(
            name.chars()
                .filter(|&c| c != '-' && c != '_')
                .map(|c| c.to_ascii_lowercase())
                .collect(),
        )
    }
}

/// Parses a long option name as used in `set -o errexit`.
///
/// Negated aliases are recognized: `noclobber` yields `(Clobber, Off)` and
/// `nounset` yields `(Unset, Off)`. An explicit `no` prefix negates any
/// option name.
pub fn parse_long(name: &str) -> Result<(Option, State), UnknownOption> {
    let canonical = canonicalize(name);

    // Aliases first, so that e.g. `posix` works.
    match &*canonical {
        "posix" => return Ok((Option::PosixlyCorrect, On)),
        "nolog" | "noexec" => return Ok((Option::Exec, Off)),
        _ => {}
    }

    for option in EnumSet::<Option>::all() {
        if option.long_name() == canonical {
            return Ok((option, On));
        }
    }
    if let Some(positive) = canonical.strip_prefix("no") {
        for option in EnumSet::<Option>::all() {
            if option.long_name() == positive {
                return Ok((option, Off));
            }
        }
    }
    Err(UnknownOption)
}

impl FromStr for Option {
    type Err = UnknownOption;
    fn from_str(s: &str) -> Result<Option, UnknownOption> {
        match parse_long(s) {
            Ok((option, On)) => Ok(option),
            _ => Err(UnknownOption),
        }
    }
}

/// Whether each option is on or off
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OptionSet {
    enabled: EnumSet<Option>,
}

impl OptionSet {
    /// Returns a set with every option off.
    #[must_use]
    pub fn empty() -> Self {
        OptionSet {
            enabled: EnumSet::empty(),
        }
    }

    /// Returns the set of options that are on by default.
    #[must_use]
    pub fn default_set() -> Self {
        OptionSet {
            enabled: Option::Clobber | Option::Exec | Option::Glob | Option::Unset,
        }
    }

    /// Returns the state of an option.
    #[must_use]
    pub fn get(&self, option: Option) -> State {
        self.enabled.contains(option).into()
    }

    /// Sets the state of an option.
    pub fn set(&mut self, option: Option, state: State) {
        match state {
            On => self.enabled.insert(option),
            Off => self.enabled.remove(option),
        };
    }

    /// Iterates over all options with their states.
    pub fn iter(&self) -> impl Iterator<Item = (Option, State)> + '_ {
        EnumSet::<Option>::all()
            .iter()
            .map(|option| (option, self.get(option)))
    }

    /// Returns the short option characters that are in their enabled state,
    /// for the special parameter `$-`.
    #[must_use]
    pub fn short_flags(&self) -> String {
        let mut flags: Vec<char> = EnumSet::<Option>::all()
            .iter()
            .filter_map(|option| {
                let (c, on_state) = short_name(option)?;
                (self.get(option) == on_state).then_some(c)
            })
            .collect();
        flags.sort_unstable_by(|a, b| {
            (a.to_ascii_lowercase(), *a).cmp(&(b.to_ascii_lowercase(), *b))
        });
        flags.into_iter().collect()
    }
}

impl Default for OptionSet {
    /// Same as [`default_set`](Self::default_set)
    fn default() -> Self {
        Self::default_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_states() {
        let set = OptionSet::default();
        assert_eq!(set.get(Option::Clobber), On);
        assert_eq!(set.get(Option::Glob), On);
        assert_eq!(set.get(Option::Unset), On);
        assert_eq!(set.get(Option::ErrExit), Off);
        assert_eq!(set.get(Option::Monitor), Off);
    }

    #[test]
    fn setting_and_getting() {
        let mut set = OptionSet::default();
        set.set(Option::ErrExit, On);
        assert_eq!(set.get(Option::ErrExit), On);
        set.set(Option::ErrExit, Off);
        assert_eq!(set.get(Option::ErrExit), Off);
    }

    #[test]
    fn short_option_parsing() {
        assert_eq!(parse_short('e'), Some((Option::ErrExit, On)));
        assert_eq!(parse_short('u'), Some((Option::Unset, Off)));
        assert_eq!(parse_short('C'), Some((Option::Clobber, Off)));
        assert_eq!(parse_short('Z'), None);
    }

    #[test]
    fn long_option_parsing() {
        assert_eq!(parse_long("errexit"), Ok((Option::ErrExit, On)));
        assert_eq!(parse_long("err-exit"), Ok((Option::ErrExit, On)));
        assert_eq!(parse_long("ErrExit"), Ok((Option::ErrExit, On)));
        assert_eq!(parse_long("pipefail"), Ok((Option::PipeFail, On)));
        assert_eq!(parse_long("noclobber"), Ok((Option::Clobber, Off)));
        assert_eq!(parse_long("nounset"), Ok((Option::Unset, Off)));
        assert_eq!(parse_long("posix"), Ok((Option::PosixlyCorrect, On)));
        assert_eq!(parse_long("bogus"), Err(UnknownOption));
    }

    #[test]
    fn short_flags_for_hyphen_parameter() {
        let mut set = OptionSet::default();
        set.set(Option::ErrExit, On);
        set.set(Option::Xtrace, On);
        let flags = set.short_flags();
        assert!(flags.contains('e'));
        assert!(flags.contains('x'));
        assert!(!flags.contains('u'));
    }
}
