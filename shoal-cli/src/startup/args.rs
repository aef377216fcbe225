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

//! Command-line argument parsing
//!
//! `shoal [options] [script [args...]]` or `shoal -c command [name
//! [args...]]`. Short shell options (`-e`, `-x`, `+x`, ...) map to the
//! option set; a few long options control startup behavior.

use shoal_env::option::{self, Option as ShellOption, State};
use thiserror::Error;

/// Where the shell reads commands from
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// The standard input
    Stdin,
    /// A script file
    File { path: String },
    /// The string given with `-c`
    String(String),
}

/// Everything decided by the command line
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Run {
    /// Where commands come from
    pub source: Source,
    /// Name for `$0`
    pub arg0: String,
    /// Initial positional parameters
    pub positional_params: Vec<String>,
    /// Shell options to apply
    pub options: Vec<(ShellOption, State)>,
    /// Whether `-i` was given explicitly
    pub force_interactive: bool,
    /// Suppress the rcfile
    pub norc: bool,
    /// Alternative rcfile path
    pub rcfile: Option<String>,
    /// Print each parsed command line's syntax tree
    pub debug_ast: bool,
    /// Print each input's token stream
    pub debug_tokens: bool,
}

/// Result of argument parsing
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    /// Print the help text.
    Help,
    /// Print the version.
    Version,
    /// Run the shell.
    Run(Box<Run>),
}

/// Error in command-line arguments
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("option `{0}` is missing its argument")]
    MissingOptionArgument(String),
    #[error("the -c option requires a command string")]
    MissingCommandString,
}

/// Parses the command-line arguments.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Parse, Error> {
    let mut args = args.into_iter();
    let arg0 = args.next().unwrap_or_else(|| "shoal".to_string());

    let mut run = Run {
        source: Source::Stdin,
        arg0,
        positional_params: Vec::new(),
        options: Vec::new(),
        force_interactive: false,
        norc: false,
        rcfile: None,
        debug_ast: false,
        debug_tokens: false,
    };
    let mut command_string = false;
    let mut read_stdin = false;

    let mut operands = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" => return Ok(Parse::Help),
            "--version" => return Ok(Parse::Version),
            "--norc" => run.norc = true,
            "--rcfile" => match args.next() {
                Some(path) => run.rcfile = Some(path),
                None => return Err(Error::MissingOptionArgument(arg)),
            },
            "--posix" => run.options.push((ShellOption::PosixlyCorrect, State::On)),
            "--debug-ast" => run.debug_ast = true,
            "--debug-tokens" => run.debug_tokens = true,
            "--" => {
                operands.extend(args);
                break;
            }
            _ if arg.starts_with("--") => return Err(Error::UnknownOption(arg)),
            _ if (arg.starts_with('-') || arg.starts_with('+')) && arg.len() > 1 => {
                let enable = arg.starts_with('-');
                let mut chars = arg.chars();
                chars.next();
                let mut pending_o = false;
                for c in chars.clone() {
                    if c == 'o' {
                        pending_o = true;
                        continue;
                    }
                    if pending_o {
                        break;
                    }
                    match c {
                        'c' => command_string = true,
                        's' => read_stdin = true,
                        'i' => {
                            run.force_interactive = true;
                            run.options.push((ShellOption::Interactive, State::On));
                        }
                        _ => match option::parse_short(c) {
                            Some((option, state)) => {
                                let state = if enable { state } else { !state };
                                run.options.push((option, state));
                            }
                            None => return Err(Error::UnknownOption(arg)),
                        },
                    }
                }
                if pending_o {
                    // `-o name`: the name is the rest of this argument or
                    // the next one.
                    let rest: String = chars.skip_while(|&c| c != 'o').skip(1).collect();
                    let name = if rest.is_empty() {
                        match args.next() {
                            Some(name) => name,
                            None => return Err(Error::MissingOptionArgument(arg)),
                        }
                    } else {
                        rest
                    };
                    match option::parse_long(&name) {
                        Ok((option, state)) => {
                            let state = if enable { state } else { !state };
                            run.options.push((option, state));
                        }
                        Err(_) => return Err(Error::UnknownOption(name)),
                    }
                }
            }
            _ => {
                operands.push(arg);
                operands.extend(args);
                break;
            }
        }
    }

    let mut operands = operands.into_iter();
    if command_string {
        run.options.push((ShellOption::CmdLine, State::On));
        let Some(command) = operands.next() else {
            return Err(Error::MissingCommandString);
        };
        run.source = Source::String(command);
        if let Some(name) = operands.next() {
            run.arg0 = name;
        }
        run.positional_params.extend(operands);
    } else if read_stdin {
        run.options.push((ShellOption::Stdin, State::On));
        run.positional_params.extend(operands);
    } else if let Some(path) = operands.next() {
        run.arg0 = path.clone();
        run.source = Source::File { path };
        run.positional_params.extend(operands);
    }

    Ok(Parse::Run(Box::new(run)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(args: &[&str]) -> Run {
        let args = std::iter::once("shoal".to_string())
            .chain(args.iter().map(|s| s.to_string()));
        match parse(args).unwrap() {
            Parse::Run(run) => *run,
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn no_arguments_reads_stdin() {
        let run = parse_ok(&[]);
        assert_eq!(run.source, Source::Stdin);
        assert_eq!(run.arg0, "shoal");
        assert!(run.positional_params.is_empty());
    }

    #[test]
    fn command_string() {
        let run = parse_ok(&["-c", "echo hi", "myname", "a", "b"]);
        assert_eq!(run.source, Source::String("echo hi".to_string()));
        assert_eq!(run.arg0, "myname");
        assert_eq!(run.positional_params, ["a", "b"]);
    }

    #[test]
    fn script_file_with_arguments() {
        let run = parse_ok(&["script.sh", "x", "-e"]);
        assert_eq!(
            run.source,
            Source::File {
                path: "script.sh".to_string()
            }
        );
        // Arguments after the script are operands, not options.
        assert_eq!(run.positional_params, ["x", "-e"]);
    }

    #[test]
    fn short_options() {
        let run = parse_ok(&["-ex", "-u"]);
        assert!(run.options.contains(&(ShellOption::ErrExit, State::On)));
        assert!(run.options.contains(&(ShellOption::Xtrace, State::On)));
        assert!(run.options.contains(&(ShellOption::Unset, State::Off)));
    }

    #[test]
    fn plus_options_disable() {
        let run = parse_ok(&["+x"]);
        assert!(run.options.contains(&(ShellOption::Xtrace, State::Off)));
    }

    #[test]
    fn long_o_options() {
        let run = parse_ok(&["-o", "pipefail"]);
        assert!(run.options.contains(&(ShellOption::PipeFail, State::On)));
        let run = parse_ok(&["+o", "errexit"]);
        assert!(run.options.contains(&(ShellOption::ErrExit, State::Off)));
    }

    #[test]
    fn rcfile_options() {
        let run = parse_ok(&["--norc"]);
        assert!(run.norc);
        let run = parse_ok(&["--rcfile", "init.sh"]);
        assert_eq!(run.rcfile.as_deref(), Some("init.sh"));
    }

    #[test]
    fn unknown_option_is_an_error() {
        let args = ["shoal".to_string(), "--wat".to_string()];
        assert_eq!(
            parse(args),
            Err(Error::UnknownOption("--wat".to_string()))
        );
    }

    #[test]
    fn help_and_version() {
        let args = ["shoal".to_string(), "--help".to_string()];
        assert_eq!(parse(args), Ok(Parse::Help));
        let args = ["shoal".to_string(), "--version".to_string()];
        assert_eq!(parse(args), Ok(Parse::Version));
    }
}
