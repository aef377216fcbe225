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

//! Redirection application
//!
//! Redirections are applied in the order written. Before a descriptor is
//! replaced, its previous open description is saved by duplicating it to a
//! high internal descriptor; [`undo_redirs`] restores the saved
//! descriptors in reverse order, so compound commands and built-ins leave
//! the shell's descriptor table as they found it.

use crate::expansion;
use shoal_env::io::MIN_INTERNAL_FD;
use shoal_env::option::{Option as ShellOption, State};
use shoal_env::system::{Errno, Mode, OFlag, System};
use shoal_env::Env;
use shoal_syntax::source::pretty::{Annotation, AnnotationType, MessageBase};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{Fd, Redir, RedirBody, RedirOp};
use std::borrow::Cow;
use std::ffi::CString;
use thiserror::Error as ThisError;

/// Types of redirection errors
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorCause {
    /// Expansion of the operand failed.
    #[error(transparent)]
    Expansion(#[from] expansion::ErrorCause),

    /// The target file could not be opened.
    #[error("cannot open `{path}`: {errno}")]
    OpenFile { path: String, errno: Errno },

    /// `noclobber` prevented overwriting an existing file.
    #[error("cannot overwrite existing file `{path}`")]
    Clobber { path: String },

    /// The operand of `<&` or `>&` is not a number or `-`.
    #[error("ambiguous redirect: `{operand}`")]
    AmbiguousRedirect { operand: String },

    /// A descriptor operation failed.
    #[error("redirection error: {errno}")]
    FdError { errno: Errno },
}

/// Explanation of a redirection failure
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    pub cause: ErrorCause,
    pub location: Location,
}

impl MessageBase for Error {
    fn message_title(&self) -> Cow<'_, str> {
        self.cause.to_string().into()
    }

    fn main_annotation(&self) -> Annotation<'_> {
        Annotation::new(
            AnnotationType::Error,
            self.cause.to_string().into(),
            &self.location,
        )
    }
}

impl From<expansion::Error> for Error {
    fn from(error: expansion::Error) -> Self {
        Error {
            cause: ErrorCause::Expansion(error.cause),
            location: error.location,
        }
    }
}

/// Record needed to undo one applied redirection
#[derive(Debug)]
pub struct SavedFd {
    /// Descriptor the redirection modified
    fd: Fd,
    /// Saved duplicate of the original descriptor, if it was open
    saved: Option<Fd>,
}

/// Applies redirections, returning what is needed to undo them.
///
/// On error, the already-applied redirections are undone before
/// returning.
pub fn apply_redirs(env: &mut Env, redirs: &[Redir]) -> Result<Vec<SavedFd>, Error> {
    let mut saved = Vec::new();
    for redir in redirs {
        match apply_one(env, redir, &mut saved) {
            Ok(()) => {}
            Err(error) => {
                undo_redirs(env, saved);
                return Err(error);
            }
        }
    }
    Ok(saved)
}

/// Restores the descriptors saved by [`apply_redirs`], in reverse order.
pub fn undo_redirs(env: &mut Env, saved: Vec<SavedFd>) {
    for SavedFd { fd, saved } in saved.into_iter().rev() {
        match saved {
            Some(copy) => {
                _ = env.system.dup2(copy, fd);
                _ = env.system.close(copy);
            }
            None => _ = env.system.close(fd),
        }
    }
}

/// Saves the descriptor about to be modified.
fn save_fd(env: &mut Env, fd: Fd, saved: &mut Vec<SavedFd>) {
    let copy = env.system.dup_cloexec_above(fd, MIN_INTERNAL_FD).ok();
    saved.push(SavedFd { fd, saved: copy });
}

fn apply_one(env: &mut Env, redir: &Redir, saved: &mut Vec<SavedFd>) -> Result<(), Error> {
    let fd = redir.fd_or_default();
    let location = redir.body.operand().location.clone();

    match &redir.body {
        RedirBody::Normal { operator, operand } => {
            use RedirOp::*;
            match operator {
                FileIn | FileInOut | FileOut | FileAppend | FileClobber => {
                    let (field, _) = expansion::expand_word(env, operand)?;
                    let target = open_file(env, *operator, &field.value, &location)?;
                    save_fd(env, fd, saved);
                    move_fd(env, target, fd, &location)?;
                }
                OutErr => {
                    let (field, _) = expansion::expand_word(env, operand)?;
                    let target = open_file(env, FileOut, &field.value, &location)?;
                    save_fd(env, Fd::STDOUT, saved);
                    dup_fd(env, target, Fd::STDOUT, &location)?;
                    save_fd(env, Fd::STDERR, saved);
                    move_fd(env, target, Fd::STDERR, &location)?;
                }
                FdIn | FdOut => {
                    let (field, _) = expansion::expand_word(env, operand)?;
                    save_fd(env, fd, saved);
                    if field.value == "-" {
                        _ = env.system.close(fd);
                    } else if let Ok(source) = field.value.parse::<i32>() {
                        dup_fd(env, Fd(source), fd, &location)?;
                    } else {
                        return Err(Error {
                            cause: ErrorCause::AmbiguousRedirect {
                                operand: field.value,
                            },
                            location,
                        });
                    }
                }
                HereString => {
                    let (field, _) = expansion::expand_word(env, operand)?;
                    let content = format!("{}\n", field.value);
                    let reader = content_fd(env, &content, &location)?;
                    save_fd(env, fd, saved);
                    move_fd(env, reader, fd, &location)?;
                }
            }
        }
        RedirBody::HereDoc(here_doc) => {
            let content = here_doc
                .content
                .get()
                .expect("here-doc content must be filled by the parser");
            let (content, _) = expansion::expand_text(env, content)?;
            let reader = content_fd(env, &content, &location)?;
            save_fd(env, fd, saved);
            move_fd(env, reader, fd, &location)?;
        }
    }
    Ok(())
}

/// Opens the file for a file redirection.
fn open_file(
    env: &mut Env,
    operator: RedirOp,
    path: &str,
    location: &Location,
) -> Result<Fd, Error> {
    use RedirOp::*;
    let clobber = env.options.get(ShellOption::Clobber) == State::On;
    let flags = match operator {
        FileIn => OFlag::O_RDONLY,
        FileInOut => OFlag::O_RDWR | OFlag::O_CREAT,
        FileOut if clobber => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
        FileOut => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_EXCL,
        FileClobber => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
        FileAppend => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
        FdIn | FdOut | HereString | OutErr => unreachable!(),
    };
    let c_path = CString::new(path).map_err(|_| Error {
        cause: ErrorCause::OpenFile {
            path: path.to_string(),
            errno: Errno::EILSEQ,
        },
        location: location.clone(),
    })?;
    let mode = Mode::from_bits_truncate(0o666);
    match env.system.open(&c_path, flags, mode) {
        Ok(fd) => Ok(fd),
        Err(Errno::EEXIST) if operator == FileOut && !clobber => Err(Error {
            cause: ErrorCause::Clobber {
                path: path.to_string(),
            },
            location: location.clone(),
        }),
        Err(errno) => Err(Error {
            cause: ErrorCause::OpenFile {
                path: path.to_string(),
                errno,
            },
            location: location.clone(),
        }),
    }
}

/// Moves `from` onto `to`, closing `from`.
fn move_fd(env: &mut Env, from: Fd, to: Fd, location: &Location) -> Result<(), Error> {
    if from != to {
        dup_fd(env, from, to, location)?;
        _ = env.system.close(from);
    }
    Ok(())
}

fn dup_fd(env: &mut Env, from: Fd, to: Fd, location: &Location) -> Result<(), Error> {
    env.system.dup2(from, to).map(drop).map_err(|errno| Error {
        cause: ErrorCause::FdError { errno },
        location: location.clone(),
    })
}

/// Produces a readable descriptor yielding the given content.
///
/// Small content is written into the pipe directly; anything that may not
/// fit the pipe buffer is fed by a briefly forked writer process.
fn content_fd(env: &mut Env, content: &str, location: &Location) -> Result<Fd, Error> {
    let fd_error = |errno| Error {
        cause: ErrorCause::FdError { errno },
        location: location.clone(),
    };
    let (reader, writer) = env.system.pipe().map_err(fd_error)?;

    const PIPE_CAPACITY: usize = 4096;
    if content.len() <= PIPE_CAPACITY {
        env.system
            .write_all(writer, content.as_bytes())
            .map_err(fd_error)?;
        _ = env.system.close(writer);
        return Ok(reader);
    }

    match env.system.fork().map_err(fd_error)? {
        shoal_env::system::ForkResult::Child => {
            _ = env.system.close(reader);
            _ = env.system.write_all(writer, content.as_bytes());
            env.system.exit_process(0)
        }
        shoal_env::system::ForkResult::Parent { child } => {
            _ = env.system.close(writer);
            env.pending_substitution_pids.push(child);
            Ok(reader)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::dummy_env;
    use assert_matches::assert_matches;

    #[test]
    fn ambiguous_redirect_is_diagnosed() {
        let mut env = dummy_env();
        let redir: shoal_syntax::syntax::Redir = {
            let command: shoal_syntax::syntax::Command = "x 2>&yes".parse().unwrap();
            match command {
                shoal_syntax::syntax::Command::Simple(simple) => {
                    simple.redirs.into_iter().next().unwrap()
                }
                _ => unreachable!(),
            }
        };
        let error = apply_redirs(&mut env, &[redir]).unwrap_err();
        assert_matches!(error.cause, ErrorCause::AmbiguousRedirect { operand } => {
            assert_eq!(operand, "yes");
        });
    }
}
