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

//! Job ID parsing
//!
//! A job ID names a job in a [`JobSet`]:
//!
//! - `%`, `%%`, and `%+` are the current job.
//! - `%-` is the previous job.
//! - `%n` is the job with job number `n` (slab index `n - 1`).
//! - `%name` is the unique job whose command starts with `name`.
//! - `%?text` is the unique job whose command contains `text`.

use super::JobSet;
use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use thiserror::Error;

/// Parsed form of a job ID
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobId<'a> {
    /// `%`, `%%`, or `%+`
    CurrentJob,
    /// `%-`
    PreviousJob,
    /// `%n`
    JobNumber(NonZeroUsize),
    /// `%name`
    NamePrefix(&'a str),
    /// `%?text`
    NameSubstring(&'a str),
}

impl Default for JobId<'_> {
    fn default() -> Self {
        JobId::CurrentJob
    }
}

impl Display for JobId<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            JobId::CurrentJob => "%+".fmt(f),
            JobId::PreviousJob => "%-".fmt(f),
            JobId::JobNumber(number) => write!(f, "%{number}"),
            JobId::NamePrefix(prefix) => write!(f, "%{prefix}"),
            JobId::NameSubstring(text) => write!(f, "%?{text}"),
        }
    }
}

/// Error parsing a job ID string
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("a job ID must start with `%`")]
pub struct ParseError;

/// Parses a job ID, which must start with `%`.
pub fn parse(job_id: &str) -> Result<JobId<'_>, ParseError> {
    let tail = job_id.strip_prefix('%').ok_or(ParseError)?;
    Ok(parse_tail(tail))
}

/// Parses a job ID without the leading `%`.
#[must_use]
pub fn parse_tail(tail: &str) -> JobId<'_> {
    match tail {
        "" | "%" | "+" => JobId::CurrentJob,
        "-" => JobId::PreviousJob,
        _ => match tail.strip_prefix('?') {
            Some(text) => JobId::NameSubstring(text),
            None => match tail.parse::<NonZeroUsize>() {
                Ok(number) => JobId::JobNumber(number),
                Err(_) => JobId::NamePrefix(tail),
            },
        },
    }
}

/// Error finding the job a job ID denotes
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum FindError {
    /// No job matches the ID.
    #[error("no such job")]
    NotFound,
    /// More than one job matches the ID.
    #[error("the job ID is ambiguous")]
    Ambiguous,
}

impl JobId<'_> {
    /// Finds the index of the job this ID denotes in the given set.
    pub fn find(&self, jobs: &JobSet) -> Result<usize, FindError> {
        match *self {
            JobId::CurrentJob => jobs.current_job().ok_or(FindError::NotFound),
            JobId::PreviousJob => jobs.previous_job().ok_or(FindError::NotFound),
            JobId::JobNumber(number) => {
                let index = number.get() - 1;
                if jobs.get(index).is_some() {
                    Ok(index)
                } else {
                    Err(FindError::NotFound)
                }
            }
            JobId::NamePrefix(prefix) => {
                find_unique(jobs, |name| name.starts_with(prefix))
            }
            JobId::NameSubstring(text) => find_unique(jobs, |name| name.contains(text)),
        }
    }
}

fn find_unique<F: Fn(&str) -> bool>(jobs: &JobSet, matches: F) -> Result<usize, FindError> {
    let mut found = None;
    for (index, job) in jobs.iter() {
        if matches(&job.name) {
            if found.is_some() {
                return Err(FindError::Ambiguous);
            }
            found = Some(index);
        }
    }
    found.ok_or(FindError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::super::{Job, Pid};
    use super::*;

    #[test]
    fn parsing() {
        assert_eq!(parse_tail(""), JobId::CurrentJob);
        assert_eq!(parse_tail("+"), JobId::CurrentJob);
        assert_eq!(parse_tail("%"), JobId::CurrentJob);
        assert_eq!(parse_tail("-"), JobId::PreviousJob);
        assert_eq!(
            parse_tail("3"),
            JobId::JobNumber(NonZeroUsize::new(3).unwrap())
        );
        assert_eq!(parse_tail("vi"), JobId::NamePrefix("vi"));
        assert_eq!(parse_tail("?ed"), JobId::NameSubstring("ed"));
        assert_eq!(parse("%1").unwrap(), parse_tail("1"));
        assert_eq!(parse("1"), Err(ParseError));
    }

    fn set_with(names: &[&str]) -> JobSet {
        let mut set = JobSet::new();
        for (i, name) in names.iter().enumerate() {
            set.add(Job::new(Pid::from_raw(100 + i as i32), *name));
        }
        set
    }

    #[test]
    fn finding_by_number() {
        let set = set_with(&["sleep 30", "vi file"]);
        assert_eq!(parse("%1").unwrap().find(&set), Ok(0));
        assert_eq!(parse("%2").unwrap().find(&set), Ok(1));
        assert_eq!(parse("%3").unwrap().find(&set), Err(FindError::NotFound));
    }

    #[test]
    fn finding_by_name() {
        let set = set_with(&["sleep 30", "vi file"]);
        assert_eq!(parse("%vi").unwrap().find(&set), Ok(1));
        assert_eq!(parse("%?30").unwrap().find(&set), Ok(0));
        assert_eq!(parse("%x").unwrap().find(&set), Err(FindError::NotFound));
    }

    #[test]
    fn ambiguous_name() {
        let set = set_with(&["sleep 30", "sleep 60"]);
        assert_eq!(
            parse("%sleep").unwrap().find(&set),
            Err(FindError::Ambiguous)
        );
        assert_eq!(parse("%?60").unwrap().find(&set), Ok(1));
    }

    #[test]
    fn current_and_previous() {
        let set = set_with(&["one", "two"]);
        assert_eq!(parse("%+").unwrap().find(&set), Ok(1));
        assert_eq!(parse("%%").unwrap().find(&set), Ok(1));
        assert_eq!(parse("%-").unwrap().find(&set), Ok(0));
    }
}
