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

//! Runtime execution context stack
//!
//! The stack records what the executor is currently inside of: loops (for
//! `break`/`continue` validation), function calls (for `return` and
//! `FUNCNAME`), trap actions, and sourced scripts.

use crate::trap::Condition;

/// One execution context
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Frame {
    /// A `for`, `while`, or `until` loop body or condition
    Loop,
    /// A function call
    Function {
        /// Name the function was called by
        name: String,
    },
    /// A script read by the `.`/`source` built-in
    DotScript,
    /// A trap action
    Trap(Condition),
    /// A subshell
    Subshell,
    /// A context in which `errexit` does not apply: a condition of `if`,
    /// `while`, or `until`, a pipeline followed by `&&` or `||`, or a
    /// negated pipeline
    Condition,
}

/// Stack of execution contexts
#[derive(Clone, Debug, Default)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    #[must_use]
    pub fn new() -> Stack {
        Stack::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Number of enclosing loops, not counting those outside the current
    /// function or subshell.
    #[must_use]
    pub fn loop_depth(&self) -> usize {
        let mut count = 0;
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Loop => count += 1,
                Frame::Function { .. } | Frame::Subshell => break,
                Frame::DotScript | Frame::Trap(_) | Frame::Condition => {}
            }
        }
        count
    }

    /// Name of the innermost function call, for `FUNCNAME`.
    #[must_use]
    pub fn current_function(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Function { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Whether `return` is valid here: inside a function or dot script.
    #[must_use]
    pub fn can_return(&self) -> bool {
        self.frames
            .iter()
            .any(|frame| matches!(frame, Frame::Function { .. } | Frame::DotScript))
    }

    /// Whether the executor is currently running a trap action.
    #[must_use]
    pub fn in_trap(&self) -> bool {
        self.frames.iter().any(|frame| matches!(frame, Frame::Trap(_)))
    }

    /// Whether execution is in a context where `errexit` is suppressed.
    ///
    /// Only frames inside the current subshell count.
    #[must_use]
    pub fn in_condition(&self) -> bool {
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Condition => return true,
                Frame::Subshell => return false,
                _ => {}
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_depth_counts_to_function_boundary() {
        let mut stack = Stack::new();
        assert_eq!(stack.loop_depth(), 0);
        stack.push(Frame::Loop);
        stack.push(Frame::Loop);
        assert_eq!(stack.loop_depth(), 2);
        stack.push(Frame::Function {
            name: "f".to_string(),
        });
        assert_eq!(stack.loop_depth(), 0);
        stack.push(Frame::Loop);
        assert_eq!(stack.loop_depth(), 1);
    }

    #[test]
    fn current_function_is_innermost() {
        let mut stack = Stack::new();
        assert_eq!(stack.current_function(), None);
        stack.push(Frame::Function {
            name: "outer".to_string(),
        });
        stack.push(Frame::Loop);
        stack.push(Frame::Function {
            name: "inner".to_string(),
        });
        assert_eq!(stack.current_function(), Some("inner"));
        stack.pop();
        assert_eq!(stack.current_function(), Some("outer"));
    }

    #[test]
    fn return_validity() {
        let mut stack = Stack::new();
        assert!(!stack.can_return());
        stack.push(Frame::DotScript);
        assert!(stack.can_return());
    }
}
