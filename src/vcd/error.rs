// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

use thiserror::Error;

use super::reader::Cursor;

/// Every failure aborts the parse or write session that produced it.
#[derive(Error, Debug)]
pub enum VcdError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("syntax error on line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    #[error("{what} is already declared in scope `{scope}`{}", on_line(.line))]
    Duplicate {
        what: String,
        scope: String,
        line: Option<usize>,
    },

    #[error("value formatter used before it was bound to a variable")]
    UnboundFormatter,

    #[error("value formatter is already bound to a variable")]
    FormatterRebound,

    #[error("invalid time update {last} -> {requested}")]
    TimeOrder { last: u64, requested: u64 },

    #[error("no variable is registered under handle {0}")]
    UnknownHandle(String),

    #[error("expected a {expected} value but got a {found} value")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Misuse(String),
}

impl VcdError {
    pub(crate) fn syntax(cursor: &Cursor, msg: impl Into<String>) -> Self {
        VcdError::Syntax {
            line: cursor.line(),
            msg: msg.into(),
        }
    }

    /// Attaches the line of the offending declaration to a duplicate error.
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            VcdError::Duplicate {
                what,
                scope,
                line: None,
            } => VcdError::Duplicate {
                what,
                scope,
                line: Some(at),
            },
            other => other,
        }
    }

    /// Line number the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            VcdError::Syntax { line, .. } => Some(*line),
            VcdError::Duplicate { line, .. } => *line,
            _ => None,
        }
    }
}

fn on_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {line})"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, VcdError>;
