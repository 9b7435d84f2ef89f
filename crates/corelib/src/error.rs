//! Load errors shared by the asset loaders.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Which attribute table a face corner points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl Attribute {
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texcoord",
            Attribute::Normal => "normal",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal failures of a single load call. Nothing partial is returned with these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}{}: {source}", .path.display(), line_suffix(.line_no))]
    StreamUnavailable {
        path: PathBuf,
        /// 1-based line being read when the stream failed, if it got that far.
        line_no: Option<usize>,
        #[source]
        source: io::Error,
    },

    #[error("parse error on line {line_no} ({reason}): '{line}'")]
    Parse {
        line_no: usize,
        line: String,
        reason: String,
    },

    /// `index` is the value as written in the file (1-based).
    #[error("{attribute} index {index} out of range (table has {len} entries)")]
    IndexOutOfRange {
        attribute: Attribute,
        index: i64,
        len: usize,
    },
}

fn line_suffix(line_no: &Option<usize>) -> String {
    line_no.map(|n| format!(" (line {n})")).unwrap_or_default()
}

impl LoadError {
    pub fn parse(line_no: usize, line: &str, reason: impl Into<String>) -> Self {
        LoadError::Parse {
            line_no,
            line: line.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
