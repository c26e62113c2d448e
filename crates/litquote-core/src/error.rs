//! Error types for the litquote-core library.
//!
//! This module provides error handling using the `thiserror` crate. Quoting
//! never fails; everything here comes from unquoting, path lookup, or FIFO
//! allocation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for litquote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a literal was rejected by [`unquote`](crate::unquote)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxReason {
    /// Fewer than two bytes, so there is no room for both delimiters
    TooShort,
    /// The first and last bytes differ
    MismatchedDelimiter,
    /// The delimiter is not one the dialect recognises
    UnsupportedDelimiter,
    /// A `'` literal must hold exactly one unescaped character
    NotSingleCharacter,
}

impl fmt::Display for SyntaxReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyntaxReason::TooShort => "literal too short",
            SyntaxReason::MismatchedDelimiter => "mismatched delimiters",
            SyntaxReason::UnsupportedDelimiter => "unsupported delimiter",
            SyntaxReason::NotSingleCharacter => "character literal must hold one character",
        };
        f.write_str(s)
    }
}

/// Error type for all litquote operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed literal wrapper
    #[error("invalid syntax: {reason}")]
    Syntax {
        /// What was wrong with the delimiters
        reason: SyntaxReason,
    },

    /// No candidate in the search list matched
    #[error("{name}: command not found")]
    CommandNotFound {
        /// The name that was looked up
        name: String,
    },

    /// A match exists but has no execute permission bit
    #[error("{}: permission denied", path.display())]
    PermissionDenied {
        /// The matching, non-executable path
        path: PathBuf,
    },

    /// Failed to stat an explicit path
    #[error("{}: {source}", path.display())]
    PathStat {
        /// The path that was checked
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a FIFO for a reason other than a name collision
    #[error("failed to create fifo '{}': {source}", path.display())]
    FifoCreate {
        /// The path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Every attempted FIFO name already existed
    #[error("failed to create fifo in '{}': {attempts} names already taken", dir.display())]
    FifoExhausted {
        /// Directory the FIFO was to be created in
        dir: PathBuf,
        /// Number of attempts made
        attempts: usize,
    },

    /// The operation is not available on this platform
    #[error("{0} not implemented")]
    Unsupported(&'static str),
}

impl Error {
    /// Creates a new syntax error
    pub fn syntax(reason: SyntaxReason) -> Self {
        Self::Syntax { reason }
    }

    /// Creates a new command-not-found error
    pub fn command_not_found(name: impl Into<String>) -> Self {
        Self::CommandNotFound { name: name.into() }
    }

    /// Creates a new permission error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    /// Creates a new stat error
    pub fn path_stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathStat {
            path: path.into(),
            source,
        }
    }

    /// Creates a new FIFO creation error
    pub fn fifo_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FifoCreate {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error came from a malformed literal
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
