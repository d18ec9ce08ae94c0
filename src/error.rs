//! Structured error type for the editing core.
//!
//! Mirrors the rest of this codebase's convention of a hand-rolled error
//! enum rather than a derive-macro crate: the error surface here is small
//! and fixed (four kinds, see the spec), so there's nothing a macro buys us.

use std::fmt;

/// Errors the editing core can return.
#[derive(Debug)]
pub enum EditorError {
    /// Any underlying file operation failed (open, read, write, seek, rename).
    Io(std::io::Error),
    /// A `goto` or cursor set targeted an offset outside `[0, size()]`.
    OutOfRange { offset: u64, size: u64 },
    /// In-place save was attempted over a change that alters length.
    LengthChange,
    /// Hex parsing flagged one or more nibbles as unparseable.
    ParseError,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::OutOfRange { offset, size } => {
                write!(f, "offset {} out of range (size {})", offset, size)
            }
            Self::LengthChange => {
                write!(f, "in-place save requires every change to preserve length")
            }
            Self::ParseError => write!(f, "failed to parse one or more hex nibbles"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result alias for editing-core operations.
pub type Result<T> = std::result::Result<T, EditorError>;
