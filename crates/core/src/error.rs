//! Typed errors for editing and word lookup.

use thiserror::Error;

/// Rejected edits to a [`LyricsSession`](crate::session::LyricsSession).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("span {start}..{end} is outside the document ({len} characters)")]
    OutOfRange { start: usize, end: usize, len: usize },

    #[error("span {start}..{end} is not a single word")]
    NotAWord { start: usize, end: usize },

    #[error("no annotation starts at {0}")]
    NoAnnotation(usize),
}

/// Failures from a [`WordLookup`](crate::lookup::WordLookup) backend.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{backend} does not support {category} lookups")]
    Unsupported {
        backend: String,
        category: &'static str,
    },

    #[error("empty query word")]
    EmptyQuery,
}
