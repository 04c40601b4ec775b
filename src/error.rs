//! Errors surfaced to callers constructing a maze.

use thiserror::Error;

/// Invalid maze parameters, reported at construction and never corrected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("rows must be a positive odd integer, got {0}")]
    InvalidRows(usize),

    #[error("columns must be a positive odd integer, got {0}")]
    InvalidColumns(usize),

    #[error("maze must be at least 3x3 to hold a room, got {rows}x{columns}")]
    TooSmall { rows: usize, columns: usize },

    #[error("a {rows}x{columns} maze has {rooms} rooms, its route needs at least {needed}")]
    TooCrowded {
        rows: usize,
        columns: usize,
        rooms: usize,
        needed: usize,
    },

    #[error("complexity must lie strictly between 0 and 1, got {0}")]
    InvalidComplexity(f64),

    #[error("unknown preset '{0}' (expected easy, median or hard)")]
    UnknownPreset(String),
}
