//! Error types for the tracking core.

use thiserror::Error;

/// Errors raised by the tracking core.
///
/// Per-object conditions (a degenerate prediction, a missed match) are never
/// errors; they are absorbed by the track lifecycle. Everything here is a
/// contract violation between components or a bad configuration.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("cost matrix row {row} has {found} columns, expected {expected}")]
    RaggedCostMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cost matrix entry ({row}, {col}) is not finite: {value}")]
    NonFiniteCost { row: usize, col: usize, value: f64 },

    #[error("assignment solver failed: {0}")]
    Solver(String),

    #[error("frame diagonal must be positive and finite, got {0}")]
    InvalidFrameDiagonal(f64),

    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
