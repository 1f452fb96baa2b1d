//! Error types for flatcoll
//!
//! Provides a unified error type for all container operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using FlatError
pub type Result<T> = std::result::Result<T, FlatError>;

/// Unified error type for flatcoll operations
///
/// Broken internal invariants (a hash-set probe that finds no free slot
/// after a sufficient rebuild) are not represented here: they panic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlatError {
    // -------------------------------------------------------------------------
    // Bounds / Usage Errors
    // -------------------------------------------------------------------------
    #[error("Index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("Operation on an empty container")]
    Empty,

    #[error("Element width mismatch: expected {expected} bytes, found {found}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Reservation failed: {0}")]
    Reserve(#[from] TryReserveError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
