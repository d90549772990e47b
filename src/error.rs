//! Error types for neighbor search.

use std::collections::TryReserveError;
use std::fmt;

/// Errors reported by the search entry points.
///
/// Every variant except [`SearchError::IndexBuild`] is raised while the
/// inputs are validated, before any index is built or query is run.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// Radius is negative or NaN.
    InvalidRadius(f32),

    /// Query and support partitions describe a different number of batches.
    BatchCountMismatch {
        /// Number of batches in the query partition.
        query_batches: usize,
        /// Number of batches in the support partition.
        support_batches: usize,
    },

    /// Batch offsets (or lengths) do not describe a valid partition.
    InvalidBatchOffsets {
        /// Position of the offending entry in the input array.
        position: usize,
        /// What is wrong with it.
        message: String,
    },

    /// More support points than the `i32` index space can address.
    TooManyPoints(usize),

    /// Flat coordinate buffer length is not a multiple of 3.
    InvalidFlatBuffer(usize),

    /// Spatial index construction failed (allocation).
    IndexBuild(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius(r) => {
                write!(f, "invalid radius: {} (must be a non-negative number)", r)
            }
            Self::BatchCountMismatch {
                query_batches,
                support_batches,
            } => {
                write!(
                    f,
                    "batch count mismatch: {} query batches vs {} support batches",
                    query_batches, support_batches
                )
            }
            Self::InvalidBatchOffsets { position, message } => {
                write!(f, "invalid batch partition at entry {}: {}", position, message)
            }
            Self::TooManyPoints(n) => {
                write!(f, "too many points: {} exceeds the i32 index range", n)
            }
            Self::InvalidFlatBuffer(len) => {
                write!(f, "flat coordinate buffer of length {} is not a multiple of 3", len)
            }
            Self::IndexBuild(msg) => {
                write!(f, "spatial index build failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for SearchError {}

impl From<TryReserveError> for SearchError {
    fn from(err: TryReserveError) -> Self {
        Self::IndexBuild(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;
