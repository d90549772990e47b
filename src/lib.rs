//! # radius-neighbors - batched fixed-radius neighbor search
//!
//! Finds, for every query point, all support points within a fixed radius,
//! optionally restricted to points of the same batch, and returns them closest
//! first in a dense, padded index matrix ready for fixed-shape consumers such as
//! point-cloud convolution layers.
//!
//! ## Features
//!
//! - **Exact radius search**: squared distances against the squared radius, inclusive
//! - **Two interchangeable indexes**: brute-force scan and k-d tree, identical results
//! - **Batch isolation**: a query only ever sees supports from its own batch
//! - **Deterministic output**: rows sorted by distance, ties by index, independent of threading
//! - **Parallel**: batches and queries run on the rayon pool (`parallel` feature, on by default)
//!
//! ## Quick Start
//!
//! ```rust
//! use radius_neighbors::prelude::*;
//!
//! let queries = [Point::new(0.0, 0.0, 0.0)];
//! let supports = [
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(1.0, 0.0, 0.0),
//!     Point::new(5.0, 5.0, 5.0),
//! ];
//!
//! let neighbors = ordered_neighbors(&queries, &supports, 1.5).unwrap();
//! assert_eq!(neighbors.as_slice(), &[0, 1]);
//!
//! // Two batches: supports 0..2 and 2..4. Query 0 belongs to batch 0, query 1 to batch 1.
//! let queries = [Point::new(0.0, 0.0, 0.0), Point::new(0.0, 0.0, 0.0)];
//! let supports = [
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(10.0, 10.0, 10.0),
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(0.0, 0.0, 0.0),
//! ];
//! let neighbors =
//!     batch_nanoflann_neighbors(&queries, &supports, &[0, 1, 2], &[0, 2, 4], 0.1).unwrap();
//!
//! // Row width is the largest neighbor count; short rows are padded with the
//! // support count (4).
//! assert_eq!(neighbors.as_slice(), &[0, 4, 2, 3]);
//! ```
//!
//! ## Output layout
//!
//! The result is a row-major `num_queries x row_width` matrix of `i32`, where
//! `row_width` is the largest neighbor count of any query in the call. Unused
//! slots hold the sentinel value, equal to the number of support points. Within
//! a row, valid indices come first, ordered by ascending distance and then by
//! ascending index.
//!
//! ## Logging
//!
//! Calls are logged through the [`log`] facade: call shape and total time at
//! `debug`, per-batch ranges and index build times at `trace`.

pub mod batch;
pub mod brute_force;
pub mod collector;
pub mod config;
pub mod error;
pub mod kd_tree;
pub mod matrix;
pub mod neighbor_search;
pub mod point;
pub mod prelude;
pub mod spatial_index;
mod util;

pub use batch::BatchPartition;
pub use brute_force::BruteForce;
pub use collector::{search, search_into, NeighborRows};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use kd_tree::KdTree;
pub use matrix::NeighborMatrix;
pub use neighbor_search::{search_batched, search_unbatched, NeighborSearch};
pub use point::{points_from_flat, points_to_flat, Point};
pub use spatial_index::{Neighbor, SpatialIndex};

/// Brute-force radius search of every query against every support.
///
/// Equivalent to [`batch_ordered_neighbors`] with a single batch.
///
/// # Errors
/// [`SearchError::InvalidRadius`] for a negative or NaN radius,
/// [`SearchError::TooManyPoints`] if the support count does not fit in `i32`.
pub fn ordered_neighbors(queries: &[Point], supports: &[Point], radius: f32) -> Result<NeighborMatrix> {
    NeighborSearch::default().ordered_neighbors(queries, supports, radius)
}

/// Batched brute-force radius search.
///
/// `query_offsets` and `support_offsets` hold `num_batches + 1` half-open
/// offsets each, starting at 0 and ending at the container length. Returned
/// indices are global positions in `supports`.
///
/// # Errors
/// [`SearchError::InvalidBatchOffsets`] for malformed offsets,
/// [`SearchError::BatchCountMismatch`] if the two partitions differ in batch
/// count, plus the errors of [`ordered_neighbors`].
pub fn batch_ordered_neighbors(
    queries: &[Point],
    supports: &[Point],
    query_offsets: &[i32],
    support_offsets: &[i32],
    radius: f32,
) -> Result<NeighborMatrix> {
    NeighborSearch::default().batch_ordered_neighbors(queries, supports, query_offsets, support_offsets, radius)
}

/// Batched k-d tree radius search.
///
/// Same contract and same output as [`batch_ordered_neighbors`]; only the cost
/// differs.
///
/// # Errors
/// Same as [`batch_ordered_neighbors`], plus [`SearchError::IndexBuild`] if a
/// tree cannot be allocated.
pub fn batch_nanoflann_neighbors(
    queries: &[Point],
    supports: &[Point],
    query_offsets: &[i32],
    support_offsets: &[i32],
    radius: f32,
) -> Result<NeighborMatrix> {
    NeighborSearch::default().batch_nanoflann_neighbors(queries, supports, query_offsets, support_offsets, radius)
}

#[cfg(test)]
mod component_tests;
#[cfg(test)]
mod test_support;
