//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use radius_neighbors::prelude::*;
//! ```

pub use crate::{
    batch_nanoflann_neighbors, batch_ordered_neighbors, ordered_neighbors, BatchPartition,
    BruteForce, KdTree, Neighbor, NeighborMatrix, NeighborRows, NeighborSearch, Point,
    SearchConfig, SearchError, SpatialIndex,
};
