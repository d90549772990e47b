//! The spatial index capability shared by the brute-force and tree strategies.

use std::cmp::Ordering;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::point::Point;

/// A support point found within the search radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the support point
    pub index: u32,
    /// Squared Euclidean distance to the query point
    pub distance_sq: f32,
}

impl Neighbor {
    /// Creates a neighbor
    pub const fn new(index: u32, distance_sq: f32) -> Self {
        Self { index, distance_sq }
    }

    /// Euclidean distance to the query point
    pub fn distance(&self) -> f32 {
        self.distance_sq.sqrt()
    }

    /// Ordering by distance, ties broken by ascending index
    #[inline]
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance_sq
            .total_cmp(&other.distance_sq)
            .then(self.index.cmp(&other.index))
    }
}

/// Radius search over a fixed set of support points.
///
/// Implementations are built once from a support slice and then only read,
/// so a built index can be shared between query threads.
///
/// Every implementation must report exactly the points whose
/// [`Point::squared_distance`] to the query is `<= radius_sq`, no more and no
/// fewer. Order of the reported neighbors is unspecified.
pub trait SpatialIndex<'a>: Sized {
    /// Human-readable strategy name, used in log messages
    const NAME: &'static str;

    /// Builds the index over `points`. Reported indices are positions in `points`.
    ///
    /// # Errors
    /// Returns [`crate::SearchError::IndexBuild`] if memory for the index
    /// cannot be reserved.
    fn build(points: &'a [Point], config: &SearchConfig) -> Result<Self>;

    /// Number of indexed points
    fn len(&self) -> usize;

    /// Whether the index holds no points
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends every point within `radius_sq` of `query` to `out`.
    fn within_radius(&self, query: &Point, radius_sq: f32, out: &mut Vec<Neighbor>);
}
