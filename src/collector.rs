//! Per-query radius search and the ragged row representation.

use crate::matrix::NeighborMatrix;
use crate::point::Point;
use crate::spatial_index::{Neighbor, SpatialIndex};

/// Finds all neighbors of `query` within `radius`, closest first.
///
/// Neighbors at equal distance are ordered by ascending index, so the result
/// does not depend on how the index traverses its points. A radius of 0 still
/// reports points that coincide with the query.
///
/// The radius is not validated here; the entry points reject negative or NaN
/// radii before any query runs.
///
/// # Examples
/// ```
/// use radius_neighbors::{search, BruteForce, Point, SearchConfig, SpatialIndex};
///
/// let supports = [Point::new(1.0, 0.0, 0.0), Point::new(0.0, 0.0, 0.0), Point::new(5.0, 5.0, 5.0)];
/// let index = BruteForce::build(&supports, &SearchConfig::default()).unwrap();
///
/// let found = search(&Point::new(0.0, 0.0, 0.0), &index, 1.5);
/// let order: Vec<u32> = found.iter().map(|n| n.index).collect();
/// assert_eq!(order, vec![1, 0]);
/// ```
pub fn search<'a, I: SpatialIndex<'a>>(query: &Point, index: &I, radius: f32) -> Vec<Neighbor> {
    let mut out = Vec::new();
    search_into(query, index, radius, &mut out);
    out
}

/// Like [`search`], but clears and reuses `out`.
pub fn search_into<'a, I: SpatialIndex<'a>>(
    query: &Point,
    index: &I,
    radius: f32,
    out: &mut Vec<Neighbor>,
) {
    out.clear();
    index.within_radius(query, radius * radius, out);
    sort_neighbors(out);
}

/// Sorts by squared distance, ties by index.
pub(crate) fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_unstable_by(Neighbor::cmp_by_distance);
}

/// Variable-length neighbor rows, one per query, in CSR layout.
///
/// Indices stored here are global support indices. This is the form results
/// take before they are padded into a [`NeighborMatrix`], and it also keeps the
/// squared distances.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborRows {
    /// `offsets[i]..offsets[i + 1]` is row `i` in `neighbors`
    offsets: Vec<usize>,
    neighbors: Vec<Neighbor>,
}

impl NeighborRows {
    /// Creates an empty set of rows
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            neighbors: Vec::new(),
        }
    }

    /// Creates empty rows with room for `rows` rows and `neighbors` entries
    pub fn with_capacity(rows: usize, neighbors: usize) -> Self {
        let mut offsets = Vec::with_capacity(rows + 1);
        offsets.push(0);
        Self {
            offsets,
            neighbors: Vec::with_capacity(neighbors),
        }
    }

    /// Appends one row; entries are expected to be sorted already
    pub fn push_row(&mut self, row: &[Neighbor]) {
        self.neighbors.extend_from_slice(row);
        self.offsets.push(self.neighbors.len());
    }

    /// Appends one row, shifting every index by `shift`
    pub(crate) fn push_shifted_row(&mut self, row: &[Neighbor], shift: u32) {
        self.neighbors
            .extend(row.iter().map(|n| Neighbor::new(n.index + shift, n.distance_sq)));
        self.offsets.push(self.neighbors.len());
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Total number of neighbors over all rows
    pub fn num_neighbors(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbors of query `row`, closest first.
    ///
    /// # Panics
    /// Panics if `row >= self.num_rows()`.
    pub fn row(&self, row: usize) -> &[Neighbor] {
        &self.neighbors[self.offsets[row]..self.offsets[row + 1]]
    }

    /// Iterator over all rows in query order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[Neighbor]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.neighbors[w[0]..w[1]])
    }

    /// Length of the longest row (0 when there are no rows)
    pub fn max_row_len(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Appends all rows of `other` after the rows of `self`
    pub fn append(&mut self, other: &Self) {
        let base = self.neighbors.len();
        self.neighbors.extend_from_slice(&other.neighbors);
        self.offsets
            .extend(other.offsets.iter().skip(1).map(|&o| o + base));
    }

    /// Pads every row to the longest row with `sentinel`.
    pub fn to_matrix(&self, sentinel: i32) -> NeighborMatrix {
        let width = self.max_row_len();
        let mut indices = Vec::with_capacity(self.num_rows() * width);
        for row in self.iter() {
            indices.extend(row.iter().map(|n| n.index as i32));
            indices.extend(std::iter::repeat_n(sentinel, width - row.len()));
        }
        NeighborMatrix::from_parts(indices, self.num_rows(), width, sentinel)
    }
}

impl Default for NeighborRows {
    fn default() -> Self {
        Self::new()
    }
}
