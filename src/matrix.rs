//! Padded neighbor index matrix, the fixed-shape output of every entry point.

/// Row-major `num_rows x row_width` matrix of support indices.
///
/// Row `i` lists the neighbors of query `i`, closest first. Rows shorter than
/// `row_width` are padded at the end with [`NeighborMatrix::sentinel`], which
/// equals the number of support points and is therefore never a valid index.
///
/// # Examples
/// ```
/// use radius_neighbors::{ordered_neighbors, Point};
///
/// let queries = [Point::new(0.0, 0.0, 0.0)];
/// let supports = [Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0), Point::new(5.0, 5.0, 5.0)];
///
/// let matrix = ordered_neighbors(&queries, &supports, 1.5).unwrap();
/// assert_eq!(matrix.row_width(), 2);
/// assert_eq!(matrix.as_slice(), &[0, 1]);
/// assert_eq!(matrix.sentinel(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborMatrix {
    indices: Vec<i32>,
    num_rows: usize,
    row_width: usize,
    sentinel: i32,
}

impl NeighborMatrix {
    pub(crate) fn from_parts(indices: Vec<i32>, num_rows: usize, row_width: usize, sentinel: i32) -> Self {
        debug_assert_eq!(indices.len(), num_rows * row_width, "matrix buffer size mismatch");
        Self {
            indices,
            num_rows,
            row_width,
            sentinel,
        }
    }

    /// Number of rows (one per query)
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns: the largest neighbor count found by the call
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// `(num_rows, row_width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.row_width)
    }

    /// Padding value, equal to the support count of the call
    pub fn sentinel(&self) -> i32 {
        self.sentinel
    }

    /// Whether the matrix holds no entries
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Full padded row `row`.
    ///
    /// # Panics
    /// Panics if `row >= self.num_rows()`.
    pub fn row(&self, row: usize) -> &[i32] {
        let start = row * self.row_width;
        &self.indices[start..start + self.row_width]
    }

    /// Leading valid entries of row `row`, without padding.
    ///
    /// # Panics
    /// Panics if `row >= self.num_rows()`.
    pub fn valid(&self, row: usize) -> &[i32] {
        let row = self.row(row);
        let len = row.iter().position(|&i| i >= self.sentinel).unwrap_or(row.len());
        &row[..len]
    }

    /// Number of valid entries in row `row`.
    ///
    /// # Panics
    /// Panics if `row >= self.num_rows()`.
    pub fn neighbor_count(&self, row: usize) -> usize {
        self.valid(row).len()
    }

    /// Iterator over padded rows. Yields nothing when the width is 0.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.indices.chunks_exact(self.row_width.max(1))
    }

    /// Flattened row-major buffer
    pub fn as_slice(&self) -> &[i32] {
        &self.indices
    }

    /// Consumes the matrix, returning the flattened buffer
    pub fn into_vec(self) -> Vec<i32> {
        self.indices
    }
}

impl From<NeighborMatrix> for Vec<i32> {
    fn from(matrix: NeighborMatrix) -> Self {
        matrix.into_vec()
    }
}
