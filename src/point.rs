//! Point storage.
//!
//! A point container is just a borrowed `&[Point]`: the position of a point in
//! the slice is its identity, and every index reported by a search refers to
//! that position.

use crate::error::{Result, SearchError};

/// A 3D point with 32-bit coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
}

impl Point {
    /// Creates a point from its coordinates
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate along `axis` (0 = x, 1 = y, anything else = z)
    #[inline]
    pub fn coord(&self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Every strategy goes through this one function so that the brute-force
    /// scan and the tree compare bit-identical values.
    #[inline]
    pub fn squared_distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl From<[f32; 3]> for Point {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f32, f32, f32)> for Point {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

impl From<Point> for [f32; 3] {
    fn from(p: Point) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Converts an interleaved `x, y, z, x, y, z, ...` buffer into points.
///
/// # Errors
/// Returns [`SearchError::InvalidFlatBuffer`] when the buffer length is not a
/// multiple of 3.
///
/// # Examples
/// ```
/// use radius_neighbors::{points_from_flat, Point};
///
/// let points = points_from_flat(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(points, vec![Point::new(0.0, 1.0, 2.0), Point::new(3.0, 4.0, 5.0)]);
/// ```
pub fn points_from_flat(coords: &[f32]) -> Result<Vec<Point>> {
    if !coords.len().is_multiple_of(3) {
        return Err(SearchError::InvalidFlatBuffer(coords.len()));
    }
    Ok(coords
        .chunks_exact(3)
        .map(|c| Point::new(c[0], c[1], c[2]))
        .collect())
}

/// Flattens points back into an interleaved coordinate buffer.
pub fn points_to_flat(points: &[Point]) -> Vec<f32> {
    let mut coords = Vec::with_capacity(points.len() * 3);
    for p in points {
        coords.extend_from_slice(&[p.x, p.y, p.z]);
    }
    coords
}
