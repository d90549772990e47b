//! Exhaustive scan index.
//!
//! Compares the query against every support point. This is the reference
//! implementation the tree is tested against.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::point::Point;
use crate::spatial_index::{Neighbor, SpatialIndex};

/// Linear-scan "index" over a borrowed support slice.
///
/// # Examples
/// ```
/// use radius_neighbors::{BruteForce, Point, SearchConfig, SpatialIndex};
///
/// let supports = [Point::new(0.0, 0.0, 0.0), Point::new(3.0, 0.0, 0.0)];
/// let index = BruteForce::build(&supports, &SearchConfig::default()).unwrap();
///
/// let mut found = Vec::new();
/// index.within_radius(&Point::new(0.5, 0.0, 0.0), 1.0, &mut found);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].index, 0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BruteForce<'a> {
    points: &'a [Point],
}

impl<'a> SpatialIndex<'a> for BruteForce<'a> {
    const NAME: &'static str = "brute-force";

    fn build(points: &'a [Point], _config: &SearchConfig) -> Result<Self> {
        if u32::try_from(points.len()).is_err() {
            return Err(SearchError::TooManyPoints(points.len()));
        }
        Ok(Self { points })
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn within_radius(&self, query: &Point, radius_sq: f32, out: &mut Vec<Neighbor>) {
        for (i, p) in self.points.iter().enumerate() {
            let d2 = query.squared_distance(p);
            if d2 <= radius_sq {
                out.push(Neighbor::new(i as u32, d2));
            }
        }
    }
}
