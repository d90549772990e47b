//! Balanced k-d tree for radius queries.
//!
//! Nodes live in one flat array, root at position 0. Support points are copied
//! into leaf order so that a leaf scan walks contiguous memory, and a parallel
//! array maps each leaf slot back to the caller's point index.
//!
//! Splits are taken at the median along the axis with the widest extent, with
//! the split value being the coordinate of the median point. Every point left
//! of the split has `coord <= value` and every point right of it has
//! `coord >= value`, which is what makes plane pruning exact.

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::point::Point;
use crate::spatial_index::{Neighbor, SpatialIndex};
use crate::util::Timed;

#[derive(Clone, Copy, Debug)]
enum Node {
    /// Points `[start, end)` of the permuted arrays
    Leaf { start: u32, end: u32 },
    /// Splitting plane `coord(axis) == value`; `left`/`right` are node positions
    Split {
        axis: u8,
        value: f32,
        left: u32,
        right: u32,
    },
}

/// Static k-d tree over a support point set.
///
/// The tree owns a permuted copy of the points, so it does not borrow the
/// slice it was built from.
///
/// # Examples
/// ```
/// use radius_neighbors::{KdTree, Point, SearchConfig, SpatialIndex};
///
/// let supports: Vec<Point> = (0..100).map(|i| Point::new(i as f32, 0.0, 0.0)).collect();
/// let tree = KdTree::build(&supports, &SearchConfig::default()).unwrap();
///
/// let mut found = Vec::new();
/// tree.within_radius(&Point::new(50.0, 0.0, 0.0), 1.0, &mut found);
/// found.sort_by_key(|n| n.index);
/// let indices: Vec<u32> = found.iter().map(|n| n.index).collect();
/// assert_eq!(indices, vec![49, 50, 51]);
/// ```
#[derive(Clone, Debug)]
pub struct KdTree {
    nodes: Vec<Node>,
    /// Points in leaf order
    points: Vec<Point>,
    /// `indices[slot]` = original index of `points[slot]`
    indices: Vec<u32>,
    leaf_size: usize,
}

impl KdTree {
    /// Maximum number of points per leaf this tree was built with
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Number of nodes (splits and leaves)
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path, counting nodes
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(0_u32, 1_usize)];
        while let Some((node, depth)) = stack.pop() {
            match self.nodes[node as usize] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    fn build_node(&mut self, source: &[Point], order: &mut [u32], start: usize) -> Result<u32> {
        let count = order.len();
        let (axis, spread) = widest_axis(source, order);

        // Identical points cannot be separated, keep them in one leaf.
        if count <= self.leaf_size || spread <= 0.0 {
            return self.push_node(Node::Leaf {
                start: start as u32,
                end: (start + count) as u32,
            });
        }

        let mid = count / 2;
        let _ = order.select_nth_unstable_by(mid, |&a, &b| {
            source[a as usize]
                .coord(axis)
                .total_cmp(&source[b as usize].coord(axis))
        });
        let value = source[order[mid] as usize].coord(axis);

        let node = self.push_node(Node::Leaf { start: 0, end: 0 })?;
        let (lower, upper) = order.split_at_mut(mid);
        let left = self.build_node(source, lower, start)?;
        let right = self.build_node(source, upper, start + mid)?;
        self.nodes[node as usize] = Node::Split {
            axis: axis as u8,
            value,
            left,
            right,
        };
        Ok(node)
    }

    fn push_node(&mut self, node: Node) -> Result<u32> {
        self.nodes.try_reserve(1)?;
        let pos = self.nodes.len() as u32;
        self.nodes.push(node);
        Ok(pos)
    }

    fn search_node(&self, node: u32, query: &Point, radius_sq: f32, out: &mut Vec<Neighbor>) {
        match self.nodes[node as usize] {
            Node::Leaf { start, end } => {
                let (start, end) = (start as usize, end as usize);
                for (p, &index) in self.points[start..end].iter().zip(&self.indices[start..end]) {
                    let d2 = query.squared_distance(p);
                    if d2 <= radius_sq {
                        out.push(Neighbor::new(index, d2));
                    }
                }
            }
            Node::Split {
                axis,
                value,
                left,
                right,
            } => {
                let q = query.coord(axis as usize);
                let diff = q - value;
                let (near, far) = if q < value { (left, right) } else { (right, left) };

                self.search_node(near, query, radius_sq, out);
                // Rounding is monotone, so any point beyond the plane has a squared
                // distance of at least diff^2 and can be skipped when that exceeds r^2.
                if diff.is_nan() || diff * diff <= radius_sq {
                    self.search_node(far, query, radius_sq, out);
                }
            }
        }
    }
}

impl<'a> SpatialIndex<'a> for KdTree {
    const NAME: &'static str = "kd-tree";

    fn build(points: &'a [Point], config: &SearchConfig) -> Result<Self> {
        let _t = Timed::trace("kd-tree build");
        let n = points.len();
        if u32::try_from(n).is_err() {
            return Err(SearchError::TooManyPoints(n));
        }

        let leaf_size = config.leaf_size.max(1);
        let mut tree = Self {
            nodes: Vec::new(),
            points: Vec::new(),
            indices: Vec::new(),
            leaf_size,
        };
        if n == 0 {
            return Ok(tree);
        }

        let mut order: Vec<u32> = Vec::new();
        order.try_reserve_exact(n)?;
        order.extend(0..n as u32);
        // Each leaf holds at least half a leaf of points, so this is usually enough.
        tree.nodes.try_reserve(2 * n.div_ceil(leaf_size.div_ceil(2)))?;

        let _ = tree.build_node(points, &mut order, 0)?;

        tree.points.try_reserve_exact(n)?;
        tree.points.extend(order.iter().map(|&i| points[i as usize]));
        tree.indices = order;

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "kd-tree over {} points: {} nodes, depth {}",
                n,
                tree.nodes.len(),
                tree.depth()
            );
        }
        Ok(tree)
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn within_radius(&self, query: &Point, radius_sq: f32, out: &mut Vec<Neighbor>) {
        if self.nodes.is_empty() {
            return;
        }
        self.search_node(0, query, radius_sq, out);
    }
}

/// Axis with the largest coordinate extent among `order`, and that extent
fn widest_axis(source: &[Point], order: &[u32]) -> (usize, f32) {
    let mut lo = [f32::INFINITY; 3];
    let mut hi = [f32::NEG_INFINITY; 3];
    for &i in order {
        let p = source[i as usize];
        for axis in 0..3 {
            let v = p.coord(axis);
            lo[axis] = lo[axis].min(v);
            hi[axis] = hi[axis].max(v);
        }
    }

    let mut best = (0, f32::NEG_INFINITY);
    for axis in 0..3 {
        let spread = hi[axis] - lo[axis];
        if spread > best.1 {
            best = (axis, spread);
        }
    }
    best
}
