//! Batch orchestration: validates inputs, builds one index per batch, runs the
//! per-query collector and stitches the rows back together in query order.

use crate::batch::{check_batch_counts, BatchPartition};
use crate::brute_force::BruteForce;
use crate::collector::{search_into, NeighborRows};
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::kd_tree::KdTree;
use crate::matrix::NeighborMatrix;
use crate::point::Point;
use crate::spatial_index::{Neighbor, SpatialIndex};
use crate::util::Timed;

/// Rejects negative and NaN radii.
pub(crate) fn check_radius(radius: f32) -> Result<()> {
    if radius.is_nan() || radius < 0.0 {
        return Err(SearchError::InvalidRadius(radius));
    }
    Ok(())
}

/// Support count as the sentinel value, if it fits the `i32` index space.
pub(crate) fn sentinel_for(num_supports: usize) -> Result<i32> {
    i32::try_from(num_supports).map_err(|_| SearchError::TooManyPoints(num_supports))
}

/// Radius search of every query against one index over all supports.
///
/// Equivalent to [`search_batched`] with a single batch spanning both inputs.
///
/// # Errors
/// Returns [`SearchError::InvalidRadius`] for a negative or NaN radius,
/// [`SearchError::TooManyPoints`] if the support count does not fit in `i32`,
/// and [`SearchError::IndexBuild`] if the index cannot be allocated.
pub fn search_unbatched<'a, I>(
    queries: &[Point],
    supports: &'a [Point],
    radius: f32,
    config: &SearchConfig,
) -> Result<NeighborRows>
where
    I: SpatialIndex<'a> + Sync,
{
    check_radius(radius)?;
    let _ = sentinel_for(supports.len())?;
    log::debug!(
        "radius search ({}): {} queries, {} supports, radius {}",
        I::NAME,
        queries.len(),
        supports.len(),
        radius
    );
    let _t = Timed::debug("unbatched radius search");

    let index = I::build(supports, config)?;
    Ok(answer_queries(queries, &index, radius, 0, config))
}

/// Radius search restricted to matching batches.
///
/// Queries in batch `i` are only matched against supports in batch `i`. The
/// reported indices are global positions in `supports`.
///
/// # Errors
/// Returns [`SearchError::InvalidRadius`] for a negative or NaN radius,
/// [`SearchError::TooManyPoints`] if the support count does not fit in `i32`,
/// [`SearchError::InvalidBatchOffsets`] if a partition does not cover its
/// container, [`SearchError::BatchCountMismatch`] if the partitions have a
/// different number of batches, and [`SearchError::IndexBuild`] if an index
/// cannot be allocated. All checks except the last run before any search work.
pub fn search_batched<'a, I>(
    queries: &[Point],
    supports: &'a [Point],
    query_batches: &BatchPartition,
    support_batches: &BatchPartition,
    radius: f32,
    config: &SearchConfig,
) -> Result<NeighborRows>
where
    I: SpatialIndex<'a> + Sync,
{
    check_radius(radius)?;
    let _ = sentinel_for(supports.len())?;
    check_covers(query_batches, queries.len(), "query")?;
    check_covers(support_batches, supports.len(), "support")?;
    check_batch_counts(query_batches, support_batches)?;

    let num_batches = query_batches.num_batches();
    log::debug!(
        "batched radius search ({}): {} batches, {} queries, {} supports, radius {}",
        I::NAME,
        num_batches,
        queries.len(),
        supports.len(),
        radius
    );
    let _t = Timed::debug("batched radius search");

    let parallel_batches = fan_out_batches(config, num_batches);
    let per_batch = map_ordered(num_batches, parallel_batches, move |batch| -> Result<NeighborRows> {
        let query_range = query_batches.range(batch);
        let support_range = support_batches.range(batch);
        log::trace!(
            "batch {}: queries {:?}, supports {:?}",
            batch,
            query_range,
            support_range
        );
        let _t = Timed::trace("batch");

        let index = I::build(&supports[support_range.clone()], config)?;
        Ok(answer_queries(
            &queries[query_range],
            &index,
            radius,
            support_range.start as u32,
            config,
        ))
    });

    let mut rows = NeighborRows::with_capacity(queries.len(), 0);
    for batch_rows in per_batch {
        rows.append(&batch_rows?);
    }
    Ok(rows)
}

/// Whether batches are processed on separate threads.
pub(crate) fn fan_out_batches(config: &SearchConfig, num_batches: usize) -> bool {
    config.use_threads(num_batches)
}

fn check_covers(partition: &BatchPartition, len: usize, what: &str) -> Result<()> {
    if partition.total_len() != len {
        return Err(SearchError::InvalidBatchOffsets {
            position: partition.num_batches(),
            message: format!(
                "{} partition covers {} points but {} were given",
                what,
                partition.total_len(),
                len
            ),
        });
    }
    Ok(())
}

/// Runs the collector for every query, shifting indices by `shift`.
fn answer_queries<'a, I>(
    queries: &[Point],
    index: &I,
    radius: f32,
    shift: u32,
    config: &SearchConfig,
) -> NeighborRows
where
    I: SpatialIndex<'a> + Sync,
{
    let per_query: Vec<Vec<Neighbor>> = map_ordered(
        queries.len(),
        config.use_threads(queries.len()),
        |q| {
            let mut found = Vec::new();
            search_into(&queries[q], index, radius, &mut found);
            found
        },
    );

    let total = per_query.iter().map(Vec::len).sum();
    let mut rows = NeighborRows::with_capacity(queries.len(), total);
    for found in &per_query {
        rows.push_shifted_row(found, shift);
    }
    rows
}

/// `(0..len).map(f).collect()`, on the rayon pool when `parallel` is set.
/// Output order always follows input order.
#[cfg(feature = "parallel")]
fn map_ordered<T, F>(len: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        (0..len).into_par_iter().map(f).collect()
    } else {
        (0..len).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_ordered<T, F>(len: usize, _parallel: bool, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..len).map(f).collect()
}

/// Entry points bound to a [`SearchConfig`].
///
/// The free functions [`crate::ordered_neighbors`],
/// [`crate::batch_ordered_neighbors`] and [`crate::batch_nanoflann_neighbors`]
/// use `NeighborSearch::default()`.
///
/// # Examples
/// ```
/// use radius_neighbors::{NeighborSearch, Point, SearchConfig};
///
/// let search = NeighborSearch::new(SearchConfig::default().with_leaf_size(4));
/// let points: Vec<Point> = (0..8).map(|i| Point::new(i as f32, 0.0, 0.0)).collect();
///
/// // Two batches of four points each, searched against themselves.
/// let offsets = [0, 4, 8];
/// let matrix = search
///     .batch_nanoflann_neighbors(&points, &points, &offsets, &offsets, 1.0)
///     .unwrap();
/// assert_eq!(matrix.valid(3), &[3, 2]);
/// assert_eq!(matrix.valid(4), &[4, 5]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborSearch {
    config: SearchConfig,
}

impl NeighborSearch {
    /// Creates a search with the given configuration
    pub const fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Brute-force search of all queries against all supports.
    ///
    /// # Errors
    /// See [`search_unbatched`].
    pub fn ordered_neighbors(
        &self,
        queries: &[Point],
        supports: &[Point],
        radius: f32,
    ) -> Result<NeighborMatrix> {
        let rows = self.ordered_neighbors_rows(queries, supports, radius)?;
        Ok(rows.to_matrix(sentinel_for(supports.len())?))
    }

    /// Like [`Self::ordered_neighbors`], returning unpadded rows with distances.
    ///
    /// # Errors
    /// See [`search_unbatched`].
    pub fn ordered_neighbors_rows(
        &self,
        queries: &[Point],
        supports: &[Point],
        radius: f32,
    ) -> Result<NeighborRows> {
        search_unbatched::<BruteForce<'_>>(queries, supports, radius, &self.config)
    }

    /// Batched brute-force search; batches given as half-open offsets.
    ///
    /// # Errors
    /// See [`search_batched`]. Invalid offset arrays are reported as
    /// [`SearchError::InvalidBatchOffsets`].
    pub fn batch_ordered_neighbors(
        &self,
        queries: &[Point],
        supports: &[Point],
        query_offsets: &[i32],
        support_offsets: &[i32],
        radius: f32,
    ) -> Result<NeighborMatrix> {
        let rows =
            self.batch_ordered_neighbors_rows(queries, supports, query_offsets, support_offsets, radius)?;
        Ok(rows.to_matrix(sentinel_for(supports.len())?))
    }

    /// Like [`Self::batch_ordered_neighbors`], returning unpadded rows with distances.
    ///
    /// # Errors
    /// See [`Self::batch_ordered_neighbors`].
    pub fn batch_ordered_neighbors_rows(
        &self,
        queries: &[Point],
        supports: &[Point],
        query_offsets: &[i32],
        support_offsets: &[i32],
        radius: f32,
    ) -> Result<NeighborRows> {
        let (qb, sb) = partitions(queries, supports, query_offsets, support_offsets)?;
        search_batched::<BruteForce<'_>>(queries, supports, &qb, &sb, radius, &self.config)
    }

    /// Batched k-d tree search; same results as [`Self::batch_ordered_neighbors`].
    ///
    /// # Errors
    /// See [`Self::batch_ordered_neighbors`].
    pub fn batch_nanoflann_neighbors(
        &self,
        queries: &[Point],
        supports: &[Point],
        query_offsets: &[i32],
        support_offsets: &[i32],
        radius: f32,
    ) -> Result<NeighborMatrix> {
        let rows = self.batch_nanoflann_neighbors_rows(
            queries,
            supports,
            query_offsets,
            support_offsets,
            radius,
        )?;
        Ok(rows.to_matrix(sentinel_for(supports.len())?))
    }

    /// Like [`Self::batch_nanoflann_neighbors`], returning unpadded rows with distances.
    ///
    /// # Errors
    /// See [`Self::batch_ordered_neighbors`].
    pub fn batch_nanoflann_neighbors_rows(
        &self,
        queries: &[Point],
        supports: &[Point],
        query_offsets: &[i32],
        support_offsets: &[i32],
        radius: f32,
    ) -> Result<NeighborRows> {
        let (qb, sb) = partitions(queries, supports, query_offsets, support_offsets)?;
        search_batched::<KdTree>(queries, supports, &qb, &sb, radius, &self.config)
    }

    /// Batched search with prebuilt partitions and a chosen index strategy.
    ///
    /// Use this with [`BatchPartition::from_lengths`] when batches are given
    /// as per-batch point counts.
    ///
    /// # Errors
    /// See [`search_batched`].
    pub fn batch_neighbors<'a, I>(
        &self,
        queries: &[Point],
        supports: &'a [Point],
        query_batches: &BatchPartition,
        support_batches: &BatchPartition,
        radius: f32,
    ) -> Result<NeighborMatrix>
    where
        I: SpatialIndex<'a> + Sync,
    {
        let rows = search_batched::<I>(
            queries,
            supports,
            query_batches,
            support_batches,
            radius,
            &self.config,
        )?;
        Ok(rows.to_matrix(sentinel_for(supports.len())?))
    }
}

/// Validates both offset arrays and their batch counts.
fn partitions(
    queries: &[Point],
    supports: &[Point],
    query_offsets: &[i32],
    support_offsets: &[i32],
) -> Result<(BatchPartition, BatchPartition)> {
    let qb = BatchPartition::from_offsets(query_offsets, queries.len())?;
    let sb = BatchPartition::from_offsets(support_offsets, supports.len())?;
    check_batch_counts(&qb, &sb)?;
    Ok((qb, sb))
}
