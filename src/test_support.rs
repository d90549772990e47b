//! Shared helpers for the test modules: random clouds and a naive reference search.

use rand::Rng;

use crate::{NeighborMatrix, Point};

/// Uniform random points in `[0, extent)^3`
pub(crate) fn random_cloud<R: Rng>(rng: &mut R, n: usize, extent: f32) -> Vec<Point> {
    (0..n)
        .map(|_| {
            Point::new(
                rng.random_range(0.0..extent),
                rng.random_range(0.0..extent),
                rng.random_range(0.0..extent),
            )
        })
        .collect()
}

/// Random points on a coarse integer lattice, so duplicates and exact distance ties are common
pub(crate) fn lattice_cloud<R: Rng>(rng: &mut R, n: usize, side: i32) -> Vec<Point> {
    (0..n)
        .map(|_| {
            Point::new(
                rng.random_range(0..side) as f32,
                rng.random_range(0..side) as f32,
                rng.random_range(0..side) as f32,
            )
        })
        .collect()
}

/// Random batch lengths summing to `total`, as `num_batches + 1` offsets
pub(crate) fn random_offsets<R: Rng>(rng: &mut R, total: usize, num_batches: usize) -> Vec<i32> {
    let mut cuts: Vec<usize> = (0..num_batches.saturating_sub(1))
        .map(|_| rng.random_range(0..=total))
        .collect();
    cuts.sort_unstable();

    let mut offsets = Vec::with_capacity(num_batches + 1);
    offsets.push(0);
    offsets.extend(cuts.iter().map(|&c| c as i32));
    offsets.push(total as i32);
    offsets
}

/// Batch of `index` under `offsets`, by linear scan
fn batch_of(offsets: &[i32], index: usize) -> usize {
    (0..offsets.len() - 1)
        .find(|&b| (offsets[b] as usize..offsets[b + 1] as usize).contains(&index))
        .expect("index outside of every batch")
}

/// All-pairs reference search, written independently of the crate's code path.
///
/// Returns the valid (unpadded) rows with global indices.
pub(crate) fn reference_rows(
    queries: &[Point],
    supports: &[Point],
    query_offsets: &[i32],
    support_offsets: &[i32],
    radius: f32,
) -> Vec<Vec<i32>> {
    let r2 = radius * radius;
    queries
        .iter()
        .enumerate()
        .map(|(qi, q)| {
            let qb = batch_of(query_offsets, qi);
            let mut hits: Vec<(f32, i32)> = supports
                .iter()
                .enumerate()
                .filter(|&(si, _)| batch_of(support_offsets, si) == qb)
                .map(|(si, s)| {
                    let (dx, dy, dz) = (q.x - s.x, q.y - s.y, q.z - s.z);
                    (dx * dx + dy * dy + dz * dz, si as i32)
                })
                .filter(|&(d2, _)| d2 <= r2)
                .collect();
            hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            hits.into_iter().map(|(_, i)| i).collect()
        })
        .collect()
}

/// Valid prefix of every matrix row
pub(crate) fn valid_rows(matrix: &NeighborMatrix) -> Vec<Vec<i32>> {
    (0..matrix.num_rows()).map(|r| matrix.valid(r).to_vec()).collect()
}

/// Checks shape, padding and ordering invariants of a result matrix.
pub(crate) fn assert_well_formed(matrix: &NeighborMatrix, queries: &[Point], supports: &[Point]) {
    let sentinel = supports.len() as i32;
    assert_eq!(matrix.sentinel(), sentinel, "sentinel must equal the support count");
    assert_eq!(matrix.num_rows(), queries.len(), "one row per query");
    assert_eq!(
        matrix.as_slice().len(),
        matrix.num_rows() * matrix.row_width(),
        "buffer must be rectangular"
    );

    let mut widest = 0;
    for (r, q) in queries.iter().enumerate() {
        let row = matrix.row(r);
        let valid = matrix.valid(r);
        widest = widest.max(valid.len());

        assert!(
            row[valid.len()..].iter().all(|&i| i == sentinel),
            "row {} has a valid index after padding: {:?}",
            r,
            row
        );
        assert!(
            valid.iter().all(|&i| (0..sentinel).contains(&i)),
            "row {} has an out-of-range index: {:?}",
            r,
            row
        );
        for pair in valid.windows(2) {
            let d0 = q.squared_distance(&supports[pair[0] as usize]);
            let d1 = q.squared_distance(&supports[pair[1] as usize]);
            assert!(
                d0 < d1 || (d0 == d1 && pair[0] < pair[1]),
                "row {} not ordered by (distance, index): {:?}",
                r,
                valid
            );
        }
    }
    assert_eq!(widest, matrix.row_width(), "row width must be the largest neighbor count");
}
