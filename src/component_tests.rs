//! Component tests - each building block on its own

#[cfg(test)]
mod tests {
    use crate::neighbor_search::fan_out_batches;
    use crate::{
        points_from_flat, points_to_flat, search, BatchPartition, BruteForce, KdTree, Neighbor,
        NeighborRows, Point, SearchConfig, SearchError, SpatialIndex,
    };

    fn sorted_indices(mut found: Vec<Neighbor>) -> Vec<u32> {
        found.sort_by_key(|n| n.index);
        found.into_iter().map(|n| n.index).collect()
    }

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f32, 0.0, 0.0)).collect()
    }

    // ============================================================================
    // POINT TESTS
    // ============================================================================

    #[test]
    fn test_point_squared_distance() {
        let a = Point::new(1.0, 2.0, 3.0);
        let b = Point::new(4.0, 6.0, 3.0);
        assert_eq!(a.squared_distance(&b), 25.0, "3-4-5 triangle");
        assert_eq!(b.squared_distance(&a), 25.0, "distance is symmetric");
        assert_eq!(a.squared_distance(&a), 0.0, "distance to itself is zero");
    }

    #[test]
    fn test_point_coord_axes() {
        let p = Point::from([7.0, 8.0, 9.0]);
        assert_eq!((p.coord(0), p.coord(1), p.coord(2)), (7.0, 8.0, 9.0), "axis order is x, y, z");
        assert_eq!(<[f32; 3]>::from(p), [7.0, 8.0, 9.0], "array round trip");
    }

    #[test]
    fn test_points_from_flat() {
        let points = points_from_flat(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], Point::new(3.0, 4.0, 5.0));
        assert_eq!(points_to_flat(&points), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_points_from_flat_rejects_partial_point() {
        let err = points_from_flat(&[0.0, 1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, SearchError::InvalidFlatBuffer(4));
    }

    #[test]
    fn test_points_from_flat_empty() {
        assert!(points_from_flat(&[]).unwrap().is_empty(), "empty buffer gives no points");
    }

    // ============================================================================
    // CONFIG TESTS
    // ============================================================================

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.leaf_size, 10, "default leaf size");
        assert!(config.parallel, "parallel by default");
        assert_eq!(config, SearchConfig::new());
    }

    #[test]
    fn test_config_leaf_size_clamped() {
        let config = SearchConfig::default().with_leaf_size(0);
        assert_eq!(config.leaf_size, 1, "leaf size 0 must be clamped to 1");
    }

    #[test]
    fn test_config_small_work_stays_sequential() {
        let config = SearchConfig::default().with_min_parallel_len(100);
        assert!(!config.use_threads(99), "below threshold");
        assert!(!config.with_parallel(false).use_threads(10_000), "parallel disabled");
        assert!(!config.use_threads(1), "a single unit never fans out");
    }

    #[test]
    fn test_batch_fan_out_counts_batches() {
        let config = SearchConfig::default().with_min_parallel_len(4);
        assert!(!fan_out_batches(&config, 3), "three batches stay below the threshold");
        assert!(!fan_out_batches(&config, 1), "one batch never fans out");
        assert_eq!(
            fan_out_batches(&config, 8),
            cfg!(feature = "parallel"),
            "eight batches fan out whenever threads are available"
        );
    }

    // ============================================================================
    // BATCH PARTITION TESTS
    // ============================================================================

    #[test]
    fn test_partition_from_offsets() {
        let p = BatchPartition::from_offsets(&[0, 2, 2, 5], 5).unwrap();
        assert_eq!(p.num_batches(), 3);
        assert_eq!(p.total_len(), 5);
        let ranges: Vec<_> = p.ranges().collect();
        assert_eq!(ranges, vec![0..2, 2..2, 2..5], "empty middle batch is kept");
    }

    #[test]
    fn test_partition_from_lengths_matches_offsets() {
        let a = BatchPartition::from_lengths(&[2, 0, 3], 5).unwrap();
        let b = BatchPartition::from_offsets(&[0, 2, 2, 5], 5).unwrap();
        assert_eq!(a, b, "lengths and offsets describe the same partition");
    }

    #[test]
    fn test_partition_single() {
        let p = BatchPartition::single(7);
        assert_eq!(p.num_batches(), 1);
        assert_eq!(p.range(0), 0..7);
    }

    #[test]
    fn test_partition_batch_of_skips_empty_batches() {
        let p = BatchPartition::from_offsets(&[0, 2, 2, 5], 5).unwrap();
        assert_eq!(p.batch_of(0), Some(0));
        assert_eq!(p.batch_of(1), Some(0));
        assert_eq!(p.batch_of(2), Some(2), "batch 1 is empty and owns nothing");
        assert_eq!(p.batch_of(4), Some(2));
        assert_eq!(p.batch_of(5), None, "past the end");
    }

    #[test]
    fn test_partition_rejects_decreasing_offsets() {
        let err = BatchPartition::from_offsets(&[0, 3, 2, 5], 5).unwrap_err();
        assert!(
            matches!(err, SearchError::InvalidBatchOffsets { position: 2, .. }),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn test_partition_rejects_negative_offset() {
        let err = BatchPartition::from_offsets(&[0, -1, 5], 5).unwrap_err();
        assert!(
            matches!(err, SearchError::InvalidBatchOffsets { position: 1, .. }),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn test_partition_rejects_nonzero_start() {
        let err = BatchPartition::from_offsets(&[1, 5], 5).unwrap_err();
        assert!(
            matches!(err, SearchError::InvalidBatchOffsets { position: 0, .. }),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn test_partition_rejects_short_cover() {
        assert!(BatchPartition::from_offsets(&[0, 4], 5).is_err(), "last offset must equal length");
        assert!(BatchPartition::from_lengths(&[2, 2], 5).is_err(), "lengths must sum to length");
        assert!(BatchPartition::from_lengths(&[6, -1], 5).is_err(), "negative length");
        assert!(BatchPartition::from_offsets(&[], 0).is_err(), "offsets cannot be empty");
    }

    #[test]
    fn test_partition_zero_batches() {
        let p = BatchPartition::from_offsets(&[0], 0).unwrap();
        assert_eq!(p.num_batches(), 0);
        assert_eq!(p.ranges().count(), 0);
    }

    // ============================================================================
    // BRUTE FORCE TESTS
    // ============================================================================

    #[test]
    fn test_brute_force_inclusive_radius() {
        let supports = line(5);
        let index = BruteForce::build(&supports, &SearchConfig::default()).unwrap();
        let mut found = Vec::new();
        index.within_radius(&Point::new(2.0, 0.0, 0.0), 1.0, &mut found);
        assert_eq!(sorted_indices(found), vec![1, 2, 3], "points at exactly r are included");
    }

    #[test]
    fn test_brute_force_empty() {
        let index = BruteForce::build(&[], &SearchConfig::default()).unwrap();
        assert!(index.is_empty());
        let mut found = Vec::new();
        index.within_radius(&Point::default(), 100.0, &mut found);
        assert!(found.is_empty(), "empty index finds nothing");
    }

    // ============================================================================
    // KD-TREE TESTS
    // ============================================================================

    #[test]
    fn test_kd_tree_empty() {
        let tree = KdTree::build(&[], &SearchConfig::default()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.num_nodes(), 0);
        assert_eq!(tree.depth(), 0);
        let mut found = Vec::new();
        tree.within_radius(&Point::default(), 1.0, &mut found);
        assert!(found.is_empty(), "empty tree finds nothing");
    }

    #[test]
    fn test_kd_tree_single_point() {
        let supports = [Point::new(1.0, 1.0, 1.0)];
        let tree = KdTree::build(&supports, &SearchConfig::default()).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.num_nodes(), 1, "one leaf");

        let mut found = Vec::new();
        tree.within_radius(&Point::new(1.0, 1.0, 1.0), 0.0, &mut found);
        assert_eq!(found, vec![Neighbor::new(0, 0.0)], "zero radius hits the coincident point");
    }

    #[test]
    fn test_kd_tree_splits_beyond_leaf_size() {
        let supports = line(100);
        let config = SearchConfig::default().with_leaf_size(4);
        let tree = KdTree::build(&supports, &config).unwrap();
        assert_eq!(tree.leaf_size(), 4);
        assert!(tree.num_nodes() > 1, "100 points cannot fit one leaf of 4");
        assert!(tree.depth() <= 7, "median splits keep the tree balanced, depth {}", tree.depth());
    }

    #[test]
    fn test_kd_tree_radius_across_split_planes() {
        let supports = line(100);
        let config = SearchConfig::default().with_leaf_size(2);
        let tree = KdTree::build(&supports, &config).unwrap();

        let mut found = Vec::new();
        tree.within_radius(&Point::new(50.0, 0.0, 0.0), 9.0, &mut found);
        assert_eq!(sorted_indices(found), vec![47, 48, 49, 50, 51, 52, 53]);
    }

    #[test]
    fn test_kd_tree_all_duplicates() {
        let supports = vec![Point::new(3.0, 3.0, 3.0); 50];
        let config = SearchConfig::default().with_leaf_size(4);
        let tree = KdTree::build(&supports, &config).unwrap();
        assert_eq!(tree.num_nodes(), 1, "identical points stay in one leaf");

        let mut found = Vec::new();
        tree.within_radius(&Point::new(3.0, 3.0, 3.0), 0.0, &mut found);
        assert_eq!(sorted_indices(found), (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_kd_tree_duplicates_on_split_plane() {
        // Many points share x = 5.0, which becomes a split value.
        let mut supports = Vec::new();
        for i in 0..40 {
            supports.push(Point::new(5.0, i as f32, 0.0));
            supports.push(Point::new(i as f32 * 0.25, 0.0, 0.0));
        }
        let config = SearchConfig::default().with_leaf_size(3);
        let tree = KdTree::build(&supports, &config).unwrap();
        let oracle = BruteForce::build(&supports, &config).unwrap();

        for q in [Point::new(5.0, 0.0, 0.0), Point::new(5.0, 20.0, 0.0), Point::new(4.9, 1.0, 0.0)] {
            let mut a = Vec::new();
            let mut b = Vec::new();
            tree.within_radius(&q, 1.5, &mut a);
            oracle.within_radius(&q, 1.5, &mut b);
            assert_eq!(sorted_indices(a), sorted_indices(b), "query {:?}", q);
        }
    }

    #[test]
    fn test_kd_tree_reports_original_indices() {
        let supports = vec![
            Point::new(9.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(5.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 0.0),
        ];
        let config = SearchConfig::default().with_leaf_size(1);
        let tree = KdTree::build(&supports, &config).unwrap();

        let mut found = Vec::new();
        tree.within_radius(&Point::new(9.0, 0.0, 0.0), 0.0, &mut found);
        assert_eq!(found, vec![Neighbor::new(0, 0.0)], "index refers to the input slice, not leaf order");
    }

    // ============================================================================
    // COLLECTOR TESTS
    // ============================================================================

    #[test]
    fn test_search_sorted_by_distance_then_index() {
        let supports = vec![
            Point::new(0.0, 1.0, 0.0), // d2 = 1
            Point::new(0.5, 0.0, 0.0), // d2 = 0.25
            Point::new(1.0, 0.0, 0.0), // d2 = 1
            Point::new(0.0, 0.0, 0.0), // d2 = 0
        ];
        let index = KdTree::build(&supports, &SearchConfig::default()).unwrap();
        let found = search(&Point::default(), &index, 1.0);
        let order: Vec<u32> = found.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![3, 1, 0, 2], "ties at d2 = 1 are broken by index");
        assert_eq!(found[1].distance(), 0.5);
    }

    #[test]
    fn test_search_zero_radius() {
        let supports = vec![Point::new(1.0, 0.0, 0.0), Point::default(), Point::default()];
        let index = BruteForce::build(&supports, &SearchConfig::default()).unwrap();
        let found = search(&Point::default(), &index, 0.0);
        let order: Vec<u32> = found.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2], "zero radius keeps exact coincidences only");
    }

    #[test]
    fn test_search_into_reuses_buffer() {
        let supports = line(10);
        let index = BruteForce::build(&supports, &SearchConfig::default()).unwrap();
        let mut buf = vec![Neighbor::new(99, 0.0)];
        crate::search_into(&Point::new(9.0, 0.0, 0.0), &index, 0.5, &mut buf);
        assert_eq!(buf, vec![Neighbor::new(9, 0.0)], "buffer is cleared first");
    }

    // ============================================================================
    // NEIGHBOR ROWS TESTS
    // ============================================================================

    #[test]
    fn test_rows_push_and_pad() {
        let mut rows = NeighborRows::new();
        rows.push_row(&[Neighbor::new(2, 0.0), Neighbor::new(0, 1.0)]);
        rows.push_row(&[]);
        rows.push_row(&[Neighbor::new(1, 0.5)]);

        assert_eq!(rows.num_rows(), 3);
        assert_eq!(rows.num_neighbors(), 3);
        assert_eq!(rows.max_row_len(), 2);
        assert!(rows.row(1).is_empty());

        let matrix = rows.to_matrix(3);
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.as_slice(), &[2, 0, 3, 3, 1, 3]);
        assert_eq!(matrix.valid(1), &[] as &[i32]);
        assert_eq!(matrix.neighbor_count(2), 1);
    }

    #[test]
    fn test_rows_append_and_shift() {
        let mut a = NeighborRows::new();
        a.push_row(&[Neighbor::new(0, 0.0)]);

        let mut b = NeighborRows::default();
        b.push_shifted_row(&[Neighbor::new(0, 0.0), Neighbor::new(1, 2.0)], 10);

        a.append(&b);
        assert_eq!(a.num_rows(), 2);
        let second: Vec<u32> = a.row(1).iter().map(|n| n.index).collect();
        assert_eq!(second, vec![10, 11], "shift applied to every index");
    }

    #[test]
    fn test_empty_rows_matrix() {
        let rows = NeighborRows::new();
        assert!(rows.is_empty());
        let matrix = rows.to_matrix(0);
        assert!(matrix.is_empty());
        assert_eq!(matrix.shape(), (0, 0));
        assert_eq!(matrix.rows().count(), 0);
    }

    #[test]
    fn test_matrix_rows_iterator() {
        let mut rows = NeighborRows::new();
        rows.push_row(&[Neighbor::new(0, 0.0)]);
        rows.push_row(&[Neighbor::new(1, 0.0)]);
        let matrix = rows.to_matrix(2);
        let collected: Vec<&[i32]> = matrix.rows().collect();
        assert_eq!(collected, vec![&[0][..], &[1][..]]);
        assert_eq!(Vec::from(matrix), vec![0, 1]);
    }

    // ============================================================================
    // ERROR TESTS
    // ============================================================================

    #[test]
    fn test_error_display() {
        let err = SearchError::BatchCountMismatch {
            query_batches: 2,
            support_batches: 3,
        };
        assert_eq!(
            err.to_string(),
            "batch count mismatch: 2 query batches vs 3 support batches"
        );
        assert!(SearchError::InvalidRadius(-1.0).to_string().contains("-1"));
    }
}
