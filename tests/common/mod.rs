use ndarray::Array3;
use persistence_watershed::{
    PersistenceWatershed, SaddleEdge, Segmentation, WatershedError, WATERSHED,
};

pub type SegmentFn = fn(&PersistenceWatershed<f64>) -> Result<Segmentation<f64>, WatershedError>;

pub fn test_two_flanked_peaks(segment_fn: SegmentFn) {
    // Two peaks of value 5.0 separated by a single valley voxel of value 1.0
    let field = Array3::from_shape_vec((1, 1, 5), vec![5.0, 3.0, 1.0, 3.0, 5.0]).unwrap();
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    assert_eq!(2, segmentation.n_basins());
    assert_eq!(vec![5.0, 5.0], segmentation.basin_peaks().to_vec());

    let expected = Array3::from_shape_vec((1, 1, 5), vec![1, 1, 0, 2, 2]).unwrap();
    assert_eq!(&expected, segmentation.labels());

    // The only saddle sits at the valley minimum
    assert_eq!(1, segmentation.saddles().len());
    let saddle = segmentation.saddles()[0];
    assert_eq!((1, 2), (saddle.basin_a, saddle.basin_b));
    assert_eq!(1.0, saddle.value);

    // Equal peaks: the tie-break absorbs the earlier-discovered basin
    assert_eq!(1, segmentation.merge_tree().len());
    let event = segmentation.merge_tree()[0];
    assert_eq!((1, 2), (event.absorbed, event.surviving));
    assert_eq!(4.0, event.persistence);

    // At threshold zero nothing merges and the boundary voxel stays undecided
    let fine = segmentation.cut(0.0);
    assert_eq!(vec![1, 1, 0, 2, 2], fine.iter().copied().collect::<Vec<_>>());
    assert_eq!(WATERSHED, fine[[0, 0, 2]]);

    // Above the persistence both flanks and the boundary are one region
    let coarse = segmentation.cut(5.0);
    assert_eq!(vec![2, 2, 2, 2, 2], coarse.iter().copied().collect::<Vec<_>>());
}

pub fn test_flat_volume(segment_fn: SegmentFn) {
    let field = Array3::from_elem((3, 3, 3), 1.0);
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    // The index tie-break makes the first voxel the only local maximum
    assert_eq!(1, segmentation.n_basins());
    assert!(segmentation.labels().iter().all(|&label| label == 1));
    assert!(segmentation.saddles().is_empty());
    assert!(segmentation.merge_tree().is_empty());
}

pub fn test_full_coverage(segment_fn: SegmentFn) {
    let field = noise_volume((7, 5, 6));
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    let n_basins = segmentation.n_basins() as i32;
    assert!(n_basins >= 1);
    // Every voxel is either watershed or a valid basin id; none unvisited
    assert!(segmentation
        .labels()
        .iter()
        .all(|&label| label >= WATERSHED && label <= n_basins));
}

pub fn test_determinism(segment_fn: SegmentFn) {
    let field = noise_volume((6, 6, 6));
    let first = segment_fn(&PersistenceWatershed::new(&field)).unwrap();
    let second = segment_fn(&PersistenceWatershed::new(&field)).unwrap();

    assert_eq!(first.labels(), second.labels());
    assert_eq!(first.basin_peaks(), second.basin_peaks());
    assert_eq!(first.saddles(), second.saddles());
    assert_eq!(first.merge_tree(), second.merge_tree());
}

pub fn test_equal_value_plateau(segment_fn: SegmentFn) {
    // Three plateau voxels of equal value; linear index order decides ids
    let field = Array3::from_shape_vec((1, 1, 4), vec![2.0, 2.0, 1.0, 2.0]).unwrap();
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    assert_eq!(2, segmentation.n_basins());
    let expected = Array3::from_shape_vec((1, 1, 4), vec![1, 1, 0, 2]).unwrap();
    assert_eq!(&expected, segmentation.labels());

    let event = segmentation.merge_tree()[0];
    assert_eq!((1, 2), (event.absorbed, event.surviving));
    assert_eq!(1.0, event.persistence);
}

pub fn test_merge_count_and_persistence(segment_fn: SegmentFn) {
    let field = noise_volume((8, 7, 6));
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    assert!(segmentation
        .merge_tree()
        .iter()
        .all(|event| event.persistence >= 0.0));

    // One merge per basin beyond one per connected component
    let components = count_components(segmentation.n_basins(), segmentation.saddles());
    assert_eq!(
        segmentation.n_basins() - components,
        segmentation.merge_tree().len()
    );
}

pub fn test_threshold_monotonicity(segment_fn: SegmentFn) {
    let field = noise_volume((6, 6, 6));
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    let mut previous = usize::MAX;
    for step in 0..=10 {
        let threshold = step as f64 * 0.1;
        let regions = count_regions(&segmentation.cut(threshold));
        assert!(regions <= previous);
        previous = regions;
    }
}

pub fn test_recut_idempotence(segment_fn: SegmentFn) {
    let field = noise_volume((5, 6, 7));
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    assert_eq!(segmentation.cut(0.25), segmentation.cut(0.25));
}

pub fn test_chained_merges(segment_fn: SegmentFn) {
    // Three descending peaks: 3 is absorbed into 2, then 2 into 1
    let field = Array3::from_shape_vec((1, 1, 5), vec![9.0, 2.0, 7.0, 4.0, 5.0]).unwrap();
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    assert_eq!(3, segmentation.n_basins());
    let events: Vec<(i32, i32, f64)> = segmentation
        .merge_tree()
        .iter()
        .map(|event| (event.absorbed, event.surviving, event.persistence))
        .collect();
    assert_eq!(vec![(3, 2, 1.0), (2, 1, 5.0)], events);

    // Mid threshold: only the weak basin 3 is merged away
    let partial = segmentation.cut(2.0);
    assert_eq!(vec![1, 0, 2, 2, 2], partial.iter().copied().collect::<Vec<_>>());

    // High threshold: the chain 3 -> 2 -> 1 must resolve transitively to 1
    let merged = segmentation.cut(6.0);
    assert_eq!(vec![1, 1, 1, 1, 1], merged.iter().copied().collect::<Vec<_>>());
}

pub fn test_single_voxel(segment_fn: SegmentFn) {
    let field = Array3::from_shape_vec((1, 1, 1), vec![3.5]).unwrap();
    let watershed = PersistenceWatershed::new(&field);
    let segmentation = segment_fn(&watershed).unwrap();

    assert_eq!(1, segmentation.n_basins());
    assert_eq!(vec![3.5], segmentation.basin_peaks().to_vec());
    assert!(segmentation.saddles().is_empty());
    assert!(segmentation.merge_tree().is_empty());
    assert_eq!(1, segmentation.cut(0.0)[[0, 0, 0]]);
}

pub fn test_empty_volume(segment_fn: SegmentFn) {
    let field = Array3::<f64>::zeros((0, 3, 3));
    let watershed = PersistenceWatershed::new(&field);
    let result = segment_fn(&watershed);
    assert!(matches!(result, Err(WatershedError::EmptyVolume)));
}

pub fn test_non_finite_value(segment_fn: SegmentFn) {
    let mut field = Array3::from_elem((2, 2, 2), 1.0);
    field[[1, 0, 1]] = f64::NAN;
    let watershed = PersistenceWatershed::new(&field);
    let result = segment_fn(&watershed);
    assert!(matches!(result, Err(WatershedError::NonFiniteValue(..))));

    field[[1, 0, 1]] = f64::INFINITY;
    let watershed = PersistenceWatershed::new(&field);
    let result = segment_fn(&watershed);
    assert!(matches!(result, Err(WatershedError::NonFiniteValue(..))));
}

fn noise_volume(dim: (usize, usize, usize)) -> Array3<f64> {
    let n = dim.0 * dim.1 * dim.2;
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let values = (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect();
    Array3::from_shape_vec(dim, values).unwrap()
}

fn count_regions(labels: &Array3<i32>) -> usize {
    let mut ids: Vec<i32> = labels.iter().copied().filter(|&label| label > 0).collect();
    ids.sort();
    ids.dedup();
    ids.len()
}

fn count_components(n_basins: usize, saddles: &[SaddleEdge<f64>]) -> usize {
    fn find(parent: &[usize], mut x: usize) -> usize {
        while parent[x] != x {
            x = parent[x];
        }
        x
    }

    let mut parent: Vec<usize> = (0..n_basins).collect();
    for edge in saddles {
        let rep_a = find(&parent, edge.basin_a as usize - 1);
        let rep_b = find(&parent, edge.basin_b as usize - 1);
        if rep_a != rep_b {
            parent[rep_a] = rep_b;
        }
    }
    (0..n_basins)
        .filter(|&basin| find(&parent, basin) == basin)
        .count()
}
