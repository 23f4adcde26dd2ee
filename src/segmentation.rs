use crate::data_wrappers::{MergeEvent, SaddleEdge};
use crate::grid;
use crate::union_find::UnionFind;
use crate::watershed::WATERSHED;
use ndarray::Array3;
use num_traits::Float;

/// The frozen output of a flood-labeling run: the label volume, the basin
/// peaks, the saddle table and the merge tree. Cutting it at a persistence
/// threshold is cheap and never mutates the segmentation, so one run can be
/// re-cut at any number of thresholds, including from multiple threads.
pub struct Segmentation<T> {
    labels: Array3<i32>,
    basin_peaks: Vec<T>,
    saddles: Vec<SaddleEdge<T>>,
    merge_tree: Vec<MergeEvent<T>>,
}

impl<T: Float> Segmentation<T> {
    pub(crate) fn new(
        labels: Array3<i32>,
        basin_peaks: Vec<T>,
        saddles: Vec<SaddleEdge<T>>,
        merge_tree: Vec<MergeEvent<T>>,
    ) -> Self {
        Segmentation {
            labels,
            basin_peaks,
            saddles,
            merge_tree,
        }
    }

    /// The raw label volume: `WATERSHED` (0) on basin boundaries, basin ids
    /// (1 and upwards, in discovery order) everywhere else.
    pub fn labels(&self) -> &Array3<i32> {
        &self.labels
    }

    /// The number of basins found, i.e. the number of local maxima the flood
    /// grew regions from.
    pub fn n_basins(&self) -> usize {
        self.basin_peaks.len()
    }

    /// Peak values per basin, indexed by `basin_id - 1`.
    pub fn basin_peaks(&self) -> &[T] {
        &self.basin_peaks
    }

    /// The saddle value for every pair of adjacent basins: the highest scalar
    /// value among the watershed voxels separating the two.
    pub fn saddles(&self) -> &[SaddleEdge<T>] {
        &self.saddles
    }

    /// The ordered merge events. Earlier events merged at higher saddle
    /// values; the sequence as a whole is the merge tree that `cut` collapses.
    pub fn merge_tree(&self) -> &[MergeEvent<T>] {
        &self.merge_tree
    }

    /// Collapses the merge tree at the given persistence threshold and
    /// returns the resulting label volume.
    ///
    /// Every merge event with persistence strictly below `threshold` is
    /// applied, absorption chains are resolved to their final surviving basin,
    /// and each watershed voxel whose remaining neighbourhood has converged to
    /// a single region is assigned to it. Watershed voxels still bordering
    /// two or more distinct regions keep the label 0, as do watershed voxels
    /// surrounded only by other undecided watershed voxels: resolution is a
    /// single pass, not iterated to a fixpoint.
    ///
    /// Region ids in the output are not guaranteed to be contiguous, nor
    /// stable across different thresholds.
    ///
    /// # Parameters
    /// * `threshold` - the persistence below which basins are merged away, in
    ///   the value units of the input field.
    ///
    /// # Returns
    /// * A label volume of the same shape as the input, 0 denoting watershed
    ///   voxels and positive integers denoting regions.
    ///
    /// # Examples
    /// ```
    ///use ndarray::Array3;
    ///use persistence_watershed::PersistenceWatershed;
    ///
    ///let field = Array3::from_shape_vec((1, 1, 5), vec![5.0, 3.0, 1.0, 3.0, 5.0]).unwrap();
    ///let segmentation = PersistenceWatershed::new(&field).segment().unwrap();
    ///
    /// // Both peaks have persistence 4.0: below that threshold they stay apart
    ///let fine = segmentation.cut(1.0);
    ///assert_ne!(fine[[0, 0, 0]], fine[[0, 0, 4]]);
    ///
    /// // Above it, the field is one region and the boundary voxel joins it
    ///let coarse = segmentation.cut(5.0);
    ///assert_eq!(coarse[[0, 0, 0]], coarse[[0, 0, 4]]);
    ///assert_eq!(coarse[[0, 0, 0]], coarse[[0, 0, 2]]);
    /// ```
    pub fn cut(&self, threshold: T) -> Array3<i32> {
        let mut relabel = UnionFind::new(self.basin_peaks.len());
        for event in &self.merge_tree {
            if event.persistence < threshold {
                // Each basin is absorbed at most once, so linking the event
                // ids directly rebuilds the forest; find resolves chains
                relabel.union_into(event.absorbed as usize - 1, event.surviving as usize - 1);
            }
        }

        let mut output = Array3::<i32>::zeros(self.labels.dim());
        let mut deferred = Vec::new();
        for (centre, &label) in self.labels.indexed_iter() {
            if label == WATERSHED {
                deferred.push(centre);
            } else {
                output[centre] = relabel.find(label as usize - 1) as i32 + 1;
            }
        }

        // Single pass over the partially resolved volume, in scan order
        let mut adjacent = Vec::with_capacity(26);
        for centre in deferred {
            grid::collect_neighbour_labels(&output, centre, &mut adjacent);
            if adjacent.len() == 1 {
                output[centre] = adjacent[0];
            }
        }

        output
    }
}
