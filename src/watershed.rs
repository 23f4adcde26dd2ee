use crate::data_wrappers::SaddleEdge;
use crate::grid;
use crate::merge_tree;
use crate::validation::VolumeValidator;
use crate::{Segmentation, WatershedError};
use ndarray::Array3;
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;

/// Label of voxels where two or more basins meet. Remaining watershed voxels
/// keep this label in the output of a threshold cut as well.
pub const WATERSHED: i32 = 0;

// Pre-flood sentinel; must never survive the labeling pass
pub(crate) const UNVISITED: i32 = -1;

/// The priority-flood watershed transform with topological persistence, over
/// 3D scalar fields. Generic over floating point numeric types.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceWatershed<'a, T> {
    volume: &'a Array3<T>,
}

impl<'a, T: Float + Send + Sync> PersistenceWatershed<'a, T> {
    /// Creates an instance of the watershed transform over a scalar volume.
    ///
    /// # Parameters
    /// * `volume` - a reference to the field to segment, a dense 3D array of
    ///   floating point numbers. Every value must be finite and every axis
    ///   must be non-empty.
    ///
    /// # Returns
    /// * The watershed transform instance.
    ///
    /// # Examples
    /// ```
    ///use ndarray::Array3;
    ///use persistence_watershed::PersistenceWatershed;
    ///
    ///let field: Array3<f32> = Array3::from_elem((4, 4, 4), 1.0);
    ///let watershed = PersistenceWatershed::new(&field);
    /// ```
    pub fn new(volume: &'a Array3<T>) -> Self {
        PersistenceWatershed { volume }
    }

    /// Performs the watershed segmentation of the volume passed to the
    /// constructor: one flood pass over all voxels in descending value order,
    /// growing basins from local maxima, followed by the construction of the
    /// merge tree over the basin adjacency graph.
    ///
    /// # Returns
    /// * A result that, if successful, contains the segmentation: the label
    ///   volume, the basin peaks, the saddle values between adjacent basins
    ///   and the ordered merge events. Call [`Segmentation::cut`] to collapse
    ///   it at a persistence threshold; the segmentation itself is immutable
    ///   and can be cut any number of times. An error is returned if the
    ///   volume has a zero-length axis or contains non-finite values.
    ///
    /// # Examples
    /// ```
    ///use ndarray::Array3;
    ///use persistence_watershed::PersistenceWatershed;
    ///
    /// // Two peaks of value 5.0 either side of a valley of value 1.0
    ///let field = Array3::from_shape_vec((1, 1, 5), vec![5.0, 3.0, 1.0, 3.0, 5.0]).unwrap();
    ///let watershed = PersistenceWatershed::new(&field);
    ///let segmentation = watershed.segment().unwrap();
    ///
    ///assert_eq!(2, segmentation.n_basins());
    ///assert_eq!(1, segmentation.merge_tree().len());
    ///assert_eq!(4.0, segmentation.merge_tree()[0].persistence);
    /// ```
    #[cfg(feature = "serial")]
    pub fn segment(&self) -> Result<Segmentation<T>, WatershedError> {
        let validator = VolumeValidator::new(self.volume);
        validator.validate_volume()?;
        let values: Vec<T> = self.volume.iter().copied().collect();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_unstable_by(|&a, &b| Self::descending_by_value(&values, a, b));
        Ok(self.flood_and_merge(&values, &order))
    }

    /// Performs the watershed segmentation of the volume passed to the
    /// constructor, ranking the voxels in parallel. The flood scan itself is
    /// order-dependent and stays sequential, so the output is identical to
    /// [`PersistenceWatershed::segment`]; only the initial sort is spread
    /// over threads. Worthwhile for large volumes.
    ///
    /// # Returns
    /// * A result that, if successful, contains the segmentation, exactly as
    ///   returned by the serial entry point. An error is returned if the
    ///   volume has a zero-length axis or contains non-finite values.
    #[cfg(feature = "parallel")]
    pub fn segment_par(&self) -> Result<Segmentation<T>, WatershedError> {
        let validator = VolumeValidator::new(self.volume);
        validator.validate_volume()?;
        let values: Vec<T> = self.volume.iter().copied().collect();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.par_sort_unstable_by(|&a, &b| Self::descending_by_value(&values, a, b));
        Ok(self.flood_and_merge(&values, &order))
    }

    // Total order: value descending, then linear index ascending. The index
    // tie-break keeps basin ids reproducible on plateaus of equal values.
    fn descending_by_value(values: &[T], a: usize, b: usize) -> Ordering {
        values[b]
            .partial_cmp(&values[a])
            .expect("Invalid floats")
            .then_with(|| a.cmp(&b))
    }

    fn flood_and_merge(&self, values: &[T], order: &[usize]) -> Segmentation<T> {
        let (labels, basin_peaks, saddles) = self.flood(values, order);
        let merge_tree = merge_tree::build_merge_tree(&basin_peaks, &saddles);
        Segmentation::new(labels, basin_peaks, saddles, merge_tree)
    }

    fn flood(&self, values: &[T], order: &[usize]) -> (Array3<i32>, Vec<T>, Vec<SaddleEdge<T>>) {
        let mut labels = Array3::from_elem(self.volume.dim(), UNVISITED);
        let mut basin_peaks: Vec<T> = Vec::new();
        let mut saddles = SaddleTable::new();
        let mut adjacent: Vec<i32> = Vec::with_capacity(26);

        for &index in order {
            let centre = self.delinearise(index);
            grid::collect_neighbour_labels(&labels, centre, &mut adjacent);
            match adjacent.len() {
                // A voxel with no labeled neighbour is a local maximum
                0 => {
                    basin_peaks.push(values[index]);
                    labels[centre] = basin_peaks.len() as i32;
                }
                1 => labels[centre] = adjacent[0],
                _ => {
                    labels[centre] = WATERSHED;
                    for (i, &basin_a) in adjacent.iter().enumerate() {
                        for &basin_b in &adjacent[i + 1..] {
                            saddles.update(basin_a, basin_b, values[index]);
                        }
                    }
                }
            }
        }

        debug_assert!(labels.iter().all(|&label| label != UNVISITED));
        (labels, basin_peaks, saddles.into_edges())
    }

    fn delinearise(&self, index: usize) -> (usize, usize, usize) {
        let (_, dim_y, dim_z) = self.volume.dim();
        (
            index / (dim_y * dim_z),
            (index / dim_z) % dim_y,
            index % dim_z,
        )
    }
}

/// Saddle values keyed by the canonical (smaller, larger) basin pair, stored
/// as a dense arena of per-smaller-id rows. Each pair keeps the maximum value
/// seen; since voxels arrive in descending order the first touch already is
/// the true saddle and later updates are no-ops. Row entries keep discovery
/// order, which pins down the processing order of equal-valued edges.
struct SaddleTable<T> {
    rows: Vec<Vec<(i32, T)>>,
}

impl<T: Float> SaddleTable<T> {
    fn new() -> Self {
        SaddleTable { rows: Vec::new() }
    }

    fn update(&mut self, basin_a: i32, basin_b: i32, value: T) {
        let (smaller, larger) = if basin_a < basin_b {
            (basin_a, basin_b)
        } else {
            (basin_b, basin_a)
        };
        let row_index = smaller as usize - 1;
        if self.rows.len() <= row_index {
            self.rows.resize_with(row_index + 1, Vec::new);
        }
        let row = &mut self.rows[row_index];
        match row.iter_mut().find(|(neighbour, _)| *neighbour == larger) {
            Some(entry) => entry.1 = entry.1.max(value),
            None => row.push((larger, value)),
        }
    }

    fn into_edges(self) -> Vec<SaddleEdge<T>> {
        self.rows
            .into_iter()
            .enumerate()
            .flat_map(|(row_index, row)| {
                row.into_iter().map(move |(larger, value)| SaddleEdge {
                    basin_a: row_index as i32 + 1,
                    basin_b: larger,
                    value,
                })
            })
            .collect()
    }
}
