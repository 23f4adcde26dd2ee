use crate::data_wrappers::{MergeEvent, SaddleEdge};
use crate::union_find::UnionFind;
use num_traits::Float;

/// Builds the merge tree: a maximum-spanning-forest pass (Kruskal) over the
/// basin adjacency graph, processing saddle edges in descending value order.
/// Each edge that connects two distinct components absorbs the component with
/// the lower peak into the other and records the absorbed basin's persistence,
/// the gap between its peak and the saddle it merged at.
pub(crate) fn build_merge_tree<T: Float>(
    basin_peaks: &[T],
    saddles: &[SaddleEdge<T>],
) -> Vec<MergeEvent<T>> {
    let mut edges: Vec<&SaddleEdge<T>> = saddles.iter().collect();
    // Stable sort: equal saddle values keep basin discovery order
    edges.sort_by(|a, b| b.value.partial_cmp(&a.value).expect("Invalid floats"));

    let mut union_find = UnionFind::new(basin_peaks.len());
    let mut merge_tree = Vec::new();

    for edge in edges {
        let rep_a = union_find.find(edge.basin_a as usize - 1);
        let rep_b = union_find.find(edge.basin_b as usize - 1);
        if rep_a == rep_b {
            continue;
        }

        // The lower peak loses; the strict comparison keeps ties with rep_a
        let (absorbed, surviving) = if basin_peaks[rep_b] < basin_peaks[rep_a] {
            (rep_b, rep_a)
        } else {
            (rep_a, rep_b)
        };
        let persistence = basin_peaks[absorbed] - edge.value;
        debug_assert!(persistence >= T::zero());

        merge_tree.push(MergeEvent {
            absorbed: (absorbed + 1) as i32,
            surviving: (surviving + 1) as i32,
            persistence,
        });
        union_find.union_into(absorbed, surviving);
    }

    merge_tree
}
