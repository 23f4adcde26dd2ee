/// A saddle between two adjacent basins: the highest scalar value observed at
/// any watershed voxel separating them. Basin ids are stored canonically, with
/// `basin_a < basin_b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaddleEdge<T> {
    pub basin_a: i32,
    pub basin_b: i32,
    pub value: T,
}

/// A single event of the merge tree: `absorbed` is unioned into `surviving`
/// once the persistence threshold of a cut exceeds `persistence`.
///
/// Persistence is the difference between the absorbed basin's peak value and
/// the saddle value at which the two basins first connect. It is never
/// negative: a basin's peak is assigned before any lower-valued voxel is
/// processed, so no separating saddle can exceed it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeEvent<T> {
    pub absorbed: i32,
    pub surviving: i32,
    pub persistence: T,
}
