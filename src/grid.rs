use ndarray::Array3;

/// Collects the distinct positive labels among the 26-connected neighbours of
/// `centre` into `found`, clearing it first. Offsets falling outside the
/// volume are skipped. Sentinel and watershed values are both non-positive,
/// so a single `> 0` filter covers the labeling pass and the threshold cut.
pub(crate) fn collect_neighbour_labels(
    labels: &Array3<i32>,
    centre: (usize, usize, usize),
    found: &mut Vec<i32>,
) {
    found.clear();
    let (dim_x, dim_y, dim_z) = labels.dim();
    let (cx, cy, cz) = centre;
    for ox in -1..=1_isize {
        let x = cx as isize + ox;
        if x < 0 || x as usize == dim_x {
            continue;
        }
        for oy in -1..=1_isize {
            let y = cy as isize + oy;
            if y < 0 || y as usize == dim_y {
                continue;
            }
            for oz in -1..=1_isize {
                let z = cz as isize + oz;
                if z < 0 || z as usize == dim_z {
                    continue;
                }
                if ox == 0 && oy == 0 && oz == 0 {
                    continue;
                }
                let label = labels[(x as usize, y as usize, z as usize)];
                if label > 0 && !found.contains(&label) {
                    found.push(label);
                }
            }
        }
    }
}
