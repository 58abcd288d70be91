//! Boundary enforcement after each motion update

use crate::domain::{BoundaryKind, Domain};
use crate::positions::PositionStore;

/// Applies the domain's boundary conditions to every active particle
///
/// With absorbing boundaries a particle whose coordinate along any axis is
/// `<= 0` or `>= L` is masked across all dimensions. A non-finite coordinate
/// counts as a crossing of the low boundary. Already-masked particles are
/// left as they are.
///
/// # Returns
///
/// Indices of the particles that exited during this call, in ascending order
pub fn apply_boundaries(domain: &Domain, positions: &mut PositionStore) -> Vec<usize> {
    let exited: Vec<usize> = positions
        .active_indices()
        .filter(|&idx| {
            matches!(
                crossed(domain, positions, idx),
                Some(BoundaryKind::Absorbing)
            )
        })
        .collect();

    for &idx in &exited {
        positions.mask(idx);
    }
    exited
}

/// First boundary particle `idx` lies on or beyond, checking axes in order
fn crossed(domain: &Domain, positions: &PositionStore, idx: usize) -> Option<BoundaryKind> {
    domain
        .boundaries()
        .iter()
        .enumerate()
        .find_map(|(axis, pair)| {
            let x = positions.get(idx, axis);
            if x >= domain.length(axis) {
                Some(pair.high)
            } else if x > 0.0 {
                None
            } else {
                Some(pair.low)
            }
        })
}
