use nalgebra::DMatrix;

use crate::boundary::apply_boundaries;
use crate::domain::Domain;
use crate::positions::PositionStore;

fn store(rows: &[[f64; 2]]) -> PositionStore {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    PositionStore::from_matrix(DMatrix::from_row_slice(rows.len(), 2, &flat))
}

#[test]
fn test_inside_particles_untouched() {
    let domain = Domain::new(vec![10.0, 10.0]).unwrap();
    let mut positions = store(&[[1.0, 1.0], [9.9, 0.1]]);

    let exited = apply_boundaries(&domain, &mut positions);

    assert!(exited.is_empty());
    assert_eq!(positions.active_count(), 2);
}

#[test]
fn test_low_and_high_faces_absorb() {
    let domain = Domain::new(vec![10.0, 10.0]).unwrap();
    let mut positions = store(&[[0.0, 5.0], [5.0, 10.0], [-1.0, 5.0], [5.0, 12.0], [5.0, 5.0]]);

    let exited = apply_boundaries(&domain, &mut positions);

    assert_eq!(exited, vec![0, 1, 2, 3]);
    assert!(positions.is_active(4));
}

#[test]
fn test_exit_in_one_axis_masks_whole_particle() {
    let domain = Domain::new(vec![10.0, 10.0]).unwrap();
    let mut positions = store(&[[5.0, -0.5]]);

    apply_boundaries(&domain, &mut positions);

    assert!(!positions.is_active(0));
    assert!(positions.active_position(0).is_none());
    // coordinates kept for the record
    assert_eq!(positions.get(0, 0), 5.0);
    assert_eq!(positions.get(0, 1), -0.5);
}

#[test]
fn test_particle_outside_on_two_axes_reported_once() {
    let domain = Domain::new(vec![10.0, 10.0]).unwrap();
    let mut positions = store(&[[-1.0, 11.0]]);

    let exited = apply_boundaries(&domain, &mut positions);

    assert_eq!(exited, vec![0]);
}

#[test]
fn test_already_masked_not_reported_again() {
    let domain = Domain::new(vec![10.0, 10.0]).unwrap();
    let mut positions = store(&[[-1.0, 5.0]]);

    assert_eq!(apply_boundaries(&domain, &mut positions), vec![0]);
    assert!(apply_boundaries(&domain, &mut positions).is_empty());
    assert!(!positions.is_active(0));
}

#[test]
fn test_three_dimensional_boundaries() {
    let domain = Domain::new(vec![1.0, 1.0, 2.0]).unwrap();
    let flat = [0.5, 0.5, 1.5, 0.5, 0.5, 2.0];
    let mut positions = PositionStore::from_matrix(DMatrix::from_row_slice(2, 3, &flat));

    let exited = apply_boundaries(&domain, &mut positions);

    assert_eq!(exited, vec![1]);
}

#[test]
fn test_non_finite_coordinates_absorb() {
    let domain = Domain::new(vec![10.0, 10.0]).unwrap();
    let mut positions = store(&[[f64::NAN, 5.0], [5.0, f64::INFINITY], [5.0, 5.0]]);

    let exited = apply_boundaries(&domain, &mut positions);

    assert_eq!(exited, vec![0, 1]);
    assert!(positions.is_active(2));
}
