use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::error::SwarmError;
use crate::motion::gaussian::covariance_factor;
use crate::motion::{GaussianWalk, MotionModel, MotionParams, MotionState, StepContext};
use crate::positions::PositionStore;
use crate::props::{COVARIANCE, Props};

/// Runs one walk step on `positions` and returns the velocities
fn walk(
    positions: &mut PositionStore,
    props: &Props,
    params: &MotionParams,
    dt: f64,
    seed: u64,
) -> Result<DMatrix<f64>, SwarmError> {
    let mut velocities = DMatrix::zeros(positions.len(), positions.dim());
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let ctx = StepContext {
        props,
        params,
        time: 0.0,
        dt,
    };
    let mut state = MotionState {
        positions,
        velocities: &mut velocities,
    };
    GaussianWalk::new().advance(&mut state, &ctx, &mut rng)?;
    Ok(velocities)
}

fn deterministic_params(mean: &[f64]) -> MotionParams {
    let dim = mean.len();
    MotionParams::default()
        .with_mean(DVector::from_column_slice(mean))
        .with_cov(DMatrix::zeros(dim, dim))
}

#[test]
fn test_zero_covariance_moves_by_mean_times_dt() {
    let mut positions = PositionStore::from_matrix(DMatrix::from_row_slice(
        2,
        2,
        &[1.0, 1.0, 4.0, 2.0],
    ));
    let props = Props::with_walk_defaults(2, 2);

    let velocities = walk(
        &mut positions,
        &props,
        &deterministic_params(&[2.0, -1.0]),
        0.25,
        1,
    )
    .unwrap();

    assert_relative_eq!(positions.get(0, 0), 1.5, epsilon = 1e-12);
    assert_relative_eq!(positions.get(0, 1), 0.75, epsilon = 1e-12);
    assert_relative_eq!(positions.get(1, 0), 4.5, epsilon = 1e-12);
    assert_relative_eq!(velocities[(1, 0)], 2.0, epsilon = 1e-12);
    assert_relative_eq!(velocities[(1, 1)], -1.0, epsilon = 1e-12);
}

#[test]
fn test_masked_particles_do_not_move() {
    let mut positions = PositionStore::zeros(3, 2);
    positions.mask(1);
    let props = Props::with_walk_defaults(3, 2);

    let velocities = walk(&mut positions, &props, &MotionParams::default(), 1.0, 9).unwrap();

    assert_eq!(positions.get(1, 0), 0.0);
    assert_eq!(positions.get(1, 1), 0.0);
    assert_eq!(velocities[(1, 0)], 0.0);
    assert_ne!(positions.get(0, 0), 0.0);
}

#[test]
fn test_sample_moments_match_scaled_covariance() {
    let n = 20_000;
    let dt = 0.5;
    let mut positions = PositionStore::zeros(n, 2);
    let mut props = Props::with_walk_defaults(n, 2);
    props.insert_shared(COVARIANCE, DMatrix::from_row_slice(2, 2, &[4.0, 0.8, 0.8, 1.0]));
    props.insert_shared("mu", DVector::from_vec(vec![1.0, -2.0]));

    walk(&mut positions, &props, &MotionParams::default(), dt, 42).unwrap();

    let coords = positions.coords();
    let mean_x = coords.column(0).mean();
    let mean_y = coords.column(1).mean();
    assert!((mean_x - 0.5).abs() < 0.05, "mean x {mean_x}");
    assert!((mean_y + 1.0).abs() < 0.05, "mean y {mean_y}");

    let var_x = coords.column(0).map(|x| (x - mean_x).powi(2)).mean();
    let var_y = coords.column(1).map(|y| (y - mean_y).powi(2)).mean();
    let cov_xy = coords
        .column(0)
        .iter()
        .zip(coords.column(1).iter())
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / n as f64;
    assert!((var_x - 2.0).abs() < 0.1, "var x {var_x}");
    assert!((var_y - 0.5).abs() < 0.03, "var y {var_y}");
    assert!((cov_xy - 0.4).abs() < 0.04, "cov xy {cov_xy}");
}

#[test]
fn test_per_particle_covariance() {
    let mut positions = PositionStore::zeros(2, 2);
    let mut props = Props::with_walk_defaults(2, 2);
    props
        .insert_per_particle(
            COVARIANCE,
            vec![DMatrix::zeros(2, 2), DMatrix::identity(2, 2)],
        )
        .unwrap();
    let params = MotionParams::default().with_mean(DVector::from_vec(vec![1.0, 0.0]));

    walk(&mut positions, &props, &params, 1.0, 5).unwrap();

    assert_relative_eq!(positions.get(0, 0), 1.0, epsilon = 1e-12);
    assert_relative_eq!(positions.get(0, 1), 0.0, epsilon = 1e-12);
    assert_ne!(positions.get(1, 1), 0.0);
}

#[test]
fn test_scalar_covariance_property() {
    let mut positions = PositionStore::zeros(1, 2);
    let mut props = Props::with_walk_defaults(1, 2);
    props.insert_shared(COVARIANCE, 0.0);

    walk(&mut positions, &props, &MotionParams::default(), 1.0, 5).unwrap();

    assert_eq!(positions.get(0, 0), 0.0);
}

#[test]
fn test_same_seed_same_walk() {
    let props = Props::with_walk_defaults(10, 2);
    let mut a = PositionStore::zeros(10, 2);
    let mut b = PositionStore::zeros(10, 2);

    walk(&mut a, &props, &MotionParams::default(), 0.1, 77).unwrap();
    walk(&mut b, &props, &MotionParams::default(), 0.1, 77).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_mean_dimension_mismatch() {
    let mut positions = PositionStore::zeros(1, 2);
    let props = Props::with_walk_defaults(1, 2);
    let params = MotionParams::default().with_mean(DVector::from_vec(vec![1.0, 0.0, 0.0]));

    let result = walk(&mut positions, &props, &params, 1.0, 1);

    assert!(matches!(
        result,
        Err(SwarmError::InvalidParameter { what: "mean", .. })
    ));
}

#[test]
fn test_nan_mean_rejected() {
    let mut positions = PositionStore::zeros(1, 2);
    let props = Props::with_walk_defaults(1, 2);
    let params = MotionParams::default().with_mean(DVector::from_vec(vec![f64::NAN, 0.0]));

    assert!(walk(&mut positions, &props, &params, 1.0, 1).is_err());
}

#[test]
fn test_factor_reproduces_positive_definite_covariance() {
    let cov = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 1.0]);
    let l = covariance_factor(&cov, 2, 0.1).unwrap();

    let product = &l * l.transpose();
    assert_relative_eq!(product, cov * 0.1, epsilon = 1e-12);
}

#[test]
fn test_factor_handles_singular_covariance() {
    let cov = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
    let l = covariance_factor(&cov, 2, 2.0).unwrap();

    let product = &l * l.transpose();
    assert_relative_eq!(product, cov * 2.0, epsilon = 1e-10);
}

#[test]
fn test_factor_of_zero_covariance_is_zero() {
    let l = covariance_factor(&DMatrix::zeros(3, 3), 3, 1.0).unwrap();

    assert!(l.iter().all(|&v| v == 0.0));
}

#[test]
fn test_factor_rejects_invalid_covariance() {
    let asymmetric = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.0, 1.0]);
    let indefinite = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]);
    let non_finite = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, f64::INFINITY]);
    let non_square = DMatrix::<f64>::zeros(2, 3);

    assert!(covariance_factor(&asymmetric, 2, 1.0).is_err());
    assert!(covariance_factor(&indefinite, 2, 1.0).is_err());
    assert!(covariance_factor(&non_finite, 2, 1.0).is_err());
    assert!(covariance_factor(&non_square, 2, 1.0).is_err());
}

#[test]
fn test_factor_rejects_wrong_dimension() {
    let result = covariance_factor(&DMatrix::identity(3, 3), 2, 1.0);

    assert!(matches!(
        result,
        Err(SwarmError::InvalidParameter {
            what: "covariance",
            ..
        })
    ));
}

#[test]
fn test_covariance_override_dimension_mismatch() {
    let mut positions = PositionStore::zeros(2, 2);
    let props = Props::with_walk_defaults(2, 2);
    let params = MotionParams::default().with_cov(DMatrix::identity(3, 3));

    let result = walk(&mut positions, &props, &params, 0.1, 1);

    assert!(matches!(
        result,
        Err(SwarmError::InvalidParameter {
            what: "covariance",
            ..
        })
    ));
}

#[test]
fn test_covariance_property_dimension_mismatch() {
    let mut positions = PositionStore::zeros(2, 2);
    let mut props = Props::with_walk_defaults(2, 2);
    props.insert_shared(COVARIANCE, DMatrix::<f64>::identity(3, 3));

    let shared = walk(&mut positions, &props, &MotionParams::default(), 0.1, 1);
    assert!(shared.is_err());

    props
        .insert_per_particle(
            COVARIANCE,
            vec![DMatrix::<f64>::identity(2, 2), DMatrix::identity(3, 3)],
        )
        .unwrap();
    let per_particle = walk(&mut positions, &props, &MotionParams::default(), 0.1, 1);
    assert!(per_particle.is_err());
}
