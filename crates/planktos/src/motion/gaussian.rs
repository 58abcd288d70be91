//! Multivariate Gaussian random walk
//!
//! Each active particle is displaced by an independent draw from
//! `N(μ·dt, Σ·dt)`. Sampling uses a square-root factor `L` with
//! `L·Lᵀ = Σ·dt`, so a zero covariance gives a deterministic drift.

use log::warn;
use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_chacha::ChaChaRng;
use rand_distr::StandardNormal;

use super::{MotionModel, MotionState, StepContext};
use crate::error::SwarmError;
use crate::props::{COVARIANCE, MEAN, PropValue, Property};

/// Relative tolerance for symmetry and for negative eigenvalues
const PSD_TOLERANCE: f64 = 1e-10;

/// Brownian motion with drift, the default motion model
///
/// The mean and covariance rates come from the step's [`MotionParams`]
/// when given, otherwise from the `mu` and `cov` swarm properties, otherwise
/// zero drift and unit covariance.
///
/// [`MotionParams`]: super::MotionParams
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianWalk;

impl GaussianWalk {
    pub fn new() -> Self {
        Self
    }
}

impl MotionModel for GaussianWalk {
    fn advance(
        &self,
        state: &mut MotionState<'_>,
        ctx: &StepContext<'_>,
        rng: &mut ChaChaRng,
    ) -> Result<(), SwarmError> {
        jittered_step(state, ctx, rng, |_, _| None)
    }

    fn name(&self) -> &'static str {
        "gaussian walk"
    }
}

/// Euler–Maruyama step shared by the random-walk style models
///
/// `extra_drift` may add a velocity (e.g. the local flow) to the mean of
/// particle `idx` at `point`.
pub(crate) fn jittered_step<F>(
    state: &mut MotionState<'_>,
    ctx: &StepContext<'_>,
    rng: &mut ChaChaRng,
    extra_drift: F,
) -> Result<(), SwarmError>
where
    F: Fn(usize, &[f64]) -> Option<DVector<f64>>,
{
    let dim = state.positions.dim();
    let dt = ctx.dt;

    // Factor once when every particle shares the covariance.
    let shared_factor = match (&ctx.params.cov, ctx.props.get(COVARIANCE)) {
        (Some(cov), _) => Some(covariance_factor(cov, dim, dt)?),
        (None, Some(Property::PerParticle(_))) => None,
        (None, Some(Property::Shared(value))) => {
            Some(covariance_factor(&covariance_matrix(value, dim)?, dim, dt)?)
        }
        (None, None) => Some(covariance_factor(&DMatrix::identity(dim, dim), dim, dt)?),
    };

    let indices: Vec<usize> = state.positions.active_indices().collect();
    for idx in indices {
        let mut mean = mean_for(ctx, idx, dim)?;
        let point: Vec<f64> = state.positions.position(idx).iter().copied().collect();
        if let Some(drift) = extra_drift(idx, &point) {
            if drift.len() != dim {
                return Err(SwarmError::invalid(
                    "flow velocity",
                    format!("has {} components, expected {dim}", drift.len()),
                ));
            }
            mean += drift;
        }

        let particle_factor;
        let factor = match &shared_factor {
            Some(factor) => factor,
            None => {
                let value = ctx
                    .props
                    .value_for(COVARIANCE, idx)
                    .ok_or_else(|| SwarmError::invalid("covariance", "missing value"))?;
                particle_factor = covariance_factor(&covariance_matrix(value, dim)?, dim, dt)?;
                &particle_factor
            }
        };

        let z = DVector::from_fn(dim, |_, _| rng.sample::<f64, _>(StandardNormal));
        let displacement = mean * dt + factor * z;
        if displacement.iter().any(|v| !v.is_finite()) {
            return Err(SwarmError::invalid(
                "displacement",
                format!("particle {idx} produced a non-finite step"),
            ));
        }

        state.positions.translate(idx, &displacement);
        state
            .velocities
            .set_row(idx, &(displacement / dt).transpose());
    }
    Ok(())
}

/// Mean drift rate for particle `idx`
fn mean_for(ctx: &StepContext<'_>, idx: usize, dim: usize) -> Result<DVector<f64>, SwarmError> {
    let mean = match (&ctx.params.mean, ctx.props.value_for(MEAN, idx)) {
        (Some(mean), _) => mean.clone(),
        (None, Some(PropValue::Vector(mean))) => mean.clone(),
        (None, Some(other)) => {
            return Err(SwarmError::invalid(
                "mean",
                format!("expected a vector, got {other:?}"),
            ));
        }
        (None, None) => DVector::zeros(dim),
    };
    if mean.len() != dim {
        return Err(SwarmError::invalid(
            "mean",
            format!("has {} components, expected {dim}", mean.len()),
        ));
    }
    if mean.iter().any(|v| !v.is_finite()) {
        return Err(SwarmError::invalid("mean", "contains non-finite entries"));
    }
    Ok(mean)
}

/// Interprets a property as a covariance matrix
///
/// A scalar `s` stands for `s·I`.
fn covariance_matrix(value: &PropValue, dim: usize) -> Result<DMatrix<f64>, SwarmError> {
    match value {
        PropValue::Matrix(m) => Ok(m.clone()),
        PropValue::Scalar(s) => Ok(DMatrix::identity(dim, dim) * *s),
        PropValue::Vector(_) => Err(SwarmError::invalid(
            "covariance",
            "expected a matrix or scalar, got a vector",
        )),
    }
}

/// Square-root factor `L` of `cov·dt` with `L·Lᵀ = cov·dt`
///
/// `cov` must be `dim × dim`.
///
/// Positive-definite matrices use a Cholesky factorization. Singular
/// positive-semi-definite matrices (including zero) fall back to a symmetric
/// eigendecomposition. Anything else is rejected.
pub fn covariance_factor(
    cov: &DMatrix<f64>,
    dim: usize,
    dt: f64,
) -> Result<DMatrix<f64>, SwarmError> {
    if !cov.is_square() {
        return Err(SwarmError::invalid(
            "covariance",
            format!("{}x{} matrix is not square", cov.nrows(), cov.ncols()),
        ));
    }
    if cov.nrows() != dim {
        return Err(SwarmError::invalid(
            "covariance",
            format!("{0}x{0} matrix for a {dim}D swarm", cov.nrows()),
        ));
    }
    if cov.iter().any(|v| !v.is_finite()) {
        return Err(SwarmError::invalid("covariance", "contains non-finite entries"));
    }

    let scaled = cov * dt;
    let scale = scaled.amax().max(f64::MIN_POSITIVE);
    if (&scaled - scaled.transpose()).amax() > PSD_TOLERANCE * scale {
        return Err(SwarmError::invalid("covariance", "matrix is not symmetric"));
    }

    if let Some(chol) = scaled.clone().cholesky() {
        return Ok(chol.l());
    }

    let eigen = scaled.symmetric_eigen();
    let min = eigen.eigenvalues.min();
    if min < -PSD_TOLERANCE * scale {
        return Err(SwarmError::invalid(
            "covariance",
            format!("matrix is not positive semi-definite (eigenvalue {min:e})"),
        ));
    }
    if min < 0.0 {
        warn!("clamping covariance eigenvalue {min:e} to zero");
    }
    let roots = eigen.eigenvalues.map(|l| l.max(0.0).sqrt());
    Ok(&eigen.eigenvectors * DMatrix::from_diagonal(&roots))
}
