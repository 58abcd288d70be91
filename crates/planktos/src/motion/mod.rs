//! Motion models for advancing swarm particles
//!
//! A motion model moves every active particle over one time increment. The
//! stepper treats all models alike, so a random walk, flow advection or an
//! inertial-particle integrator can be swapped without touching it.

use nalgebra::{DMatrix, DVector};
use rand_chacha::ChaChaRng;

use crate::error::SwarmError;
use crate::positions::PositionStore;
use crate::props::Props;

pub mod drift;
pub mod gaussian;

#[cfg(test)]
mod gaussian_test;

pub use drift::{FlowDrift, InertialParticles};
pub use gaussian::GaussianWalk;

/// Mutable particle state handed to a motion model
pub struct MotionState<'a> {
    pub positions: &'a mut PositionStore,
    /// Per-particle velocity, same shape as the coordinates
    pub velocities: &'a mut DMatrix<f64>,
}

/// Overrides for a single step
///
/// Anything left `None` falls back to the swarm's properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionParams {
    /// Mean displacement per unit time
    pub mean: Option<DVector<f64>>,
    /// Covariance per unit time
    pub cov: Option<DMatrix<f64>>,
}

impl MotionParams {
    pub fn with_mean(mut self, mean: DVector<f64>) -> Self {
        self.mean = Some(mean);
        self
    }

    pub fn with_cov(mut self, cov: DMatrix<f64>) -> Self {
        self.cov = Some(cov);
        self
    }
}

/// Read-only inputs of one step
pub struct StepContext<'a> {
    pub props: &'a Props,
    pub params: &'a MotionParams,
    /// Simulation time at the start of the step
    pub time: f64,
    pub dt: f64,
}

/// Moves the active particles of a swarm over one time increment
pub trait MotionModel: Send + Sync {
    /// Advance every active particle by `ctx.dt`
    ///
    /// # Arguments
    ///
    /// * `state` - Positions and velocities (modified in place)
    /// * `ctx` - Properties, per-step overrides, time and timestep
    /// * `rng` - The swarm's random source
    ///
    /// Exited particles must be left untouched. On error the caller
    /// restores the state, so implementations may fail part way through.
    fn advance(
        &self,
        state: &mut MotionState<'_>,
        ctx: &StepContext<'_>,
        rng: &mut ChaChaRng,
    ) -> Result<(), SwarmError>;

    /// Short name used in log output
    fn name(&self) -> &'static str;
}
