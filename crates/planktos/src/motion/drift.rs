//! Flow-driven motion models
//!
//! Both models read the local fluid velocity from a [`FlowField`].
//! [`FlowDrift`] treats particles as tracers with Brownian jitter;
//! [`InertialParticles`] lets each particle relax towards the flow with a
//! finite response time.

use std::sync::Arc;

use nalgebra::DVector;
use rand_chacha::ChaChaRng;

use super::gaussian::jittered_step;
use super::{MotionModel, MotionState, StepContext};
use crate::error::SwarmError;
use crate::flow::FlowField;
use crate::props::RESPONSE_TIME;

fn check_dim(flow: &dyn FlowField, dim: usize) -> Result<(), SwarmError> {
    if flow.dim() != dim {
        return Err(SwarmError::invalid(
            "flow field",
            format!("has {} dimensions, swarm has {dim}", flow.dim()),
        ));
    }
    Ok(())
}

/// Advection by the local flow plus a Gaussian random walk
///
/// The drift of each particle is `u(x, t) + μ`, with the jitter covariance
/// taken from `cov` exactly as in [`GaussianWalk`](super::GaussianWalk).
/// Setting `cov` to zero gives pure tracer advection (forward Euler).
#[derive(Clone)]
pub struct FlowDrift {
    flow: Arc<dyn FlowField>,
}

impl FlowDrift {
    pub fn new(flow: Arc<dyn FlowField>) -> Self {
        Self { flow }
    }
}

impl MotionModel for FlowDrift {
    fn advance(
        &self,
        state: &mut MotionState<'_>,
        ctx: &StepContext<'_>,
        rng: &mut ChaChaRng,
    ) -> Result<(), SwarmError> {
        check_dim(self.flow.as_ref(), state.positions.dim())?;
        jittered_step(state, ctx, rng, |_, point| {
            Some(self.flow.velocity(point, ctx.time))
        })
    }

    fn name(&self) -> &'static str {
        "flow drift"
    }
}

/// Heavy particles with Stokes drag towards the local flow
///
/// Each particle carries a velocity `v` that relaxes towards the fluid
/// velocity `u` with response time `τ` (the `tau` property):
///
/// ```text
/// dv/dt = (u(x, t) - v) / τ
/// dx/dt = v
/// ```
///
/// The velocity update is semi-implicit, `v' = (v + dt·u/τ) / (1 + dt/τ)`,
/// which stays stable for any `dt/τ`; positions then move by `v'·dt`.
#[derive(Clone)]
pub struct InertialParticles {
    flow: Arc<dyn FlowField>,
}

impl InertialParticles {
    pub fn new(flow: Arc<dyn FlowField>) -> Self {
        Self { flow }
    }
}

impl MotionModel for InertialParticles {
    fn advance(
        &self,
        state: &mut MotionState<'_>,
        ctx: &StepContext<'_>,
        _rng: &mut ChaChaRng,
    ) -> Result<(), SwarmError> {
        let dim = state.positions.dim();
        check_dim(self.flow.as_ref(), dim)?;
        let dt = ctx.dt;

        let indices: Vec<usize> = state.positions.active_indices().collect();
        for idx in indices {
            let tau = ctx
                .props
                .value_for(RESPONSE_TIME, idx)
                .and_then(|v| v.as_scalar())
                .ok_or_else(|| {
                    SwarmError::invalid("response time", "`tau` property is not set")
                })?;
            if !(tau.is_finite() && tau > 0.0) {
                return Err(SwarmError::invalid(
                    "response time",
                    format!("tau must be positive, got {tau}"),
                ));
            }

            let point: Vec<f64> = state.positions.position(idx).iter().copied().collect();
            let fluid = self.flow.velocity(&point, ctx.time);
            if fluid.len() != dim || fluid.iter().any(|v| !v.is_finite()) {
                return Err(SwarmError::invalid(
                    "flow velocity",
                    format!("particle {idx} sees {:?}", fluid.as_slice()),
                ));
            }
            let current: DVector<f64> = state.velocities.row(idx).transpose();
            let relaxed = (current + fluid * (dt / tau)) / (1.0 + dt / tau);
            if relaxed.iter().any(|v| !v.is_finite()) {
                return Err(SwarmError::invalid(
                    "velocity",
                    format!("particle {idx} produced a non-finite velocity"),
                ));
            }

            state.positions.translate(idx, &(&relaxed * dt));
            state.velocities.set_row(idx, &relaxed.transpose());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "inertial particles"
    }
}
