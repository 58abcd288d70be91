//! Agent-based swarms moving through 2D and 3D flow domains
//!
//! A [`Swarm`] holds particle positions inside a [`Domain`] and advances
//! them in time with a [`MotionModel`]: a Gaussian random walk by default,
//! or advection by a [`FlowField`]. After every motion update particles that
//! crossed an absorbing boundary are masked, and the pre-step positions are
//! appended to the swarm's [`History`].
//!
//! ```
//! use std::sync::Arc;
//! use nalgebra::DVector;
//! use planktos::{Domain, MotionParams, Swarm, SwarmConfig};
//!
//! let domain = Arc::new(Domain::new(vec![10.0, 10.0]).unwrap());
//! let mut swarm = Swarm::new(domain, SwarmConfig::new(100).with_seed(42)).unwrap();
//! swarm.props_mut().scale("cov", 0.01);
//!
//! let params = MotionParams::default().with_mean(DVector::from_vec(vec![0.5, 0.0]));
//! for _ in 0..10 {
//!     swarm.step_with(0.1, &params).unwrap();
//! }
//!
//! assert_eq!(swarm.history().len(), 10);
//! ```

pub mod boundary;
pub mod config;
pub mod domain;
pub mod environment;
pub mod error;
pub mod flow;
pub mod history;
pub mod init;
pub mod motion;
pub mod positions;
pub mod props;
pub mod swarm;

#[cfg(test)]
mod boundary_test;
#[cfg(test)]
mod environment_test;

pub use config::SimulationConfig;
pub use domain::{BoundaryKind, BoundaryPair, Domain};
pub use environment::{Environment, SwarmId};
pub use error::{ConfigError, SwarmError};
pub use flow::{FlowField, GridFlow, UniformFlow};
pub use history::{History, HistoryPolicy};
pub use init::Initializer;
pub use motion::{
    FlowDrift, GaussianWalk, InertialParticles, MotionModel, MotionParams, MotionState,
    StepContext,
};
pub use positions::PositionStore;
pub use props::{PropValue, Property, Props};
pub use swarm::{StepReport, Swarm, SwarmConfig};
