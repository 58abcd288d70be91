//! Fluid velocity fields consumed by flow-driven motion models
//!
//! Fields are produced elsewhere (solvers, data readers); this module only
//! defines how motion models query them.

use nalgebra::DVector;

use crate::error::ConfigError;

pub mod grid;


pub use grid::GridFlow;

/// A fluid velocity field over the domain
pub trait FlowField: Send + Sync {
    /// Number of spatial dimensions of the field
    fn dim(&self) -> usize;

    /// Fluid velocity at `point` and `time`
    ///
    /// # Arguments
    ///
    /// * `point` - Coordinates, `self.dim()` entries
    /// * `time` - Simulation time
    fn velocity(&self, point: &[f64], time: f64) -> DVector<f64>;
}

/// The same velocity everywhere and at all times
///
/// # Examples
///
/// ```
/// use planktos::flow::{FlowField, UniformFlow};
///
/// let flow = UniformFlow::new(vec![0.5, 0.0]).unwrap();
/// assert_eq!(flow.velocity(&[3.0, 4.0], 10.0)[0], 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UniformFlow {
    velocity: DVector<f64>,
}

impl UniformFlow {
    pub fn new(velocity: Vec<f64>) -> Result<Self, ConfigError> {
        if !(2..=3).contains(&velocity.len()) {
            return Err(ConfigError::FlowShape(format!(
                "uniform flow needs 2 or 3 components, got {}",
                velocity.len()
            )));
        }
        if velocity.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::FlowShape(format!(
                "uniform flow {velocity:?} is not finite"
            )));
        }
        Ok(Self {
            velocity: DVector::from_vec(velocity),
        })
    }
}

impl FlowField for UniformFlow {
    fn dim(&self) -> usize {
        self.velocity.len()
    }

    fn velocity(&self, _point: &[f64], _time: f64) -> DVector<f64> {
        self.velocity.clone()
    }
}
