//! Simulation setup from JSON
//!
//! A [`SimulationConfig`] describes the domain, an optional uniform flow and
//! the swarms to create. Every field has a default, so `{}` builds a
//! 100 × 100 absorbing domain with no swarms.
//!
//! ```json
//! {
//!   "lengths": [10.0, 10.0],
//!   "boundaries": [["zero", "zero"], ["zero", "zero"]],
//!   "swarms": [
//!     { "size": 5, "seed": 42, "init": { "point": [5.0, 5.0] }, "cov": [[0.01, 0.0], [0.0, 0.01]] }
//!   ]
//! }
//! ```

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_LENGTH, Domain};
use crate::environment::Environment;
use crate::error::ConfigError;
use crate::flow::{FlowField, UniformFlow};
use crate::history::HistoryPolicy;
use crate::init::Initializer;
use crate::motion::{FlowDrift, GaussianWalk, InertialParticles};
use crate::props::{COVARIANCE, MEAN, RESPONSE_TIME};
use crate::swarm::{DEFAULT_SWARM_SIZE, SwarmConfig};

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Domain extent per axis
    #[serde(default = "default_lengths")]
    pub lengths: Vec<f64>,
    /// `[low, high]` boundary names per axis; missing axes are absorbing
    #[serde(default)]
    pub boundaries: Vec<[String; 2]>,
    /// Uniform fluid velocity, if any
    #[serde(default)]
    pub flow: Option<Vec<f64>>,
    #[serde(default)]
    pub swarms: Vec<SwarmSpec>,
}

/// Configuration of one swarm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmSpec {
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub init: InitSpec,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Keep only the most recent entries of the history
    #[serde(default)]
    pub history_capacity: Option<usize>,
    /// Motion model; defaults to flow drift when a flow is set, else a walk
    #[serde(default)]
    pub motion: Option<MotionKind>,
    /// Shared mean drift rate
    #[serde(default)]
    pub mu: Option<Vec<f64>>,
    /// Shared covariance rate, row by row
    #[serde(default)]
    pub cov: Option<Vec<Vec<f64>>>,
    /// Shared response time for inertial particles
    #[serde(default)]
    pub tau: Option<f64>,
}

impl Default for SwarmSpec {
    fn default() -> Self {
        Self {
            size: default_size(),
            init: InitSpec::default(),
            seed: None,
            history_capacity: None,
            motion: None,
            mu: None,
            cov: None,
            tau: None,
        }
    }
}

/// Initial placement as written in configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitSpec {
    #[default]
    Random,
    Point(Vec<f64>),
    Grid(Vec<usize>),
    Explicit(Vec<Vec<f64>>),
}

impl From<InitSpec> for Initializer {
    fn from(spec: InitSpec) -> Self {
        match spec {
            InitSpec::Random => Initializer::Random,
            InitSpec::Point(point) => Initializer::Point(point),
            InitSpec::Grid(counts) => Initializer::Grid(counts),
            InitSpec::Explicit(rows) => Initializer::Explicit(rows),
        }
    }
}

/// Motion model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionKind {
    Walk,
    Drift,
    Inertial,
}

fn default_lengths() -> Vec<f64> {
    vec![DEFAULT_LENGTH, DEFAULT_LENGTH]
}

fn default_size() -> usize {
    DEFAULT_SWARM_SIZE
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lengths: default_lengths(),
            boundaries: Vec::new(),
            flow: None,
            swarms: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates the configuration and builds the environment it describes
    pub fn build(&self) -> Result<Environment, ConfigError> {
        let names: Vec<(&str, &str)> = self
            .boundaries
            .iter()
            .map(|[low, high]| (low.as_str(), high.as_str()))
            .collect();
        let domain = Domain::from_names(self.lengths.clone(), &names)?;
        let mut envir = Environment::new(domain);

        let flow: Option<Arc<dyn FlowField>> = match &self.flow {
            Some(velocity) => Some(Arc::new(UniformFlow::new(velocity.clone())?)),
            None => None,
        };
        if let Some(flow) = &flow {
            envir.set_flow(Arc::clone(flow))?;
        }

        for spec in &self.swarms {
            let mut config = SwarmConfig::new(spec.size).with_init(spec.init.clone().into());
            if let Some(seed) = spec.seed {
                config = config.with_seed(seed);
            }
            if let Some(capacity) = spec.history_capacity {
                config = config.with_history(HistoryPolicy::Bounded(capacity));
            }

            let id = envir.add_swarm(config)?;
            let Some(swarm) = envir.swarm_mut(id) else {
                continue;
            };

            match (spec.motion, &flow) {
                (None, _) => {}
                (Some(MotionKind::Walk), _) => swarm.set_motion(Box::new(GaussianWalk::new())),
                (Some(MotionKind::Drift), Some(flow)) => {
                    swarm.set_motion(Box::new(FlowDrift::new(Arc::clone(flow))))
                }
                (Some(MotionKind::Inertial), Some(flow)) => {
                    swarm.set_motion(Box::new(InertialParticles::new(Arc::clone(flow))))
                }
                (Some(kind), None) => {
                    return Err(ConfigError::FlowShape(format!(
                        "motion {kind:?} needs a flow field"
                    )));
                }
            }

            let dim = swarm.dim();
            if let Some(mu) = &spec.mu {
                if mu.len() != dim {
                    return Err(ConfigError::InvalidProperty {
                        name: MEAN.to_string(),
                        reason: format!("{} components for a {dim}D domain", mu.len()),
                    });
                }
                swarm
                    .props_mut()
                    .insert_shared(MEAN, DVector::from_column_slice(mu));
            }
            if let Some(rows) = &spec.cov {
                let cov = matrix_from_rows(COVARIANCE, rows, dim)?;
                swarm.props_mut().insert_shared(COVARIANCE, cov);
            }
            if let Some(tau) = spec.tau {
                swarm.props_mut().insert_shared(RESPONSE_TIME, tau);
            }
        }

        Ok(envir)
    }
}

fn matrix_from_rows(name: &str, rows: &[Vec<f64>], dim: usize) -> Result<DMatrix<f64>, ConfigError> {
    if rows.len() != dim || rows.iter().any(|r| r.len() != dim) {
        return Err(ConfigError::InvalidProperty {
            name: name.to_string(),
            reason: format!("expected a {dim}x{dim} matrix"),
        });
    }
    Ok(DMatrix::from_fn(dim, dim, |i, j| rows[i][j]))
}
