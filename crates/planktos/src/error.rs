//! Error types for swarm construction and stepping
//!
//! Configuration problems are reported as [`ConfigError`] at construction
//! time. Problems found while advancing a swarm are [`SwarmError`]s.

use thiserror::Error;

/// A swarm, domain, environment or flow field could not be built
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("boundary condition `{0}` is not implemented")]
    UnsupportedBoundary(String),

    #[error("domain must have 2 or 3 dimensions, got {0}")]
    UnsupportedDimension(usize),

    #[error("domain length along axis {axis} must be positive and finite, got {value}")]
    InvalidLength { axis: usize, value: f64 },

    #[error("expected {expected} boundary pairs, got {actual}")]
    BoundaryCount { expected: usize, actual: usize },

    #[error("initialization method `{0}` is not implemented")]
    UnknownInitializer(String),

    #[error("initializer does not fit the swarm: {0}")]
    InitializerShape(String),

    #[error("property `{name}` has {actual} values but the swarm has {expected} particles")]
    PropertyLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid property `{name}`: {reason}")]
    InvalidProperty { name: String, reason: String },

    #[error("swarm was built against a different domain than this environment")]
    ForeignDomain,

    #[error("flow field does not fit: {0}")]
    FlowShape(String),

    #[error("swarm must contain at least one particle")]
    EmptySwarm,

    #[error("invalid simulation config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A step could not be carried out
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("invalid {what}: {reason}")]
    InvalidParameter { what: &'static str, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SwarmError {
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            what,
            reason: reason.into(),
        }
    }
}
