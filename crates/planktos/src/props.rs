//! Named auxiliary properties attached to a swarm
//!
//! A property is either shared by the whole swarm or carries one value per
//! particle. Motion models look properties up by name (`mu`, `cov`, `tau`)
//! and prefer a per-particle value over a shared one.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::error::ConfigError;

/// Mean displacement rate of the random walk
pub const MEAN: &str = "mu";
/// Covariance rate of the random walk
pub const COVARIANCE: &str = "cov";
/// Stokes response time of inertial particles
pub const RESPONSE_TIME: &str = "tau";

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Scalar(f64),
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
}

impl PropValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PropValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            PropValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            PropValue::Matrix(m) => Some(m),
            _ => None,
        }
    }

    fn scale(&mut self, factor: f64) {
        match self {
            PropValue::Scalar(v) => *v *= factor,
            PropValue::Vector(v) => *v *= factor,
            PropValue::Matrix(m) => *m *= factor,
        }
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Scalar(value)
    }
}

impl From<DVector<f64>> for PropValue {
    fn from(value: DVector<f64>) -> Self {
        PropValue::Vector(value)
    }
}

impl From<DMatrix<f64>> for PropValue {
    fn from(value: DMatrix<f64>) -> Self {
        PropValue::Matrix(value)
    }
}

/// A property shared by the swarm or given per particle
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Shared(PropValue),
    PerParticle(Vec<PropValue>),
}

/// Property table of one swarm
#[derive(Debug, Clone, Default)]
pub struct Props {
    particle_count: usize,
    entries: HashMap<String, Property>,
}

impl Props {
    /// Creates an empty table for a swarm of `particle_count` particles
    pub fn new(particle_count: usize) -> Self {
        Self {
            particle_count,
            entries: HashMap::new(),
        }
    }

    /// Table holding the default random-walk properties
    ///
    /// `mu` is the zero vector and `cov` the identity, both shared.
    pub fn with_walk_defaults(particle_count: usize, dim: usize) -> Self {
        let mut props = Self::new(particle_count);
        props.insert_shared(MEAN, DVector::<f64>::zeros(dim));
        props.insert_shared(COVARIANCE, DMatrix::<f64>::identity(dim, dim));
        props
    }

    /// Sets a property shared by every particle, replacing any previous value
    pub fn insert_shared(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.entries
            .insert(name.into(), Property::Shared(value.into()));
    }

    /// Sets one value per particle, replacing any previous value
    ///
    /// # Examples
    ///
    /// ```
    /// use planktos::props::Props;
    ///
    /// let mut props = Props::new(3);
    /// assert!(props.insert_per_particle("tau", vec![0.1, 0.2, 0.3]).is_ok());
    /// assert!(props.insert_per_particle("tau", vec![0.1]).is_err());
    /// ```
    pub fn insert_per_particle<V: Into<PropValue>>(
        &mut self,
        name: impl Into<String>,
        values: Vec<V>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if values.len() != self.particle_count {
            return Err(ConfigError::PropertyLength {
                name,
                expected: self.particle_count,
                actual: values.len(),
            });
        }
        let values = values.into_iter().map(Into::into).collect();
        self.entries.insert(name, Property::PerParticle(values));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    /// Value of `name` that applies to particle `idx`
    pub fn value_for(&self, name: &str, idx: usize) -> Option<&PropValue> {
        match self.entries.get(name)? {
            Property::Shared(value) => Some(value),
            Property::PerParticle(values) => values.get(idx),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Property> {
        self.entries.remove(name)
    }

    /// Multiplies a property by `factor` in place
    ///
    /// Returns false if no property named `name` exists.
    pub fn scale(&mut self, name: &str, factor: f64) -> bool {
        match self.entries.get_mut(name) {
            Some(Property::Shared(value)) => {
                value.scale(factor);
                true
            }
            Some(Property::PerParticle(values)) => {
                values.iter_mut().for_each(|v| v.scale(factor));
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }
}
