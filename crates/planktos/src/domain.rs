//! Spatial extent and boundary conditions of a simulation domain
//!
//! A domain is an axis-aligned box `[0, L₀) × [0, L₁) (× [0, L₂))` with one
//! boundary condition at each end of every axis.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::ConfigError;

/// Boundary condition applied where particles cross the end of an axis
///
/// # Examples
///
/// ```
/// use planktos::domain::BoundaryKind;
///
/// let kind: BoundaryKind = "zero".parse().unwrap();
/// assert_eq!(kind, BoundaryKind::Absorbing);
/// assert!("periodic".parse::<BoundaryKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryKind {
    /// Particles that reach the boundary leave the simulation
    #[default]
    Absorbing,
}

impl BoundaryKind {
    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryKind::Absorbing => "zero",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" | "absorbing" => Ok(BoundaryKind::Absorbing),
            other => Err(ConfigError::UnsupportedBoundary(other.to_string())),
        }
    }
}

/// Boundary conditions at the low and high end of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryPair {
    pub low: BoundaryKind,
    pub high: BoundaryKind,
}

impl BoundaryPair {
    pub fn new(low: BoundaryKind, high: BoundaryKind) -> Self {
        Self { low, high }
    }

    /// Absorbing at both ends
    pub fn absorbing() -> Self {
        Self::new(BoundaryKind::Absorbing, BoundaryKind::Absorbing)
    }
}

/// Default domain extent used by [`Domain::default_2d`]
pub const DEFAULT_LENGTH: f64 = 100.0;

/// Rectangular (2D) or box-shaped (3D) simulation domain
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    lengths: Vec<f64>,
    boundaries: Vec<BoundaryPair>,
}

impl Domain {
    /// Creates a domain with absorbing boundaries on every axis
    ///
    /// # Arguments
    ///
    /// * `lengths` - Extent along each axis (2 or 3 entries, all positive)
    ///
    /// # Examples
    ///
    /// ```
    /// use planktos::domain::Domain;
    ///
    /// let domain = Domain::new(vec![10.0, 20.0]).unwrap();
    /// assert_eq!(domain.dim(), 2);
    /// assert_eq!(domain.length(1), 20.0);
    /// ```
    pub fn new(lengths: Vec<f64>) -> Result<Self, ConfigError> {
        let boundaries = vec![BoundaryPair::absorbing(); lengths.len()];
        Self::with_boundaries(lengths, boundaries)
    }

    /// Creates a domain with an explicit boundary pair per axis
    pub fn with_boundaries(
        lengths: Vec<f64>,
        boundaries: Vec<BoundaryPair>,
    ) -> Result<Self, ConfigError> {
        let dim = lengths.len();
        if !(2..=3).contains(&dim) {
            return Err(ConfigError::UnsupportedDimension(dim));
        }
        if let Some((axis, &value)) = lengths
            .iter()
            .enumerate()
            .find(|(_, l)| !(l.is_finite() && **l > 0.0))
        {
            return Err(ConfigError::InvalidLength { axis, value });
        }
        if boundaries.len() != dim {
            return Err(ConfigError::BoundaryCount {
                expected: dim,
                actual: boundaries.len(),
            });
        }

        debug!("created {dim}D domain {lengths:?} with boundaries {boundaries:?}");
        Ok(Self {
            lengths,
            boundaries,
        })
    }

    /// Creates a domain from boundary names, one `(low, high)` pair per axis
    ///
    /// Axes without an entry in `names` default to absorbing. Any name
    /// outside the supported set is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use planktos::domain::Domain;
    ///
    /// assert!(Domain::from_names(vec![5.0, 5.0], &[("zero", "zero")]).is_ok());
    /// assert!(Domain::from_names(vec![5.0, 5.0], &[("zero", "sticky")]).is_err());
    /// ```
    pub fn from_names(lengths: Vec<f64>, names: &[(&str, &str)]) -> Result<Self, ConfigError> {
        if names.len() > lengths.len() {
            return Err(ConfigError::BoundaryCount {
                expected: lengths.len(),
                actual: names.len(),
            });
        }
        let mut boundaries = names
            .iter()
            .map(|(low, high)| Ok(BoundaryPair::new(low.parse()?, high.parse()?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        boundaries.resize(lengths.len(), BoundaryPair::absorbing());
        Self::with_boundaries(lengths, boundaries)
    }

    /// The 100 × 100 absorbing domain swarms used when no domain is given
    pub fn default_2d() -> Self {
        Self {
            lengths: vec![DEFAULT_LENGTH, DEFAULT_LENGTH],
            boundaries: vec![BoundaryPair::absorbing(); 2],
        }
    }

    /// Number of spatial dimensions
    pub fn dim(&self) -> usize {
        self.lengths.len()
    }

    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Extent along `axis`
    ///
    /// # Panics
    ///
    /// Panics if `axis >= self.dim()`.
    pub fn length(&self, axis: usize) -> f64 {
        self.lengths[axis]
    }

    pub fn boundaries(&self) -> &[BoundaryPair] {
        &self.boundaries
    }

    /// Whether `point` lies strictly inside the domain
    ///
    /// Points on a face count as outside, matching where absorbing
    /// boundaries remove particles.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(&self.lengths)
                .all(|(&x, &l)| x > 0.0 && x < l)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::default_2d()
    }
}
