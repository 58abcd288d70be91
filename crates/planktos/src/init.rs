//! Initial particle placement strategies

use std::str::FromStr;

use log::debug;
use nalgebra::DMatrix;
use rand::Rng;
use rand_chacha::ChaChaRng;

use crate::domain::Domain;
use crate::error::ConfigError;
use crate::positions::PositionStore;

/// How a swarm's particles are placed at construction
///
/// Only [`Initializer::Random`] can be selected by tag alone; the other
/// strategies carry their own data.
///
/// # Examples
///
/// ```
/// use planktos::init::Initializer;
///
/// let init: Initializer = "random".parse().unwrap();
/// assert_eq!(init, Initializer::Random);
/// assert!("sphere".parse::<Initializer>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Initializer {
    /// Uniformly random in `[0, L[d])` along every axis
    #[default]
    Random,
    /// Every particle at the same point
    Point(Vec<f64>),
    /// Cell-centred lattice with the given number of points per axis
    Grid(Vec<usize>),
    /// One row of coordinates per particle
    Explicit(Vec<Vec<f64>>),
}

impl FromStr for Initializer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Initializer::Random),
            other => Err(ConfigError::UnknownInitializer(other.to_string())),
        }
    }
}

impl Initializer {
    /// Places `count` particles inside `domain`
    ///
    /// # Arguments
    ///
    /// * `count` - Number of particles
    /// * `domain` - Domain supplying the extent and dimension
    /// * `rng` - Random source, used only by [`Initializer::Random`]
    pub fn place(
        &self,
        count: usize,
        domain: &Domain,
        rng: &mut ChaChaRng,
    ) -> Result<PositionStore, ConfigError> {
        let dim = domain.dim();
        let coords = match self {
            Initializer::Random => {
                debug!("initializing {count} particles with uniform random positions");
                DMatrix::from_fn(count, dim, |_, d| rng.random_range(0.0..domain.length(d)))
            }
            Initializer::Point(point) => {
                if !domain.contains(point) {
                    return Err(ConfigError::InitializerShape(format!(
                        "point {point:?} is not inside the domain"
                    )));
                }
                DMatrix::from_fn(count, dim, |_, d| point[d])
            }
            Initializer::Grid(counts) => grid(count, counts, domain)?,
            Initializer::Explicit(rows) => explicit(count, rows, dim)?,
        };
        Ok(PositionStore::from_matrix(coords))
    }
}

fn grid(count: usize, counts: &[usize], domain: &Domain) -> Result<DMatrix<f64>, ConfigError> {
    let dim = domain.dim();
    if counts.len() != dim {
        return Err(ConfigError::InitializerShape(format!(
            "grid needs {dim} axis counts, got {}",
            counts.len()
        )));
    }
    let total: usize = counts.iter().product();
    if total != count {
        return Err(ConfigError::InitializerShape(format!(
            "grid {counts:?} holds {total} points but the swarm has {count} particles"
        )));
    }

    // First axis varies fastest.
    Ok(DMatrix::from_fn(count, dim, |i, d| {
        let stride: usize = counts[..d].iter().product();
        let k = (i / stride) % counts[d];
        let spacing = domain.length(d) / counts[d] as f64;
        (k as f64 + 0.5) * spacing
    }))
}

fn explicit(count: usize, rows: &[Vec<f64>], dim: usize) -> Result<DMatrix<f64>, ConfigError> {
    if rows.len() != count {
        return Err(ConfigError::InitializerShape(format!(
            "{} positions given for {count} particles",
            rows.len()
        )));
    }
    if let Some(row) = rows.iter().find(|r| r.len() != dim) {
        return Err(ConfigError::InitializerShape(format!(
            "position {row:?} does not have {dim} coordinates"
        )));
    }
    Ok(DMatrix::from_fn(count, dim, |i, d| rows[i][d]))
}
