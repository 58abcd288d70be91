//! Swarms of particles and the time stepper that advances them

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::boundary::apply_boundaries;
use crate::domain::Domain;
use crate::error::{ConfigError, SwarmError};
use crate::history::{History, HistoryPolicy};
use crate::init::Initializer;
use crate::motion::{GaussianWalk, MotionModel, MotionParams, MotionState, StepContext};
use crate::positions::PositionStore;
use crate::props::Props;

/// Default number of particles in a swarm
pub const DEFAULT_SWARM_SIZE: usize = 100;

/// Construction parameters of a swarm
///
/// # Examples
///
/// ```
/// use planktos::history::HistoryPolicy;
/// use planktos::swarm::SwarmConfig;
///
/// let config = SwarmConfig::new(50)
///     .with_seed(7)
///     .with_history(HistoryPolicy::Bounded(1_000));
/// assert_eq!(config.size, 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmConfig {
    /// Number of particles
    pub size: usize,
    /// Initial placement
    pub init: Initializer,
    /// Seed of the swarm's random source; drawn at random when `None`
    pub seed: Option<u64>,
    /// History retention
    pub history: HistoryPolicy,
}

impl SwarmConfig {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.history = history;
        self
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SWARM_SIZE,
            init: Initializer::Random,
            seed: None,
            history: HistoryPolicy::Unbounded,
        }
    }
}

/// Outcome of one successful step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Clock value after the step
    pub time: f64,
    /// Particles that left the domain during the step
    pub exited: Vec<usize>,
    /// Particles still in the domain after the step
    pub active: usize,
}

/// A group of particles moving through one domain
///
/// The swarm owns its positions, velocities, clock, history, properties,
/// motion model and random source. The domain is shared.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use planktos::domain::Domain;
/// use planktos::swarm::{Swarm, SwarmConfig};
///
/// let domain = Arc::new(Domain::new(vec![10.0, 10.0]).unwrap());
/// let mut swarm = Swarm::new(domain, SwarmConfig::new(20).with_seed(1)).unwrap();
///
/// swarm.step(0.1).unwrap();
/// swarm.step(0.1).unwrap();
///
/// assert_eq!(swarm.history().len(), 2);
/// assert!((swarm.time() - 0.2).abs() < 1e-12);
/// ```
pub struct Swarm {
    domain: Arc<Domain>,
    positions: PositionStore,
    velocities: DMatrix<f64>,
    time: f64,
    history: History,
    props: Props,
    motion: Box<dyn MotionModel>,
    rng: ChaChaRng,
    seed: u64,
}

impl Swarm {
    /// Creates a swarm in `domain` moving by a Gaussian random walk
    ///
    /// # Arguments
    ///
    /// * `domain` - Shared domain the swarm lives in
    /// * `config` - Size, initializer, seed and history policy
    pub fn new(domain: Arc<Domain>, config: SwarmConfig) -> Result<Self, ConfigError> {
        if config.size == 0 {
            return Err(ConfigError::EmptySwarm);
        }
        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::rng().random::<u64>();
                info!("no seed given, swarm using seed {seed}");
                seed
            }
        };
        let mut rng = ChaChaRng::seed_from_u64(seed);

        let dim = domain.dim();
        let positions = config.init.place(config.size, &domain, &mut rng)?;
        debug!(
            "created swarm of {} particles in {dim}D domain (init {:?}, seed {seed})",
            config.size, config.init
        );

        Ok(Self {
            velocities: DMatrix::zeros(config.size, dim),
            props: Props::with_walk_defaults(config.size, dim),
            history: History::new(config.history),
            time: 0.0,
            motion: Box::new(GaussianWalk::new()),
            domain,
            positions,
            rng,
            seed,
        })
    }

    /// Creates a swarm in its own 100 × 100 absorbing domain
    pub fn with_default_domain(config: SwarmConfig) -> Result<Self, ConfigError> {
        Self::new(Arc::new(Domain::default_2d()), config)
    }

    /// Replaces the motion model
    pub fn with_motion<M: MotionModel + 'static>(mut self, motion: M) -> Self {
        self.motion = Box::new(motion);
        self
    }

    pub fn set_motion(&mut self, motion: Box<dyn MotionModel>) {
        self.motion = motion;
    }

    /// Advances the swarm by `dt` using its properties for the motion model
    pub fn step(&mut self, dt: f64) -> Result<StepReport, SwarmError> {
        self.step_with(dt, &MotionParams::default())
    }

    /// Advances the swarm by `dt` with per-step motion overrides
    ///
    /// The step either completes or leaves the swarm exactly as it was
    /// (apart from the random source): positions, velocities, history and
    /// clock are only committed once the motion model and boundary checks
    /// have succeeded.
    ///
    /// # Order
    ///
    /// 1. Snapshot the pre-step positions
    /// 2. Move every active particle with the motion model
    /// 3. Mask particles that crossed an absorbing boundary
    /// 4. Append the pre-step time and snapshot to the history
    /// 5. Advance the clock by `dt`
    pub fn step_with(
        &mut self,
        dt: f64,
        params: &MotionParams,
    ) -> Result<StepReport, SwarmError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SwarmError::invalid(
                "timestep",
                format!("dt must be positive and finite, got {dt}"),
            ));
        }

        let snapshot = self.positions.clone();
        let velocities_before = self.velocities.clone();

        let ctx = StepContext {
            props: &self.props,
            params,
            time: self.time,
            dt,
        };
        let mut state = MotionState {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
        };
        if let Err(err) = self.motion.advance(&mut state, &ctx, &mut self.rng) {
            debug!("{} failed at t = {}: {err}", self.motion.name(), self.time);
            self.positions = snapshot;
            self.velocities = velocities_before;
            return Err(err);
        }

        let exited = apply_boundaries(&self.domain, &mut self.positions);
        self.history.record(self.time, snapshot);
        self.time += dt;

        let active = self.positions.active_count();
        if !exited.is_empty() {
            info!(
                "{} particles exited at t = {}, {active} remain",
                exited.len(),
                self.time
            );
        }
        debug!("stepped to t = {} with {}", self.time, self.motion.name());

        Ok(StepReport {
            time: self.time,
            exited,
            active,
        })
    }

    /// Takes `n_steps` steps of size `dt`
    ///
    /// # Returns
    ///
    /// Final time after integration
    pub fn run(&mut self, dt: f64, n_steps: usize) -> Result<f64, SwarmError> {
        for _ in 0..n_steps {
            self.step(dt)?;
        }
        Ok(self.time)
    }

    /// Moves particle `idx` to `point` without touching its exited flag
    pub fn set_position(&mut self, idx: usize, point: &[f64]) -> Result<(), SwarmError> {
        if idx >= self.len() {
            return Err(SwarmError::invalid(
                "particle index",
                format!("{idx} is out of range for {} particles", self.len()),
            ));
        }
        if point.len() != self.dim() {
            return Err(SwarmError::invalid(
                "position",
                format!("expected {} coordinates, got {}", self.dim(), point.len()),
            ));
        }
        self.positions.set_position(idx, point);
        Ok(())
    }

    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    /// Current positions, including exited particles
    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    /// Current velocities, one row per particle
    pub fn velocities(&self) -> &DMatrix<f64> {
        &self.velocities
    }

    /// Current simulation time
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut Props {
        &mut self.props
    }

    /// Number of particles, active or not
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.positions.dim()
    }

    /// Seed the swarm's random source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn motion_name(&self) -> &'static str {
        self.motion.name()
    }
}

impl fmt::Debug for Swarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Swarm")
            .field("particles", &self.len())
            .field("active", &self.positions.active_count())
            .field("dim", &self.dim())
            .field("time", &self.time)
            .field("history", &self.history.len())
            .field("motion", &self.motion.name())
            .field("seed", &self.seed)
            .finish()
    }
}
