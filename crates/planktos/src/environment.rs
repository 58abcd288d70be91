//! Environments: a domain, an optional flow field and the swarms in them

use std::sync::Arc;

use log::debug;

use crate::domain::Domain;
use crate::error::{ConfigError, SwarmError};
use crate::flow::FlowField;
use crate::motion::FlowDrift;
use crate::swarm::{StepReport, Swarm, SwarmConfig};

/// Handle of a swarm registered in an [`Environment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwarmId(pub usize);

/// Registry of swarms sharing one domain
///
/// Swarms added through [`Environment::add_swarm`] drift with the
/// environment's flow field when one is set, and perform a plain random walk
/// otherwise.
///
/// # Examples
///
/// ```
/// use planktos::domain::Domain;
/// use planktos::environment::Environment;
/// use planktos::swarm::SwarmConfig;
///
/// let mut envir = Environment::new(Domain::new(vec![10.0, 10.0]).unwrap());
/// let id = envir.add_swarm(SwarmConfig::new(10).with_seed(3)).unwrap();
///
/// envir.step_all(0.5).unwrap();
/// assert_eq!(envir.swarm(id).unwrap().time(), 0.5);
/// ```
pub struct Environment {
    domain: Arc<Domain>,
    flow: Option<Arc<dyn FlowField>>,
    swarms: Vec<Swarm>,
}

impl Environment {
    pub fn new(domain: Domain) -> Self {
        Self::from_shared(Arc::new(domain))
    }

    /// Creates an environment around an already shared domain
    pub fn from_shared(domain: Arc<Domain>) -> Self {
        Self {
            domain,
            flow: None,
            swarms: Vec::new(),
        }
    }

    /// Creates an environment with swarms attached from the start
    pub fn with_swarms(domain: Arc<Domain>, swarms: Vec<Swarm>) -> Result<Self, ConfigError> {
        let mut envir = Self::from_shared(domain);
        for swarm in swarms {
            envir.attach(swarm)?;
        }
        Ok(envir)
    }

    /// Sets the fluid velocity field
    ///
    /// The field must have as many dimensions as the domain. Swarms added
    /// afterwards advect with it; swarms already present keep their model.
    pub fn with_flow(mut self, flow: Arc<dyn FlowField>) -> Result<Self, ConfigError> {
        self.set_flow(flow)?;
        Ok(self)
    }

    pub fn set_flow(&mut self, flow: Arc<dyn FlowField>) -> Result<(), ConfigError> {
        if flow.dim() != self.domain.dim() {
            return Err(ConfigError::FlowShape(format!(
                "flow has {} dimensions, domain has {}",
                flow.dim(),
                self.domain.dim()
            )));
        }
        self.flow = Some(flow);
        Ok(())
    }

    pub fn flow(&self) -> Option<&Arc<dyn FlowField>> {
        self.flow.as_ref()
    }

    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    /// Builds a swarm in this environment and registers it
    pub fn add_swarm(&mut self, config: SwarmConfig) -> Result<SwarmId, ConfigError> {
        let mut swarm = Swarm::new(Arc::clone(&self.domain), config)?;
        if let Some(flow) = &self.flow {
            swarm.set_motion(Box::new(FlowDrift::new(Arc::clone(flow))));
        }
        self.attach(swarm)
    }

    /// Registers a swarm built elsewhere
    ///
    /// The swarm must have been built against this environment's domain.
    pub fn attach(&mut self, swarm: Swarm) -> Result<SwarmId, ConfigError> {
        if !Arc::ptr_eq(swarm.domain(), &self.domain) {
            return Err(ConfigError::ForeignDomain);
        }
        let id = SwarmId(self.swarms.len());
        debug!("registered swarm {} ({:?})", id.0, swarm);
        self.swarms.push(swarm);
        Ok(id)
    }

    pub fn swarm(&self, id: SwarmId) -> Option<&Swarm> {
        self.swarms.get(id.0)
    }

    pub fn swarm_mut(&mut self, id: SwarmId) -> Option<&mut Swarm> {
        self.swarms.get_mut(id.0)
    }

    pub fn swarms(&self) -> &[Swarm] {
        &self.swarms
    }

    /// Number of registered swarms
    pub fn len(&self) -> usize {
        self.swarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swarms.is_empty()
    }

    /// Steps every swarm by `dt`, one after another
    ///
    /// Stops at the first failing swarm. Swarms before it have already
    /// stepped; the failing swarm and those after it are unchanged.
    pub fn step_all(&mut self, dt: f64) -> Result<Vec<StepReport>, SwarmError> {
        self.swarms.iter_mut().map(|swarm| swarm.step(dt)).collect()
    }
}
