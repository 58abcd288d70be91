//! Trajectory export for planktos swarms
//!
//! Flattens a swarm's recorded history plus its live state into
//! [`TrajectoryFrame`]s that can be written as JSON or CSV for plotting and
//! analysis tools.
//!
//! ```
//! use std::sync::Arc;
//! use planktos::{Domain, Swarm, SwarmConfig};
//!
//! let domain = Arc::new(Domain::new(vec![10.0, 10.0]).unwrap());
//! let mut swarm = Swarm::new(domain, SwarmConfig::new(3).with_seed(1)).unwrap();
//! swarm.run(0.1, 2).unwrap();
//!
//! let frames = trajectory_export::frames(&swarm);
//! assert_eq!(frames.len(), 3);
//!
//! let mut csv = Vec::new();
//! trajectory_export::write_csv(&frames, &mut csv).unwrap();
//! ```

pub mod error;
pub mod record;


pub use error::ExportError;
pub use record::{ParticleRecord, TrajectoryFrame, frames, to_json, write_csv};
