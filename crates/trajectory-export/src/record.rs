//! Per-frame particle records and their JSON/CSV encodings

use std::io::Write;

use planktos::{PositionStore, Swarm};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// One particle at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleRecord {
    /// Row of the particle in the swarm
    pub index: usize,
    pub position: Vec<f64>,
    /// `false` once the particle has left through an absorbing boundary
    pub active: bool,
}

/// Every particle of a swarm at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryFrame {
    pub time: f64,
    pub particles: Vec<ParticleRecord>,
}

impl TrajectoryFrame {
    /// Captures `positions` as the frame at `time`
    pub fn from_positions(time: f64, positions: &PositionStore) -> Self {
        let particles = (0..positions.len())
            .map(|index| ParticleRecord {
                index,
                position: positions.position(index).iter().copied().collect(),
                active: positions.is_active(index),
            })
            .collect();
        Self { time, particles }
    }

    /// Spatial dimension of the frame, taken from its first particle
    pub fn dim(&self) -> Option<usize> {
        self.particles.first().map(|p| p.position.len())
    }
}

/// Chronological frames of a swarm: its recorded history followed by the
/// current state
///
/// A swarm with bounded history only yields the retained entries.
pub fn frames(swarm: &Swarm) -> Vec<TrajectoryFrame> {
    swarm
        .history()
        .iter()
        .map(|(time, positions)| TrajectoryFrame::from_positions(time, positions))
        .chain(std::iter::once(TrajectoryFrame::from_positions(
            swarm.time(),
            swarm.positions(),
        )))
        .collect()
}

/// Encodes `frames` as a JSON array
pub fn to_json(frames: &[TrajectoryFrame]) -> Result<String, ExportError> {
    Ok(serde_json::to_string(frames)?)
}

/// Writes `frames` as CSV, one row per particle per frame
///
/// Columns are `time,particle,active,x,y` with a trailing `z` for 3D data.
/// Every frame must share the dimension of the first non-empty one.
///
/// # Arguments
///
/// * `frames` - Frames to write, in order
/// * `writer` - Destination; not flushed
pub fn write_csv<W: Write>(frames: &[TrajectoryFrame], mut writer: W) -> Result<(), ExportError> {
    let dim = frames.iter().find_map(TrajectoryFrame::dim).unwrap_or(2);

    let axes = ["x", "y", "z"];
    write!(writer, "time,particle,active")?;
    for axis in axes.iter().take(dim) {
        write!(writer, ",{axis}")?;
    }
    writeln!(writer)?;

    for frame in frames {
        for particle in &frame.particles {
            if particle.position.len() != dim {
                return Err(ExportError::MixedDimensions {
                    time: frame.time,
                    expected: dim,
                    actual: particle.position.len(),
                });
            }
            write!(
                writer,
                "{},{},{}",
                frame.time,
                particle.index,
                u8::from(particle.active)
            )?;
            for x in &particle.position {
                write!(writer, ",{x}")?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
