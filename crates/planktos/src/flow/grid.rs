//! Velocity data sampled on a regular grid
//!
//! Values between grid nodes are interpolated multilinearly; values between
//! frames are interpolated linearly in time. Queries outside the grid or
//! outside the frame times are clamped to the nearest edge.

use nalgebra::DVector;

use super::FlowField;
use crate::error::ConfigError;

/// One time frame: `components[c][node]`, nodes ordered with the first axis
/// varying fastest
type Frame = Vec<Vec<f64>>;

/// Gridded, optionally time-varying, velocity field
#[derive(Debug, Clone)]
pub struct GridFlow {
    axes: Vec<Vec<f64>>,
    times: Vec<f64>,
    frames: Vec<Frame>,
}

impl GridFlow {
    /// Creates a field from grid axes and time frames
    ///
    /// # Arguments
    ///
    /// * `axes` - Node coordinates along each axis, strictly increasing,
    ///   at least two per axis
    /// * `times` - Frame times, strictly increasing, one per frame
    /// * `frames` - Per frame, one flattened array per velocity component
    pub fn new(
        axes: Vec<Vec<f64>>,
        times: Vec<f64>,
        frames: Vec<Frame>,
    ) -> Result<Self, ConfigError> {
        let dim = axes.len();
        if !(2..=3).contains(&dim) {
            return Err(ConfigError::FlowShape(format!(
                "grid must have 2 or 3 axes, got {dim}"
            )));
        }
        for (d, axis) in axes.iter().enumerate() {
            if axis.len() < 2 {
                return Err(ConfigError::FlowShape(format!(
                    "axis {d} needs at least two nodes"
                )));
            }
            if !strictly_increasing(axis) {
                return Err(ConfigError::FlowShape(format!(
                    "axis {d} is not strictly increasing"
                )));
            }
        }
        if frames.is_empty() || frames.len() != times.len() {
            return Err(ConfigError::FlowShape(format!(
                "{} frames given for {} times",
                frames.len(),
                times.len()
            )));
        }
        if !strictly_increasing(&times) {
            return Err(ConfigError::FlowShape(
                "frame times are not strictly increasing".to_string(),
            ));
        }

        let nodes: usize = axes.iter().map(Vec::len).product();
        for (f, frame) in frames.iter().enumerate() {
            if frame.len() != dim {
                return Err(ConfigError::FlowShape(format!(
                    "frame {f} has {} components, expected {dim}",
                    frame.len()
                )));
            }
            if let Some(c) = frame.iter().position(|values| values.len() != nodes) {
                return Err(ConfigError::FlowShape(format!(
                    "frame {f} component {c} does not have {nodes} values"
                )));
            }
            if let Some(c) = frame
                .iter()
                .position(|values| values.iter().any(|v| !v.is_finite()))
            {
                return Err(ConfigError::FlowShape(format!(
                    "frame {f} component {c} contains non-finite values"
                )));
            }
        }

        Ok(Self {
            axes,
            times,
            frames,
        })
    }

    /// Creates a time-invariant field from a single frame
    pub fn steady(axes: Vec<Vec<f64>>, components: Frame) -> Result<Self, ConfigError> {
        Self::new(axes, vec![0.0], vec![components])
    }

    /// Evenly spaced nodes covering `[0, length]`
    pub fn linspace(length: f64, nodes: usize) -> Vec<f64> {
        let last = nodes.saturating_sub(1).max(1) as f64;
        (0..nodes).map(|i| length * i as f64 / last).collect()
    }

    pub fn axes(&self) -> &[Vec<f64>] {
        &self.axes
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Interpolates one frame at `point`
    fn sample_frame(&self, frame: &Frame, point: &[f64]) -> DVector<f64> {
        let dim = self.dim();

        // Lower node index and weight of the upper node, per axis.
        let cells: Vec<(usize, f64)> = self
            .axes
            .iter()
            .zip(point)
            .map(|(axis, &x)| locate(axis, x))
            .collect();

        let mut out = DVector::zeros(dim);
        for corner in 0..(1usize << dim) {
            let mut weight = 1.0;
            let mut node = 0;
            let mut stride = 1;
            for (d, &(lo, t)) in cells.iter().enumerate() {
                let upper = (corner >> d) & 1 == 1;
                weight *= if upper { t } else { 1.0 - t };
                node += (lo + usize::from(upper)) * stride;
                stride *= self.axes[d].len();
            }
            if weight == 0.0 {
                continue;
            }
            for (c, values) in frame.iter().enumerate() {
                out[c] += weight * values[node];
            }
        }
        out
    }
}

impl FlowField for GridFlow {
    fn dim(&self) -> usize {
        self.axes.len()
    }

    fn velocity(&self, point: &[f64], time: f64) -> DVector<f64> {
        if self.frames.len() == 1 {
            return self.sample_frame(&self.frames[0], point);
        }
        let (k, t) = locate(&self.times, time);
        let before = self.sample_frame(&self.frames[k], point);
        if t == 0.0 {
            return before;
        }
        let after = self.sample_frame(&self.frames[k + 1], point);
        before * (1.0 - t) + after * t
    }
}

fn strictly_increasing(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite()) && values.windows(2).all(|w| w[0] < w[1])
}

/// Finds the interval of `nodes` containing `x` (clamped to the ends)
///
/// Returns the lower node index and the fractional position towards the
/// upper node. `nodes` must hold at least two increasing values.
fn locate(nodes: &[f64], x: f64) -> (usize, f64) {
    let last = nodes.len() - 1;
    if x.is_nan() || x <= nodes[0] {
        return (0, 0.0);
    }
    if x >= nodes[last] {
        return (last - 1, 1.0);
    }
    let upper = nodes.partition_point(|&n| n <= x);
    let lo = upper - 1;
    (lo, (x - nodes[lo]) / (nodes[upper] - nodes[lo]))
}
