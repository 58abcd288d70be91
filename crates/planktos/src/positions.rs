//! Particle coordinates with an exited-particle mask
//!
//! Particles that leave the domain are never removed. Their row keeps the
//! last coordinates they had and an `active` flag records that they no longer
//! take part in motion or statistics.

use nalgebra::{DMatrix, DVector, RowDVector};

/// Dense N × D coordinate array plus a per-particle active flag
#[derive(Debug, Clone, PartialEq)]
pub struct PositionStore {
    coords: DMatrix<f64>,
    active: Vec<bool>,
}

impl PositionStore {
    /// Creates `count` active particles at the origin
    pub fn zeros(count: usize, dim: usize) -> Self {
        Self {
            coords: DMatrix::zeros(count, dim),
            active: vec![true; count],
        }
    }

    /// Wraps an existing coordinate matrix, every particle active
    pub fn from_matrix(coords: DMatrix<f64>) -> Self {
        let active = vec![true; coords.nrows()];
        Self { coords, active }
    }

    /// Number of particles, active or not
    pub fn len(&self) -> usize {
        self.coords.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of spatial dimensions
    pub fn dim(&self) -> usize {
        self.coords.ncols()
    }

    /// Raw coordinates, including rows of exited particles
    pub fn coords(&self) -> &DMatrix<f64> {
        &self.coords
    }

    /// Coordinates of particle `idx`
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn position(&self, idx: usize) -> RowDVector<f64> {
        self.coords.row(idx).into_owned()
    }

    /// Coordinates of particle `idx`, or `None` if it has exited
    pub fn active_position(&self, idx: usize) -> Option<RowDVector<f64>> {
        self.is_active(idx).then(|| self.position(idx))
    }

    /// Overwrites the coordinates of particle `idx`
    ///
    /// The active flag is left untouched: an exited particle stays exited.
    pub fn set_position(&mut self, idx: usize, point: &[f64]) {
        for (d, &x) in point.iter().enumerate().take(self.dim()) {
            self.coords[(idx, d)] = x;
        }
    }

    /// Adds `delta` to particle `idx`
    pub fn translate(&mut self, idx: usize, delta: &DVector<f64>) {
        for d in 0..self.dim() {
            self.coords[(idx, d)] += delta[d];
        }
    }

    pub fn get(&self, idx: usize, axis: usize) -> f64 {
        self.coords[(idx, axis)]
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.active[idx]
    }

    pub fn active_mask(&self) -> &[bool] {
        &self.active
    }

    /// Marks particle `idx` as exited across all dimensions
    ///
    /// Returns true if the particle was active before the call.
    pub fn mask(&mut self, idx: usize) -> bool {
        std::mem::replace(&mut self.active[idx], false)
    }

    /// Indices of particles still in the domain
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| a.then_some(i))
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    pub fn exited_count(&self) -> usize {
        self.len() - self.active_count()
    }

    /// Centroid of the active particles, `None` when all have exited
    pub fn mean_position(&self) -> Option<DVector<f64>> {
        let count = self.active_count();
        if count == 0 {
            return None;
        }
        let sum = self
            .active_indices()
            .map(|i| self.coords.row(i).transpose())
            .fold(DVector::zeros(self.dim()), |acc, p| acc + p);
        Some(sum / count as f64)
    }
}
