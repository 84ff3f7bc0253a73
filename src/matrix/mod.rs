//! Travel cost matrices and the live/fallback matrix source.
//!
//! - [`CostMatrix`] — parallel dense travel-time and travel-distance grids
//! - [`MatrixProvider`] — capability trait for an external (live) provider
//! - [`HaversineFallback`] — deterministic great-circle strategy
//! - [`CostMatrixSource`] — composed source: try live, degrade to fallback

mod haversine;
mod source;

pub use haversine::{haversine_meters, HaversineFallback};
pub use source::{CostMatrixSource, MatrixResult, MatrixSource, MatrixProvider, ProviderError};

/// Parallel dense n×n travel-time and travel-distance matrices, stored in
/// row-major order and indexed by stop position.
///
/// Values are non-negative with a zero diagonal. The triangle inequality is
/// NOT assumed — live traffic data may violate it — and no consumer in this
/// crate relies on it. A matrix is owned by one solve invocation and never
/// mutated after construction.
///
/// # Examples
///
/// ```
/// use lastmile_routing::matrix::CostMatrix;
///
/// let m = CostMatrix::from_parts(
///     2,
///     vec![0.0, 60.0, 90.0, 0.0],
///     vec![0.0, 500.0, 700.0, 0.0],
/// ).unwrap();
/// assert_eq!(m.time(0, 1), 60.0);
/// assert_eq!(m.distance(1, 0), 700.0);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    time: Vec<f64>,
    distance: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a zero-initialized matrix pair of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            time: vec![0.0; size * size],
            distance: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix pair from explicit row-major grids.
    ///
    /// Returns `None` if either grid's length is not `size * size`.
    pub fn from_parts(size: usize, time: Vec<f64>, distance: Vec<f64>) -> Option<Self> {
        if time.len() != size * size || distance.len() != size * size {
            return None;
        }
        Some(Self {
            time,
            distance,
            size,
        })
    }

    /// Travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.time[from * self.size + to]
    }

    /// Travel distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance[from * self.size + to]
    }

    /// Sets both values for a directed pair (used during construction).
    pub fn set(&mut self, from: usize, to: usize, time: f64, distance: f64) {
        self.time[from * self.size + to] = time;
        self.distance[from * self.size + to] = distance;
    }

    /// Number of locations covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}
