//! Deterministic great-circle fallback strategy.
//!
//! Computes pairwise haversine distances and derives travel time from a
//! configured constant average speed. Pure in terms of coordinates only:
//! the same location set always yields the same matrices.

use crate::models::Location;

use super::source::{MatrixProvider, ProviderError};
use super::CostMatrix;

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two locations, in meters.
///
/// Symmetric, zero for identical points, and triangle-inequality-respecting
/// (it is a metric on the sphere).
///
/// # Examples
///
/// ```
/// use lastmile_routing::matrix::haversine_meters;
/// use lastmile_routing::models::Location;
///
/// let berlin = Location::new(52.5200, 13.4050);
/// let potsdam = Location::new(52.3906, 13.0645);
/// let d = haversine_meters(&berlin, &potsdam);
/// assert!(d > 25_000.0 && d < 30_000.0);
/// ```
pub fn haversine_meters(a: &Location, b: &Location) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = (b.lat() - a.lat()).to_radians();
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Fallback matrix strategy: haversine distance over a constant speed.
///
/// Always succeeds and is deterministic, which is what makes it a safe
/// substitute when the live provider fails.
///
/// # Examples
///
/// ```
/// use lastmile_routing::matrix::{HaversineFallback, MatrixProvider};
/// use lastmile_routing::models::Location;
///
/// let fallback = HaversineFallback::new(30.0);
/// let locations = vec![
///     Location::new(52.5200, 13.4050),
///     Location::new(52.5300, 13.4100),
/// ];
/// let m = fallback.get_matrices(&locations).unwrap();
/// assert_eq!(m.size(), 2);
/// assert_eq!(m.time(0, 0), 0.0);
/// assert!(m.time(0, 1) > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct HaversineFallback {
    speed_mps: f64,
}

impl HaversineFallback {
    /// Creates a fallback strategy with the given average speed in km/h.
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_mps: speed_kmh * 1000.0 / 3600.0,
        }
    }

    /// Average speed in meters per second.
    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }
}

impl MatrixProvider for HaversineFallback {
    fn get_matrices(&self, locations: &[Location]) -> Result<CostMatrix, ProviderError> {
        let n = locations.len();
        let mut matrix = CostMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dist = haversine_meters(&locations[i], &locations[j]);
                matrix.set(i, j, dist / self.speed_mps, dist);
            }
        }
        Ok(matrix)
    }
}
