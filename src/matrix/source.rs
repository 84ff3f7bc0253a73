//! Composed cost matrix source: try live, degrade to the fallback.
//!
//! The live strategy is an injected capability the core depends on but does
//! not implement (a traffic-aware matrix API, for example). Any failure it
//! reports — timeout, auth, rate limit, malformed payload — is caught here
//! and transparently replaced by the haversine fallback for the same
//! location set. The degradation is observable through
//! [`MatrixResult::source`] but never aborts the pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::error::Error;
use crate::models::Location;

use super::haversine::HaversineFallback;
use super::CostMatrix;

/// Failure modes of a live matrix provider.
///
/// All of these are converted into a fallback invocation by
/// [`CostMatrixSource`]; none propagate to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider did not answer within its deadline. Timeouts are owned
    /// by the provider implementation; the core never blocks on its own I/O.
    #[error("provider timed out")]
    Timeout,
    /// The provider rejected the request credentials.
    #[error("provider rejected credentials")]
    Unauthorized,
    /// The provider throttled the request.
    #[error("provider rate limit exceeded")]
    RateLimited,
    /// The provider answered with a payload that could not be interpreted
    /// as a complete matrix pair.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A source of pairwise travel time and distance for a batch of locations.
///
/// Implementers must return a square matrix pair covering every ordered
/// location pair, with a zero diagonal.
pub trait MatrixProvider: Send + Sync {
    /// Computes matrices for the given ordered location sequence.
    fn get_matrices(&self, locations: &[Location]) -> Result<CostMatrix, ProviderError>;
}

/// Which strategy produced a matrix result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatrixSource {
    /// The injected live provider answered.
    Live,
    /// The live provider failed (or none was configured) and the
    /// deterministic haversine fallback was used. Downstream cost and SLA
    /// reporting should account for reduced accuracy.
    Fallback,
}

/// A matrix pair tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixResult {
    /// The computed time/distance matrices.
    pub matrix: CostMatrix,
    /// Strategy that produced them.
    pub source: MatrixSource,
}

impl MatrixResult {
    /// Returns `true` if the result came from the degraded fallback path.
    pub fn is_degraded(&self) -> bool {
        self.source == MatrixSource::Fallback
    }
}

/// Composed matrix source: live strategy first, haversine fallback second.
///
/// # Examples
///
/// ```
/// use lastmile_routing::matrix::{CostMatrixSource, MatrixSource};
/// use lastmile_routing::models::Location;
///
/// let source = CostMatrixSource::fallback_only(30.0);
/// let locations = vec![
///     Location::new(52.5200, 13.4050),
///     Location::new(52.5300, 13.4100),
/// ];
/// let result = source.get_matrices(&locations).unwrap();
/// assert_eq!(result.source, MatrixSource::Fallback);
/// assert_eq!(result.matrix.size(), 2);
/// ```
pub struct CostMatrixSource {
    live: Option<Box<dyn MatrixProvider>>,
    fallback: HaversineFallback,
}

impl CostMatrixSource {
    /// Creates a source that tries the given live provider before the
    /// haversine fallback at `fallback_speed_kmh`.
    pub fn new(live: Box<dyn MatrixProvider>, fallback_speed_kmh: f64) -> Self {
        Self {
            live: Some(live),
            fallback: HaversineFallback::new(fallback_speed_kmh),
        }
    }

    /// Creates a source with no live provider; every call uses the fallback.
    pub fn fallback_only(fallback_speed_kmh: f64) -> Self {
        Self {
            live: None,
            fallback: HaversineFallback::new(fallback_speed_kmh),
        }
    }

    /// Computes the time/distance matrices for the ordered location set.
    ///
    /// Fails with [`Error::MatrixUnavailable`] only if every configured
    /// strategy failed; the fallback is designed never to fail, so this is
    /// a defensive signal rather than an expected outcome.
    pub fn get_matrices(&self, locations: &[Location]) -> Result<MatrixResult, Error> {
        if let Some(live) = &self.live {
            match live.get_matrices(locations) {
                Ok(matrix) => {
                    return Ok(MatrixResult {
                        matrix,
                        source: MatrixSource::Live,
                    });
                }
                Err(e) => {
                    log::warn!("live matrix provider failed ({e}), degrading to haversine fallback");
                }
            }
        }

        match self.fallback.get_matrices(locations) {
            Ok(matrix) => Ok(MatrixResult {
                matrix,
                source: MatrixSource::Fallback,
            }),
            Err(e) => {
                log::error!("fallback matrix strategy failed: {e}");
                Err(Error::MatrixUnavailable)
            }
        }
    }
}
