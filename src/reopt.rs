//! Reoptimization trigger on ETA drift.
//!
//! A stateless decision function: the orchestrator feeds in the originally
//! predicted arrival time for a stop and the currently observed or
//! re-predicted one, and gets back whether the deployed plan has drifted
//! enough to warrant a fresh solve. The orchestrator decides which stops to
//! re-check and at what cadence; nothing is retained between calls.

use serde::Serialize;

use crate::error::Error;

/// Outcome of a reoptimization check: the boolean signal plus the variance
/// ratio that produced it. Purely a function return, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReoptimizationDecision {
    /// `true` when the plan should be discarded and recomputed.
    pub reoptimize: bool,
    /// `abs(new_eta - current_eta) / current_eta`.
    pub variance: f64,
}

/// Decides whether observed ETA drift warrants a replan.
///
/// `variance = |new_eta − current_eta| / current_eta`; the trigger fires
/// when the variance strictly exceeds `threshold`.
///
/// # Errors
///
/// [`Error::InvalidInput`] if either ETA is non-positive or non-finite
/// (callers must supply only stops with a previously computed positive ETA),
/// or if `threshold` is outside `(0, 1]`.
///
/// # Examples
///
/// ```
/// use lastmile_routing::reopt::check_reoptimization;
///
/// let minor = check_reoptimization(100.0, 110.0, 0.15).unwrap();
/// assert!(!minor.reoptimize);
///
/// let major = check_reoptimization(100.0, 120.0, 0.15).unwrap();
/// assert!(major.reoptimize);
/// ```
pub fn check_reoptimization(
    current_eta: f64,
    new_eta: f64,
    threshold: f64,
) -> Result<ReoptimizationDecision, Error> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(Error::invalid_input(format!(
            "reoptimization threshold must be in (0, 1], got {threshold}"
        )));
    }
    if !current_eta.is_finite() || current_eta <= 0.0 {
        return Err(Error::invalid_input(format!(
            "current ETA must be positive, got {current_eta}"
        )));
    }
    if !new_eta.is_finite() || new_eta <= 0.0 {
        return Err(Error::invalid_input(format!(
            "new ETA must be positive, got {new_eta}"
        )));
    }

    let variance = (new_eta - current_eta).abs() / current_eta;
    Ok(ReoptimizationDecision {
        reoptimize: variance > threshold,
        variance,
    })
}
