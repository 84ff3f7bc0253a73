//! Validated optimizer configuration.
//!
//! Configuration is a flat set of named options passed explicitly into every
//! call — never read from process-wide state — so solves stay reproducible
//! and parallel-safe. The orchestrator owns loading values; this module only
//! validates and consumes them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::Priority;

/// A scalar per priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityTable {
    /// Value for [`Priority::Standard`].
    pub standard: f64,
    /// Value for [`Priority::Express`].
    pub express: f64,
    /// Value for [`Priority::Critical`].
    pub critical: f64,
}

impl PriorityTable {
    /// Looks up the value for a tier.
    pub fn get(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Standard => self.standard,
            Priority::Express => self.express,
            Priority::Critical => self.critical,
        }
    }

    fn all_finite_non_negative(&self) -> bool {
        [self.standard, self.express, self.critical]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Computation budget for the solver's improvement phase.
///
/// Checked cooperatively between local-search moves, never preemptively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveBudget {
    /// Fixed number of improvement steps. Deterministic: identical inputs
    /// and configuration yield identical plans.
    Iterations(u32),
    /// Wall-clock deadline. The plan may differ across runs of the same
    /// input, since how far the search gets depends on machine load.
    TimeLimit(Duration),
}

/// Flat, validated optimizer configuration.
///
/// Defaults mirror a one-vehicle urban delivery setup: time weighted fully,
/// distance at half weight as a fuel proxy, a strong priority component, a
/// 30 km/h fallback speed, and a 15% replanning threshold.
///
/// # Examples
///
/// ```
/// use lastmile_routing::config::OptimizerConfig;
///
/// let config = OptimizerConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.reopt_threshold, 0.15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Weight applied to travel time in the edge cost.
    pub weight_time: f64,
    /// Weight applied to travel distance (fuel proxy) in the edge cost.
    pub weight_distance: f64,
    /// Weight applied to the per-edge priority bias.
    pub weight_priority: f64,
    /// Additive edge bias per destination tier; must strictly decrease as
    /// priority increases so high-priority stops are cheaper to sequence.
    pub priority_bias: PriorityTable,
    /// Objective penalty per dropped stop by tier; must not decrease as
    /// priority increases so the solver prefers dropping low tiers.
    pub drop_penalty: PriorityTable,
    /// Average speed (km/h) used to derive travel time in the haversine
    /// fallback matrix strategy.
    pub fallback_speed_kmh: f64,
    /// When `true`, arrival after a stop's due time is recorded but does not
    /// make the assignment infeasible.
    pub soft_time_windows: bool,
    /// Improvement-phase computation budget.
    pub budget: SolveBudget,
    /// Seed for the removal-and-reinsert perturbation, so searches under an
    /// iteration budget are reproducible.
    pub perturbation_seed: u64,
    /// ETA variance ratio above which a replan is signaled, in (0, 1].
    pub reopt_threshold: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weight_time: 1.0,
            weight_distance: 0.5,
            weight_priority: 100.0,
            priority_bias: PriorityTable {
                standard: 2.0,
                express: 1.0,
                critical: 0.0,
            },
            drop_penalty: PriorityTable {
                standard: 100_000.0,
                express: 200_000.0,
                critical: 300_000.0,
            },
            fallback_speed_kmh: 30.0,
            soft_time_windows: false,
            budget: SolveBudget::Iterations(1_000),
            perturbation_seed: 0,
            reopt_threshold: 0.15,
        }
    }
}

impl OptimizerConfig {
    /// Checks every option against its contract.
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending option.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("weight_time", self.weight_time),
            ("weight_distance", self.weight_distance),
            ("weight_priority", self.weight_priority),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_input(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }

        if !self.priority_bias.all_finite_non_negative() {
            return Err(Error::invalid_input(
                "priority_bias entries must be non-negative finite numbers",
            ));
        }
        if !(self.priority_bias.standard > self.priority_bias.express
            && self.priority_bias.express > self.priority_bias.critical)
        {
            return Err(Error::invalid_input(
                "priority_bias must strictly decrease as priority increases",
            ));
        }

        if !self.drop_penalty.all_finite_non_negative() {
            return Err(Error::invalid_input(
                "drop_penalty entries must be non-negative finite numbers",
            ));
        }
        if self.drop_penalty.standard > self.drop_penalty.express
            || self.drop_penalty.express > self.drop_penalty.critical
        {
            return Err(Error::invalid_input(
                "drop_penalty must not decrease as priority increases",
            ));
        }

        if !self.fallback_speed_kmh.is_finite() || self.fallback_speed_kmh <= 0.0 {
            return Err(Error::invalid_input(format!(
                "fallback_speed_kmh must be positive, got {}",
                self.fallback_speed_kmh
            )));
        }

        match self.budget {
            SolveBudget::Iterations(0) => {
                return Err(Error::invalid_input("budget iterations must be positive"));
            }
            SolveBudget::TimeLimit(limit) if limit.is_zero() => {
                return Err(Error::invalid_input("budget time limit must be positive"));
            }
            _ => {}
        }

        if !self.reopt_threshold.is_finite()
            || self.reopt_threshold <= 0.0
            || self.reopt_threshold > 1.0
        {
            return Err(Error::invalid_input(format!(
                "reopt_threshold must be in (0, 1], got {}",
                self.reopt_threshold
            )));
        }

        Ok(())
    }
}
