//! Edge weighting model.
//!
//! Converts raw travel time and distance into a single scalar weight per
//! directed pair:
//!
//! ```text
//! cost = w_time · time + w_distance · distance + w_priority · bias(to.priority)
//! ```
//!
//! The bias table is strictly decreasing as priority increases, so
//! high-priority stops are cheaper to sequence. The model is stateless and
//! pure; the solver evaluates it many times during search and relies on
//! identical inputs producing identical outputs.

use crate::config::{OptimizerConfig, PriorityTable};
use crate::matrix::CostMatrix;
use crate::models::{Priority, Stop};

/// Pure edge-cost evaluator configured with weights and a priority bias.
///
/// # Examples
///
/// ```
/// use lastmile_routing::config::OptimizerConfig;
/// use lastmile_routing::cost::CostModel;
/// use lastmile_routing::models::Priority;
///
/// let config = OptimizerConfig::default();
/// let model = CostModel::new(&config);
/// let cheap = model.edge_cost(Priority::Critical, 60.0, 500.0);
/// let dear = model.edge_cost(Priority::Standard, 60.0, 500.0);
/// assert!(cheap < dear);
/// ```
#[derive(Debug, Clone)]
pub struct CostModel {
    weight_time: f64,
    weight_distance: f64,
    weight_priority: f64,
    priority_bias: PriorityTable,
}

impl CostModel {
    /// Creates a cost model from validated configuration.
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            weight_time: config.weight_time,
            weight_distance: config.weight_distance,
            weight_priority: config.weight_priority,
            priority_bias: config.priority_bias,
        }
    }

    /// Scalar weight of traversing an edge toward a stop of the given tier.
    pub fn edge_cost(&self, to_priority: Priority, travel_time: f64, travel_distance: f64) -> f64 {
        self.weight_time * travel_time
            + self.weight_distance * travel_distance
            + self.weight_priority * self.priority_bias.get(to_priority)
    }

    /// Weight of the directed edge `from → to` looked up from the matrix.
    pub fn edge(&self, stops: &[Stop], matrix: &CostMatrix, from: usize, to: usize) -> f64 {
        self.edge_cost(
            stops[to].priority(),
            matrix.time(from, to),
            matrix.distance(from, to),
        )
    }

    /// Total weighted cost of `depot → sequence[0] → … → sequence[n-1] → depot`.
    ///
    /// Zero for an empty sequence (the vehicle never leaves the depot).
    pub fn route_cost(&self, stops: &[Stop], matrix: &CostMatrix, sequence: &[usize]) -> f64 {
        if sequence.is_empty() {
            return 0.0;
        }
        let mut cost = self.edge(stops, matrix, 0, sequence[0]);
        for w in sequence.windows(2) {
            cost += self.edge(stops, matrix, w[0], w[1]);
        }
        cost += self.edge(stops, matrix, sequence[sequence.len() - 1], 0);
        cost
    }
}
