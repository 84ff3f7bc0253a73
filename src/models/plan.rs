//! Route plan snapshot types produced by a solve.

use serde::Serialize;

/// A single visit to a stop within a vehicle route.
///
/// Tracks the stop index along with the timing and load state computed by
/// the schedule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visit {
    /// Index of the stop being visited.
    pub stop: usize,
    /// Arrival time at the stop.
    pub arrival: f64,
    /// Waiting time before service starts (arrival before the window opens).
    pub wait: f64,
    /// Departure time (arrival + wait + service duration).
    pub departure: f64,
    /// Cumulative load after serving this stop.
    pub load: i32,
}

/// An ordered sequence of visits assigned to one vehicle.
///
/// The route implicitly starts and ends at the depot (stop 0), which is not
/// stored in `visits`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRoute {
    vehicle_id: usize,
    visits: Vec<Visit>,
    total_distance: f64,
    total_duration: f64,
    total_wait: f64,
}

impl VehicleRoute {
    /// Creates an empty route for the given vehicle.
    pub fn new(vehicle_id: usize) -> Self {
        Self {
            vehicle_id,
            visits: Vec::new(),
            total_distance: 0.0,
            total_duration: 0.0,
            total_wait: 0.0,
        }
    }

    /// Appends a visit to the end of this route.
    pub fn push_visit(&mut self, visit: Visit) {
        self.total_wait += visit.wait;
        self.visits.push(visit);
    }

    /// Vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// The ordered sequence of visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of stops served (excluding depot).
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if this route serves no stops.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Stop indices in visit order.
    pub fn stop_indices(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.stop).collect()
    }

    /// Total travel distance including the depot legs.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Total elapsed time from depot departure to depot return.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Total waiting time accumulated across visits.
    pub fn total_wait(&self) -> f64 {
        self.total_wait
    }

    /// Final load carried on this route.
    pub fn total_load(&self) -> i32 {
        self.visits.last().map_or(0, |v| v.load)
    }

    /// Sets the total distance (used by the schedule evaluator).
    pub fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }

    /// Sets the total duration (used by the schedule evaluator).
    pub fn set_total_duration(&mut self, d: f64) {
        self.total_duration = d;
    }
}

/// The immutable outcome of one solve invocation.
///
/// Every non-depot stop appears in exactly one of
/// {some route's visits, `dropped`}. A new solve produces a new plan; plans
/// are never mutated after construction.
///
/// # Examples
///
/// ```
/// use lastmile_routing::models::{RoutePlan, VehicleRoute};
///
/// let plan = RoutePlan::new(vec![VehicleRoute::new(0)], vec![3], 100000.0);
/// assert_eq!(plan.num_routes(), 1);
/// assert_eq!(plan.dropped(), &[3]);
/// assert!(plan.is_dropped(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    routes: Vec<VehicleRoute>,
    dropped: Vec<usize>,
    objective: f64,
}

impl RoutePlan {
    /// Creates a plan from routes, dropped stop indices, and the objective.
    pub fn new(routes: Vec<VehicleRoute>, dropped: Vec<usize>, objective: f64) -> Self {
        Self {
            routes,
            dropped,
            objective,
        }
    }

    /// Per-vehicle routes, one entry per vehicle in the solve.
    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    /// Number of routes in this plan.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Indices of stops excluded from service, in ascending order.
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Returns `true` if the given stop was dropped.
    pub fn is_dropped(&self, stop: usize) -> bool {
        self.dropped.binary_search(&stop).is_ok()
    }

    /// Total objective: route edge costs plus drop penalties.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Total number of stops served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Total travel distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.total_distance()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = VehicleRoute::new(0);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.total_load(), 0);
        assert_eq!(r.total_wait(), 0.0);
    }

    #[test]
    fn test_route_push_visit() {
        let mut r = VehicleRoute::new(1);
        r.push_visit(Visit {
            stop: 5,
            arrival: 10.0,
            wait: 2.0,
            departure: 17.0,
            load: 4,
        });
        r.push_visit(Visit {
            stop: 3,
            arrival: 25.0,
            wait: 0.0,
            departure: 30.0,
            load: 7,
        });
        assert_eq!(r.len(), 2);
        assert_eq!(r.stop_indices(), vec![5, 3]);
        assert_eq!(r.total_load(), 7);
        assert!((r.total_wait() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_plan_accessors() {
        let mut route = VehicleRoute::new(0);
        route.push_visit(Visit {
            stop: 1,
            arrival: 5.0,
            wait: 0.0,
            departure: 10.0,
            load: 2,
        });
        route.set_total_distance(120.0);

        let plan = RoutePlan::new(vec![route], vec![2, 4], 200150.0);
        assert_eq!(plan.num_routes(), 1);
        assert_eq!(plan.num_served(), 1);
        assert_eq!(plan.dropped(), &[2, 4]);
        assert!(plan.is_dropped(2));
        assert!(!plan.is_dropped(1));
        assert!((plan.total_distance() - 120.0).abs() < 1e-10);
        assert!((plan.objective() - 200150.0).abs() < 1e-10);
    }

    #[test]
    fn test_plan_snapshot_equality() {
        let a = RoutePlan::new(vec![VehicleRoute::new(0)], vec![1], 10.0);
        let b = a.clone();
        assert_eq!(a, b);
    }
}
