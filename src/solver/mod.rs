//! Constrained VRP solver: assignment, sequencing, and drop-with-penalty.
//!
//! The solve pipeline is a constructive heuristic followed by bounded
//! local-search improvement:
//!
//! 1. validate the inputs (structural errors only);
//! 2. build an initial assignment by greedy cheapest insertion, respecting
//!    capacity, time windows, and vehicle shifts;
//! 3. improve with relocate/swap/2-opt moves plus a seeded
//!    removal-and-reinsert perturbation, under the configured budget;
//! 4. finalize everything still unplaceable as dropped, charged its
//!    priority-tier penalty in the objective.
//!
//! The solver always returns a plan — possibly one that drops every
//! non-depot stop. "No feasible full-service solution" is not an error;
//! drop-with-penalty is the designed escape valve for infeasibility.

mod improve;
mod insertion;
mod schedule;

use crate::config::{OptimizerConfig, PriorityTable, SolveBudget};
use crate::cost::CostModel;
use crate::error::Error;
use crate::matrix::CostMatrix;
use crate::models::{RoutePlan, Stop, Vehicle, VehicleRoute};

use improve::improve;
use insertion::insert_all;
use schedule::ScheduleEvaluator;

/// Shared read-only state for one solve: problem data, cost model,
/// schedule evaluator, and the search-relevant configuration.
pub(crate) struct SearchContext<'a> {
    pub stops: &'a [Stop],
    pub vehicles: &'a [Vehicle],
    pub matrix: &'a CostMatrix,
    pub model: CostModel,
    pub evaluator: ScheduleEvaluator<'a>,
    pub drop_penalty: PriorityTable,
    pub budget: SolveBudget,
    pub perturbation_seed: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        stops: &'a [Stop],
        vehicles: &'a [Vehicle],
        matrix: &'a CostMatrix,
        config: &OptimizerConfig,
    ) -> Self {
        Self {
            stops,
            vehicles,
            matrix,
            model: CostModel::new(config),
            evaluator: ScheduleEvaluator::new(stops, matrix, config.soft_time_windows),
            drop_penalty: config.drop_penalty,
            budget: config.budget,
            perturbation_seed: config.perturbation_seed,
        }
    }

    /// Weighted cost of one route sequence including depot legs.
    pub fn route_cost(&self, sequence: &[usize]) -> f64 {
        self.model.route_cost(self.stops, self.matrix, sequence)
    }

    /// Total demand of a sequence.
    pub fn route_load(&self, sequence: &[usize]) -> i32 {
        sequence.iter().map(|&s| self.stops[s].demand()).sum()
    }

    /// Objective penalty for dropping the given stop.
    pub fn drop_penalty_for(&self, stop: usize) -> f64 {
        self.drop_penalty.get(self.stops[stop].priority())
    }

    /// Full objective: route edge costs plus drop penalties.
    pub fn objective(&self, routes: &[Vec<usize>], unassigned: &[usize]) -> f64 {
        let route_costs: f64 = routes.iter().map(|r| self.route_cost(r)).sum();
        let penalties: f64 = unassigned.iter().map(|&s| self.drop_penalty_for(s)).sum();
        route_costs + penalties
    }
}

/// Computes a minimum-cost route plan for the given stops and fleet.
///
/// `stops[0]` is the depot; `matrix` must cover exactly `stops.len()`
/// locations in stop order. The solver does not mutate its inputs and the
/// returned plan is an immutable snapshot, so independent solves may run in
/// parallel on shared read-only data.
///
/// With an [`Iterations`](SolveBudget::Iterations) budget the result is
/// deterministic: identical inputs and configuration yield identical plans.
///
/// # Errors
///
/// [`Error::InvalidInput`] for structural violations only: a matrix whose
/// size differs from the stop count, negative demand or capacity, non-zero
/// depot demand, an empty fleet with stops to serve, or out-of-range
/// configuration.
///
/// # Examples
///
/// ```
/// use lastmile_routing::config::OptimizerConfig;
/// use lastmile_routing::matrix::CostMatrix;
/// use lastmile_routing::models::{Priority, Stop, Vehicle};
/// use lastmile_routing::solver::solve;
///
/// let stops = vec![
///     Stop::depot(52.52, 13.405),
///     Stop::new(1, 52.53, 13.41, 3, Priority::Express, 120.0),
/// ];
/// let mut matrix = CostMatrix::new(2);
/// matrix.set(0, 1, 300.0, 1500.0);
/// matrix.set(1, 0, 320.0, 1500.0);
///
/// let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default())
///     .unwrap();
/// assert_eq!(plan.num_served(), 1);
/// assert!(plan.dropped().is_empty());
/// ```
pub fn solve(
    stops: &[Stop],
    vehicles: &[Vehicle],
    matrix: &CostMatrix,
    config: &OptimizerConfig,
) -> Result<RoutePlan, Error> {
    config.validate()?;
    validate_inputs(stops, vehicles, matrix)?;

    let ctx = SearchContext::new(stops, vehicles, matrix, config);
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); vehicles.len()];
    let mut unassigned: Vec<usize> = (1..stops.len()).collect();

    insert_all(&ctx, &mut routes, &mut unassigned);
    log::debug!(
        "construction placed {} of {} stops",
        stops.len() - 1 - unassigned.len(),
        stops.len() - 1
    );

    improve(&ctx, &mut routes, &mut unassigned);

    let plan = finalize(&ctx, routes, unassigned);
    log::debug!(
        "solve finished: {} served, {} dropped, objective {:.1}",
        plan.num_served(),
        plan.dropped().len(),
        plan.objective()
    );
    Ok(plan)
}

fn validate_inputs(
    stops: &[Stop],
    vehicles: &[Vehicle],
    matrix: &CostMatrix,
) -> Result<(), Error> {
    if stops.is_empty() {
        return Err(Error::invalid_input("stops must include the depot at index 0"));
    }
    if matrix.size() != stops.len() {
        return Err(Error::invalid_input(format!(
            "cost matrix covers {} locations but {} stops were supplied",
            matrix.size(),
            stops.len()
        )));
    }
    if stops[0].demand() != 0 {
        return Err(Error::invalid_input("depot (stop 0) must have zero demand"));
    }
    for stop in stops {
        if stop.demand() < 0 {
            return Err(Error::invalid_input(format!(
                "stop {} has negative demand {}",
                stop.id(),
                stop.demand()
            )));
        }
    }
    for vehicle in vehicles {
        if vehicle.capacity() < 0 {
            return Err(Error::invalid_input(format!(
                "vehicle {} has negative capacity {}",
                vehicle.id(),
                vehicle.capacity()
            )));
        }
    }
    if vehicles.is_empty() && stops.len() > 1 {
        return Err(Error::invalid_input(
            "no vehicles available for a non-empty stop set",
        ));
    }
    Ok(())
}

/// Materializes the search state into an immutable plan snapshot.
fn finalize(ctx: &SearchContext<'_>, routes: Vec<Vec<usize>>, unassigned: Vec<usize>) -> RoutePlan {
    let mut dropped = unassigned;
    let mut vehicle_routes = Vec::with_capacity(routes.len());
    let mut objective = 0.0;

    for (r, sequence) in routes.iter().enumerate() {
        match ctx.evaluator.build_route(sequence, &ctx.vehicles[r]) {
            Some(route) => {
                objective += ctx.route_cost(sequence);
                vehicle_routes.push(route);
            }
            None => {
                // The search only keeps feasible sequences; if one slipped
                // through, dropping its stops is the designed escape valve.
                dropped.extend(sequence.iter().copied());
                vehicle_routes.push(VehicleRoute::new(ctx.vehicles[r].id()));
            }
        }
    }

    dropped.sort_unstable();
    objective += dropped.iter().map(|&s| ctx.drop_penalty_for(s)).sum::<f64>();

    RoutePlan::new(vehicle_routes, dropped, objective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TimeWindow};
    use proptest::prelude::*;

    fn uniform_matrix(n: usize, time: f64, distance: f64) -> CostMatrix {
        let mut m = CostMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    m.set(i, j, time, distance);
                }
            }
        }
        m
    }

    fn stop(id: usize, demand: i32, priority: Priority) -> Stop {
        Stop::new(id, 0.0, 0.0, demand, priority, 60.0)
    }

    /// Asserts the partition invariant: every non-depot stop appears in
    /// exactly one of {assigned, dropped}.
    fn assert_partition(plan: &RoutePlan, num_stops: usize) {
        let mut seen = vec![0usize; num_stops];
        for route in plan.routes() {
            for visit in route.visits() {
                seen[visit.stop] += 1;
            }
        }
        for &d in plan.dropped() {
            seen[d] += 1;
        }
        assert_eq!(seen[0], 0, "depot must never be assigned or dropped");
        for (idx, &count) in seen.iter().enumerate().skip(1) {
            assert_eq!(count, 1, "stop {idx} appears {count} times");
        }
    }

    #[test]
    fn test_dimension_mismatch_is_invalid() {
        let stops = vec![Stop::depot(0.0, 0.0), stop(1, 2, Priority::Standard)];
        let matrix = uniform_matrix(3, 100.0, 1000.0);
        let result = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_negative_demand_is_invalid() {
        let stops = vec![Stop::depot(0.0, 0.0), stop(1, -2, Priority::Standard)];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let result = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_negative_capacity_is_invalid() {
        let stops = vec![Stop::depot(0.0, 0.0), stop(1, 2, Priority::Standard)];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let result = solve(&stops, &[Vehicle::new(0, -1)], &matrix, &OptimizerConfig::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_empty_fleet_with_stops_is_invalid() {
        let stops = vec![Stop::depot(0.0, 0.0), stop(1, 2, Priority::Standard)];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let result = solve(&stops, &[], &matrix, &OptimizerConfig::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_nonzero_depot_demand_is_invalid() {
        let depot = Stop::new(0, 0.0, 0.0, 5, Priority::Standard, 0.0);
        let stops = vec![depot, stop(1, 2, Priority::Standard)];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let result = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_depot_only_yields_empty_plan() {
        let stops = vec![Stop::depot(0.0, 0.0)];
        let matrix = uniform_matrix(1, 0.0, 0.0);
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default())
            .expect("valid");
        assert_eq!(plan.num_served(), 0);
        assert!(plan.dropped().is_empty());
        assert_eq!(plan.objective(), 0.0);
    }

    #[test]
    fn test_small_instance_serves_all() {
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Standard),
            stop(2, 3, Priority::Express),
            stop(3, 1, Priority::Critical),
        ];
        let matrix = uniform_matrix(4, 100.0, 1000.0);
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default())
            .expect("valid");
        assert_eq!(plan.num_served(), 3);
        assert!(plan.dropped().is_empty());
        assert_partition(&plan, stops.len());
    }

    #[test]
    fn test_one_route_per_vehicle() {
        let stops = vec![Stop::depot(0.0, 0.0), stop(1, 2, Priority::Standard)];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let vehicles = vec![Vehicle::new(0, 10), Vehicle::new(1, 10)];
        let plan = solve(&stops, &vehicles, &matrix, &OptimizerConfig::default()).expect("valid");
        assert_eq!(plan.num_routes(), 2);
        assert_eq!(plan.num_served(), 1);
    }

    #[test]
    fn test_capacity_pressure_drops_lowest_priority() {
        // 7 stops of demand 2 (total 14) against one vehicle of capacity 10:
        // at least two stops must be dropped, and the cheapest feasible drop
        // set is the two Standard stops. Three stops carry tight windows.
        let tight = TimeWindow::new(0.0, 2000.0).expect("valid");
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Critical).with_time_window(tight),
            stop(2, 2, Priority::Critical).with_time_window(tight),
            stop(3, 2, Priority::Critical).with_time_window(tight),
            stop(4, 2, Priority::Express),
            stop(5, 2, Priority::Express),
            stop(6, 2, Priority::Standard),
            stop(7, 2, Priority::Standard),
        ];
        let matrix = uniform_matrix(8, 100.0, 1000.0);
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default())
            .expect("valid");

        assert_partition(&plan, stops.len());
        assert_eq!(plan.dropped(), &[6, 7]);
        assert_eq!(plan.num_served(), 5);

        let route = &plan.routes()[0];
        for visit in route.visits() {
            assert!(visit.load <= 10, "prefix load {} exceeds capacity", visit.load);
            if let Some(tw) = stops[visit.stop].time_window() {
                let service_start = visit.arrival + visit.wait;
                assert!(
                    tw.contains(service_start),
                    "stop {} served at {} outside [{}, {}]",
                    visit.stop,
                    service_start,
                    tw.ready(),
                    tw.due()
                );
            }
        }
    }

    #[test]
    fn test_drop_prefers_lower_priority() {
        // Identical geometry and demand; only the tier differs.
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 10, Priority::Standard),
            stop(2, 10, Priority::Critical),
        ];
        let matrix = uniform_matrix(3, 100.0, 1000.0);
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default())
            .expect("valid");
        assert_eq!(plan.dropped(), &[1]);
        assert_eq!(plan.num_served(), 1);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Standard),
            stop(2, 4, Priority::Express),
            stop(3, 3, Priority::Critical),
            stop(4, 2, Priority::Standard),
        ];
        let matrix = uniform_matrix(5, 100.0, 1000.0);
        let vehicles = vec![Vehicle::new(0, 6), Vehicle::new(1, 6)];
        let config = OptimizerConfig::default();

        let a = solve(&stops, &vehicles, &matrix, &config).expect("valid");
        let b = solve(&stops, &vehicles, &matrix, &config).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hard_window_drops_unreachable_stop() {
        let tw = TimeWindow::new(0.0, 10.0).expect("valid");
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Express).with_time_window(tw),
        ];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &OptimizerConfig::default())
            .expect("valid");
        assert_eq!(plan.dropped(), &[1]);
    }

    #[test]
    fn test_soft_window_serves_late_instead_of_dropping() {
        let tw = TimeWindow::new(0.0, 10.0).expect("valid");
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Express).with_time_window(tw),
        ];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        let config = OptimizerConfig {
            soft_time_windows: true,
            ..OptimizerConfig::default()
        };
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &config).expect("valid");
        assert!(plan.dropped().is_empty());
        let visit = &plan.routes()[0].visits()[0];
        assert!(visit.arrival > tw.due());
    }

    #[test]
    fn test_shift_window_bounds_route() {
        let shift = TimeWindow::new(0.0, 150.0).expect("valid");
        let stops = vec![Stop::depot(0.0, 0.0), stop(1, 2, Priority::Express)];
        let matrix = uniform_matrix(2, 100.0, 1000.0);
        // 100 out + 60 service + 100 back = 260 > 150 shift end.
        let vehicles = vec![Vehicle::new(0, 10).with_shift(shift)];
        let plan = solve(&stops, &vehicles, &matrix, &OptimizerConfig::default()).expect("valid");
        assert_eq!(plan.dropped(), &[1]);
    }

    #[test]
    fn test_worst_case_drops_everything() {
        // Zero-capacity vehicle: every stop is dropped, but a plan is still
        // returned with the full penalty as its objective.
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Standard),
            stop(2, 2, Priority::Critical),
        ];
        let matrix = uniform_matrix(3, 100.0, 1000.0);
        let config = OptimizerConfig::default();
        let plan = solve(&stops, &[Vehicle::new(0, 0)], &matrix, &config).expect("valid");
        assert_eq!(plan.dropped(), &[1, 2]);
        let expected = config.drop_penalty.standard + config.drop_penalty.critical;
        assert!((plan.objective() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_objective_matches_costs_plus_penalties() {
        let stops = vec![
            Stop::depot(0.0, 0.0),
            stop(1, 2, Priority::Standard),
            stop(2, 10, Priority::Standard),
        ];
        let matrix = uniform_matrix(3, 100.0, 1000.0);
        let config = OptimizerConfig::default();
        // Capacity 10 serves exactly one of the two (stop 2 fills it alone;
        // the solver picks whichever costs less overall).
        let plan = solve(&stops, &[Vehicle::new(0, 10)], &matrix, &config).expect("valid");
        assert_partition(&plan, stops.len());
        assert_eq!(plan.dropped().len(), 1);
        assert!(plan.objective() >= config.drop_penalty.standard);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_partition_and_prefix_load(
            demands in proptest::collection::vec(0i32..8, 1..7),
            capacity in 1i32..20,
        ) {
            let mut stops = vec![Stop::depot(0.0, 0.0)];
            for (i, &d) in demands.iter().enumerate() {
                stops.push(stop(i + 1, d, Priority::Standard));
            }
            let matrix = uniform_matrix(stops.len(), 50.0, 500.0);
            let vehicles = vec![Vehicle::new(0, capacity), Vehicle::new(1, capacity)];
            let config = OptimizerConfig {
                budget: crate::config::SolveBudget::Iterations(50),
                ..OptimizerConfig::default()
            };

            let plan = solve(&stops, &vehicles, &matrix, &config).expect("valid");
            assert_partition(&plan, stops.len());

            for route in plan.routes() {
                for visit in route.visits() {
                    prop_assert!(visit.load <= capacity);
                }
            }
            prop_assert!(plan.objective() >= 0.0);
        }
    }
}
