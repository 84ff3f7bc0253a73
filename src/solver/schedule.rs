//! Route schedule evaluator.
//!
//! Simulates a vehicle driving a stop sequence forward in time: arrival,
//! waiting when early, service, and the return leg to the depot. Used both
//! as a cheap feasibility check during search and to materialize the final
//! [`VehicleRoute`] snapshots.

use crate::matrix::CostMatrix;
use crate::models::{Stop, Vehicle, VehicleRoute, Visit};

/// Summary of a feasible forward scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScanMetrics {
    /// Total waiting time accumulated across the sequence.
    pub total_wait: f64,
    /// Time the vehicle is back at the depot.
    pub return_time: f64,
}

/// Evaluates stop sequences against capacity, time-window, and shift
/// constraints for one problem's stops and matrix.
pub(crate) struct ScheduleEvaluator<'a> {
    stops: &'a [Stop],
    matrix: &'a CostMatrix,
    soft_time_windows: bool,
}

impl<'a> ScheduleEvaluator<'a> {
    pub fn new(stops: &'a [Stop], matrix: &'a CostMatrix, soft_time_windows: bool) -> Self {
        Self {
            stops,
            matrix,
            soft_time_windows,
        }
    }

    /// Forward-simulates a sequence for the given vehicle.
    ///
    /// Returns `None` when the sequence is infeasible: a load prefix exceeds
    /// capacity, an arrival misses a hard time window, or the depot return
    /// falls outside the vehicle's shift.
    pub fn scan(&self, sequence: &[usize], vehicle: &Vehicle) -> Option<ScanMetrics> {
        let start = vehicle.shift().map_or(0.0, |s| s.ready());
        let mut time = start;
        let mut load: i32 = 0;
        let mut total_wait = 0.0;
        let mut prev = 0;

        for &idx in sequence {
            load += self.stops[idx].demand();
            if load > vehicle.capacity() {
                return None;
            }

            let arrival = time + self.matrix.time(prev, idx);
            let stop = &self.stops[idx];
            let mut wait = 0.0;
            if let Some(tw) = stop.time_window() {
                if tw.is_violated(arrival) && !self.soft_time_windows {
                    return None;
                }
                wait = tw.waiting_time(arrival);
            }

            total_wait += wait;
            time = arrival + wait + stop.service_duration();
            prev = idx;
        }

        let return_time = time + self.matrix.time(prev, 0);
        if let Some(shift) = vehicle.shift() {
            if return_time > shift.due() {
                return None;
            }
        }

        Some(ScanMetrics {
            total_wait,
            return_time,
        })
    }

    /// Returns `true` if the sequence satisfies every hard constraint.
    pub fn is_feasible(&self, sequence: &[usize], vehicle: &Vehicle) -> bool {
        self.scan(sequence, vehicle).is_some()
    }

    /// Materializes the full visit-by-visit route for a feasible sequence.
    ///
    /// Returns `None` under the same conditions as [`scan`](Self::scan).
    pub fn build_route(&self, sequence: &[usize], vehicle: &Vehicle) -> Option<VehicleRoute> {
        self.scan(sequence, vehicle)?;

        let mut route = VehicleRoute::new(vehicle.id());
        let start = vehicle.shift().map_or(0.0, |s| s.ready());
        let mut time = start;
        let mut load: i32 = 0;
        let mut total_distance = 0.0;
        let mut prev = 0;

        for &idx in sequence {
            let stop = &self.stops[idx];
            total_distance += self.matrix.distance(prev, idx);
            let arrival = time + self.matrix.time(prev, idx);
            let wait = stop.time_window().map_or(0.0, |tw| tw.waiting_time(arrival));
            let departure = arrival + wait + stop.service_duration();
            load += stop.demand();

            route.push_visit(Visit {
                stop: idx,
                arrival,
                wait,
                departure,
                load,
            });

            time = departure;
            prev = idx;
        }

        total_distance += self.matrix.distance(prev, 0);
        let return_time = time + self.matrix.time(prev, 0);

        route.set_total_distance(total_distance);
        route.set_total_duration(return_time - start);
        Some(route)
    }
}
