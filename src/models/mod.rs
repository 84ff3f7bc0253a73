//! Domain model types for the delivery routing core.
//!
//! Provides the immutable problem inputs — locations, stops with demand,
//! priority, and time windows, capacity-limited vehicles — and the solve
//! snapshot output (visits, vehicle routes, and the full route plan).

mod plan;
mod stop;
mod vehicle;

pub use plan::{RoutePlan, VehicleRoute, Visit};
pub use stop::{Location, Priority, Stop, TimeWindow};
pub use vehicle::Vehicle;
