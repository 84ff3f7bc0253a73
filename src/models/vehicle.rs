//! Vehicle type with capacity and an optional shift window.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// A capacity-limited vehicle available to serve routes.
///
/// Capacity is expressed in the same unit as stop demand. An optional shift
/// window bounds when the vehicle may operate: departure from the depot is
/// delayed to the shift start, and a route that returns to the depot after
/// the shift end is infeasible for this vehicle.
///
/// # Examples
///
/// ```
/// use lastmile_routing::models::Vehicle;
///
/// let v = Vehicle::new(0, 40);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 40);
/// assert!(v.shift().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
    shift: Option<TimeWindow>,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity.
    pub fn new(id: usize, capacity: i32) -> Self {
        Self {
            id,
            capacity,
            shift: None,
        }
    }

    /// Sets the operating shift window for this vehicle.
    pub fn with_shift(mut self, shift: TimeWindow) -> Self {
        self.shift = Some(shift);
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Operating shift window, if any.
    pub fn shift(&self) -> Option<&TimeWindow> {
        self.shift.as_ref()
    }
}
