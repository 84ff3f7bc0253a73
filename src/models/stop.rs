//! Stop, location, priority, and time window types.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// Immutable once created. The core never validates coordinate ranges; it
/// assumes the orchestrator supplies meaningful positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    lat: f64,
    lon: f64,
}

impl Location {
    /// Creates a location from latitude and longitude in decimal degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Delivery priority tier, ordered from lowest to highest.
///
/// Higher tiers are cheaper to sequence (smaller additive edge bias) and
/// more expensive to drop.
///
/// # Examples
///
/// ```
/// use lastmile_routing::models::Priority;
///
/// assert!(Priority::Standard < Priority::Express);
/// assert!(Priority::Express < Priority::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Regular delivery, no urgency.
    Standard,
    /// Expedited delivery.
    Express,
    /// Must-serve delivery (medical, contractual SLA).
    Critical,
}

/// A time window constraint on service start at a stop.
///
/// The vehicle must arrive no later than `due` and may arrive as early as
/// `ready` (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use lastmile_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowable service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable service start.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the vehicle arrives within or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.ready {
            self.ready - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.due
    }
}

/// A delivery stop (or the depot) in a routing problem.
///
/// Stop 0 is conventionally the depot: zero demand, no time window. Stops
/// are immutable inputs to a solve; identity is the stop's index in the
/// problem's stop slice, stable for the duration of the solve.
///
/// # Examples
///
/// ```
/// use lastmile_routing::models::{Priority, Stop};
///
/// let depot = Stop::depot(52.52, 13.405);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let s = Stop::new(1, 52.53, 13.41, 3, Priority::Express, 300.0);
/// assert_eq!(s.demand(), 3);
/// assert_eq!(s.priority(), Priority::Express);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: usize,
    location: Location,
    demand: i32,
    priority: Priority,
    service_duration: f64,
    time_window: Option<TimeWindow>,
}

impl Stop {
    /// Creates a new stop.
    pub fn new(
        id: usize,
        lat: f64,
        lon: f64,
        demand: i32,
        priority: Priority,
        service_duration: f64,
    ) -> Self {
        Self {
            id,
            location: Location::new(lat, lon),
            demand,
            priority,
            service_duration,
            time_window: None,
        }
    }

    /// Creates the depot at the given coordinates (id=0, demand=0, no window).
    pub fn depot(lat: f64, lon: f64) -> Self {
        Self::new(0, lat, lon, 0, Priority::Standard, 0.0)
    }

    /// Sets a service time window for this stop.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Stop ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Geographic position of this stop.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Demand at this stop (units consumed from vehicle capacity).
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Delivery priority tier.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Service duration at this stop.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Time window constraint, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert_eq!(tw.ready(), 10.0);
        assert_eq!(tw.due(), 20.0);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
        assert!(TimeWindow::new(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(tw.contains(10.0));
        assert!(tw.contains(15.0));
        assert!(tw.contains(20.0));
        assert!(!tw.contains(9.9));
        assert!(!tw.contains(20.1));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!((tw.waiting_time(5.0) - 5.0).abs() < 1e-10);
        assert!((tw.waiting_time(10.0)).abs() < 1e-10);
        assert!((tw.waiting_time(15.0)).abs() < 1e-10);
    }

    #[test]
    fn test_time_window_violated() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(!tw.is_violated(10.0));
        assert!(!tw.is_violated(20.0));
        assert!(tw.is_violated(20.1));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Standard < Priority::Express);
        assert!(Priority::Express < Priority::Critical);
        let mut tiers = vec![Priority::Critical, Priority::Standard, Priority::Express];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![Priority::Standard, Priority::Express, Priority::Critical]
        );
    }

    #[test]
    fn test_stop_new() {
        let s = Stop::new(1, 52.53, 13.41, 5, Priority::Critical, 120.0);
        assert_eq!(s.id(), 1);
        assert_eq!(s.demand(), 5);
        assert_eq!(s.priority(), Priority::Critical);
        assert_eq!(s.service_duration(), 120.0);
        assert!(s.time_window().is_none());
        assert_eq!(s.location().lat(), 52.53);
        assert_eq!(s.location().lon(), 13.41);
    }

    #[test]
    fn test_stop_depot() {
        let d = Stop::depot(52.52, 13.405);
        assert_eq!(d.id(), 0);
        assert_eq!(d.demand(), 0);
        assert_eq!(d.service_duration(), 0.0);
        assert!(d.time_window().is_none());
    }

    #[test]
    fn test_stop_with_time_window() {
        let tw = TimeWindow::new(1800.0, 14400.0).expect("valid");
        let s = Stop::new(1, 52.53, 13.41, 2, Priority::Standard, 300.0).with_time_window(tw);
        assert!(s.time_window().is_some());
        assert_eq!(s.time_window().expect("has tw").ready(), 1800.0);
    }
}
