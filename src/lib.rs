//! # lastmile-routing
//!
//! Dynamic last-mile route optimization core: capacitated vehicle routing
//! with time windows, priority tiers, drop-with-penalty, a live/fallback
//! travel-cost matrix source, and a replanning trigger based on ETA drift.
//!
//! The crate performs no I/O of its own. An orchestrator supplies locations,
//! stops, vehicles, and configuration; the crate returns matrices, a
//! [`RoutePlan`](models::RoutePlan), or a
//! [`ReoptimizationDecision`](reopt::ReoptimizationDecision) as pure data.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Stop, Vehicle, TimeWindow, RoutePlan)
//! - [`config`] — Validated optimizer configuration
//! - [`matrix`] — Travel time/distance matrix and the live/fallback source
//! - [`cost`] — Edge weighting model (time, distance, priority bias)
//! - [`solver`] — Constructive + local-search VRP solver with drop penalties
//! - [`reopt`] — Reoptimization trigger on ETA variance
//! - [`error`] — Crate error taxonomy
//!
//! ## Entry points
//!
//! - [`matrix::CostMatrixSource::get_matrices`] — compute the cost matrices
//! - [`solver::solve`] — compute a route plan
//! - [`reopt::check_reoptimization`] — decide whether to replan

pub mod config;
pub mod cost;
pub mod error;
pub mod matrix;
pub mod models;
pub mod reopt;
pub mod solver;
