//! Local-search improvement under a cooperative budget.
//!
//! Operators: relocate (move a stop to another route/position), swap
//! (exchange two stops between routes), and 2-opt (reverse an intra-route
//! segment). Each step applies the best strictly improving move; after every
//! step the solver retries inserting dropped stops. When the search reaches
//! a local optimum with budget remaining, a seeded random
//! removal-and-reinsert perturbation restarts it, and the best plan seen is
//! what the solver returns.
//!
//! The budget is checked between moves, never preemptively, so callers can
//! bound or cancel a solve at move granularity.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SolveBudget;

use super::insertion::{insert_all, EPS};
use super::SearchContext;

/// Share of assigned stops removed by one perturbation.
const PERTURBATION_DEGREE: f64 = 0.15;

/// Cooperative computation budget, consumed one step at a time.
pub(crate) enum BudgetGuard {
    Iterations { remaining: u32 },
    Deadline { deadline: Instant },
}

impl BudgetGuard {
    pub fn new(budget: SolveBudget) -> Self {
        match budget {
            SolveBudget::Iterations(n) => Self::Iterations { remaining: n },
            SolveBudget::TimeLimit(limit) => Self::Deadline {
                deadline: Instant::now() + limit,
            },
        }
    }

    /// Consumes one step; returns `false` once the budget is exhausted.
    pub fn step(&mut self) -> bool {
        match self {
            Self::Iterations { remaining } => {
                if *remaining == 0 {
                    false
                } else {
                    *remaining -= 1;
                    true
                }
            }
            Self::Deadline { deadline } => Instant::now() < *deadline,
        }
    }
}

/// A candidate local-search move.
#[derive(Debug, Clone, Copy)]
enum Move {
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    Swap {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    TwoOpt {
        route: usize,
        start: usize,
        end: usize,
    },
}

/// Improves routes in place until the budget runs out, keeping dropped-stop
/// reinsertion and best-plan tracking inside the loop.
pub(crate) fn improve(
    ctx: &SearchContext<'_>,
    routes: &mut Vec<Vec<usize>>,
    unassigned: &mut Vec<usize>,
) {
    let mut budget = BudgetGuard::new(ctx.budget);
    let mut rng = StdRng::seed_from_u64(ctx.perturbation_seed);

    let mut best_routes = routes.clone();
    let mut best_unassigned = unassigned.clone();
    let mut best_objective = ctx.objective(routes, unassigned);

    while budget.step() {
        match find_best_move(ctx, routes) {
            Some((mv, _delta)) => {
                apply_move(routes, mv);
                insert_all(ctx, routes, unassigned);
            }
            None => {
                // Local optimum: diversify and repair.
                perturb(routes, unassigned, &mut rng);
                insert_all(ctx, routes, unassigned);
            }
        }

        let objective = ctx.objective(routes, unassigned);
        if objective < best_objective - EPS {
            best_objective = objective;
            best_routes = routes.clone();
            best_unassigned = unassigned.clone();
        }
    }

    *routes = best_routes;
    *unassigned = best_unassigned;
}

/// Scans every operator and returns the best strictly improving move.
///
/// Enumeration order is fixed, so ties resolve to the first candidate found
/// and the search stays deterministic under an iteration budget.
fn find_best_move(ctx: &SearchContext<'_>, routes: &[Vec<usize>]) -> Option<(Move, f64)> {
    let mut best: Option<(Move, f64)> = None;
    let mut consider = |mv: Move, delta: f64| {
        if delta < -EPS && best.as_ref().is_none_or(|(_, d)| delta < *d - EPS) {
            best = Some((mv, delta));
        }
    };

    scan_relocates(ctx, routes, &mut consider);
    scan_swaps(ctx, routes, &mut consider);
    scan_two_opts(ctx, routes, &mut consider);

    best
}

fn scan_relocates(
    ctx: &SearchContext<'_>,
    routes: &[Vec<usize>],
    consider: &mut impl FnMut(Move, f64),
) {
    for from_route in 0..routes.len() {
        for from_pos in 0..routes[from_route].len() {
            let stop = routes[from_route][from_pos];
            let mut without = routes[from_route].clone();
            without.remove(from_pos);
            let from_old_cost = ctx.route_cost(&routes[from_route]);
            let from_new_cost = ctx.route_cost(&without);

            for to_route in 0..routes.len() {
                if to_route == from_route {
                    // Intra-route reposition.
                    if !ctx.evaluator.is_feasible(&without, &ctx.vehicles[from_route]) {
                        // Removing a stop never breaks feasibility, but the
                        // scan also guards shift windows; skip defensively.
                        continue;
                    }
                    for to_pos in 0..=without.len() {
                        if to_pos == from_pos {
                            continue;
                        }
                        let mut candidate = without.clone();
                        candidate.insert(to_pos, stop);
                        if !ctx.evaluator.is_feasible(&candidate, &ctx.vehicles[to_route]) {
                            continue;
                        }
                        let delta = ctx.route_cost(&candidate) - from_old_cost;
                        consider(
                            Move::Relocate {
                                from_route,
                                from_pos,
                                to_route,
                                to_pos,
                            },
                            delta,
                        );
                    }
                } else {
                    let target = &routes[to_route];
                    let vehicle = &ctx.vehicles[to_route];
                    if ctx.route_load(target) + ctx.stops[stop].demand() > vehicle.capacity() {
                        continue;
                    }
                    let to_old_cost = ctx.route_cost(target);
                    for to_pos in 0..=target.len() {
                        let mut candidate = target.clone();
                        candidate.insert(to_pos, stop);
                        if !ctx.evaluator.is_feasible(&candidate, vehicle) {
                            continue;
                        }
                        let delta = (from_new_cost + ctx.route_cost(&candidate))
                            - (from_old_cost + to_old_cost);
                        consider(
                            Move::Relocate {
                                from_route,
                                from_pos,
                                to_route,
                                to_pos,
                            },
                            delta,
                        );
                    }
                }
            }
        }
    }
}

fn scan_swaps(
    ctx: &SearchContext<'_>,
    routes: &[Vec<usize>],
    consider: &mut impl FnMut(Move, f64),
) {
    for route_a in 0..routes.len() {
        for route_b in (route_a + 1)..routes.len() {
            let old_cost = ctx.route_cost(&routes[route_a]) + ctx.route_cost(&routes[route_b]);
            for pos_a in 0..routes[route_a].len() {
                for pos_b in 0..routes[route_b].len() {
                    let mut a = routes[route_a].clone();
                    let mut b = routes[route_b].clone();
                    std::mem::swap(&mut a[pos_a], &mut b[pos_b]);

                    if ctx.route_load(&a) > ctx.vehicles[route_a].capacity()
                        || ctx.route_load(&b) > ctx.vehicles[route_b].capacity()
                    {
                        continue;
                    }
                    if !ctx.evaluator.is_feasible(&a, &ctx.vehicles[route_a])
                        || !ctx.evaluator.is_feasible(&b, &ctx.vehicles[route_b])
                    {
                        continue;
                    }

                    let delta = (ctx.route_cost(&a) + ctx.route_cost(&b)) - old_cost;
                    consider(
                        Move::Swap {
                            route_a,
                            pos_a,
                            route_b,
                            pos_b,
                        },
                        delta,
                    );
                }
            }
        }
    }
}

fn scan_two_opts(
    ctx: &SearchContext<'_>,
    routes: &[Vec<usize>],
    consider: &mut impl FnMut(Move, f64),
) {
    for (r, route) in routes.iter().enumerate() {
        if route.len() < 2 {
            continue;
        }
        let old_cost = ctx.route_cost(route);
        for start in 0..route.len() - 1 {
            for end in (start + 1)..route.len() {
                let mut candidate = route.clone();
                candidate[start..=end].reverse();
                if !ctx.evaluator.is_feasible(&candidate, &ctx.vehicles[r]) {
                    continue;
                }
                let delta = ctx.route_cost(&candidate) - old_cost;
                consider(Move::TwoOpt { route: r, start, end }, delta);
            }
        }
    }
}

fn apply_move(routes: &mut [Vec<usize>], mv: Move) {
    match mv {
        Move::Relocate {
            from_route,
            from_pos,
            to_route,
            to_pos,
        } => {
            let stop = routes[from_route].remove(from_pos);
            routes[to_route].insert(to_pos, stop);
        }
        Move::Swap {
            route_a,
            pos_a,
            route_b,
            pos_b,
        } => {
            let a = routes[route_a][pos_a];
            let b = routes[route_b][pos_b];
            routes[route_a][pos_a] = b;
            routes[route_b][pos_b] = a;
        }
        Move::TwoOpt { route, start, end } => {
            routes[route][start..=end].reverse();
        }
    }
}

/// Removes a seeded random share of assigned stops back into `unassigned`.
///
/// The caller repairs with [`insert_all`]; the improvement loop's best-plan
/// tracking makes a failed diversification harmless.
fn perturb(routes: &mut [Vec<usize>], unassigned: &mut Vec<usize>, rng: &mut StdRng) {
    let assigned: usize = routes.iter().map(Vec::len).sum();
    if assigned == 0 {
        return;
    }
    let num_remove = (((assigned as f64) * PERTURBATION_DEGREE).round() as usize).max(1);

    for _ in 0..num_remove {
        let remaining: usize = routes.iter().map(Vec::len).sum();
        if remaining == 0 {
            break;
        }
        let target = rng.random_range(0..remaining);
        let mut counted = 0;
        for route in routes.iter_mut() {
            if counted + route.len() > target {
                let stop = route.remove(target - counted);
                unassigned.push(stop);
                break;
            }
            counted += route.len();
        }
    }
    unassigned.sort_unstable();
}
