//! Greedy cheapest-insertion construction.
//!
//! Repeatedly inserts the globally cheapest feasible (stop, route, position)
//! triple until nothing placeable remains. An insertion is taken only when
//! its marginal cost is below the stop's drop penalty, so construction never
//! increases the objective relative to leaving the stop dropped.
//!
//! Tie-break for equal marginal cost: least added waiting time, then lowest
//! stop index, then lowest route index, then lowest position. This makes
//! construction fully deterministic for identical inputs.

use super::SearchContext;

/// Float comparison slack for cost deltas.
pub(crate) const EPS: f64 = 1e-9;

/// A candidate placement of one stop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Insertion {
    pub stop: usize,
    pub route: usize,
    pub position: usize,
    pub delta_cost: f64,
    pub added_wait: f64,
}

/// Deterministic preference order between two candidates.
pub(crate) fn better(a: &Insertion, b: &Insertion) -> bool {
    if a.delta_cost < b.delta_cost - EPS {
        return true;
    }
    if a.delta_cost > b.delta_cost + EPS {
        return false;
    }
    if a.added_wait < b.added_wait - EPS {
        return true;
    }
    if a.added_wait > b.added_wait + EPS {
        return false;
    }
    (a.stop, a.route, a.position) < (b.stop, b.route, b.position)
}

/// Finds the cheapest feasible placement for one stop across all routes.
pub(crate) fn best_insertion_for_stop(
    ctx: &SearchContext<'_>,
    routes: &[Vec<usize>],
    stop: usize,
) -> Option<Insertion> {
    let demand = ctx.stops[stop].demand();
    let mut best: Option<Insertion> = None;

    for (r, route) in routes.iter().enumerate() {
        let vehicle = &ctx.vehicles[r];
        if ctx.route_load(route) + demand > vehicle.capacity() {
            continue;
        }
        let Some(base) = ctx.evaluator.scan(route, vehicle) else {
            continue;
        };
        let base_cost = ctx.route_cost(route);

        for position in 0..=route.len() {
            let mut candidate = route.clone();
            candidate.insert(position, stop);

            let Some(metrics) = ctx.evaluator.scan(&candidate, vehicle) else {
                continue;
            };

            let insertion = Insertion {
                stop,
                route: r,
                position,
                delta_cost: ctx.route_cost(&candidate) - base_cost,
                added_wait: metrics.total_wait - base.total_wait,
            };
            if best.as_ref().is_none_or(|b| better(&insertion, b)) {
                best = Some(insertion);
            }
        }
    }

    best
}

/// Greedy global cheapest insertion of every placeable unassigned stop.
///
/// Stops whose cheapest placement would cost more than their drop penalty —
/// or which have no feasible placement at all — are left in `unassigned`.
pub(crate) fn insert_all(
    ctx: &SearchContext<'_>,
    routes: &mut [Vec<usize>],
    unassigned: &mut Vec<usize>,
) {
    loop {
        let mut best: Option<Insertion> = None;

        for &stop in unassigned.iter() {
            if let Some(candidate) = best_insertion_for_stop(ctx, routes, stop) {
                if candidate.delta_cost < ctx.drop_penalty_for(stop) - EPS
                    && best.as_ref().is_none_or(|b| better(&candidate, b))
                {
                    best = Some(candidate);
                }
            }
        }

        match best {
            Some(ins) => {
                routes[ins.route].insert(ins.position, ins.stop);
                unassigned.retain(|&s| s != ins.stop);
            }
            None => break,
        }
    }
}
