//! Route optimizer: construction heuristic plus guided local search.
//!
//! One route per travel day, all starting and ending at the depot. An
//! initial solution is built by cheapest insertion (required nodes first,
//! then optionals whose best insertion beats their drop penalty), then
//! improved by guided local search: at each local optimum the highest
//! utility arcs are penalized so the search is pushed away from expensive,
//! frequently reused legs. The search is bounded by a wall-clock budget
//! and returns the best feasible solution found, or `None` when required
//! nodes cannot all be scheduled.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::problem::{DEPOT, RoutingProblem};

#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget for the whole search.
    pub time_budget: Duration,
    /// Guided-local-search lambda as a fraction of mean arc cost.
    pub gls_lambda_factor: f64,
    /// Stop after this many penalization rounds without a better solution.
    pub stagnation_limit: u32,
    /// Seed for the restart shuffles; fixed for reproducible runs.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(20),
            gls_lambda_factor: 0.2,
            stagnation_limit: 400,
            seed: 0x17A3_90D1,
        }
    }
}

/// Best-found assignment, ready for decoding.
#[derive(Debug, Clone)]
pub struct RawSolution {
    /// Interior node sequence per day (depot implied at both ends).
    pub routes: Vec<Vec<usize>>,
    /// Cumulative minute values per day: depot departure, one entry per
    /// stop (service start plus its visit duration), depot return.
    pub cumul: Vec<Vec<i32>>,
    /// Total travel minutes over all days.
    pub travel_cost: i64,
    /// Optional nodes left out of the solution.
    pub dropped: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Candidate {
    routes: Vec<Vec<usize>>,
    dropped: Vec<usize>,
}

/// Travel cost plus drop penalties: the objective being minimized.
fn real_cost(problem: &RoutingProblem, cand: &Candidate) -> i64 {
    let travel: i64 = cand
        .routes
        .iter()
        .map(|route| problem.route_travel_cost(route))
        .sum();
    let penalties: i64 = cand.dropped.iter().map(|&node| problem.penalty(node)).sum();
    travel + penalties
}

pub fn solve(problem: &RoutingProblem, config: &SolverConfig) -> Option<RawSolution> {
    let started = Instant::now();
    let deadline = started + config.time_budget;

    // A required node whose window closes before it can ever be reached
    // from the depot makes the whole instance infeasible, no search needed.
    let depot_open = problem.windows[DEPOT].0;
    for node in 1..problem.optional_start {
        let earliest = depot_open + problem.time[DEPOT][node];
        let (open, close) = problem.windows[node];
        if earliest.max(open) > close {
            debug!(node, open, close, "required node unreachable within its window");
            return None;
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut current = construct(problem, &mut rng, deadline)?;
    let mut best = current.clone();
    let mut best_cost = real_cost(problem, &best);

    let mut gls = Gls::new(problem);
    let mut stagnation = 0u32;
    while Instant::now() < deadline && stagnation < config.stagnation_limit {
        gls.improve(&mut current, deadline);

        let cost = real_cost(problem, &current);
        if cost < best_cost {
            best_cost = cost;
            best = current.clone();
            stagnation = 0;
        } else {
            stagnation += 1;
        }

        if gls.lambda == 0 {
            gls.set_lambda(config.gls_lambda_factor, &current);
        }
        gls.penalize(&current);
    }

    info!(
        cost = best_cost,
        dropped = best.dropped.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "itinerary search finished"
    );
    finalize(problem, &best)
}

// ============================================================================
// Construction
// ============================================================================

/// Cheapest-insertion construction with randomized-restart orders.
///
/// The first attempt inserts whichever remaining required node is globally
/// cheapest to place. If that dead-ends (tight windows can make greedy
/// choices fatal), required nodes are re-inserted sequentially in an
/// earliest-deadline order and then in shuffled orders until the budget
/// runs out.
fn construct(
    problem: &RoutingProblem,
    rng: &mut StdRng,
    deadline: Instant,
) -> Option<Candidate> {
    let required: Vec<usize> = (1..problem.optional_start).collect();

    if let Some(cand) = build_global_cheapest(problem, &required) {
        return Some(finish_with_optionals(problem, cand));
    }

    let mut order = required.clone();
    order.sort_by_key(|&node| problem.windows[node].1);
    let mut attempts = 1u64;
    loop {
        if let Some(cand) = build_sequential(problem, &order) {
            debug!(attempts, "construction succeeded after restart");
            return Some(finish_with_optionals(problem, cand));
        }
        if Instant::now() >= deadline {
            debug!(attempts, "construction exhausted its budget");
            return None;
        }
        order.shuffle(rng);
        attempts += 1;
    }
}

/// Insert the globally cheapest (node, day, position) until all required
/// nodes are routed, or fail when one has no feasible slot left.
fn build_global_cheapest(problem: &RoutingProblem, required: &[usize]) -> Option<Candidate> {
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); problem.days];
    let mut pending: Vec<usize> = required.to_vec();

    while !pending.is_empty() {
        let mut best: Option<(i64, usize, usize, usize)> = None;
        for (which, &node) in pending.iter().enumerate() {
            if let Some((delta, day, pos)) = best_insertion(problem, &routes, node) {
                if best.is_none_or(|(cost, ..)| delta < cost) {
                    best = Some((delta, which, day, pos));
                }
            }
        }
        let (_, which, day, pos) = best?;
        let node = pending.swap_remove(which);
        routes[day].insert(pos, node);
    }

    Some(Candidate {
        routes,
        dropped: Vec::new(),
    })
}

/// Insert required nodes one by one in the given order, each at its own
/// best feasible slot.
fn build_sequential(problem: &RoutingProblem, order: &[usize]) -> Option<Candidate> {
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); problem.days];
    for &node in order {
        let (_, day, pos) = best_insertion(problem, &routes, node)?;
        routes[day].insert(pos, node);
    }
    Some(Candidate {
        routes,
        dropped: Vec::new(),
    })
}

/// Add each optional node whose cheapest feasible insertion costs less
/// than its drop penalty; leave the rest dropped.
fn finish_with_optionals(problem: &RoutingProblem, mut cand: Candidate) -> Candidate {
    for node in problem.optional_start..problem.node_count() {
        match best_insertion(problem, &cand.routes, node) {
            Some((delta, day, pos)) if delta < problem.penalty(node) => {
                cand.routes[day].insert(pos, node);
            }
            _ => cand.dropped.push(node),
        }
    }
    cand
}

/// Cheapest feasible (delta, day, position) for inserting `node`, by real
/// travel cost.
fn best_insertion(
    problem: &RoutingProblem,
    routes: &[Vec<usize>],
    node: usize,
) -> Option<(i64, usize, usize)> {
    let mut best: Option<(i64, usize, usize)> = None;
    for (day, route) in routes.iter().enumerate() {
        let base = problem.route_travel_cost(route);
        let mut candidate = route.clone();
        for pos in 0..=route.len() {
            candidate.insert(pos, node);
            if problem.schedule_route(&candidate).is_some() {
                let delta = problem.route_travel_cost(&candidate) - base;
                if best.is_none_or(|(cost, ..)| delta < cost) {
                    best = Some((delta, day, pos));
                }
            }
            candidate.remove(pos);
        }
    }
    best
}

// ============================================================================
// Guided local search
// ============================================================================

struct Gls<'a> {
    problem: &'a RoutingProblem,
    /// Directed arc penalty counts, row-major.
    pen: Vec<u32>,
    lambda: i64,
    n: usize,
}

impl<'a> Gls<'a> {
    fn new(problem: &'a RoutingProblem) -> Self {
        let n = problem.node_count();
        Self {
            problem,
            pen: vec![0; n * n],
            lambda: 0,
            n,
        }
    }

    fn set_lambda(&mut self, factor: f64, cand: &Candidate) {
        let travel: i64 = cand
            .routes
            .iter()
            .map(|route| self.problem.route_travel_cost(route))
            .sum();
        let arcs: usize = cand
            .routes
            .iter()
            .filter(|route| !route.is_empty())
            .map(|route| route.len() + 1)
            .sum();
        if travel > 0 && arcs > 0 {
            self.lambda = ((factor * travel as f64 / arcs as f64).round() as i64).max(1);
        } else {
            self.lambda = 1;
        }
    }

    fn arc_aug(&self, from: usize, to: usize) -> i64 {
        self.problem.time[from][to] as i64 + self.lambda * self.pen[from * self.n + to] as i64
    }

    fn route_aug_cost(&self, route: &[usize]) -> i64 {
        let mut cost = 0i64;
        let mut prev = DEPOT;
        for &node in route {
            cost += self.arc_aug(prev, node);
            prev = node;
        }
        if !route.is_empty() {
            cost += self.arc_aug(prev, DEPOT);
        }
        cost
    }

    /// First-improvement descent to a local optimum of the augmented
    /// objective, or until the deadline.
    fn improve(&self, cand: &mut Candidate, deadline: Instant) {
        loop {
            if Instant::now() >= deadline {
                return;
            }
            if self.try_relocate(cand)
                || self.try_two_opt(cand)
                || self.try_swap(cand)
                || self.try_drop(cand)
                || self.try_reinsert(cand)
            {
                continue;
            }
            return;
        }
    }

    /// Move one node to any other feasible position, same day or another.
    fn try_relocate(&self, cand: &mut Candidate) -> bool {
        for from_day in 0..cand.routes.len() {
            for idx in 0..cand.routes[from_day].len() {
                let node = cand.routes[from_day][idx];
                let mut source = cand.routes[from_day].clone();
                source.remove(idx);
                let old_source_cost = self.route_aug_cost(&cand.routes[from_day]);

                for to_day in 0..cand.routes.len() {
                    if to_day == from_day {
                        let old = old_source_cost;
                        let mut candidate = source.clone();
                        for pos in 0..=source.len() {
                            if pos == idx {
                                continue;
                            }
                            candidate.insert(pos, node);
                            if self.route_aug_cost(&candidate) < old
                                && self.problem.schedule_route(&candidate).is_some()
                            {
                                cand.routes[from_day] = candidate;
                                return true;
                            }
                            candidate.remove(pos);
                        }
                    } else {
                        if self.problem.schedule_route(&source).is_none() {
                            continue;
                        }
                        let old = old_source_cost + self.route_aug_cost(&cand.routes[to_day]);
                        let source_cost = self.route_aug_cost(&source);
                        let mut candidate = cand.routes[to_day].clone();
                        for pos in 0..=cand.routes[to_day].len() {
                            candidate.insert(pos, node);
                            if source_cost + self.route_aug_cost(&candidate) < old
                                && self.problem.schedule_route(&candidate).is_some()
                            {
                                cand.routes[to_day] = candidate;
                                cand.routes[from_day] = source;
                                return true;
                            }
                            candidate.remove(pos);
                        }
                    }
                }
            }
        }
        false
    }

    /// Reverse a segment within a day's route.
    fn try_two_opt(&self, cand: &mut Candidate) -> bool {
        for day in 0..cand.routes.len() {
            let route = &cand.routes[day];
            if route.len() < 3 {
                continue;
            }
            let old = self.route_aug_cost(route);
            for i in 0..route.len() - 1 {
                for j in i + 2..route.len() {
                    let mut candidate = route.clone();
                    candidate[i..=j].reverse();
                    if self.route_aug_cost(&candidate) < old
                        && self.problem.schedule_route(&candidate).is_some()
                    {
                        cand.routes[day] = candidate;
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exchange one node between two different days.
    fn try_swap(&self, cand: &mut Candidate) -> bool {
        for day_a in 0..cand.routes.len() {
            for day_b in day_a + 1..cand.routes.len() {
                let old = self.route_aug_cost(&cand.routes[day_a])
                    + self.route_aug_cost(&cand.routes[day_b]);
                for i in 0..cand.routes[day_a].len() {
                    for j in 0..cand.routes[day_b].len() {
                        let mut route_a = cand.routes[day_a].clone();
                        let mut route_b = cand.routes[day_b].clone();
                        std::mem::swap(&mut route_a[i], &mut route_b[j]);
                        if self.route_aug_cost(&route_a) + self.route_aug_cost(&route_b) < old
                            && self.problem.schedule_route(&route_a).is_some()
                            && self.problem.schedule_route(&route_b).is_some()
                        {
                            cand.routes[day_a] = route_a;
                            cand.routes[day_b] = route_b;
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Remove an optional node when its drop penalty is cheaper than the
    /// augmented cost of keeping it routed.
    fn try_drop(&self, cand: &mut Candidate) -> bool {
        for day in 0..cand.routes.len() {
            for idx in 0..cand.routes[day].len() {
                let node = cand.routes[day][idx];
                if !self.problem.is_optional(node) {
                    continue;
                }
                let old = self.route_aug_cost(&cand.routes[day]);
                let mut candidate = cand.routes[day].clone();
                candidate.remove(idx);
                let delta = self.route_aug_cost(&candidate) - old + self.problem.penalty(node);
                if delta < 0 && self.problem.schedule_route(&candidate).is_some() {
                    cand.routes[day] = candidate;
                    cand.dropped.push(node);
                    return true;
                }
            }
        }
        false
    }

    /// Bring a dropped optional node back when its best insertion beats
    /// its penalty.
    fn try_reinsert(&self, cand: &mut Candidate) -> bool {
        for which in 0..cand.dropped.len() {
            let node = cand.dropped[which];
            let mut best: Option<(i64, usize, usize)> = None;
            for (day, route) in cand.routes.iter().enumerate() {
                let base = self.route_aug_cost(route);
                let mut candidate = route.clone();
                for pos in 0..=route.len() {
                    candidate.insert(pos, node);
                    if self.problem.schedule_route(&candidate).is_some() {
                        let delta = self.route_aug_cost(&candidate) - base;
                        if best.is_none_or(|(cost, ..)| delta < cost) {
                            best = Some((delta, day, pos));
                        }
                    }
                    candidate.remove(pos);
                }
            }
            if let Some((delta, day, pos)) = best {
                if delta < self.problem.penalty(node) {
                    cand.routes[day].insert(pos, node);
                    cand.dropped.swap_remove(which);
                    return true;
                }
            }
        }
        false
    }

    /// Penalize the maximum-utility arcs of the current solution, where
    /// utility is travel cost discounted by how often the arc has already
    /// been penalized.
    fn penalize(&mut self, cand: &Candidate) {
        let mut max_util = 0.0f64;
        let mut worst: Vec<(usize, usize)> = Vec::new();
        for route in &cand.routes {
            if route.is_empty() {
                continue;
            }
            let mut prev = DEPOT;
            for step in 0..=route.len() {
                let next = if step == route.len() { DEPOT } else { route[step] };
                let cost = self.problem.time[prev][next] as f64;
                let util = cost / (1.0 + self.pen[prev * self.n + next] as f64);
                if util > max_util {
                    max_util = util;
                    worst.clear();
                    worst.push((prev, next));
                } else if util == max_util && util > 0.0 {
                    worst.push((prev, next));
                }
                prev = next;
            }
        }
        for (from, to) in worst {
            self.pen[from * self.n + to] += 1;
        }
    }
}

/// Schedule every route of the best candidate and package the raw
/// solution for decoding.
fn finalize(problem: &RoutingProblem, cand: &Candidate) -> Option<RawSolution> {
    let mut cumul = Vec::with_capacity(cand.routes.len());
    let mut travel_cost = 0i64;
    for route in &cand.routes {
        let schedule = problem.schedule_route(route)?;
        let mut day = Vec::with_capacity(route.len() + 2);
        day.push(schedule.depart);
        for (&node, &start) in route.iter().zip(&schedule.service_start) {
            day.push(start + problem.visit[node]);
        }
        day.push(schedule.return_arrival);
        cumul.push(day);
        travel_cost += problem.route_travel_cost(route);
    }

    let mut dropped = cand.dropped.clone();
    dropped.sort_unstable();
    Some(RawSolution {
        routes: cand.routes.clone(),
        cumul,
        travel_cost,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::RoutingProblem;

    fn quick_config() -> SolverConfig {
        SolverConfig {
            time_budget: Duration::from_millis(250),
            ..SolverConfig::default()
        }
    }

    fn line_problem(days: usize) -> RoutingProblem {
        // Depot and two stops on a line: 0 --1-- 1 --1-- 2, t[0][2] = 2.
        let time = vec![vec![0, 1, 2], vec![1, 0, 1], vec![2, 1, 0]];
        RoutingProblem::new(time, vec![(0, 1440); 3], vec![0; 3], days, 3, false)
    }

    #[test]
    fn test_two_stop_tour_is_optimal() {
        let problem = line_problem(1);
        let raw = solve(&problem, &quick_config()).expect("feasible");
        assert_eq!(raw.travel_cost, 4);
        assert_eq!(raw.routes.len(), 1);
        let mut visited = raw.routes[0].clone();
        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2]);
        assert!(raw.dropped.is_empty());
    }

    #[test]
    fn test_unreachable_required_window_is_infeasible() {
        let time = vec![vec![0, 50], vec![50, 0]];
        let windows = vec![(0, 1440), (0, 10)];
        let problem = RoutingProblem::new(time, windows, vec![0, 0], 1, 2, false);
        assert!(solve(&problem, &quick_config()).is_none());
    }

    #[test]
    fn test_expensive_optional_is_dropped() {
        // Node 1 required and close; node 2 optional and far out.
        let time = vec![vec![0, 1, 100], vec![1, 0, 99], vec![100, 99, 0]];
        let problem =
            RoutingProblem::new(time, vec![(0, 1440); 3], vec![0; 3], 1, 2, false);
        // Detour to include node 2 costs ~198; its penalty is 99.
        assert_eq!(problem.penalty(2), 99);
        let raw = solve(&problem, &quick_config()).expect("feasible");
        assert_eq!(raw.routes[0], vec![1]);
        assert_eq!(raw.dropped, vec![2]);
        assert_eq!(raw.travel_cost, 2);
    }

    #[test]
    fn test_on_the_way_optional_is_kept() {
        // Node 2 optional, directly between depot and required node 1.
        let time = vec![vec![0, 2, 1], vec![2, 0, 1], vec![1, 1, 0]];
        let problem =
            RoutingProblem::new(time, vec![(0, 1440); 3], vec![0; 3], 1, 2, false);
        let raw = solve(&problem, &quick_config()).expect("feasible");
        assert!(raw.dropped.is_empty());
        assert_eq!(raw.travel_cost, 4);
    }

    #[test]
    fn test_empty_day_produces_depot_only_cumul() {
        let problem = line_problem(3);
        let raw = solve(&problem, &quick_config()).expect("feasible");
        assert_eq!(raw.cumul.len(), 3);
        let empty_days = raw.routes.iter().filter(|r| r.is_empty()).count();
        assert_eq!(empty_days, 2);
        for (route, cumul) in raw.routes.iter().zip(&raw.cumul) {
            assert_eq!(cumul.len(), route.len() + 2);
        }
    }

    #[test]
    fn test_tight_windows_force_ordering() {
        // Node 2 closes early, node 1 opens late: feasible order is 2 then 1.
        let time = vec![vec![0, 10, 10], vec![10, 0, 10], vec![10, 10, 0]];
        let windows = vec![(0, 1440), (200, 1440), (0, 60)];
        let problem = RoutingProblem::new(time, windows, vec![30, 30, 30], 1, 3, false);
        let raw = solve(&problem, &quick_config()).expect("feasible");
        assert_eq!(raw.routes[0], vec![2, 1]);
    }
}
