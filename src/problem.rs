//! Routing problem instance.
//!
//! Immutable once built, owned by a single optimization call and discarded
//! when it returns. Everything is plain index-addressed data: node 0 is the
//! depot, required nodes follow it, optional nodes occupy the tail range
//! and each carries a drop penalty.

/// Inclusive arrival window, minutes-of-day.
pub type Window = (i32, i32);

/// The depot is always the first node of the instance.
pub const DEPOT: usize = 0;

/// An immutable multi-day routing instance.
#[derive(Debug, Clone)]
pub struct RoutingProblem {
    /// Travel minutes between node pairs; square, zero diagonal.
    pub time: Vec<Vec<i32>>,
    /// Arrival window per node; the depot's window bounds each day's
    /// start and end.
    pub windows: Vec<Window>,
    /// Mandatory dwell minutes per node, consumed before departure.
    pub visit: Vec<i32>,
    /// Number of travel days (one route per day).
    pub days: usize,
    /// Nodes at indices `>= optional_start` may be dropped at a penalty.
    pub optional_start: usize,
    /// Drop penalty per node; `None` marks a required node.
    pub drop_penalty: Vec<Option<i64>>,
}

/// Feasible timing of one day's route.
#[derive(Debug, Clone)]
pub struct DaySchedule {
    /// Minute the route leaves the depot (the depot window's open).
    pub depart: i32,
    /// Minute service begins at each routed node, in route order.
    pub service_start: Vec<i32>,
    /// Minute the route arrives back at the depot.
    pub return_arrival: i32,
}

impl RoutingProblem {
    /// Build an instance from a prepared time matrix.
    ///
    /// `windows` and `visit` are indexed like the matrix; nodes at
    /// `optional_start..` are droppable. The baseline drop penalty is half
    /// the sum, over all non-depot nodes, of their travel time to every
    /// other non-depot node; with `ranking_considered`, each rank step from
    /// the least-preferred optional toward the most-preferred multiplies
    /// the penalty by 1.05.
    pub fn new(
        time: Vec<Vec<i32>>,
        windows: Vec<Window>,
        visit: Vec<i32>,
        days: usize,
        optional_start: usize,
        ranking_considered: bool,
    ) -> Self {
        let n = time.len();
        debug_assert_eq!(windows.len(), n);
        debug_assert_eq!(visit.len(), n);
        debug_assert!(optional_start >= 1 && optional_start <= n);

        let base = baseline_penalty(&time);
        let mut drop_penalty = vec![None; n];
        let mut factor = 1.0f64;
        for idx in (optional_start..n).rev() {
            let penalty = if ranking_considered {
                (base as f64 * factor).round() as i64
            } else {
                base
            };
            drop_penalty[idx] = Some(penalty);
            factor *= 1.05;
        }

        Self {
            time,
            windows,
            visit,
            days,
            optional_start,
            drop_penalty,
        }
    }

    pub fn node_count(&self) -> usize {
        self.time.len()
    }

    pub fn is_optional(&self, node: usize) -> bool {
        node >= self.optional_start
    }

    pub fn penalty(&self, node: usize) -> i64 {
        self.drop_penalty[node].unwrap_or(i64::MAX)
    }

    /// Travel minutes for one day's route (depot legs included).
    pub fn route_travel_cost(&self, route: &[usize]) -> i64 {
        let mut cost = 0i64;
        let mut prev = DEPOT;
        for &node in route {
            cost += self.time[prev][node] as i64;
            prev = node;
        }
        if !route.is_empty() {
            cost += self.time[prev][DEPOT] as i64;
        }
        cost
    }

    /// Forward-schedule one day's route, earliest start first.
    ///
    /// The route lists interior nodes only; the depot brackets it. Service
    /// at a node begins when its window opens or on arrival, whichever is
    /// later, and must begin no later than the window close. The route
    /// must return to the depot before the depot window closes. Returns
    /// `None` when any of that fails.
    pub fn schedule_route(&self, route: &[usize]) -> Option<DaySchedule> {
        let (depot_open, depot_close) = self.windows[DEPOT];
        let depart = depot_open;

        let mut t = depart;
        let mut prev = DEPOT;
        let mut service_start = Vec::with_capacity(route.len());

        for &node in route {
            let arrival = t + self.time[prev][node];
            let (open, close) = self.windows[node];
            let start = arrival.max(open);
            if start > close {
                return None;
            }
            service_start.push(start);
            t = start + self.visit[node];
            prev = node;
        }

        let return_arrival = if route.is_empty() {
            depart
        } else {
            t + self.time[prev][DEPOT]
        };
        if return_arrival > depot_close {
            return None;
        }

        Some(DaySchedule {
            depart,
            service_start,
            return_arrival,
        })
    }
}

/// Half the sum over non-depot nodes of their travel time to all other
/// nodes, excluding the depot leg. Each undirected pair is counted from
/// both ends before halving; kept that way as a tuning constant.
fn baseline_penalty(time: &[Vec<i32>]) -> i64 {
    let mut total = 0i64;
    for (idx, row) in time.iter().enumerate().skip(1) {
        let row_sum: i64 = row.iter().map(|&t| t as i64).sum();
        total += row_sum - time[idx][DEPOT] as i64;
    }
    total / 2
}
