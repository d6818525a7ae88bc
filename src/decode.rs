//! Solution decoder.
//!
//! Turns the optimizer's raw per-day node sequences and cumulative minute
//! values into named day plans plus aggregate statistics for the
//! presentation layer.

use std::collections::HashSet;

use crate::model::{Itinerary, Location, Stop};
use crate::problem::{DEPOT, RoutingProblem};
use crate::solver::RawSolution;

/// Decode a raw solution against the location list the instance was built
/// from (same index order as the matrix).
///
/// Each stop's `travel_time` is its raw cumulative value minus its own
/// visit duration, so the field reads as elapsed time up to the start of
/// service. The depot opens and closes every day plan. `total_travel_time`
/// sums, per day, the last stop's value minus the first stop's value,
/// which cancels out the pre-first-stop offset of the day's start.
pub fn decode(problem: &RoutingProblem, locations: &[Location], raw: &RawSolution) -> Itinerary {
    let mut day_plans = Vec::with_capacity(raw.routes.len());
    let mut total_travel_time = 0;
    let mut total_visit_time = 0;
    let mut sites: HashSet<&str> = HashSet::new();

    for (route, cumul) in raw.routes.iter().zip(&raw.cumul) {
        let mut stops = Vec::with_capacity(route.len() + 2);
        stops.push(make_stop(problem, locations, DEPOT, cumul[0]));
        for (&node, &value) in route.iter().zip(&cumul[1..]) {
            stops.push(make_stop(problem, locations, node, value));
            sites.insert(locations[node].name.as_str());
        }
        stops.push(make_stop(problem, locations, DEPOT, cumul[route.len() + 1]));

        total_travel_time +=
            stops.last().map(|s| s.travel_time).unwrap_or(0) - stops[0].travel_time;
        total_visit_time += stops.iter().map(|s| s.visit_time).sum::<i32>();
        day_plans.push(stops);
    }

    Itinerary {
        day_plans,
        total_travel_time,
        total_visit_time,
        distinct_site_count: sites.len(),
    }
}

fn make_stop(problem: &RoutingProblem, locations: &[Location], node: usize, cumul: i32) -> Stop {
    let location = &locations[node];
    Stop {
        name: location.name.clone(),
        lat: location.lat,
        lng: location.lng,
        travel_time: cumul - problem.visit[node],
        visit_time: problem.visit[node],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str, visit: i32) -> Location {
        Location::new(name.to_lowercase(), name, 42.0, -71.0, 0, 1440, visit)
    }

    fn two_stop_problem() -> (RoutingProblem, Vec<Location>) {
        let time = vec![vec![0, 10, 20], vec![10, 0, 10], vec![20, 10, 0]];
        let locations = vec![
            location("Hotel", 0),
            location("Museum", 60),
            location("Park", 30),
        ];
        let problem = RoutingProblem::new(
            time,
            vec![(0, 1440); 3],
            vec![0, 60, 30],
            1,
            3,
            false,
        );
        (problem, locations)
    }

    #[test]
    fn test_travel_time_excludes_own_visit() {
        let (problem, locations) = two_stop_problem();
        // Route 0 -> 1 -> 2 -> 0: service starts at 10 and 80, back at 130.
        let raw = RawSolution {
            routes: vec![vec![1, 2]],
            cumul: vec![vec![0, 70, 110, 130]],
            travel_cost: 40,
            dropped: vec![],
        };
        let itinerary = decode(&problem, &locations, &raw);
        let day = &itinerary.day_plans[0];
        assert_eq!(day.len(), 4);
        assert_eq!(day[0].name, "Hotel");
        assert_eq!(day[3].name, "Hotel");
        assert_eq!(day[1].travel_time, 10);
        assert_eq!(day[1].visit_time, 60);
        assert_eq!(day[2].travel_time, 80);
        assert_eq!(day[2].visit_time, 30);
        assert_eq!(day[3].travel_time, 130);
    }

    #[test]
    fn test_aggregates() {
        let (problem, locations) = two_stop_problem();
        let raw = RawSolution {
            routes: vec![vec![1, 2]],
            cumul: vec![vec![0, 70, 110, 130]],
            travel_cost: 40,
            dropped: vec![],
        };
        let itinerary = decode(&problem, &locations, &raw);
        assert_eq!(itinerary.total_travel_time, 130);
        assert_eq!(itinerary.total_visit_time, 90);
        assert_eq!(itinerary.distinct_site_count, 2);
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let (problem, locations) = two_stop_problem();
        let raw = RawSolution {
            routes: vec![vec![1, 2]],
            cumul: vec![vec![0, 70, 110, 130]],
            travel_cost: 40,
            dropped: vec![],
        };
        let first = decode(&problem, &locations, &raw);
        let second = decode(&problem, &locations, &raw);
        assert_eq!(first.total_travel_time, second.total_travel_time);
        assert_eq!(first.total_visit_time, second.total_visit_time);
        assert_eq!(first.day_plans, second.day_plans);
    }

    #[test]
    fn test_empty_day_brackets_depot() {
        let (problem, locations) = two_stop_problem();
        let raw = RawSolution {
            routes: vec![vec![]],
            cumul: vec![vec![0, 0]],
            travel_cost: 0,
            dropped: vec![1, 2],
        };
        let itinerary = decode(&problem, &locations, &raw);
        assert_eq!(itinerary.day_plans[0].len(), 2);
        assert_eq!(itinerary.total_travel_time, 0);
        assert_eq!(itinerary.distinct_site_count, 0);
    }

    #[test]
    fn test_depot_not_counted_as_site() {
        let (problem, locations) = two_stop_problem();
        let raw = RawSolution {
            routes: vec![vec![1]],
            cumul: vec![vec![0, 70, 90]],
            travel_cost: 20,
            dropped: vec![2],
        };
        let itinerary = decode(&problem, &locations, &raw);
        // Hotel appears twice in the plan but is not a site.
        assert_eq!(itinerary.distinct_site_count, 1);
    }
}
