//! Planning pipeline.
//!
//! Validates the input contract, runs the pre-filters, builds the routing
//! instance, searches, and decodes. Each call is synchronous, stateless,
//! and owns its instance data; infeasibility comes back as the empty
//! itinerary rather than an error.

use tracing::{debug, warn};

use crate::capacity;
use crate::cost;
use crate::decode;
use crate::haversine::HaversineMatrix;
use crate::model::{ConfigurationError, Itinerary, Location};
use crate::problem::RoutingProblem;
use crate::solver::{self, SolverConfig};
use crate::traits::DistanceMatrixProvider;

/// Plan a multi-day itinerary with the default great-circle distances and
/// the stock search budget.
///
/// `required[0]` must be the depot (the traveler's lodging, visit duration
/// zero, window spanning the waking period). Required locations are always
/// visited; optional ones may be left out. With `ranking_considered`, the
/// optional list is treated as ordered from most to least preferred and
/// preferred locations become harder to drop.
pub fn plan_itinerary(
    required: &[Location],
    optional: &[Location],
    ranking_considered: bool,
    transport_mode: &str,
    days_traveled: u32,
) -> Result<Itinerary, ConfigurationError> {
    plan_itinerary_with(
        required,
        optional,
        ranking_considered,
        transport_mode,
        days_traveled,
        &HaversineMatrix,
        &SolverConfig::default(),
    )
}

/// [`plan_itinerary`] with an injected distance provider and solver
/// configuration.
pub fn plan_itinerary_with(
    required: &[Location],
    optional: &[Location],
    ranking_considered: bool,
    transport_mode: &str,
    days_traveled: u32,
    matrix_provider: &impl DistanceMatrixProvider,
    config: &SolverConfig,
) -> Result<Itinerary, ConfigurationError> {
    let mode = transport_mode.parse()?;
    if days_traveled == 0 {
        return Err(ConfigurationError::NonPositiveDayCount);
    }
    if required.is_empty() {
        return Err(ConfigurationError::MissingDepot);
    }

    let mut optional = optional.to_vec();
    capacity::truncate_optional(required.len(), &mut optional, days_traveled, mode);

    let locations: Vec<Location> = required.iter().cloned().chain(optional).collect();
    let coords: Vec<(f64, f64)> = locations.iter().map(Location::coords).collect();
    let distances = matrix_provider.matrix_for(&coords);
    if distances.len() != locations.len() {
        warn!(
            expected = locations.len(),
            got = distances.len(),
            "distance provider returned a malformed matrix"
        );
        return Ok(Itinerary::infeasible());
    }

    let time = cost::travel_time_matrix(mode, &distances);
    let windows = locations
        .iter()
        .map(|l| (l.open_minute, l.close_minute))
        .collect();
    let visits = locations.iter().map(|l| l.visit_minutes).collect();
    let problem = RoutingProblem::new(
        time,
        windows,
        visits,
        days_traveled as usize,
        required.len(),
        ranking_considered,
    );

    match solver::solve(&problem, config) {
        Some(raw) => Ok(decode::decode(&problem, &locations, &raw)),
        None => {
            debug!("no feasible itinerary within the search budget");
            Ok(Itinerary::infeasible())
        }
    }
}
