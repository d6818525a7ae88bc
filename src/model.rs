//! Core data types for the itinerary planner.
//!
//! These mirror the input/output contract with the data-acquisition and
//! presentation layers: plain location records in, day plans out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point of interest supplied by the data layer.
///
/// Opening and closing times are minutes-of-day in `[0, 1440]`; a closing
/// time of 1440 means open through the end of the day. The depot (the
/// traveler's lodging) is always `required[0]`, carries a visit duration of
/// zero, and its window spans the traveler's waking period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub open_minute: i32,
    pub close_minute: i32,
    pub visit_minutes: i32,
}

impl Location {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
        open_minute: i32,
        close_minute: i32,
        visit_minutes: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
            open_minute,
            close_minute,
            visit_minutes,
        }
    }

    /// Location coordinates (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// How the traveler moves between locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Car,
    Walking,
    PublicTransport,
    Bike,
}

impl TransportMode {
    /// Calibrated meters-to-minutes coefficient for this mode.
    ///
    /// The values are tuned against city-scale trips, not physically exact
    /// speeds: car ~20 mph, walking ~5 km/h, public transport ~15 mph,
    /// bike ~12 mph.
    pub fn minutes_per_meter(self) -> f64 {
        match self {
            TransportMode::Car => 0.002,
            TransportMode::Walking => 0.012,
            TransportMode::PublicTransport => 0.0025,
            TransportMode::Bike => 0.003,
        }
    }

    /// Maximum recommended stops per day for this mode.
    ///
    /// Used by the capacity filter to keep instances inside what the
    /// solver can resolve within its time budget.
    pub fn max_stops_per_day(self) -> usize {
        match self {
            TransportMode::Car => 15,
            TransportMode::Walking => 11,
            TransportMode::PublicTransport => 14,
            TransportMode::Bike => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Walking => "walking",
            TransportMode::PublicTransport => "public transport",
            TransportMode::Bike => "bike",
        }
    }
}

impl std::str::FromStr for TransportMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(TransportMode::Car),
            "walking" => Ok(TransportMode::Walking),
            "public transport" => Ok(TransportMode::PublicTransport),
            "bike" => Ok(TransportMode::Bike),
            other => Err(ConfigurationError::UnsupportedTransportMode(
                other.to_string(),
            )),
        }
    }
}

/// A single scheduled stop within a day plan.
///
/// `travel_time` is the cumulative minute-of-day at which service at the
/// stop begins, excluding the stop's own visit duration. The depot opens
/// and closes every day plan with a visit duration of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub travel_time: i32,
    pub visit_time: i32,
}

/// The decoded result of one optimization call.
///
/// An infeasible instance decodes to the empty itinerary (`day_plans`
/// empty, all aggregates zero) so callers can distinguish "no answer
/// found" from an answer with nothing scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Itinerary {
    pub day_plans: Vec<Vec<Stop>>,
    pub total_travel_time: i32,
    pub total_visit_time: i32,
    pub distinct_site_count: usize,
}

impl Itinerary {
    /// The infeasible sentinel: no day plans, zero aggregates.
    pub fn infeasible() -> Self {
        Self::default()
    }

    pub fn is_infeasible(&self) -> bool {
        self.day_plans.is_empty()
    }
}

/// Input errors that fail fast before any optimization work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unsupported transport mode: {0:?}")]
    UnsupportedTransportMode(String),
    #[error("days traveled must be at least 1")]
    NonPositiveDayCount,
    #[error("required locations must start with the depot")]
    MissingDepot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("car".parse::<TransportMode>(), Ok(TransportMode::Car));
        assert_eq!(
            "walking".parse::<TransportMode>(),
            Ok(TransportMode::Walking)
        );
        assert_eq!(
            "public transport".parse::<TransportMode>(),
            Ok(TransportMode::PublicTransport)
        );
        assert_eq!("bike".parse::<TransportMode>(), Ok(TransportMode::Bike));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = "jetpack".parse::<TransportMode>().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnsupportedTransportMode("jetpack".to_string())
        );
    }

    #[test]
    fn test_mode_roundtrip() {
        for mode in [
            TransportMode::Car,
            TransportMode::Walking,
            TransportMode::PublicTransport,
            TransportMode::Bike,
        ] {
            assert_eq!(mode.as_str().parse::<TransportMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_infeasible_sentinel() {
        let itinerary = Itinerary::infeasible();
        assert!(itinerary.is_infeasible());
        assert_eq!(itinerary.total_travel_time, 0);
        assert_eq!(itinerary.total_visit_time, 0);
        assert_eq!(itinerary.distinct_site_count, 0);
    }
}
