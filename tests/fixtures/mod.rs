//! Test fixtures for itinerary-planner.
//!
//! Real Boston locations with plausible opening windows and visit
//! durations, usable with the default great-circle provider.

pub mod boston_locations;

pub use boston_locations::*;
