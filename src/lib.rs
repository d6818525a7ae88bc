//! itinerary-planner core
//!
//! Multi-day sightseeing itinerary optimization: partition required and
//! optional locations across travel days and order them within each day to
//! minimize travel time, honoring per-location opening windows and visit
//! durations.

pub mod model;
pub mod traits;
pub mod haversine;
pub mod osrm;
pub mod cost;
pub mod capacity;
pub mod problem;
pub mod solver;
pub mod decode;
pub mod plan;

pub use model::{ConfigurationError, Itinerary, Location, Stop, TransportMode};
pub use plan::{plan_itinerary, plan_itinerary_with};
pub use solver::SolverConfig;
