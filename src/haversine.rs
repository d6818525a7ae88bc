//! Great-circle distance matrix provider.
//!
//! Straight-line distance ignores the road network, but it needs no
//! external service and is what the travel-time coefficients are
//! calibrated against.

use rayon::prelude::*;

use crate::traits::DistanceMatrixProvider;

/// Earth's mean radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine-based distance matrix provider, in integer meters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl HaversineMatrix {
    /// Great-circle distance between two (lat, lng) points in meters.
    pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let phi1 = lat1.to_radians();
        let phi2 = lat2.to_radians();
        let delta_phi = (lat2 - lat1).to_radians();
        let delta_lambda = (lng2 - lng1).to_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<i32>> {
        locations
            .par_iter()
            .map(|from| {
                locations
                    .iter()
                    .map(|to| {
                        if from == to {
                            0
                        } else {
                            Self::haversine_m(*from, *to) as i32
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
