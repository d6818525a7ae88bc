//! Travel-time cost model.
//!
//! Converts an integer-meter distance matrix to integer minutes for a
//! given transport mode. Fractional minutes are truncated, matching the
//! calibration of the mode coefficients.

use crate::model::TransportMode;

/// Build the minutes matrix `time[i][j] = trunc(distance[i][j] * coeff)`.
pub fn travel_time_matrix(mode: TransportMode, distances: &[Vec<i32>]) -> Vec<Vec<i32>> {
    let coeff = mode.minutes_per_meter();
    distances
        .iter()
        .map(|row| {
            row.iter()
                .map(|&meters| (coeff * meters as f64) as i32)
                .collect()
        })
        .collect()
}
