//! Per-day capacity pre-filter.
//!
//! A heuristic safeguard, not a correctness requirement: when the combined
//! location count per travel day exceeds what a transport mode can
//! realistically cover, the tail of the optional pool is cut so the solver
//! is not handed an instance it cannot resolve within its time budget.

use tracing::debug;

use crate::model::{Location, TransportMode};

/// Truncate the optional pool in place when the per-day location count
/// exceeds the mode's limit. Returns the number of locations removed.
///
/// Optional locations sit at the tail of the combined `required + optional`
/// list, so they are removed first. Required locations are never removed:
/// if the computed cut would reach into the required list, the whole
/// optional pool is dropped instead and the required set is used as-is.
pub fn truncate_optional(
    required_len: usize,
    optional: &mut Vec<Location>,
    days: u32,
    mode: TransportMode,
) -> usize {
    let total = required_len + optional.len();
    let per_day = total as f64 / days as f64;
    let limit = mode.max_stops_per_day() as f64;
    if per_day <= limit {
        return 0;
    }

    let cut = ((per_day - limit) * days as f64).round() as usize;
    let removed = if cut > optional.len() {
        // The cut would reach into required locations: disable the
        // optional pool for this call instead.
        std::mem::take(optional).len()
    } else {
        optional.truncate(optional.len() - cut);
        cut
    };

    debug!(
        mode = mode.as_str(),
        days,
        required = required_len,
        removed,
        kept_optional = optional.len(),
        "capacity filter truncated optional pool"
    );
    removed
}
