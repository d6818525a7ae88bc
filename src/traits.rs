//! Seam between coordinate lists and pairwise distance matrices.
//!
//! The default provider is great-circle (`haversine`); a road-network
//! service (`osrm`) can be plugged in without touching the optimizer.

/// Provides a pairwise distance matrix, in integer meters, for a set of
/// locations.
///
/// The matrix is indexed by the provided location order, has a zero
/// diagonal, and is symmetric for any sane notion of distance. NaN or
/// out-of-range coordinates are a caller contract violation; providers do
/// not validate them.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<i32>>;
}
