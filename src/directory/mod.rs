pub mod error;
pub mod meteostat;

use crate::types::location::LatLon;
use crate::types::station::Station;
use error::DirectoryError;

/// A directory of weather stations queryable by proximity.
///
/// This is the seam between the query runner and whatever actually holds
/// the station metadata, so that the runner can be exercised against an
/// in-memory stub in tests.
pub trait StationDirectory {
    /// Returns up to `limit` stations closest to `location`, each paired
    /// with its haversine distance from `location` in kilometers.
    ///
    /// The returned vector is ordered by non-decreasing distance; callers
    /// rely on that and do not re-sort. A `limit` of zero yields an empty
    /// vector without error.
    fn find_nearby(
        &self,
        location: LatLon,
        limit: usize,
    ) -> Result<Vec<(Station, f64)>, DirectoryError>;
}
