//! Tabular rendering of station query results as a polars `DataFrame`.

use crate::types::station::Station;
use polars::prelude::*;

/// Builds a one-row-per-station frame from proximity query results,
/// preserving their order.
pub fn station_frame(rows: &[(Station, f64)]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = rows.iter().map(|(s, _)| s.id.as_str()).collect();
    let names: Vec<Option<&str>> = rows.iter().map(|(s, _)| s.english_name()).collect();
    let countries: Vec<&str> = rows.iter().map(|(s, _)| s.country.as_str()).collect();
    let latitudes: Vec<f64> = rows.iter().map(|(s, _)| s.location.latitude).collect();
    let longitudes: Vec<f64> = rows.iter().map(|(s, _)| s.location.longitude).collect();
    let elevations: Vec<Option<i32>> = rows.iter().map(|(s, _)| s.location.elevation).collect();
    let distances: Vec<f64> = rows.iter().map(|(_, d)| *d).collect();

    df!(
        "id" => ids,
        "name" => names,
        "country" => countries,
        "latitude" => latitudes,
        "longitude" => longitudes,
        "elevation" => elevations,
        "distance_km" => distances,
    )
}
