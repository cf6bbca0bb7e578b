//! Data structures for Meteostat weather station metadata, matching the
//! schema of the bulk `lite.json.gz` station list, plus the trait
//! implementations needed to index stations spatially with `rstar`.

use chrono::NaiveDate;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single Meteostat weather station and its metadata.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The unique Meteostat station identifier (e.g., "10637").
    pub id: String,
    /// The country code where the station is located (e.g., "HU", "DE").
    pub country: String,
    /// The region code (state, province, etc.), if available.
    pub region: Option<String>,
    /// The IANA timezone name for the station's location, if available.
    pub timezone: Option<String>,
    /// Station names keyed by language code (e.g., {"en": "Budapest"}).
    pub name: HashMap<String, String>,
    /// Other known identifiers for the station.
    pub identifiers: Identifiers,
    /// Geographical location details (latitude, longitude, elevation).
    pub location: Location,
    /// Reported data availability periods per frequency.
    pub inventory: Inventory,
}

impl Station {
    /// The English station name, if the metadata carries one.
    pub fn english_name(&self) -> Option<&str> {
        self.name.get("en").map(String::as_str)
    }
}

/// Alternative identifiers that may be associated with a station.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Identifiers {
    /// National station identifier, if available.
    pub national: Option<String>,
    /// World Meteorological Organization (WMO) identifier, if available.
    pub wmo: Option<String>,
    /// ICAO airport code, if the station is located at an airport.
    pub icao: Option<String>,
}

/// The geographical location of a station.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Location {
    /// Latitude in decimal degrees (positive north).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive east).
    pub longitude: f64,
    /// Elevation above sea level in meters, if available.
    pub elevation: Option<i32>,
}

/// Data availability ranges reported by Meteostat per data frequency.
///
/// Gaps may exist within the reported ranges; these are the bounds the
/// station metadata claims, nothing more.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Inventory {
    /// Start and end dates for daily data.
    pub daily: DateRange,
    /// Start and end dates for hourly data.
    pub hourly: DateRange,
    /// Start and end dates for model data.
    pub model: DateRange,
    /// Start and end years for monthly data.
    pub monthly: YearRange,
    /// Start and end years for climate normals data.
    pub normals: YearRange,
}

/// A date range with optional bounds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// A year range with optional bounds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    /// A station is a point, so its envelope is the degenerate AABB of its
    /// (latitude, longitude) pair.
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

impl PointDistance for Station {
    /// Squared Euclidean distance in degrees to a `[latitude, longitude]`
    /// query point. Coarser than haversine over large spans, but that only
    /// affects candidate ordering inside the tree; final ordering is done
    /// on real kilometers by the directory.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.latitude - point[0];
        let dy = self.location.longitude - point[1];
        dx * dx + dy * dy
    }
}
