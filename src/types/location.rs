/// A geographical coordinate: latitude first, longitude second.
///
/// Both values are decimal degrees as `f64`. No range validation is
/// performed; out-of-range values simply produce distant or empty query
/// results.
///
/// # Examples
///
/// ```
/// use stationfinder::LatLon;
///
/// let pecs = LatLon(46.0727, 18.2323);
/// assert_eq!(pecs.0, 46.0727); // Latitude
/// assert_eq!(pecs.1, 18.2323); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);
