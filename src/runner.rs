//! The query runner: ask a [`StationDirectory`] for the nearest stations
//! and print them as a table.

use crate::directory::StationDirectory;
use crate::error::StationFinderError;
use crate::render::station_frame;
use crate::types::location::LatLon;
use polars::prelude::DataFrame;

/// Finds and displays the geographically nearest weather stations to a
/// coordinate.
///
/// Generic over the directory so tests can swap in an in-memory stub.
/// There is no retry or recovery here: any directory or rendering failure
/// propagates and nothing is printed.
pub struct StationQueryRunner<D: StationDirectory> {
    directory: D,
}

impl<D: StationDirectory> StationQueryRunner<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Queries the directory for up to `limit` stations near `location`
    /// and renders them as a [`DataFrame`], closest station first.
    pub fn nearest_frame(
        &self,
        location: LatLon,
        limit: usize,
    ) -> Result<DataFrame, StationFinderError> {
        let rows = self.directory.find_nearby(location, limit)?;
        station_frame(&rows).map_err(StationFinderError::from)
    }

    /// Prints the table of nearest stations to standard output.
    pub fn run(&self, location: LatLon, limit: usize) -> Result<(), StationFinderError> {
        let frame = self.nearest_frame(location, limit)?;
        println!("{frame}");
        Ok(())
    }
}
