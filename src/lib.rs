mod directory;
mod error;
mod render;
mod runner;
mod types;
mod utils;

pub use error::StationFinderError;
pub use runner::StationQueryRunner;

pub use directory::error::DirectoryError;
pub use directory::meteostat::MeteostatDirectory;
pub use directory::StationDirectory;

pub use render::station_frame;
pub use types::location::LatLon;
pub use types::station::*;
