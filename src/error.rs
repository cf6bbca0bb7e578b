use crate::directory::error::DirectoryError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationFinderError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Render(#[from] PolarsError),
}
