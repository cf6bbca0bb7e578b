use stationfinder::{LatLon, MeteostatDirectory, StationFinderError, StationQueryRunner};

#[tokio::main]
async fn main() -> Result<(), StationFinderError> {
    // Set RUST_LOG=info (or debug) to see fetch and cache progress.
    env_logger::init();

    let directory = MeteostatDirectory::builder().build().await?;
    let runner = StationQueryRunner::new(directory);

    // The ten nearest stations to (47, 18), central Hungary.
    runner.run(LatLon(47.0, 18.0), 10)
}
