//! The production [`StationDirectory`]: Meteostat's bulk station list,
//! downloaded once, cached as bincode, and indexed in an R-tree.

use crate::directory::error::DirectoryError;
use crate::directory::StationDirectory;
use crate::error::StationFinderError;
use crate::types::location::LatLon;
use crate::types::station::Station;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use async_compression::tokio::bufread::GzipDecoder;
use bincode::config::{Configuration, Fixint, LittleEndian};
use bon::bon;
use futures_util::TryStreamExt;
use haversine::{distance, Location as HaversineLocation, Units};
use log::{debug, info};
use reqwest::Client;
use rstar::RTree;
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

const DATA_URL: &str = "https://bulk.meteostat.net/v2/stations/lite.json.gz";
const CACHE_FILE_NAME: &str = "stations_lite.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Station directory backed by the Meteostat bulk station list.
///
/// On first construction the full station list is downloaded and written to
/// a local cache; later constructions load the cache and never touch the
/// network. All stations are held in an [`RTree`] for nearest-neighbor
/// queries.
#[derive(Debug, Clone)]
pub struct MeteostatDirectory {
    rtree: RTree<Station>,
}

#[bon]
impl MeteostatDirectory {
    /// Creates a directory, downloading the station list if it is not
    /// cached yet.
    ///
    /// # Arguments
    ///
    /// * `.cache_folder(PathBuf)`: Optional. Where to keep the cached
    ///   station list. Defaults to a `stationfinder` directory under the
    ///   system cache directory. Created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StationFinderError::CacheDirResolution`] or
    /// [`StationFinderError::CacheDirCreation`] if the cache directory is
    /// unusable, and [`DirectoryError`] variants (wrapped transparently)
    /// if the download, parse, or cache I/O fails.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use stationfinder::{MeteostatDirectory, StationFinderError};
    /// # async fn run() -> Result<(), StationFinderError> {
    /// let directory = MeteostatDirectory::builder().build().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn new(cache_folder: Option<PathBuf>) -> Result<Self, StationFinderError> {
        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(StationFinderError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| StationFinderError::CacheDirCreation(cache_folder.clone(), e))?;

        let cache_file = cache_folder.join(CACHE_FILE_NAME);
        let stations = if cache_file.exists() {
            let path = cache_file.clone();
            tokio::task::spawn_blocking(move || Self::read_cached_stations(&path))
                .await
                .map_err(DirectoryError::from)??
        } else {
            info!("Station cache not found, fetching {}", DATA_URL);
            let stations = Self::fetch_stations().await?;
            Self::write_station_cache(stations.clone(), &cache_file).await?;
            stations
        };

        Ok(Self::from_stations(stations))
    }

    /// Builds a directory directly from a station list, without any I/O.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        Self {
            rtree: RTree::bulk_load(stations),
        }
    }

    /// The number of stations in the directory.
    pub fn station_count(&self) -> usize {
        self.rtree.size()
    }

    fn read_cached_stations(cache_path: &Path) -> Result<Vec<Station>, DirectoryError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| DirectoryError::CacheRead(cache_path.to_path_buf(), e))?;
        let (stations, _) =
            bincode::serde::decode_from_slice::<Vec<Station>, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| DirectoryError::CacheDecode(cache_path.to_path_buf(), Box::from(e)))?;
        debug!(
            "Loaded {} stations from cache {}",
            stations.len(),
            cache_path.display()
        );
        Ok(stations)
    }

    async fn fetch_stations() -> Result<Vec<Station>, DirectoryError> {
        let client = Client::new();
        let response = client
            .get(DATA_URL)
            .send()
            .await
            .map_err(|e| DirectoryError::NetworkRequest(DATA_URL.to_string(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                if let Some(status) = e.status() {
                    return Err(DirectoryError::HttpStatus {
                        url: DATA_URL.to_string(),
                        status,
                        source: e,
                    });
                } else {
                    return Err(DirectoryError::NetworkRequest(DATA_URL.to_string(), e));
                }
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        let stream_reader = StreamReader::new(stream);
        let gzip_decoder = GzipDecoder::new(BufReader::new(stream_reader));
        let mut decoder_reader = BufReader::new(gzip_decoder);
        let mut decompressed_json = Vec::with_capacity(20_000_000);
        decoder_reader.read_to_end(&mut decompressed_json).await?;

        let parse_start = std::time::Instant::now();
        let stations = tokio::task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<Station>>(&decompressed_json)
                .map_err(DirectoryError::from)
        })
        .await??;
        info!(
            "Parsed {} stations from JSON in {:?}",
            stations.len(),
            parse_start.elapsed()
        );
        Ok(stations)
    }

    async fn write_station_cache(
        stations: Vec<Station>,
        cache_path: &Path,
    ) -> Result<(), DirectoryError> {
        let bincode_data = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(stations, BINCODE_CONFIG)
                .map_err(|e| DirectoryError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(&cache_path, &bincode_data)
            .await
            .map_err(|e| DirectoryError::CacheWrite(cache_path.to_path_buf(), e))?;
        info!(
            "Wrote station cache ({} bytes) to {}",
            bincode_data.len(),
            cache_path.display()
        );
        Ok(())
    }
}

impl StationDirectory for MeteostatDirectory {
    /// Nearest-station lookup. R-tree neighbor order is by squared degree
    /// distance, which can disagree with haversine kilometers near the
    /// margin, so a wider candidate window is taken before computing real
    /// distances and truncating.
    fn find_nearby(
        &self,
        location: LatLon,
        limit: usize,
    ) -> Result<Vec<(Station, f64)>, DirectoryError> {
        if limit == 0 {
            return Ok(vec![]);
        }

        let query_point = [location.0, location.1];
        let candidate_limit = (limit * 2).max(20);

        let mut nearest: Vec<(Station, f64)> = self
            .rtree
            .nearest_neighbor_iter(&query_point)
            .take(candidate_limit)
            .map(|station| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude: location.0,
                        longitude: location.1,
                    },
                    HaversineLocation {
                        latitude: station.location.latitude,
                        longitude: station.location.longitude,
                    },
                    Units::Kilometers,
                );
                (station.to_owned(), dist_km)
            })
            .collect();

        nearest.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        nearest.truncate(limit);
        Ok(nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::{DateRange, Identifiers, Inventory, Location, YearRange};
    use std::collections::HashMap;

    fn station(id: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id: id.to_string(),
            country: "HU".to_string(),
            region: None,
            timezone: Some("Europe/Budapest".to_string()),
            name: HashMap::from([("en".to_string(), format!("Station {id}"))]),
            identifiers: Identifiers {
                national: None,
                wmo: None,
                icao: None,
            },
            location: Location {
                latitude,
                longitude,
                elevation: Some(100),
            },
            inventory: Inventory {
                daily: DateRange {
                    start: None,
                    end: None,
                },
                hourly: DateRange {
                    start: None,
                    end: None,
                },
                model: DateRange {
                    start: None,
                    end: None,
                },
                monthly: YearRange {
                    start: None,
                    end: None,
                },
                normals: YearRange {
                    start: None,
                    end: None,
                },
            },
        }
    }

    /// A ring of stations around (47, 18) at increasing offsets.
    fn directory() -> MeteostatDirectory {
        let mut stations = Vec::new();
        for i in 1..=30 {
            let offset = 0.05 * i as f64;
            stations.push(station(&format!("N{i:02}"), 47.0 + offset, 18.0));
            stations.push(station(&format!("E{i:02}"), 47.0, 18.0 + offset));
        }
        MeteostatDirectory::from_stations(stations)
    }

    fn assert_sorted_by_distance(results: &[(Station, f64)]) {
        let mut last = -1.0;
        for (i, (station, dist)) in results.iter().enumerate() {
            assert!(
                *dist >= last - 1e-9,
                "Result {} ({}) distance {} < previous {}",
                i,
                station.id,
                dist,
                last
            );
            last = *dist;
        }
    }

    #[test]
    fn respects_limit() {
        let directory = directory();
        let results = directory.find_nearby(LatLon(47.0, 18.0), 10).unwrap();
        assert_eq!(results.len(), 10);
        assert_sorted_by_distance(&results);
    }

    #[test]
    fn orders_by_haversine_distance() {
        let directory = directory();
        let results = directory.find_nearby(LatLon(47.0, 18.0), 6).unwrap();
        assert_sorted_by_distance(&results);
        // At this latitude a degree of longitude is shorter than a degree
        // of latitude, so the east neighbors come in ahead of the north
        // ones at equal degree offsets.
        assert_eq!(results[0].0.id, "E01");
        assert!(results.iter().take(2).any(|(s, _)| s.id == "N01"));
    }

    #[test]
    fn zero_limit_is_empty() {
        let directory = directory();
        let results = directory.find_nearby(LatLon(47.0, 18.0), 0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let directory = MeteostatDirectory::from_stations(vec![]);
        let results = directory.find_nearby(LatLon(47.0, 18.0), 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn limit_larger_than_directory_returns_everything() {
        let directory = MeteostatDirectory::from_stations(vec![
            station("A", 47.1, 18.0),
            station("B", 47.2, 18.0),
        ]);
        let results = directory.find_nearby(LatLon(47.0, 18.0), 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id, "A");
    }

    #[test]
    fn distances_are_kilometers() {
        // One degree of latitude is roughly 111 km everywhere.
        let directory = MeteostatDirectory::from_stations(vec![station("A", 48.0, 18.0)]);
        let results = directory.find_nearby(LatLon(47.0, 18.0), 1).unwrap();
        let dist = results[0].1;
        assert!(
            (105.0..118.0).contains(&dist),
            "expected ~111 km, got {dist}"
        );
    }

    #[tokio::test]
    async fn cache_round_trips() -> Result<(), DirectoryError> {
        let dir = tempfile::tempdir().expect("temp dir");
        let cache_path = dir.path().join(CACHE_FILE_NAME);

        let stations = vec![station("12843", 47.4333, 19.1833), station("12839", 47.5, 19.0)];
        MeteostatDirectory::write_station_cache(stations.clone(), &cache_path).await?;
        let loaded = MeteostatDirectory::read_cached_stations(&cache_path)?;

        assert_eq!(loaded.len(), stations.len());
        for (loaded, original) in loaded.iter().zip(&stations) {
            assert_eq!(loaded.id, original.id);
            assert_eq!(loaded.location.latitude, original.location.latitude);
            assert_eq!(loaded.english_name(), original.english_name());
        }
        Ok(())
    }

    #[test]
    fn missing_cache_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = MeteostatDirectory::read_cached_stations(&dir.path().join("absent.bin"));
        assert!(matches!(result, Err(DirectoryError::CacheRead(_, _))));
    }
}
