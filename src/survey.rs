//! End-to-end survey run
//!
//! Sample coordinates, resolve them to unique cities, collect their current
//! weather, then persist the table and plot it.

use crate::Result;
use crate::collector::{self, CollectionSummary, CollectorOptions};
use crate::config::SurveyConfig;
use crate::dataset::WeatherTable;
use crate::gazetteer::Gazetteer;
use crate::plot::{self, PlotOptions};
use crate::sampling;
use crate::weather::WeatherSource;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct SurveyReport {
    /// Seed used for coordinate sampling
    pub seed: u64,
    pub samples: usize,
    pub unique_cities: usize,
    pub summary: CollectionSummary,
    pub table: WeatherTable,
    pub csv_path: PathBuf,
    /// Written plot files, empty when plotting was skipped
    pub plots: Vec<PathBuf>,
}

/// Run the whole pipeline against `source`.
///
/// `date` is the run date shown in plot titles. Per-city failures are skipped;
/// only configuration, CSV and plot failures are returned as errors.
pub async fn run<S: WeatherSource>(
    config: &SurveyConfig,
    gazetteer: &Gazetteer,
    source: &S,
    plots: bool,
    date: NaiveDate,
) -> Result<SurveyReport> {
    let (mut rng, seed) = sampling::seeded_rng(config.sampling.seed);
    info!(
        "Sampling {} coordinates (seed {})",
        config.sampling.sample_size, seed
    );

    let samples = sampling::sample_coordinates(
        &mut rng,
        config.sampling.sample_size,
        config.sampling.latitudes(),
        config.sampling.longitudes(),
    )?;

    let cities = gazetteer.unique_cities(&samples);
    info!(
        "{} samples resolved to {} unique cities",
        samples.len(),
        cities.len()
    );

    let options = CollectorOptions {
        delay: config.weather.request_delay(),
        max_cities: config.sampling.max_cities,
    };
    let (table, summary) = collector::collect(source, &cities, &options).await;

    table.write_csv(&config.output.csv_path)?;

    let written = if plots {
        plot::render_all(
            &table,
            config.weather.units,
            date,
            &PlotOptions {
                dir: config.output.plot_dir.clone(),
                width: config.output.plot_width,
                height: config.output.plot_height,
            },
        )?
    } else {
        info!("Plotting disabled");
        Vec::new()
    };

    Ok(SurveyReport {
        seed,
        samples: samples.len(),
        unique_cities: cities.len(),
        summary,
        table,
        csv_path: config.output.csv_path.clone(),
        plots: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SurveyError;
    use crate::models::{City, CityWeather};
    use tempfile::tempdir;

    /// Answers for every city except those whose name starts with "x"
    struct EchoSource;

    impl WeatherSource for EchoSource {
        async fn current_weather(&self, city: &str) -> Result<CityWeather> {
            if city.starts_with('x') {
                return Err(SurveyError::api_status("city not found", 404));
            }
            Ok(CityWeather {
                city: city.to_string(),
                lat: 0.0,
                temp: 70.0,
                humidity: 50.0,
                wind: 3.0,
                clouds: 10.0,
            })
        }
    }

    fn gazetteer() -> Gazetteer {
        Gazetteer::new(vec![
            City::new("north", "aa", 60.0, 0.0),
            City::new("xsouth", "bb", -60.0, 0.0),
            City::new("east", "cc", 0.0, 90.0),
            City::new("west", "dd", 0.0, -90.0),
        ])
    }

    fn config(dir: &std::path::Path) -> SurveyConfig {
        let mut config = SurveyConfig::default();
        config.sampling.sample_size = 200;
        config.sampling.seed = Some(42);
        config.weather.request_delay_ms = 0;
        config.output.csv_path = dir.join("cities.csv");
        config.output.plot_dir = dir.join("plots");
        config
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_run_skips_failed_cities() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());

        let report = run(&config, &gazetteer(), &EchoSource, false, date())
            .await
            .unwrap();

        assert_eq!(report.seed, 42);
        assert_eq!(report.samples, 200);
        assert!(report.unique_cities <= 4);
        assert!(report.table.len() <= report.unique_cities);
        assert!(report.table.rows().iter().all(|row| !row.city.starts_with('x')));
        assert_eq!(report.summary.attempted, report.unique_cities);
        assert!(report.plots.is_empty());
        assert!(!dir.path().join("plots").exists());

        let read_back = WeatherTable::read_csv(&report.csv_path).unwrap();
        assert_eq!(read_back, report.table);
    }

    #[tokio::test]
    async fn test_same_seed_same_cities() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());

        let first = run(&config, &gazetteer(), &EchoSource, false, date())
            .await
            .unwrap();
        let second = run(&config, &gazetteer(), &EchoSource, false, date())
            .await
            .unwrap();

        assert_eq!(first.table, second.table);
    }

    #[tokio::test]
    async fn test_invalid_sampling_range_is_fatal() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path());
        config.sampling.lat_min = 50.0;
        config.sampling.lat_max = 10.0;

        let result = run(&config, &gazetteer(), &EchoSource, false, date()).await;

        assert!(matches!(result, Err(SurveyError::Validation { .. })));
        assert!(!config.output.csv_path.exists());
    }
}
