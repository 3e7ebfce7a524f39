//! `weathersurvey` - latitude weather survey over randomly sampled cities
//!
//! This library samples random coordinates, snaps them to their nearest known
//! city, queries OpenWeatherMap for current conditions, and writes the result
//! as a CSV table plus four latitude scatter plots.

pub mod cli;
pub mod collector;
pub mod config;
pub mod dataset;
pub mod error;
pub mod gazetteer;
pub mod models;
pub mod plot;
pub mod sampling;
pub mod survey;
pub mod weather;

// Re-export core types for public API
pub use collector::{CollectionSummary, CollectorOptions, FailureKind};
pub use config::SurveyConfig;
pub use dataset::WeatherTable;
pub use error::SurveyError;
pub use gazetteer::Gazetteer;
pub use models::{City, CityWeather, Coordinates, Measurement, Units};
pub use survey::SurveyReport;
pub use weather::{OpenWeatherClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
