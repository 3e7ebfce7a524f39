//! Configuration management for the weather survey
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SurveyError;
use crate::models::Units;
use crate::models::location::{LATITUDE_BOUNDS, LONGITUDE_BOUNDS};
use crate::sampling::DegreeRange;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the survey
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Coordinate sampling settings
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// CSV and plot output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Unit system for temperature and wind speed
    #[serde(default)]
    pub units: Units,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Fixed pause after every API call, in milliseconds
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,
}

/// Coordinate sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Number of random coordinates to draw
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
    #[serde(default = "default_lng_min")]
    pub lng_min: f64,
    #[serde(default = "default_lng_max")]
    pub lng_max: f64,
    /// Stop after this many successful lookups
    pub max_cities: Option<usize>,
}

/// CSV and plot output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination of the CSV table
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    /// Directory receiving the PNG plots
    #[serde(default = "default_plot_dir")]
    pub plot_dir: PathBuf,
    /// Plot width in pixels
    #[serde(default = "default_plot_width")]
    pub plot_width: u32,
    /// Plot height in pixels
    #[serde(default = "default_plot_height")]
    pub plot_height: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_request_delay() -> u64 {
    1100
}

fn default_sample_size() -> usize {
    1500
}

fn default_lat_min() -> f64 {
    LATITUDE_BOUNDS.0
}

fn default_lat_max() -> f64 {
    LATITUDE_BOUNDS.1
}

fn default_lng_min() -> f64 {
    LONGITUDE_BOUNDS.0
}

fn default_lng_max() -> f64 {
    LONGITUDE_BOUNDS.1
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("output_data/cities.csv")
}

fn default_plot_dir() -> PathBuf {
    PathBuf::from("analysis")
}

fn default_plot_width() -> u32 {
    1024
}

fn default_plot_height() -> u32 {
    768
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: Units::default(),
            timeout_seconds: default_weather_timeout(),
            request_delay_ms: default_request_delay(),
        }
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            seed: None,
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
            lng_min: default_lng_min(),
            lng_max: default_lng_max(),
            max_cities: None,
        }
    }
}

impl SamplingConfig {
    #[must_use]
    pub fn latitudes(&self) -> DegreeRange {
        DegreeRange::new(self.lat_min, self.lat_max)
    }

    #[must_use]
    pub fn longitudes(&self) -> DegreeRange {
        DegreeRange::new(self.lng_min, self.lng_max)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            plot_dir: default_plot_dir(),
            plot_width: default_plot_width(),
            plot_height: default_plot_height(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SurveyConfig {
    /// Load configuration from the given file, or the default location, plus
    /// environment variables.
    ///
    /// Values are not validated here so that command line flags can still
    /// replace them; call [`SurveyConfig::validate`] once all layers are applied.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let explicit = config_path.is_some();
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("weathersurvey.toml"))
        });

        if explicit && !config_file.exists() {
            return Err(SurveyError::config(format!(
                "Config file not found: {}",
                config_file.display()
            ))
            .into());
        }

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides, e.g. WEATHERSURVEY_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("WEATHERSURVEY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SurveyConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathersurvey").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.output.csv_path.as_os_str().is_empty() {
            self.output.csv_path = default_csv_path();
        }
        if self.output.plot_dir.as_os_str().is_empty() {
            self.output.plot_dir = default_plot_dir();
        }
        if self.output.plot_width == 0 {
            self.output.plot_width = default_plot_width();
        }
        if self.output.plot_height == 0 {
            self.output.plot_height = default_plot_height();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the API key format when one is present
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.trim().is_empty() {
                return Err(SurveyError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(SurveyError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(SurveyError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// The API key, which a survey run cannot do without
    pub fn require_api_key(&self) -> Result<&str> {
        self.weather.api_key.as_deref().ok_or_else(|| {
            SurveyError::config(
                "Weather API key is required. Set weather.api_key, WEATHERSURVEY_WEATHER__API_KEY or pass --api-key.",
            )
            .into()
        })
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(SurveyError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        if self.weather.request_delay_ms > 60_000 {
            return Err(SurveyError::config("Request delay cannot exceed 60000 ms").into());
        }

        if self.sampling.sample_size == 0 || self.sampling.sample_size > 100_000 {
            return Err(SurveyError::config("Sample size must be between 1 and 100000").into());
        }

        if self.sampling.max_cities == Some(0) {
            return Err(SurveyError::config("Max cities must be at least 1 when set").into());
        }

        let lat_ok = LATITUDE_BOUNDS.0 <= self.sampling.lat_min
            && self.sampling.lat_min < self.sampling.lat_max
            && self.sampling.lat_max <= LATITUDE_BOUNDS.1;
        if !lat_ok {
            return Err(SurveyError::config(format!(
                "Latitude range [{}, {}) must be increasing and within [-90, 90]",
                self.sampling.lat_min, self.sampling.lat_max
            ))
            .into());
        }

        let lng_ok = LONGITUDE_BOUNDS.0 <= self.sampling.lng_min
            && self.sampling.lng_min < self.sampling.lng_max
            && self.sampling.lng_max <= LONGITUDE_BOUNDS.1;
        if !lng_ok {
            return Err(SurveyError::config(format!(
                "Longitude range [{}, {}) must be increasing and within [-180, 180]",
                self.sampling.lng_min, self.sampling.lng_max
            ))
            .into());
        }

        for (name, value) in [
            ("width", self.output.plot_width),
            ("height", self.output.plot_height),
        ] {
            if !(200..=4000).contains(&value) {
                return Err(SurveyError::config(format!(
                    "Plot {name} must be between 200 and 4000 pixels, got {value}"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SurveyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SurveyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(SurveyError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
