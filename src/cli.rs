//! Command-line interface for weathersurvey

use crate::config::SurveyConfig;
use crate::models::Units;
use anyhow::{Context, Result};
use argh::FromArgs;
use std::path::PathBuf;

/// Sample random cities, record their current weather and plot it against latitude
#[derive(FromArgs, Debug, Default, PartialEq)]
pub struct SurveyArgs {
    /// path to a TOML configuration file
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,

    /// api key for OpenWeatherMap (overrides the configured key)
    #[argh(option)]
    pub api_key: Option<String>,

    /// number of random coordinates to draw
    #[argh(option, short = 'n')]
    pub samples: Option<usize>,

    /// seed for a reproducible sample
    #[argh(option, short = 's')]
    pub seed: Option<u64>,

    /// stop after this many cities returned weather
    #[argh(option)]
    pub max_cities: Option<usize>,

    /// unit system: imperial, metric or standard
    #[argh(option, short = 'u')]
    pub units: Option<Units>,

    /// destination of the CSV table
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,

    /// directory receiving the PNG plots
    #[argh(option)]
    pub plot_dir: Option<PathBuf>,

    /// pause after each API call, in milliseconds
    #[argh(option)]
    pub delay_ms: Option<u64>,

    /// skip rendering the plots
    #[argh(switch)]
    pub no_plots: bool,

    /// log level (error, warn, info, debug, trace)
    #[argh(option, short = 'l')]
    pub log_level: Option<String>,
}

impl SurveyArgs {
    /// Overlay the flags that were given on top of a loaded configuration
    pub fn apply_to(&self, config: &mut SurveyConfig) {
        if let Some(key) = &self.api_key {
            config.weather.api_key = Some(key.clone());
        }
        if let Some(samples) = self.samples {
            config.sampling.sample_size = samples;
        }
        if self.seed.is_some() {
            config.sampling.seed = self.seed;
        }
        if self.max_cities.is_some() {
            config.sampling.max_cities = self.max_cities;
        }
        if let Some(units) = self.units {
            config.weather.units = units;
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.clone();
        }
        if let Some(dir) = &self.plot_dir {
            config.output.plot_dir = dir.clone();
        }
        if let Some(delay) = self.delay_ms {
            config.weather.request_delay_ms = delay;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.to_lowercase();
        }
    }

    /// Load file and environment configuration, apply these flags on top and
    /// validate the result once.
    pub fn load_config(&self) -> Result<SurveyConfig> {
        let mut config = SurveyConfig::load_from_path(self.config.clone())
            .context("Failed to load configuration")?;
        self.apply_to(&mut config);
        config.apply_defaults();
        config.validate().context("Invalid configuration")?;
        config.require_api_key()?;
        Ok(config)
    }

    #[must_use]
    pub fn plots_enabled(&self) -> bool {
        !self.no_plots
    }
}
