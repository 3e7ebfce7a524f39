//! The survey table
//!
//! One row per successfully queried city, columns
//! `city,lat,temp,humidity,wind,clouds`, persisted as CSV.

use crate::Result;
use crate::models::{CityWeather, Measurement};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Row-oriented weather table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    rows: Vec<CityWeather>,
}

impl WeatherTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rows(rows: Vec<CityWeather>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: CityWeather) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[CityWeather] {
        &self.rows
    }

    /// First `n` rows, or all of them if the table is shorter
    #[must_use]
    pub fn head(&self, n: usize) -> &[CityWeather] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Values of one measurement, in row order
    #[must_use]
    pub fn column(&self, measurement: Measurement) -> Vec<f64> {
        self.rows.iter().map(|row| measurement.value(row)).collect()
    }

    /// `(latitude, value)` pairs for plotting
    #[must_use]
    pub fn points(&self, measurement: Measurement) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|row| (row.lat, measurement.value(row)))
            .collect()
    }

    /// Write the table as CSV, creating parent directories as needed.
    ///
    /// The header is written even when the table is empty.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(CityWeather::COLUMNS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Read a table previously written by [`WeatherTable::write_csv`]
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader
            .deserialize::<CityWeather>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(Self::from_rows(rows))
    }

    /// Plain-text preview of the first `n` rows
    #[must_use]
    pub fn preview(&self, n: usize) -> String {
        let mut out = format!(
            "{:>4}  {:<24} {:>8} {:>8} {:>9} {:>7} {:>7}\n",
            "", "city", "lat", "temp", "humidity", "wind", "clouds"
        );
        for (index, row) in self.head(n).iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>4}  {:<24} {:>8.2} {:>8.2} {:>9.0} {:>7.2} {:>7.0}",
                index, row.city, row.lat, row.temp, row.humidity, row.wind, row.clouds
            );
        }
        out
    }
}
