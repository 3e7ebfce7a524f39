//! Weather observation model, request units and plotted measurements

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the survey table: current conditions for a queried city
///
/// Field names double as the CSV column names, in column order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityWeather {
    /// City name as it was sent to the weather API
    pub city: String,
    /// Latitude reported by the API (`coord.lat`)
    pub lat: f64,
    /// Temperature (`main.temp`) in the requested units
    pub temp: f64,
    /// Relative humidity in percent (`main.humidity`)
    pub humidity: f64,
    /// Wind speed (`wind.speed`) in the requested units
    pub wind: f64,
    /// Cloud cover in percent (`clouds.all`)
    pub clouds: f64,
}

impl CityWeather {
    /// CSV header, matching the serialized field order
    pub const COLUMNS: [&'static str; 6] = ["city", "lat", "temp", "humidity", "wind", "clouds"];
}

/// Unit system requested from the weather API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Fahrenheit and miles per hour
    #[default]
    Imperial,
    /// Celsius and meters per second
    Metric,
    /// Kelvin and meters per second
    Standard,
}

impl Units {
    /// Value of the `units` query parameter
    #[must_use]
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }

    #[must_use]
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Imperial => "F",
            Units::Metric => "C",
            Units::Standard => "K",
        }
    }

    #[must_use]
    pub fn wind_speed_symbol(&self) -> &'static str {
        match self {
            Units::Imperial => "MPH",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imperial" => Ok(Units::Imperial),
            "metric" => Ok(Units::Metric),
            "standard" => Ok(Units::Standard),
            other => Err(format!(
                "Invalid units '{other}'. Must be one of: imperial, metric, standard"
            )),
        }
    }
}

/// A measured column plotted against latitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Temperature,
    Humidity,
    Cloudiness,
    WindSpeed,
}

impl Measurement {
    /// All plotted measurements, in output order
    pub const ALL: [Measurement; 4] = [
        Measurement::Temperature,
        Measurement::Humidity,
        Measurement::Cloudiness,
        Measurement::WindSpeed,
    ];

    /// Read this measurement from a row
    #[must_use]
    pub fn value(&self, row: &CityWeather) -> f64 {
        match self {
            Measurement::Temperature => row.temp,
            Measurement::Humidity => row.humidity,
            Measurement::Cloudiness => row.clouds,
            Measurement::WindSpeed => row.wind,
        }
    }

    /// Percent-valued measurements live on a fixed 0-100 scale
    #[must_use]
    pub fn is_percentage(&self) -> bool {
        matches!(self, Measurement::Humidity | Measurement::Cloudiness)
    }
}
