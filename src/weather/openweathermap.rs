//! OpenWeatherMap current weather client
//!
//! Issues one `GET /data/2.5/weather` per city and decodes the handful of
//! fields the survey keeps. There is no retry: a failed city is reported to
//! the caller, which skips it.

use super::WeatherSource;
use crate::config::WeatherConfig;
use crate::models::{CityWeather, Units};
use crate::{Result, SurveyError};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Path of the current weather endpoint below the base URL
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for the OpenWeatherMap current weather API
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

impl OpenWeatherClient {
    /// Create a client from the weather configuration; an API key is required
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SurveyError::config("Weather API key is required"))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("weathersurvey/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            units: config.units,
        })
    }

    /// Full request URL for a city query
    #[must_use]
    pub fn request_url(&self, city: &str) -> String {
        format!(
            "{}{}?appid={}&units={}&q={}",
            self.base_url,
            CURRENT_WEATHER_PATH,
            urlencoding::encode(&self.api_key),
            self.units.as_query(),
            urlencoding::encode(city)
        )
    }

    /// Request URL with the API key masked, safe to log
    #[must_use]
    pub fn redacted_url(&self, city: &str) -> String {
        format!(
            "{}{}?appid=***&units={}&q={}",
            self.base_url,
            CURRENT_WEATHER_PATH,
            self.units.as_query(),
            urlencoding::encode(city)
        )
    }

    #[instrument(name = "current_weather", level = "debug", skip(self))]
    async fn fetch(&self, city: &str) -> Result<CityWeather> {
        debug!("GET {}", self.redacted_url(city));
        let start_time = Instant::now();

        let response = self.client.get(self.request_url(city)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(
            "HTTP {} for '{}' in {:.3}s",
            status,
            city,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let message = serde_json::from_str::<response::ErrorBody>(&body)
                .ok()
                .and_then(|error| error.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            if status.as_u16() == 401 {
                warn!("Weather API rejected the API key (HTTP 401)");
            }
            return Err(SurveyError::api_status(
                format!("'{city}': HTTP {} - {message}", status.as_u16()),
                status.as_u16(),
            ));
        }

        let parsed: response::CurrentWeather = serde_json::from_str(&body).map_err(|e| {
            SurveyError::decode(format!("'{city}': malformed weather JSON: {e}"))
        })?;

        parsed.into_row(city)
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<CityWeather> {
        self.fetch(city).await
    }
}

/// OpenWeatherMap response structures
///
/// Every section is optional so a missing field surfaces as a named decode
/// error rather than a generic serde message.
mod response {
    use crate::models::CityWeather;
    use crate::{Result, SurveyError};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub coord: Option<Coord>,
        pub main: Option<Main>,
        pub wind: Option<Wind>,
        pub clouds: Option<Clouds>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: Option<f64>,
        pub humidity: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Clouds {
        pub all: Option<f64>,
    }

    /// Error body, e.g. `{"cod":"404","message":"city not found"}`
    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub message: Option<String>,
    }

    fn required(value: Option<f64>, city: &str, field: &str) -> Result<f64> {
        value.ok_or_else(|| SurveyError::decode(format!("'{city}': missing field {field}")))
    }

    impl CurrentWeather {
        /// Convert into a survey row named after the queried city
        pub fn into_row(self, city: &str) -> Result<CityWeather> {
            let main = self.main.as_ref();
            Ok(CityWeather {
                city: city.to_string(),
                lat: required(self.coord.and_then(|c| c.lat), city, "coord.lat")?,
                temp: required(main.and_then(|m| m.temp), city, "main.temp")?,
                humidity: required(main.and_then(|m| m.humidity), city, "main.humidity")?,
                wind: required(self.wind.and_then(|w| w.speed), city, "wind.speed")?,
                clouds: required(self.clouds.and_then(|c| c.all), city, "clouds.all")?,
            })
        }
    }
}
