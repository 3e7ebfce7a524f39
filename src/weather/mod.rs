//! Current-conditions weather lookups

use crate::Result;
use crate::models::CityWeather;

pub mod openweathermap;

pub use openweathermap::OpenWeatherClient;

/// A source of current weather conditions, queried by city name
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    /// Fetch current conditions for `city` as one survey row
    async fn current_weather(&self, city: &str) -> Result<CityWeather>;
}
