//! Data models for the weather survey
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and gazetteer cities
//! - Weather: One observed table row, request units and plotted measurements

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{City, Coordinates};
pub use weather::{CityWeather, Measurement, Units};
