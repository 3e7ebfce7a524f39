//! Location models for sampled coordinates and known cities

use serde::{Deserialize, Serialize};

/// Valid latitude range in decimal degrees
pub const LATITUDE_BOUNDS: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range in decimal degrees
pub const LONGITUDE_BOUNDS: (f64, f64) = (-180.0, 180.0);

/// A point on the globe
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components lie inside the geographic bounds
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (LATITUDE_BOUNDS.0..=LATITUDE_BOUNDS.1).contains(&self.latitude)
            && (LONGITUDE_BOUNDS.0..=LONGITUDE_BOUNDS.1).contains(&self.longitude)
    }

    /// Great-circle distance to another point in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// A named city known to the gazetteer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// City name, also used as the weather API query
    pub name: String,
    /// Country name or code as provided by the city list
    pub country: String,
    pub coordinates: Coordinates,
}

impl City {
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            coordinates: Coordinates::new(latitude, longitude),
        }
    }
}
