//! Nearest-city resolution
//!
//! Snaps sampled coordinates to the closest known city and reduces the samples
//! to a list of unique city names.

use crate::models::{City, Coordinates};
use std::collections::HashSet;
use tracing::debug;

/// In-memory list of known cities
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    cities: Vec<City>,
}

impl Gazetteer {
    /// Create a gazetteer from an explicit city list
    #[must_use]
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Gazetteer backed by the bundled world city list
    #[must_use]
    pub fn world() -> Self {
        let cities: Vec<City> = cities::all()
            .into_iter()
            .map(|entry| {
                City::new(
                    entry.city.to_string(),
                    entry.country.to_string(),
                    f64::from(entry.latitude),
                    f64::from(entry.longitude),
                )
            })
            .filter(|city| !city.name.is_empty() && city.coordinates.is_valid())
            .collect();

        Self::new(cities)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Closest known city by great-circle distance.
    ///
    /// Ties keep the earlier entry. Returns `None` only when the gazetteer is empty.
    #[must_use]
    pub fn nearest_city(&self, point: &Coordinates) -> Option<&City> {
        self.cities
            .iter()
            .map(|city| (city, point.distance_km(&city.coordinates)))
            .fold(None, |closest: Option<(&City, f64)>, (city, distance)| match closest {
                Some((_, best)) if best <= distance => closest,
                _ => Some((city, distance)),
            })
            .map(|(city, _)| city)
    }

    /// Resolve every sample to its nearest city, keeping the first occurrence of
    /// each city name in sample order.
    #[must_use]
    pub fn unique_cities(&self, samples: &[Coordinates]) -> Vec<City> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique = Vec::new();

        for sample in samples {
            if let Some(city) = self.nearest_city(sample) {
                if seen.insert(city.name.as_str()) {
                    unique.push(city.clone());
                }
            }
        }

        debug!(
            "Resolved {} samples to {} unique cities",
            samples.len(),
            unique.len()
        );
        unique
    }
}
