//! Random coordinate sampling
//!
//! Draws uniformly distributed latitude/longitude pairs that are later snapped
//! to their nearest known city.

use crate::models::Coordinates;
use crate::models::location::{LATITUDE_BOUNDS, LONGITUDE_BOUNDS};
use crate::{Result, SurveyError};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

/// Half-open sampling interval `[min, max)` in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeRange {
    pub min: f64,
    pub max: f64,
}

impl DegreeRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The full latitude range
    #[must_use]
    pub fn latitudes() -> Self {
        Self::new(LATITUDE_BOUNDS.0, LATITUDE_BOUNDS.1)
    }

    /// The full longitude range
    #[must_use]
    pub fn longitudes() -> Self {
        Self::new(LONGITUDE_BOUNDS.0, LONGITUDE_BOUNDS.1)
    }

    fn validate(&self, axis: &str, bounds: (f64, f64)) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(SurveyError::validation(format!(
                "{axis} range must satisfy min < max, got [{}, {})",
                self.min, self.max
            )));
        }
        if self.min < bounds.0 || self.max > bounds.1 {
            return Err(SurveyError::validation(format!(
                "{axis} range [{}, {}) exceeds [{}, {}]",
                self.min, self.max, bounds.0, bounds.1
            )));
        }
        Ok(())
    }
}

/// Build the sampler RNG, drawing a fresh seed when none is given.
///
/// The seed actually used is returned so a run can be reproduced.
pub fn seeded_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    (StdRng::seed_from_u64(seed), seed)
}

/// Draw `count` independent uniform coordinates from the given ranges
pub fn sample_coordinates<R: RngExt>(
    rng: &mut R,
    count: usize,
    latitudes: DegreeRange,
    longitudes: DegreeRange,
) -> Result<Vec<Coordinates>> {
    latitudes.validate("Latitude", LATITUDE_BOUNDS)?;
    longitudes.validate("Longitude", LONGITUDE_BOUNDS)?;

    let samples: Vec<Coordinates> = (0..count)
        .map(|_| {
            Coordinates::new(
                rng.random_range(latitudes.min..latitudes.max),
                rng.random_range(longitudes.min..longitudes.max),
            )
        })
        .collect();

    debug!("Sampled {} coordinates", samples.len());
    Ok(samples)
}
