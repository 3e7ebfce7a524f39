//! Sequential weather collection
//!
//! Queries the weather source once per city, in order, keeping successful rows
//! and skipping failed cities. A fixed pause follows every call.

use crate::SurveyError;
use crate::dataset::WeatherTable;
use crate::models::City;
use crate::weather::WeatherSource;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why a city lookup was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    /// Connection, timeout or body read failure
    Network,
    /// Non-success HTTP status, e.g. an unknown city or a rejected key
    HttpStatus,
    /// Malformed body or missing field
    Decode,
    Other,
}

impl FailureKind {
    #[must_use]
    pub fn of(error: &SurveyError) -> Self {
        match error {
            SurveyError::Network { .. } => FailureKind::Network,
            SurveyError::Api { .. } => FailureKind::HttpStatus,
            SurveyError::Decode { .. } => FailureKind::Decode,
            _ => FailureKind::Other,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Network => "network",
            FailureKind::HttpStatus => "http status",
            FailureKind::Decode => "decode",
            FailureKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// Outcome counts of a collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: BTreeMap<FailureKind, usize>,
}

impl CollectionSummary {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    fn record_failure(&mut self, kind: FailureKind) {
        *self.failures.entry(kind).or_default() += 1;
    }
}

impl fmt::Display for CollectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed",
            self.attempted,
            self.succeeded,
            self.failed()
        )?;
        if !self.failures.is_empty() {
            let details: Vec<String> = self
                .failures
                .iter()
                .map(|(kind, count)| format!("{kind}: {count}"))
                .collect();
            write!(f, " ({})", details.join(", "))?;
        }
        Ok(())
    }
}

/// Pacing and limits for a collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorOptions {
    /// Pause after each call, whatever its outcome
    pub delay: Duration,
    /// Stop once this many rows were collected
    pub max_cities: Option<usize>,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1100),
            max_cities: None,
        }
    }
}

/// Query `source` for every city in order, one request at a time.
///
/// Failed lookups are logged and skipped; only successful rows reach the table.
pub async fn collect<S: WeatherSource>(
    source: &S,
    cities: &[City],
    options: &CollectorOptions,
) -> (WeatherTable, CollectionSummary) {
    let mut table = WeatherTable::new();
    let mut summary = CollectionSummary::default();
    let total = cities.len();

    info!("Querying current weather for {} cities", total);

    for (index, city) in cities.iter().enumerate() {
        info!("Getting data for {} (City {} of {})", city.name, index + 1, total);
        summary.attempted += 1;

        match source.current_weather(&city.name).await {
            Ok(row) => {
                debug!(
                    "{}: lat {:.2}, temp {:.1}, humidity {:.0}, wind {:.1}, clouds {:.0}",
                    row.city, row.lat, row.temp, row.humidity, row.wind, row.clouds
                );
                table.push(row);
                summary.succeeded += 1;
            }
            Err(e) => {
                let kind = FailureKind::of(&e);
                warn!("Failed to get weather for {} ({}): {}", city.name, kind, e);
                summary.record_failure(kind);
            }
        }

        if let Some(limit) = options.max_cities {
            if table.len() >= limit {
                info!("Reached the limit of {} cities, stopping early", limit);
                break;
            }
        }

        // No pause after the final city; nothing follows it
        if index + 1 < total && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    if summary.attempted > 0 && summary.succeeded == 0 {
        warn!("Every weather lookup failed; check the API key and network connectivity");
    }
    info!("Collection finished: {}", summary);

    (table, summary)
}
