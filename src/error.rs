use chrono::NaiveDateTime;
use thiserror::Error;

/// Failure taxonomy for the chart pipeline.
///
/// `LocationNotFound` and `InvalidBirthTime` are user-input errors and must
/// not be retried; `GeocodingService` is transient infrastructure and may be.
/// Any variant aborts the whole request: a partial chart is never returned.
#[derive(Debug, Error)]
pub enum AstrologyError {
    #[error("birth location not found: {place:?}")]
    LocationNotFound { place: String },

    #[error("could not reach the geocoding service while resolving {place:?}")]
    GeocodingService {
        place: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("no timezone found for coordinates ({latitude}, {longitude})")]
    TimezoneResolution { latitude: f64, longitude: f64 },

    #[error("local birth time {local} does not exist in timezone {timezone}")]
    InvalidBirthTime { local: NaiveDateTime, timezone: String },

    #[error("ephemeris computation failed: {detail}")]
    EphemerisComputation { detail: String },
}

impl AstrologyError {
    /// True for transient failures the caller may retry verbatim.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AstrologyError::GeocodingService { .. })
    }
}
