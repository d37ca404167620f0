//! synastr core: natal chart computation and sun-sign compatibility scoring.
//!
//! The chart pipeline turns a birth date, wall-clock time and free-text place
//! into a typed [`NatalChart`]: geocoding, timezone resolution, UTC and
//! Julian Day conversion, ephemeris longitudes for thirteen bodies and the
//! twelve Placidus house cusps. The scorer is an independent pure function
//! over two birth dates.
//!
//! ```no_run
//! use chrono::{NaiveDate, NaiveTime};
//! use synastr_core::NatalChartEngine;
//!
//! # async fn demo() -> Result<(), synastr_core::AstrologyError> {
//! let engine = NatalChartEngine::new();
//! let computed = engine
//!     .compute(
//!         NaiveDate::from_ymd_opt(1991, 11, 27).unwrap(),
//!         NaiveTime::from_hms_opt(2, 40, 0).unwrap(),
//!         "Bogotá, Colombia",
//!     )
//!     .await?;
//! println!("{} bodies", computed.chart.positions.len());
//! # Ok(())
//! # }
//! ```

pub mod astro_time;
pub mod chart;
pub mod compatibility;
pub mod ephemeris;
pub mod error;
pub mod geocode;
pub mod houses;
pub mod timezone;
pub mod zodiac;

pub use chart::{
    AstrologicalPosition, ComputedChart, GeoTimeContext, NatalChart, NatalChartEngine,
    HOUSE_NAMES,
};
pub use compatibility::{
    score_compatibility, CompatibilityBreakdown, CompatibilityCategory,
};
pub use ephemeris::{BuiltinEphemeris, CelestialBody, EphemerisBackend};
pub use error::AstrologyError;
pub use geocode::{GeoPoint, Geocoder, NominatimGeocoder};
pub use houses::HouseCusps;
pub use timezone::{BoundaryTimezoneResolver, TimezoneResolver};
pub use zodiac::{Element, ZodiacSign};
