//! Natal chart assembly: the full pipeline from birth data to a typed chart.
//!
//! Stage order is fixed and none may be skipped: geocode the birth place,
//! resolve the timezone from the coordinates, anchor the wall-clock birth
//! time in that zone, convert to UTC and a Julian Day, then evaluate bodies
//! and houses against that single instant.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::astro_time::{julian_day, local_to_utc};
use crate::ephemeris::{BuiltinEphemeris, CelestialBody, EphemerisBackend};
use crate::error::AstrologyError;
use crate::geocode::{Geocoder, NominatimGeocoder};
use crate::houses::house_of;
use crate::timezone::{BoundaryTimezoneResolver, TimezoneResolver};
use crate::zodiac::ZodiacSign;

/// Display labels for the twelve house cusps, in house order.
pub const HOUSE_NAMES: [&str; 12] = [
    "Ascendant",
    "House 2",
    "House 3",
    "Imum Coeli",
    "House 5",
    "House 6",
    "Descendant",
    "House 8",
    "House 9",
    "Midheaven",
    "House 11",
    "House 12",
];

/// One celestial body's or house cusp's placement in the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstrologicalPosition {
    pub name: String,
    pub sign: ZodiacSign,
    pub sign_icon: String,
    /// Position within the sign, ecliptic longitude modulo 30. In [0, 30).
    pub degrees: f64,
    /// Occupied house for bodies; the house's own index for cusp entries.
    pub house: u8,
}

/// Complete natal chart: exactly 13 body entries and 12 house entries, both
/// in fixed enumeration order. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub positions: Vec<AstrologicalPosition>,
    pub houses: Vec<AstrologicalPosition>,
}

/// Resolved "when and where" of a birth. Intermediate only; each field is
/// derived from the previous stage and both the ephemeris and the house
/// calculator consume the same instant and coordinates.
#[derive(Debug, Clone, Copy)]
pub struct GeoTimeContext {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    pub utc: DateTime<Utc>,
    pub julian_day: f64,
}

/// A computed chart together with the resolved location data the caller
/// persists alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedChart {
    pub chart: NatalChart,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// The natal chart pipeline with its collaborators injected.
///
/// Each `compute` call is independent: no cache, no shared mutable state, so
/// an engine behind an `Arc` serves unlimited concurrent requests.
pub struct NatalChartEngine {
    geocoder: Box<dyn Geocoder>,
    timezones: Box<dyn TimezoneResolver>,
    ephemeris: Box<dyn EphemerisBackend>,
}

impl NatalChartEngine {
    /// Engine wired with the production collaborators: Nominatim geocoding,
    /// offline timezone boundaries and the built-in ephemeris.
    pub fn new() -> Self {
        Self::with_parts(
            Box::new(NominatimGeocoder::new()),
            Box::new(BoundaryTimezoneResolver::new()),
            Box::new(BuiltinEphemeris::new()),
        )
    }

    pub fn with_parts(
        geocoder: Box<dyn Geocoder>,
        timezones: Box<dyn TimezoneResolver>,
        ephemeris: Box<dyn EphemerisBackend>,
    ) -> Self {
        NatalChartEngine {
            geocoder,
            timezones,
            ephemeris,
        }
    }

    /// Runs the geo/time stages alone: place text to Julian Day.
    pub async fn resolve_geo_time(
        &self,
        birth_date: NaiveDate,
        birth_time: NaiveTime,
        birth_place: &str,
    ) -> Result<GeoTimeContext, AstrologyError> {
        let point = self.geocoder.resolve(birth_place).await?;
        let timezone = self.timezones.resolve(point.latitude, point.longitude)?;
        let utc = local_to_utc(birth_date, birth_time, timezone)?;
        let julian_day = julian_day(utc);
        log::debug!(
            "resolved {:?} -> ({}, {}) {} utc={} jd={}",
            birth_place,
            point.latitude,
            point.longitude,
            timezone.name(),
            utc,
            julian_day
        );
        Ok(GeoTimeContext {
            latitude: point.latitude,
            longitude: point.longitude,
            timezone,
            utc,
            julian_day,
        })
    }

    /// Computes the complete natal chart for a birth instant and place.
    ///
    /// Any stage failure aborts the request with the taxonomy error; a chart
    /// with missing bodies is never returned.
    pub async fn compute(
        &self,
        birth_date: NaiveDate,
        birth_time: NaiveTime,
        birth_place: &str,
    ) -> Result<ComputedChart, AstrologyError> {
        let context = self
            .resolve_geo_time(birth_date, birth_time, birth_place)
            .await?;

        let house_cusps =
            self.ephemeris
                .house_cusps(context.julian_day, context.latitude, context.longitude)?;

        let mut positions = Vec::with_capacity(CelestialBody::ALL.len());
        for body in CelestialBody::ALL {
            let longitude = self.ephemeris.body_longitude(context.julian_day, body)?;
            let sign = ZodiacSign::from_longitude(longitude);
            positions.push(AstrologicalPosition {
                name: body.label().to_string(),
                sign,
                sign_icon: sign.icon().to_string(),
                degrees: ZodiacSign::degrees_in_sign(longitude),
                house: house_of(longitude, &house_cusps.cusps),
            });
        }

        let houses = house_cusps
            .cusps
            .iter()
            .zip(HOUSE_NAMES.iter())
            .enumerate()
            .map(|(i, (&cusp, &name))| {
                let sign = ZodiacSign::from_longitude(cusp);
                AstrologicalPosition {
                    name: name.to_string(),
                    sign,
                    sign_icon: sign.icon().to_string(),
                    degrees: ZodiacSign::degrees_in_sign(cusp),
                    house: (i + 1) as u8,
                }
            })
            .collect();

        log::info!(
            "computed natal chart for {:?} ({} bodies, 12 houses)",
            birth_place,
            positions.len()
        );

        Ok(ComputedChart {
            chart: NatalChart { positions, houses },
            latitude: context.latitude,
            longitude: context.longitude,
            timezone: context.timezone.name().to_string(),
        })
    }
}

impl Default for NatalChartEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_names_cover_all_twelve() {
        assert_eq!(HOUSE_NAMES.len(), 12);
        assert_eq!(HOUSE_NAMES[0], "Ascendant");
        assert_eq!(HOUSE_NAMES[3], "Imum Coeli");
        assert_eq!(HOUSE_NAMES[6], "Descendant");
        assert_eq!(HOUSE_NAMES[9], "Midheaven");
    }

    #[test]
    fn chart_serialises_round_trip() {
        let position = AstrologicalPosition {
            name: "Sun".to_string(),
            sign: ZodiacSign::Sagittarius,
            sign_icon: ZodiacSign::Sagittarius.icon().to_string(),
            degrees: 4.55,
            house: 2,
        };
        let chart = NatalChart {
            positions: vec![position],
            houses: vec![],
        };
        let json = serde_json::to_string(&chart).unwrap();
        let back: NatalChart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chart);
    }
}
