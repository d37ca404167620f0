//! Placidus house division.
//!
//! Cusps 10 (midheaven) and 1 (ascendant) come from closed-form expressions;
//! the intermediate cusps 11, 12, 2 and 3 divide each quadrant's diurnal or
//! nocturnal semi-arc and are found by fixed-point iteration on the
//! ascensional difference. The remaining six cusps oppose the first six.

use crate::astro_time::julian_centuries;
use crate::ephemeris::normalize_degrees;
use crate::error::AstrologyError;

/// Placidus divides semi-arcs; inside the polar circles a point of the
/// ecliptic can be circumpolar and the division is undefined.
const MAX_PLACIDUS_LATITUDE: f64 = 66.0;

/// The twelve cusp longitudes (house 1 first) plus the two chart angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps {
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Computes the Placidus cusps for a Julian Day and geographic position.
///
/// Longitude is east-positive, latitude north-positive, both in degrees.
pub fn placidus_cusps(
    julian_day: f64,
    latitude: f64,
    longitude: f64,
) -> Result<HouseCusps, AstrologyError> {
    if latitude.abs() > MAX_PLACIDUS_LATITUDE {
        return Err(AstrologyError::EphemerisComputation {
            detail: format!(
                "Placidus houses are undefined at latitude {latitude} (limit ±{MAX_PLACIDUS_LATITUDE})"
            ),
        });
    }

    let t = julian_centuries(julian_day);
    let obliquity = mean_obliquity(t).to_radians();
    let ramc = normalize_degrees(gmst_degrees(julian_day) + longitude);
    let latitude_rad = latitude.to_radians();

    let midheaven = ecliptic_from_right_ascension(ramc, obliquity);
    let ascendant = {
        let ramc_rad = ramc.to_radians();
        normalize_degrees(
            ramc_rad
                .cos()
                .atan2(-(ramc_rad.sin() * obliquity.cos() + latitude_rad.tan() * obliquity.sin()))
                .to_degrees(),
        )
    };

    // Quadrant cusps: (meridian offset, semi-arc fraction)
    let cusp11 = placidus_cusp(ramc, obliquity, latitude_rad, 30.0, 1.0 / 3.0)?;
    let cusp12 = placidus_cusp(ramc, obliquity, latitude_rad, 60.0, 2.0 / 3.0)?;
    let cusp2 = placidus_cusp(ramc, obliquity, latitude_rad, 120.0, 2.0 / 3.0)?;
    let cusp3 = placidus_cusp(ramc, obliquity, latitude_rad, 150.0, 1.0 / 3.0)?;

    let opposite = |c: f64| normalize_degrees(c + 180.0);
    let cusps = [
        ascendant,
        cusp2,
        cusp3,
        opposite(midheaven),
        opposite(cusp11),
        opposite(cusp12),
        opposite(ascendant),
        opposite(cusp2),
        opposite(cusp3),
        midheaven,
        cusp11,
        cusp12,
    ];

    Ok(HouseCusps {
        cusps,
        ascendant,
        midheaven,
    })
}

/// Which house a body of ecliptic longitude `longitude` occupies.
///
/// Containment is the half-open interval [cusp[i], cusp[i+1]) walked around
/// the circle; the interval that carries the 0°/360° wrap is detected by its
/// start exceeding its end. The twelve intervals partition the full circle,
/// so exactly one always matches.
pub fn house_of(longitude: f64, cusps: &[f64; 12]) -> u8 {
    let longitude = normalize_degrees(longitude);
    for i in 0..12 {
        let start = cusps[i];
        let end = cusps[(i + 1) % 12];
        let contained = if start > end {
            longitude >= start || longitude < end
        } else {
            (start..end).contains(&longitude)
        };
        if contained {
            return (i + 1) as u8;
        }
    }
    unreachable!("longitude {longitude} escaped the house partition {cusps:?}")
}

/// Iterates a quadrant cusp: the point whose meridian distance equals the
/// given fraction of its own semi-arc. Converges in a handful of rounds for
/// latitudes the caller has already bounded.
fn placidus_cusp(
    ramc: f64,
    obliquity: f64,
    latitude_rad: f64,
    offset: f64,
    fraction: f64,
) -> Result<f64, AstrologyError> {
    let mut cusp = ecliptic_from_right_ascension(ramc + offset, obliquity);
    for _ in 0..20 {
        let declination = (obliquity.sin() * cusp.to_radians().sin()).asin();
        let ascension_ratio = latitude_rad.tan() * declination.tan();
        if ascension_ratio.abs() >= 1.0 {
            // circumpolar ecliptic point; cannot happen below the latitude cap
            return Err(AstrologyError::EphemerisComputation {
                detail: format!("Placidus iteration diverged at offset {offset}"),
            });
        }
        let ascensional_difference = ascension_ratio.asin().to_degrees();
        let right_ascension = ramc + offset + fraction * ascensional_difference;
        cusp = ecliptic_from_right_ascension(right_ascension, obliquity);
    }
    Ok(cusp)
}

/// Ecliptic longitude of the ecliptic point with the given right ascension.
fn ecliptic_from_right_ascension(right_ascension: f64, obliquity: f64) -> f64 {
    let ra = right_ascension.to_radians();
    normalize_degrees(ra.sin().atan2(ra.cos() * obliquity.cos()).to_degrees())
}

/// Mean obliquity of the ecliptic, degrees.
fn mean_obliquity(t: f64) -> f64 {
    23.43929111 - 0.013004167 * t - 1.638889e-7 * t * t + 5.036111e-7 * t * t * t
}

/// Greenwich mean sidereal time in degrees.
fn gmst_degrees(julian_day: f64) -> f64 {
    let t = julian_centuries(julian_day);
    normalize_degrees(
        280.46061837
            + 360.98564736629 * (julian_day - 2_451_545.0)
            + 0.000387933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // 1991-11-27 07:40 UT over Bogotá
    const FIXTURE_JD: f64 = 2_448_587.819_444_444_5;
    const FIXTURE_LAT: f64 = 4.653;
    const FIXTURE_LON: f64 = -74.084;

    fn fixture_cusps() -> HouseCusps {
        placidus_cusps(FIXTURE_JD, FIXTURE_LAT, FIXTURE_LON).unwrap()
    }

    #[test]
    fn fixture_angles() {
        let houses = fixture_cusps();
        assert_relative_eq!(houses.ascendant, 197.4413, epsilon = 0.01);
        assert_relative_eq!(houses.midheaven, 105.3335, epsilon = 0.01);
        assert_relative_eq!(houses.cusps[0], houses.ascendant, epsilon = 1e-12);
        assert_relative_eq!(houses.cusps[9], houses.midheaven, epsilon = 1e-12);
    }

    #[test]
    fn fixture_quadrant_cusps() {
        let houses = fixture_cusps();
        assert_relative_eq!(houses.cusps[10], 134.633, epsilon = 0.01); // house 11
        assert_relative_eq!(houses.cusps[11], 165.815, epsilon = 0.01); // house 12
        assert_relative_eq!(houses.cusps[1], 228.136, epsilon = 0.01); // house 2
        assert_relative_eq!(houses.cusps[2], 257.102, epsilon = 0.01); // house 3
    }

    #[test]
    fn opposite_cusps_face_each_other() {
        let houses = fixture_cusps();
        for i in 0..6 {
            assert_relative_eq!(
                normalize_degrees(houses.cusps[i] + 180.0),
                houses.cusps[i + 6],
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn every_cusp_starts_its_own_house() {
        let houses = fixture_cusps();
        for (i, &cusp) in houses.cusps.iter().enumerate() {
            assert_eq!(house_of(cusp, &houses.cusps), (i + 1) as u8);
            // just before the cusp we are still in the previous house
            let before = normalize_degrees(cusp - 1e-4);
            let previous = if i == 0 { 12 } else { i as u8 };
            assert_eq!(house_of(before, &houses.cusps), previous);
        }
    }

    #[test]
    fn wraparound_interval_contains_zero() {
        let houses = fixture_cusps();
        // the fixture's house 6 interval runs 345.8° -> 17.4° through 0°
        assert_eq!(house_of(0.0, &houses.cusps), 6);
        assert_eq!(house_of(359.99, &houses.cusps), 6);
        assert_eq!(house_of(17.0, &houses.cusps), 6);
        assert_eq!(house_of(17.5, &houses.cusps), 7);
    }

    #[test]
    fn polar_latitudes_are_rejected() {
        let err = placidus_cusps(FIXTURE_JD, 78.2, 15.6).unwrap_err();
        assert!(matches!(err, AstrologyError::EphemerisComputation { .. }));
    }

    #[test]
    fn equator_midnight_sanity() {
        // On the equator the ascensional difference vanishes and the
        // quadrant cusps sit exactly 30° apart in right ascension.
        let houses = placidus_cusps(2_451_545.0, 0.0, 0.0).unwrap();
        for window in houses.cusps.windows(2) {
            let gap = normalize_degrees(window[1] - window[0]);
            assert!(gap > 20.0 && gap < 40.0, "unexpected cusp gap {gap}");
        }
    }
}
