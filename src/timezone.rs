//! Coordinates-to-IANA-timezone resolution, fully offline.

use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

use crate::error::AstrologyError;

pub trait TimezoneResolver: Send + Sync {
    /// Maps coordinates to the IANA timezone that governs them.
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, AstrologyError>;
}

/// Resolver backed by the embedded timezone boundary data of `tzf-rs`.
///
/// Construction decompresses the boundary set and is comparatively expensive;
/// build one and share it.
pub struct BoundaryTimezoneResolver {
    finder: DefaultFinder,
}

impl BoundaryTimezoneResolver {
    pub fn new() -> Self {
        BoundaryTimezoneResolver {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for BoundaryTimezoneResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver for BoundaryTimezoneResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Result<Tz, AstrologyError> {
        let name = self.finder.get_tz_name(longitude, latitude);
        if name.is_empty() {
            return Err(AstrologyError::TimezoneResolution {
                latitude,
                longitude,
            });
        }
        name.parse::<Tz>()
            .map_err(|_| AstrologyError::TimezoneResolution {
                latitude,
                longitude,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bogota_coordinates_resolve() {
        let resolver = BoundaryTimezoneResolver::new();
        let tz = resolver.resolve(4.653, -74.084).unwrap();
        assert_eq!(tz, chrono_tz::America::Bogota);
    }

    #[test]
    fn hemisphere_spread() {
        let resolver = BoundaryTimezoneResolver::new();
        assert_eq!(
            resolver.resolve(35.6762, 139.6503).unwrap(),
            chrono_tz::Asia::Tokyo
        );
        assert_eq!(
            resolver.resolve(-33.8688, 151.2093).unwrap(),
            chrono_tz::Australia::Sydney
        );
    }
}
