use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------
// ## Zodiac signs
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Classical element of a sign, three signs per element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign occupied by an ecliptic longitude, 30 degrees per sign from 0 Aries.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        let index = (normalized / 30.0).floor() as usize % 12;
        Self::ALL[index]
    }

    /// Sun sign from the calendar date alone, using the fixed month/day
    /// boundary ranges. Deliberately decoupled from the ephemeris: near a
    /// sign cutover the two notions may disagree.
    pub fn from_birth_date(date: NaiveDate) -> Self {
        let month = date.month();
        let day = date.day();
        match (month, day) {
            (3, 21..) | (4, ..=19) => ZodiacSign::Aries,
            (4, 20..) | (5, ..=20) => ZodiacSign::Taurus,
            (5, 21..) | (6, ..=20) => ZodiacSign::Gemini,
            (6, 21..) | (7, ..=22) => ZodiacSign::Cancer,
            (7, 23..) | (8, ..=22) => ZodiacSign::Leo,
            (8, 23..) | (9, ..=22) => ZodiacSign::Virgo,
            (9, 23..) | (10, ..=22) => ZodiacSign::Libra,
            (10, 23..) | (11, ..=21) => ZodiacSign::Scorpio,
            (11, 22..) | (12, ..=21) => ZodiacSign::Sagittarius,
            (12, 22..) | (1, ..=19) => ZodiacSign::Capricorn,
            (1, 20..) | (2, ..=18) => ZodiacSign::Aquarius,
            _ => ZodiacSign::Pisces,
        }
    }

    /// Position within the sign for an ecliptic longitude, in [0, 30).
    pub fn degrees_in_sign(longitude: f64) -> f64 {
        longitude.rem_euclid(360.0) % 30.0
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈️",
            ZodiacSign::Taurus => "♉️",
            ZodiacSign::Gemini => "♊️",
            ZodiacSign::Cancer => "♋️",
            ZodiacSign::Leo => "♌️",
            ZodiacSign::Virgo => "♍️",
            ZodiacSign::Libra => "♎️",
            ZodiacSign::Scorpio => "♏️",
            ZodiacSign::Sagittarius => "♐️",
            ZodiacSign::Capricorn => "♑️",
            ZodiacSign::Aquarius => "♒️",
            ZodiacSign::Pisces => "♓️",
        }
    }

    pub fn element(self) -> Element {
        match self {
            ZodiacSign::Aries | ZodiacSign::Leo | ZodiacSign::Sagittarius => Element::Fire,
            ZodiacSign::Taurus | ZodiacSign::Virgo | ZodiacSign::Capricorn => Element::Earth,
            ZodiacSign::Gemini | ZodiacSign::Libra | ZodiacSign::Aquarius => Element::Air,
            ZodiacSign::Cancer | ZodiacSign::Scorpio | ZodiacSign::Pisces => Element::Water,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn longitude_maps_to_sign() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(244.55), ZodiacSign::Sagittarius);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(-10.0), ZodiacSign::Pisces);
    }

    #[test]
    fn degrees_stay_within_sign() {
        assert_relative_eq!(ZodiacSign::degrees_in_sign(244.55), 4.55, epsilon = 1e-9);
        assert_relative_eq!(ZodiacSign::degrees_in_sign(0.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(ZodiacSign::degrees_in_sign(389.5), 29.5, epsilon = 1e-9);
        assert!(ZodiacSign::degrees_in_sign(29.9999999) < 30.0);
    }

    #[test]
    fn birth_date_boundaries() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(ZodiacSign::from_birth_date(date(1990, 3, 21)), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_birth_date(date(1990, 4, 19)), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_birth_date(date(1990, 4, 20)), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_birth_date(date(1990, 12, 21)), ZodiacSign::Sagittarius);
        assert_eq!(ZodiacSign::from_birth_date(date(1990, 12, 22)), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::from_birth_date(date(1991, 1, 19)), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::from_birth_date(date(1991, 1, 20)), ZodiacSign::Aquarius);
        assert_eq!(ZodiacSign::from_birth_date(date(1991, 2, 19)), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_birth_date(date(1991, 3, 20)), ZodiacSign::Pisces);
    }

    #[test]
    fn elements_cover_three_signs_each() {
        let mut fire = 0;
        let mut earth = 0;
        let mut air = 0;
        let mut water = 0;
        for sign in ZodiacSign::ALL {
            match sign.element() {
                Element::Fire => fire += 1,
                Element::Earth => earth += 1,
                Element::Air => air += 1,
                Element::Water => water += 1,
            }
        }
        assert_eq!((fire, earth, air, water), (3, 3, 3, 3));
    }
}
