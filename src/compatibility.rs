//! Sun-sign compatibility scoring.
//!
//! Deliberately decoupled from the chart pipeline: signs come from the fixed
//! calendar boundary table, not the ephemeris, so two profiles can be scored
//! from birth dates alone with no I/O. Pure and deterministic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::zodiac::ZodiacSign;

/// The three relationship aspects a pairing is scored on, in output order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatibilityCategory {
    AuthenticConnection,
    StableRelationship,
    OpenRelationship,
}

impl CompatibilityCategory {
    pub const ALL: [CompatibilityCategory; 3] = [
        CompatibilityCategory::AuthenticConnection,
        CompatibilityCategory::StableRelationship,
        CompatibilityCategory::OpenRelationship,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompatibilityCategory::AuthenticConnection => "Authentic connection",
            CompatibilityCategory::StableRelationship => "Stable relationship",
            CompatibilityCategory::OpenRelationship => "Open relationship",
        }
    }

    /// Score lost per step of zodiacal distance.
    fn distance_weight(self) -> f64 {
        match self {
            CompatibilityCategory::AuthenticConnection => 12.0,
            CompatibilityCategory::StableRelationship => 15.0,
            CompatibilityCategory::OpenRelationship => 10.0,
        }
    }
}

/// One category's score, clamped to [0, 100], with its description tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    pub category: CompatibilityCategory,
    pub score: f64,
    pub description: String,
}

/// Same-element bonus granted to premium profiles, per category.
const PREMIUM_ELEMENT_BONUS: f64 = 15.0;

/// Scores the compatibility of two birth dates across the three categories.
///
/// Symmetric in its date arguments and free of failure modes.
pub fn score_compatibility(
    date_a: NaiveDate,
    date_b: NaiveDate,
    premium: bool,
) -> [CompatibilityBreakdown; 3] {
    let sign_a = ZodiacSign::from_birth_date(date_a);
    let sign_b = ZodiacSign::from_birth_date(date_b);

    let distance = zodiac_distance(sign_a, sign_b) as f64;
    let element_bonus = premium && sign_a.element() == sign_b.element();

    CompatibilityCategory::ALL.map(|category| {
        let mut score = (100.0 - category.distance_weight() * distance).max(0.0);
        if element_bonus {
            score = (score + PREMIUM_ELEMENT_BONUS).min(100.0);
        }
        CompatibilityBreakdown {
            category,
            score,
            description: describe(score).to_string(),
        }
    })
}

/// Circular distance between two signs on the zodiac wheel, 0..=6.
fn zodiac_distance(a: ZodiacSign, b: ZodiacSign) -> u32 {
    let difference = (a.index() as i32 - b.index() as i32).unsigned_abs();
    if difference <= 6 {
        difference
    } else {
        12 - difference
    }
}

fn describe(score: f64) -> &'static str {
    if score >= 85.0 {
        "Very high compatibility"
    } else if score >= 70.0 {
        "High compatibility"
    } else if score >= 50.0 {
        "Good compatibility"
    } else if score >= 30.0 {
        "Moderate compatibility"
    } else {
        "Low compatibility"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wheel_distance_is_circular() {
        assert_eq!(zodiac_distance(ZodiacSign::Aries, ZodiacSign::Aries), 0);
        assert_eq!(zodiac_distance(ZodiacSign::Aries, ZodiacSign::Libra), 6);
        assert_eq!(zodiac_distance(ZodiacSign::Aries, ZodiacSign::Scorpio), 5);
        assert_eq!(zodiac_distance(ZodiacSign::Pisces, ZodiacSign::Aries), 1);
        assert_eq!(zodiac_distance(ZodiacSign::Capricorn, ZodiacSign::Cancer), 6);
    }

    #[test]
    fn identical_dates_score_perfectly() {
        let birthday = date(1995, 8, 10);
        for breakdown in score_compatibility(birthday, birthday, false) {
            assert_relative_eq!(breakdown.score, 100.0);
            assert_eq!(breakdown.description, "Very high compatibility");
        }
    }

    #[test]
    fn scoring_is_symmetric() {
        let a = date(1990, 1, 1);
        let b = date(1992, 9, 30);
        for premium in [false, true] {
            let forward = score_compatibility(a, b, premium);
            let backward = score_compatibility(b, a, premium);
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn opposed_signs_base_scores() {
        // 1990-01-01 is Capricorn (Earth), 1990-07-01 is Cancer (Water):
        // distance 6, no shared element, so the raw base formula applies.
        let scores = score_compatibility(date(1990, 1, 1), date(1990, 7, 1), false);
        assert_eq!(scores[0].category, CompatibilityCategory::AuthenticConnection);
        assert_relative_eq!(scores[0].score, 28.0);
        assert_eq!(scores[0].description, "Low compatibility");
        assert_eq!(scores[1].category, CompatibilityCategory::StableRelationship);
        assert_relative_eq!(scores[1].score, 10.0);
        assert_eq!(scores[1].description, "Low compatibility");
        assert_eq!(scores[2].category, CompatibilityCategory::OpenRelationship);
        assert_relative_eq!(scores[2].score, 40.0);
        assert_eq!(scores[2].description, "Moderate compatibility");
    }

    #[test]
    fn premium_bonus_requires_shared_element() {
        // Capricorn vs Virgo: both Earth, distance 4
        let capricorn = date(1991, 1, 10);
        let virgo = date(1991, 9, 10);

        let base = score_compatibility(capricorn, virgo, false);
        assert_relative_eq!(base[0].score, 52.0);
        assert_relative_eq!(base[1].score, 40.0);
        assert_relative_eq!(base[2].score, 60.0);

        let boosted = score_compatibility(capricorn, virgo, true);
        assert_relative_eq!(boosted[0].score, 67.0);
        assert_relative_eq!(boosted[1].score, 55.0);
        assert_relative_eq!(boosted[2].score, 75.0);
        assert_eq!(boosted[2].description, "High compatibility");

        // Capricorn vs Gemini share no element: premium changes nothing
        let gemini = date(1991, 6, 10);
        assert_eq!(
            score_compatibility(capricorn, gemini, true),
            score_compatibility(capricorn, gemini, false)
        );
    }

    #[test]
    fn premium_bonus_caps_at_one_hundred() {
        let birthday = date(1988, 4, 2); // Aries
        for breakdown in score_compatibility(birthday, birthday, true) {
            assert_relative_eq!(breakdown.score, 100.0);
        }
    }

    #[test]
    fn scores_never_go_negative() {
        // distance 6 with the heaviest weight would be 100 - 90 = 10; force a
        // floor check with the stable weight by construction of the formula
        for d in 0..=6 {
            let stable = (100.0f64 - 15.0 * d as f64).max(0.0);
            assert!(stable >= 0.0);
        }
        // and through the public surface
        let scores = score_compatibility(date(1990, 1, 1), date(1990, 7, 1), false);
        assert!(scores.iter().all(|b| (0.0..=100.0).contains(&b.score)));
    }
}
