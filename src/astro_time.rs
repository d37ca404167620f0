//! Civil-to-astronomical time conversion: wall-clock birth time in a named
//! timezone to a UTC instant, and UTC to a Gregorian Julian Day.

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::AstrologyError;

/// Interprets a wall-clock birth date/time in `tz` and converts it to UTC.
///
/// An ambiguous local time (DST overlap) resolves to the earlier instant;
/// a nonexistent one (DST gap) is rejected as an input error.
pub fn local_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
) -> Result<DateTime<Utc>, AstrologyError> {
    let local = date.and_time(time);
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            return Err(AstrologyError::InvalidBirthTime {
                local,
                timezone: tz.name().to_string(),
            })
        }
    };
    Ok(resolved.with_timezone(&Utc))
}

/// Julian Day for a UTC instant, Gregorian calendar convention.
///
/// Day fraction carries full sub-second precision; the ephemeris treats the
/// result as a universal-time day count.
pub fn julian_day(utc: DateTime<Utc>) -> f64 {
    let mut year = utc.year() as f64;
    let mut month = utc.month() as f64;
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }
    let century = (year / 100.0).floor();
    let leap_correction = 2.0 - century + (century / 4.0).floor();

    let seconds = utc.second() as f64 + f64::from(utc.nanosecond()) / 1e9;
    let day_fraction =
        (utc.hour() as f64 + utc.minute() as f64 / 60.0 + seconds / 3600.0) / 24.0;

    (365.25 * (year + 4716.0)).floor()
        + (30.6001 * (month + 1.0)).floor()
        + utc.day() as f64
        + day_fraction
        + leap_correction
        - 1524.5
}

/// Julian centuries elapsed since the J2000.0 epoch.
pub fn julian_centuries(julian_day: f64) -> f64 {
    (julian_day - 2_451_545.0) / 36_525.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn julian_day_reference_epochs() {
        // J2000.0
        assert_relative_eq!(julian_day(utc(2000, 1, 1, 12, 0, 0)), 2_451_545.0, epsilon = 1e-9);
        // 1987 June 19.5 (Meeus example 7.a, calendar part)
        assert_relative_eq!(julian_day(utc(1987, 6, 19, 12, 0, 0)), 2_446_966.0, epsilon = 1e-9);
        // Regression fixture instant: 1991-11-27 07:40 UT
        assert_relative_eq!(
            julian_day(utc(1991, 11, 27, 7, 40, 0)),
            2_448_587.819_444_444,
            epsilon = 1e-6
        );
        // January date exercises the month <= 2 branch
        assert_relative_eq!(julian_day(utc(1999, 1, 1, 0, 0, 0)), 2_451_179.5, epsilon = 1e-9);
    }

    #[test]
    fn local_time_converts_through_named_zone() {
        let date = NaiveDate::from_ymd_opt(1991, 11, 27).unwrap();
        let time = NaiveTime::from_hms_opt(2, 40, 0).unwrap();
        let utc = local_to_utc(date, time, chrono_tz::America::Bogota).unwrap();
        // Bogota is UTC-5 year round
        assert_eq!(utc, Utc.with_ymd_and_hms(1991, 11, 27, 7, 40, 0).unwrap());
    }

    #[test]
    fn nonexistent_local_time_is_rejected() {
        // US spring-forward gap: 2021-03-14 02:30 never happened in New York
        let date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let err = local_to_utc(date, time, chrono_tz::America::New_York).unwrap_err();
        assert!(matches!(err, AstrologyError::InvalidBirthTime { .. }));
    }

    #[test]
    fn ambiguous_local_time_takes_earlier_instant() {
        // US fall-back overlap: 2021-11-07 01:30 happens twice in New York
        let date = NaiveDate::from_ymd_opt(2021, 11, 7).unwrap();
        let time = NaiveTime::from_hms_opt(1, 30, 0).unwrap();
        let utc = local_to_utc(date, time, chrono_tz::America::New_York).unwrap();
        // earlier instant is still EDT (UTC-4)
        assert_eq!(utc, Utc.with_ymd_and_hms(2021, 11, 7, 5, 30, 0).unwrap());
    }
}
