//! Calendar validity checks and conversion of a civil date/time into an
//! absolute UTC instant.
//!
//! The day counting uses the closed-form proleptic-Gregorian algorithm from
//! <http://howardhinnant.github.io/date_algorithms.html>; it needs no month
//! tables or iteration and stays exact well outside the four-digit year range
//! the grammar can produce, including dates before 1970.

use crate::CivilDateTime;

/// Months that have no day 31.
const SHORT_MONTHS: [i32; 5] = [2, 4, 6, 9, 11];

/// A year is a leap year when divisible by 4 and either not divisible by 100
/// or divisible by 400.
fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Whether day/month/year name a date that exists in the proleptic Gregorian
/// calendar.
pub(crate) fn is_valid_date(date_time: &CivilDateTime) -> bool {
    if date_time.day < 1 || date_time.day > 31 || date_time.month < 1 || date_time.month > 12 {
        return false;
    }

    let february_days = if is_leap_year(date_time.year) { 29 } else { 28 };

    // Days up to the (leap-adjusted) February limit exist in every month.
    if date_time.day <= february_days {
        return true;
    }

    // Day 31 exists only in the seven long months.
    if date_time.day == 31 {
        return !SHORT_MONTHS.contains(&date_time.month);
    }

    // Day 29 or 30, which only February lacks.
    date_time.month != 2
}

/// Whether hour/minute/second are each within their legal range.
pub(crate) fn is_valid_time(date_time: &CivilDateTime) -> bool {
    (0..=23).contains(&date_time.hour)
        && (0..=59).contains(&date_time.minute)
        && (0..=59).contains(&date_time.second)
}

/// Number of days from 1970-01-01 to the given civil date. Negative for
/// dates before the epoch.
///
/// Preconditions: `month` in [1, 12] and `day` in [1, last day of month].
fn days_from_civil(year: i32, month: i32, day: i32) -> i64 {
    // January and February count as months 13 and 14 of the previous year,
    // which puts the leap day at the end of the shifted year.
    let y = i64::from(year) - i64::from(month <= 2);
    let m = i64::from(month);
    let d = i64::from(day);

    // Era division must floor; plain `/` truncates toward zero for negative
    // years.
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + d - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]

    era * 146097 + doe - 719468
}

/// Convert a validated civil date/time plus its differential into seconds
/// since the Unix epoch, in UTC.
pub(crate) fn civil_to_unix_seconds(date_time: &CivilDateTime) -> i64 {
    let days = days_from_civil(date_time.year, date_time.month, date_time.day);
    let local_as_utc = ((days * 24 + i64::from(date_time.hour)) * 60
        + i64::from(date_time.minute))
        * 60
        + i64::from(date_time.second);

    // A positive differential means local time runs ahead of UT, so the true
    // instant lies behind the local reading.
    local_as_utc - i64::from(date_time.offset_minutes) * 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn civil(year: i32, month: i32, day: i32) -> CivilDateTime {
        CivilDateTime {
            day,
            month,
            year,
            ..CivilDateTime::default()
        }
    }

    // -----------------------
    // Leap years
    // -----------------------

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1600));
        assert!(!is_leap_year(2019));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
    }

    // -----------------------
    // Date validity
    // -----------------------

    #[test]
    fn february_day_limits_follow_leap_years() {
        assert!(is_valid_date(&civil(2020, 2, 29)));
        assert!(!is_valid_date(&civil(2019, 2, 29)));

        // Day 28 is fine in every February.
        assert!(is_valid_date(&civil(2019, 2, 28)));
        assert!(is_valid_date(&civil(2020, 2, 28)));

        // Day 30 never exists in February.
        assert!(!is_valid_date(&civil(2020, 2, 30)));
    }

    #[test]
    fn day_31_only_in_long_months() {
        for month in [1, 3, 5, 7, 8, 10, 12] {
            assert!(is_valid_date(&civil(2021, month, 31)), "month {month}");
        }
        for month in [2, 4, 6, 9, 11] {
            assert!(!is_valid_date(&civil(2021, month, 31)), "month {month}");
        }

        // Day 30 is valid in the short months other than February.
        for month in [4, 6, 9, 11] {
            assert!(is_valid_date(&civil(2021, month, 30)), "month {month}");
        }
    }

    #[test]
    fn out_of_bounds_fields_rejected() {
        assert!(!is_valid_date(&civil(2021, 0, 10)));
        assert!(!is_valid_date(&civil(2021, 13, 10)));
        assert!(!is_valid_date(&civil(2021, 6, 0)));
        assert!(!is_valid_date(&civil(2021, 6, 32)));
    }

    #[test]
    fn time_bounds() {
        let mut date_time = CivilDateTime::default();
        assert!(is_valid_time(&date_time));

        date_time.hour = 23;
        date_time.minute = 59;
        date_time.second = 59;
        assert!(is_valid_time(&date_time));

        assert!(!is_valid_time(&CivilDateTime {
            hour: 24,
            ..CivilDateTime::default()
        }));
        assert!(!is_valid_time(&CivilDateTime {
            minute: 60,
            ..CivilDateTime::default()
        }));
        assert!(!is_valid_time(&CivilDateTime {
            second: 60,
            ..CivilDateTime::default()
        }));
        assert!(!is_valid_time(&CivilDateTime {
            hour: -1,
            ..CivilDateTime::default()
        }));
    }

    // -----------------------
    // Day counting
    // -----------------------

    #[test]
    fn day_counting_known_values() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(1969, 12, 31), -1);
        assert_eq!(days_from_civil(2000, 1, 1), 10957);
        assert_eq!(days_from_civil(2000, 3, 1), 11017);
        assert_eq!(days_from_civil(2020, 2, 29), 18321);
    }

    #[test]
    fn day_counting_handles_negative_eras() {
        // 1600-03-01 is exactly one 400-year era (146097 days) before
        // 2000-03-01; 1900 sits on a skipped century leap day.
        assert_eq!(days_from_civil(1600, 3, 1), 11017 - 146097);
        assert_eq!(days_from_civil(1900, 3, 1), -25508);
    }

    // -----------------------
    // Instant conversion
    // -----------------------

    #[test]
    fn instant_for_utc_labelled_time() {
        let date_time = CivilDateTime {
            day: 29,
            month: 2,
            year: 2020,
            ..CivilDateTime::default()
        };
        assert_eq!(civil_to_unix_seconds(&date_time), 1_582_934_400);
    }

    #[test]
    fn differential_shifts_the_instant() {
        let date_time = CivilDateTime {
            day: 23,
            month: 11,
            year: 2020,
            hour: 9,
            minute: 34,
            second: 3,
            offset_minutes: -300,
        };
        // 09:34:03 at UT-5 is 14:34:03 UTC.
        assert_eq!(civil_to_unix_seconds(&date_time), 1_606_142_043);

        let ahead = CivilDateTime {
            offset_minutes: 750,
            ..date_time
        };
        // A positive differential moves the instant the other way.
        assert_eq!(
            civil_to_unix_seconds(&ahead),
            1_606_142_043 - (750 + 300) * 60
        );
    }
}
