//! # RFC 822 date-time parser
//!
//! This crate parses the date and time specification of RFC 822 §5.1 (the
//! format carried in `Date:` headers and RSS `pubDate` elements) into a
//! structured, comparable value. One extension is made to the grammar:
//! whereas RFC 822 calls for a two-digit year, four-digit years are also
//! accepted, as preferred by RSS feeds.
//!
//! The recognised shape is:
//!
//! ```text
//! [ day-of-week "," ] 1*2DIGIT month 2*4DIGIT  2DIGIT ":" 2DIGIT [":" 2DIGIT]  zone
//!
//! day-of-week = Mon / Tue / Wed / Thu / Fri / Sat / Sun
//! month       = Jan / Feb / Mar / Apr / May / Jun / Jul / Aug / Sep / Oct / Nov / Dec
//! zone        = UT / GMT                  ; Universal Time
//!             / EST / EDT / CST / CDT    ; North American zones
//!             / MST / MDT / PST / PDT
//!             / Z / A / M / N / Y        ; military single letters
//!             / ("+" / "-") 4DIGIT       ; local differential, HHMM
//! ```
//!
//! A successful parse yields a [`ParsedTimestamp`] holding the stamp exactly
//! as given, the matched substring for every grammatical field, the decoded
//! civil date/time in the stamp's own zone, and the computed UTC instant.
//! Two-digit years are assumed to lie in the 21st century. Stamps whose shape
//! matches but whose fields do not name a legal calendar date or time of day
//! (day 31 in April, hour 25, February 29 outside a leap year) are rejected
//! the same way as stamps that never matched: the result is simply absent.
//!
//! Parsed timestamps order and compare by their UTC instant alone, so two
//! stamps written in different zones compare equal when they denote the same
//! moment.
//!
//! ## Example
//!
//! ```rust
//! use rfc822_datetime::parse;
//!
//! let stamp = parse("Mon, 23 Nov 2020 09:34:03 -0500").expect("valid stamp");
//! assert_eq!(stamp.date_time.year, 2020);
//! assert_eq!(stamp.date_time.offset_minutes, -300);
//! assert_eq!(stamp.time.unix_seconds(), 1_606_142_043);
//!
//! assert!(parse("32 Jan 2020 10:00:00 GMT").is_none());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

mod calendar;

/// Month abbreviations; position + 1 gives the month number.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Differentials from UT in minutes for the named zones. `UT`, `GMT` and the
/// military `Z` all read as zero.
static NAMED_ZONE_MINUTES: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    HashMap::from([
        ("UT", 0),
        ("GMT", 0),
        ("Z", 0),
        ("EST", -5 * 60),
        ("EDT", -4 * 60),
        ("CST", -6 * 60),
        ("CDT", -5 * 60),
        ("MST", -7 * 60),
        ("MDT", -6 * 60),
        ("PST", -8 * 60),
        ("PDT", -7 * 60),
        ("A", -60),
        ("M", -12 * 60),
        ("N", 60),
        ("Y", 12 * 60),
    ])
});

/// The full extended grammar as one anchored pattern. It checks shape only;
/// field values are range-checked separately, after decoding.
static DATE_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<dow>(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun),)?\s*",
        r"(?P<day>\d{1,2})\s+",
        r"(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+",
        r"(?P<year>\d{2,4})\s+",
        r"(?P<hour>\d{2}):(?P<minute>\d{2})(?P<second>:\d{2})?\s+",
        r"(?P<zone>UT|GMT|EST|EDT|CST|CDT|MST|MDT|PST|PDT|Z|A|M|N|Y|[+-]\d{4})$",
    ))
    .expect("date-time pattern must compile")
});

/// An absolute point on the UTC timeline, as seconds since
/// 1970-01-01T00:00:00Z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcInstant(i64);

impl UtcInstant {
    pub fn from_unix_seconds(seconds: i64) -> Self {
        UtcInstant(seconds)
    }

    pub fn unix_seconds(self) -> i64 {
        self.0
    }
}

/// The exact substrings matched for each grammatical field. These are audit
/// data: the textual form survives independent of its decoded interpretation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens {
    /// `Mon`, `Tue`, ... without the trailing comma; empty when absent.
    pub day_of_week: String,
    /// 1 or 2 digits.
    pub day: String,
    /// Three-letter abbreviation, `Jan` through `Dec`.
    pub month: String,
    /// 2 or 4 digits.
    pub year: String,
    pub hour: String,
    pub minute: String,
    /// Digits only, without the leading colon; empty when absent.
    pub second: String,
    /// A named zone such as `PST`, or a signed differential such as `-0500`.
    pub time_zone: String,
}

/// The date and time as written, in the stamp's own zone. These fields are
/// never adjusted by the differential; only [`ParsedTimestamp::time`]
/// reflects UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CivilDateTime {
    /// Day of month, [1, 31] depending on the month.
    pub day: i32,
    /// Month of year, [1, 12].
    pub month: i32,
    /// Absolute year; two-digit input years are mapped into [2000, 2099].
    pub year: i32,
    /// Hour, [0, 23].
    pub hour: i32,
    /// Minute, [0, 59].
    pub minute: i32,
    /// Second, [0, 59].
    pub second: i32,
    /// Signed differential from UT in minutes: `EST` = -300, `+1230` = 750.
    pub offset_minutes: i32,
}

impl Default for CivilDateTime {
    fn default() -> Self {
        CivilDateTime {
            day: 1,
            month: 1,
            year: 1970,
            hour: 0,
            minute: 0,
            second: 0,
            offset_minutes: 0,
        }
    }
}

/// A successfully parsed RFC 822 date-time stamp.
///
/// Ordering and equality consider only the computed UTC instant, never the
/// original text or tokens, so stamps that denote the same moment in
/// different zones compare equal.
#[derive(Clone, Debug)]
pub struct ParsedTimestamp {
    /// The stamp exactly as passed to [`parse`], unaltered.
    pub stamp: String,
    /// The point in time the stamp denotes, in UTC.
    pub time: UtcInstant,
    /// The matched substring of every grammatical field.
    pub tokens: Tokens,
    /// The decoded civil date/time in the stamp's own zone.
    pub date_time: CivilDateTime,
}

impl PartialEq for ParsedTimestamp {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl Eq for ParsedTimestamp {}

impl PartialOrd for ParsedTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

/// Why a stamp was rejected. The public API deliberately collapses both kinds
/// into an absent result; callers are not told whether shape or values failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseFailure {
    NoMatch,
    InvalidCalendarValue,
}

/// Parse an RFC 822 date-time stamp.
///
/// Returns `None` when the stamp does not match the grammar, or when its
/// decoded fields do not name a legal calendar date and time of day.
pub fn parse(stamp: &str) -> Option<ParsedTimestamp> {
    try_parse(stamp).ok()
}

fn try_parse(stamp: &str) -> Result<ParsedTimestamp, ParseFailure> {
    let caps = DATE_TIME_PATTERN
        .captures(stamp)
        .ok_or(ParseFailure::NoMatch)?;
    let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

    let tokens = Tokens {
        day_of_week: group("dow").trim_end_matches(',').to_string(),
        day: group("day").to_string(),
        month: group("month").to_string(),
        year: group("year").to_string(),
        hour: group("hour").to_string(),
        minute: group("minute").to_string(),
        second: group("second").trim_start_matches(':').to_string(),
        time_zone: group("zone").to_string(),
    };

    let mut date_time = CivilDateTime {
        day: decode_digits(&tokens.day),
        month: month_number(&tokens.month),
        year: decode_digits(&tokens.year),
        hour: decode_digits(&tokens.hour),
        minute: decode_digits(&tokens.minute),
        second: if tokens.second.is_empty() {
            0
        } else {
            decode_digits(&tokens.second)
        },
        offset_minutes: zone_minutes(&tokens.time_zone),
    };

    // Two-digit years are assumed to lie in the 21st century.
    if date_time.year < 100 {
        date_time.year += 2000;
    }

    if !calendar::is_valid_date(&date_time) || !calendar::is_valid_time(&date_time) {
        return Err(ParseFailure::InvalidCalendarValue);
    }

    let time = UtcInstant::from_unix_seconds(calendar::civil_to_unix_seconds(&date_time));

    Ok(ParsedTimestamp {
        stamp: stamp.to_string(),
        time,
        tokens,
        date_time,
    })
}

/// Decode a digit string the grammar matched. The pattern guarantees the
/// parse cannot fail; zero keeps the fallback in line with the other
/// decoders, and zero never survives range validation where it matters.
fn decode_digits(digits: &str) -> i32 {
    digits.parse().unwrap_or(0)
}

/// Month number for a three-letter abbreviation. Anything else maps to the
/// 0 sentinel, which calendar validation always rejects.
fn month_number(month: &str) -> i32 {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|&abbreviation| abbreviation == month)
        .map_or(0, |index| index as i32 + 1)
}

/// Differential from UT in minutes for a matched time-zone field.
fn zone_minutes(zone: &str) -> i32 {
    if zone.starts_with('+') || zone.starts_with('-') {
        return local_differential_minutes(zone);
    }

    // Unrecognised names cannot get past the grammar; zero is a deliberate
    // fallback here, not a validated default.
    NAMED_ZONE_MINUTES.get(zone).copied().unwrap_or(0)
}

/// Decompose a signed `HHMM` differential into minutes. The sign applies to
/// the whole field: `-0530` is -(5h 30m) = -330 minutes.
fn local_differential_minutes(differential: &str) -> i32 {
    let value: i32 = differential.parse().unwrap_or(0);
    let hours = value / 100;
    let minutes = value % 100;
    hours * 60 + minutes
}
