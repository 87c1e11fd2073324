//! Service-day time handling for timetable data.
//!
//! Timetables give times as "HH:MM:SS" strings relative to the service day,
//! with hours of 24 and above for trips that run past midnight. Connections
//! store the folded time of day; planners re-anchor it onto a calendar date
//! at search time, so crossing midnight is date arithmetic rather than data.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// Highest hour value accepted in a timetable string (three hours past the
/// end of the nominal service day).
pub const MAX_SERVICE_HOUR: u32 = 27;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day in the corrected domain 00:00:00–23:59:59.
///
/// Built from a timetable string by folding hours 24–27 onto 00–03. The
/// folded value carries no day offset; see [`TransitTime::next_on_or_after`]
/// for how planners recover it.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::ServiceTime;
///
/// let t = ServiceTime::parse("25:05:00").unwrap();
/// assert_eq!(t.to_string(), "01:05:00");
///
/// assert!(ServiceTime::parse("28:00:00").is_err());
/// assert!(ServiceTime::parse("8:3:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceTime(NaiveTime);

impl ServiceTime {
    /// Parse a timetable time, folding overflow hours onto the next day.
    ///
    /// Accepts `H:MM:SS` or `HH:MM:SS`. Hours 24, 25, 26 and 27 become 00,
    /// 01, 02 and 03. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (hour, minute, second) = split_hms(s.trim())?;
        if hour > MAX_SERVICE_HOUR {
            return Err(TimeError::new("hour must be 0-27"));
        }
        Self::from_hms(hour % 24, minute, second).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`.
    ///
    /// Unlike [`ServiceTime::parse`] this does not accept overflow hours.
    pub fn parse_clock(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        let (hour, minute, second) = match s.matches(':').count() {
            1 => {
                let (h, m) = s
                    .split_once(':')
                    .ok_or_else(|| TimeError::new("expected HH:MM"))?;
                (parse_hour(h)?, parse_two_digits(m)?, 0)
            }
            2 => split_hms(s)?,
            _ => return Err(TimeError::new("expected HH:MM or HH:MM:SS")),
        };
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        Self::from_hms(hour, minute, second).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Create from components already in the corrected domain.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    /// Returns the underlying time of day.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Place this time of day on a calendar date.
    pub fn on(&self, date: NaiveDate) -> TransitTime {
        TransitTime::new(date, self.0)
    }
}

impl From<NaiveTime> for ServiceTime {
    fn from(time: NaiveTime) -> Self {
        // Drop sub-second precision so stored times stay on whole seconds.
        Self(time.with_nanosecond(0).unwrap_or(time))
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// A date-aware point in time used during search.
///
/// Searches start on a service date and may run past midnight, so each
/// label carries both the date and the time of day.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::{ServiceTime, TransitTime};
/// use chrono::{Duration, NaiveDate};
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
/// let start = ServiceTime::parse("23:30:00").unwrap().on(date);
///
/// let later = start + Duration::hours(1);
/// assert_eq!(later.to_string(), "00:30");
/// assert_eq!(later.date(), NaiveDate::from_ymd_opt(2024, 12, 17).unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl TransitTime {
    /// Create a new TransitTime from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> chrono::NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Add a duration, advancing the date when crossing midnight.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_add_signed(duration)?;
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// Subtract a duration from this time.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_sub_signed(duration)?;
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }

    /// Anchor a folded time of day onto this time's date.
    pub fn anchor(&self, time: ServiceTime) -> Self {
        time.on(self.date)
    }

    /// The first occurrence of `time` at or after `self`.
    ///
    /// Anchors onto the same date, rolling forward one day if that would be
    /// earlier than `self`.
    ///
    /// ```
    /// use transit_planner::domain::{ServiceTime, TransitTime};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
    /// let now = ServiceTime::parse("23:50:00").unwrap().on(date);
    ///
    /// let after_midnight = now.next_on_or_after(ServiceTime::parse("24:10:00").unwrap());
    /// assert_eq!(after_midnight.date(), NaiveDate::from_ymd_opt(2024, 12, 17).unwrap());
    /// ```
    pub fn next_on_or_after(&self, time: ServiceTime) -> Self {
        let anchored = self.anchor(time);
        if anchored < *self {
            anchored.checked_add(Duration::days(1)).unwrap_or(anchored)
        } else {
            anchored
        }
    }
}

impl Add<Duration> for TransitTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs).expect("time overflow")
    }
}

impl Ord for TransitTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl PartialOrd for TransitTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransitTime({} {:02}:{:02}:{:02})",
            self.date,
            self.hour(),
            self.minute(),
            self.time.second()
        )
    }
}

impl fmt::Display for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Split `H:MM:SS` / `HH:MM:SS` into numeric components.
fn split_hms(s: &str) -> Result<(u32, u32, u32), TimeError> {
    let mut parts = s.split(':');
    let (Some(h), Some(m), Some(sec), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TimeError::new("expected HH:MM:SS format"));
    };

    let hour = parse_hour(h)?;
    let minute = parse_two_digits(m)?;
    let second = parse_two_digits(sec)?;

    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }
    if second > 59 {
        return Err(TimeError::new("second must be 0-59"));
    }

    Ok((hour, minute, second))
}

fn parse_hour(s: &str) -> Result<u32, TimeError> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new("invalid hour digits"));
    }
    s.parse()
        .map_err(|_| TimeError::new("invalid hour digits"))
}

/// Parse exactly two ASCII digits into a u32.
fn parse_two_digits(s: &str) -> Result<u32, TimeError> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(TimeError::new("expected two digits"));
    }
    let d1 = (bytes[0] as char)
        .to_digit(10)
        .ok_or_else(|| TimeError::new("invalid digit"))?;
    let d2 = (bytes[1] as char)
        .to_digit(10)
        .ok_or_else(|| TimeError::new("invalid digit"))?;
    Ok(d1 * 10 + d2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_date()(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28
        ) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
    }

    proptest! {
        /// Any folded time is always a valid time of day
        #[test]
        fn folded_times_stay_in_domain(hour in 0u32..=27, minute in 0u32..60, second in 0u32..60) {
            let s = format!("{:02}:{:02}:{:02}", hour, minute, second);
            let t = ServiceTime::parse(&s).unwrap();
            prop_assert!(t.time().hour() < 24);
            prop_assert_eq!(t.time().hour(), hour % 24);
            prop_assert_eq!(t.time().minute(), minute);
            prop_assert_eq!(t.time().second(), second);
        }

        /// Hours past the overflow limit never parse
        #[test]
        fn hours_past_limit_rejected(hour in 28u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}:00", hour, minute);
            prop_assert!(ServiceTime::parse(&s).is_err());
        }

        /// In-domain strings round-trip through Display
        #[test]
        fn display_roundtrip(hour in 0u32..24, minute in 0u32..60, second in 0u32..60) {
            let s = format!("{:02}:{:02}:{:02}", hour, minute, second);
            prop_assert_eq!(ServiceTime::parse(&s).unwrap().to_string(), s);
        }

        /// Rolling forward never goes backwards and never skips more than a day
        #[test]
        fn next_on_or_after_is_within_a_day(
            date in valid_date(),
            now_secs in 0u32..86_400,
            target_secs in 0u32..86_400,
        ) {
            let now = TransitTime::new(
                date,
                NaiveTime::from_num_seconds_from_midnight_opt(now_secs, 0).unwrap(),
            );
            let target = ServiceTime::from(
                NaiveTime::from_num_seconds_from_midnight_opt(target_secs, 0).unwrap(),
            );
            let next = now.next_on_or_after(target);
            prop_assert!(next >= now);
            prop_assert!(next.signed_duration_since(now) < Duration::days(1));
            prop_assert_eq!(next.time(), target.time());
        }

        /// Adding then subtracting a duration returns the original time
        #[test]
        fn add_sub_identity(date in valid_date(), secs in 0u32..86_400, mins in 0i64..10_000) {
            let t = TransitTime::new(date, NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap());
            let d = Duration::minutes(mins);
            prop_assert_eq!(t.checked_add(d).unwrap().checked_sub(d).unwrap(), t);
        }
    }
}
