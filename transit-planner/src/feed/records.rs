//! Raw feed rows.
//!
//! One struct per timetable table, deserialised straight from the CSV files.
//! Time strings and stop sequences stay textual here: the graph builder owns
//! their validation so that one bad row is dropped instead of the whole feed.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Route type codes admitted by the mode filters.
pub mod route_type {
    pub const TRAM: u16 = 0;
    pub const METRO: u16 = 1;
    pub const RAIL: u16 = 2;
    pub const BUS: u16 = 3;
}

/// A row of `stops.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: String,
    #[serde(default)]
    pub parent_station: Option<String>,
    #[serde(default)]
    pub stop_lat: Option<f64>,
    #[serde(default)]
    pub stop_lon: Option<f64>,
}

/// A row of `routes.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
    pub route_type: u16,
}

/// A row of `trips.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripRecord {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: Option<String>,
}

/// A row of `stop_times.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    pub stop_id: String,
    pub stop_sequence: String,
    #[serde(default)]
    pub stop_headsign: Option<String>,
}

/// A row of `calendar.txt`: the weekly pattern of one service id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    #[serde(with = "feed_date")]
    pub start_date: NaiveDate,
    #[serde(with = "feed_date")]
    pub end_date: NaiveDate,
}

impl CalendarRecord {
    /// Returns true if the weekday flag for `weekday` is set.
    pub fn runs_on_weekday(&self, weekday: Weekday) -> bool {
        let flag = match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        };
        flag == 1
    }

    /// Returns true if `date` falls on a flagged weekday within the
    /// inclusive validity window.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.runs_on_weekday(date.weekday()) && self.start_date <= date && date <= self.end_date
    }
}

/// Exception kinds in `calendar_dates.txt`.
pub mod exception_type {
    pub const ADDED: u8 = 1;
    pub const REMOVED: u8 = 2;
}

/// A row of `calendar_dates.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDateRecord {
    pub service_id: String,
    #[serde(with = "feed_date")]
    pub date: NaiveDate,
    pub exception_type: u8,
}

/// Serde helpers for 8-digit `YYYYMMDD` dates.
pub(crate) mod feed_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y%m%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(s.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
