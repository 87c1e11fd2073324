//! Timetable feed snapshot.
//!
//! A [`FeedSnapshot`] is the already-parsed tabular feed: stops, routes,
//! trips, stop times and the service calendar. It is an immutable value
//! object passed explicitly to the graph builder and the stop resolver.
//! [`load_feed_dir`] reads one from a directory of CSV files, and
//! [`FeedBuilder`] assembles one in memory.

mod loader;
pub mod records;

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{Stop, StopId};

pub use loader::{FeedError, load_feed_dir};
pub use records::{
    CalendarDateRecord, CalendarRecord, RouteRecord, StopRecord, StopTimeRecord, TripRecord,
};

/// The tables of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedTable {
    Stops,
    Routes,
    Trips,
    StopTimes,
    Calendar,
    CalendarDates,
}

impl FeedTable {
    /// Tables the graph builder cannot work without.
    pub const REQUIRED: [FeedTable; 5] = [
        FeedTable::Stops,
        FeedTable::Routes,
        FeedTable::Trips,
        FeedTable::StopTimes,
        FeedTable::Calendar,
    ];

    /// File name of the table inside a feed directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            FeedTable::Stops => "stops.txt",
            FeedTable::Routes => "routes.txt",
            FeedTable::Trips => "trips.txt",
            FeedTable::StopTimes => "stop_times.txt",
            FeedTable::Calendar => "calendar.txt",
            FeedTable::CalendarDates => "calendar_dates.txt",
        }
    }
}

impl fmt::Display for FeedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// An immutable, already-parsed timetable feed.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    stops: Vec<StopRecord>,
    routes: Vec<RouteRecord>,
    trips: Vec<TripRecord>,
    stop_times: Vec<StopTimeRecord>,
    calendar: Vec<CalendarRecord>,
    calendar_dates: Vec<CalendarDateRecord>,
}

impl FeedSnapshot {
    /// Create a snapshot from its tables.
    pub fn new(
        stops: Vec<StopRecord>,
        routes: Vec<RouteRecord>,
        trips: Vec<TripRecord>,
        stop_times: Vec<StopTimeRecord>,
        calendar: Vec<CalendarRecord>,
        calendar_dates: Vec<CalendarDateRecord>,
    ) -> Self {
        Self {
            stops,
            routes,
            trips,
            stop_times,
            calendar,
            calendar_dates,
        }
    }

    pub fn stops(&self) -> &[StopRecord] {
        &self.stops
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn stop_times(&self) -> &[StopTimeRecord] {
        &self.stop_times
    }

    pub fn calendar(&self) -> &[CalendarRecord] {
        &self.calendar
    }

    /// Calendar exceptions. Loaded, but only consulted when the builder's
    /// calendar policy asks for them.
    pub fn calendar_dates(&self) -> &[CalendarDateRecord] {
        &self.calendar_dates
    }

    /// Number of rows in a table.
    pub fn row_count(&self, table: FeedTable) -> usize {
        match table {
            FeedTable::Stops => self.stops.len(),
            FeedTable::Routes => self.routes.len(),
            FeedTable::Trips => self.trips.len(),
            FeedTable::StopTimes => self.stop_times.len(),
            FeedTable::Calendar => self.calendar.len(),
            FeedTable::CalendarDates => self.calendar_dates.len(),
        }
    }

    /// The first required table that is empty, if any.
    pub fn first_empty_required(&self) -> Option<FeedTable> {
        FeedTable::REQUIRED
            .into_iter()
            .find(|table| self.row_count(*table) == 0)
    }

    /// The set of all stop ids in the feed.
    pub fn stop_ids(&self) -> HashSet<&str> {
        self.stops.iter().map(|s| s.stop_id.as_str()).collect()
    }

    /// Stops as domain values.
    pub fn domain_stops(&self) -> impl Iterator<Item = Stop> + '_ {
        self.stops.iter().map(|record| Stop {
            id: StopId::new(record.stop_id.clone()),
            name: record.stop_name.clone(),
            parent_station: record
                .parent_station
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(StopId::from),
            coordinates: record.stop_lat.zip(record.stop_lon),
        })
    }

    /// A content hash identifying this feed, used to key graph snapshots.
    ///
    /// The hash is `seahash` over the JSON form of every table, so it is
    /// stable across builds and platforms.
    pub fn fingerprint(&self) -> String {
        let tables = (
            &self.stops,
            &self.routes,
            &self.trips,
            &self.stop_times,
            &self.calendar,
            &self.calendar_dates,
        );
        let bytes = match serde_json::to_vec(&tables) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "feed tables not serialisable, fingerprint covers row counts only");
                Vec::new()
            }
        };
        format!(
            "{:016x}-{}-{}",
            seahash::hash(&bytes),
            self.stops.len(),
            self.stop_times.len()
        )
    }
}

/// Builder for assembling a feed in memory.
///
/// Provides a fluent API; mostly useful for tests and for callers that parse
/// feeds themselves.
///
/// # Example
///
/// ```
/// use transit_planner::feed::FeedBuilder;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
/// let feed = FeedBuilder::new()
///     .stop("A", "Alpha")
///     .stop("B", "Beta")
///     .route("R1", Some("S1"), None, 2)
///     .trip("T1", "R1", "WD", Some("Beta"))
///     .stop_time("T1", "A", "08:00:00", "08:00:00", "1")
///     .stop_time("T1", "B", "08:10:00", "08:10:00", "2")
///     .daily_service("WD", date, date)
///     .build();
///
/// assert_eq!(feed.stops().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct FeedBuilder {
    inner: FeedSnapshot,
}

impl FeedBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop without a parent station.
    pub fn stop(mut self, id: &str, name: &str) -> Self {
        self.inner.stops.push(StopRecord {
            stop_id: id.into(),
            stop_name: name.into(),
            parent_station: None,
            stop_lat: None,
            stop_lon: None,
        });
        self
    }

    /// Add a platform belonging to a parent station.
    pub fn platform(mut self, id: &str, name: &str, parent: &str) -> Self {
        self.inner.stops.push(StopRecord {
            stop_id: id.into(),
            stop_name: name.into(),
            parent_station: Some(parent.into()),
            stop_lat: None,
            stop_lon: None,
        });
        self
    }

    /// Add an arbitrary stop row.
    pub fn stop_record(mut self, record: StopRecord) -> Self {
        self.inner.stops.push(record);
        self
    }

    /// Add a route.
    pub fn route(
        mut self,
        id: &str,
        short_name: Option<&str>,
        long_name: Option<&str>,
        route_type: u16,
    ) -> Self {
        self.inner.routes.push(RouteRecord {
            route_id: id.into(),
            route_short_name: short_name.map(String::from),
            route_long_name: long_name.map(String::from),
            route_type,
        });
        self
    }

    /// Add a trip.
    pub fn trip(mut self, id: &str, route_id: &str, service_id: &str, headsign: Option<&str>) -> Self {
        self.inner.trips.push(TripRecord {
            route_id: route_id.into(),
            service_id: service_id.into(),
            trip_id: id.into(),
            trip_headsign: headsign.map(String::from),
        });
        self
    }

    /// Add a stop-time row.
    pub fn stop_time(
        mut self,
        trip_id: &str,
        stop_id: &str,
        arrival: &str,
        departure: &str,
        sequence: &str,
    ) -> Self {
        self.inner.stop_times.push(StopTimeRecord {
            trip_id: trip_id.into(),
            arrival_time: Some(arrival.into()),
            departure_time: Some(departure.into()),
            stop_id: stop_id.into(),
            stop_sequence: sequence.into(),
            stop_headsign: None,
        });
        self
    }

    /// Add an arbitrary stop-time row.
    pub fn stop_time_record(mut self, record: StopTimeRecord) -> Self {
        self.inner.stop_times.push(record);
        self
    }

    /// Add a calendar row.
    pub fn calendar(mut self, record: CalendarRecord) -> Self {
        self.inner.calendar.push(record);
        self
    }

    /// Add a service running every day between `start` and `end` inclusive.
    pub fn daily_service(self, service_id: &str, start: NaiveDate, end: NaiveDate) -> Self {
        self.calendar(CalendarRecord {
            service_id: service_id.into(),
            monday: 1,
            tuesday: 1,
            wednesday: 1,
            thursday: 1,
            friday: 1,
            saturday: 1,
            sunday: 1,
            start_date: start,
            end_date: end,
        })
    }

    /// Add a calendar exception.
    pub fn calendar_date(mut self, service_id: &str, date: NaiveDate, exception_type: u8) -> Self {
        self.inner.calendar_dates.push(CalendarDateRecord {
            service_id: service_id.into(),
            date,
            exception_type,
        });
        self
    }

    /// Build the feed snapshot.
    pub fn build(self) -> FeedSnapshot {
        self.inner
    }
}
