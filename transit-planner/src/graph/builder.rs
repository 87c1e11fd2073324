//! Builds a [`TransitGraph`] from a feed for one service date and mode.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{Connection, ServiceTime, Stop, StopId, TripId};
use crate::feed::{FeedSnapshot, RouteRecord, StopTimeRecord, TripRecord};

use super::calendar::{CalendarPolicy, valid_service_ids};
use super::{BuildError, ModeFilter, TransitGraph};

/// Counters describing one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Service ids running on the date
    pub services: usize,
    /// Trips that contributed rows
    pub trips_kept: usize,
    /// Trips whose first or last stop is outside the network
    pub trips_outside_network: usize,
    /// Rows dropped for an unparsable time
    pub rows_bad_time: usize,
    /// Rows dropped for a non-numeric stop sequence
    pub rows_bad_sequence: usize,
    /// Hops skipped because an intermediate stop is unknown
    pub hops_unknown_stop: usize,
    /// Connections emitted
    pub edges: usize,
}

/// One stop-time row joined with its trip and route, times folded.
#[derive(Debug)]
struct TimedRow<'a> {
    sequence: u32,
    stop_id: &'a str,
    arrival: Option<ServiceTime>,
    departure: Option<ServiceTime>,
    headsign: Option<&'a str>,
}

/// Builds graphs for a single service date and mode filter.
///
/// # Example
///
/// ```
/// use transit_planner::feed::FeedBuilder;
/// use transit_planner::graph::{GraphBuilder, ModeFilter};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
/// let feed = FeedBuilder::new()
///     .stop("A", "Alpha")
///     .stop("B", "Beta")
///     .route("R1", Some("S1"), None, 2)
///     .trip("T1", "R1", "WD", None)
///     .stop_time("T1", "A", "08:00:00", "08:00:00", "1")
///     .stop_time("T1", "B", "08:10:00", "08:10:00", "2")
///     .daily_service("WD", date, date)
///     .build();
///
/// let graph = GraphBuilder::new(date, ModeFilter::RailOnly).build(&feed);
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    date: NaiveDate,
    mode: ModeFilter,
    calendar_policy: CalendarPolicy,
}

impl GraphBuilder {
    /// Create a builder for `date` and `mode`, ignoring calendar exceptions.
    pub fn new(date: NaiveDate, mode: ModeFilter) -> Self {
        Self {
            date,
            mode,
            calendar_policy: CalendarPolicy::default(),
        }
    }

    /// Choose whether calendar exceptions are applied.
    pub fn with_calendar_policy(mut self, policy: CalendarPolicy) -> Self {
        self.calendar_policy = policy;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn mode(&self) -> ModeFilter {
        self.mode
    }

    /// Build the graph, returning an empty graph for an incomplete feed.
    ///
    /// Callers that need to tell an incomplete feed apart from a network
    /// without service should use [`GraphBuilder::try_build`].
    pub fn build(&self, feed: &FeedSnapshot) -> TransitGraph {
        match self.try_build(feed) {
            Ok(graph) => graph,
            Err(e) => {
                warn!(error = %e, "returning empty graph");
                TransitGraph::empty()
            }
        }
    }

    /// Build the graph, failing if a required table is missing or empty.
    pub fn try_build(&self, feed: &FeedSnapshot) -> Result<TransitGraph, BuildError> {
        self.build_with_stats(feed).map(|(graph, _)| graph)
    }

    /// Build the graph and report what was kept and dropped.
    pub fn build_with_stats(
        &self,
        feed: &FeedSnapshot,
    ) -> Result<(TransitGraph, BuildStats), BuildError> {
        if let Some(table) = feed.first_empty_required() {
            return Err(BuildError::FeedIncomplete { table });
        }

        let mut stats = BuildStats::default();

        let stops: HashMap<StopId, Stop> = feed
            .domain_stops()
            .map(|stop| (stop.id.clone(), stop))
            .collect();
        let known_stops = feed.stop_ids();

        let services = valid_service_ids(feed, self.date, self.calendar_policy);
        stats.services = services.len();

        let routes: HashMap<&str, &RouteRecord> = feed
            .routes()
            .iter()
            .filter(|r| self.mode.admits(r.route_type))
            .map(|r| (r.route_id.as_str(), r))
            .collect();

        // Trips running on the date whose route passes the mode filter
        let trips: HashMap<&str, (&TripRecord, &RouteRecord)> = feed
            .trips()
            .iter()
            .filter(|t| services.contains(&t.service_id))
            .filter_map(|t| {
                let route = routes.get(t.route_id.as_str())?;
                Some((t.trip_id.as_str(), (t, *route)))
            })
            .collect();

        let mut rows_by_trip: HashMap<&str, Vec<&StopTimeRecord>> = HashMap::new();
        for row in feed.stop_times() {
            if trips.contains_key(row.trip_id.as_str()) {
                rows_by_trip.entry(row.trip_id.as_str()).or_default().push(row);
            }
        }

        debug!(
            date = %self.date,
            mode = self.mode.as_str(),
            services = stats.services,
            trips = rows_by_trip.len(),
            "filtered feed"
        );

        // Sort trip ids so adjacency lists come out in a stable order
        let mut trip_ids: Vec<&str> = rows_by_trip.keys().copied().collect();
        trip_ids.sort_unstable();

        let mut adjacency: HashMap<StopId, Vec<Connection>> = HashMap::new();

        for trip_id in trip_ids {
            let Some(raw_rows) = rows_by_trip.get(trip_id) else {
                continue;
            };
            let Some((trip, route)) = trips.get(trip_id) else {
                continue;
            };

            let mut rows: Vec<TimedRow<'_>> = Vec::with_capacity(raw_rows.len());
            for raw in raw_rows {
                match raw.stop_sequence.trim().parse::<u32>() {
                    Ok(sequence) => rows.push(TimedRow {
                        sequence,
                        stop_id: raw.stop_id.as_str(),
                        arrival: parse_time(raw.arrival_time.as_deref()),
                        departure: parse_time(raw.departure_time.as_deref()),
                        headsign: non_blank(raw.stop_headsign.as_deref()),
                    }),
                    Err(_) => stats.rows_bad_sequence += 1,
                }
            }
            rows.sort_by_key(|r| r.sequence);

            let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
                continue;
            };
            if !known_stops.contains(first.stop_id) || !known_stops.contains(last.stop_id) {
                stats.trips_outside_network += 1;
                continue;
            }

            let before = rows.len();
            rows.retain(|r| r.arrival.is_some() && r.departure.is_some());
            stats.rows_bad_time += before - rows.len();

            stats.trips_kept += 1;
            let route_name = non_blank(route.route_long_name.as_deref())
                .or_else(|| non_blank(route.route_short_name.as_deref()))
                .map(String::from);
            let trip_headsign = non_blank(trip.trip_headsign.as_deref());
            let trip_id = TripId::new(trip_id);

            for pair in rows.windows(2) {
                let (prev, curr) = (&pair[0], &pair[1]);
                if !known_stops.contains(prev.stop_id) || !known_stops.contains(curr.stop_id) {
                    stats.hops_unknown_stop += 1;
                    continue;
                }
                let (Some(departure), Some(arrival)) = (prev.departure, curr.arrival) else {
                    continue;
                };

                let from = StopId::from(prev.stop_id);
                adjacency.entry(from.clone()).or_default().push(Connection {
                    from,
                    to: StopId::from(curr.stop_id),
                    departure,
                    arrival,
                    trip_id: trip_id.clone(),
                    route_name: route_name.clone(),
                    direction: curr.headsign.or(trip_headsign).map(String::from),
                });
                stats.edges += 1;
            }
        }

        if stats.rows_bad_time > 0 || stats.rows_bad_sequence > 0 {
            warn!(
                bad_time = stats.rows_bad_time,
                bad_sequence = stats.rows_bad_sequence,
                "dropped unusable stop-time rows"
            );
        }

        let graph = TransitGraph::from_parts(stops, adjacency);
        info!(
            date = %self.date,
            mode = self.mode.as_str(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            trips = stats.trips_kept,
            trips_outside_network = stats.trips_outside_network,
            "transit graph built"
        );

        Ok((graph, stats))
    }
}

fn parse_time(raw: Option<&str>) -> Option<ServiceTime> {
    ServiceTime::parse(raw?).ok()
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
