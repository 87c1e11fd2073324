//! Time-respecting label search.
//!
//! Both the primary and the extended planner explore `(stop, trip)` states
//! in order of arrival time. They share the edge rules and differ in their
//! limits and in when they stop:
//!
//! - [`TimedPlanner`] drains the queue and keeps the earliest accepted
//!   arrival, subject to a transfer cap, a duration cap and a boarding window.
//! - [`ExtendedPlanner`] returns the first completion it dequeues, with a
//!   wider horizon, more transfers and no boarding window.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use chrono::Duration;
use tracing::{debug, trace};

use crate::domain::{Connection, Itinerary, Leg, StopId, TransitTime, TripId};
use crate::graph::TransitGraph;

use super::config::{ExtendedConfig, TimedConfig};
use super::search::{PlanRequest, Planner, SearchError, Strategy};

/// Bounds applied to one label search.
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_transfers: usize,
    min_transfer: Duration,
    /// No label may arrive after this.
    deadline: TransitTime,
    /// The first boarding must depart no later than this.
    boarding_deadline: Option<TransitTime>,
    /// Stop at the first completion instead of draining the queue.
    first_completion_wins: bool,
}

/// A search state: at `stop` at `time`, last riding `trip`.
#[derive(Debug, Clone)]
struct Label {
    stop: StopId,
    trip: Option<TripId>,
    time: TransitTime,
    transfers: usize,
    path: Vec<Leg>,
}

/// Min-heap entry ordered by arrival, then insertion order.
#[derive(Debug)]
struct QueueEntry {
    time: TransitTime,
    seq: u64,
    label: Label,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Anchor a connection onto the day of `now`.
///
/// Returns `None` if the connection cannot be caught from `now`.
fn anchor(now: TransitTime, conn: &Connection) -> Option<(TransitTime, TransitTime)> {
    let mut departure = now.anchor(conn.departure);
    let mut arrival = now.anchor(conn.arrival);
    if departure < now {
        departure = departure.checked_add(Duration::days(1))?;
        arrival = arrival.checked_add(Duration::days(1))?;
    }
    if departure < now {
        return None;
    }
    if arrival < departure {
        arrival = arrival.checked_add(Duration::days(1))?;
    }
    Some((departure, arrival))
}

fn out_of_range(setting: &str, mins: i64) -> SearchError {
    SearchError::InvalidRequest(format!("{setting} of {mins} minutes is out of range"))
}

/// A configured number of minutes as a duration.
fn minutes(setting: &str, mins: i64) -> Result<Duration, SearchError> {
    Duration::try_minutes(mins).ok_or_else(|| out_of_range(setting, mins))
}

/// `start` shifted by a configured number of minutes.
fn offset(start: TransitTime, setting: &str, mins: i64) -> Result<TransitTime, SearchError> {
    start
        .checked_add(minutes(setting, mins)?)
        .ok_or_else(|| out_of_range(setting, mins))
}

/// Counters for one search, logged when it finishes.
#[derive(Debug, Default)]
struct SearchStats {
    expanded: usize,
    pushed: usize,
    completions: usize,
}

fn label_search(
    graph: &TransitGraph,
    request: &PlanRequest,
    limits: Limits,
) -> Result<Option<Itinerary>, SearchError> {
    request.validate(graph)?;

    let destination = &request.destination;
    let mut best_arrival: HashMap<(StopId, Option<TripId>), TransitTime> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    let mut stats = SearchStats::default();
    let mut best: Option<(TransitTime, Vec<Leg>)> = None;

    best_arrival.insert((request.origin.clone(), None), request.start);
    heap.push(QueueEntry {
        time: request.start,
        seq,
        label: Label {
            stop: request.origin.clone(),
            trip: None,
            time: request.start,
            transfers: 0,
            path: Vec::new(),
        },
    });

    while let Some(QueueEntry { label, .. }) = heap.pop() {
        if best.as_ref().is_some_and(|(time, _)| label.time >= *time) {
            continue;
        }

        if &label.stop == destination {
            // Every pushed label already satisfies the acceptance rules
            stats.completions += 1;
            trace!(arrival = %label.time, legs = label.path.len(), "completion");
            best = Some((label.time, label.path));
            if limits.first_completion_wins {
                break;
            }
            continue;
        }

        stats.expanded += 1;

        for conn in graph.outgoing(&label.stop) {
            let Some((departure, arrival)) = anchor(label.time, conn) else {
                continue;
            };

            let transfer = label.trip.as_ref().is_some_and(|t| t != &conn.trip_id);
            if transfer
                && label
                    .time
                    .checked_add(limits.min_transfer)
                    .is_none_or(|ready| departure < ready)
            {
                continue;
            }

            let transfers = label.transfers + usize::from(transfer);
            if transfers > limits.max_transfers || arrival > limits.deadline {
                continue;
            }

            if label.path.is_empty()
                && limits
                    .boarding_deadline
                    .is_some_and(|latest| departure > latest)
            {
                continue;
            }

            // Completions are never expanded, so the destination can only be
            // reached as the final stop of a path.
            if best.as_ref().is_some_and(|(time, _)| arrival >= *time) {
                continue;
            }

            let key = (conn.to.clone(), Some(conn.trip_id.clone()));
            if best_arrival.get(&key).is_some_and(|t| *t <= arrival) {
                continue;
            }

            let Ok(leg) = Leg::new(conn, departure, arrival, transfer) else {
                continue;
            };
            best_arrival.insert(key, arrival);

            let mut path = label.path.clone();
            path.push(leg);

            seq += 1;
            stats.pushed += 1;
            heap.push(QueueEntry {
                time: arrival,
                seq,
                label: Label {
                    stop: conn.to.clone(),
                    trip: Some(conn.trip_id.clone()),
                    time: arrival,
                    transfers,
                    path,
                },
            });
        }
    }

    debug!(
        origin = %request.origin,
        destination = %request.destination,
        start = ?request.start,
        expanded = stats.expanded,
        pushed = stats.pushed,
        completions = stats.completions,
        found = best.is_some(),
        "label search finished"
    );

    Ok(best.and_then(|(_, legs)| Itinerary::new(legs).ok()))
}

/// Earliest-arrival planner with tight limits.
#[derive(Debug, Clone, Default)]
pub struct TimedPlanner {
    config: TimedConfig,
}

impl TimedPlanner {
    pub fn new(config: TimedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimedConfig {
        &self.config
    }
}

impl Planner for TimedPlanner {
    fn strategy(&self) -> Strategy {
        Strategy::Primary
    }

    fn plan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<Itinerary>, SearchError> {
        let config = &self.config;
        let limits = Limits {
            max_transfers: config.max_transfers,
            min_transfer: minutes("minimum transfer", config.min_transfer_mins)?,
            deadline: offset(request.start, "maximum duration", config.max_duration_mins)?,
            boarding_deadline: Some(offset(
                request.start,
                "boarding window",
                config.boarding_window_mins,
            )?),
            first_completion_wins: false,
        };
        label_search(graph, request, limits)
    }
}

/// Wider-recall fallback: first arrival within an eight hour horizon.
#[derive(Debug, Clone, Default)]
pub struct ExtendedPlanner {
    config: ExtendedConfig,
}

impl ExtendedPlanner {
    pub fn new(config: ExtendedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtendedConfig {
        &self.config
    }
}

impl Planner for ExtendedPlanner {
    fn strategy(&self) -> Strategy {
        Strategy::Extended
    }

    fn plan(
        &self,
        graph: &TransitGraph,
        request: &PlanRequest,
    ) -> Result<Option<Itinerary>, SearchError> {
        let config = &self.config;
        let limits = Limits {
            max_transfers: config.max_transfers,
            min_transfer: minutes("minimum transfer", config.min_transfer_mins)?,
            deadline: offset(request.start, "horizon", config.horizon_mins)?,
            boarding_deadline: None,
            first_completion_wins: true,
        };
        label_search(graph, request, limits)
    }
}

#[cfg(test)]
#[path = "timed_tests.rs"]
mod tests;
