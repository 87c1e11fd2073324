//! Plain-text rendering of itineraries.

use std::fmt;

use chrono::Duration;

use crate::domain::{Itinerary, Leg, TransitTime};
use crate::graph::TransitGraph;

/// Format a travel time as `"1h 5min"`, or `"45min"` under an hour.
pub fn format_travel_time(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes}min")
    }
}

/// Format `arrival` as `HH:MM`, with a hint when it falls on a later date
/// than `departure`.
pub fn format_arrival(departure: TransitTime, arrival: TransitTime) -> String {
    let days = (arrival.date() - departure.date()).num_days();
    match days {
        d if d <= 0 => arrival.to_string(),
        1 => format!("{arrival} (+1 day)"),
        d => format!("{arrival} (+{d} days)"),
    }
}

/// Split legs into runs of consecutive legs on the same trip.
fn rides(legs: &[Leg]) -> Vec<&[Leg]> {
    legs.chunk_by(|a, b| a.trip_id() == b.trip_id()).collect()
}

/// An itinerary rendered for a rider, with stop names from a graph.
///
/// Each ride lists its boarding stop with route and direction, the
/// intermediate stops, and the alighting stop. Rides are separated by a
/// change marker, and the report ends with the total travel time.
pub struct ItineraryReport<'a> {
    itinerary: &'a Itinerary,
    graph: &'a TransitGraph,
}

impl<'a> ItineraryReport<'a> {
    pub fn new(itinerary: &'a Itinerary, graph: &'a TransitGraph) -> Self {
        Self { itinerary, graph }
    }

    /// The report, one line per entry.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Route found:".to_string()];
        let mut step = 0;

        for (i, ride) in rides(self.itinerary.legs()).into_iter().enumerate() {
            let (Some(first), Some(last)) = (ride.first(), ride.last()) else {
                continue;
            };
            if i > 0 {
                lines.push("--> CHANGE <--".to_string());
            }

            step += 1;
            lines.push(format!(
                "{step:02}. Depart {} {}, {} towards {}",
                first.departure_time(),
                self.graph.stop_name(first.from_stop()),
                first.route_label(),
                first.direction_label(),
            ));

            for leg in &ride[..ride.len() - 1] {
                step += 1;
                lines.push(format!(
                    "{step:02}. Via {} {}",
                    leg.arrival_time(),
                    self.graph.stop_name(leg.to_stop()),
                ));
            }

            lines.push(format!(
                "    Arrive {} {}",
                format_arrival(first.departure_time(), last.arrival_time()),
                self.graph.stop_name(last.to_stop()),
            ));
        }

        let departure = self.itinerary.departure_time();
        lines.push(format!(
            "Travel time: {} ({} -> {})",
            format_travel_time(self.itinerary.total_duration()),
            departure,
            format_arrival(departure, self.itinerary.arrival_time()),
        ));
        lines
    }
}

impl fmt::Display for ItineraryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
