//! Scheduled hop between two consecutive stops of a trip.

use serde::{Deserialize, Serialize};

use super::{ServiceTime, StopId, TripId};

/// A graph edge: one trip travelling from one stop to the next.
///
/// Several connections may link the same ordered pair of stops (one per
/// trip). Times are folded into the 00:00–23:59 domain; a hop whose arrival
/// is earlier than its departure runs across midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: StopId,
    pub to: StopId,
    pub departure: ServiceTime,
    pub arrival: ServiceTime,
    pub trip_id: TripId,
    /// Route long name, else short name
    pub route_name: Option<String>,
    /// Hop head-sign, else trip head-sign
    pub direction: Option<String>,
}

impl Connection {
    /// Returns true if the hop itself runs past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.arrival < self.departure
    }
}
