//! Itinerary leg type.
//!
//! A `Leg` is one scheduled hop between two consecutive stops of a trip,
//! with its departure and arrival anchored onto calendar dates.

use chrono::Duration;

use super::{Connection, DomainError, StopId, TransitTime, TripId};

/// Rider-facing text when a hop has no route name.
pub const UNKNOWN_ROUTE: &str = "Unbekannt";

/// Rider-facing text when a hop has no head-sign.
pub const UNKNOWN_DIRECTION: &str = "Fahrtrichtungsdaten konnten nicht geladen werden, bitte informieren Sie sich an den Aushangfahrplänen an den Haltestellen";

/// A leg of an itinerary (one hop on one trip).
///
/// # Invariants
///
/// - `arrival >= departure`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    from: StopId,
    to: StopId,
    route_name: Option<String>,
    direction: Option<String>,
    trip_id: TripId,
    departure: TransitTime,
    arrival: TransitTime,
    transfer: bool,
}

impl Leg {
    /// Construct a leg for a connection at anchored times.
    ///
    /// `transfer` is true when this leg boards a different trip than the
    /// previous leg of the itinerary.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `arrival` is before `departure`.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::{Connection, Leg, ServiceTime, StopId, TripId};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
    /// let connection = Connection {
    ///     from: StopId::from("A"),
    ///     to: StopId::from("B"),
    ///     departure: ServiceTime::parse("08:00:00").unwrap(),
    ///     arrival: ServiceTime::parse("08:10:00").unwrap(),
    ///     trip_id: TripId::from("T1"),
    ///     route_name: Some("S1".into()),
    ///     direction: None,
    /// };
    ///
    /// let leg = Leg::new(
    ///     &connection,
    ///     connection.departure.on(date),
    ///     connection.arrival.on(date),
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(leg.departure_time().to_string(), "08:00");
    /// assert_eq!(leg.arrival_time().to_string(), "08:10");
    /// assert_eq!(leg.route_label(), "S1");
    /// ```
    pub fn new(
        connection: &Connection,
        departure: TransitTime,
        arrival: TransitTime,
        transfer: bool,
    ) -> Result<Self, DomainError> {
        if arrival < departure {
            return Err(DomainError::InvalidLeg("arrival must not precede departure"));
        }

        Ok(Leg {
            from: connection.from.clone(),
            to: connection.to.clone(),
            route_name: connection.route_name.clone(),
            direction: connection.direction.clone(),
            trip_id: connection.trip_id.clone(),
            departure,
            arrival,
            transfer,
        })
    }

    /// Returns the boarding stop.
    pub fn from_stop(&self) -> &StopId {
        &self.from
    }

    /// Returns the alighting stop.
    pub fn to_stop(&self) -> &StopId {
        &self.to
    }

    /// Returns the trip this leg rides.
    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    /// Returns the route name, if the feed provided one.
    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    /// Returns the head-sign, if the feed provided one.
    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    /// Route name for display, with a placeholder when missing.
    pub fn route_label(&self) -> &str {
        self.route_name().unwrap_or(UNKNOWN_ROUTE)
    }

    /// Head-sign for display, with a placeholder when missing.
    pub fn direction_label(&self) -> &str {
        self.direction().unwrap_or(UNKNOWN_DIRECTION)
    }

    /// Returns the departure time.
    pub fn departure_time(&self) -> TransitTime {
        self.departure
    }

    /// Returns the arrival time.
    pub fn arrival_time(&self) -> TransitTime {
        self.arrival
    }

    /// Returns true if boarding this leg changes trip.
    pub fn is_transfer(&self) -> bool {
        self.transfer
    }

    /// Returns the in-vehicle duration of the hop.
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }
}
