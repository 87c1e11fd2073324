//! Itinerary type.
//!
//! An `Itinerary` is the planner output: an ordered, non-empty sequence of
//! legs from origin to destination.

use chrono::Duration;

use super::{DomainError, Leg, StopId, TransitTime, TripId};

/// A complete itinerary from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (`to` of one = `from` of the next)
/// - Each leg departs no earlier than the previous leg arrives
/// - The first leg is not a transfer; every later leg is a transfer exactly
///   when its trip differs from the previous leg's trip
/// - The destination appears as a `to` stop only on the last leg
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

impl Itinerary {
    /// Constructs an itinerary from legs, validating the invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`DomainError`].
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        let Some(last) = legs.last() else {
            return Err(DomainError::EmptyItinerary);
        };
        let destination = last.to_stop();

        if legs[0].is_transfer() {
            return Err(DomainError::TransferFlagMismatch(0));
        }

        for (i, window) in legs.windows(2).enumerate() {
            let (prev, next) = (&window[0], &window[1]);
            if prev.to_stop() != next.from_stop() {
                return Err(DomainError::LegsNotContiguous(
                    prev.to_stop().clone(),
                    next.from_stop().clone(),
                ));
            }
            if next.departure_time() < prev.arrival_time() {
                return Err(DomainError::DepartsBeforeArrival(i + 1));
            }
            if next.is_transfer() != (next.trip_id() != prev.trip_id()) {
                return Err(DomainError::TransferFlagMismatch(i + 1));
            }
            if prev.to_stop() == destination {
                return Err(DomainError::RevisitsDestination(destination.clone()));
            }
        }

        Ok(Itinerary { legs })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Consumes the itinerary, returning its legs.
    pub fn into_legs(self) -> Vec<Leg> {
        self.legs
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the number of transfers (legs flagged as boarding a new trip).
    pub fn transfer_count(&self) -> usize {
        self.legs.iter().filter(|l| l.is_transfer()).count()
    }

    /// Returns the distinct trips ridden, in order of boarding.
    pub fn trips(&self) -> Vec<&TripId> {
        let mut trips: Vec<&TripId> = Vec::new();
        for leg in &self.legs {
            if trips.last() != Some(&leg.trip_id()) {
                trips.push(leg.trip_id());
            }
        }
        trips
    }

    /// Returns the origin stop.
    pub fn origin(&self) -> &StopId {
        // Safe: validated non-empty at construction
        self.legs[0].from_stop()
    }

    /// Returns the destination stop.
    pub fn destination(&self) -> &StopId {
        self.legs[self.legs.len() - 1].to_stop()
    }

    /// Returns the departure time of the first leg.
    pub fn departure_time(&self) -> TransitTime {
        self.legs[0].departure_time()
    }

    /// Returns the arrival time of the last leg.
    pub fn arrival_time(&self) -> TransitTime {
        self.legs[self.legs.len() - 1].arrival_time()
    }

    /// Returns the total travel duration.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Returns true if the itinerary rides a single trip.
    pub fn is_direct(&self) -> bool {
        self.transfer_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connection, ServiceTime};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 16).unwrap()
    }

    fn leg(from: &str, to: &str, trip: &str, dep: &str, arr: &str, transfer: bool) -> Leg {
        let conn = Connection {
            from: StopId::from(from),
            to: StopId::from(to),
            departure: ServiceTime::parse(dep).unwrap(),
            arrival: ServiceTime::parse(arr).unwrap(),
            trip_id: TripId::from(trip),
            route_name: None,
            direction: None,
        };
        Leg::new(
            &conn,
            conn.departure.on(date()),
            conn.arrival.on(date()),
            transfer,
        )
        .unwrap()
    }

    #[test]
    fn single_leg_itinerary() {
        let it = Itinerary::new(vec![leg("A", "B", "T1", "08:00:00", "08:10:00", false)]).unwrap();

        assert_eq!(it.leg_count(), 1);
        assert_eq!(it.origin(), &StopId::from("A"));
        assert_eq!(it.destination(), &StopId::from("B"));
        assert_eq!(it.departure_time().to_string(), "08:00");
        assert_eq!(it.arrival_time().to_string(), "08:10");
        assert_eq!(it.total_duration(), Duration::minutes(10));
        assert!(it.is_direct());
    }

    #[test]
    fn transfer_counting() {
        let it = Itinerary::new(vec![
            leg("A", "B", "T1", "08:00:00", "08:10:00", false),
            leg("B", "C", "T1", "08:11:00", "08:15:00", false),
            leg("C", "D", "T2", "08:30:00", "08:40:00", true),
        ])
        .unwrap();

        assert_eq!(it.transfer_count(), 1);
        assert_eq!(it.trips(), vec![&TripId::from("T1"), &TripId::from("T2")]);
        assert!(!it.is_direct());
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(Itinerary::new(vec![]), Err(DomainError::EmptyItinerary));
    }

    #[test]
    fn gap_rejected() {
        let result = Itinerary::new(vec![
            leg("A", "B", "T1", "08:00:00", "08:10:00", false),
            leg("C", "D", "T1", "08:20:00", "08:30:00", false),
        ]);
        assert_eq!(
            result,
            Err(DomainError::LegsNotContiguous(
                StopId::from("B"),
                StopId::from("C")
            ))
        );
    }

    #[test]
    fn first_leg_transfer_rejected() {
        let result = Itinerary::new(vec![leg("A", "B", "T1", "08:00:00", "08:10:00", true)]);
        assert_eq!(result, Err(DomainError::TransferFlagMismatch(0)));
    }

    #[test]
    fn missing_transfer_flag_rejected() {
        let result = Itinerary::new(vec![
            leg("A", "B", "T1", "08:00:00", "08:10:00", false),
            leg("B", "C", "T2", "08:20:00", "08:30:00", false),
        ]);
        assert_eq!(result, Err(DomainError::TransferFlagMismatch(1)));
    }

    #[test]
    fn spurious_transfer_flag_rejected() {
        let result = Itinerary::new(vec![
            leg("A", "B", "T1", "08:00:00", "08:10:00", false),
            leg("B", "C", "T1", "08:11:00", "08:30:00", true),
        ]);
        assert_eq!(result, Err(DomainError::TransferFlagMismatch(1)));
    }

    #[test]
    fn time_travel_rejected() {
        let result = Itinerary::new(vec![
            leg("A", "B", "T1", "08:00:00", "08:10:00", false),
            leg("B", "C", "T2", "08:05:00", "08:30:00", true),
        ]);
        assert_eq!(result, Err(DomainError::DepartsBeforeArrival(1)));
    }

    #[test]
    fn passing_through_destination_rejected() {
        let result = Itinerary::new(vec![
            leg("A", "C", "T1", "08:00:00", "08:10:00", false),
            leg("C", "B", "T1", "08:11:00", "08:20:00", false),
            leg("B", "C", "T1", "08:21:00", "08:30:00", false),
        ]);
        assert_eq!(
            result,
            Err(DomainError::RevisitsDestination(StopId::from("C")))
        );
    }
}
