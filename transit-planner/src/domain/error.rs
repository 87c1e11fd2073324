//! Domain error types.
//!
//! These errors represent invariant violations when assembling legs and
//! itineraries. They are distinct from feed, build and search errors.

use super::StopId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction (e.g., arrival before departure)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't share a stop
    #[error("legs are not contiguous: {0} does not connect to {1}")]
    LegsNotContiguous(StopId, StopId),

    /// A leg's transfer flag disagrees with the trip sequence
    #[error("transfer flag on leg {0} does not match trip change")]
    TransferFlagMismatch(usize),

    /// A leg departs before the previous leg arrives
    #[error("leg {0} departs before the previous leg arrives")]
    DepartsBeforeArrival(usize),

    /// The itinerary passes through its destination before the last leg
    #[error("itinerary passes through destination {0} before the final leg")]
    RevisitsDestination(StopId),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}
