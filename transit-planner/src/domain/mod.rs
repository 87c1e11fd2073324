//! Domain types for the transit planner.
//!
//! This module contains the core domain model types: identifiers, service-day
//! times, graph connections, and the legs and itineraries planners return.
//! Types that carry invariants enforce them at construction time, so code
//! that receives them can trust their validity.

mod connection;
mod error;
mod itinerary;
mod leg;
mod stop;
mod time;

pub use connection::Connection;
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::{Leg, UNKNOWN_DIRECTION, UNKNOWN_ROUTE};
pub use stop::{Stop, StopId, TripId};
pub use time::{MAX_SERVICE_HOUR, ServiceTime, TimeError, TransitTime};
