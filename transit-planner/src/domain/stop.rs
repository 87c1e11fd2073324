//! Stop and trip identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A feed stop identifier.
///
/// Stop ids are opaque strings. Some networks encode the platform direction
/// in a suffix (e.g. `de:08212:1:1:1`), which the resolver's direction
/// classifier inspects; nothing else depends on the format.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::StopId;
///
/// let id = StopId::new("de:08212:89:1:1");
/// assert_eq!(id.as_str(), "de:08212:89:1:1");
/// assert!(id.ends_with(":1:1"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id ends with the given suffix.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A feed trip identifier (one scheduled vehicle run).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TripId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A stop (platform or station) known to the network.
///
/// Stops sharing a `parent_station` are platforms of one physical station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Feed identifier
    pub id: StopId,
    /// Display name
    pub name: String,
    /// Grouping id for platforms of the same station
    pub parent_station: Option<StopId>,
    /// Latitude and longitude, if the feed provides them
    pub coordinates: Option<(f64, f64)>,
}

impl Stop {
    /// Create a stop with no parent station or coordinates.
    pub fn new(id: impl Into<StopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_station: None,
            coordinates: None,
        }
    }
}

impl From<String> for StopId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
