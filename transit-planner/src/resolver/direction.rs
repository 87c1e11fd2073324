//! Platform direction classification.
//!
//! Some networks publish one stop id per directional platform and encode
//! the direction in an id suffix. A [`DirectionClassifier`] reads that
//! convention; [`SuffixClassifier`] implements the common
//! `:1:1`/`:1:2` versus `:2:2`/`:2:1` scheme.

use std::fmt;

use crate::domain::StopId;

/// Which direction a platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionBucket {
    Direction1,
    Direction2,
    Other,
}

/// Assigns stop ids to direction buckets.
pub trait DirectionClassifier {
    fn classify(&self, id: &StopId) -> DirectionBucket;
}

/// Classifies by id suffix.
#[derive(Debug, Clone)]
pub struct SuffixClassifier {
    direction1: Vec<String>,
    direction2: Vec<String>,
}

impl SuffixClassifier {
    /// A classifier with custom suffix lists.
    pub fn new(direction1: Vec<String>, direction2: Vec<String>) -> Self {
        Self {
            direction1,
            direction2,
        }
    }
}

impl Default for SuffixClassifier {
    fn default() -> Self {
        Self::new(
            vec![":1:1".to_string(), ":1:2".to_string()],
            vec![":2:2".to_string(), ":2:1".to_string()],
        )
    }
}

impl DirectionClassifier for SuffixClassifier {
    fn classify(&self, id: &StopId) -> DirectionBucket {
        if self.direction1.iter().any(|s| id.ends_with(s)) {
            DirectionBucket::Direction1
        } else if self.direction2.iter().any(|s| id.ends_with(s)) {
            DirectionBucket::Direction2
        } else {
            DirectionBucket::Other
        }
    }
}

/// A combination of start and end buckets, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pairing {
    /// Direction 1 to direction 1
    SameDirection1,
    /// Direction 2 to direction 2
    SameDirection2,
    /// Direction 1 to direction 2
    Cross12,
    /// Direction 2 to direction 1
    Cross21,
    /// Unclassified to unclassified
    Other,
    /// Every start id with every end id
    All,
}

impl Pairing {
    /// Pairings from most to least likely.
    pub const ORDER: [Pairing; 6] = [
        Pairing::SameDirection1,
        Pairing::SameDirection2,
        Pairing::Cross12,
        Pairing::Cross21,
        Pairing::Other,
        Pairing::All,
    ];

    fn buckets(&self) -> Option<(DirectionBucket, DirectionBucket)> {
        use DirectionBucket::*;
        match self {
            Pairing::SameDirection1 => Some((Direction1, Direction1)),
            Pairing::SameDirection2 => Some((Direction2, Direction2)),
            Pairing::Cross12 => Some((Direction1, Direction2)),
            Pairing::Cross21 => Some((Direction2, Direction1)),
            Pairing::Other => Some((Other, Other)),
            Pairing::All => None,
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pairing::SameDirection1 => "direction 1 -> 1",
            Pairing::SameDirection2 => "direction 2 -> 2",
            Pairing::Cross12 => "direction 1 -> 2",
            Pairing::Cross21 => "direction 2 -> 1",
            Pairing::Other => "other -> other",
            Pairing::All => "all combinations",
        })
    }
}

/// One side's ids split into direction buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionGroups {
    direction1: Vec<StopId>,
    direction2: Vec<StopId>,
    other: Vec<StopId>,
    all: Vec<StopId>,
}

impl DirectionGroups {
    /// Partition `ids`, keeping their order within each bucket.
    pub fn partition(ids: &[StopId], classifier: &dyn DirectionClassifier) -> Self {
        let mut groups = Self {
            all: ids.to_vec(),
            ..Self::default()
        };
        for id in ids {
            match classifier.classify(id) {
                DirectionBucket::Direction1 => groups.direction1.push(id.clone()),
                DirectionBucket::Direction2 => groups.direction2.push(id.clone()),
                DirectionBucket::Other => groups.other.push(id.clone()),
            }
        }
        groups
    }

    pub fn bucket(&self, bucket: DirectionBucket) -> &[StopId] {
        match bucket {
            DirectionBucket::Direction1 => &self.direction1,
            DirectionBucket::Direction2 => &self.direction2,
            DirectionBucket::Other => &self.other,
        }
    }

    pub fn all(&self) -> &[StopId] {
        &self.all
    }
}

/// Candidate `(start, end)` pairs for one pairing.
pub fn candidate_pairs<'a>(
    pairing: Pairing,
    start: &'a DirectionGroups,
    end: &'a DirectionGroups,
) -> impl Iterator<Item = (&'a StopId, &'a StopId)> + 'a {
    let (from, to) = match pairing.buckets() {
        Some((s, e)) => (start.bucket(s), end.bucket(e)),
        None => (start.all(), end.all()),
    };
    from.iter()
        .flat_map(move |s| to.iter().map(move |e| (s, e)))
}
