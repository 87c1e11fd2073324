//! Persisted graph snapshots.
//!
//! A snapshot is a JSON document holding a built [`TransitGraph`] together
//! with the [`SnapshotKey`] it was built for. Loading checks the key, so a
//! snapshot of another feed, date or mode is never served in place of a
//! rebuild.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::feed::FeedSnapshot;
use crate::graph::{ModeFilter, TransitGraph};

/// Bumped whenever the serialised graph layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Identity of a built graph: which feed, date and mode it represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub format_version: u32,
    pub feed_fingerprint: String,
    pub service_date: NaiveDate,
    pub mode: ModeFilter,
}

impl SnapshotKey {
    /// Key for a graph built from `feed` for `service_date` and `mode`.
    pub fn new(feed: &FeedSnapshot, service_date: NaiveDate, mode: ModeFilter) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            feed_fingerprint: feed.fingerprint(),
            service_date,
            mode,
        }
    }
}

/// Errors reading or writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot at {} is not valid: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    key: &'a SnapshotKey,
    graph: &'a TransitGraph,
}

#[derive(Deserialize)]
struct SnapshotOwned {
    key: SnapshotKey,
    graph: TransitGraph,
}

/// Write `graph` and its key to `path`, replacing any existing file.
pub fn save(path: &Path, key: &SnapshotKey, graph: &TransitGraph) -> Result<(), SnapshotError> {
    let io_err = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &SnapshotRef { key, graph }).map_err(|source| {
        SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(io_err)?;

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "snapshot saved"
    );
    Ok(())
}

/// Load the graph at `path` if it was built for `expected`.
///
/// Returns `Ok(None)` if the file does not exist or its key differs; the
/// caller should rebuild in both cases.
pub fn load(path: &Path, expected: &SnapshotKey) -> Result<Option<TransitGraph>, SnapshotError> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot");
        return Ok(None);
    }

    let file = File::open(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: SnapshotOwned =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if &snapshot.key != expected {
        warn!(
            path = %path.display(),
            found = ?snapshot.key,
            expected = ?expected,
            "snapshot is stale, ignoring"
        );
        return Ok(None);
    }

    info!(
        path = %path.display(),
        nodes = snapshot.graph.node_count(),
        edges = snapshot.graph.edge_count(),
        "snapshot loaded"
    );
    Ok(Some(snapshot.graph))
}
