//! Reads a feed from a directory of CSV tables.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{FeedSnapshot, FeedTable};

/// Errors that can occur while loading a feed directory.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A required table file does not exist
    #[error("feed table {table} not found in {}", dir.display())]
    MissingTable { table: FeedTable, dir: PathBuf },

    /// Reading a file failed
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid CSV (malformed header or encoding)
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Load all tables of a feed from `dir`.
///
/// `calendar_dates.txt` is optional; every other table must exist. Rows that
/// fail to deserialise are skipped with a warning, so one malformed row does
/// not reject the feed.
pub fn load_feed_dir(dir: &Path) -> Result<FeedSnapshot, FeedError> {
    info!(dir = %dir.display(), "loading feed");

    let stops = read_table(dir, FeedTable::Stops)?;
    let routes = read_table(dir, FeedTable::Routes)?;
    let trips = read_table(dir, FeedTable::Trips)?;
    let stop_times = read_table(dir, FeedTable::StopTimes)?;
    let calendar = read_table(dir, FeedTable::Calendar)?;
    let calendar_dates = match read_table(dir, FeedTable::CalendarDates) {
        Ok(rows) => rows,
        Err(FeedError::MissingTable { .. }) => {
            debug!("no calendar_dates.txt, continuing without exceptions");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let feed = FeedSnapshot::new(stops, routes, trips, stop_times, calendar, calendar_dates);
    info!(
        stops = feed.stops().len(),
        routes = feed.routes().len(),
        trips = feed.trips().len(),
        stop_times = feed.stop_times().len(),
        "feed loaded"
    );
    Ok(feed)
}

fn read_table<T: DeserializeOwned>(dir: &Path, table: FeedTable) -> Result<Vec<T>, FeedError> {
    let path = dir.join(table.file_name());
    if !path.exists() {
        return Err(FeedError::MissingTable {
            table,
            dir: dir.to_path_buf(),
        });
    }

    let file = File::open(&path).map_err(|source| FeedError::Io {
        path: path.clone(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    // Surface header problems as a hard error before streaming rows.
    rdr.headers().map_err(|source| FeedError::Csv {
        path: path.clone(),
        source,
    })?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                debug!(table = %table, error = %e, "skipping malformed row");
            }
        }
    }

    if skipped > 0 {
        warn!(table = %table, skipped, "skipped malformed rows");
    }

    Ok(rows)
}
