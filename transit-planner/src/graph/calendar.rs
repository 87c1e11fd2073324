//! Service-day filtering.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::feed::FeedSnapshot;
use crate::feed::records::exception_type;

/// Whether calendar exceptions override the weekly pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarPolicy {
    /// Only the weekly pattern and validity window count. Exceptions are
    /// loaded but not consulted.
    #[default]
    WeeklyOnly,
    /// Apply `calendar_dates` additions and removals on top of the weekly
    /// pattern.
    WithExceptions,
}

/// Service ids running on `date`.
pub fn valid_service_ids(
    feed: &FeedSnapshot,
    date: NaiveDate,
    policy: CalendarPolicy,
) -> HashSet<String> {
    let mut ids: HashSet<String> = feed
        .calendar()
        .iter()
        .filter(|c| c.is_active_on(date))
        .map(|c| c.service_id.clone())
        .collect();

    if policy == CalendarPolicy::WithExceptions {
        for exception in feed.calendar_dates().iter().filter(|e| e.date == date) {
            match exception.exception_type {
                exception_type::ADDED => {
                    ids.insert(exception.service_id.clone());
                }
                exception_type::REMOVED => {
                    ids.remove(&exception.service_id);
                }
                _ => {}
            }
        }
    }

    ids
}
