//! Dashboard summaries over the log: totals and the most recent scans.

use serde::Serialize;

use super::engine::sort_for_display;
use crate::domain::{LogEntry, ScanStatus};

/// Counts of scans by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

impl ScanStats {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        entries.into_iter().fold(Self::default(), |mut stats, entry| {
            stats.total += 1;
            match entry.status {
                ScanStatus::Valid => stats.valid += 1,
                ScanStatus::Invalid => stats.invalid += 1,
            }
            stats
        })
    }

    /// Share of valid scans, `None` for an empty log.
    pub fn valid_ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.valid as f64 / self.total as f64)
        }
    }
}

/// The `limit` most recent entries in display order.
pub fn recent<'a, I>(entries: I, limit: usize) -> Vec<LogEntry>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut all: Vec<LogEntry> = entries.into_iter().cloned().collect();
    sort_for_display(&mut all);
    all.truncate(limit);
    all
}
