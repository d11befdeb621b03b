//! Projection of the log onto a `FilterSpec`.
//!
//! Pure functions over an immutable slice of entries. Everything is
//! recomputed per call, which is O(n) plus the sort.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};

use super::spec::FilterSpec;
use crate::domain::LogEntry;

/// Filter and order entries, evaluating date windows against the local clock.
pub fn apply<'a, I>(entries: I, spec: &FilterSpec) -> Vec<LogEntry>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    apply_at(entries, spec, Local::now().naive_local())
}

/// Filter and order entries with an explicit evaluation time.
///
/// All predicates are ANDed. The result is newest first; equal timestamps
/// are ordered by id descending, i.e. most recently appended first.
pub fn apply_at<'a, I>(entries: I, spec: &FilterSpec, now: NaiveDateTime) -> Vec<LogEntry>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let query = spec.query.to_lowercase();

    let mut filtered: Vec<LogEntry> = entries
        .into_iter()
        .filter(|entry| {
            matches_query(entry, &query)
                && spec.status.matches(entry.status)
                && spec.date.matches(entry.timestamp, now)
        })
        .cloned()
        .collect();

    sort_for_display(&mut filtered);
    filtered
}

/// Whether a single entry passes every predicate of `spec`.
pub fn matches(entry: &LogEntry, spec: &FilterSpec, now: NaiveDateTime) -> bool {
    matches_query(entry, &spec.query.to_lowercase())
        && spec.status.matches(entry.status)
        && spec.date.matches(entry.timestamp, now)
}

/// Display order: newest first, then most recently appended first.
pub fn sort_for_display(entries: &mut [LogEntry]) {
    entries.sort_by(display_order);
}

fn display_order(a: &LogEntry, b: &LogEntry) -> Ordering {
    b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id))
}

/// `lowered_query` must already be lowercase. Absent fields just don't match.
fn matches_query(entry: &LogEntry, lowered_query: &str) -> bool {
    if lowered_query.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(lowered_query);

    contains(entry.code.as_str())
        || entry
            .descriptive_fields()
            .into_iter()
            .flatten()
            .any(contains)
}
