//! Append-only, in-memory scan log.

use std::sync::{Arc, Mutex, MutexGuard};

use super::clock::{Clock, SystemClock};
use crate::domain::{LogEntry, NewEntry};
use crate::error::{Result, ScanlogError};
use crate::id::{EntryId, IdSequence};

struct Inner {
    entries: Arc<Vec<LogEntry>>,
    ids: IdSequence,
}

/// Process-lifetime record of classified scans.
///
/// `append` is the single serialization point: id assignment, timestamping
/// and insertion all happen under one lock, so concurrent capture and manual
/// submissions never share an id and timestamps never go backwards in
/// insertion order.
pub struct LogStore {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore").finish_non_exhaustive()
    }
}

impl LogStore {
    /// Create an empty store stamped by the local wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: Arc::new(Vec::new()),
                ids: IdSequence::new(),
            }),
            clock,
        }
    }

    /// Store a new entry and return it with its id and timestamp.
    ///
    /// Fails with `Validation` if the code is empty or blank; nothing is
    /// stored in that case.
    pub fn append(&self, input: NewEntry) -> Result<LogEntry> {
        if input.code.trim().is_empty() {
            return Err(ScanlogError::Validation("scan code must not be empty".to_string()));
        }

        let mut inner = self.lock()?;

        let now = self.clock.now();
        let timestamp = match inner.entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let entry = LogEntry {
            id: inner.ids.next_id(),
            code: input.code,
            kind: input.kind,
            status: input.status,
            timestamp,
            product_name: input.product_name,
            location: input.location,
            details: input.details,
        };

        // Copies only if a snapshot of the old list is still alive
        Arc::make_mut(&mut inner.entries).push(entry.clone());

        tracing::info!(
            id = %entry.id,
            kind = %entry.kind,
            status = %entry.status,
            timestamp = %entry.formatted_timestamp(),
            "Scan logged"
        );
        Ok(entry)
    }

    /// Immutable view of every entry in insertion order.
    pub fn all(&self) -> Result<LogSnapshot> {
        Ok(LogSnapshot {
            entries: Arc::clone(&self.lock()?.entries),
        })
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| ScanlogError::Storage(e.to_string()))
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the log. Iterate it as often as needed; later
/// appends are not visible through it.
#[derive(Debug, Clone)]
pub struct LogSnapshot {
    entries: Arc<Vec<LogEntry>>,
}

impl LogSnapshot {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Look up an entry by id. Ids increase with insertion order.
    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entries[idx])
    }
}

impl<'a> IntoIterator for &'a LogSnapshot {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
