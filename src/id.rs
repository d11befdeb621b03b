//! ID generation utilities for scanlog
//!
//! Log entries are numbered in creation order. The sequence is owned by the
//! log store and only advanced while its lock is held.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanlogError;

/// Creation-order identifier of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ScanlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(EntryId)
            .map_err(|e| ScanlogError::InvalidInput(format!("bad entry id {:?}: {}", s, e)))
    }
}

/// Monotonic id source. Never hands out the same id twice.
#[derive(Debug)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Start a sequence whose first id is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id.
    pub fn next_id(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        id
    }

    /// Peek at the id the next call will return.
    pub fn peek(&self) -> EntryId {
        EntryId(self.next)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
