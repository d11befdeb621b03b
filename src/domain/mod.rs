//! Domain types for scanlog
//!
//! This module contains all core domain types:
//! - RawScanEvent / CodeKind: unprocessed reads from a code reader
//! - LogEntry / NewEntry: persisted scan records and their append input
//! - SubmitOutcome / ScanResult: what capture and classification produce

pub mod event;
pub mod log_entry;
pub mod outcome;

pub use event::{CodeKind, RawScanEvent};
pub use log_entry::{LogEntry, NewEntry, ScanKind, ScanStatus, TIMESTAMP_FORMAT};
pub use outcome::{DiscardReason, ScanResult, SubmitOutcome};
