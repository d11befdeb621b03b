//! Storage layer for scanlog - an append-only, in-memory scan log.
//!
//! Entries live for the lifetime of the process. The store owns id
//! assignment and timestamping; display ordering belongs to `filter`.

mod clock;
mod log_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use log_store::{LogSnapshot, LogStore};
