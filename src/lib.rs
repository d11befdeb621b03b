//! Scanlog - scan capture and log management
//!
//! Raw code reads are debounced into one accepted scan per physical
//! presentation, classified as valid or invalid by a pluggable decider, and
//! appended to an in-memory log that can be searched and filtered.

pub mod capture;
pub mod classify;
pub mod domain;
pub mod error;
pub mod filter;
pub mod id;
pub mod pipeline;
pub mod replay;
pub mod storage;

pub use error::{Result, ScanlogError};
