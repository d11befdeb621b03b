//! Log entry record and related types
//!
//! A `LogEntry` is one classified scan. Entries are only ever created by the
//! log store's `append`; everything outside the store sees them read-only.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::outcome::ScanResult;
use crate::error::{Result, ScanlogError};
use crate::id::EntryId;

/// Fixed timestamp format used for display and serialization.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kind of code recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Qr,
    Barcode,
    Manual,
}

impl ScanKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanKind::Qr => "qr",
            ScanKind::Barcode => "barcode",
            ScanKind::Manual => "manual",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = ScanlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qr" => Ok(ScanKind::Qr),
            "barcode" => Ok(ScanKind::Barcode),
            "manual" => Ok(ScanKind::Manual),
            other => Err(ScanlogError::InvalidInput(format!("unknown scan kind: {}", other))),
        }
    }
}

/// Verification outcome of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Valid,
    Invalid,
}

impl ScanStatus {
    pub fn is_valid(self) -> bool {
        matches!(self, ScanStatus::Valid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanStatus::Valid => "valid",
            ScanStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = ScanlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "valid" => Ok(ScanStatus::Valid),
            "invalid" => Ok(ScanStatus::Invalid),
            other => Err(ScanlogError::InvalidInput(format!("unknown scan status: {}", other))),
        }
    }
}

/// A persisted, immutable scan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Creation-order identifier, unique for the store's lifetime
    pub id: EntryId,
    /// Scanned or typed payload, never empty
    pub code: String,
    pub kind: ScanKind,
    pub status: ScanStatus,
    /// Creation time, assigned by the store
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Timestamp rendered in the fixed log format.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The optional descriptive fields that take part in text search.
    pub fn descriptive_fields(&self) -> [Option<&str>; 3] {
        [
            self.product_name.as_deref(),
            self.location.as_deref(),
            self.details.as_deref(),
        ]
    }
}

/// Input to `LogStore::append`: everything except the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub code: String,
    pub kind: ScanKind,
    pub status: ScanStatus,
    pub product_name: Option<String>,
    pub location: Option<String>,
    pub details: Option<String>,
}

impl NewEntry {
    pub fn new(code: impl Into<String>, kind: ScanKind, status: ScanStatus) -> Self {
        Self {
            code: code.into(),
            kind,
            status,
            product_name: None,
            location: None,
            details: None,
        }
    }

    /// Build an entry from a classification result.
    pub fn from_result(result: &ScanResult) -> Self {
        Self::new(result.code.clone(), result.kind, result.status)
    }

    pub fn product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = non_blank(product_name.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = non_blank(details.into());
        self
    }
}

/// Blank descriptive text is the same as not supplying it.
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}
