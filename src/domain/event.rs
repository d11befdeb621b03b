//! Raw scan events as delivered by a code reader or manual entry.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::log_entry::ScanKind;
use crate::error::{Result, ScanlogError};

/// Symbologies the optical reader reports as linear barcodes.
const LINEAR_READER_TYPES: &[&str] = &["ean-13", "ean-8", "code-128", "code-39", "upc-e", "upc-a"];

/// Where a raw scan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeKind {
    /// 2D QR code read by the camera
    OpticalQr,
    /// 1D barcode read by the camera
    OpticalLinear,
    /// Typed in by a person
    Manual,
}

impl CodeKind {
    /// Map a reader symbology name ("qr", "ean-13", ...) to a kind.
    pub fn from_reader_type(reader_type: &str) -> Result<Self> {
        let normalized = reader_type.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "qr" => Ok(CodeKind::OpticalQr),
            "manual" => Ok(CodeKind::Manual),
            t if LINEAR_READER_TYPES.contains(&t) => Ok(CodeKind::OpticalLinear),
            _ => Err(ScanlogError::InvalidInput(format!(
                "unknown reader code type: {}",
                reader_type
            ))),
        }
    }

    /// The kind recorded in the log for scans of this origin.
    pub fn scan_kind(self) -> ScanKind {
        match self {
            CodeKind::OpticalQr => ScanKind::Qr,
            CodeKind::OpticalLinear => ScanKind::Barcode,
            CodeKind::Manual => ScanKind::Manual,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodeKind::OpticalQr => "optical-qr",
            CodeKind::OpticalLinear => "optical-linear",
            CodeKind::Manual => "manual",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeKind {
    type Err = ScanlogError;

    /// Accepts both the canonical names and reader symbology names.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optical-qr" => Ok(CodeKind::OpticalQr),
            "optical-linear" | "barcode" => Ok(CodeKind::OpticalLinear),
            _ => CodeKind::from_reader_type(s),
        }
    }
}

/// An unprocessed read, before deduplication. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScanEvent {
    pub value: String,
    pub code_kind: CodeKind,
    pub captured_at: NaiveDateTime,
}

impl RawScanEvent {
    /// Create an event captured now.
    pub fn new(value: impl Into<String>, code_kind: CodeKind) -> Self {
        Self::at(value, code_kind, Local::now().naive_local())
    }

    /// Create an event with an explicit capture time.
    pub fn at(value: impl Into<String>, code_kind: CodeKind, captured_at: NaiveDateTime) -> Self {
        Self {
            value: value.into(),
            code_kind,
            captured_at,
        }
    }

    /// Readers emit spurious blank frames; only non-blank values are usable.
    pub fn is_usable(&self) -> bool {
        !self.value.trim().is_empty()
    }
}
