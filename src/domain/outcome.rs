//! Capture and classification outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::RawScanEvent;
use super::log_entry::{ScanKind, ScanStatus};

/// Why the debouncer dropped a raw event. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardReason {
    /// Missing or blank value
    Empty,
    /// Same value as the last accepted scan
    Duplicate,
    /// A previous scan is still being processed
    Busy,
}

impl DiscardReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscardReason::Empty => "empty",
            DiscardReason::Duplicate => "duplicate",
            DiscardReason::Busy => "busy",
        }
    }
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of submitting a raw event to a capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(RawScanEvent),
    Discarded(DiscardReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    pub fn discard_reason(&self) -> Option<DiscardReason> {
        match self {
            SubmitOutcome::Discarded(reason) => Some(*reason),
            SubmitOutcome::Accepted(_) => None,
        }
    }
}

/// Classification of an accepted scan, routed to the valid/invalid presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: ScanStatus,
    pub code: String,
    pub kind: ScanKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::CodeKind;

    #[test]
    fn test_discard_reason_labels() {
        assert_eq!(DiscardReason::Empty.to_string(), "empty");
        assert_eq!(DiscardReason::Duplicate.to_string(), "duplicate");
        assert_eq!(DiscardReason::Busy.to_string(), "busy");
    }

    #[test]
    fn test_submit_outcome_helpers() {
        let accepted = SubmitOutcome::Accepted(RawScanEvent::new("QR1", CodeKind::OpticalQr));
        assert!(accepted.is_accepted());
        assert_eq!(accepted.discard_reason(), None);

        let discarded = SubmitOutcome::Discarded(DiscardReason::Busy);
        assert!(!discarded.is_accepted());
        assert_eq!(discarded.discard_reason(), Some(DiscardReason::Busy));
    }
}
