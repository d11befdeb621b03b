//! Capture session state machine.
//!
//! A reader holding a code in frame reports it many times per second. The
//! session turns that stream into one accepted scan per presentation:
//!
//! - `Idle`: raw events are checked and the first usable, non-duplicate one
//!   is accepted.
//! - `Processing`: everything is dropped until the session settles or is
//!   reset.
//!
//! The session is a plain value; timing lives in `Debouncer`.

use crate::domain::{DiscardReason, RawScanEvent, SubmitOutcome};

/// Phase of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePhase {
    #[default]
    Idle,
    Processing,
}

/// Proof that a specific processing phase may be settled.
///
/// Tickets from before a reset or an earlier acceptance are stale and
/// settle nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTicket {
    epoch: u64,
}

/// Running totals for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureStats {
    pub accepted: u64,
    pub discarded_empty: u64,
    pub discarded_duplicate: u64,
    pub discarded_busy: u64,
}

impl CaptureStats {
    pub fn discarded(&self) -> u64 {
        self.discarded_empty + self.discarded_duplicate + self.discarded_busy
    }

    fn record(&mut self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Accepted(_) => self.accepted += 1,
            SubmitOutcome::Discarded(DiscardReason::Empty) => self.discarded_empty += 1,
            SubmitOutcome::Discarded(DiscardReason::Duplicate) => self.discarded_duplicate += 1,
            SubmitOutcome::Discarded(DiscardReason::Busy) => self.discarded_busy += 1,
        }
    }
}

/// Explicit `{phase, last accepted value}` state of one capture session.
#[derive(Debug, Default)]
pub struct CaptureSession {
    phase: CapturePhase,
    last_accepted: Option<String>,
    epoch: u64,
    stats: CaptureStats,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    /// Value of the most recently accepted event, if any since the last reset.
    pub fn last_accepted(&self) -> Option<&str> {
        self.last_accepted.as_deref()
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    /// Decide whether a raw event is accepted.
    ///
    /// Blank values are reported as `Empty` in every phase. On acceptance the
    /// session enters `Processing` and remembers the value.
    pub fn submit(&mut self, event: RawScanEvent) -> SubmitOutcome {
        let outcome = if !event.is_usable() {
            SubmitOutcome::Discarded(DiscardReason::Empty)
        } else if self.phase == CapturePhase::Processing {
            SubmitOutcome::Discarded(DiscardReason::Busy)
        } else if self.last_accepted.as_deref() == Some(event.value.as_str()) {
            SubmitOutcome::Discarded(DiscardReason::Duplicate)
        } else {
            self.phase = CapturePhase::Processing;
            self.epoch += 1;
            self.last_accepted = Some(event.value.clone());
            SubmitOutcome::Accepted(event)
        };

        self.stats.record(&outcome);
        outcome
    }

    /// Ticket for the current processing phase, `None` while idle.
    pub fn settle_ticket(&self) -> Option<SettleTicket> {
        match self.phase {
            CapturePhase::Processing => Some(SettleTicket { epoch: self.epoch }),
            CapturePhase::Idle => None,
        }
    }

    /// Return to `Idle` if the ticket still names the current processing
    /// phase. Returns whether the session settled.
    pub fn settle(&mut self, ticket: SettleTicket) -> bool {
        if self.phase == CapturePhase::Processing && ticket.epoch == self.epoch {
            self.phase = CapturePhase::Idle;
            true
        } else {
            false
        }
    }

    /// Force `Idle` and forget the last accepted value. Outstanding tickets
    /// become stale.
    pub fn reset(&mut self) {
        self.phase = CapturePhase::Idle;
        self.last_accepted = None;
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CodeKind;

    fn qr(value: &str) -> RawScanEvent {
        RawScanEvent::new(value, CodeKind::OpticalQr)
    }

    fn accept_and_settle(session: &mut CaptureSession, value: &str) {
        assert!(session.submit(qr(value)).is_accepted());
        let ticket = session.settle_ticket().unwrap();
        assert!(session.settle(ticket));
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = CaptureSession::new();
        assert_eq!(session.phase(), CapturePhase::Idle);
        assert_eq!(session.last_accepted(), None);
        assert!(session.settle_ticket().is_none());
    }

    #[test]
    fn test_accept_enters_processing() {
        let mut session = CaptureSession::new();
        let event = qr("QR123");
        assert_eq!(session.submit(event.clone()), SubmitOutcome::Accepted(event));
        assert_eq!(session.phase(), CapturePhase::Processing);
        assert_eq!(session.last_accepted(), Some("QR123"));
    }

    #[test]
    fn test_processing_discards_as_busy() {
        let mut session = CaptureSession::new();
        session.submit(qr("QR123"));
        assert_eq!(
            session.submit(qr("QR999")),
            SubmitOutcome::Discarded(DiscardReason::Busy)
        );
        assert_eq!(session.last_accepted(), Some("QR123"));
    }

    #[test]
    fn test_empty_discarded_in_any_phase() {
        let mut session = CaptureSession::new();
        assert_eq!(session.submit(qr("")), SubmitOutcome::Discarded(DiscardReason::Empty));
        assert_eq!(session.submit(qr("   ")), SubmitOutcome::Discarded(DiscardReason::Empty));
        session.submit(qr("QR123"));
        assert_eq!(session.submit(qr("")), SubmitOutcome::Discarded(DiscardReason::Empty));
    }

    #[test]
    fn test_duplicate_after_settle() {
        let mut session = CaptureSession::new();
        accept_and_settle(&mut session, "QR123");
        assert_eq!(
            session.submit(qr("QR123")),
            SubmitOutcome::Discarded(DiscardReason::Duplicate)
        );
        assert_eq!(session.phase(), CapturePhase::Idle);
    }

    #[test]
    fn test_scenario_qr123_qr123_qr999() {
        let mut session = CaptureSession::new();
        accept_and_settle(&mut session, "QR123");
        assert_eq!(
            session.submit(qr("QR123")).discard_reason(),
            Some(DiscardReason::Duplicate)
        );
        assert!(session.submit(qr("QR999")).is_accepted());
    }

    #[test]
    fn test_earlier_codes_accepted_again() {
        let mut session = CaptureSession::new();
        accept_and_settle(&mut session, "A");
        accept_and_settle(&mut session, "B");
        // Only the immediately preceding value is suppressed
        assert!(session.submit(qr("A")).is_accepted());
    }

    #[test]
    fn test_duplicate_is_exact_match() {
        let mut session = CaptureSession::new();
        accept_and_settle(&mut session, "QR123");
        assert!(session.submit(qr("qr123")).is_accepted());
    }

    #[test]
    fn test_stale_ticket_does_not_settle() {
        let mut session = CaptureSession::new();
        session.submit(qr("A"));
        let stale = session.settle_ticket().unwrap();
        session.reset();
        session.submit(qr("B"));
        assert!(!session.settle(stale));
        assert_eq!(session.phase(), CapturePhase::Processing);
    }

    #[test]
    fn test_settle_twice_is_noop() {
        let mut session = CaptureSession::new();
        session.submit(qr("A"));
        let ticket = session.settle_ticket().unwrap();
        assert!(session.settle(ticket));
        assert!(!session.settle(ticket));
    }

    #[test]
    fn test_reset_clears_last_accepted() {
        let mut session = CaptureSession::new();
        session.submit(qr("QR123"));
        session.reset();
        assert_eq!(session.phase(), CapturePhase::Idle);
        assert_eq!(session.last_accepted(), None);
        assert!(session.submit(qr("QR123")).is_accepted());
    }

    #[test]
    fn test_stats_track_outcomes() {
        let mut session = CaptureSession::new();
        session.submit(qr(""));
        session.submit(qr("A"));
        session.submit(qr("A"));
        let ticket = session.settle_ticket().unwrap();
        session.settle(ticket);
        session.submit(qr("A"));

        let stats = session.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.discarded_empty, 1);
        assert_eq!(stats.discarded_busy, 1);
        assert_eq!(stats.discarded_duplicate, 1);
        assert_eq!(stats.discarded(), 3);
    }

    #[test]
    fn test_never_accepts_same_value_twice_in_a_row() {
        let values = ["A", "A", "", "B", "B", "A", "A", "A", "C", "", "C"];
        let mut session = CaptureSession::new();
        let mut accepted: Vec<String> = Vec::new();

        for value in values {
            if let SubmitOutcome::Accepted(event) = session.submit(qr(value)) {
                accepted.push(event.value);
            }
            if let Some(ticket) = session.settle_ticket() {
                session.settle(ticket);
            }
        }

        assert_eq!(accepted, vec!["A", "B", "A", "C"]);
        assert!(accepted.windows(2).all(|w| w[0] != w[1]));
    }
}
