//! Timer-driven wrapper around `CaptureSession`.
//!
//! After a scan is accepted the session stays in `Processing` for a fixed
//! settle delay (the time the consumer spends giving feedback). Raw events
//! arriving in that window are dropped, not queued.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::session::{CapturePhase, CaptureSession, CaptureStats, SettleTicket};
use crate::domain::{RawScanEvent, SubmitOutcome};
use crate::error::{Result, ScanlogError};

/// Default settle delay after an accepted scan.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Tunables for a capture session.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub settle_delay: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Owns one capture session and its pending settle timer.
///
/// `submit` spawns the settle timer on the current Tokio runtime, so it must
/// be called from within one.
pub struct Debouncer {
    session: Arc<Mutex<CaptureSession>>,
    settings: CaptureSettings,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            session: Arc::new(Mutex::new(CaptureSession::new())),
            settings,
            pending: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Push one raw event through the session.
    ///
    /// The session lock is held until the settle timer is stored, so a
    /// concurrent `reset` cannot interleave between acceptance and scheduling.
    pub fn submit(&self, event: RawScanEvent) -> Result<SubmitOutcome> {
        let value_len = event.value.len();
        let mut session = self.lock_session()?;
        let outcome = session.submit(event);

        match &outcome {
            SubmitOutcome::Accepted(accepted) => {
                tracing::info!(
                    code_kind = %accepted.code_kind,
                    value_len,
                    settle_ms = self.settings.settle_delay.as_millis() as u64,
                    "Scan accepted"
                );
                if let Some(ticket) = session.settle_ticket() {
                    self.schedule_settle(ticket)?;
                }
            }
            SubmitOutcome::Discarded(reason) => {
                tracing::debug!(reason = %reason, value_len, "Scan discarded");
            }
        }

        Ok(outcome)
    }

    /// Force the session back to `Idle`, forget the last accepted value and
    /// cancel any pending settle timer.
    pub fn reset(&self) -> Result<()> {
        // Lock order: session, then pending
        let mut session = self.lock_session()?;
        session.reset();
        if let Some(handle) = self.lock_pending()?.take() {
            handle.abort();
        }
        tracing::debug!("Capture session reset");
        Ok(())
    }

    pub fn phase(&self) -> Result<CapturePhase> {
        Ok(self.lock_session()?.phase())
    }

    pub fn last_accepted(&self) -> Result<Option<String>> {
        Ok(self.lock_session()?.last_accepted().map(str::to_string))
    }

    pub fn stats(&self) -> Result<CaptureStats> {
        Ok(self.lock_session()?.stats())
    }

    /// Caller must hold the session lock.
    fn schedule_settle(&self, ticket: SettleTicket) -> Result<()> {
        let session = Arc::clone(&self.session);
        let deadline = Instant::now() + self.settings.settle_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            match session.lock() {
                Ok(mut session) => {
                    if session.settle(ticket) {
                        tracing::debug!("Capture session settled");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Capture session lock poisoned, not settling"),
            }
        });

        if let Some(previous) = self.lock_pending()?.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, CaptureSession>> {
        self.session
            .lock()
            .map_err(|e| ScanlogError::Storage(e.to_string()))
    }

    fn lock_pending(&self) -> Result<MutexGuard<'_, Option<JoinHandle<()>>>> {
        self.pending
            .lock()
            .map_err(|e| ScanlogError::Storage(e.to_string()))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(CaptureSettings::default())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
