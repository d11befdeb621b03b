//! Classifier: turns an accepted scan into a `ScanResult` via a `Decider`.

use std::sync::Arc;
use std::time::Duration;

use super::traits::Decider;
use crate::domain::{RawScanEvent, ScanKind, ScanResult};
use crate::error::{Result, ScanlogError};

/// Default time a decider gets before the scan is reported unavailable.
pub const DEFAULT_DECIDE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub timeout: Duration,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DECIDE_TIMEOUT,
        }
    }
}

/// Wraps a decision collaborator with input checks and a timeout.
#[derive(Clone)]
pub struct Classifier {
    decider: Arc<dyn Decider>,
    settings: ClassifierSettings,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("decider", &self.decider.description())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Classifier {
    pub fn new(decider: Arc<dyn Decider>, settings: ClassifierSettings) -> Self {
        Self { decider, settings }
    }

    /// Create a classifier with default settings
    pub fn with_decider(decider: impl Decider + 'static) -> Self {
        Self::new(Arc::new(decider), ClassifierSettings::default())
    }

    pub fn decider_description(&self) -> &str {
        self.decider.description()
    }

    /// Classify an accepted raw event.
    pub async fn classify_event(&self, event: &RawScanEvent) -> Result<ScanResult> {
        self.classify(&event.value, event.code_kind.scan_kind()).await
    }

    /// Classify a code of the given kind.
    ///
    /// The code reaches the decider and the result exactly as given. A
    /// decider error or timeout becomes `ClassificationUnavailable`; a
    /// decided status is passed through unchanged.
    pub async fn classify(&self, code: &str, kind: ScanKind) -> Result<ScanResult> {
        if code.trim().is_empty() {
            return Err(ScanlogError::Validation("cannot classify an empty code".to_string()));
        }

        let decision = tokio::time::timeout(self.settings.timeout, self.decider.decide(code, kind)).await;

        let status = match decision {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                tracing::warn!(decider = self.decider.description(), error = %e, "Decider failed");
                return Err(match e {
                    ScanlogError::ClassificationUnavailable(_) => e,
                    other => ScanlogError::ClassificationUnavailable(other.to_string()),
                });
            }
            Err(_) => {
                let timeout_ms = self.settings.timeout.as_millis() as u64;
                tracing::warn!(decider = self.decider.description(), timeout_ms, "Decider timed out");
                return Err(ScanlogError::ClassificationUnavailable(format!(
                    "decider did not answer within {}ms",
                    timeout_ms
                )));
            }
        };

        tracing::debug!(kind = %kind, status = %status, "Scan classified");
        Ok(ScanResult {
            status,
            code: code.to_string(),
            kind,
        })
    }
}
