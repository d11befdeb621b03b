//! Scan pipeline: raw events -> debouncer -> classifier -> log store.
//!
//! Camera reads go through the debouncer. Manual entry is a single
//! deliberate action, so it skips the debouncer but is classified the same
//! way.

use std::sync::Arc;

use crate::capture::{CaptureSettings, Debouncer};
use crate::classify::{Classifier, ClassifierSettings, Decider};
use crate::domain::{DiscardReason, LogEntry, NewEntry, RawScanEvent, ScanKind, ScanResult, SubmitOutcome};
use crate::error::Result;
use crate::storage::{LogSnapshot, LogStore};

/// Product name recorded on manually entered scans.
pub const DEFAULT_MANUAL_PRODUCT_NAME: &str = "Manually Added";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub capture: CaptureSettings,
    pub classifier: ClassifierSettings,
    /// Product name for manual entries; `None` leaves it empty
    pub manual_product_name: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            capture: CaptureSettings::default(),
            classifier: ClassifierSettings::default(),
            manual_product_name: Some(DEFAULT_MANUAL_PRODUCT_NAME.to_string()),
        }
    }
}

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Dropped by the debouncer. Expected and silent.
    Discarded(DiscardReason),
    /// Classified and stored.
    Logged { result: ScanResult, entry: LogEntry },
}

impl ScanOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, ScanOutcome::Logged { .. })
    }

    /// The classification to route to a valid/invalid presentation.
    pub fn result(&self) -> Option<&ScanResult> {
        match self {
            ScanOutcome::Logged { result, .. } => Some(result),
            ScanOutcome::Discarded(_) => None,
        }
    }

    pub fn entry(&self) -> Option<&LogEntry> {
        match self {
            ScanOutcome::Logged { entry, .. } => Some(entry),
            ScanOutcome::Discarded(_) => None,
        }
    }
}

pub struct ScanPipeline {
    debouncer: Debouncer,
    classifier: Classifier,
    store: Arc<LogStore>,
    manual_product_name: Option<String>,
}

impl std::fmt::Debug for ScanPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPipeline")
            .field("debouncer", &self.debouncer)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl ScanPipeline {
    /// Create a pipeline with a fresh, wall-clock stamped log.
    pub fn new(decider: Arc<dyn Decider>, settings: PipelineSettings) -> Self {
        Self::with_store(decider, settings, Arc::new(LogStore::new()))
    }

    /// Create a pipeline that appends to an existing log.
    pub fn with_store(decider: Arc<dyn Decider>, settings: PipelineSettings, store: Arc<LogStore>) -> Self {
        Self {
            debouncer: Debouncer::new(settings.capture),
            classifier: Classifier::new(decider, settings.classifier),
            store,
            manual_product_name: settings.manual_product_name,
        }
    }

    /// Handle one raw read pushed by the code reader.
    ///
    /// On `ClassificationUnavailable` nothing is logged and the session
    /// still settles normally.
    pub async fn on_raw_scan(&self, event: RawScanEvent) -> Result<ScanOutcome> {
        let accepted = match self.debouncer.submit(event)? {
            SubmitOutcome::Accepted(accepted) => accepted,
            SubmitOutcome::Discarded(reason) => return Ok(ScanOutcome::Discarded(reason)),
        };

        let result = self.classifier.classify_event(&accepted).await?;
        let entry = self.store.append(NewEntry::from_result(&result))?;
        Ok(ScanOutcome::Logged { result, entry })
    }

    /// Handle a code typed in by a person. Never discarded as a duplicate.
    ///
    /// Typed input is trimmed; camera reads are logged exactly as read.
    pub async fn submit_manual(&self, code: &str) -> Result<ScanOutcome> {
        let result = self.classifier.classify(code.trim(), ScanKind::Manual).await?;

        let mut input = NewEntry::from_result(&result);
        if let Some(name) = &self.manual_product_name {
            input = input.product_name(name.clone());
        }

        let entry = self.store.append(input)?;
        tracing::info!(id = %entry.id, "Manual scan added");
        Ok(ScanOutcome::Logged { result, entry })
    }

    /// The consumer re-entered the capture view: start a clean session.
    pub fn reset_capture(&self) -> Result<()> {
        self.debouncer.reset()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Current contents of the log in insertion order.
    pub fn snapshot(&self) -> Result<LogSnapshot> {
        self.store.all()
    }
}
