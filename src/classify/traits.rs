//! Decision collaborator interface.

use async_trait::async_trait;

use crate::domain::{ScanKind, ScanStatus};
use crate::error::Result;

/// Decides whether a scanned code is valid.
///
/// Implementations may suspend (e.g. ask a verification service). Any error
/// they return is reported to callers as `ClassificationUnavailable`; the
/// classifier never substitutes a status of its own.
#[async_trait]
pub trait Decider: Send + Sync {
    /// Decide the status of `code` scanned as `kind`.
    async fn decide(&self, code: &str, kind: ScanKind) -> Result<ScanStatus>;

    /// Get a description of this decision policy
    fn description(&self) -> &str {
        "decider"
    }
}
