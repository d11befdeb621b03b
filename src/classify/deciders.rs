//! Built-in decision policies.

use std::collections::HashSet;

use async_trait::async_trait;

use super::traits::Decider;
use crate::domain::{ScanKind, ScanStatus};
use crate::error::Result;

/// Always answers with the same status.
#[derive(Debug, Clone)]
pub struct StaticDecider {
    status: ScanStatus,
    description: String,
}

impl StaticDecider {
    pub fn new(status: ScanStatus) -> Self {
        Self {
            status,
            description: format!("always {}", status),
        }
    }

    pub fn accept_all() -> Self {
        Self::new(ScanStatus::Valid)
    }

    pub fn reject_all() -> Self {
        Self::new(ScanStatus::Invalid)
    }
}

#[async_trait]
impl Decider for StaticDecider {
    async fn decide(&self, _code: &str, _kind: ScanKind) -> Result<ScanStatus> {
        Ok(self.status)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Valid iff the code is on a known list. Exact match.
#[derive(Debug, Clone, Default)]
pub struct AllowListDecider {
    codes: HashSet<String>,
}

impl AllowListDecider {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a code to the list (builder pattern)
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.codes.insert(code.into());
        self
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[async_trait]
impl Decider for AllowListDecider {
    async fn decide(&self, code: &str, _kind: ScanKind) -> Result<ScanStatus> {
        if self.codes.contains(code) {
            Ok(ScanStatus::Valid)
        } else {
            Ok(ScanStatus::Invalid)
        }
    }

    fn description(&self) -> &str {
        "allow list"
    }
}
