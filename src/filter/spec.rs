//! Filter specification owned by the log view.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::domain::ScanStatus;
use crate::error::{Result, ScanlogError};

/// Which statuses to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Valid,
    Invalid,
}

impl StatusFilter {
    pub fn matches(self, status: ScanStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Valid => status == ScanStatus::Valid,
            StatusFilter::Invalid => status == ScanStatus::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Valid => "valid",
            StatusFilter::Invalid => "invalid",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ScanlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "valid" => Ok(StatusFilter::Valid),
            "invalid" => Ok(StatusFilter::Invalid),
            other => Err(ScanlogError::InvalidInput(format!("unknown status filter: {}", other))),
        }
    }
}

/// Date range relative to evaluation time.
///
/// `Week` and `Month` are sliding windows (7 and 30 days back from "now"),
/// not calendar weeks or months. `Today` is the same calendar day as "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateFilter {
    /// Length of the sliding window, if this filter is one.
    pub fn window(self) -> Option<TimeDelta> {
        match self {
            DateFilter::Week => Some(TimeDelta::days(7)),
            DateFilter::Month => Some(TimeDelta::days(30)),
            DateFilter::All | DateFilter::Today => None,
        }
    }

    pub fn matches(self, timestamp: NaiveDateTime, now: NaiveDateTime) -> bool {
        match (self, self.window()) {
            (DateFilter::Today, _) => timestamp.date() == now.date(),
            (_, Some(window)) => timestamp >= now - window,
            (_, None) => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateFilter::All => "all",
            DateFilter::Today => "today",
            DateFilter::Week => "week",
            DateFilter::Month => "month",
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFilter {
    type Err = ScanlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "week" => Ok(DateFilter::Week),
            "month" => Ok(DateFilter::Month),
            other => Err(ScanlogError::InvalidInput(format!("unknown date filter: {}", other))),
        }
    }
}

/// Search text plus status and date filters. The default shows everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Case-insensitive substring searched in code and descriptive fields
    pub query: String,
    pub status: StatusFilter,
    pub date: DateFilter,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }

    /// True when every entry passes.
    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty() && self.status == StatusFilter::All && self.date == DateFilter::All
    }
}
