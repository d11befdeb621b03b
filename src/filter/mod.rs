//! Filter engine: search, status and date filtering of the scan log, plus
//! dashboard summaries.

pub mod engine;
pub mod spec;
pub mod stats;

pub use engine::{apply, apply_at, matches, sort_for_display};
pub use spec::{DateFilter, FilterSpec, StatusFilter};
pub use stats::{ScanStats, recent};
