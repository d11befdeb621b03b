//! Classification of accepted scans through a pluggable decision policy.

pub mod classifier;
pub mod deciders;
pub mod traits;

pub use classifier::{Classifier, ClassifierSettings, DEFAULT_DECIDE_TIMEOUT};
pub use deciders::{AllowListDecider, StaticDecider};
pub use traits::Decider;
