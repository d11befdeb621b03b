//! Capture debouncing: one accepted scan per physical presentation of a code.

pub mod debouncer;
pub mod session;

pub use debouncer::{CaptureSettings, DEFAULT_SETTLE_DELAY, Debouncer};
pub use session::{CapturePhase, CaptureSession, CaptureStats, SettleTicket};
