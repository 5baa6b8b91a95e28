//! Background Tasks Module
//!
//! Tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry Reaper: sweeps logically-expired cache entries and lock records
//!   at a configured interval

mod reaper;

pub use reaper::{ExpiryReaper, SWEEP_BATCH};
