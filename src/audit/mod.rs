//! Battery audit
//!
//! A single background task snapshots every drone's battery level into the
//! history store at a fixed interval until asked to stop.

mod auditor;
mod session;

pub use auditor::{AuditorHandle, BatteryAuditor};
pub use session::{AuditPhase, AuditSession};
