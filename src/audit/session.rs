//! Shared audit state, readable from any task

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tokio::sync::watch;

/// Where the auditor loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuditPhase {
    /// Waiting for the next pass
    Idle = 0,
    /// A pass is executing
    Running = 1,
    /// Stop observed, loop is winding down
    Stopping = 2,
    /// Loop has exited; there is no restart
    Stopped = 3,
}

impl AuditPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => AuditPhase::Running,
            2 => AuditPhase::Stopping,
            3 => AuditPhase::Stopped,
            _ => AuditPhase::Idle,
        }
    }
}

/// State shared between the auditor loop and whoever controls it.
///
/// Only the loop writes the phase; the stop signal can be raised from
/// anywhere and is delivered to the loop over a watch channel.
#[derive(Debug)]
pub struct AuditSession {
    phase: AtomicU8,
    claimed: AtomicBool,
    stop_tx: watch::Sender<bool>,
}

impl Default for AuditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSession {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            phase: AtomicU8::new(AuditPhase::Idle as u8),
            claimed: AtomicBool::new(false),
            stop_tx,
        }
    }

    pub fn phase(&self) -> AuditPhase {
        AuditPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// True while a pass is executing
    pub fn audit_in_progress(&self) -> bool {
        self.phase() == AuditPhase::Running
    }

    pub fn stop_requested(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Ask the loop to stop after any in-flight pass
    pub fn request_stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub(crate) fn set_phase(&self, phase: AuditPhase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Claim the session for one auditor loop; false if already claimed
    pub(crate) fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = AuditSession::new();
        assert_eq!(session.phase(), AuditPhase::Idle);
        assert!(!session.audit_in_progress());
        assert!(!session.stop_requested());
    }

    #[test]
    fn test_stop_request_visible_to_subscribers() {
        let session = AuditSession::new();
        let rx = session.subscribe();
        session.request_stop();
        assert!(session.stop_requested());
        assert!(*rx.borrow());
    }

    #[test]
    fn test_session_claimed_once() {
        let session = AuditSession::new();
        assert!(session.claim());
        assert!(!session.claim());
    }

    #[test]
    fn test_phase_roundtrip() {
        let session = AuditSession::new();
        session.set_phase(AuditPhase::Running);
        assert!(session.audit_in_progress());
        session.set_phase(AuditPhase::Stopped);
        assert_eq!(session.phase(), AuditPhase::Stopped);
    }
}
