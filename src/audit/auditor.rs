//! Battery Auditor
//!
//! Runs a background task that records every drone's battery level once
//! per interval. A failed pass is logged and the loop carries on.

use super::session::{AuditPhase, AuditSession};
use crate::error::AuditError;
use crate::store::{BatteryHistoryStore, DroneStore};
use fleet_shared::{limits, now_ms, BatteryRecord};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

/// Periodically snapshots drone batteries into the history store
pub struct BatteryAuditor {
    drones: Arc<dyn DroneStore>,
    history: Arc<dyn BatteryHistoryStore>,
    session: Arc<AuditSession>,
    interval: Duration,
}

impl BatteryAuditor {
    pub fn new(
        drones: Arc<dyn DroneStore>,
        history: Arc<dyn BatteryHistoryStore>,
        session: Arc<AuditSession>,
    ) -> Self {
        Self {
            drones,
            history,
            session,
            interval: Duration::from_millis(limits::AUDIT_INTERVAL_MS),
        }
    }

    /// Override the pause between passes
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start the audit loop on its own task.
    ///
    /// The first pass runs immediately. Fails if the session already has a
    /// loop attached.
    pub fn start(self) -> Result<AuditorHandle, AuditError> {
        if !self.session.claim() {
            return Err(AuditError::AlreadyStarted);
        }

        let session = self.session.clone();
        let task = tokio::spawn(self.run());
        info!("[AUDIT] Battery auditor started");

        Ok(AuditorHandle { session, task })
    }

    async fn run(self) {
        let mut stop_rx = self.session.subscribe();
        let mut ticker = interval(self.interval);
        // Keep a full interval between passes even after a slow one
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.wait_for(|stop| *stop) => break,
                _ = ticker.tick() => {}
            }

            if self.session.stop_requested() {
                break;
            }

            self.session.set_phase(AuditPhase::Running);
            match self.run_pass().await {
                Ok(count) => info!("[AUDIT] Recorded battery levels for {} drone(s)", count),
                Err(e) => error!("[AUDIT] Pass failed, retrying next interval: {}", e),
            }

            if self.session.stop_requested() {
                self.session.set_phase(AuditPhase::Stopping);
                debug!("[AUDIT] Stop requested during pass, leaving audit loop");
                break;
            }
            self.session.set_phase(AuditPhase::Idle);

            debug!("[AUDIT] Sleeping {:?} until next pass", self.interval);
        }

        self.session.set_phase(AuditPhase::Stopped);
        info!("[AUDIT] Battery auditor stopped");
    }

    /// Execute one audit pass: one history record per drone.
    ///
    /// The pass is written as a single batch, so a failed pass leaves no
    /// partial records behind.
    pub async fn run_pass(&self) -> Result<usize, AuditError> {
        let audited_at_ms = now_ms();
        let records: Vec<BatteryRecord> = self
            .drones
            .list_all()
            .await?
            .into_iter()
            .map(|drone| {
                debug!("[AUDIT] {} at {}%", drone.serial_number, drone.battery_capacity);
                BatteryRecord {
                    serial_number: drone.serial_number,
                    battery_capacity: drone.battery_capacity,
                    audited_at_ms,
                }
            })
            .collect();

        let count = records.len();
        self.history.append_pass(records).await?;
        Ok(count)
    }
}

/// Handle to the running audit loop
pub struct AuditorHandle {
    session: Arc<AuditSession>,
    task: JoinHandle<()>,
}

impl AuditorHandle {
    pub fn session(&self) -> &Arc<AuditSession> {
        &self.session
    }

    /// Signal the loop to stop without waiting for it
    pub fn request_stop(&self) {
        self.session.request_stop();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop and wait until any in-flight pass has completed
    pub async fn stop(self) {
        self.request_stop();
        if self.session.audit_in_progress() {
            debug!("[AUDIT] Waiting for the running pass to finish");
        }
        if let Err(e) = self.task.await {
            error!("[AUDIT] Auditor task ended abnormally: {}", e);
        }
    }
}
