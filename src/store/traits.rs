//! Store trait abstractions for pluggable persistence backends

use crate::error::StoreError;
use async_trait::async_trait;
use fleet_shared::{BatteryRecord, Drone, DroneState, Medication};

pub type StoreResult<T> = Result<T, StoreError>;

/// Registered drones, keyed by serial number
#[async_trait]
pub trait DroneStore: Send + Sync {
    /// Persist a new drone; fails with `AlreadyExists` on a duplicate serial
    async fn create(&self, drone: Drone) -> StoreResult<()>;

    /// All drones in a load-eligible state (IDLE or LOADING)
    async fn find_available(&self) -> StoreResult<Vec<Drone>>;

    /// The drone with this serial, only if it is in a load-eligible state
    async fn find_available_by_serial(&self, serial_number: &str) -> StoreResult<Option<Drone>>;

    async fn find_by_serial(&self, serial_number: &str) -> StoreResult<Option<Drone>>;

    /// Atomically overwrite the state of one drone
    async fn update_state(&self, serial_number: &str, state: DroneState) -> StoreResult<()>;

    /// Move a drone from `expected` to `next` in one atomic step.
    ///
    /// Returns `Ok(false)` and changes nothing if the drone is no longer in
    /// `expected`.
    async fn transition(
        &self,
        serial_number: &str,
        expected: DroneState,
        next: DroneState,
    ) -> StoreResult<bool>;

    /// Record a new battery reading for one drone
    async fn update_battery(&self, serial_number: &str, battery_capacity: u32) -> StoreResult<()>;

    async fn list_all(&self) -> StoreResult<Vec<Drone>>;
}

/// Medication records and their drone assignments
#[async_trait]
pub trait MedicationStore: Send + Sync {
    /// Persist every medication or none of them. A code that is already
    /// stored, or repeated within the batch, fails with `AlreadyExists(code)`.
    async fn save_batch(&self, medications: Vec<Medication>) -> StoreResult<()>;

    /// Medications assigned to the given drone
    async fn find_by_drone(&self, serial_number: &str) -> StoreResult<Vec<Medication>>;
}

/// Append-only log of battery audit records
#[async_trait]
pub trait BatteryHistoryStore: Send + Sync {
    async fn append(&self, record: BatteryRecord) -> StoreResult<()>;

    /// Append a whole audit pass, all records or none
    async fn append_pass(&self, records: Vec<BatteryRecord>) -> StoreResult<()>;
}
