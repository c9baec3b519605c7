//! In-memory store implementations
//!
//! Each store keeps its rows behind a single `RwLock`, so every trait call
//! is atomic with respect to the others on the same store.

use super::traits::{BatteryHistoryStore, DroneStore, MedicationStore, StoreResult};
use crate::error::StoreError;
use async_trait::async_trait;
use fleet_shared::{limits, state_machine, BatteryRecord, Drone, DroneState, Medication};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Drones keyed by serial number, iterated in serial order
#[derive(Clone, Default)]
pub struct MemoryDroneStore {
    drones: Arc<RwLock<BTreeMap<String, Drone>>>,
}

impl MemoryDroneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.drones.read().await.len()
    }
}

#[async_trait]
impl DroneStore for MemoryDroneStore {
    async fn create(&self, drone: Drone) -> StoreResult<()> {
        let mut drones = self.drones.write().await;
        if drones.contains_key(&drone.serial_number) {
            return Err(StoreError::AlreadyExists(drone.serial_number));
        }
        drones.insert(drone.serial_number.clone(), drone);
        Ok(())
    }

    async fn find_available(&self) -> StoreResult<Vec<Drone>> {
        let drones = self.drones.read().await;
        Ok(drones
            .values()
            .filter(|d| state_machine::is_load_eligible(d.state))
            .cloned()
            .collect())
    }

    async fn find_available_by_serial(&self, serial_number: &str) -> StoreResult<Option<Drone>> {
        let drones = self.drones.read().await;
        Ok(drones
            .get(serial_number)
            .filter(|d| state_machine::is_load_eligible(d.state))
            .cloned())
    }

    async fn find_by_serial(&self, serial_number: &str) -> StoreResult<Option<Drone>> {
        Ok(self.drones.read().await.get(serial_number).cloned())
    }

    async fn update_state(&self, serial_number: &str, state: DroneState) -> StoreResult<()> {
        let mut drones = self.drones.write().await;
        let drone = drones
            .get_mut(serial_number)
            .ok_or_else(|| StoreError::NotFound(serial_number.to_string()))?;
        drone.state = state;
        Ok(())
    }

    async fn transition(
        &self,
        serial_number: &str,
        expected: DroneState,
        next: DroneState,
    ) -> StoreResult<bool> {
        let mut drones = self.drones.write().await;
        let drone = drones
            .get_mut(serial_number)
            .ok_or_else(|| StoreError::NotFound(serial_number.to_string()))?;
        if drone.state != expected {
            return Ok(false);
        }
        drone.state = next;
        Ok(true)
    }

    async fn update_battery(&self, serial_number: &str, battery_capacity: u32) -> StoreResult<()> {
        let mut drones = self.drones.write().await;
        let drone = drones
            .get_mut(serial_number)
            .ok_or_else(|| StoreError::NotFound(serial_number.to_string()))?;
        drone.battery_capacity = battery_capacity.min(limits::MAX_BATTERY_PERCENT);
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<Drone>> {
        Ok(self.drones.read().await.values().cloned().collect())
    }
}

/// Medications in insertion order; codes are unique
#[derive(Clone, Default)]
pub struct MemoryMedicationStore {
    medications: Arc<RwLock<Vec<Medication>>>,
}

impl MemoryMedicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.medications.read().await.len()
    }
}

#[async_trait]
impl MedicationStore for MemoryMedicationStore {
    async fn save_batch(&self, batch: Vec<Medication>) -> StoreResult<()> {
        let mut medications = self.medications.write().await;

        // Check the whole batch before touching the rows
        let mut codes: HashSet<&str> = medications.iter().map(|m| m.code.as_str()).collect();
        for med in &batch {
            if !codes.insert(med.code.as_str()) {
                return Err(StoreError::AlreadyExists(med.code.clone()));
            }
        }

        medications.extend(batch);
        Ok(())
    }

    async fn find_by_drone(&self, serial_number: &str) -> StoreResult<Vec<Medication>> {
        let medications = self.medications.read().await;
        Ok(medications
            .iter()
            .filter(|m| m.drone_serial_number.as_deref() == Some(serial_number))
            .cloned()
            .collect())
    }
}

/// Battery history, append-only
#[derive(Clone, Default)]
pub struct MemoryHistoryStore {
    records: Arc<RwLock<Vec<BatteryRecord>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Records for one drone, oldest first
    pub async fn history_for(&self, serial_number: &str) -> Vec<BatteryRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.serial_number == serial_number)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BatteryHistoryStore for MemoryHistoryStore {
    async fn append(&self, record: BatteryRecord) -> StoreResult<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn append_pass(&self, records: Vec<BatteryRecord>) -> StoreResult<()> {
        self.records.write().await.extend(records);
        Ok(())
    }
}
