//! Dispatch engine - validates and executes fleet operations

use super::validation;
use crate::error::{DispatchError, StoreError, ValidationError};
use crate::store::{DroneStore, MedicationStore};
use bytes::Bytes;
use fleet_shared::state_machine::{self, CapacityCheck};
use fleet_shared::{Drone, DroneModel, DroneState, Medication};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{error, info, warn};

/// Registration request for a new drone
#[derive(Debug, Clone)]
pub struct RegisterDrone {
    pub serial_number: String,
    pub model: String,
    /// `None` takes the model's full capacity
    pub weight_limit: Option<u32>,
    pub battery_capacity: u32,
    /// Any lifecycle state name, case-insensitive
    pub state: String,
}

/// One medication of a load request, not yet assigned to a drone
#[derive(Debug, Clone)]
pub struct MedicationInput {
    pub name: String,
    pub code: String,
    pub weight: u32,
    pub image: Bytes,
}

/// Result of an accepted load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub serial_number: String,
    pub previous_state: DroneState,
    pub state: DroneState,
    /// Weight on board after the load, including earlier batches
    pub total_weight: u64,
    pub weight_limit: u32,
    pub loaded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryStatus {
    pub serial_number: String,
    pub model: DroneModel,
    pub battery_capacity: u32,
}

/// Executes dispatch operations against the drone and medication stores.
///
/// Loads onto the same drone run one at a time, from the availability
/// lookup through the state change; clones share those locks.
#[derive(Clone)]
pub struct DispatchEngine {
    drones: Arc<dyn DroneStore>,
    medications: Arc<dyn MedicationStore>,
    load_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl DispatchEngine {
    pub fn new(drones: Arc<dyn DroneStore>, medications: Arc<dyn MedicationStore>) -> Self {
        Self {
            drones,
            medications,
            load_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn lock_drone(&self, serial_number: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.load_locks.lock().await;
            locks.entry(serial_number.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Validate and persist a new drone
    pub async fn register_drone(&self, request: RegisterDrone) -> Result<Drone, DispatchError> {
        validation::validate_serial(&request.serial_number)?;
        let model = validation::parse_model(&request.model)?;
        let weight_limit = validation::resolve_weight_limit(model, request.weight_limit)?;
        validation::validate_battery(request.battery_capacity)?;
        let state = validation::parse_state(&request.state)?;

        if self.drones.find_by_serial(&request.serial_number).await?.is_some() {
            return Err(ValidationError::SerialNumberTaken(request.serial_number).into());
        }

        let drone = Drone {
            serial_number: request.serial_number,
            model,
            weight_limit,
            battery_capacity: request.battery_capacity,
            state,
        };

        match self.drones.create(drone.clone()).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration of the same serial
            Err(StoreError::AlreadyExists(serial)) => {
                return Err(ValidationError::SerialNumberTaken(serial).into());
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            "[DISPATCH] Registered drone {} ({}, limit {}, battery {}%, {})",
            drone.serial_number,
            drone.model.name(),
            drone.weight_limit,
            drone.battery_capacity,
            drone.state
        );
        Ok(drone)
    }

    /// Load a batch of medications onto a drone.
    ///
    /// The batch is all-or-nothing: any rejection leaves both stores exactly
    /// as they were.
    pub async fn load_drone(
        &self,
        serial_number: &str,
        batch: Vec<MedicationInput>,
    ) -> Result<LoadOutcome, DispatchError> {
        let _guard = self.lock_drone(serial_number).await;

        let drone = match self.drones.find_available_by_serial(serial_number).await? {
            Some(drone) => drone,
            None => {
                warn!("[DISPATCH] Drone {} not available/found", serial_number);
                return Err(DispatchError::DroneUnavailable(serial_number.to_string()));
            }
        };

        if !drone.has_operating_battery() {
            warn!(
                "[DISPATCH] Drone {} battery at {}%, refusing cargo",
                serial_number, drone.battery_capacity
            );
            return Err(DispatchError::BatteryTooLow {
                serial_number: drone.serial_number,
                battery: drone.battery_capacity,
            });
        }

        if batch.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let mut total_weight: u64 = 0;
        let mut codes = HashSet::with_capacity(batch.len());
        for med in &batch {
            if !validation::is_valid_medication_name(&med.name) {
                return Err(ValidationError::InvalidMedicationName(med.name.clone()).into());
            }
            if !validation::is_valid_medication_code(&med.code) {
                return Err(ValidationError::InvalidMedicationCode(med.code.clone()).into());
            }
            if !codes.insert(med.code.as_str()) {
                return Err(ValidationError::MedicationCodeTaken(med.code.clone()).into());
            }
            if med.weight == 0 {
                return Err(ValidationError::MedicationWeight {
                    code: med.code.clone(),
                }
                .into());
            }
            total_weight += u64::from(med.weight);
        }

        // A drone mid-loading already carries its earlier batches
        if drone.state == DroneState::Loading {
            total_weight += self.onboard_weight(&drone.serial_number).await?;
        }

        let check = CapacityCheck::of(total_weight, drone.weight_limit);
        let next = match check.event() {
            Some(event) => state_machine::next_state(drone.state, event),
            None => {
                warn!(
                    "[DISPATCH] Cargo of {} for drone {} exceeds limit {}",
                    total_weight, serial_number, drone.weight_limit
                );
                return Err(DispatchError::OverWeight {
                    total: total_weight,
                    limit: drone.weight_limit,
                });
            }
        };
        let Some(next) = next else {
            return Err(DispatchError::DroneUnavailable(serial_number.to_string()));
        };

        // Claim the drone first; a writer outside this engine may have moved it
        if !self
            .drones
            .transition(&drone.serial_number, drone.state, next)
            .await?
        {
            warn!(
                "[DISPATCH] Drone {} left {} before the load was applied",
                serial_number, drone.state
            );
            return Err(DispatchError::DroneUnavailable(serial_number.to_string()));
        }

        // Assign only once the batch is known to be accepted
        let loaded = batch.len();
        let medications = batch
            .into_iter()
            .map(|m| Medication {
                name: m.name,
                code: m.code,
                weight: m.weight,
                image: m.image,
                drone_serial_number: Some(drone.serial_number.clone()),
            })
            .collect();

        if let Err(e) = self.medications.save_batch(medications).await {
            self.release(&drone.serial_number, next, drone.state).await;
            return Err(match e {
                StoreError::AlreadyExists(code) => ValidationError::MedicationCodeTaken(code).into(),
                e => e.into(),
            });
        }

        info!(
            "[DISPATCH] Drone {} loaded with {} medication(s): {} -> {} ({}/{})",
            drone.serial_number, loaded, drone.state, next, total_weight, drone.weight_limit
        );

        Ok(LoadOutcome {
            serial_number: drone.serial_number,
            previous_state: drone.state,
            state: next,
            total_weight,
            weight_limit: drone.weight_limit,
            loaded,
        })
    }

    /// Undo a claimed transition after the batch could not be stored
    async fn release(&self, serial_number: &str, claimed: DroneState, previous: DroneState) {
        match self.drones.transition(serial_number, claimed, previous).await {
            Ok(true) => {}
            Ok(false) => error!(
                "[DISPATCH] Drone {} moved on from {} before it could be released",
                serial_number, claimed
            ),
            Err(e) => error!(
                "[DISPATCH] Drone {} stuck in {} after a failed load: {}",
                serial_number, claimed, e
            ),
        }
    }

    async fn onboard_weight(&self, serial_number: &str) -> Result<u64, DispatchError> {
        let onboard = self.medications.find_by_drone(serial_number).await?;
        Ok(onboard.iter().map(|m| u64::from(m.weight)).sum())
    }

    /// Every drone currently able to take cargo. An empty list is not an error.
    pub async fn available_drones(&self) -> Result<Vec<Drone>, DispatchError> {
        Ok(self.drones.find_available().await?)
    }

    pub async fn battery_level(&self, serial_number: &str) -> Result<BatteryStatus, DispatchError> {
        let drone = self
            .drones
            .find_by_serial(serial_number)
            .await?
            .ok_or_else(|| DispatchError::DroneNotFound(serial_number.to_string()))?;

        Ok(BatteryStatus {
            serial_number: drone.serial_number,
            model: drone.model,
            battery_capacity: drone.battery_capacity,
        })
    }

    /// Medications currently assigned to a drone
    pub async fn loaded_medications(
        &self,
        serial_number: &str,
    ) -> Result<Vec<Medication>, DispatchError> {
        if self.drones.find_by_serial(serial_number).await?.is_none() {
            return Err(DispatchError::DroneNotFound(serial_number.to_string()));
        }
        Ok(self.medications.find_by_drone(serial_number).await?)
    }
}
