//! Demo fleet preloading

use crate::dispatch::{DispatchEngine, RegisterDrone};
use crate::error::{DispatchError, ValidationError};
use fleet_shared::{DroneModel, DroneState};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, warn};

pub const DEMO_SERIAL_LEN: usize = 7;

/// Model, battery level and state of each preloaded drone
const DEMO_FLEET: [(DroneModel, u32, DroneState); 4] = [
    (DroneModel::Light, 25, DroneState::Idle),
    (DroneModel::Middle, 30, DroneState::Delivering),
    (DroneModel::Cruiser, 50, DroneState::Loaded),
    (DroneModel::Heavy, 70, DroneState::Returning),
];

/// Random upper-case alphanumeric serial number
pub fn generate_serial(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

/// Register the demo fleet, returning how many drones were added
pub async fn seed_demo_fleet(engine: &DispatchEngine) -> Result<usize, DispatchError> {
    seed_with(engine, || generate_serial(DEMO_SERIAL_LEN)).await
}

async fn seed_with<F>(engine: &DispatchEngine, mut next_serial: F) -> Result<usize, DispatchError>
where
    F: FnMut() -> String,
{
    let mut added = 0;
    for (model, battery, state) in DEMO_FLEET {
        let serial_number = next_serial();
        let request = RegisterDrone {
            serial_number: serial_number.clone(),
            model: model.name().to_string(),
            weight_limit: None,
            battery_capacity: battery,
            state: state.as_str().to_string(),
        };

        match engine.register_drone(request).await {
            Ok(drone) => {
                info!(
                    "[SEED] Added {} {} (battery {}%, {})",
                    drone.model.name(),
                    drone.serial_number,
                    drone.battery_capacity,
                    drone.state
                );
                added += 1;
            }
            Err(DispatchError::Validation(ValidationError::SerialNumberTaken(_))) => {
                warn!("[SEED] Serial {} already registered, skipping", serial_number);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DroneStore, MemoryDroneStore, MemoryMedicationStore};
    use std::sync::Arc;

    fn engine() -> (DispatchEngine, Arc<MemoryDroneStore>) {
        let drones = Arc::new(MemoryDroneStore::new());
        let engine = DispatchEngine::new(drones.clone(), Arc::new(MemoryMedicationStore::new()));
        (engine, drones)
    }

    #[test]
    fn test_generated_serials() {
        let serial = generate_serial(DEMO_SERIAL_LEN);
        assert_eq!(serial.len(), DEMO_SERIAL_LEN);
        assert!(serial.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_demo_fleet_registered() {
        let (engine, drones) = engine();
        assert_eq!(seed_demo_fleet(&engine).await.unwrap(), 4);

        let all = drones.list_all().await.unwrap();
        assert_eq!(all.len(), 4);
        let heavy = all.iter().find(|d| d.model == DroneModel::Heavy).unwrap();
        assert_eq!(heavy.weight_limit, 500);
        assert_eq!(heavy.battery_capacity, 70);
        assert_eq!(heavy.state, DroneState::Returning);

        // Only the idle Lightweight drone is loadable
        let available = engine.available_drones().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].model, DroneModel::Light);
    }

    #[tokio::test]
    async fn test_existing_serials_skipped() {
        let (engine, drones) = engine();
        let serials = ["AAAAAAA", "BBBBBBB", "CCCCCCC", "DDDDDDD"];
        let mut first = serials.iter();
        seed_with(&engine, || first.next().unwrap().to_string()).await.unwrap();

        let mut again = ["AAAAAAA", "EEEEEEE", "CCCCCCC", "FFFFFFF"].into_iter();
        let added = seed_with(&engine, || again.next().unwrap().to_string()).await.unwrap();

        assert_eq!(added, 2);
        assert_eq!(drones.list_all().await.unwrap().len(), 6);
    }
}
