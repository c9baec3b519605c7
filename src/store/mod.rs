//! Storage collaborators
//!
//! The dispatch engine and the battery auditor only see these traits; the
//! in-memory implementations back the service binary and the tests.

mod memory;
mod traits;

pub use memory::{MemoryDroneStore, MemoryHistoryStore, MemoryMedicationStore};
pub use traits::{BatteryHistoryStore, DroneStore, MedicationStore};
