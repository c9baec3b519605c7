//! Dispatch engine
//!
//! This module handles:
//! - Registering drones under the fleet's field constraints
//! - Admitting medication batches onto drones (battery floor, weight limit)
//! - Availability and battery level queries

mod engine;
pub mod validation;

pub use engine::{BatteryStatus, DispatchEngine, LoadOutcome, MedicationInput, RegisterDrone};
