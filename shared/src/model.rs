//! Fleet domain model
//!
//! Drones, the medications they carry and the battery history written by
//! the auditor. The enums double as wire enumerations in [`crate::proto`].

use bytes::Bytes;

use crate::limits;

/// Weight class of a drone, fixing its maximum carry capacity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DroneModel {
    Light = 0,
    Middle = 1,
    Cruiser = 2,
    Heavy = 3,
}

impl DroneModel {
    pub const ALL: [DroneModel; 4] = [
        DroneModel::Light,
        DroneModel::Middle,
        DroneModel::Cruiser,
        DroneModel::Heavy,
    ];

    /// Maximum carry weight for this class
    pub fn capacity(self) -> u32 {
        match self {
            DroneModel::Light => limits::LIGHT_CAPACITY,
            DroneModel::Middle => limits::MIDDLE_CAPACITY,
            DroneModel::Cruiser => limits::CRUISER_CAPACITY,
            DroneModel::Heavy => limits::HEAVY_CAPACITY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DroneModel::Light => "Lightweight",
            DroneModel::Middle => "Middleweight",
            DroneModel::Cruiser => "Cruiserweight",
            DroneModel::Heavy => "Heavyweight",
        }
    }

    /// Parse a model name, accepting both the short ("light") and the long
    /// ("Lightweight") spelling in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_ascii_lowercase();
        let short = lower.strip_suffix("weight").unwrap_or(&lower);
        match short {
            "light" => Some(DroneModel::Light),
            "middle" => Some(DroneModel::Middle),
            "cruiser" => Some(DroneModel::Cruiser),
            "heavy" => Some(DroneModel::Heavy),
            _ => None,
        }
    }
}

/// Operational state of a drone
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DroneState {
    Idle = 0,
    Loading = 1,
    Loaded = 2,
    Delivering = 3,
    Delivered = 4,
    Returning = 5,
}

impl DroneState {
    pub const ALL: [DroneState; 6] = [
        DroneState::Idle,
        DroneState::Loading,
        DroneState::Loaded,
        DroneState::Delivering,
        DroneState::Delivered,
        DroneState::Returning,
    ];

    /// Upper-case name used in requests and logs
    pub fn as_str(self) -> &'static str {
        match self {
            DroneState::Idle => "IDLE",
            DroneState::Loading => "LOADING",
            DroneState::Loaded => "LOADED",
            DroneState::Delivering => "DELIVERING",
            DroneState::Delivered => "DELIVERED",
            DroneState::Returning => "RETURNING",
        }
    }

    /// Case-insensitive parse, normalised to the upper-case names
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|s| s.as_str() == upper)
    }
}

impl std::fmt::Display for DroneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered drone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drone {
    pub serial_number: String,
    pub model: DroneModel,
    pub weight_limit: u32,
    pub battery_capacity: u32,
    pub state: DroneState,
}

impl Drone {
    pub fn has_operating_battery(&self) -> bool {
        self.battery_capacity >= limits::MIN_BATTERY_PERCENT
    }
}

/// A medication item, optionally assigned to a drone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub code: String,
    pub weight: u32,
    pub image: Bytes,
    /// Set once the medication has been loaded onto a drone
    pub drone_serial_number: Option<String>,
}

/// Snapshot of one drone's battery taken by an audit pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryRecord {
    pub serial_number: String,
    pub battery_capacity: u32,
    pub audited_at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parse_is_case_insensitive() {
        assert_eq!(DroneState::parse("idle"), Some(DroneState::Idle));
        assert_eq!(DroneState::parse(" Loading "), Some(DroneState::Loading));
        assert_eq!(DroneState::parse("RETURNING"), Some(DroneState::Returning));
        assert_eq!(DroneState::parse("flying"), None);
    }

    #[test]
    fn test_model_parse_accepts_long_names() {
        assert_eq!(DroneModel::parse("Light"), Some(DroneModel::Light));
        assert_eq!(DroneModel::parse("Cruiserweight"), Some(DroneModel::Cruiser));
        assert_eq!(DroneModel::parse("HEAVYWEIGHT"), Some(DroneModel::Heavy));
        assert_eq!(DroneModel::parse("weight"), None);
        assert_eq!(DroneModel::parse("jumbo"), None);
    }

    #[test]
    fn test_operating_battery_floor() {
        let mut drone = Drone {
            serial_number: "SN001".into(),
            model: DroneModel::Light,
            weight_limit: 125,
            battery_capacity: 25,
            state: DroneState::Idle,
        };
        assert!(drone.has_operating_battery());
        drone.battery_capacity = 24;
        assert!(!drone.has_operating_battery());
    }
}
