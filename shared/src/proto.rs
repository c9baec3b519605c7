//! Wire messages exchanged between dispatch clients and the service
//!
//! Declared directly with prost derives; every request travels inside an
//! [`Envelope`] and is answered by exactly one [`Response`].

use crate::model::{Drone, DroneModel, DroneState, Medication};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Envelope {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<Header>,
    #[prost(oneof = "envelope::Payload", tags = "2, 3, 4, 5, 6, 7")]
    pub payload: ::core::option::Option<envelope::Payload>,
}

pub mod envelope {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "2")]
        RegisterDrone(super::RegisterDrone),
        #[prost(message, tag = "3")]
        LoadDrone(super::LoadDrone),
        #[prost(message, tag = "4")]
        AvailableDrones(super::AvailableDrones),
        #[prost(message, tag = "5")]
        BatteryLevel(super::BatteryLevelQuery),
        #[prost(message, tag = "6")]
        LoadedMedications(super::LoadedMedications),
        #[prost(message, tag = "7")]
        Response(super::Response),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(string, tag = "1")]
    pub client_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub sequence_id: u64,
    #[prost(uint64, tag = "3")]
    pub timestamp_ms: u64,
    #[prost(enumeration = "MessageType", tag = "4")]
    pub msg_type: i32,
    /// Shared secret checked by the service before any operation runs
    #[prost(string, tag = "5")]
    pub api_key: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    MsgUnknown = 0,
    MsgRequest = 1,
    MsgResponse = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterDrone {
    #[prost(string, tag = "1")]
    pub serial_number: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub model: ::prost::alloc::string::String,
    /// Zero means "derive from the model"
    #[prost(uint32, tag = "3")]
    pub weight_limit: u32,
    #[prost(uint32, tag = "4")]
    pub battery_capacity: u32,
    #[prost(string, tag = "5")]
    pub state: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MedicationItem {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub code: ::prost::alloc::string::String,
    #[prost(uint32, tag = "3")]
    pub weight: u32,
    #[prost(bytes = "bytes", tag = "4")]
    pub image: ::prost::bytes::Bytes,
    /// Empty unless the medication is assigned to a drone
    #[prost(string, tag = "5")]
    pub drone_serial_number: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoadDrone {
    #[prost(string, tag = "1")]
    pub serial_number: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub medications: ::prost::alloc::vec::Vec<MedicationItem>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AvailableDrones {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatteryLevelQuery {
    #[prost(string, tag = "1")]
    pub serial_number: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoadedMedications {
    #[prost(string, tag = "1")]
    pub serial_number: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DroneInfo {
    #[prost(string, tag = "1")]
    pub serial_number: ::prost::alloc::string::String,
    #[prost(enumeration = "DroneModel", tag = "2")]
    pub model: i32,
    #[prost(uint32, tag = "3")]
    pub weight_limit: u32,
    #[prost(uint32, tag = "4")]
    pub battery_capacity: u32,
    #[prost(enumeration = "DroneState", tag = "5")]
    pub state: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatteryLevel {
    #[prost(string, tag = "1")]
    pub serial_number: ::prost::alloc::string::String,
    #[prost(enumeration = "DroneModel", tag = "2")]
    pub model: i32,
    #[prost(uint32, tag = "3")]
    pub battery_capacity: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(uint64, tag = "1")]
    pub ack_sequence_id: u64,
    #[prost(enumeration = "ResponseStatus", tag = "2")]
    pub status: i32,
    #[prost(enumeration = "FailureKind", tag = "3")]
    pub failure: i32,
    #[prost(string, tag = "4")]
    pub message: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "5")]
    pub drones: ::prost::alloc::vec::Vec<DroneInfo>,
    #[prost(message, optional, tag = "6")]
    pub battery: ::core::option::Option<BatteryLevel>,
    /// State a drone ended up in after a successful load
    #[prost(enumeration = "DroneState", tag = "7")]
    pub drone_state: i32,
    #[prost(message, repeated, tag = "8")]
    pub medications: ::prost::alloc::vec::Vec<MedicationItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseStatus {
    StatusUnknown = 0,
    Success = 1,
    Failed = 2,
    Unauthorized = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FailureKind {
    FailureNone = 0,
    FailureValidation = 1,
    FailureDroneUnavailable = 2,
    FailureBatteryTooLow = 3,
    FailureOverWeight = 4,
    FailureNotFound = 5,
    FailureStore = 6,
    FailureUnauthorized = 7,
    FailureMalformed = 8,
}

impl From<&Drone> for DroneInfo {
    fn from(drone: &Drone) -> Self {
        Self {
            serial_number: drone.serial_number.clone(),
            model: drone.model.into(),
            weight_limit: drone.weight_limit,
            battery_capacity: drone.battery_capacity,
            state: drone.state.into(),
        }
    }
}

impl From<&Medication> for MedicationItem {
    fn from(med: &Medication) -> Self {
        Self {
            name: med.name.clone(),
            code: med.code.clone(),
            weight: med.weight,
            image: med.image.clone(),
            drone_serial_number: med.drone_serial_number.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_drone_info_from_drone() {
        let drone = Drone {
            serial_number: "SN001".into(),
            model: DroneModel::Cruiser,
            weight_limit: 375,
            battery_capacity: 50,
            state: DroneState::Loaded,
        };
        let info = DroneInfo::from(&drone);
        assert_eq!(info.model(), DroneModel::Cruiser);
        assert_eq!(info.state(), DroneState::Loaded);
        assert_eq!(info.weight_limit, 375);
    }

    #[test]
    fn test_unassigned_medication_has_empty_serial() {
        let med = Medication {
            name: "PARA".into(),
            code: "PARA02".into(),
            weight: 65,
            image: Bytes::from_static(b"\x89PNG"),
            drone_serial_number: None,
        };
        let item = MedicationItem::from(&med);
        assert!(item.drone_serial_number.is_empty());
        assert_eq!(item.image.len(), 4);
    }
}
