//! Fleet Dispatch Shared Types
//!
//! This crate provides the domain model, the drone lifecycle rules and the
//! framed wire protocol shared by the dispatch service and its clients.

pub mod codec;
pub mod model;
pub mod proto;
pub mod state_machine;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-export commonly used types at crate root
pub use model::{BatteryRecord, Drone, DroneModel, DroneState, Medication};
pub use proto::*;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Operating limits for drones and payloads
pub mod limits {
    /// Maximum length of a drone serial number
    pub const MAX_SERIAL_LEN: usize = 100;

    /// Absolute carry capacity of any drone, in weight units
    pub const MAX_WEIGHT_LIMIT: u32 = 500;

    /// Minimum battery percentage a drone needs to accept new cargo
    pub const MIN_BATTERY_PERCENT: u32 = 25;

    /// Battery percentages are capped at 100
    pub const MAX_BATTERY_PERCENT: u32 = 100;

    /// Delay between two battery audit passes
    pub const AUDIT_INTERVAL_MS: u64 = 30_000;

    /// Carry capacity per model class
    pub const LIGHT_CAPACITY: u32 = 125;
    pub const MIDDLE_CAPACITY: u32 = 250;
    pub const CRUISER_CAPACITY: u32 = 375;
    pub const HEAVY_CAPACITY: u32 = 500;
}

/// Builder helpers for creating messages
impl Header {
    /// Create a new request header
    pub fn new(
        client_id: impl Into<String>,
        msg_type: MessageType,
        sequence_id: u64,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            sequence_id,
            timestamp_ms: now_ms(),
            msg_type: msg_type.into(),
            api_key: api_key.into(),
        }
    }
}

impl Response {
    /// Successful response for the request with the given sequence id
    pub fn success(ack_sequence_id: u64, message: impl Into<String>) -> Self {
        Self {
            ack_sequence_id,
            status: ResponseStatus::Success.into(),
            failure: FailureKind::FailureNone.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Failed response carrying the failure kind
    pub fn failed(ack_sequence_id: u64, failure: FailureKind, message: impl Into<String>) -> Self {
        Self {
            ack_sequence_id,
            status: ResponseStatus::Failed.into(),
            failure: failure.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Response for a request whose credentials were rejected
    pub fn unauthorized(ack_sequence_id: u64) -> Self {
        Self {
            ack_sequence_id,
            status: ResponseStatus::Unauthorized.into(),
            failure: FailureKind::FailureUnauthorized.into(),
            message: "Missing or invalid credentials".into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == i32::from(ResponseStatus::Success)
    }
}

impl Envelope {
    /// Wrap a payload into a request envelope
    pub fn request(header: Header, payload: envelope::Payload) -> Self {
        Self {
            header: Some(header),
            payload: Some(payload),
        }
    }

    /// Build the response envelope for a request
    pub fn response(server_id: &str, sequence_id: u64, response: Response) -> Self {
        Self {
            header: Some(Header::new(server_id, MessageType::MsgResponse, sequence_id, "")),
            payload: Some(envelope::Payload::Response(response)),
        }
    }
}
