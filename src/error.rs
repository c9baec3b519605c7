//! Error taxonomy of the dispatch service

use fleet_shared::FailureKind;
use thiserror::Error;

/// Failures raised by the storage collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

/// A malformed or out-of-range input field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("serial number must be 1-{max} characters, got {len}")]
    SerialNumber { len: usize, max: usize },

    #[error("serial number {0} is already registered")]
    SerialNumberTaken(String),

    #[error("unknown drone model: {0:?}")]
    Model(String),

    #[error("weight limit {value} is invalid (must be 1-{max})")]
    WeightLimit { value: u32, max: u32 },

    #[error("battery capacity {value} is outside {min}-{max}")]
    BatteryCapacity { value: u32, min: u32, max: u32 },

    #[error("unknown drone state: {0:?}")]
    State(String),

    #[error("medication batch is empty")]
    EmptyBatch,

    #[error("invalid medication name: {0:?}")]
    InvalidMedicationName(String),

    #[error("invalid medication code: {0:?}")]
    InvalidMedicationCode(String),

    #[error("medication code {0} is already in use")]
    MedicationCodeTaken(String),

    #[error("medication {code} has no weight")]
    MedicationWeight { code: String },
}

/// Failure of a dispatch operation, returned to the immediate caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("drone {0} is not available for loading")]
    DroneUnavailable(String),

    #[error("drone {serial_number} battery at {battery}% is below operating capacity")]
    BatteryTooLow { serial_number: String, battery: u32 },

    #[error("medications weigh {total}, drone carries at most {limit}")]
    OverWeight { total: u64, limit: u32 },

    #[error("drone {0} not found")]
    DroneNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DispatchError {
    /// Wire-level classification of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::Validation(_) => FailureKind::FailureValidation,
            DispatchError::DroneUnavailable(_) => FailureKind::FailureDroneUnavailable,
            DispatchError::BatteryTooLow { .. } => FailureKind::FailureBatteryTooLow,
            DispatchError::OverWeight { .. } => FailureKind::FailureOverWeight,
            DispatchError::DroneNotFound(_) => FailureKind::FailureNotFound,
            DispatchError::Store(_) => FailureKind::FailureStore,
        }
    }
}

/// Failures of the battery auditor lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("battery auditor already started")]
    AlreadyStarted,

    #[error("audit pass failed: {0}")]
    Store(#[from] StoreError),
}
