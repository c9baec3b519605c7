//! Field validation for dispatch requests

use crate::error::ValidationError;
use fleet_shared::{limits, DroneModel, DroneState};

pub fn validate_serial(serial_number: &str) -> Result<(), ValidationError> {
    let len = serial_number.chars().count();
    if serial_number.trim().is_empty() || len > limits::MAX_SERIAL_LEN {
        return Err(ValidationError::SerialNumber {
            len,
            max: limits::MAX_SERIAL_LEN,
        });
    }
    Ok(())
}

pub fn parse_model(raw: &str) -> Result<DroneModel, ValidationError> {
    DroneModel::parse(raw).ok_or_else(|| ValidationError::Model(raw.to_string()))
}

pub fn parse_state(raw: &str) -> Result<DroneState, ValidationError> {
    DroneState::parse(raw).ok_or_else(|| ValidationError::State(raw.to_string()))
}

/// Registration battery must be within the operating range
pub fn validate_battery(battery_capacity: u32) -> Result<(), ValidationError> {
    if !(limits::MIN_BATTERY_PERCENT..=limits::MAX_BATTERY_PERCENT).contains(&battery_capacity) {
        return Err(ValidationError::BatteryCapacity {
            value: battery_capacity,
            min: limits::MIN_BATTERY_PERCENT,
            max: limits::MAX_BATTERY_PERCENT,
        });
    }
    Ok(())
}

/// Weight limit for a new drone. `None` takes the model's capacity; an
/// explicit limit may not exceed it.
pub fn resolve_weight_limit(
    model: DroneModel,
    requested: Option<u32>,
) -> Result<u32, ValidationError> {
    let max = model.capacity().min(limits::MAX_WEIGHT_LIMIT);
    match requested {
        None => Ok(max),
        Some(value) if (1..=max).contains(&value) => Ok(value),
        Some(value) => Err(ValidationError::WeightLimit { value, max }),
    }
}

/// Letters, digits, `-` and `_`
pub fn is_valid_medication_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Upper-case letters, digits and `_`
pub fn is_valid_medication_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
