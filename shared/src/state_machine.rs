//! Drone Lifecycle State Machine
//!
//! Defines the valid state transitions of a drone and how the outcome of a
//! load operation maps onto them.

use crate::DroneState;

/// Events that can move a drone through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Cargo accepted, drone still has spare capacity
    LoadedUnderCapacity,
    /// Cargo accepted, drone is at exactly its weight limit
    LoadedAtCapacity,
    /// Drone left with its cargo
    DispatchStarted,
    /// Cargo handed over at the destination
    DeliveryCompleted,
    /// Drone heading back to base
    ReturnStarted,
    /// Drone back at base and ready for new cargo
    ReturnCompleted,
}

/// Result of a state transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition was valid, carries the new state
    Success(DroneState),
    /// Transition is not defined from the current state
    Invalid { from: DroneState, event: LifecycleEvent },
}

/// How a payload weight compares to a drone's weight limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityCheck {
    Under,
    Exact,
    Over,
}

impl CapacityCheck {
    /// Compare a total payload weight against a weight limit
    pub fn of(total_weight: u64, weight_limit: u32) -> Self {
        let limit = u64::from(weight_limit);
        match total_weight.cmp(&limit) {
            std::cmp::Ordering::Less => CapacityCheck::Under,
            std::cmp::Ordering::Equal => CapacityCheck::Exact,
            std::cmp::Ordering::Greater => CapacityCheck::Over,
        }
    }

    /// The lifecycle event an accepted load produces, `None` when rejected
    pub fn event(self) -> Option<LifecycleEvent> {
        match self {
            CapacityCheck::Under => Some(LifecycleEvent::LoadedUnderCapacity),
            CapacityCheck::Exact => Some(LifecycleEvent::LoadedAtCapacity),
            CapacityCheck::Over => None,
        }
    }
}

/// Drones in these states may receive cargo
pub fn is_load_eligible(state: DroneState) -> bool {
    matches!(state, DroneState::Idle | DroneState::Loading)
}

/// Get the next state for an event, if the transition is defined
pub fn next_state(from: DroneState, event: LifecycleEvent) -> Option<DroneState> {
    use DroneState::*;
    use LifecycleEvent::*;

    match (from, event) {
        // Loading is allowed from Idle and while already Loading
        (Idle | Loading, LoadedUnderCapacity) => Some(Loading),
        (Idle | Loading, LoadedAtCapacity) => Some(Loaded),

        // Flight lifecycle
        (Loaded, DispatchStarted) => Some(Delivering),
        (Delivering, DeliveryCompleted) => Some(Delivered),
        (Delivered, ReturnStarted) => Some(Returning),
        (Returning, ReturnCompleted) => Some(Idle),

        _ => None,
    }
}

/// Apply an event to a state
pub fn apply(from: DroneState, event: LifecycleEvent) -> TransitionResult {
    match next_state(from, event) {
        Some(state) => TransitionResult::Success(state),
        None => TransitionResult::Invalid { from, event },
    }
}

/// Check if a transition from one state to another is defined
pub fn is_valid_transition(from: DroneState, to: DroneState) -> bool {
    use DroneState::*;

    match (from, to) {
        // Further loads keep a drone in Loading
        (Loading, Loading) => true,

        (Idle, Loading) | (Idle, Loaded) => true,
        (Loading, Loaded) => true,
        (Loaded, Delivering) => true,
        (Delivering, Delivered) => true,
        (Delivered, Returning) => true,
        (Returning, Idle) => true,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_check_three_outcomes() {
        assert_eq!(CapacityCheck::of(499, 500), CapacityCheck::Under);
        assert_eq!(CapacityCheck::of(500, 500), CapacityCheck::Exact);
        assert_eq!(CapacityCheck::of(501, 500), CapacityCheck::Over);
        assert_eq!(CapacityCheck::Over.event(), None);
    }

    #[test]
    fn test_exact_capacity_loads_fully() {
        let event = CapacityCheck::of(125, 125).event().unwrap();
        assert_eq!(
            apply(DroneState::Idle, event),
            TransitionResult::Success(DroneState::Loaded)
        );
        assert_eq!(
            apply(DroneState::Loading, event),
            TransitionResult::Success(DroneState::Loaded)
        );
    }

    #[test]
    fn test_full_delivery_cycle() {
        let mut state = DroneState::Idle;
        for event in [
            LifecycleEvent::LoadedUnderCapacity,
            LifecycleEvent::LoadedAtCapacity,
            LifecycleEvent::DispatchStarted,
            LifecycleEvent::DeliveryCompleted,
            LifecycleEvent::ReturnStarted,
            LifecycleEvent::ReturnCompleted,
        ] {
            let next = next_state(state, event).expect("transition should be defined");
            assert!(is_valid_transition(state, next), "{state} -> {next}");
            state = next;
        }
        assert_eq!(state, DroneState::Idle);
    }

    #[test]
    fn test_no_loading_while_in_flight() {
        for state in [
            DroneState::Loaded,
            DroneState::Delivering,
            DroneState::Delivered,
            DroneState::Returning,
        ] {
            assert!(!is_load_eligible(state));
            assert!(matches!(
                apply(state, LifecycleEvent::LoadedUnderCapacity),
                TransitionResult::Invalid { .. }
            ));
        }
        assert!(is_load_eligible(DroneState::Idle));
        assert!(is_load_eligible(DroneState::Loading));
    }

    #[test]
    fn test_only_return_reenters_idle() {
        for from in DroneState::ALL {
            let ok = is_valid_transition(from, DroneState::Idle);
            assert_eq!(ok, from == DroneState::Returning, "{from} -> IDLE");
        }
    }
}
