//! Drone fleet dispatch service
//!
//! Registers drones, admits medication batches under battery and weight
//! limits, and records every drone's battery level on a fixed interval.
//! Requests arrive as framed envelopes over TCP (see [`server`]).

pub mod audit;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod seed;
pub mod server;
pub mod store;
