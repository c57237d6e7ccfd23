//! Witness Lab Core — shared abstractions.
//!
//! This crate defines the traits and types every context depends on: time,
//! errors, the reducer contract, the device-local store, and the telemetry
//! sink. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod reducer;
pub mod store;
pub mod telemetry;
