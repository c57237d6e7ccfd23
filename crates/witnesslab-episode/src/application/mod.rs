//! Observers of the episode run: persistence, feed projection, telemetry.

pub mod feed;
pub mod persistence;
pub mod telemetry;
