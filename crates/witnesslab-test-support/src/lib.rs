//! Shared test doubles and utilities for the Witness Lab engine.

mod clock;
mod store;
mod telemetry;

pub use clock::{FixedClock, SteppingClock};
pub use store::{FailingStore, InMemoryStore};
pub use telemetry::RecordingTelemetrySink;
