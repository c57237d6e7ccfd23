//! Application layer: stage persistence and the session runtime.

pub mod persistence;
pub mod runtime;
