//! Witness Lab — Stage orchestration and session runtime.
//!
//! `ViewerState` combines the episode run with stage progression behind a
//! single reducer. The session runtime owns that state in one task, applies
//! requests in arrival order, and runs the side effects the reducer must
//! not perform: pacing, persistence, telemetry, and episode loading.

pub mod application;
pub mod domain;
