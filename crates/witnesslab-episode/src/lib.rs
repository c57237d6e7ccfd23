//! Witness Lab — Episode progression bounded context.
//!
//! Turns an authored episode into an ordered feed of events and replays it
//! one event at a time: prompts gate progression until answered, answers
//! build the witnessing profile, and reveals after an answered prompt are
//! rewritten by the reveal builder.

pub mod application;
pub mod domain;
