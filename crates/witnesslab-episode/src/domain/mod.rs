//! Event model, mapping, and the episode run reducer.

pub mod actions;
pub mod events;
pub mod mapper;
pub mod run;
