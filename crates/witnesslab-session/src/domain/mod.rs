//! Domain layer: stage state, viewer actions, and the combined reducer.

pub mod actions;
pub mod stage;
pub mod viewer;
