//! Authored content shapes and static registries.

pub mod bibliography;
pub mod document;
pub mod stages;
