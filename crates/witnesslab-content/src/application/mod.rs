//! Loading and validating authored episodes.

pub mod loader;
pub mod validation;
