//! Witness Lab — Witnessing bounded context.
//!
//! The closed taxonomy of witnessing behaviours, the reveal builder that
//! turns an answered prompt into an insight, and the running profile of
//! chosen tags.

pub mod profile;
pub mod reveal;
pub mod taxonomy;
