//! Witness Lab — Content bounded context.
//!
//! Owns everything authored ahead of time: episode documents and the
//! loaders that resolve them, the ordered stage registry, and the
//! bibliography consulted by the context panel. All of it is read-only at
//! runtime.

pub mod application;
pub mod domain;
