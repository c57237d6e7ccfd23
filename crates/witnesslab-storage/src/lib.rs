//! Witness Lab — device-local persistence.
//!
//! Provides the SQLite-backed key-value store used for the persisted run
//! record and the capped, append-only telemetry log built on top of any
//! `KeyValueStore`.

pub mod schema;
pub mod sqlite_store;
pub mod telemetry_log;
