//! JSON key-value storage backend.
//!
//! Each collection lives under one fixed string key, serialized as a JSON
//! array and written to its own file under a base directory. All mutation
//! is whole-collection read-modify-write; writes are atomic per key.

mod connection;
mod reading_repository;
mod resident_repository;
mod seed;
mod session_repository;

pub use connection::JsonConnection;
pub use reading_repository::ReadingRepository;
pub use resident_repository::ResidentRepository;
pub use session_repository::SessionRepository;

/// Storage key for the resident collection.
pub const RESIDENTS_KEY: &str = "watermeter_residents";
/// Storage key for the meter reading collection.
pub const READINGS_KEY: &str = "watermeter_readings";
/// Storage key for the login session, separate from the ledger keys.
pub const AUTH_KEY: &str = "watermeter_auth";
