//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different storage backends without modification. The shipped backend
//! persists JSON collections on disk; tests use the same backend pointed
//! at a temporary directory.

use anyhow::Result;
use shared::{AuthState, MeterReading, Resident};

/// Interface for resident storage operations.
///
/// The resident collection is append-only in the current scope: residents
/// are registered once and never updated or deleted.
pub trait ResidentStorage: Send + Sync {
    /// List all residents in insertion order.
    fn list_residents(&self) -> Result<Vec<Resident>>;

    /// Retrieve a specific resident by ID.
    fn get_resident(&self, resident_id: &str) -> Result<Option<Resident>>;

    /// Append a new resident and persist the full collection.
    fn store_resident(&self, resident: &Resident) -> Result<()>;
}

/// Interface for meter reading storage operations.
///
/// The reading store owns the uniqueness invariant: at most one reading
/// exists per (resident, month, year) triple.
pub trait ReadingStorage: Send + Sync {
    /// List all readings. Order is not guaranteed; callers sort if needed.
    fn list_readings(&self) -> Result<Vec<MeterReading>>;

    /// Find the reading for one (resident, month, year) triple.
    fn get_reading(&self, resident_id: &str, month: u32, year: i32) -> Result<Option<MeterReading>>;

    /// Insert a reading, or replace the value of the existing reading with
    /// the same (resident, month, year) triple while keeping its ID.
    /// Returns the stored record.
    fn upsert_reading(
        &self,
        resident_id: &str,
        month: u32,
        year: i32,
        value: f64,
    ) -> Result<MeterReading>;

    /// Delete a reading by ID.
    /// Returns true if the reading was found and deleted, false otherwise.
    fn delete_reading(&self, reading_id: &str) -> Result<bool>;
}

/// Interface for the persisted login session.
pub trait SessionStorage: Send + Sync {
    /// Load the persisted auth state, or the logged-out default when none
    /// has been stored yet.
    fn load_auth_state(&self) -> Result<AuthState>;

    /// Persist the auth state.
    fn store_auth_state(&self, state: &AuthState) -> Result<()>;
}
