use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Price charged per cubic meter of water, in rupiah.
///
/// Fixed for the lifetime of the process; billing figures everywhere in the
/// app are derived from this single constant.
pub const PRICE_PER_M3: f64 = 3000.0;

/// Ordered month display names, indexed by the zero-based month stored on
/// each meter reading.
pub const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// A registered resident (one house unit on the water network).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    /// Resident ID. Seeded residents keep their fixed ids; residents added
    /// at runtime use the format "resident::<uuid>".
    pub id: String,
    /// House/block label, e.g. "B12". Display only, duplicates permitted.
    pub house_number: String,
    pub name: String,
}

/// One recorded cumulative meter value for one resident in one calendar
/// month. At most one reading exists per (resident, month, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub id: String,
    /// Weak reference to a resident; no cascading delete.
    pub resident_id: String,
    /// Calendar month, zero-based (0 = January, 11 = December).
    pub month: u32,
    pub year: i32,
    /// Cumulative meter indicator in cubic meters. Non-decreasing over time
    /// for a resident by convention; the store itself does not enforce it.
    pub value: f64,
}

/// Persisted login session. A restart of the app preserves the session
/// until explicit logout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub username: Option<String>,
}

impl Resident {
    /// Generate a fresh unique ID for a resident registered at runtime.
    /// Seeded residents keep their fixed ids and never use this format.
    pub fn generate_id() -> String {
        format!("resident::{}", Uuid::new_v4())
    }
}
