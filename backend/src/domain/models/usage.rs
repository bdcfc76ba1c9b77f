//! Derived usage records. Nothing in this module is ever stored; every
//! value is recomputed from the reading and resident collections on demand.

use serde::{Deserialize, Serialize};
use shared::Resident;

use crate::domain::period::Period;

/// Usage and billing for one resident in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub resident_id: String,
    pub period: Period,
    /// The cumulative meter value recorded for the period, if any.
    pub current: Option<f64>,
    /// Consumption derived against the previous-period baseline, clamped
    /// to zero. Zero both when nothing was consumed and when no baseline
    /// exists; `no_baseline` tells the two apart.
    pub usage: f64,
    /// True when the period has a reading but the immediately preceding
    /// period does not.
    pub no_baseline: bool,
    pub bill: f64,
}

impl UsageRecord {
    /// Whether a reading was recorded for the period at all.
    pub fn recorded(&self) -> bool {
        self.current.is_some()
    }
}

/// Aggregate figures for one period across all residents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    /// Sum of per-reading usage for the period.
    pub usage: f64,
    pub revenue: f64,
    /// Fraction of residents with a recorded reading, in [0, 1].
    /// Defined as 0 when there are no residents.
    pub coverage: f64,
}

/// One entry in the top-consumers ranking for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopConsumer {
    pub resident: Resident,
    pub usage: f64,
}

/// One row of the per-resident reading table for a period: the resident,
/// their reading for the period (if any, with its id so the row can be
/// deleted), and the derived usage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentUsageRow {
    pub resident: Resident,
    pub reading_id: Option<String>,
    pub record: UsageRecord,
}

/// Everything the dashboard renders, computed in one query so no view
/// re-derives usage on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Aggregates for the current period.
    pub current: PeriodSummary,
    pub resident_count: usize,
    /// Current-period usage divided by resident count, 0 when there are
    /// no residents.
    pub average_usage: f64,
    /// Rolling window of per-period aggregates, oldest first.
    pub monthly: Vec<PeriodSummary>,
    pub top_consumers: Vec<TopConsumer>,
}
