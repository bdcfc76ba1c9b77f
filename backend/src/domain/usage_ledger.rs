//! Usage derivation engine.
//!
//! Turns the raw cumulative readings into usage, billing, coverage and
//! ranking figures. This is the single place that knows how consumption is
//! derived; every reporting surface consumes these queries and none of
//! them re-derives usage on its own.
//!
//! The engine never raises domain errors: missing readings, missing
//! baselines, zero residents and negative deltas all resolve to
//! well-defined zero/flagged values, so reports always render. Only
//! storage failures propagate.

use anyhow::Result;
use std::sync::Arc;

use shared::{MeterReading, Resident, PRICE_PER_M3};

use crate::domain::models::usage::{
    DashboardSummary, PeriodSummary, ResidentUsageRow, TopConsumer, UsageRecord,
};
use crate::domain::period::Period;
use crate::storage::json::{JsonConnection, ReadingRepository, ResidentRepository};
use crate::storage::traits::{ReadingStorage, ResidentStorage};

/// Number of periods shown in the dashboard trend charts.
pub const ROLLING_WINDOW_LEN: usize = 12;

/// Pure query engine over the reading and resident collections. Owns no
/// data and keeps no cache; every query recomputes from storage.
#[derive(Clone)]
pub struct UsageLedger {
    reading_repository: ReadingRepository,
    resident_repository: ResidentRepository,
}

/// Find the reading for one (resident, period) pair in an already-loaded
/// collection.
fn reading_at<'a>(
    readings: &'a [MeterReading],
    resident_id: &str,
    period: Period,
) -> Option<&'a MeterReading> {
    readings
        .iter()
        .find(|r| r.resident_id == resident_id && r.month == period.month && r.year == period.year)
}

/// Derive the usage record for one resident at one period.
///
/// The baseline is the reading exactly one calendar month back; the lookup
/// never chains further through gaps. A negative delta (meter reset or
/// entry error) clamps to zero usage.
fn derive_usage(readings: &[MeterReading], resident_id: &str, period: Period) -> UsageRecord {
    let current = reading_at(readings, resident_id, period);
    let previous = reading_at(readings, resident_id, period.previous());

    let (usage, no_baseline) = match (current, previous) {
        (Some(current), Some(previous)) => ((current.value - previous.value).max(0.0), false),
        (Some(_), None) => (0.0, true),
        (None, _) => (0.0, false),
    };

    UsageRecord {
        resident_id: resident_id.to_string(),
        period,
        current: current.map(|r| r.value),
        usage,
        no_baseline,
        bill: usage * PRICE_PER_M3,
    }
}

impl UsageLedger {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            reading_repository: ReadingRepository::new(connection.clone()),
            resident_repository: ResidentRepository::new(connection),
        }
    }

    /// Usage and billing for one resident at one period.
    pub fn usage_for(&self, resident_id: &str, period: Period) -> Result<UsageRecord> {
        let readings = self.reading_repository.list_readings()?;
        Ok(derive_usage(&readings, resident_id, period))
    }

    /// Aggregate usage, revenue and coverage for one period.
    pub fn period_summary(&self, period: Period) -> Result<PeriodSummary> {
        let readings = self.reading_repository.list_readings()?;
        let residents = self.resident_repository.list_residents()?;
        Ok(summarize_period(&readings, &residents, period))
    }

    /// Per-period aggregates over a rolling window ending at `end`,
    /// oldest first.
    pub fn rolling_summary(&self, end: Period, len: usize) -> Result<Vec<PeriodSummary>> {
        let readings = self.reading_repository.list_readings()?;
        let residents = self.resident_repository.list_residents()?;

        Ok(Period::rolling_window(end, len)
            .into_iter()
            .map(|period| summarize_period(&readings, &residents, period))
            .collect())
    }

    /// The `k` residents with the highest usage in a period.
    ///
    /// Residents without a recorded reading for the period are excluded
    /// entirely, not ranked at zero. Ties keep registry order.
    pub fn top_consumers(&self, period: Period, k: usize) -> Result<Vec<TopConsumer>> {
        let readings = self.reading_repository.list_readings()?;
        let residents = self.resident_repository.list_residents()?;

        let mut ranked: Vec<TopConsumer> = residents
            .into_iter()
            .filter_map(|resident| {
                let record = derive_usage(&readings, &resident.id, period);
                record.recorded().then(|| TopConsumer {
                    resident,
                    usage: record.usage,
                })
            })
            .collect();

        // Stable sort keeps ties in registry order
        ranked.sort_by(|a, b| b.usage.total_cmp(&a.usage));
        ranked.truncate(k);
        Ok(ranked)
    }

    /// One table row per resident for a period, in registry order.
    pub fn resident_rows(&self, period: Period) -> Result<Vec<ResidentUsageRow>> {
        let readings = self.reading_repository.list_readings()?;
        let residents = self.resident_repository.list_residents()?;

        Ok(residents
            .into_iter()
            .map(|resident| {
                let record = derive_usage(&readings, &resident.id, period);
                let reading_id =
                    reading_at(&readings, &resident.id, period).map(|r| r.id.clone());
                ResidentUsageRow {
                    resident,
                    reading_id,
                    record,
                }
            })
            .collect())
    }

    /// Everything the dashboard shows, in one query.
    pub fn dashboard(&self, now: Period, top_k: usize) -> Result<DashboardSummary> {
        let readings = self.reading_repository.list_readings()?;
        let residents = self.resident_repository.list_residents()?;

        let monthly: Vec<PeriodSummary> = Period::rolling_window(now, ROLLING_WINDOW_LEN)
            .into_iter()
            .map(|period| summarize_period(&readings, &residents, period))
            .collect();

        let current = monthly
            .last()
            .cloned()
            .unwrap_or_else(|| summarize_period(&readings, &residents, now));

        let resident_count = residents.len();
        let average_usage = if resident_count == 0 {
            0.0
        } else {
            current.usage / resident_count as f64
        };

        Ok(DashboardSummary {
            current,
            resident_count,
            average_usage,
            monthly,
            top_consumers: self.top_consumers(now, top_k)?,
        })
    }
}

fn summarize_period(
    readings: &[MeterReading],
    residents: &[Resident],
    period: Period,
) -> PeriodSummary {
    let mut usage = 0.0;
    let mut recorded = 0usize;

    for resident in residents {
        let record = derive_usage(readings, &resident.id, period);
        usage += record.usage;
        if record.recorded() {
            recorded += 1;
        }
    }

    let coverage = if residents.is_empty() {
        0.0
    } else {
        recorded as f64 / residents.len() as f64
    };

    PeriodSummary {
        period,
        usage,
        revenue: usage * PRICE_PER_M3,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::readings::UpsertReadingCommand;
    use crate::domain::commands::residents::AddResidentCommand;
    use crate::domain::reading_service::ReadingService;
    use crate::domain::resident_service::ResidentService;
    use crate::storage::json::{READINGS_KEY, RESIDENTS_KEY};
    use tempfile::TempDir;

    struct Fixture {
        connection: Arc<JsonConnection>,
        ledger: UsageLedger,
        readings: ReadingService,
        residents: ResidentService,
        _temp_dir: TempDir,
    }

    /// Fixture over an empty store: seeding is bypassed by writing empty
    /// collections first, so tests control every record. The engine must
    /// behave identically whether data was seeded or not.
    fn empty_fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        connection.write_key(RESIDENTS_KEY, "[]").unwrap();
        connection.write_key(READINGS_KEY, "[]").unwrap();

        Fixture {
            connection: connection.clone(),
            ledger: UsageLedger::new(connection.clone()),
            readings: ReadingService::new(connection.clone()),
            residents: ResidentService::new(connection),
            _temp_dir: temp_dir,
        }
    }

    fn add_resident(fixture: &Fixture, house_number: &str, name: &str) -> String {
        fixture
            .residents
            .add_resident(AddResidentCommand {
                house_number: house_number.to_string(),
                name: name.to_string(),
            })
            .unwrap()
            .resident
            .id
    }

    fn record(fixture: &Fixture, resident_id: &str, month: u32, year: i32, value: f64) {
        fixture
            .readings
            .upsert_reading(UpsertReadingCommand {
                resident_id: resident_id.to_string(),
                month,
                year,
                value,
            })
            .unwrap();
    }

    #[test]
    fn test_usage_between_consecutive_months() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");
        record(&fixture, &id, 5, 2025, 100.0);
        record(&fixture, &id, 6, 2025, 130.0);

        let result = fixture.ledger.usage_for(&id, Period::new(6, 2025)).unwrap();
        assert_eq!(result.usage, 30.0);
        assert_eq!(result.bill, 90_000.0);
        assert!(!result.no_baseline);
        assert!(result.recorded());
    }

    #[test]
    fn test_single_reading_has_no_baseline() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");
        record(&fixture, &id, 6, 2025, 50.0);

        let result = fixture.ledger.usage_for(&id, Period::new(6, 2025)).unwrap();
        assert_eq!(result.usage, 0.0);
        assert_eq!(result.bill, 0.0);
        assert!(result.no_baseline);
        assert!(result.recorded());
    }

    #[test]
    fn test_no_baseline_is_distinct_from_recorded_zero_usage() {
        let fixture = empty_fixture();
        let flat = add_resident(&fixture, "B1", "P. Datar");
        let fresh = add_resident(&fixture, "B2", "P. Baru");

        record(&fixture, &flat, 5, 2025, 80.0);
        record(&fixture, &flat, 6, 2025, 80.0);
        record(&fixture, &fresh, 6, 2025, 80.0);

        let flat_record = fixture.ledger.usage_for(&flat, Period::new(6, 2025)).unwrap();
        let fresh_record = fixture.ledger.usage_for(&fresh, Period::new(6, 2025)).unwrap();

        assert_eq!(flat_record.usage, 0.0);
        assert_eq!(fresh_record.usage, 0.0);
        assert!(!flat_record.no_baseline);
        assert!(fresh_record.no_baseline);
    }

    #[test]
    fn test_january_baseline_is_december_of_previous_year() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");
        record(&fixture, &id, 11, 2024, 200.0);
        record(&fixture, &id, 0, 2025, 212.5);

        let result = fixture.ledger.usage_for(&id, Period::new(0, 2025)).unwrap();
        assert_eq!(result.usage, 12.5);
        assert!(!result.no_baseline);
    }

    #[test]
    fn test_baseline_lookup_does_not_bridge_gaps() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");
        // April recorded, May missing, June recorded
        record(&fixture, &id, 3, 2025, 100.0);
        record(&fixture, &id, 5, 2025, 140.0);

        // The April reading is never consulted as a fallback baseline
        let result = fixture.ledger.usage_for(&id, Period::new(5, 2025)).unwrap();
        assert_eq!(result.usage, 0.0);
        assert!(result.no_baseline);
    }

    #[test]
    fn test_negative_delta_clamps_to_zero() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");
        record(&fixture, &id, 5, 2025, 100.0);

        // Write the regression through the repository: the service's write
        // path rejects it, but historical data may still contain one.
        let repository = ReadingRepository::new(fixture.connection.clone());
        repository.upsert_reading(&id, 6, 2025, 40.0).unwrap();

        let result = fixture.ledger.usage_for(&id, Period::new(6, 2025)).unwrap();
        assert_eq!(result.usage, 0.0);
        assert_eq!(result.bill, 0.0);
        assert!(!result.no_baseline);
    }

    #[test]
    fn test_resident_with_no_readings_never_errors() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");

        let result = fixture.ledger.usage_for(&id, Period::new(6, 2025)).unwrap();
        assert!(!result.recorded());
        assert_eq!(result.usage, 0.0);
        assert!(!result.no_baseline);
    }

    #[test]
    fn test_period_summary_sums_usage_and_counts_coverage() {
        let fixture = empty_fixture();
        let a = add_resident(&fixture, "B1", "P. A");
        let b = add_resident(&fixture, "B2", "P. B");
        let _c = add_resident(&fixture, "B3", "P. C");

        record(&fixture, &a, 5, 2025, 100.0);
        record(&fixture, &a, 6, 2025, 130.0);
        record(&fixture, &b, 5, 2025, 50.0);
        record(&fixture, &b, 6, 2025, 60.0);
        // c has nothing recorded

        let summary = fixture.ledger.period_summary(Period::new(6, 2025)).unwrap();
        assert_eq!(summary.usage, 40.0);
        assert_eq!(summary.revenue, 40.0 * PRICE_PER_M3);
        assert!((summary.coverage - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_is_zero_with_no_residents() {
        let fixture = empty_fixture();

        let summary = fixture.ledger.period_summary(Period::new(6, 2025)).unwrap();
        assert_eq!(summary.coverage, 0.0);
        assert!(!summary.coverage.is_nan());

        let dashboard = fixture.ledger.dashboard(Period::new(6, 2025), 5).unwrap();
        assert_eq!(dashboard.average_usage, 0.0);
        assert_eq!(dashboard.resident_count, 0);
    }

    #[test]
    fn test_top_consumers_excludes_unrecorded_residents() {
        let fixture = empty_fixture();
        let a = add_resident(&fixture, "B1", "P. A");
        let b = add_resident(&fixture, "B2", "P. B");
        let c = add_resident(&fixture, "B3", "P. C");
        let _idle = add_resident(&fixture, "B4", "P. Kosong");

        for (id, previous, current) in [(&a, 10.0, 25.0), (&b, 10.0, 40.0), (&c, 10.0, 25.0)] {
            record(&fixture, id, 5, 2025, previous);
            record(&fixture, id, 6, 2025, current);
        }

        let ranked = fixture.ledger.top_consumers(Period::new(6, 2025), 5).unwrap();

        // The idle resident is excluded entirely, not ranked at zero
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].resident.id, b);
        assert_eq!(ranked[0].usage, 30.0);

        // a and c tie at 15.0; registry order breaks the tie
        assert_eq!(ranked[1].resident.id, a);
        assert_eq!(ranked[2].resident.id, c);

        let top_two = fixture.ledger.top_consumers(Period::new(6, 2025), 2).unwrap();
        assert_eq!(top_two.len(), 2);
    }

    #[test]
    fn test_rolling_summary_covers_the_requested_window() {
        let fixture = empty_fixture();
        let id = add_resident(&fixture, "B1", "P. Satu");
        record(&fixture, &id, 11, 2024, 100.0);
        record(&fixture, &id, 0, 2025, 110.0);
        record(&fixture, &id, 1, 2025, 125.0);

        let summaries = fixture
            .ledger
            .rolling_summary(Period::new(1, 2025), 12)
            .unwrap();

        assert_eq!(summaries.len(), 12);
        assert_eq!(summaries[0].period, Period::new(2, 2024));
        assert_eq!(summaries[11].period, Period::new(1, 2025));
        assert_eq!(summaries[11].usage, 15.0);
        assert_eq!(summaries[10].usage, 10.0);
        // December 2024 has a reading but no baseline
        assert_eq!(summaries[9].usage, 0.0);
    }

    #[test]
    fn test_resident_rows_expose_reading_ids_for_deletion() {
        let fixture = empty_fixture();
        let a = add_resident(&fixture, "B1", "P. A");
        let _b = add_resident(&fixture, "B2", "P. B");
        record(&fixture, &a, 6, 2025, 50.0);

        let rows = fixture.ledger.resident_rows(Period::new(6, 2025)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].reading_id.is_some());
        assert!(rows[1].reading_id.is_none());
        assert!(!rows[1].record.recorded());
    }

    #[test]
    fn test_dashboard_aggregates_come_from_one_query() {
        let fixture = empty_fixture();
        let a = add_resident(&fixture, "B1", "P. A");
        let _b = add_resident(&fixture, "B2", "P. B");
        record(&fixture, &a, 5, 2025, 100.0);
        record(&fixture, &a, 6, 2025, 120.0);

        let dashboard = fixture.ledger.dashboard(Period::new(6, 2025), 4).unwrap();

        assert_eq!(dashboard.current.usage, 20.0);
        assert_eq!(dashboard.current.revenue, 20.0 * PRICE_PER_M3);
        assert_eq!(dashboard.resident_count, 2);
        assert_eq!(dashboard.average_usage, 10.0);
        assert_eq!(dashboard.monthly.len(), ROLLING_WINDOW_LEN);
        assert_eq!(dashboard.monthly.last().unwrap(), &dashboard.current);
        assert_eq!(dashboard.top_consumers.len(), 1);
    }
}
