//! Reading store: validated writes into the meter reading collection.
//!
//! Derivation over the stored readings lives in [`crate::domain::usage_ledger`];
//! this service owns the write path and its validation rules only.

use anyhow::Result;
use log::info;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::commands::readings::{
    DeleteReadingCommand, DeleteReadingResult, ListReadingsResult, UpsertReadingCommand,
    UpsertReadingResult,
};
use crate::domain::period::Period;
use crate::storage::json::{JsonConnection, ReadingRepository, ResidentRepository};
use crate::storage::traits::{ReadingStorage, ResidentStorage};

/// Why a reading write was rejected. Rejected writes never mutate the
/// store; the message is surfaced to the operator as-is.
#[derive(Debug, Error, PartialEq)]
pub enum ReadingValidationError {
    #[error("No resident selected")]
    MissingResident,
    #[error("Unknown resident: {0}")]
    UnknownResident(String),
    #[error("Month must be between 0 and 11, got {0}")]
    InvalidMonth(u32),
    #[error("Meter value must be a number")]
    NonFiniteValue,
    #[error("Meter value cannot be negative")]
    NegativeValue,
    #[error(
        "Meter value {submitted} is below last month's reading {previous}; \
         a cumulative meter cannot decrease"
    )]
    MeterRegression { previous: f64, submitted: f64 },
}

/// Service for recording and deleting meter readings.
#[derive(Clone)]
pub struct ReadingService {
    reading_repository: ReadingRepository,
    resident_repository: ResidentRepository,
}

impl ReadingService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            reading_repository: ReadingRepository::new(connection.clone()),
            resident_repository: ResidentRepository::new(connection),
        }
    }

    /// List all stored readings. Order is not guaranteed.
    pub fn list_readings(&self) -> Result<ListReadingsResult> {
        let readings = self.reading_repository.list_readings()?;
        Ok(ListReadingsResult { readings })
    }

    /// Insert or replace the reading for the command's (resident, month,
    /// year) triple. A replace keeps the existing reading id.
    pub fn upsert_reading(&self, command: UpsertReadingCommand) -> Result<UpsertReadingResult> {
        info!(
            "Upserting reading: resident={}, period={}/{}, value={}",
            command.resident_id, command.month, command.year, command.value
        );

        self.validate_upsert_command(&command)?;

        let reading = self.reading_repository.upsert_reading(
            &command.resident_id,
            command.month,
            command.year,
            command.value,
        )?;

        Ok(UpsertReadingResult { reading })
    }

    /// Delete a reading by id. A missing id is a no-op, not an error.
    pub fn delete_reading(&self, command: DeleteReadingCommand) -> Result<DeleteReadingResult> {
        let deleted = self.reading_repository.delete_reading(&command.reading_id)?;
        Ok(DeleteReadingResult { deleted })
    }

    fn validate_upsert_command(&self, command: &UpsertReadingCommand) -> Result<()> {
        if command.resident_id.trim().is_empty() {
            return Err(ReadingValidationError::MissingResident.into());
        }

        if self
            .resident_repository
            .get_resident(&command.resident_id)?
            .is_none()
        {
            return Err(
                ReadingValidationError::UnknownResident(command.resident_id.clone()).into(),
            );
        }

        if command.month > 11 {
            return Err(ReadingValidationError::InvalidMonth(command.month).into());
        }

        if !command.value.is_finite() {
            return Err(ReadingValidationError::NonFiniteValue.into());
        }

        if command.value < 0.0 {
            return Err(ReadingValidationError::NegativeValue.into());
        }

        // A cumulative indicator below last month's baseline is bad data;
        // reject outright rather than record a phantom zero-usage month.
        let previous = Period::new(command.month, command.year).previous();
        if let Some(baseline) = self.reading_repository.get_reading(
            &command.resident_id,
            previous.month,
            previous.year,
        )? {
            if command.value < baseline.value {
                return Err(ReadingValidationError::MeterRegression {
                    previous: baseline.value,
                    submitted: command.value,
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (ReadingService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (ReadingService::new(connection), temp_dir)
    }

    fn upsert(service: &ReadingService, resident_id: &str, month: u32, year: i32, value: f64) -> Result<UpsertReadingResult> {
        service.upsert_reading(UpsertReadingCommand {
            resident_id: resident_id.to_string(),
            month,
            year,
            value,
        })
    }

    #[test]
    fn test_upsert_twice_is_idempotent_with_stable_id() {
        let (service, _temp_dir) = create_test_service();

        let first = upsert(&service, "10", 5, 2025, 100.0).unwrap();
        let second = upsert(&service, "10", 5, 2025, 100.0).unwrap();

        assert_eq!(first.reading.id, second.reading.id);
        assert_eq!(second.reading.value, 100.0);

        let readings = service.list_readings().unwrap().readings;
        let matching = readings
            .iter()
            .filter(|r| r.resident_id == "10" && r.month == 5 && r.year == 2025)
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn test_upsert_rejects_unknown_resident() {
        let (service, _temp_dir) = create_test_service();

        let result = upsert(&service, "no-such-resident", 5, 2025, 100.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_upsert_rejects_invalid_month_and_negative_value() {
        let (service, _temp_dir) = create_test_service();

        assert!(upsert(&service, "10", 12, 2025, 100.0).is_err());
        assert!(upsert(&service, "10", 5, 2025, -1.0).is_err());
        assert!(upsert(&service, "10", 5, 2025, f64::NAN).is_err());
    }

    #[test]
    fn test_meter_regression_is_a_hard_rejection() {
        let (service, _temp_dir) = create_test_service();

        upsert(&service, "10", 5, 2025, 100.0).unwrap();
        let before = service.list_readings().unwrap().readings;

        let result = upsert(&service, "10", 6, 2025, 95.0);
        assert!(result.is_err());

        let error = result.unwrap_err();
        let validation = error.downcast_ref::<ReadingValidationError>().unwrap();
        assert_eq!(
            validation,
            &ReadingValidationError::MeterRegression {
                previous: 100.0,
                submitted: 95.0,
            }
        );

        // The rejected write left the store untouched
        assert_eq!(service.list_readings().unwrap().readings, before);
    }

    #[test]
    fn test_equal_value_is_not_a_regression() {
        let (service, _temp_dir) = create_test_service();

        upsert(&service, "10", 5, 2025, 100.0).unwrap();
        // Zero consumption months are legitimate
        assert!(upsert(&service, "10", 6, 2025, 100.0).is_ok());
    }

    #[test]
    fn test_regression_check_only_looks_one_month_back() {
        let (service, _temp_dir) = create_test_service();

        // Reading two months prior is never consulted as a fallback
        upsert(&service, "10", 3, 2025, 500.0).unwrap();
        assert!(upsert(&service, "10", 5, 2025, 100.0).is_ok());
    }

    #[test]
    fn test_delete_missing_reading_is_not_an_error() {
        let (service, _temp_dir) = create_test_service();

        let before = service.list_readings().unwrap().readings;
        let result = service
            .delete_reading(DeleteReadingCommand {
                reading_id: "no-such-id".to_string(),
            })
            .unwrap();

        assert!(!result.deleted);
        assert_eq!(service.list_readings().unwrap().readings, before);
    }
}
