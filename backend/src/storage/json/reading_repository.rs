use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use shared::MeterReading;

use super::{connection::JsonConnection, seed, READINGS_KEY};
use crate::storage::traits::ReadingStorage;

/// JSON-backed meter reading repository.
///
/// Owns the uniqueness invariant of the store: at most one reading per
/// (resident, month, year) triple. All mutation is whole-collection
/// read-modify-write under a single storage key.
#[derive(Clone)]
pub struct ReadingRepository {
    connection: Arc<JsonConnection>,
}

impl ReadingRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    /// Load the reading collection, seeding the historical demo dataset on
    /// the very first access of a fresh storage directory.
    fn load_collection(&self) -> Result<Vec<MeterReading>> {
        match self.connection.read_key(READINGS_KEY)? {
            Some(blob) => {
                let readings: Vec<MeterReading> = serde_json::from_str(&blob)?;
                debug!("Loaded {} readings", readings.len());
                Ok(readings)
            }
            None => {
                let readings = seed::historical_readings();
                self.save_collection(&readings)?;
                info!("Seeded {} historical readings", readings.len());
                Ok(readings)
            }
        }
    }

    fn save_collection(&self, readings: &[MeterReading]) -> Result<()> {
        let blob = serde_json::to_string(readings)?;
        self.connection.write_key(READINGS_KEY, &blob)
    }
}

impl ReadingStorage for ReadingRepository {
    fn list_readings(&self) -> Result<Vec<MeterReading>> {
        self.load_collection()
    }

    fn get_reading(&self, resident_id: &str, month: u32, year: i32) -> Result<Option<MeterReading>> {
        let readings = self.load_collection()?;
        Ok(readings
            .into_iter()
            .find(|r| r.resident_id == resident_id && r.month == month && r.year == year))
    }

    fn upsert_reading(
        &self,
        resident_id: &str,
        month: u32,
        year: i32,
        value: f64,
    ) -> Result<MeterReading> {
        let mut readings = self.load_collection()?;

        let stored = match readings
            .iter_mut()
            .find(|r| r.resident_id == resident_id && r.month == month && r.year == year)
        {
            Some(existing) => {
                // Same triple: replace the value in place, keep the id
                existing.value = value;
                info!(
                    "Replaced reading {} for resident {} at {}/{}",
                    existing.id, resident_id, month, year
                );
                existing.clone()
            }
            None => {
                let reading = MeterReading {
                    id: Uuid::new_v4().to_string(),
                    resident_id: resident_id.to_string(),
                    month,
                    year,
                    value,
                };
                readings.push(reading.clone());
                info!(
                    "Created reading {} for resident {} at {}/{}",
                    reading.id, resident_id, month, year
                );
                reading
            }
        };

        self.save_collection(&readings)?;
        Ok(stored)
    }

    fn delete_reading(&self, reading_id: &str) -> Result<bool> {
        let mut readings = self.load_collection()?;
        let before = readings.len();

        readings.retain(|r| r.id != reading_id);

        if readings.len() == before {
            warn!("Attempted to delete a non-existent reading: {}", reading_id);
            return Ok(false);
        }

        self.save_collection(&readings)?;
        info!("Deleted reading {}", reading_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (ReadingRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (ReadingRepository::new(Arc::new(connection)), temp_dir)
    }

    #[test]
    fn test_first_access_seeds_historical_readings() {
        let (repo, _temp_dir) = setup_test_repo();

        let readings = repo.list_readings().expect("Failed to list readings");
        assert!(!readings.is_empty());

        let again = repo.list_readings().unwrap();
        assert_eq!(again.len(), readings.len());
    }

    #[test]
    fn test_upsert_same_triple_keeps_id_and_replaces_value() {
        let (repo, _temp_dir) = setup_test_repo();

        let first = repo.upsert_reading("10", 5, 2025, 100.0).unwrap();
        let second = repo.upsert_reading("10", 5, 2025, 104.5).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.value, 104.5);

        let matching: Vec<_> = repo
            .list_readings()
            .unwrap()
            .into_iter()
            .filter(|r| r.resident_id == "10" && r.month == 5 && r.year == 2025)
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].value, 104.5);
    }

    #[test]
    fn test_upsert_different_triples_creates_distinct_readings() {
        let (repo, _temp_dir) = setup_test_repo();

        let june = repo.upsert_reading("10", 5, 2025, 100.0).unwrap();
        let july = repo.upsert_reading("10", 6, 2025, 110.0).unwrap();

        assert_ne!(june.id, july.id);
    }

    #[test]
    fn test_delete_missing_id_is_a_noop() {
        let (repo, _temp_dir) = setup_test_repo();

        let before = repo.list_readings().unwrap();
        let deleted = repo.delete_reading("no-such-id").unwrap();

        assert!(!deleted);
        assert_eq!(repo.list_readings().unwrap(), before);
    }

    #[test]
    fn test_delete_existing_reading() {
        let (repo, _temp_dir) = setup_test_repo();

        let reading = repo.upsert_reading("10", 5, 2025, 100.0).unwrap();
        let deleted = repo.delete_reading(&reading.id).unwrap();

        assert!(deleted);
        assert!(repo
            .list_readings()
            .unwrap()
            .iter()
            .all(|r| r.id != reading.id));
    }
}
