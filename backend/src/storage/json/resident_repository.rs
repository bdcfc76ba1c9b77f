use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;

use shared::Resident;

use super::{connection::JsonConnection, seed, RESIDENTS_KEY};
use crate::storage::traits::ResidentStorage;

/// JSON-backed resident repository. The whole collection lives under one
/// storage key and is replaced on every write.
#[derive(Clone)]
pub struct ResidentRepository {
    connection: Arc<JsonConnection>,
}

impl ResidentRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    /// Load the resident collection, seeding the built-in list on the very
    /// first access of a fresh storage directory.
    fn load_collection(&self) -> Result<Vec<Resident>> {
        match self.connection.read_key(RESIDENTS_KEY)? {
            Some(blob) => {
                let residents: Vec<Resident> = serde_json::from_str(&blob)?;
                debug!("Loaded {} residents", residents.len());
                Ok(residents)
            }
            None => {
                let residents = seed::default_residents();
                self.save_collection(&residents)?;
                info!("Seeded {} default residents", residents.len());
                Ok(residents)
            }
        }
    }

    fn save_collection(&self, residents: &[Resident]) -> Result<()> {
        let blob = serde_json::to_string(residents)?;
        self.connection.write_key(RESIDENTS_KEY, &blob)
    }
}

impl ResidentStorage for ResidentRepository {
    fn list_residents(&self) -> Result<Vec<Resident>> {
        self.load_collection()
    }

    fn get_resident(&self, resident_id: &str) -> Result<Option<Resident>> {
        let residents = self.load_collection()?;
        Ok(residents.into_iter().find(|r| r.id == resident_id))
    }

    fn store_resident(&self, resident: &Resident) -> Result<()> {
        let mut residents = self.load_collection()?;
        residents.push(resident.clone());
        self.save_collection(&residents)?;

        info!("Stored resident {} ({})", resident.name, resident.id);
        Ok(())
    }
}
