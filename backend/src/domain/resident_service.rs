//! Resident registry: identity and seed data for everyone on the network.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use shared::Resident;

use crate::domain::commands::residents::{
    AddResidentCommand, AddResidentResult, ListResidentsResult,
};
use crate::storage::json::{JsonConnection, ResidentRepository};
use crate::storage::traits::ResidentStorage;

/// Service for managing the resident registry.
#[derive(Clone)]
pub struct ResidentService {
    resident_repository: ResidentRepository,
}

impl ResidentService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            resident_repository: ResidentRepository::new(connection),
        }
    }

    /// List all residents in insertion order.
    pub fn list_residents(&self) -> Result<ListResidentsResult> {
        let residents = self.resident_repository.list_residents()?;
        Ok(ListResidentsResult { residents })
    }

    /// Look up a single resident by id.
    pub fn get_resident(&self, resident_id: &str) -> Result<Option<Resident>> {
        self.resident_repository.get_resident(resident_id)
    }

    /// Register a new resident. House number and name must both be
    /// non-empty; duplicate house numbers are permitted.
    pub fn add_resident(&self, command: AddResidentCommand) -> Result<AddResidentResult> {
        info!(
            "Adding resident: house_number={}, name={}",
            command.house_number, command.name
        );

        self.validate_add_command(&command)?;

        let resident = Resident {
            id: Resident::generate_id(),
            house_number: command.house_number.trim().to_string(),
            name: command.name.trim().to_string(),
        };

        self.resident_repository.store_resident(&resident)?;

        info!("Added resident {} with ID: {}", resident.name, resident.id);

        Ok(AddResidentResult { resident })
    }

    fn validate_add_command(&self, command: &AddResidentCommand) -> Result<()> {
        if command.house_number.trim().is_empty() {
            return Err(anyhow::anyhow!("House number cannot be empty"));
        }

        if command.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Resident name cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (ResidentService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (ResidentService::new(connection), temp_dir)
    }

    #[test]
    fn test_add_resident_appends_to_registry() {
        let (service, _temp_dir) = create_test_service();

        let result = service
            .add_resident(AddResidentCommand {
                house_number: "B30".to_string(),
                name: "P. Baru".to_string(),
            })
            .expect("Failed to add resident");

        assert_eq!(result.resident.house_number, "B30");
        assert!(result.resident.id.starts_with("resident::"));

        let residents = service.list_residents().unwrap().residents;
        assert_eq!(residents.last().unwrap(), &result.resident);
    }

    #[test]
    fn test_add_resident_rejects_empty_fields() {
        let (service, _temp_dir) = create_test_service();
        let before = service.list_residents().unwrap().residents;

        let no_house = service.add_resident(AddResidentCommand {
            house_number: "   ".to_string(),
            name: "P. Baru".to_string(),
        });
        assert!(no_house.is_err());

        let no_name = service.add_resident(AddResidentCommand {
            house_number: "B30".to_string(),
            name: "".to_string(),
        });
        assert!(no_name.is_err());

        // Rejected writes leave the registry untouched
        assert_eq!(service.list_residents().unwrap().residents, before);
    }

    #[test]
    fn test_duplicate_house_numbers_are_permitted() {
        let (service, _temp_dir) = create_test_service();

        service
            .add_resident(AddResidentCommand {
                house_number: "B1".to_string(),
                name: "P. Kedua".to_string(),
            })
            .expect("Duplicate house number should be accepted");

        let residents = service.list_residents().unwrap().residents;
        let b1_count = residents.iter().filter(|r| r.house_number == "B1").count();
        assert_eq!(b1_count, 2);
    }
}
