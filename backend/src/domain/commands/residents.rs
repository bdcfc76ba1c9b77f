use shared::Resident;

/// Register a new resident.
#[derive(Debug, Clone)]
pub struct AddResidentCommand {
    pub house_number: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AddResidentResult {
    pub resident: Resident,
}

#[derive(Debug, Clone)]
pub struct ListResidentsResult {
    pub residents: Vec<Resident>,
}
