use shared::MeterReading;

/// Record (or correct) the cumulative meter value for one resident in one
/// period.
#[derive(Debug, Clone)]
pub struct UpsertReadingCommand {
    pub resident_id: String,
    /// Calendar month, zero-based.
    pub month: u32,
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct UpsertReadingResult {
    pub reading: MeterReading,
}

#[derive(Debug, Clone)]
pub struct DeleteReadingCommand {
    pub reading_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteReadingResult {
    /// False when the id did not match any reading; that is not an error.
    pub deleted: bool,
}

#[derive(Debug, Clone)]
pub struct ListReadingsResult {
    pub readings: Vec<MeterReading>,
}
