pub mod dashboard;
pub mod login;
pub mod meter_input;
pub mod residents;
pub mod sidebar;
