pub mod auth_service;
pub mod commands;
pub mod models;
pub mod period;
pub mod reading_service;
pub mod resident_service;
pub mod usage_ledger;

pub use auth_service::AuthService;
pub use period::Period;
pub use reading_service::ReadingService;
pub use resident_service::ResidentService;
pub use usage_ledger::UsageLedger;
