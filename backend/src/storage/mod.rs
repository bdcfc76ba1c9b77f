pub mod json;
pub mod traits;

pub use json::JsonConnection;
pub use traits::{ReadingStorage, ResidentStorage, SessionStorage};
