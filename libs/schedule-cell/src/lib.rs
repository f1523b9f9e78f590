pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::ScheduleError;
pub use models::*;
pub use services::*;
pub use store::{InMemoryOverrideStore, OverrideStore};
