use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid schedule pattern: {0}")]
    InvalidPattern(String),

    #[error("Schedule override already exists for {0}")]
    DuplicateOverride(NaiveDate),

    #[error("No schedule override found for {0}")]
    NotFound(NaiveDate),

    #[error("Clinic is closed: hour {hour} is outside operating hours {open}:00-{close}:00")]
    ClinicClosed { hour: u32, open: u32, close: u32 },

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}
