use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScheduleError;

/// Recurring weekly duty rule for a doctor.
///
/// Only two rotations exist: Monday/Wednesday/Friday and Tuesday/Thursday.
/// Doctors without a pattern are never on duty by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchedulePattern {
    Mwf,
    Tth,
}

impl SchedulePattern {
    /// Parse a pattern string, case-insensitively. Anything other than
    /// `MWF`/`TTH` is rejected rather than silently defaulted.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MWF" => Ok(SchedulePattern::Mwf),
            "TTH" => Ok(SchedulePattern::Tth),
            _ => Err(ScheduleError::InvalidPattern(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulePattern::Mwf => "MWF",
            SchedulePattern::Tth => "TTH",
        }
    }

    pub fn working_weekdays(&self) -> &'static [Weekday] {
        match self {
            SchedulePattern::Mwf => &[Weekday::Mon, Weekday::Wed, Weekday::Fri],
            SchedulePattern::Tth => &[Weekday::Tue, Weekday::Thu],
        }
    }

    pub fn includes(&self, weekday: Weekday) -> bool {
        self.working_weekdays().contains(&weekday)
    }
}

impl std::str::FromStr for SchedulePattern {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SchedulePattern::parse(raw)
    }
}

impl std::fmt::Display for SchedulePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Roster entry as supplied by the doctor roster provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub schedule_pattern: Option<SchedulePattern>,
    pub is_active: bool,
}

/// Manual correction of the on-duty doctor for exactly one calendar date.
/// At most one override exists per date; it supersedes pattern derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub id: Uuid,
    pub date: NaiveDate,
    pub original_doctor_id: Option<Uuid>,
    pub assigned_doctor_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOverrideRequest {
    pub date: NaiveDate,
    pub original_doctor_id: Option<Uuid>,
    pub assigned_doctor_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOverrideRequest {
    pub assigned_doctor_id: Option<Uuid>,
    pub reason: Option<String>,
}

/// Appointment-existence record as supplied by the appointment provider.
///
/// Date and time stay raw strings: a malformed record never matches a
/// generated slot and is ignored instead of failing the whole grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlot {
    pub doctor_id: Uuid,
    pub date: String,
    pub time: String,
}

/// One cell of the availability grid. Computed fresh on every query and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub is_available: bool,
    pub schedule_pattern: Option<SchedulePattern>,
}

/// Day-level duty block for calendar overview rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorScheduleBlock {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub appointment_count: usize,
    pub schedule_pattern: Option<SchedulePattern>,
}
