use chrono::{NaiveTime, Timelike};
use shared_config::ClinicConfig;

use crate::error::ScheduleError;

/// Anchor and cadence of the canonical slot numbering. These are fixed
/// constants rather than configuration: appointment creation and historical
/// backfill both number slots with this exact formula, and changing it
/// would renumber every stored appointment.
pub const SLOT_ANCHOR_HOUR: u32 = 8;
pub const SLOT_CADENCE_MINUTES: u32 = 15;

/// Convert a wall-clock time into its 1-based sequential slot index:
/// 08:00 is slot 1, 08:15 slot 2, 10:00 slot 9. Times before the anchor
/// and malformed input are rejected here so no caller ever sees a
/// non-positive slot number.
pub fn slot_number(time: &str) -> Result<u32, ScheduleError> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(time.to_string()))?;

    if parsed.hour() < SLOT_ANCHOR_HOUR {
        return Err(ScheduleError::InvalidTime(format!(
            "{} is before clinic opening ({:02}:00)",
            time, SLOT_ANCHOR_HOUR
        )));
    }

    let total_minutes = (parsed.hour() - SLOT_ANCHOR_HOUR) * 60 + parsed.minute();
    Ok(total_minutes / SLOT_CADENCE_MINUTES + 1)
}

/// The bookable times of one duty day, on the hour from opening through the
/// last booking hour, minus the configured exclusions (lunch by default).
pub fn booking_hours(config: &ClinicConfig) -> Vec<NaiveTime> {
    (config.open_hour..=config.last_booking_hour)
        .filter(|hour| !config.excluded_hours.contains(hour))
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

pub fn format_slot_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
