use chrono::{Datelike, NaiveDate};

use crate::models::{Doctor, SchedulePattern};

/// Default pattern for a newly created doctor, round-robin over creation
/// order among active doctors so duty coverage stays balanced. An explicit
/// pattern supplied at creation time always wins over this default.
pub fn default_pattern_for_rank(active_doctor_ordinal: usize) -> SchedulePattern {
    if active_doctor_ordinal % 2 == 0 {
        SchedulePattern::Mwf
    } else {
        SchedulePattern::Tth
    }
}

/// Whether the doctor's recurring pattern puts them on duty for `date`.
/// Doctors without a pattern are never on duty by default.
pub fn is_on_duty_default(doctor: &Doctor, date: NaiveDate) -> bool {
    doctor
        .schedule_pattern
        .map_or(false, |pattern| pattern.includes(date.weekday()))
}

/// All active doctors whose pattern matches `date`, in roster order.
/// More than one match is possible and none are collapsed away; each
/// contributes availability independently.
pub fn on_duty_by_pattern<'a>(doctors: &'a [Doctor], date: NaiveDate) -> Vec<&'a Doctor> {
    doctors
        .iter()
        .filter(|doctor| doctor.is_active && is_on_duty_default(doctor, date))
        .collect()
}
