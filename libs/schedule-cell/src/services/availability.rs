use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use shared_config::ClinicConfig;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::models::{AvailabilitySlot, BookedSlot, Doctor, DoctorScheduleBlock, ScheduleOverride};
use crate::services::{assignment, slots};
use crate::store::OverrideStore;

/// Resolves who is on duty for a date (override first, pattern second) and
/// expands duty days into per-time availability grids. Everything here is
/// computed fresh on each call; appointment state changes externally and is
/// never cached.
pub struct AvailabilityService {
    store: Arc<dyn OverrideStore>,
    config: ClinicConfig,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn OverrideStore>, config: ClinicConfig) -> Self {
        Self { store, config }
    }

    /// The single on-duty doctor for `date`. An override wins regardless of
    /// the assignee's own pattern; otherwise the first active pattern match
    /// in roster order. When several doctors nominally match, prefer
    /// [`Self::resolve_on_duty_doctors`], which does not collapse them.
    pub async fn resolve_on_duty_doctor(
        &self,
        doctors: &[Doctor],
        date: NaiveDate,
    ) -> Result<Option<Doctor>, ScheduleError> {
        let override_entry = self.store.get_by_date(date).await?;
        Ok(self
            .on_duty_for_date(doctors, date, override_entry.as_ref())
            .first()
            .map(|doctor| (*doctor).clone()))
    }

    /// Every doctor on duty for `date`: the override assignee alone when an
    /// override exists, otherwise all active pattern matches in roster order.
    pub async fn resolve_on_duty_doctors(
        &self,
        doctors: &[Doctor],
        date: NaiveDate,
    ) -> Result<Vec<Doctor>, ScheduleError> {
        let override_entry = self.store.get_by_date(date).await?;
        Ok(self
            .on_duty_for_date(doctors, date, override_entry.as_ref())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Expand every on-duty (doctor, date) pair in the inclusive range into
    /// one slot per booking hour, marking a slot unavailable exactly when a
    /// booked appointment matches its doctor, date and time. Ordered
    /// date-major, then doctor, then time.
    pub async fn generate_availability_slots(
        &self,
        doctors: &[Doctor],
        start: NaiveDate,
        end: NaiveDate,
        booked: &[BookedSlot],
    ) -> Result<Vec<AvailabilitySlot>, ScheduleError> {
        debug!(
            "Generating availability slots for {} doctors from {} to {}",
            doctors.len(),
            start,
            end
        );

        if doctors.is_empty() {
            return Ok(Vec::new());
        }

        let overrides = self.overrides_by_date(start, end).await?;
        let times = slots::booking_hours(&self.config);
        let occupied: HashSet<(Uuid, &str, &str)> = booked
            .iter()
            .map(|slot| (slot.doctor_id, slot.date.as_str(), slot.time.as_str()))
            .collect();

        let mut grid = Vec::new();
        for date in dates_in_range(start, end) {
            let on_duty = self.on_duty_for_date(doctors, date, overrides.get(&date));
            if on_duty.is_empty() {
                continue;
            }

            let date_str = date.format("%Y-%m-%d").to_string();
            for doctor in on_duty {
                for time in &times {
                    let time_str = slots::format_slot_time(*time);
                    let is_available =
                        !occupied.contains(&(doctor.id, date_str.as_str(), time_str.as_str()));
                    grid.push(AvailabilitySlot {
                        doctor_id: doctor.id,
                        doctor_name: doctor.full_name.clone(),
                        date,
                        time: time_str,
                        is_available,
                        schedule_pattern: doctor.schedule_pattern,
                    });
                }
            }
        }

        debug!("Generated {} availability slots", grid.len());
        Ok(grid)
    }

    /// Day-level view for calendar overviews: one block per on-duty
    /// (doctor, date) pair with that date's appointment count, independent
    /// of specific time slots.
    pub async fn generate_doctor_schedule_blocks(
        &self,
        doctors: &[Doctor],
        start: NaiveDate,
        end: NaiveDate,
        booked: &[BookedSlot],
    ) -> Result<Vec<DoctorScheduleBlock>, ScheduleError> {
        debug!(
            "Generating schedule blocks for {} doctors from {} to {}",
            doctors.len(),
            start,
            end
        );

        if doctors.is_empty() {
            return Ok(Vec::new());
        }

        let overrides = self.overrides_by_date(start, end).await?;

        let mut counts: HashMap<(Uuid, &str), usize> = HashMap::new();
        for slot in booked {
            *counts.entry((slot.doctor_id, slot.date.as_str())).or_insert(0) += 1;
        }

        let mut blocks = Vec::new();
        for date in dates_in_range(start, end) {
            let date_str = date.format("%Y-%m-%d").to_string();
            for doctor in self.on_duty_for_date(doctors, date, overrides.get(&date)) {
                let appointment_count = counts
                    .get(&(doctor.id, date_str.as_str()))
                    .copied()
                    .unwrap_or(0);
                blocks.push(DoctorScheduleBlock {
                    doctor_id: doctor.id,
                    doctor_name: doctor.full_name.clone(),
                    date,
                    appointment_count,
                    schedule_pattern: doctor.schedule_pattern,
                });
            }
        }

        Ok(blocks)
    }

    // Private helper methods

    fn on_duty_for_date<'a>(
        &self,
        doctors: &'a [Doctor],
        date: NaiveDate,
        override_entry: Option<&ScheduleOverride>,
    ) -> Vec<&'a Doctor> {
        match override_entry {
            Some(override_entry) => {
                match doctors
                    .iter()
                    .find(|doctor| doctor.id == override_entry.assigned_doctor_id)
                {
                    Some(doctor) => vec![doctor],
                    None => {
                        // The override still supersedes the pattern; a
                        // missing assignee leaves the date uncovered.
                        warn!(
                            "Override for {} assigns doctor {} who is not in the roster",
                            date, override_entry.assigned_doctor_id
                        );
                        Vec::new()
                    }
                }
            }
            None => assignment::on_duty_by_pattern(doctors, date),
        }
    }

    async fn overrides_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<NaiveDate, ScheduleOverride>, ScheduleError> {
        let overrides = self.store.get_by_date_range(start, end).await?;
        Ok(overrides.into_iter().map(|o| (o.date, o)).collect())
    }
}

fn dates_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}
