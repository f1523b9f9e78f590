use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::models::{CreateOverrideRequest, ScheduleOverride, UpdateOverrideRequest};
use crate::store::OverrideStore;

/// Reference backend over an ordered in-memory map. The write lock makes
/// every mutation an atomic check-and-modify on the date key, and the
/// `BTreeMap` keeps range scans in ascending date order.
#[derive(Default)]
pub struct InMemoryOverrideStore {
    overrides: RwLock<BTreeMap<NaiveDate, ScheduleOverride>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_reason(reason: &str) -> Result<(), ScheduleError> {
    if reason.trim().is_empty() {
        return Err(ScheduleError::Validation(
            "Override reason must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn get_by_date(&self, date: NaiveDate) -> Result<Option<ScheduleOverride>, ScheduleError> {
        let overrides = self.overrides.read().await;
        Ok(overrides.get(&date).cloned())
    }

    async fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleOverride>, ScheduleError> {
        let overrides = self.overrides.read().await;
        Ok(overrides.range(start..=end).map(|(_, o)| o.clone()).collect())
    }

    async fn get_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<ScheduleOverride>, ScheduleError> {
        let overrides = self.overrides.read().await;
        Ok(overrides
            .values()
            .filter(|o| o.assigned_doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn get_by_dates(&self, dates: &[NaiveDate]) -> Result<Vec<ScheduleOverride>, ScheduleError> {
        let overrides = self.overrides.read().await;
        let mut found: Vec<ScheduleOverride> = dates
            .iter()
            .filter_map(|date| overrides.get(date).cloned())
            .collect();
        found.sort_by_key(|o| o.date);
        found.dedup_by_key(|o| o.date);
        Ok(found)
    }

    async fn create(&self, request: CreateOverrideRequest) -> Result<ScheduleOverride, ScheduleError> {
        validate_reason(&request.reason)?;

        let mut overrides = self.overrides.write().await;
        if overrides.contains_key(&request.date) {
            return Err(ScheduleError::DuplicateOverride(request.date));
        }

        let now = Utc::now();
        let override_entry = ScheduleOverride {
            id: Uuid::new_v4(),
            date: request.date,
            original_doctor_id: request.original_doctor_id,
            assigned_doctor_id: request.assigned_doctor_id,
            reason: request.reason,
            created_at: now,
            updated_at: now,
        };

        overrides.insert(request.date, override_entry.clone());
        debug!("Created schedule override for {}", override_entry.date);
        Ok(override_entry)
    }

    async fn update(
        &self,
        date: NaiveDate,
        request: UpdateOverrideRequest,
    ) -> Result<ScheduleOverride, ScheduleError> {
        if let Some(reason) = &request.reason {
            validate_reason(reason)?;
        }

        let mut overrides = self.overrides.write().await;
        let override_entry = overrides
            .get_mut(&date)
            .ok_or(ScheduleError::NotFound(date))?;

        if let Some(assigned_doctor_id) = request.assigned_doctor_id {
            override_entry.assigned_doctor_id = assigned_doctor_id;
        }
        if let Some(reason) = request.reason {
            override_entry.reason = reason;
        }
        override_entry.updated_at = Utc::now();

        debug!("Updated schedule override for {}", date);
        Ok(override_entry.clone())
    }

    async fn delete_by_date(&self, date: NaiveDate) -> Result<(), ScheduleError> {
        let mut overrides = self.overrides.write().await;
        match overrides.remove(&date) {
            Some(_) => {
                debug!("Deleted schedule override for {}", date);
                Ok(())
            }
            None => Err(ScheduleError::NotFound(date)),
        }
    }

    async fn exists_by_date(&self, date: NaiveDate) -> Result<bool, ScheduleError> {
        let overrides = self.overrides.read().await;
        Ok(overrides.contains_key(&date))
    }
}
