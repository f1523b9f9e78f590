pub mod memory;

pub use memory::InMemoryOverrideStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::models::{CreateOverrideRequest, ScheduleOverride, UpdateOverrideRequest};

/// Canonical contract for persisted schedule overrides, keyed by calendar
/// date with at most one override per date. All other components read
/// overrides through this trait and never mutate them directly; backends
/// must make `create` an atomic check-and-insert per date so concurrent
/// creates resolve as one winner and one `DuplicateOverride`.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    async fn get_by_date(&self, date: NaiveDate) -> Result<Option<ScheduleOverride>, ScheduleError>;

    /// Overrides with `start <= date <= end`, ascending by date.
    async fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleOverride>, ScheduleError>;

    /// All overrides assigning the given doctor, ascending by date.
    async fn get_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<ScheduleOverride>, ScheduleError>;

    /// Bulk lookup for range queries without per-date round trips.
    async fn get_by_dates(&self, dates: &[NaiveDate]) -> Result<Vec<ScheduleOverride>, ScheduleError>;

    /// Fails with `DuplicateOverride` when the date already has an override;
    /// callers must update or delete the existing one instead.
    async fn create(&self, request: CreateOverrideRequest) -> Result<ScheduleOverride, ScheduleError>;

    /// Fails with `NotFound` when no override exists for the date.
    async fn update(
        &self,
        date: NaiveDate,
        request: UpdateOverrideRequest,
    ) -> Result<ScheduleOverride, ScheduleError>;

    /// Fails with `NotFound` when no override exists for the date.
    async fn delete_by_date(&self, date: NaiveDate) -> Result<(), ScheduleError>;

    async fn exists_by_date(&self, date: NaiveDate) -> Result<bool, ScheduleError>;
}
