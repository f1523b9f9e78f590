use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use shared_config::ClinicConfig;
use tracing::debug;

use crate::error::ScheduleError;

/// Injectable time source so the gate stays testable; production code uses
/// [`SystemClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Gates mutating operations (lab test and prescription creation) on the
/// clinic's operating window `[open_hour, close_hour)`.
pub struct ClinicHoursGate {
    open_hour: u32,
    close_hour: u32,
    clock: Arc<dyn Clock>,
}

impl ClinicHoursGate {
    pub fn new(config: &ClinicConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ClinicConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            open_hour: config.open_hour,
            close_hour: config.close_hour,
            clock,
        }
    }

    pub fn is_within_hours(&self) -> bool {
        let hour = self.clock.now().hour();
        hour >= self.open_hour && hour < self.close_hour
    }

    /// Fails with `ClinicClosed` outside the operating window.
    pub fn ensure_open(&self) -> Result<(), ScheduleError> {
        let hour = self.clock.now().hour();
        if hour >= self.open_hour && hour < self.close_hour {
            Ok(())
        } else {
            debug!("Rejecting mutating operation at hour {}", hour);
            Err(ScheduleError::ClinicClosed {
                hour,
                open: self.open_hour,
                close: self.close_hour,
            })
        }
    }
}
