use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Clinic-wide scheduling configuration.
///
/// Booking hours are on-the-hour times between `open_hour` and
/// `last_booking_hour` inclusive, minus `excluded_hours` (lunch by default).
/// `close_hour` bounds mutating operations, not the booking grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicConfig {
    pub open_hour: u32,
    pub close_hour: u32,
    pub last_booking_hour: u32,
    pub excluded_hours: Vec<u32>,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            open_hour: 8,
            close_hour: 18,
            last_booking_hour: 17,
            excluded_hours: vec![12],
        }
    }
}

impl ClinicConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            open_hour: env_hour("CLINIC_OPEN_HOUR", defaults.open_hour),
            close_hour: env_hour("CLINIC_CLOSE_HOUR", defaults.close_hour),
            last_booking_hour: env_hour("CLINIC_LAST_BOOKING_HOUR", defaults.last_booking_hour),
            excluded_hours: env_hour_list("CLINIC_EXCLUDED_HOURS", defaults.excluded_hours),
        };

        if config.open_hour >= config.close_hour {
            warn!(
                "CLINIC_OPEN_HOUR ({}) is not before CLINIC_CLOSE_HOUR ({}), falling back to defaults",
                config.open_hour, config.close_hour
            );
            return Self::default();
        }

        config
    }
}

fn env_hour(name: &str, default: u32) -> u32 {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(hour) if hour < 24 => hour,
            _ => {
                warn!("{} has invalid value {:?}, using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_hour_list(name: &str, default: Vec<u32>) -> Vec<u32> {
    match env::var(name) {
        Ok(raw) => {
            let parsed: Option<Vec<u32>> = raw
                .split(',')
                .map(|part| part.trim().parse::<u32>().ok().filter(|h| *h < 24))
                .collect();
            match parsed {
                Some(hours) => hours,
                None => {
                    warn!("{} has invalid value {:?}, using {:?}", name, raw, default);
                    default
                }
            }
        }
        Err(_) => default,
    }
}
