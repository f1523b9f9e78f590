pub mod assignment;
pub mod availability;
pub mod hours;
pub mod slots;

pub use availability::AvailabilityService;
pub use hours::{ClinicHoursGate, Clock, SystemClock};
