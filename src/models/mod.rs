pub mod config;
pub mod dose_time;
pub mod intake;
pub mod medication;
pub mod schedule;

pub use dose_time::DoseTime;
pub use intake::{IntakeLog, IntakeStatus};
pub use medication::Medication;
pub use schedule::{DaySet, Schedule};
