#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use dosewatch::core::reminder::{ReminderDispatcher, ReminderPayload};
use dosewatch::db::Database;
use dosewatch::error::Error;
use dosewatch::models::config::Config;
use dosewatch::models::dose_time::DoseTime;
use dosewatch::models::medication::Medication;
use dosewatch::models::schedule::Schedule;
use tempfile::TempDir;

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn ms(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    utc(y, mo, d, h, mi).timestamp_millis()
}

/// Insert a medication + forever schedule in one step, returning both.
pub fn seed_medication(db: &Database, name: &str) -> (Medication, Schedule) {
    let med = db
        .insert_medication(&Medication::new("local", "self", name))
        .unwrap();
    let schedule = Schedule::new(&med.id, "daily", "UTC");
    db.insert_schedule(&schedule).unwrap();
    (med, schedule)
}

/// Insert a dose time row directly (no recompute).
pub fn seed_dose_time(db: &Database, schedule_id: &str, time_local: &str) -> DoseTime {
    let dose = DoseTime::new(schedule_id, time_local);
    db.insert_dose_time(&dose).unwrap();
    dose
}

// ---------------------------------------------------------------------------
// Dispatcher fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    Arm {
        reminder_id: String,
        fires_at_ms: i64,
        payload: ReminderPayload,
    },
    Cancel {
        reminder_id: String,
    },
}

/// Records every arm/cancel call for assertions.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub events: Mutex<Vec<DispatchEvent>>,
}

impl RecordingDispatcher {
    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<DispatchEvent> {
        self.events.lock().unwrap().last().cloned()
    }
}

impl ReminderDispatcher for RecordingDispatcher {
    fn arm(&self, reminder_id: &str, fires_at_ms: i64, payload: &ReminderPayload) -> dosewatch::Result<()> {
        self.events.lock().unwrap().push(DispatchEvent::Arm {
            reminder_id: reminder_id.to_string(),
            fires_at_ms,
            payload: payload.clone(),
        });
        Ok(())
    }

    fn cancel(&self, reminder_id: &str) -> dosewatch::Result<()> {
        self.events.lock().unwrap().push(DispatchEvent::Cancel {
            reminder_id: reminder_id.to_string(),
        });
        Ok(())
    }
}

/// Fails every call, standing in for a platform layer that denied
/// notification permissions.
#[derive(Debug, Default)]
pub struct FailingDispatcher;

impl ReminderDispatcher for FailingDispatcher {
    fn arm(&self, reminder_id: &str, _fires_at_ms: i64, _payload: &ReminderPayload) -> dosewatch::Result<()> {
        Err(Error::Dispatch {
            reminder_id: reminder_id.to_string(),
            message: "permission denied".to_string(),
        })
    }

    fn cancel(&self, reminder_id: &str) -> dosewatch::Result<()> {
        Err(Error::Dispatch {
            reminder_id: reminder_id.to_string(),
            message: "permission denied".to_string(),
        })
    }
}
