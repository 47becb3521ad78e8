//! Write-time orchestration: recompute a dose time's trigger, persist the
//! snapshot, then tell the platform reminder layer about it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::trigger::compute_next_trigger;
use crate::db::Database;
use crate::error::Result;
use crate::models::dose_time::DoseTime;
use crate::models::schedule::Schedule;

// ---------------------------------------------------------------------------
// ReminderDispatcher
// ---------------------------------------------------------------------------

/// Payload carried by an armed reminder so the notification handler can
/// find its way back to the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderPayload {
    pub medication_id: String,
    pub schedule_id: String,
    pub dose_time_id: String,
}

/// The platform notification layer. Both calls are idempotent: re-arming
/// an id replaces the prior registration, cancelling an unknown id is a
/// no-op. Implementations live outside this crate; the CLI wires in a
/// logging stand-in and tests a recording fake.
pub trait ReminderDispatcher {
    fn arm(&self, reminder_id: &str, fires_at_ms: i64, payload: &ReminderPayload) -> Result<()>;
    fn cancel(&self, reminder_id: &str) -> Result<()>;
}

/// Dispatcher that only traces. Used where no OS notification layer is
/// attached; the persisted schedule state stays authoritative either way.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl ReminderDispatcher for LogDispatcher {
    fn arm(&self, reminder_id: &str, fires_at_ms: i64, payload: &ReminderPayload) -> Result<()> {
        debug!(
            reminder_id,
            fires_at_ms,
            medication_id = %payload.medication_id,
            "arm reminder"
        );
        Ok(())
    }

    fn cancel(&self, reminder_id: &str) -> Result<()> {
        debug!(reminder_id, "cancel reminder");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ReminderCoordinator
// ---------------------------------------------------------------------------

/// Keeps stored `next_trigger_ts` snapshots and platform reminders in step
/// with the data. One reminder id per dose time (the dose time's own id).
pub struct ReminderCoordinator<'a, D: ReminderDispatcher> {
    db: &'a Database,
    dispatcher: &'a D,
}

impl<'a, D: ReminderDispatcher> ReminderCoordinator<'a, D> {
    pub fn new(db: &'a Database, dispatcher: &'a D) -> Self {
        Self { db, dispatcher }
    }

    /// Recompute one dose time after a write, persist the snapshot, and
    /// (re)arm or cancel the platform reminder. Dispatcher failures are
    /// logged and never unwind the persisted value.
    pub fn recompute_dose_time(
        &self,
        schedule: &Schedule,
        dose: &DoseTime,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>> {
        let next = compute_next_trigger(schedule, dose, now)?;
        self.db.set_next_trigger(&dose.id, next)?;

        match next {
            Some(fires_at_ms) if schedule.reminder_enabled => {
                let payload = ReminderPayload {
                    medication_id: schedule.medication_id.clone(),
                    schedule_id: schedule.id.clone(),
                    dose_time_id: dose.id.clone(),
                };
                if let Err(e) = self.dispatcher.arm(&dose.id, fires_at_ms, &payload) {
                    warn!(dose_time_id = %dose.id, error = %e, "failed to arm reminder");
                }
            }
            _ => {
                if let Err(e) = self.dispatcher.cancel(&dose.id) {
                    warn!(dose_time_id = %dose.id, error = %e, "failed to cancel reminder");
                }
            }
        }
        Ok(next)
    }

    /// Recompute every dose time under a schedule. Returns the dose times
    /// with their refreshed snapshots.
    pub fn recompute_schedule(
        &self,
        schedule: &Schedule,
        now: DateTime<Utc>,
    ) -> Result<Vec<DoseTime>> {
        let mut times = self.db.list_dose_times_by_schedule(&schedule.id)?;
        for dose in &mut times {
            dose.next_trigger_ts = self.recompute_dose_time(schedule, dose, now)?;
        }
        Ok(times)
    }

    fn cancel_reminder(&self, dose_time_id: &str) {
        if let Err(e) = self.dispatcher.cancel(dose_time_id) {
            warn!(dose_time_id, error = %e, "failed to cancel reminder");
        }
    }

    /// Delete a dose time, cancelling its reminder first so no armed
    /// reminder outlives the row it points at.
    pub fn delete_dose_time(&self, dose_time_id: &str) -> Result<bool> {
        self.cancel_reminder(dose_time_id);
        self.db.delete_dose_time(dose_time_id)
    }

    /// Delete a schedule and its descendants, cancelling every affected
    /// reminder up front.
    pub fn delete_schedule(&self, schedule_id: &str) -> Result<bool> {
        for dose in self.db.list_dose_times_by_schedule(schedule_id)? {
            self.cancel_reminder(&dose.id);
        }
        self.db.delete_schedule(schedule_id)
    }

    /// Delete a medication and everything under it, cancelling every
    /// affected reminder up front.
    pub fn delete_medication(&self, medication_id: &str) -> Result<bool> {
        for dose in self.db.list_dose_times_by_medication(medication_id)? {
            self.cancel_reminder(&dose.id);
        }
        self.db.delete_medication(medication_id)
    }
}
