//! Recompute-on-read sweep. Cached trigger snapshots go stale the moment
//! their instant passes, so any "what fires next" view refreshes them
//! first and re-arms reminders as a side effect (e.g. after an app
//! restart).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::reminder::{ReminderCoordinator, ReminderDispatcher};
use crate::db::Database;
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct UpcomingEntry {
    pub medication_id: String,
    pub medication_name: String,
    pub schedule_id: String,
    pub recurrence_label: String,
    pub dose_time_id: String,
    pub time_local: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    pub next_trigger_ts: i64,
}

#[derive(Debug, Serialize)]
pub struct UpcomingReport {
    pub entries: Vec<UpcomingEntry>,
    /// Schedules that look active but cannot fire again (expired window,
    /// day filter matching nothing). Valid state, but a user expecting a
    /// reminder should hear about it.
    pub warnings: Vec<String>,
}

pub fn refresh_upcoming<D: ReminderDispatcher>(
    db: &Database,
    coordinator: &ReminderCoordinator<'_, D>,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Result<UpcomingReport> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for med in db.list_medications()? {
        for schedule in db.list_schedules_by_medication(&med.id)? {
            let times = coordinator.recompute_schedule(&schedule, now)?;
            let fixed_doses = times.iter().filter(|t| !t.prn).count();
            let mut scheduled = 0usize;

            for dose in &times {
                if let Some(ts) = dose.next_trigger_ts {
                    scheduled += 1;
                    entries.push(UpcomingEntry {
                        medication_id: med.id.clone(),
                        medication_name: med.name.clone(),
                        schedule_id: schedule.id.clone(),
                        recurrence_label: schedule.recurrence_label.clone(),
                        dose_time_id: dose.id.clone(),
                        time_local: dose.time_local.clone(),
                        dosage: dose.dosage.clone(),
                        next_trigger_ts: ts,
                    });
                }
            }

            if schedule.reminder_enabled && fixed_doses > 0 && scheduled == 0 {
                warnings.push(format!(
                    "schedule '{}' for {} has reminders enabled but no upcoming occurrence",
                    schedule.recurrence_label, med.name
                ));
            }
        }
    }

    entries.sort_by_key(|e| e.next_trigger_ts);
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    Ok(UpcomingReport { entries, warnings })
}
