//! Intake ledger. Logging an intake never touches `next_trigger_ts`;
//! adherence events and trigger computation are independent, so a "taken"
//! entry does not advance or cancel the next scheduled occurrence.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::intake::{IntakeLog, IntakeStatus};

#[derive(Default)]
pub struct IntakeDetails<'a> {
    pub actual_dose_amount: Option<f64>,
    pub actual_dose_unit: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Append one adherence event against an existing dose time.
pub fn log_intake(
    db: &Database,
    dose_time_id: &str,
    status: IntakeStatus,
    taken_ts: i64,
    details: IntakeDetails<'_>,
) -> Result<IntakeLog> {
    if db.get_dose_time(dose_time_id)?.is_none() {
        return Err(Error::not_found("dose time", dose_time_id));
    }

    let mut log = IntakeLog::new(dose_time_id, status, taken_ts);
    log.actual_dose_amount = details.actual_dose_amount;
    log.actual_dose_unit = details.actual_dose_unit.map(str::to_string);
    log.notes = details.notes.map(str::to_string);

    db.insert_intake_log(&log)?;
    Ok(log)
}

/// All logs under a medication, newest first, optionally bounded by an
/// inclusive epoch-ms range.
pub fn list_intake_logs(
    db: &Database,
    medication_id: &str,
    from_ts: Option<i64>,
    to_ts: Option<i64>,
) -> Result<Vec<IntakeLog>> {
    if db.get_medication(medication_id)?.is_none() {
        return Err(Error::not_found("medication", medication_id));
    }
    db.list_intake_logs_by_medication(medication_id, from_ts, to_ts)
}
