use rusqlite::params;
use std::str::FromStr;

use crate::error::Result;
use crate::models::intake::{IntakeLog, IntakeStatus};

use super::Database;

struct IntakeLogRow {
    id: String,
    dose_time_id: String,
    taken_ts: i64,
    status: String,
    actual_dose_amount: Option<f64>,
    actual_dose_unit: Option<String>,
    notes: Option<String>,
}

fn row_to_intake_log(r: IntakeLogRow) -> Result<IntakeLog> {
    let status = IntakeStatus::from_str(&r.status)?;
    Ok(IntakeLog {
        id: r.id,
        dose_time_id: r.dose_time_id,
        taken_ts: r.taken_ts,
        status,
        actual_dose_amount: r.actual_dose_amount,
        actual_dose_unit: r.actual_dose_unit,
        notes: r.notes,
    })
}

macro_rules! map_row {
    ($row:expr) => {
        Ok(IntakeLogRow {
            id: $row.get(0)?,
            dose_time_id: $row.get(1)?,
            taken_ts: $row.get(2)?,
            status: $row.get(3)?,
            actual_dose_amount: $row.get(4)?,
            actual_dose_unit: $row.get(5)?,
            notes: $row.get(6)?,
        })
    };
}

impl Database {
    /// Append one intake event. Rows in this table are never updated.
    pub fn insert_intake_log(&self, log: &IntakeLog) -> Result<()> {
        self.conn.execute(
            "INSERT INTO medication_intake_logs (id, schedule_time_id, taken_ts, status, actual_dose_amount, actual_dose_unit, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                log.id,
                log.dose_time_id,
                log.taken_ts,
                log.status.to_string(),
                log.actual_dose_amount,
                log.actual_dose_unit,
                log.notes,
            ],
        )?;
        Ok(())
    }

    pub fn list_intake_logs_by_dose_time(&self, dose_time_id: &str) -> Result<Vec<IntakeLog>> {
        let sql = "SELECT id, schedule_time_id, taken_ts, status, actual_dose_amount, actual_dose_unit, notes
             FROM medication_intake_logs WHERE schedule_time_id = ?1 ORDER BY taken_ts DESC";
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![dose_time_id], |row| map_row!(row))?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(row_to_intake_log(row?)?);
        }
        Ok(logs)
    }

    /// All logs for all dose times under a medication, newest first,
    /// optionally bounded by an inclusive epoch-ms range.
    pub fn list_intake_logs_by_medication(
        &self,
        medication_id: &str,
        from_ts: Option<i64>,
        to_ts: Option<i64>,
    ) -> Result<Vec<IntakeLog>> {
        let sql = "SELECT l.id, l.schedule_time_id, l.taken_ts, l.status, l.actual_dose_amount, l.actual_dose_unit, l.notes
             FROM medication_intake_logs l
             JOIN medication_schedule_times t ON t.id = l.schedule_time_id
             JOIN medication_schedules s ON s.id = t.schedule_id
             WHERE s.medication_id = ?1 AND l.taken_ts >= ?2 AND l.taken_ts <= ?3
             ORDER BY l.taken_ts DESC";
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(
            params![
                medication_id,
                from_ts.unwrap_or(i64::MIN),
                to_ts.unwrap_or(i64::MAX)
            ],
            |row| map_row!(row),
        )?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(row_to_intake_log(row?)?);
        }
        Ok(logs)
    }

}
