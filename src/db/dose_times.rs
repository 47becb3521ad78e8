use rusqlite::params;

use crate::error::Result;
use crate::models::dose_time::DoseTime;

use super::Database;

struct DoseTimeRow {
    id: String,
    schedule_id: String,
    time_local: String,
    dosage: Option<String>,
    dose_amount: Option<f64>,
    dose_unit: Option<String>,
    instructions: Option<String>,
    prn: bool,
    sort_order: i64,
    next_trigger_ts: Option<i64>,
}

fn row_to_dose_time(r: DoseTimeRow) -> DoseTime {
    DoseTime {
        id: r.id,
        schedule_id: r.schedule_id,
        time_local: r.time_local,
        dosage: r.dosage,
        dose_amount: r.dose_amount,
        dose_unit: r.dose_unit,
        instructions: r.instructions,
        prn: r.prn,
        sort_order: r.sort_order,
        next_trigger_ts: r.next_trigger_ts,
    }
}

const SELECT_COLS: &str = "id, schedule_id, time_local, dosage, dose_amount, dose_unit, instructions, prn, sort_order, next_trigger_ts";

macro_rules! map_row {
    ($row:expr) => {
        Ok(DoseTimeRow {
            id: $row.get(0)?,
            schedule_id: $row.get(1)?,
            time_local: $row.get(2)?,
            dosage: $row.get(3)?,
            dose_amount: $row.get(4)?,
            dose_unit: $row.get(5)?,
            instructions: $row.get(6)?,
            prn: $row.get(7)?,
            sort_order: $row.get(8)?,
            next_trigger_ts: $row.get(9)?,
        })
    };
}

impl Database {
    pub fn insert_dose_time(&self, dose: &DoseTime) -> Result<()> {
        self.conn.execute(
            "INSERT INTO medication_schedule_times (id, schedule_id, time_local, dosage, dose_amount, dose_unit, instructions, prn, sort_order, next_trigger_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                dose.id,
                dose.schedule_id,
                dose.time_local,
                dose.dosage,
                dose.dose_amount,
                dose.dose_unit,
                dose.instructions,
                dose.prn as i32,
                dose.sort_order,
                dose.next_trigger_ts,
            ],
        )?;
        Ok(())
    }

    pub fn get_dose_time(&self, id: &str) -> Result<Option<DoseTime>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medication_schedule_times WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_dose_time(row?))),
            None => Ok(None),
        }
    }

    pub fn list_dose_times_by_schedule(&self, schedule_id: &str) -> Result<Vec<DoseTime>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medication_schedule_times WHERE schedule_id = ?1
             ORDER BY sort_order ASC, time_local ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![schedule_id], |row| map_row!(row))?;

        let mut times = Vec::new();
        for row in rows {
            times.push(row_to_dose_time(row?));
        }
        Ok(times)
    }

    /// All dose times under a medication, crossing its schedules. Used for
    /// reminder cancellation ahead of cascade deletes.
    pub fn list_dose_times_by_medication(&self, medication_id: &str) -> Result<Vec<DoseTime>> {
        let sql = "SELECT t.id, t.schedule_id, t.time_local, t.dosage, t.dose_amount, t.dose_unit, t.instructions, t.prn, t.sort_order, t.next_trigger_ts
             FROM medication_schedule_times t
             JOIN medication_schedules s ON s.id = t.schedule_id
             WHERE s.medication_id = ?1
             ORDER BY t.sort_order ASC, t.time_local ASC";
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![medication_id], |row| map_row!(row))?;

        let mut times = Vec::new();
        for row in rows {
            times.push(row_to_dose_time(row?));
        }
        Ok(times)
    }

    /// Update the mutable fields. Id and `schedule_id` never change.
    pub fn update_dose_time(&self, dose: &DoseTime) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE medication_schedule_times SET time_local = ?1, dosage = ?2, dose_amount = ?3, dose_unit = ?4, instructions = ?5, prn = ?6, sort_order = ?7, next_trigger_ts = ?8
             WHERE id = ?9",
            params![
                dose.time_local,
                dose.dosage,
                dose.dose_amount,
                dose.dose_unit,
                dose.instructions,
                dose.prn as i32,
                dose.sort_order,
                dose.next_trigger_ts,
                dose.id,
            ],
        )?;
        Ok(count > 0)
    }

    /// Persist a freshly computed trigger snapshot for one dose time.
    pub fn set_next_trigger(&self, dose_time_id: &str, next_trigger_ts: Option<i64>) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE medication_schedule_times SET next_trigger_ts = ?1 WHERE id = ?2",
            params![next_trigger_ts, dose_time_id],
        )?;
        Ok(count > 0)
    }

    /// Delete a dose time; its intake logs cascade.
    pub fn delete_dose_time(&self, id: &str) -> Result<bool> {
        let count = self.conn.execute(
            "DELETE FROM medication_schedule_times WHERE id = ?1",
            params![id],
        )?;
        Ok(count > 0)
    }
}
