use rusqlite::params;

use crate::error::Result;
use crate::models::schedule::{DaySet, Schedule};

use super::Database;

struct ScheduleRow {
    id: String,
    medication_id: String,
    recurrence_label: String,
    frequency_per_day: Option<u32>,
    is_forever: bool,
    start_date: Option<i64>,
    end_date: Option<i64>,
    days_of_week: Option<String>,
    timezone: String,
    reminder_enabled: bool,
}

fn row_to_schedule(r: ScheduleRow) -> Schedule {
    // Lenient on read: unknown tokens were either written before strict
    // validation existed or by another writer. They degrade to every-day.
    let days_of_week = match r.days_of_week {
        Some(ref raw) => DaySet::parse_lenient(raw),
        None => DaySet::empty(),
    };
    Schedule {
        id: r.id,
        medication_id: r.medication_id,
        recurrence_label: r.recurrence_label,
        frequency_per_day: r.frequency_per_day,
        is_forever: r.is_forever,
        start_date: r.start_date,
        end_date: r.end_date,
        days_of_week,
        timezone: r.timezone,
        reminder_enabled: r.reminder_enabled,
    }
}

const SELECT_COLS: &str = "id, medication_id, schedule, frequency_per_day, is_forever, start_date, end_date, days_of_week, timezone, reminder_enabled";

macro_rules! map_row {
    ($row:expr) => {
        Ok(ScheduleRow {
            id: $row.get(0)?,
            medication_id: $row.get(1)?,
            recurrence_label: $row.get(2)?,
            frequency_per_day: $row.get(3)?,
            is_forever: $row.get(4)?,
            start_date: $row.get(5)?,
            end_date: $row.get(6)?,
            days_of_week: $row.get(7)?,
            timezone: $row.get(8)?,
            reminder_enabled: $row.get(9)?,
        })
    };
}

fn days_column(s: &Schedule) -> Option<String> {
    if s.days_of_week.is_empty() {
        None
    } else {
        Some(s.days_of_week.to_string())
    }
}

impl Database {
    pub fn insert_schedule(&self, schedule: &Schedule) -> Result<()> {
        self.conn.execute(
            "INSERT INTO medication_schedules (id, medication_id, schedule, frequency_per_day, is_forever, start_date, end_date, days_of_week, timezone, reminder_enabled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                schedule.id,
                schedule.medication_id,
                schedule.recurrence_label,
                schedule.frequency_per_day,
                schedule.is_forever as i32,
                schedule.start_date,
                schedule.end_date,
                days_column(schedule),
                schedule.timezone,
                schedule.reminder_enabled as i32,
            ],
        )?;
        Ok(())
    }

    pub fn get_schedule(&self, id: &str) -> Result<Option<Schedule>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medication_schedules WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_schedule(row?))),
            None => Ok(None),
        }
    }

    pub fn list_schedules_by_medication(&self, medication_id: &str) -> Result<Vec<Schedule>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medication_schedules WHERE medication_id = ?1 ORDER BY rowid ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![medication_id], |row| map_row!(row))?;

        let mut schedules = Vec::new();
        for row in rows {
            schedules.push(row_to_schedule(row?));
        }
        Ok(schedules)
    }

    pub fn list_schedules(&self) -> Result<Vec<Schedule>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medication_schedules ORDER BY rowid ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| map_row!(row))?;

        let mut schedules = Vec::new();
        for row in rows {
            schedules.push(row_to_schedule(row?));
        }
        Ok(schedules)
    }

    /// Update the mutable fields. Id and `medication_id` never change.
    pub fn update_schedule(&self, schedule: &Schedule) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE medication_schedules SET schedule = ?1, frequency_per_day = ?2, is_forever = ?3, start_date = ?4, end_date = ?5, days_of_week = ?6, timezone = ?7, reminder_enabled = ?8
             WHERE id = ?9",
            params![
                schedule.recurrence_label,
                schedule.frequency_per_day,
                schedule.is_forever as i32,
                schedule.start_date,
                schedule.end_date,
                days_column(schedule),
                schedule.timezone,
                schedule.reminder_enabled as i32,
                schedule.id,
            ],
        )?;
        Ok(count > 0)
    }

    /// Delete a schedule; its dose times and their intake logs cascade.
    pub fn delete_schedule(&self, id: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM medication_schedules WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }
}
