use rusqlite::Connection;

use crate::error::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS medications (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            profile_id      TEXT NOT NULL,
            name            TEXT NOT NULL,
            notes           TEXT,
            medication_url  TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_medications_profile ON medications(user_id, profile_id);

        CREATE TABLE IF NOT EXISTS medication_schedules (
            id                TEXT PRIMARY KEY,
            medication_id     TEXT NOT NULL REFERENCES medications(id) ON DELETE CASCADE,
            schedule          TEXT NOT NULL,
            frequency_per_day INTEGER,
            is_forever        INTEGER NOT NULL DEFAULT 0,
            start_date        INTEGER,
            end_date          INTEGER,
            days_of_week      TEXT,
            timezone          TEXT NOT NULL,
            reminder_enabled  INTEGER NOT NULL DEFAULT 1
        );
        CREATE INDEX IF NOT EXISTS idx_schedules_medication ON medication_schedules(medication_id);

        CREATE TABLE IF NOT EXISTS medication_schedule_times (
            id              TEXT PRIMARY KEY,
            schedule_id     TEXT NOT NULL REFERENCES medication_schedules(id) ON DELETE CASCADE,
            time_local      TEXT NOT NULL,
            dosage          TEXT,
            dose_amount     REAL,
            dose_unit       TEXT,
            instructions    TEXT,
            prn             INTEGER NOT NULL DEFAULT 0,
            sort_order      INTEGER NOT NULL DEFAULT 0,
            next_trigger_ts INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_times_schedule ON medication_schedule_times(schedule_id, sort_order);
        CREATE INDEX IF NOT EXISTS idx_times_next_trigger ON medication_schedule_times(next_trigger_ts);

        CREATE TABLE IF NOT EXISTS medication_intake_logs (
            id                 TEXT PRIMARY KEY,
            schedule_time_id   TEXT NOT NULL REFERENCES medication_schedule_times(id) ON DELETE CASCADE,
            taken_ts           INTEGER NOT NULL,
            status             TEXT NOT NULL,
            actual_dose_amount REAL,
            actual_dose_unit   TEXT,
            notes              TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_intake_time_ts ON medication_intake_logs(schedule_time_id, taken_ts);",
    )?;
    Ok(())
}
