use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::error::Result;
use crate::models::medication::Medication;

use super::Database;

struct MedicationRow {
    id: String,
    owner_id: String,
    profile_id: String,
    name: String,
    notes: Option<String>,
    url: Option<String>,
    created_at: String,
    updated_at: String,
}

fn row_to_medication(r: MedicationRow) -> Result<Medication> {
    let created_at: DateTime<Utc> =
        DateTime::parse_from_rfc3339(&r.created_at)
            .map_err(|e| crate::error::Error::Other(e.to_string()))?
            .with_timezone(&Utc);
    let updated_at: DateTime<Utc> =
        DateTime::parse_from_rfc3339(&r.updated_at)
            .map_err(|e| crate::error::Error::Other(e.to_string()))?
            .with_timezone(&Utc);

    Ok(Medication {
        id: r.id,
        owner_id: r.owner_id,
        profile_id: r.profile_id,
        name: r.name,
        notes: r.notes,
        url: r.url,
        created_at,
        updated_at,
    })
}

const SELECT_COLS: &str =
    "id, user_id, profile_id, name, notes, medication_url, created_at, updated_at";

macro_rules! map_row {
    ($row:expr) => {
        Ok(MedicationRow {
            id: $row.get(0)?,
            owner_id: $row.get(1)?,
            profile_id: $row.get(2)?,
            name: $row.get(3)?,
            notes: $row.get(4)?,
            url: $row.get(5)?,
            created_at: $row.get(6)?,
            updated_at: $row.get(7)?,
        })
    };
}

impl Database {
    /// Insert a medication. Both timestamps are stamped here, not taken
    /// from the caller.
    pub fn insert_medication(&self, med: &Medication) -> Result<Medication> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO medications (id, user_id, profile_id, name, notes, medication_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                med.id,
                med.owner_id,
                med.profile_id,
                med.name,
                med.notes,
                med.url,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        let mut stored = med.clone();
        stored.created_at = now;
        stored.updated_at = now;
        Ok(stored)
    }

    pub fn get_medication(&self, id: &str) -> Result<Option<Medication>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medications WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_medication(row?)?)),
            None => Ok(None),
        }
    }

    pub fn get_medication_by_name(&self, name: &str) -> Result<Option<Medication>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medications WHERE name = ?1 ORDER BY created_at ASC LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![name], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_medication(row?)?)),
            None => Ok(None),
        }
    }

    pub fn list_medications(&self) -> Result<Vec<Medication>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medications ORDER BY name ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| map_row!(row))?;

        let mut meds = Vec::new();
        for row in rows {
            meds.push(row_to_medication(row?)?);
        }
        Ok(meds)
    }

    /// Update the mutable fields. Id, ownership and `created_at` never
    /// change; `updated_at` is refreshed here.
    pub fn update_medication(
        &self,
        id: &str,
        name: &str,
        notes: Option<&str>,
        url: Option<&str>,
    ) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE medications SET name = ?1, notes = ?2, medication_url = ?3, updated_at = ?4
             WHERE id = ?5",
            params![name, notes, url, Utc::now().to_rfc3339(), id],
        )?;
        Ok(count > 0)
    }

    /// Delete a medication; schedules, dose times and intake logs under it
    /// go with it through the FK cascade in one atomic statement.
    pub fn delete_medication(&self, id: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }
}
