mod dose_times;
mod intake_logs;
mod medications;
mod migrate;
mod schedules;

use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if !path.exists() {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .mode(0o600)
                    .open(path)?;
            } else {
                let mut perms = fs::metadata(path)?.permissions();
                if perms.mode() & 0o777 != 0o600 {
                    perms.set_mode(0o600);
                    fs::set_permissions(path, perms)?;
                }
            }
        }

        let conn = Connection::open(path)?;
        // Cascading deletes rely on SQLite enforcing the FK graph.
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let db = Self { conn };
        migrate::run(&db.conn)?;
        Ok(db)
    }

    /// Group several store calls into one atomic unit, e.g. a dose-time
    /// write together with its recomputed trigger snapshot.
    pub fn transaction(&self) -> Result<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_enabled() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("t.db")).unwrap();
        let fk: i64 = db
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
