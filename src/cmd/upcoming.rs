use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use dosewatch::core::reminder::{LogDispatcher, ReminderCoordinator};
use dosewatch::core::upcoming;
use dosewatch::db::Database;
use dosewatch::models::config::Config;
use dosewatch::output;

pub fn run(limit: Option<usize>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    let report = upcoming::refresh_upcoming(&db, &coordinator, Utc::now(), limit)?;

    if human {
        let tz = config
            .profile
            .timezone
            .parse()
            .unwrap_or(chrono_tz::Tz::UTC);
        println!(
            "{}",
            dosewatch::output::human::format_upcoming(&report, tz)
        );
    } else {
        let out = output::success(
            "upcoming",
            json!({
                "entries": report.entries,
                "warnings": report.warnings,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
