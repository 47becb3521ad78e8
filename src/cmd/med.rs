use anyhow::Result;
use serde_json::json;

use dosewatch::core::med::{self, AddMedicationParams};
use dosewatch::core::reminder::{LogDispatcher, ReminderCoordinator};
use dosewatch::db::Database;
use dosewatch::models::config::Config;
use dosewatch::output;

pub fn run_add(name: &str, notes: Option<&str>, url: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::add_medication(&db, &config, AddMedicationParams { name, notes, url })?;

    if human {
        println!("Added {} ({})", medication.name, medication.id);
    } else {
        let out = output::success("med_add", json!({ "medication": medication }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;

    let meds = med::list_medications(&db)?;

    if human {
        println!("{}", dosewatch::output::human::format_med_list(&meds));
    } else {
        let count = meds.len();
        let out = output::success(
            "med_list",
            json!({
                "medications": meds,
                "count": count,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_show(ident: &str, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::find_medication(&db, &config, ident)?;
    let schedules = db.list_schedules_by_medication(&medication.id)?;

    if human {
        println!(
            "{}",
            dosewatch::output::human::format_schedule_list(&medication, &schedules)
        );
        for schedule in &schedules {
            let times = db.list_dose_times_by_schedule(&schedule.id)?;
            println!(
                "{}",
                dosewatch::output::human::format_dose_time_list(schedule, &times)
            );
        }
    } else {
        let mut schedule_objs = Vec::new();
        for schedule in &schedules {
            let times = db.list_dose_times_by_schedule(&schedule.id)?;
            schedule_objs.push(json!({ "schedule": schedule, "times": times }));
        }
        let out = output::success(
            "med_show",
            json!({
                "medication": medication,
                "schedules": schedule_objs,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_update(
    ident: &str,
    name: Option<&str>,
    notes: Option<&str>,
    url: Option<&str>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::find_medication(&db, &config, ident)?;
    let updated = med::update_medication(&db, &medication, name, notes, url)?;

    if human {
        println!("Updated {}", updated.name);
    } else {
        let out = output::success("med_update", json!({ "medication": updated }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_remove(ident: &str, yes: bool, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    let medication = med::find_medication(&db, &config, ident)?;

    if !yes {
        eprint!(
            "Permanently delete '{}' with all schedules, dose times and intake history? [y/N] ",
            medication.name
        );
        use std::io::{self, BufRead, Write};
        io::stderr().flush().ok();
        let mut buf = String::new();
        let bytes = io::stdin().lock().read_line(&mut buf)?;
        if bytes == 0 || !buf.trim().eq_ignore_ascii_case("y") {
            anyhow::bail!("Aborted.");
        }
    }

    // Reminders are cancelled before the cascade delete so nothing armed
    // outlives its row.
    coordinator.delete_medication(&medication.id)?;

    if human {
        println!("Removed medication: {}", medication.name);
    } else {
        let out = output::success(
            "med_remove",
            json!({
                "id": medication.id,
                "name": medication.name,
                "removed": true,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
