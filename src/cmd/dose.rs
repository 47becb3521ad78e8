use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use dosewatch::core::reminder::{LogDispatcher, ReminderCoordinator};
use dosewatch::core::schedule::{self, AddDoseTimeParams, DoseTimeChanges};
use dosewatch::db::Database;
use dosewatch::error::Error;
use dosewatch::models::config::Config;
use dosewatch::output;

pub fn run_add(
    schedule_id: &str,
    at: &str,
    dosage: Option<&str>,
    instructions: Option<&str>,
    prn: bool,
    order: Option<i64>,
    human: bool,
) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    let dose = schedule::add_dose_time(
        &db,
        &coordinator,
        AddDoseTimeParams {
            schedule_id,
            time_local: at,
            dosage,
            instructions,
            prn,
            sort_order: order,
        },
        Utc::now(),
    )?;

    if human {
        let slot = if dose.prn {
            "as needed"
        } else {
            dose.time_local.as_str()
        };
        println!("Added dose time {} ({})", slot, dose.id);
    } else {
        let out = output::success("time_add", json!({ "time": dose }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(schedule_id: &str, human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;

    let Some(sched) = db.get_schedule(schedule_id)? else {
        return Err(Error::not_found("schedule", schedule_id).into());
    };
    let times = schedule::list_dose_times(&db, schedule_id)?;

    if human {
        println!(
            "{}",
            dosewatch::output::human::format_dose_time_list(&sched, &times)
        );
    } else {
        let count = times.len();
        let out = output::success(
            "time_list",
            json!({
                "schedule_id": schedule_id,
                "times": times,
                "count": count,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_update(
    id: &str,
    at: Option<&str>,
    dosage: Option<&str>,
    instructions: Option<&str>,
    prn: Option<bool>,
    order: Option<i64>,
    human: bool,
) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    let dose = schedule::update_dose_time(
        &db,
        &coordinator,
        id,
        DoseTimeChanges {
            time_local: at,
            dosage,
            instructions,
            prn,
            sort_order: order,
        },
        Utc::now(),
    )?;

    if human {
        println!("Updated dose time {}", dose.time_local);
    } else {
        let out = output::success("time_update", json!({ "time": dose }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_remove(id: &str, human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    schedule::remove_dose_time(&coordinator, id)?;

    if human {
        println!("Removed dose time {}", id);
    } else {
        let out = output::success("time_remove", json!({ "id": id, "removed": true }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
