use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde_json::json;

use dosewatch::core::med;
use dosewatch::core::reminder::{LogDispatcher, ReminderCoordinator};
use dosewatch::core::schedule::{self, AddScheduleParams, ScheduleChanges};
use dosewatch::db::Database;
use dosewatch::models::config::Config;
use dosewatch::output;

pub struct AddArgs<'a> {
    pub medication: &'a str,
    pub label: &'a str,
    pub freq: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub days: Option<&'a str>,
    pub tz: Option<&'a str>,
    pub no_reminders: bool,
    pub human: bool,
}

pub fn run_add(args: AddArgs<'_>) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::find_medication(&db, &config, args.medication)?;
    let timezone = args.tz.unwrap_or(&config.profile.timezone);

    let created = schedule::add_schedule(
        &db,
        AddScheduleParams {
            medication_id: &medication.id,
            label: args.label,
            frequency_per_day: args.freq,
            forever: args.end.is_none(),
            start_date: args.start,
            end_date: args.end,
            days: args.days,
            timezone,
            reminder_enabled: !args.no_reminders && config.reminders.enabled_by_default,
        },
    )?;

    if args.human {
        println!(
            "Added schedule '{}' to {} ({})",
            created.recurrence_label, medication.name, created.id
        );
    } else {
        let out = output::success("schedule_add", json!({ "schedule": created }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(ident: &str, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::find_medication(&db, &config, ident)?;
    let schedules = schedule::list_schedules(&db, &medication.id)?;

    if human {
        println!(
            "{}",
            dosewatch::output::human::format_schedule_list(&medication, &schedules)
        );
    } else {
        let count = schedules.len();
        let out = output::success(
            "schedule_list",
            json!({
                "medication_id": medication.id,
                "schedules": schedules,
                "count": count,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub struct UpdateArgs<'a> {
    pub id: &'a str,
    pub label: Option<&'a str>,
    pub freq: Option<u32>,
    pub forever: bool,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub days: Option<&'a str>,
    pub tz: Option<&'a str>,
    pub reminders: Option<bool>,
    pub human: bool,
}

pub fn run_update(args: UpdateArgs<'_>) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    let (updated, times) = schedule::update_schedule(
        &db,
        &coordinator,
        args.id,
        ScheduleChanges {
            label: args.label,
            frequency_per_day: args.freq,
            forever: args.forever.then_some(true),
            start_date: args.start,
            end_date: args.end,
            days: args.days,
            timezone: args.tz,
            reminder_enabled: args.reminders,
        },
        Utc::now(),
    )?;

    if args.human {
        println!("Updated schedule '{}'", updated.recurrence_label);
        println!(
            "{}",
            dosewatch::output::human::format_dose_time_list(&updated, &times)
        );
    } else {
        let out = output::success(
            "schedule_update",
            json!({ "schedule": updated, "times": times }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_remove(id: &str, human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let dispatcher = LogDispatcher;
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);

    schedule::remove_schedule(&coordinator, id)?;

    if human {
        println!("Removed schedule {}", id);
    } else {
        let out = output::success("schedule_remove", json!({ "id": id, "removed": true }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
