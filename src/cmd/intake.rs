use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;

use dosewatch::core::intake::{self, IntakeDetails};
use dosewatch::core::med;
use dosewatch::db::Database;
use dosewatch::models::config::Config;
use dosewatch::models::dose_time::parse_dosage;
use dosewatch::models::intake::IntakeStatus;
use dosewatch::output;

fn noon_utc_ms(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(12, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis())
}

pub fn run_take(
    ident: &str,
    time_id: Option<&str>,
    status: &str,
    date: Option<NaiveDate>,
    dose_override: Option<&str>,
    note: Option<&str>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::find_medication(&db, &config, ident)?;
    let status: IntakeStatus = status.parse()?;

    let times = db.list_dose_times_by_medication(&medication.id)?;
    let dose_time = match time_id {
        Some(id) => match times.iter().find(|t| t.id == id) {
            Some(t) => t.clone(),
            None => anyhow::bail!(
                "Dose time '{}' does not belong to {}.",
                id,
                medication.name
            ),
        },
        None => match times.as_slice() {
            [] => anyhow::bail!(
                "{} has no dose times yet. Add a schedule and a dose time first.",
                medication.name
            ),
            [only] => only.clone(),
            _ => {
                let ids: Vec<String> = times
                    .iter()
                    .map(|t| format!("{} ({})", t.id, t.time_local))
                    .collect();
                anyhow::bail!(
                    "{} has several dose times; pass --time-id. Candidates: {}",
                    medication.name,
                    ids.join(", ")
                );
            }
        },
    };

    let taken_ts = match date.and_then(noon_utc_ms) {
        Some(ts) => ts,
        None => Utc::now().timestamp_millis(),
    };

    let parsed = parse_dosage(dose_override);
    let log = intake::log_intake(
        &db,
        &dose_time.id,
        status,
        taken_ts,
        IntakeDetails {
            actual_dose_amount: parsed.amount.or(dose_time.dose_amount),
            actual_dose_unit: parsed
                .unit
                .as_deref()
                .or(dose_time.dose_unit.as_deref()),
            notes: note,
        },
    )?;

    if human {
        println!(
            "{}",
            dosewatch::output::human::format_intake_logged(
                &medication.name,
                &dose_time.time_local,
                &log.status.to_string(),
            )
        );
    } else {
        let out = output::success(
            "take",
            json!({
                "medication": medication.name,
                "time_id": dose_time.id,
                "log": log,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(
    ident: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    last: Option<usize>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let medication = med::find_medication(&db, &config, ident)?;

    let from_ts = from
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis());
    let to_ts = to
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis() + 999);

    let mut logs = intake::list_intake_logs(&db, &medication.id, from_ts, to_ts)?;
    if let Some(n) = last {
        logs.truncate(n);
    }

    if human {
        let tz = config
            .profile
            .timezone
            .parse()
            .unwrap_or(chrono_tz::Tz::UTC);
        println!(
            "{}",
            dosewatch::output::human::format_intake_list(&medication, &logs, tz)
        );
    } else {
        let count = logs.len();
        let out = output::success(
            "intake_list",
            json!({
                "medication_id": medication.id,
                "logs": logs,
                "count": count,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
