use chrono::DateTime;
use chrono_tz::Tz;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

use crate::core::upcoming::UpcomingReport;
use crate::models::{DoseTime, IntakeLog, Medication, Schedule};

/// Render an epoch-ms instant in the given zone, e.g. "2024-02-01 20:00 EST".
fn format_instant(ts_ms: i64, tz: Tz) -> String {
    match DateTime::from_timestamp_millis(ts_ms) {
        Some(dt) => dt.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => format!("@{ts_ms}"),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Pretty-print the medication list.
pub fn format_med_list(meds: &[Medication]) -> String {
    if meds.is_empty() {
        return "No medications recorded.".to_string();
    }
    let mut table = new_table(vec!["Id", "Name", "Notes"]);
    for med in meds {
        table.add_row(vec![
            short_id(&med.id),
            med.name.as_str(),
            med.notes.as_deref().unwrap_or(""),
        ]);
    }
    table.to_string()
}

/// Pretty-print the schedules of one medication.
pub fn format_schedule_list(med: &Medication, schedules: &[Schedule]) -> String {
    if schedules.is_empty() {
        return format!("No schedules for {}.", med.name);
    }
    let mut table = new_table(vec![
        "Id", "Label", "Window", "Days", "Timezone", "Reminders",
    ]);
    for s in schedules {
        let window = match (s.is_forever, s.start_date, s.end_date) {
            (true, None, _) => "forever".to_string(),
            (true, Some(start), _) => format!(
                "from {}",
                s.tz().map(|tz| format_instant(start, tz)).unwrap_or_default()
            ),
            (false, start, end) => {
                let tz = s.tz().ok();
                let fmt = |ts: Option<i64>| match (ts, tz) {
                    (Some(ts), Some(tz)) => format_instant(ts, tz),
                    _ => "..".to_string(),
                };
                format!("{} .. {}", fmt(start), fmt(end))
            }
        };
        let days = if s.days_of_week.is_empty() {
            "every day".to_string()
        } else {
            s.days_of_week.to_string()
        };
        table.add_row(vec![
            short_id(&s.id).to_string(),
            s.recurrence_label.clone(),
            window,
            days,
            s.timezone.clone(),
            if s.reminder_enabled { "on" } else { "off" }.to_string(),
        ]);
    }
    format!("Schedules for {}:\n{}", med.name.bold(), table)
}

/// Pretty-print the dose times of one schedule.
pub fn format_dose_time_list(schedule: &Schedule, times: &[DoseTime]) -> String {
    if times.is_empty() {
        return format!("No dose times on schedule '{}'.", schedule.recurrence_label);
    }
    let tz = schedule.tz().ok();
    let mut table = new_table(vec!["Id", "Time", "Dosage", "PRN", "Next trigger"]);
    for t in times {
        let next = match (t.prn, t.next_trigger_ts, tz) {
            (true, _, _) => "as needed".to_string(),
            (false, Some(ts), Some(tz)) => format_instant(ts, tz),
            (false, Some(ts), None) => format!("@{ts}"),
            (false, None, _) => "none".dimmed().to_string(),
        };
        table.add_row(vec![
            short_id(&t.id).to_string(),
            t.time_local.clone(),
            t.dosage.clone().unwrap_or_default(),
            if t.prn { "yes" } else { "" }.to_string(),
            next,
        ]);
    }
    table.to_string()
}

/// Pretty-print an intake ledger slice, newest first.
pub fn format_intake_list(med: &Medication, logs: &[IntakeLog], tz: Tz) -> String {
    if logs.is_empty() {
        return format!("No intake logged for {}.", med.name);
    }
    let mut table = new_table(vec!["When", "Status", "Dose", "Notes"]);
    for log in logs {
        let dose = match (log.actual_dose_amount, log.actual_dose_unit.as_deref()) {
            (Some(amount), Some(unit)) => format!("{amount} {unit}"),
            (Some(amount), None) => amount.to_string(),
            _ => String::new(),
        };
        table.add_row(vec![
            format_instant(log.taken_ts, tz),
            log.status.to_string(),
            dose,
            log.notes.clone().unwrap_or_default(),
        ]);
    }
    format!("Intake for {}:\n{}", med.name.bold(), table)
}

/// Confirmation line after logging an intake.
pub fn format_intake_logged(med_name: &str, time_local: &str, status: &str) -> String {
    format!(
        "{} {} ({} slot)",
        "Logged:".green(),
        format!("{med_name} {status}").bold(),
        time_local
    )
}

/// Pretty-print the upcoming-reminders sweep.
pub fn format_upcoming(report: &UpcomingReport, tz: Tz) -> String {
    let mut out = String::new();
    if report.entries.is_empty() {
        out.push_str("No upcoming reminders.");
    } else {
        let mut table = new_table(vec!["Fires at", "Medication", "Slot", "Dosage", "Schedule"]);
        for e in &report.entries {
            table.add_row(vec![
                format_instant(e.next_trigger_ts, tz),
                e.medication_name.clone(),
                e.time_local.clone(),
                e.dosage.clone().unwrap_or_default(),
                e.recurrence_label.clone(),
            ]);
        }
        out.push_str(&table.to_string());
    }
    for w in &report.warnings {
        out.push_str(&format!("\n{} {}", "warning:".yellow(), w));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intake::IntakeStatus;

    #[test]
    fn format_instant_renders_zone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        // 2024-02-01T20:00:00-05:00 == 2024-02-02T01:00:00Z
        let s = format_instant(1_706_835_600_000, tz);
        assert!(s.starts_with("2024-02-01 20:00"), "{s}");
    }

    #[test]
    fn med_list_empty() {
        assert_eq!(format_med_list(&[]), "No medications recorded.");
    }

    #[test]
    fn intake_list_includes_status() {
        let med = Medication::new("local", "self", "aspirin");
        let mut log =
            IntakeLog::new("dt-1", IntakeStatus::Taken, 1_706_835_600_000);
        log.actual_dose_amount = Some(100.0);
        log.actual_dose_unit = Some("mg".to_string());
        let out = format_intake_list(&med, &[log], "UTC".parse().unwrap());
        assert!(out.contains("taken"));
        assert!(out.contains("100 mg"));
    }
}
