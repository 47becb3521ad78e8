//! Schedule and dose-time operations. Every write here funnels through
//! the coordinator so cached triggers and platform reminders stay in step
//! with the data.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::core::reminder::{ReminderCoordinator, ReminderDispatcher};
use crate::core::trigger::local_instant;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::dose_time::{DoseTime, parse_dosage, parse_time_local};
use crate::models::schedule::{DaySet, Schedule};

// ---------------------------------------------------------------------------
// Window date conversion
// ---------------------------------------------------------------------------

/// Inclusive window start: local midnight of `date` in the schedule zone.
fn window_start_ms(tz: Tz, date: NaiveDate) -> i64 {
    local_instant(tz, date, 0, 0).timestamp_millis()
}

/// Inclusive window end: 23:59:59 local of `date` in the schedule zone,
/// so same-day dose times still fire on the last day.
fn window_end_ms(tz: Tz, date: NaiveDate) -> i64 {
    (local_instant(tz, date, 23, 59) + Duration::seconds(59)).timestamp_millis()
}

// ---------------------------------------------------------------------------
// add_schedule
// ---------------------------------------------------------------------------

pub struct AddScheduleParams<'a> {
    pub medication_id: &'a str,
    pub label: &'a str,
    pub frequency_per_day: Option<u32>,
    pub forever: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Comma-separated weekday codes, e.g. "MON,WED,FRI".
    pub days: Option<&'a str>,
    pub timezone: &'a str,
    pub reminder_enabled: bool,
}

pub fn add_schedule(db: &Database, params: AddScheduleParams<'_>) -> Result<Schedule> {
    if db.get_medication(params.medication_id)?.is_none() {
        return Err(Error::not_found("medication", params.medication_id));
    }

    let mut schedule = Schedule::new(params.medication_id, params.label, params.timezone);
    let tz = schedule.tz()?;

    schedule.frequency_per_day = params.frequency_per_day;
    schedule.is_forever = params.forever;
    schedule.start_date = params.start_date.map(|d| window_start_ms(tz, d));
    schedule.end_date = params.end_date.map(|d| window_end_ms(tz, d));
    if let Some(days) = params.days {
        schedule.days_of_week = days.parse::<DaySet>()?;
    }
    schedule.reminder_enabled = params.reminder_enabled;

    schedule.validate()?;
    db.insert_schedule(&schedule)?;
    Ok(schedule)
}

// ---------------------------------------------------------------------------
// update_schedule
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScheduleChanges<'a> {
    pub label: Option<&'a str>,
    pub frequency_per_day: Option<u32>,
    pub forever: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days: Option<&'a str>,
    pub timezone: Option<&'a str>,
    pub reminder_enabled: Option<bool>,
}

/// Apply changes to a schedule, then recompute every dose time under it.
/// Disabling reminders cancels them; the recompute path handles both
/// directions.
pub fn update_schedule<D: ReminderDispatcher>(
    db: &Database,
    coordinator: &ReminderCoordinator<'_, D>,
    schedule_id: &str,
    changes: ScheduleChanges<'_>,
    now: DateTime<Utc>,
) -> Result<(Schedule, Vec<DoseTime>)> {
    let Some(mut schedule) = db.get_schedule(schedule_id)? else {
        return Err(Error::not_found("schedule", schedule_id));
    };

    if let Some(tz) = changes.timezone {
        schedule.timezone = tz.to_string();
    }
    let tz = schedule.tz()?;

    if let Some(label) = changes.label {
        schedule.recurrence_label = label.to_string();
    }
    if let Some(freq) = changes.frequency_per_day {
        schedule.frequency_per_day = Some(freq);
    }
    if let Some(forever) = changes.forever {
        schedule.is_forever = forever;
        if forever {
            schedule.end_date = None;
        }
    }
    if let Some(start) = changes.start_date {
        schedule.start_date = Some(window_start_ms(tz, start));
    }
    if let Some(end) = changes.end_date {
        schedule.end_date = Some(window_end_ms(tz, end));
        schedule.is_forever = false;
    }
    if let Some(days) = changes.days {
        schedule.days_of_week = days.parse::<DaySet>()?;
    }
    if let Some(enabled) = changes.reminder_enabled {
        schedule.reminder_enabled = enabled;
    }

    schedule.validate()?;
    let tx = db.transaction()?;
    if !db.update_schedule(&schedule)? {
        return Err(Error::not_found("schedule", schedule_id));
    }
    let times = coordinator.recompute_schedule(&schedule, now)?;
    tx.commit()?;
    Ok((schedule, times))
}

// ---------------------------------------------------------------------------
// remove_schedule
// ---------------------------------------------------------------------------

pub fn remove_schedule<D: ReminderDispatcher>(
    coordinator: &ReminderCoordinator<'_, D>,
    schedule_id: &str,
) -> Result<()> {
    if !coordinator.delete_schedule(schedule_id)? {
        return Err(Error::not_found("schedule", schedule_id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// add_dose_time
// ---------------------------------------------------------------------------

pub struct AddDoseTimeParams<'a> {
    pub schedule_id: &'a str,
    /// "HH:MM", 24-hour, in the schedule's timezone.
    pub time_local: &'a str,
    pub dosage: Option<&'a str>,
    pub instructions: Option<&'a str>,
    pub prn: bool,
    pub sort_order: Option<i64>,
}

/// Create a dose time and immediately compute, persist and dispatch its
/// first trigger snapshot.
pub fn add_dose_time<D: ReminderDispatcher>(
    db: &Database,
    coordinator: &ReminderCoordinator<'_, D>,
    params: AddDoseTimeParams<'_>,
    now: DateTime<Utc>,
) -> Result<DoseTime> {
    let Some(schedule) = db.get_schedule(params.schedule_id)? else {
        return Err(Error::not_found("schedule", params.schedule_id));
    };

    parse_time_local(params.time_local)?;

    let parsed = parse_dosage(params.dosage);
    let mut dose = DoseTime::new(&schedule.id, params.time_local.trim());
    dose.dosage = params.dosage.map(str::to_string);
    dose.dose_amount = parsed.amount;
    dose.dose_unit = parsed.unit;
    dose.instructions = params.instructions.map(str::to_string);
    dose.prn = params.prn;
    if let Some(order) = params.sort_order {
        dose.sort_order = order;
    } else {
        dose.sort_order = db.list_dose_times_by_schedule(&schedule.id)?.len() as i64;
    }

    let tx = db.transaction()?;
    db.insert_dose_time(&dose)?;
    dose.next_trigger_ts = coordinator.recompute_dose_time(&schedule, &dose, now)?;
    tx.commit()?;
    Ok(dose)
}

// ---------------------------------------------------------------------------
// update_dose_time
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DoseTimeChanges<'a> {
    pub time_local: Option<&'a str>,
    pub dosage: Option<&'a str>,
    pub instructions: Option<&'a str>,
    pub prn: Option<bool>,
    pub sort_order: Option<i64>,
}

pub fn update_dose_time<D: ReminderDispatcher>(
    db: &Database,
    coordinator: &ReminderCoordinator<'_, D>,
    dose_time_id: &str,
    changes: DoseTimeChanges<'_>,
    now: DateTime<Utc>,
) -> Result<DoseTime> {
    let Some(mut dose) = db.get_dose_time(dose_time_id)? else {
        return Err(Error::not_found("dose time", dose_time_id));
    };
    let Some(schedule) = db.get_schedule(&dose.schedule_id)? else {
        return Err(Error::not_found("schedule", dose.schedule_id.clone()));
    };

    if let Some(t) = changes.time_local {
        parse_time_local(t)?;
        dose.time_local = t.trim().to_string();
    }
    if let Some(d) = changes.dosage {
        let parsed = parse_dosage(Some(d));
        dose.dosage = Some(d.to_string());
        dose.dose_amount = parsed.amount;
        dose.dose_unit = parsed.unit;
    }
    if let Some(i) = changes.instructions {
        dose.instructions = Some(i.to_string());
    }
    if let Some(prn) = changes.prn {
        dose.prn = prn;
    }
    if let Some(order) = changes.sort_order {
        dose.sort_order = order;
    }

    let tx = db.transaction()?;
    if !db.update_dose_time(&dose)? {
        return Err(Error::not_found("dose time", dose_time_id));
    }
    dose.next_trigger_ts = coordinator.recompute_dose_time(&schedule, &dose, now)?;
    tx.commit()?;
    Ok(dose)
}

// ---------------------------------------------------------------------------
// remove_dose_time
// ---------------------------------------------------------------------------

pub fn remove_dose_time<D: ReminderDispatcher>(
    coordinator: &ReminderCoordinator<'_, D>,
    dose_time_id: &str,
) -> Result<()> {
    if !coordinator.delete_dose_time(dose_time_id)? {
        return Err(Error::not_found("dose time", dose_time_id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Listing passthroughs
// ---------------------------------------------------------------------------

pub fn list_schedules(db: &Database, medication_id: &str) -> Result<Vec<Schedule>> {
    db.list_schedules_by_medication(medication_id)
}

pub fn list_dose_times(db: &Database, schedule_id: &str) -> Result<Vec<DoseTime>> {
    db.list_dose_times_by_schedule(schedule_id)
}
