mod common;

use common::{seed_dose_time, seed_medication, setup_db};
use dosewatch::models::dose_time::DoseTime;
use dosewatch::models::medication::Medication;
use dosewatch::models::schedule::{DaySet, Schedule};

// ---------------------------------------------------------------------------
// Medication store
// ---------------------------------------------------------------------------

#[test]
fn insert_and_get_medication() {
    let (_dir, db) = setup_db();
    let med = db
        .insert_medication(&Medication::new("local", "self", "ibuprofen"))
        .unwrap();

    let fetched = db.get_medication(&med.id).unwrap().unwrap();
    assert_eq!(fetched.name, "ibuprofen");
    assert_eq!(fetched.owner_id, "local");
    assert_eq!(fetched.profile_id, "self");
}

#[test]
fn store_stamps_timestamps_not_caller() {
    let (_dir, db) = setup_db();
    let mut med = Medication::new("local", "self", "aspirin");
    // Whatever the caller puts here is overridden on insert.
    med.created_at = chrono::DateTime::UNIX_EPOCH;
    med.updated_at = chrono::DateTime::UNIX_EPOCH;

    let stored = db.insert_medication(&med).unwrap();
    assert!(stored.created_at > chrono::DateTime::UNIX_EPOCH);

    let fetched = db.get_medication(&med.id).unwrap().unwrap();
    assert!(fetched.created_at > chrono::DateTime::UNIX_EPOCH);
}

#[test]
fn update_medication_keeps_id_and_created_at() {
    let (_dir, db) = setup_db();
    let med = db
        .insert_medication(&Medication::new("local", "self", "aspirin"))
        .unwrap();

    assert!(
        db.update_medication(&med.id, "aspirin 100", Some("cardio dose"), None)
            .unwrap()
    );

    let fetched = db.get_medication(&med.id).unwrap().unwrap();
    assert_eq!(fetched.id, med.id);
    assert_eq!(fetched.name, "aspirin 100");
    assert_eq!(fetched.notes.as_deref(), Some("cardio dose"));
    assert_eq!(fetched.created_at, med.created_at);
    assert!(fetched.updated_at >= med.updated_at);
}

#[test]
fn list_medications_sorted_by_name() {
    let (_dir, db) = setup_db();
    for name in ["zolpidem", "aspirin", "metformin"] {
        db.insert_medication(&Medication::new("local", "self", name))
            .unwrap();
    }
    let names: Vec<String> = db
        .list_medications()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, ["aspirin", "metformin", "zolpidem"]);
}

// ---------------------------------------------------------------------------
// Schedule store
// ---------------------------------------------------------------------------

#[test]
fn schedule_roundtrip_preserves_fields() {
    let (_dir, db) = setup_db();
    let med = db
        .insert_medication(&Medication::new("local", "self", "metformin"))
        .unwrap();

    let mut schedule = Schedule::new(&med.id, "weekdays", "Europe/Berlin");
    schedule.is_forever = false;
    schedule.start_date = Some(1_700_000_000_000);
    schedule.end_date = Some(1_700_500_000_000);
    schedule.frequency_per_day = Some(2);
    schedule.days_of_week = "MON,TUE,WED,THU,FRI".parse::<DaySet>().unwrap();
    schedule.reminder_enabled = false;
    db.insert_schedule(&schedule).unwrap();

    let fetched = db.get_schedule(&schedule.id).unwrap().unwrap();
    assert_eq!(fetched.medication_id, med.id);
    assert_eq!(fetched.recurrence_label, "weekdays");
    assert_eq!(fetched.timezone, "Europe/Berlin");
    assert_eq!(fetched.start_date, Some(1_700_000_000_000));
    assert_eq!(fetched.end_date, Some(1_700_500_000_000));
    assert_eq!(fetched.frequency_per_day, Some(2));
    assert_eq!(fetched.days_of_week, schedule.days_of_week);
    assert!(!fetched.reminder_enabled);
}

#[test]
fn schedule_requires_existing_medication() {
    let (_dir, db) = setup_db();
    let schedule = Schedule::new("no-such-med", "daily", "UTC");
    assert!(db.insert_schedule(&schedule).is_err());
}

#[test]
fn list_schedules_by_medication_scoped() {
    let (_dir, db) = setup_db();
    let (med_a, _) = seed_medication(&db, "one");
    let (med_b, _) = seed_medication(&db, "two");
    db.insert_schedule(&Schedule::new(&med_a.id, "evening", "UTC"))
        .unwrap();

    assert_eq!(db.list_schedules_by_medication(&med_a.id).unwrap().len(), 2);
    assert_eq!(db.list_schedules_by_medication(&med_b.id).unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Dose-time store
// ---------------------------------------------------------------------------

#[test]
fn dose_time_roundtrip_and_ordering() {
    let (_dir, db) = setup_db();
    let (_med, schedule) = seed_medication(&db, "ibuprofen");

    let mut evening = DoseTime::new(&schedule.id, "20:00");
    evening.sort_order = 1;
    evening.dosage = Some("400mg".to_string());
    evening.dose_amount = Some(400.0);
    evening.dose_unit = Some("mg".to_string());
    db.insert_dose_time(&evening).unwrap();

    let mut morning = DoseTime::new(&schedule.id, "08:00");
    morning.sort_order = 0;
    db.insert_dose_time(&morning).unwrap();

    let times = db.list_dose_times_by_schedule(&schedule.id).unwrap();
    assert_eq!(times.len(), 2);
    assert_eq!(times[0].time_local, "08:00");
    assert_eq!(times[1].time_local, "20:00");
    assert_eq!(times[1].dose_amount, Some(400.0));
}

#[test]
fn dose_time_requires_existing_schedule() {
    let (_dir, db) = setup_db();
    let dose = DoseTime::new("no-such-schedule", "08:00");
    assert!(db.insert_dose_time(&dose).is_err());
}

#[test]
fn set_next_trigger_persists_snapshot() {
    let (_dir, db) = setup_db();
    let (_med, schedule) = seed_medication(&db, "ibuprofen");
    let dose = seed_dose_time(&db, &schedule.id, "08:00");

    assert!(db.set_next_trigger(&dose.id, Some(1_800_000_000_000)).unwrap());
    let fetched = db.get_dose_time(&dose.id).unwrap().unwrap();
    assert_eq!(fetched.next_trigger_ts, Some(1_800_000_000_000));

    assert!(db.set_next_trigger(&dose.id, None).unwrap());
    let fetched = db.get_dose_time(&dose.id).unwrap().unwrap();
    assert_eq!(fetched.next_trigger_ts, None);
}

#[test]
fn list_dose_times_by_medication_crosses_schedules() {
    let (_dir, db) = setup_db();
    let (med, schedule_a) = seed_medication(&db, "ibuprofen");
    let schedule_b = Schedule::new(&med.id, "evening", "UTC");
    db.insert_schedule(&schedule_b).unwrap();

    seed_dose_time(&db, &schedule_a.id, "08:00");
    seed_dose_time(&db, &schedule_b.id, "20:00");

    let all = db.list_dose_times_by_medication(&med.id).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn lenient_day_set_read_degrades_to_every_day() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let db = dosewatch::db::Database::open(&path).unwrap();
    let (_med, schedule) = seed_medication(&db, "ibuprofen");

    // Plant the numeric range form an external writer might use; the
    // strict write path rejects it.
    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute(
        "UPDATE medication_schedules SET days_of_week = '0-6' WHERE id = ?1",
        rusqlite::params![schedule.id],
    )
    .unwrap();

    let fetched = db.get_schedule(&schedule.id).unwrap().unwrap();
    assert!(fetched.days_of_week.is_empty());
}
