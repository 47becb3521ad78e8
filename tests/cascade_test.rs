mod common;

use common::{RecordingDispatcher, seed_dose_time, seed_medication, setup_db};
use dosewatch::core::reminder::ReminderCoordinator;
use dosewatch::db::Database;
use dosewatch::models::intake::{IntakeLog, IntakeStatus};
use dosewatch::models::schedule::Schedule;
use tempfile::TempDir;

fn row_count(path: &std::path::Path, table: &str) -> i64 {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn seed_full_tree(db: &Database) -> (String, Vec<String>) {
    let (med, schedule_a) = seed_medication(db, "ibuprofen");
    let schedule_b = Schedule::new(&med.id, "evening", "UTC");
    db.insert_schedule(&schedule_b).unwrap();

    let mut dose_ids = Vec::new();
    for (schedule_id, at) in [
        (&schedule_a.id, "08:00"),
        (&schedule_a.id, "20:00"),
        (&schedule_b.id, "22:00"),
    ] {
        let dose = seed_dose_time(db, schedule_id, at);
        db.insert_intake_log(&IntakeLog::new(&dose.id, IntakeStatus::Taken, 1_700_000_000_000))
            .unwrap();
        dose_ids.push(dose.id);
    }
    (med.id, dose_ids)
}

#[test]
fn deleting_medication_leaves_no_residual_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(&path).unwrap();
    let (med_id, _) = seed_full_tree(&db);

    // A second medication that must survive untouched.
    let (other_med, other_schedule) = seed_medication(&db, "metformin");
    seed_dose_time(&db, &other_schedule.id, "09:00");

    assert!(db.delete_medication(&med_id).unwrap());

    assert_eq!(row_count(&path, "medications"), 1);
    assert_eq!(row_count(&path, "medication_schedules"), 1);
    assert_eq!(row_count(&path, "medication_schedule_times"), 1);
    assert_eq!(row_count(&path, "medication_intake_logs"), 0);
    assert!(db.get_medication(&other_med.id).unwrap().is_some());
}

#[test]
fn deleting_schedule_cascades_to_times_and_logs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(&path).unwrap();
    let (med, schedule) = seed_medication(&db, "ibuprofen");
    let dose = seed_dose_time(&db, &schedule.id, "08:00");
    db.insert_intake_log(&IntakeLog::new(&dose.id, IntakeStatus::Taken, 1_700_000_000_000))
        .unwrap();

    assert!(db.delete_schedule(&schedule.id).unwrap());

    assert!(db.get_medication(&med.id).unwrap().is_some());
    assert_eq!(row_count(&path, "medication_schedules"), 0);
    assert_eq!(row_count(&path, "medication_schedule_times"), 0);
    assert_eq!(row_count(&path, "medication_intake_logs"), 0);
}

#[test]
fn deleting_dose_time_cascades_to_logs_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(&path).unwrap();
    let (_med, schedule) = seed_medication(&db, "ibuprofen");
    let dose = seed_dose_time(&db, &schedule.id, "08:00");
    db.insert_intake_log(&IntakeLog::new(&dose.id, IntakeStatus::Taken, 1_700_000_000_000))
        .unwrap();

    assert!(db.delete_dose_time(&dose.id).unwrap());

    assert_eq!(row_count(&path, "medication_schedules"), 1);
    assert_eq!(row_count(&path, "medication_schedule_times"), 0);
    assert_eq!(row_count(&path, "medication_intake_logs"), 0);
}

#[test]
fn coordinator_cancels_every_reminder_before_medication_delete() {
    let (_dir, db) = setup_db();
    let (med_id, dose_ids) = seed_full_tree(&db);

    let dispatcher = RecordingDispatcher::default();
    let coordinator = ReminderCoordinator::new(&db, &dispatcher);
    assert!(coordinator.delete_medication(&med_id).unwrap());

    let events = dispatcher.events();
    assert_eq!(events.len(), dose_ids.len());
    for dose_id in &dose_ids {
        assert!(events.iter().any(|e| matches!(
            e,
            common::DispatchEvent::Cancel { reminder_id } if reminder_id == dose_id
        )));
    }
}

#[test]
fn delete_missing_medication_reports_false() {
    let (_dir, db) = setup_db();
    assert!(!db.delete_medication("no-such-id").unwrap());
}
