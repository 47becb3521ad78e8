/// CLI integration tests for dosewatch.
///
/// Each test spawns the compiled binary via `assert_cmd::cargo_bin_cmd!`
/// and sets `DOSEWATCH_HOME` to a fresh `TempDir` so tests are fully
/// isolated from the developer's real `~/.dosewatch` data.
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── helpers ──────────────────────────────────────────────────────────────────

/// Returns a `Command` with `DOSEWATCH_HOME` pointing at `dir`.
fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("dosewatch");
    c.env("DOSEWATCH_HOME", dir.path());
    c
}

/// Run `dosewatch init --skip` in the given temp dir so the config and DB
/// exist before subsequent commands.
fn init_dir(dir: &TempDir) {
    cmd_in(dir).args(["init", "--skip"]).assert().success();
}

/// Parse stdout JSON and return the root `Value`.
fn parse_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stdout.clone();
    serde_json::from_slice(&bytes).expect("stdout is not valid JSON")
}

/// Parse stderr JSON and return the root `Value`.
fn parse_stderr_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stderr.clone();
    serde_json::from_slice(&bytes).expect("stderr is not valid JSON")
}

/// Create a medication + schedule + dose time, returning (schedule_id,
/// dose_time_id).
fn seed_regimen(dir: &TempDir, name: &str, at: &str) -> (String, String) {
    cmd_in(dir).args(["med", "add", name]).assert().success();
    let out = cmd_in(dir)
        .args(["schedule", "add", name])
        .assert()
        .success();
    let schedule_id = parse_json(&out)["data"]["schedule"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let out = cmd_in(dir)
        .args(["time", "add", &schedule_id, "--at", at])
        .assert()
        .success();
    let time_id = parse_json(&out)["data"]["time"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    (schedule_id, time_id)
}

// ── init ─────────────────────────────────────────────────────────────────────

#[test]
fn init_skip_creates_config_and_db() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["init", "--skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config initialized"));

    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("data.db").exists());
}

// ── med ──────────────────────────────────────────────────────────────────────

#[test]
fn med_add_emits_envelope() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);

    let out = cmd_in(&dir)
        .args(["med", "add", "ibuprofen", "--notes", "for headaches"])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["command"], "med_add");
    assert_eq!(json["data"]["medication"]["name"], "ibuprofen");
    assert!(json["data"]["medication"]["id"].as_str().is_some());
}

#[test]
fn med_list_human_renders_table() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir).args(["med", "add", "aspirin"]).assert().success();

    cmd_in(&dir)
        .args(["med", "list", "--human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aspirin"));
}

#[test]
fn med_remove_cascades() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let (_schedule_id, time_id) = seed_regimen(&dir, "ibuprofen", "08:00");
    cmd_in(&dir)
        .args(["take", "ibuprofen"])
        .assert()
        .success();

    cmd_in(&dir)
        .args(["med", "remove", "ibuprofen", "--yes"])
        .assert()
        .success();

    // Everything under the medication is gone with it.
    let out = cmd_in(&dir).args(["med", "list"]).assert().success();
    assert_eq!(parse_json(&out)["data"]["count"], 0);
    let err = cmd_in(&dir)
        .args(["time", "remove", &time_id])
        .assert()
        .failure();
    assert_eq!(parse_stderr_json(&err)["error"]["code"], "not_found");
}

// ── schedule / time ──────────────────────────────────────────────────────────

#[test]
fn schedule_add_with_days_and_window() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir).args(["med", "add", "metformin"]).assert().success();

    let out = cmd_in(&dir)
        .args([
            "schedule", "add", "metformin", "--label", "weekday course", "--days", "MON,WED,FRI",
            "--start", "2030-01-01", "--end", "2030-03-31", "--tz", "Europe/Berlin",
        ])
        .assert()
        .success();
    let schedule = &parse_json(&out)["data"]["schedule"];
    assert_eq!(schedule["days_of_week"], "MON,WED,FRI");
    assert_eq!(schedule["is_forever"], false);
    assert_eq!(schedule["timezone"], "Europe/Berlin");
}

#[test]
fn schedule_add_rejects_bad_days() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir).args(["med", "add", "metformin"]).assert().success();

    let err = cmd_in(&dir)
        .args(["schedule", "add", "metformin", "--days", "0-6"])
        .assert()
        .failure();
    assert_eq!(parse_stderr_json(&err)["error"]["code"], "validation_error");
}

#[test]
fn time_add_computes_next_trigger() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let (_schedule_id, time_id) = seed_regimen(&dir, "ibuprofen", "08:00");

    let out = cmd_in(&dir)
        .args(["med", "show", "ibuprofen"])
        .assert()
        .success();
    let json = parse_json(&out);
    let time = &json["data"]["schedules"][0]["times"][0];
    assert_eq!(time["id"], Value::String(time_id));
    assert!(time["next_trigger_ts"].as_i64().is_some());
}

#[test]
fn prn_time_never_gets_a_trigger() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir).args(["med", "add", "ibuprofen"]).assert().success();
    let out = cmd_in(&dir)
        .args(["schedule", "add", "ibuprofen"])
        .assert()
        .success();
    let schedule_id = parse_json(&out)["data"]["schedule"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let out = cmd_in(&dir)
        .args(["time", "add", &schedule_id, "--at", "12:00", "--prn"])
        .assert()
        .success();
    let time = &parse_json(&out)["data"]["time"];
    assert_eq!(time["prn"], true);
    assert!(time["next_trigger_ts"].is_null());
}

#[test]
fn time_add_rejects_malformed_time() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir).args(["med", "add", "ibuprofen"]).assert().success();
    let out = cmd_in(&dir)
        .args(["schedule", "add", "ibuprofen"])
        .assert()
        .success();
    let schedule_id = parse_json(&out)["data"]["schedule"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let err = cmd_in(&dir)
        .args(["time", "add", &schedule_id, "--at", "24:30"])
        .assert()
        .failure();
    assert_eq!(
        parse_stderr_json(&err)["error"]["code"],
        "invalid_time_format"
    );
}

// ── take / intake ────────────────────────────────────────────────────────────

#[test]
fn take_logs_against_single_dose_time() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    seed_regimen(&dir, "ibuprofen", "08:00");

    let out = cmd_in(&dir)
        .args(["take", "ibuprofen", "--dose", "200mg", "--note", "half dose"])
        .assert()
        .success();
    let log = &parse_json(&out)["data"]["log"];
    assert_eq!(log["status"], "taken");
    assert_eq!(log["actual_dose_amount"], 200.0);
    assert_eq!(log["notes"], "half dose");

    let out = cmd_in(&dir)
        .args(["intake", "list", "ibuprofen"])
        .assert()
        .success();
    assert_eq!(parse_json(&out)["data"]["count"], 1);
}

#[test]
fn take_requires_time_id_when_ambiguous() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let (schedule_id, _) = seed_regimen(&dir, "ibuprofen", "08:00");
    cmd_in(&dir)
        .args(["time", "add", &schedule_id, "--at", "20:00"])
        .assert()
        .success();

    cmd_in(&dir)
        .args(["take", "ibuprofen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--time-id"));
}

#[test]
fn take_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    seed_regimen(&dir, "ibuprofen", "08:00");

    let err = cmd_in(&dir)
        .args(["take", "ibuprofen", "--status", "forgotten"])
        .assert()
        .failure();
    assert_eq!(parse_stderr_json(&err)["error"]["code"], "validation_error");
}

// ── upcoming ─────────────────────────────────────────────────────────────────

#[test]
fn upcoming_lists_scheduled_doses() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    seed_regimen(&dir, "ibuprofen", "08:00");
    seed_regimen(&dir, "metformin", "20:00");

    let out = cmd_in(&dir).args(["upcoming"]).assert().success();
    let json = parse_json(&out);
    let entries = json["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Soonest first.
    let first = entries[0]["next_trigger_ts"].as_i64().unwrap();
    let second = entries[1]["next_trigger_ts"].as_i64().unwrap();
    assert!(first <= second);

    let out = cmd_in(&dir)
        .args(["upcoming", "--limit", "1"])
        .assert()
        .success();
    assert_eq!(
        parse_json(&out)["data"]["entries"].as_array().unwrap().len(),
        1
    );
}

// ── config ───────────────────────────────────────────────────────────────────

#[test]
fn config_set_timezone_validates() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);

    cmd_in(&dir)
        .args(["config", "set", "timezone", "Europe/Berlin"])
        .assert()
        .success();
    let out = cmd_in(&dir).args(["config", "show"]).assert().success();
    assert_eq!(
        parse_json(&out)["data"]["config"]["profile"]["timezone"],
        "Europe/Berlin"
    );

    cmd_in(&dir)
        .args(["config", "set", "timezone", "Nowhere/Here"])
        .assert()
        .failure();
}

#[test]
fn unknown_medication_errors_with_not_found() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);

    let err = cmd_in(&dir)
        .args(["schedule", "add", "ghost"])
        .assert()
        .failure();
    assert_eq!(parse_stderr_json(&err)["error"]["code"], "not_found");
}
