#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const LAT: &str = "--lat=3.372007";
pub const LON: &str = "--lon=-76.534116";
pub const FAR_LAT: &str = "--lat=3.400000";

pub const PERSON: &str = "ISABELA OBREGON";

/// Binary under test, pointed at a config file that does not exist so that
/// every run sees the built-in defaults.
pub fn bit() -> Command {
    let mut cmd = cargo_bin_cmd!("bitacora");
    let cfg = env::temp_dir().join("bitacora_tests_no_such_config.conf");
    cmd.env("BITACORA_CONFIG", cfg);
    cmd
}

/// Binary under test reading its configuration from `config_path`.
pub fn bit_with_config(config_path: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("bitacora");
    cmd.env("BITACORA_CONFIG", config_path);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_bitacora.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_bitacora_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init(db_path: &str) {
    bit()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Record one event for PERSON at the office reference point.
pub fn attend(db_path: &str, kind: &str, date: &str, time: &str) {
    bit()
        .args([
            "--db", db_path, "attend", PERSON, "--type", kind, LAT, LON, "--date", date, "--time",
            time,
        ])
        .assert()
        .success();
}

/// Initialize DB and record two shifts in the week of 2026-10-19.
pub fn init_db_with_shifts(db_path: &str) {
    init(db_path);
    attend(db_path, "entry", "2026-10-19", "08:00");
    attend(db_path, "exit", "2026-10-19", "12:30");
    attend(db_path, "entry", "2026-10-20", "09:00");
    attend(db_path, "exit", "2026-10-20", "11:00");
}
