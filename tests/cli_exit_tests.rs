use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rusqlite::Connection;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vital-csv-cli-{}-{}", name, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn vital_csv(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vital-csv"))
        .args(args)
        .current_dir(cwd)
        .env_remove("VITAL_CSV_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run vital-csv")
}

fn write_db(path: &Path, with_tables: bool) {
    let conn = Connection::open(path).expect("open sqlite");
    let sql = if with_tables {
        r#"
        CREATE TABLE ZLOGGEDTIME (Z_PK INTEGER PRIMARY KEY, ZTIME TIMESTAMP);
        CREATE TABLE ZLOGGEDDATA (
            Z_PK INTEGER PRIMARY KEY,
            ZTYPE INTEGER,
            ZTIMESTAMP INTEGER,
            Z_FOK_TIMESTAMP INTEGER,
            ZVALUE FLOAT
        );
        INSERT INTO ZLOGGEDTIME (Z_PK, ZTIME) VALUES (1, 0), (2, 1);
        INSERT INTO ZLOGGEDDATA (ZTYPE, ZTIMESTAMP, Z_FOK_TIMESTAMP, ZVALUE)
            VALUES (8, 1, 0, 0.5), (8, 2, 1, 0.25);
        "#
    } else {
        "CREATE TABLE unrelated (id INTEGER);"
    };
    conn.execute_batch(sql).expect("create schema");
}

#[test]
/// Anything but exactly one input prints usage and exits cleanly.
fn usage_exits_zero() {
    let dir = temp_dir("usage");
    for args in [&[][..], &["a.sqlite", "b.sqlite"][..]] {
        let out = vital_csv(&dir, args);
        assert_eq!(out.status.code(), Some(0), "args {args:?}");
        assert!(!out.stderr.is_empty(), "usage should be printed for {args:?}");
    }
}

#[test]
fn missing_input_exits_one() {
    let dir = temp_dir("missing");
    let out = vital_csv(&dir, &["absent.sqlite"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.join("absent.ecg_i.csv").exists());
}

#[test]
fn successful_extraction_exits_zero() {
    let dir = temp_dir("ok");
    write_db(&dir.join("vital.sqlite"), true);
    fs::create_dir_all(dir.join("out")).expect("create out dir");

    let out = vital_csv(&dir, &["-d", "out", "--utc", "vital.sqlite"]);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(dir.join("out/vital.ecg_i.csv").exists());
    assert!(dir.join("out/vital.acc_i.csv").exists());
}

#[test]
/// Both streams failing their query is reported through the exit status.
fn failed_streams_exit_one() {
    let dir = temp_dir("noschema");
    write_db(&dir.join("other.sqlite"), false);

    let out = vital_csv(&dir, &["other.sqlite"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.join("other.ecg_i.csv").exists());
    assert!(!dir.join("other.acc_i.csv").exists());
}
