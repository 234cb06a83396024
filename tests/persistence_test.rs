#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

mod common;

fn run(requests: &Path, config: &Path, db_path: &Path, today: &str) -> Output {
    Command::new(cargo_bin!("innkeeper"))
        .arg(requests)
        .arg("--config")
        .arg(config)
        .arg("--db-path")
        .arg(db_path)
        .arg("--today")
        .arg(today)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let config = common::config_file(1.0).unwrap();

    // 1. First run: book Room 7
    let csv1 =
        common::requests_file(&[common::create_row(1, 7, "2025-06-01", "2025-06-04")]).unwrap();
    let output1 = run(csv1.path(), config.path(), &db_path, "2025-05-01");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    let row = stdout1.lines().nth(1).expect("one reservation expected");
    assert!(row.contains(",CONFIRMED,CARD,SUCCESS,"));
    let reservation_id = row.split(',').next().unwrap().to_string();

    // 2. Second run: the recovered booking still blocks the room, and its
    // owner can cancel it
    let csv2 = common::requests_file(&[
        common::create_row(2, 7, "2025-06-03", "2025-06-05"),
        common::cancel_row(1, &reservation_id),
        common::create_row(2, 7, "2025-06-02", "2025-06-05"),
    ])
    .unwrap();
    let output2 = run(csv2.path(), config.path(), &db_path, "2025-05-01");
    assert!(output2.status.success());

    let stderr2 = String::from_utf8_lossy(&output2.stderr);
    assert_eq!(
        stderr2.matches("Room 7 is not available").count(),
        1,
        "only the booking before the cancel should conflict"
    );

    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains(&format!(
        "{reservation_id},1,1,7,2025-06-01,2025-06-04,3,2,300.00,CANCELLED,CARD,SUCCESS,"
    )));
    assert!(stdout2.contains(",2,1,7,2025-06-02,2025-06-05,3,2,300.00,CONFIRMED,"));
}

#[test]
fn test_cancel_after_check_in_is_rejected() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let config = common::config_file(1.0).unwrap();

    let csv1 =
        common::requests_file(&[common::create_row(1, 7, "2025-06-01", "2025-06-04")]).unwrap();
    let output1 = run(csv1.path(), config.path(), &db_path, "2025-05-01");
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    let reservation_id = stdout1
        .lines()
        .nth(1)
        .and_then(|row| row.split(',').next())
        .unwrap()
        .to_string();

    let csv2 = common::requests_file(&[
        common::cancel_row(2, &reservation_id),
        common::cancel_row(1, &reservation_id),
    ])
    .unwrap();
    let output2 = run(csv2.path(), config.path(), &db_path, "2025-06-01");

    let stderr2 = String::from_utf8_lossy(&output2.stderr);
    assert!(stderr2.contains("Actor 2 does not own reservation"));
    assert!(stderr2.contains("cannot be cancelled on 2025-06-01"));
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains(",CONFIRMED,"));
}
