use std::{thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn init_without_file_creates_no_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    content_dashboard::logging::init(false, None);
    tracing::info!("dashboard started");

    sleep(Duration::from_millis(100));

    assert!(!path.exists(), "log file should not be created");
}

#[test]
#[serial]
fn init_twice_is_harmless() {
    content_dashboard::logging::init(false, None);
    content_dashboard::logging::init(true, None);
    tracing::info!("still logging");
}
