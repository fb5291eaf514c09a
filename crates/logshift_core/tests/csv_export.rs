use chrono::NaiveDate;
use logshift_core::db::open_db_in_memory;
use logshift_core::export::csv_export::{CSV_HEADER, EXPORT_FILE_NAME};
use logshift_core::{CsvExporter, ExportError, SqliteTrackerRepository, Tracker, TrackerError};

#[test]
fn export_writes_header_plus_one_row_per_entry() {
    let conn = open_db_in_memory().unwrap();
    let tracker = Tracker::new(SqliteTrackerRepository::try_new(&conn).unwrap());
    let alice = tracker.add_user("alice").unwrap();
    let bob = tracker.add_user("bob").unwrap();
    let web = tracker.add_project("P1", "Website").unwrap();
    tracker
        .add_work_entry(&alice, date(10), &web, 4.0, "design")
        .unwrap();
    tracker
        .add_work_entry(&alice, date(11), &web, 2.5, "build")
        .unwrap();
    tracker
        .add_work_entry(&bob, date(11), &web, 1.0, "review")
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let summary = tracker.save_work_entries_to_csv(&alice, &exporter).unwrap();

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.path, dir.path().join(EXPORT_FILE_NAME));

    let text = std::fs::read_to_string(&summary.path).unwrap();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert_eq!(lines[1], "alice,2024-01-10,Website,4.0,design");
    assert_eq!(lines[2], "alice,2024-01-11,Website,2.5,build");
}

#[test]
fn export_without_entries_writes_header_only() {
    let conn = open_db_in_memory().unwrap();
    let tracker = Tracker::new(SqliteTrackerRepository::try_new(&conn).unwrap());
    let alice = tracker.add_user("alice").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path().join("exports"));
    let summary = tracker.save_work_entries_to_csv(&alice, &exporter).unwrap();

    assert_eq!(summary.rows, 0);
    let text = std::fs::read_to_string(exporter.file_path()).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn export_overwrites_previous_file() {
    let conn = open_db_in_memory().unwrap();
    let tracker = Tracker::new(SqliteTrackerRepository::try_new(&conn).unwrap());
    let alice = tracker.add_user("alice").unwrap();
    let bob = tracker.add_user("bob").unwrap();
    let web = tracker.add_project("P1", "Website").unwrap();
    for day in 1..=5 {
        tracker
            .add_work_entry(&alice, date(day), &web, 1.0, "daily")
            .unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());
    tracker.save_work_entries_to_csv(&alice, &exporter).unwrap();
    tracker.save_work_entries_to_csv(&bob, &exporter).unwrap();

    let text = std::fs::read_to_string(exporter.file_path()).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(!text.contains("alice"));
}

#[test]
fn export_into_unwritable_location_fails() {
    let conn = open_db_in_memory().unwrap();
    let tracker = Tracker::new(SqliteTrackerRepository::try_new(&conn).unwrap());
    let alice = tracker.add_user("alice").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();
    let exporter = CsvExporter::new(&blocker);

    let err = tracker
        .save_work_entries_to_csv(&alice, &exporter)
        .unwrap_err();
    assert!(matches!(err, TrackerError::Export(ExportError::Io { .. })));
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}
