//! Save and reload through a real `.xlsx` file.

use roll_call::{AttendanceTable, Status};
use tempfile::TempDir;

const DATES: [&str; 4] = ["2024-07-11", "2024-07-18", "2024-07-25", "2024-08-01"];

#[test]
fn missing_file_starts_with_header_only() {
    let dir = TempDir::new().unwrap();
    let table = AttendanceTable::open_or_create(&dir.path().join("attendance.xlsx")).unwrap();

    assert_eq!(table.header(), vec!["Student Name", "Roll Number"]);
    assert_eq!(table.student_count(), 0);
}

#[test]
fn reload_preserves_every_cell() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("attendance.xlsx");

    let mut table = AttendanceTable::open_or_create(&path).unwrap();
    let kaushik = [Status::Present, Status::Absent, Status::Present, Status::Absent];
    let nikita = [Status::Present, Status::Present, Status::Present, Status::Absent];
    for ((date, k), n) in DATES.iter().zip(kaushik).zip(nikita) {
        table
            .record_mark("Kaushik Bagde", "23005019", date, k)
            .unwrap();
        table
            .record_mark("Nikita Rathod", "23005027", date, n)
            .unwrap();
    }
    table.save(&path).unwrap();

    let record = table.record("23005019").unwrap();
    assert_eq!((record.total_days_marked, record.present_days), (4, 2));
    assert_eq!(record.percentage(), Some(50.0));

    let reloaded = AttendanceTable::open_or_create(&path).unwrap();
    assert_eq!(reloaded.sheet_name(), "Attendance");
    assert_eq!(reloaded.grid(), table.grid());
    assert_eq!(
        reloaded.header(),
        vec![
            "Student Name",
            "Roll Number",
            "2024-07-11",
            "2024-07-18",
            "2024-07-25",
            "2024-08-01",
            "Detained",
        ]
    );
    assert_eq!(reloaded.cell(2, 7), Some("Yes"));
    assert_eq!(reloaded.cell(3, 7), Some("No"));
}

#[test]
fn later_session_extends_existing_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("attendance.xlsx");

    let mut first = AttendanceTable::open_or_create(&path).unwrap();
    first
        .record_mark("Milind Kumar", "23005024", DATES[0], Status::Absent)
        .unwrap();
    first
        .record_mark("Nishad Bhale", "23005028", DATES[0], Status::Present)
        .unwrap();
    first.save(&path).unwrap();

    let mut second = AttendanceTable::open_or_create(&path).unwrap();
    second
        .record_mark("Nishad Bhale", "23005028", DATES[1], Status::Absent)
        .unwrap();
    second
        .record_mark("Nishad Bhale", "23005028", DATES[0], Status::Absent)
        .unwrap();
    second.save(&path).unwrap();

    let reloaded = AttendanceTable::open_or_create(&path).unwrap();
    assert_eq!(reloaded.student_count(), 2);
    assert_eq!(reloaded.detained_column(), Some(5));
    assert_eq!(reloaded.column_of(DATES[1]), Some(4));
    assert_eq!(reloaded.row_of("23005028"), Some(3));
    assert_eq!(reloaded.cell(3, 3), Some("A"));
    assert_eq!(reloaded.cell(3, 4), Some("A"));
    // untouched this session, keeps the verdict from the first save
    assert_eq!(reloaded.cell(2, 5), Some("Yes"));
    assert_eq!(reloaded.cell(2, 4), None);
    assert_eq!(reloaded.cell(3, 5), Some("Yes"));
}
