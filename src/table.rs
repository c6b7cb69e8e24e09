//! The attendance sheet held in memory.
//!
//! Rows are keyed by roll number and date columns by label, both through
//! index maps kept in step with the ordered row and column vectors. The
//! "Detained" column is a dedicated field that always renders last.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Status, StudentRecord};
use crate::workbook;

pub const SHEET_NAME: &str = "Attendance";
pub const NAME_HEADER: &str = "Student Name";
pub const ROLL_HEADER: &str = "Roll Number";
pub const DETAINED_HEADER: &str = "Detained";

/// Number of fixed columns ahead of the date columns.
pub const FIXED_COLUMNS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
struct Row {
    name: String,
    roll_number: String,
    /// Indexed like `AttendanceTable::dates`; may be shorter than it.
    marks: Vec<Option<String>>,
    detained: Option<String>,
}

impl Row {
    fn set_mark(&mut self, col: usize, value: String) {
        if self.marks.len() <= col {
            self.marks.resize(col + 1, None);
        }
        self.marks[col] = Some(value);
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceTable {
    sheet_name: String,
    dates: Vec<String>,
    date_index: HashMap<String, usize>,
    rows: Vec<Row>,
    row_index: HashMap<String, usize>,
    has_detained: bool,
    attendance: HashMap<String, StudentRecord>,
}

impl Default for AttendanceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceTable {
    /// An empty sheet holding only the name and roll number headers.
    pub fn new() -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
            dates: Vec::new(),
            date_index: HashMap::new(),
            rows: Vec::new(),
            row_index: HashMap::new(),
            has_detained: false,
            attendance: HashMap::new(),
        }
    }

    /// Opens the workbook at `path`, or starts a fresh sheet if there is none.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "workbook not found, creating a new one");
            return Ok(Self::new());
        }
        let (sheet_name, grid) = workbook::read_grid(path)?;
        let table = Self::from_grid(sheet_name, grid);
        info!(
            path = %path.display(),
            students = table.rows.len(),
            dates = table.dates.len(),
            "loaded workbook"
        );
        Ok(table)
    }

    /// Builds a table from raw sheet cells, row 1 being the header.
    pub fn from_grid(sheet_name: impl Into<String>, grid: Vec<Vec<Option<String>>>) -> Self {
        let mut table = Self::new();
        table.sheet_name = sheet_name.into();

        // Cells right of the last header label get unlabeled columns so they
        // stay put instead of landing under a date added later.
        let width = grid
            .iter()
            .filter_map(|cells| cells.iter().rposition(Option::is_some))
            .map(|last| last + 1)
            .max()
            .unwrap_or(0);

        let mut grid = grid.into_iter();
        let header = grid.next().unwrap_or_default();
        let mut trailing: Vec<String> = header
            .into_iter()
            .skip(FIXED_COLUMNS)
            .map(Option::unwrap_or_default)
            .collect();
        let labeled = trailing.len();
        if width > FIXED_COLUMNS + labeled {
            warn!(
                columns = width - FIXED_COLUMNS - labeled,
                "cells beyond the header row, keeping them in unlabeled columns"
            );
            trailing.resize(width - FIXED_COLUMNS, String::new());
        }

        // Only the last "Detained" header past the fixed columns is the summary
        // column; any earlier one stays an ordinary column.
        let detained_at = trailing.iter().rposition(|h| h == DETAINED_HEADER);
        for (i, label) in trailing.iter().enumerate() {
            if Some(i) != detained_at {
                table.push_date_column(label.clone());
            }
        }
        table.has_detained = detained_at.is_some();

        for cells in grid {
            if cells.iter().all(Option::is_none) {
                continue;
            }
            let mut cells = cells.into_iter();
            let name = cells.next().flatten().unwrap_or_default();
            let roll_number = cells.next().flatten().unwrap_or_default();
            let rest: Vec<Option<String>> = cells.collect();

            let mut row = Row {
                name,
                roll_number,
                ..Row::default()
            };
            for (i, value) in rest.into_iter().enumerate() {
                if Some(i) == detained_at {
                    row.detained = value;
                } else if let Some(value) = value {
                    let col = match detained_at {
                        Some(d) if i > d => i - 1,
                        _ => i,
                    };
                    row.set_mark(col, value);
                }
            }
            table.push_row(row);
        }
        table
    }

    fn push_date_column(&mut self, label: String) -> usize {
        let col = self.dates.len();
        if !label.is_empty() {
            self.date_index.entry(label.clone()).or_insert(col);
        }
        self.dates.push(label);
        col
    }

    fn push_row(&mut self, row: Row) -> usize {
        let idx = self.rows.len();
        if !row.roll_number.is_empty() {
            if self.row_index.contains_key(&row.roll_number) {
                warn!(roll_number = %row.roll_number, "duplicate roll number in sheet, keeping the first row");
            } else {
                self.row_index.insert(row.roll_number.clone(), idx);
            }
        }
        self.rows.push(row);
        idx
    }

    /// Records one mark, growing the sheet by at most one row and one column.
    ///
    /// A repeated mark for the same student and date overwrites the earlier one
    /// in the sheet, but every call still counts toward the student's tally.
    pub fn record_mark(
        &mut self,
        name: &str,
        roll_number: &str,
        date_label: &str,
        status: Status,
    ) -> Result<()> {
        if date_label.is_empty() || date_label == DETAINED_HEADER {
            return Err(Error::InvalidDate(date_label.to_string()));
        }
        if roll_number.is_empty() {
            return Err(Error::MissingRollNumber(name.to_string()));
        }

        self.attendance
            .entry(roll_number.to_string())
            .or_insert_with(|| StudentRecord::new(name))
            .record(status);

        let row = match self.row_index.get(roll_number) {
            Some(&row) => {
                if self.rows[row].name != name {
                    warn!(
                        roll_number,
                        sheet_name = %self.rows[row].name,
                        name,
                        "name differs from the sheet, keeping the sheet's"
                    );
                }
                row
            }
            None => {
                debug!(roll_number, name, "adding student row");
                self.push_row(Row {
                    name: name.to_string(),
                    roll_number: roll_number.to_string(),
                    ..Row::default()
                })
            }
        };

        let col = match self.date_index.get(date_label) {
            Some(&col) => col,
            None => {
                debug!(date = date_label, "adding date column");
                self.push_date_column(date_label.to_string())
            }
        };

        self.rows[row].set_mark(col, status.code().to_string());
        Ok(())
    }

    /// Sets "Detained" for every student marked this session, adding the column if needed.
    pub fn finalize(&mut self) {
        self.has_detained = true;
        for row in &mut self.rows {
            let Some(verdict) = self
                .attendance
                .get(&row.roll_number)
                .and_then(StudentRecord::is_detained)
            else {
                continue;
            };
            row.detained = Some(if verdict { "Yes" } else { "No" }.to_string());
        }
    }

    /// Finalizes the summary column and writes the whole sheet to `path`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.finalize();
        workbook::write_table(self, path)?;
        info!(path = %path.display(), students = self.rows.len(), "saved workbook");
        Ok(())
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn has_detained_column(&self) -> bool {
        self.has_detained
    }

    pub fn student_count(&self) -> usize {
        self.rows.len()
    }

    pub fn record(&self, roll_number: &str) -> Option<&StudentRecord> {
        self.attendance.get(roll_number)
    }

    pub fn column_count(&self) -> usize {
        FIXED_COLUMNS + self.dates.len() + usize::from(self.has_detained)
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![NAME_HEADER.to_string(), ROLL_HEADER.to_string()];
        header.extend(self.dates.iter().cloned());
        if self.has_detained {
            header.push(DETAINED_HEADER.to_string());
        }
        header
    }

    /// Cell value at a 1-based `(row, column)`, row 1 being the header.
    /// Blank cells are `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.raw_cell(row, col).filter(|v| !v.is_empty())
    }

    fn raw_cell(&self, row: usize, col: usize) -> Option<&str> {
        if row == 0 || col == 0 || col > self.column_count() {
            return None;
        }
        if row == 1 {
            return match col {
                1 => Some(NAME_HEADER),
                2 => Some(ROLL_HEADER),
                c if c - FIXED_COLUMNS <= self.dates.len() => {
                    Some(self.dates[c - FIXED_COLUMNS - 1].as_str())
                }
                _ => Some(DETAINED_HEADER),
            };
        }
        let r = self.rows.get(row - 2)?;
        match col {
            1 => Some(r.name.as_str()),
            2 => Some(r.roll_number.as_str()),
            c if c - FIXED_COLUMNS <= self.dates.len() => r
                .marks
                .get(c - FIXED_COLUMNS - 1)
                .and_then(|m| m.as_deref()),
            _ => r.detained.as_deref(),
        }
    }

    pub fn row_of(&self, roll_number: &str) -> Option<usize> {
        self.row_index.get(roll_number).map(|r| r + 2)
    }

    pub fn column_of(&self, date_label: &str) -> Option<usize> {
        self.date_index
            .get(date_label)
            .map(|c| c + FIXED_COLUMNS + 1)
    }

    pub fn detained_column(&self) -> Option<usize> {
        self.has_detained.then(|| self.column_count())
    }

    /// The full sheet as rows of cells, header first.
    pub fn grid(&self) -> Vec<Vec<Option<String>>> {
        let width = self.column_count();
        (1..=self.rows.len() + 1)
            .map(|row| {
                (1..=width)
                    .map(|col| self.cell(row, col).map(str::to_string))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect()
    }

    #[test]
    fn new_table_has_only_header() {
        let table = AttendanceTable::new();
        assert_eq!(table.header(), vec!["Student Name", "Roll Number"]);
        assert_eq!(table.student_count(), 0);
        assert_eq!(table.sheet_name(), "Attendance");
        assert_eq!(table.detained_column(), None);
    }

    #[test]
    fn repeated_mark_overwrites_cell() {
        let mut table = AttendanceTable::new();
        table
            .record_mark("Kaushik Bagde", "23005019", "2024-07-11", Status::Present)
            .unwrap();
        table
            .record_mark("Kaushik Bagde", "23005019", "2024-07-11", Status::Absent)
            .unwrap();

        assert_eq!(table.student_count(), 1);
        assert_eq!(table.dates(), ["2024-07-11"]);
        assert_eq!(table.cell(2, 3), Some("A"));
        assert_eq!(table.row_of("23005019"), Some(2));
        assert_eq!(table.column_of("2024-07-11"), Some(3));
        // both calls count toward the tally
        assert_eq!(table.record("23005019").unwrap().total_days_marked, 2);
    }

    #[test]
    fn columns_follow_first_seen_order() {
        let mut table = AttendanceTable::new();
        for date in ["2024-07-18", "2024-07-11", "2024-07-18"] {
            table
                .record_mark("Madhav Emineni", "23005023", date, Status::Present)
                .unwrap();
        }
        assert_eq!(
            table.header(),
            vec!["Student Name", "Roll Number", "2024-07-18", "2024-07-11"]
        );
    }

    #[test]
    fn finalize_sets_detained_from_tally() {
        let mut table = AttendanceTable::new();
        let marks = [
            ("2024-07-11", Status::Present, Status::Present),
            ("2024-07-18", Status::Present, Status::Present),
            ("2024-07-25", Status::Absent, Status::Present),
            ("2024-08-01", Status::Absent, Status::Absent),
        ];
        for (date, first, second) in marks {
            table
                .record_mark("Kaushik Bagde", "23005019", date, first)
                .unwrap();
            table
                .record_mark("Krushna Mandare", "23005021", date, second)
                .unwrap();
        }
        table.finalize();

        let kaushik = table.record("23005019").unwrap();
        assert_eq!((kaushik.total_days_marked, kaushik.present_days), (4, 2));

        assert_eq!(table.detained_column(), Some(7));
        assert_eq!(table.cell(1, 7), Some("Detained"));
        assert_eq!(table.cell(2, 7), Some("Yes"));
        assert_eq!(table.cell(3, 7), Some("No"));
    }

    #[test]
    fn unmarked_rows_keep_prior_detained_value() {
        let grid = vec![
            strings(&["Student Name", "Roll Number", "2024-07-11", "Detained"]),
            strings(&["Nikhil Parashar", "23005026", "A", "Yes"]),
            strings(&["Nishad Bhale", "23005028", "P", "No"]),
        ];
        let mut table = AttendanceTable::from_grid("Attendance", grid);
        table
            .record_mark("Nishad Bhale", "23005028", "2024-07-18", Status::Absent)
            .unwrap();
        table.finalize();

        assert_eq!(
            table.header(),
            vec!["Student Name", "Roll Number", "2024-07-11", "2024-07-18", "Detained"]
        );
        assert_eq!(table.cell(2, 5), Some("Yes"));
        // only this session's single absence counts
        assert_eq!(table.cell(3, 5), Some("Yes"));
        assert_eq!(table.cell(3, 3), Some("P"));
        assert_eq!(table.cell(3, 4), Some("A"));
    }

    #[test]
    fn from_grid_keeps_dates_after_a_misplaced_detained_column() {
        let grid = vec![
            strings(&["Student Name", "Roll Number", "2024-07-11", "Detained", "2024-07-18"]),
            strings(&["Nikita Rathod", "23005027", "P", "No", "A"]),
        ];
        let table = AttendanceTable::from_grid("Attendance", grid);
        assert_eq!(
            table.header(),
            vec!["Student Name", "Roll Number", "2024-07-11", "2024-07-18", "Detained"]
        );
        assert_eq!(table.cell(2, 4), Some("A"));
        assert_eq!(table.cell(2, 5), Some("No"));
    }

    #[test]
    fn detained_is_not_a_date_label() {
        let mut table = AttendanceTable::new();
        let err = table
            .record_mark("Milind Kumar", "23005024", "Detained", Status::Present)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
        assert!(table.record("23005024").is_none());
    }

    #[test]
    fn blank_roll_number_is_refused() {
        let mut table = AttendanceTable::new();
        for date in ["2024-07-11", "2024-07-18"] {
            let err = table
                .record_mark("Ada", "", date, Status::Present)
                .unwrap_err();
            assert!(matches!(err, Error::MissingRollNumber(ref n) if n == "Ada"));
        }
        assert_eq!(table.student_count(), 0);
    }

    #[test]
    fn cells_past_the_header_do_not_become_marks_for_new_dates() {
        let grid = vec![
            strings(&["Student Name", "Roll Number", "2024-07-11"]),
            strings(&["Ada", "1", "P", "stray"]),
        ];
        let mut table = AttendanceTable::from_grid("Attendance", grid);
        table
            .record_mark("Grace", "2", "2024-07-18", Status::Absent)
            .unwrap();

        let col = table.column_of("2024-07-18").unwrap();
        assert_eq!(col, 5);
        assert_eq!(table.cell(2, col), None);
        assert_eq!(table.cell(3, col), Some("A"));
        // the stray value stays where it was, under an empty header
        assert_eq!(table.cell(1, 4), None);
        assert_eq!(table.cell(2, 4), Some("stray"));
    }

    #[test]
    fn grid_pads_missing_marks() {
        let mut table = AttendanceTable::new();
        table
            .record_mark("Kaushik Bagde", "23005019", "2024-07-11", Status::Present)
            .unwrap();
        table
            .record_mark("Krushna Mandare", "23005021", "2024-07-18", Status::Absent)
            .unwrap();
        assert_eq!(
            table.grid(),
            vec![
                strings(&["Student Name", "Roll Number", "2024-07-11", "2024-07-18"]),
                strings(&["Kaushik Bagde", "23005019", "P", ""]),
                strings(&["Krushna Mandare", "23005021", "", "A"]),
            ]
        );
    }
}
