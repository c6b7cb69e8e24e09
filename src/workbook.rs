//! Reading and writing the `.xlsx` file behind an [`AttendanceTable`].

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use tracing::debug;
use umya_spreadsheet::{HorizontalAlignmentValues, Spreadsheet};

use crate::error::{Error, Result};
use crate::table::{AttendanceTable, FIXED_COLUMNS};

const NAME_WIDTH: f64 = 25.0;
const ROLL_WIDTH: f64 = 20.0;
const DATE_WIDTH: f64 = 15.0;

struct SheetFormats {
    centered_header: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            centered_header: Format::new().set_align(FormatAlign::Center),
        }
    }
}

fn open_book(path: &Path) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path).map_err(|e| Error::WorkbookRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Returns the active sheet's name and its cells, row 1 first. Blank cells are `None`.
pub fn read_grid(path: &Path) -> Result<(String, Vec<Vec<Option<String>>>)> {
    let book = open_book(path)?;
    if book.get_sheet_collection().is_empty() {
        return Err(Error::WorkbookRead {
            path: path.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        });
    }
    let sheet = book.get_active_sheet();

    let (max_col, max_row) = sheet.get_highest_column_and_row();
    debug!(sheet = sheet.get_name(), max_col, max_row, "reading sheet");

    let grid = (1..=max_row)
        .map(|row| {
            (1..=max_col)
                .map(|col| {
                    sheet
                        .get_cell((col, row))
                        .map(|cell| cell.get_value().to_string())
                        .filter(|v| !v.is_empty())
                })
                .collect()
        })
        .collect();
    Ok((sheet.get_name().to_string(), grid))
}

/// Saves the table to `path`. An existing workbook is updated in place so its
/// other sheets and styling survive; otherwise a new single-sheet file is made.
pub fn write_table(table: &AttendanceTable, path: &Path) -> Result<()> {
    if path.exists() {
        update_table(table, path)
    } else {
        create_table(table, path)
    }
}

fn create_table(table: &AttendanceTable, path: &Path) -> Result<()> {
    let fmt = SheetFormats::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name())?;

    for (r, cells) in table.grid().iter().enumerate() {
        for (c, value) in cells.iter().enumerate() {
            let Some(value) = value else { continue };
            if r == 0 && c >= FIXED_COLUMNS {
                worksheet.write_string_with_format(0, c as u16, value, &fmt.centered_header)?;
            } else {
                worksheet.write_string(r as u32, c as u16, value)?;
            }
        }
    }

    worksheet.set_column_width(0, NAME_WIDTH)?;
    worksheet.set_column_width(1, ROLL_WIDTH)?;
    for c in FIXED_COLUMNS..table.column_count() {
        worksheet.set_column_width(c as u16, DATE_WIDTH)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn update_table(table: &AttendanceTable, path: &Path) -> Result<()> {
    let update_err = |message: String| Error::WorkbookUpdate {
        path: path.to_path_buf(),
        message,
    };

    let mut book = open_book(path)?;
    let name = table.sheet_name();
    if book.get_sheet_by_name(name).is_none() {
        book.new_sheet(name).map_err(|e| update_err(e.to_string()))?;
    }
    let sheet = book
        .get_sheet_by_name_mut(name)
        .ok_or_else(|| update_err(format!("sheet {name:?} missing")))?;

    let grid = table.grid();
    let width = table.column_count() as u32;
    let (old_cols, old_rows) = sheet.get_highest_column_and_row();
    debug!(sheet = name, old_cols, old_rows, "updating sheet in place");

    // Columns may have shifted (Detained moves right of new dates), so every
    // cell in the old and new extent is rewritten or blanked.
    for row in 1..=old_rows.max(grid.len() as u32) {
        for col in 1..=old_cols.max(width) {
            let value = grid
                .get(row as usize - 1)
                .and_then(|cells| cells.get(col as usize - 1))
                .cloned()
                .flatten();
            match value {
                Some(value) => {
                    sheet.get_cell_mut((col, row)).set_value_string(value);
                }
                None => {
                    let stale = sheet
                        .get_cell((col, row))
                        .is_some_and(|cell| !cell.get_value().is_empty());
                    if stale {
                        sheet.get_cell_mut((col, row)).set_value_string("");
                    }
                }
            }
        }
    }

    for col in FIXED_COLUMNS as u32 + 1..=width {
        sheet
            .get_style_mut((col, 1))
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Center);
    }
    sheet.get_column_dimension_by_number_mut(&1).set_width(NAME_WIDTH);
    sheet.get_column_dimension_by_number_mut(&2).set_width(ROLL_WIDTH);
    for col in FIXED_COLUMNS as u32 + 1..=width {
        sheet.get_column_dimension_by_number_mut(&col).set_width(DATE_WIDTH);
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| update_err(e.to_string()))?;
    Ok(())
}
