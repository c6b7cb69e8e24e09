//! Console loop that collects attendance one date at a time.

use std::io::{BufRead, Write};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::calendar;
use crate::error::{Error, Result};
use crate::model::{Status, Student};
use crate::table::AttendanceTable;

pub struct Session<'a, R, W> {
    table: &'a mut AttendanceTable,
    roster: &'a [Student],
    eligible: &'a [NaiveDate],
    batch: &'a str,
    weekday: &'a str,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        table: &'a mut AttendanceTable,
        roster: &'a [Student],
        eligible: &'a [NaiveDate],
        input: R,
        output: W,
    ) -> Self {
        Self {
            table,
            roster,
            eligible,
            batch: "Batch 2",
            weekday: "Thursday",
            input,
            output,
        }
    }

    pub fn batch(mut self, batch: &'a str) -> Self {
        self.batch = batch;
        self
    }

    pub fn weekday(mut self, weekday: &'a str) -> Self {
        self.weekday = weekday;
        self
    }

    /// Reads one line, `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Runs until "exit" or end of input, then saves the table to `path`.
    pub fn run(mut self, path: &Path) -> Result<()> {
        let mut dates_marked = 0usize;
        loop {
            let text = format!(
                "Enter the date (YYYY-MM-DD) to mark attendance for {} or 'exit' to quit: ",
                self.batch
            );
            let Some(date_str) = self.prompt(&text)? else {
                debug!("input closed at date prompt");
                break;
            };
            if date_str.eq_ignore_ascii_case("exit") {
                break;
            }

            let Some(date) = calendar::parse_date(&date_str) else {
                writeln!(
                    self.output,
                    "Invalid date format. Please enter the date in YYYY-MM-DD format."
                )?;
                continue;
            };
            if !self.eligible.contains(&date) {
                writeln!(
                    self.output,
                    "{date_str} is not a valid {} within the specified date range or is a holiday.",
                    self.weekday
                )?;
                continue;
            }

            writeln!(self.output, "Marking attendance for {date_str} : {}", self.batch)?;
            let label = date.format(calendar::DATE_FORMAT).to_string();
            self.mark_roster(&date_str, &label)?;
            dates_marked += 1;
        }

        self.table.save(path)?;
        info!(dates_marked, path = %path.display(), "session finished");
        writeln!(self.output, "Attendance updated successfully.")?;
        Ok(())
    }

    /// `date_str` is echoed as typed; `label` is the canonical column header.
    fn mark_roster(&mut self, date_str: &str, label: &str) -> Result<()> {
        let roster = self.roster;
        for student in roster {
            let text = format!(
                "Mark attendance for {} (Roll Number: {}) on {} [P/A]: ",
                student.name, student.roll_number, date_str
            );
            let status = loop {
                let Some(answer) = self.prompt(&text)? else {
                    return Err(Error::UnexpectedEof(date_str.to_string()));
                };
                match answer.parse::<Status>() {
                    Ok(status) => break status,
                    Err(_) => writeln!(
                        self.output,
                        "Invalid input. Please enter 'P' for Present or 'A' for Absent."
                    )?,
                }
            };
            self.table
                .record_mark(&student.name, &student.roll_number, label, status)?;
        }
        Ok(())
    }
}
