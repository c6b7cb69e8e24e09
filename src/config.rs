//! Session configuration: workbook location, calendar window and roster.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Weekday};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use crate::calendar;
use crate::error::{Error, Result};
use crate::model::Student;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Workbook the attendance is kept in.
    pub workbook: PathBuf,
    /// Batch label shown in the date prompt.
    pub batch: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Weekday classes are held on, e.g. "Thursday" or "thu".
    pub weekday: String,
    pub holidays: Vec<NaiveDate>,
    /// CSV file with `Student Name,Roll Number` columns. Replaces `students` when set.
    pub roster: Option<PathBuf>,
    pub students: Vec<Student>,
}

impl Default for Config {
    fn default() -> Self {
        let date = |s| NaiveDate::parse_from_str(s, calendar::DATE_FORMAT).ok();
        Self {
            workbook: PathBuf::from("attendance.xlsx"),
            batch: "Batch 2".to_string(),
            start_date: date("2024-07-01").unwrap_or_default(),
            end_date: date("2024-10-31").unwrap_or_default(),
            weekday: "Thursday".to_string(),
            holidays: ["2024-07-04", "2024-08-15", "2024-10-31"]
                .into_iter()
                .filter_map(date)
                .collect(),
            roster: None,
            students: default_students(),
        }
    }
}

fn default_students() -> Vec<Student> {
    [
        ("Kaushik Bagde", "23005019"),
        ("Krushna Mandare", "23005021"),
        ("Madhav Emineni", "23005023"),
        ("Milind Kumar", "23005024"),
        ("Mithilesh Potbhare", "23005025"),
        ("Nikhil Parashar", "23005026"),
        ("Nikita Rathod", "23005027"),
        ("Nishad Bhale", "23005028"),
    ]
    .into_iter()
    .map(|(name, roll)| Student::new(name, roll))
    .collect()
}

impl Config {
    /// Loads a TOML config. A relative `roster` path resolves against the config's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&text)?;
        if let Some(roster) = config.roster.take() {
            let roster = match path.parent() {
                Some(dir) if roster.is_relative() => dir.join(roster),
                _ => roster,
            };
            config.students = load_roster(&roster)?;
            config.roster = Some(roster);
            config.validate()?;
        }
        debug!(path = %path.display(), students = config.students.len(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.class_day()?;
        let mut seen = HashSet::new();
        for student in &self.students {
            if student.roll_number.is_empty() {
                return Err(Error::Config(format!(
                    "student {:?} has no roll number",
                    student.name
                )));
            }
            if !seen.insert(student.roll_number.as_str()) {
                return Err(Error::Config(format!(
                    "roll number {} appears more than once",
                    student.roll_number
                )));
            }
        }
        Ok(())
    }

    pub fn class_day(&self) -> Result<Weekday> {
        self.weekday
            .parse::<Weekday>()
            .map_err(|_| Error::Config(format!("unknown weekday {:?}", self.weekday)))
    }

    pub fn holiday_set(&self) -> HashSet<NaiveDate> {
        self.holidays.iter().copied().collect()
    }

    pub fn eligible_dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(calendar::eligible_dates(
            self.start_date,
            self.end_date,
            self.class_day()?,
            &self.holiday_set(),
        ))
    }

    pub fn weekday_name(&self) -> Result<&'static str> {
        Ok(match self.class_day()? {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        })
    }
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<Student>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let mut students = Vec::new();
    for result in rdr.deserialize() {
        students.push(result?);
    }
    Ok(students)
}
