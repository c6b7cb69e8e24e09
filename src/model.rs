use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Attendance strictly below this percentage marks a student as detained.
pub const DETAINED_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Student {
    #[serde(rename = "Student Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Roll Number", alias = "roll_number")]
    pub roll_number: String,
}

impl Student {
    pub fn new(name: impl Into<String>, roll_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roll_number: roll_number.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Present,
    Absent,
}

impl Status {
    /// The code written into the sheet, also the letter typed at the prompt.
    pub fn code(self) -> &'static str {
        match self {
            Status::Present => "P",
            Status::Absent => "A",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "P" => Ok(Status::Present),
            "A" => Ok(Status::Absent),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-student tally of the marks recorded during this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    pub total_days_marked: u32,
    pub present_days: u32,
}

impl StudentRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_days_marked: 0,
            present_days: 0,
        }
    }

    pub fn record(&mut self, status: Status) {
        self.total_days_marked += 1;
        if status == Status::Present {
            self.present_days += 1;
        }
    }

    /// `None` until at least one day has been marked.
    pub fn percentage(&self) -> Option<f64> {
        if self.total_days_marked == 0 {
            return None;
        }
        Some(self.present_days as f64 / self.total_days_marked as f64 * 100.0)
    }

    pub fn is_detained(&self) -> Option<bool> {
        self.percentage().map(|p| p < DETAINED_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("p".parse::<Status>().unwrap(), Status::Present);
        assert_eq!(" A ".parse::<Status>().unwrap(), Status::Absent);
        assert!("x".parse::<Status>().is_err());
        assert!("".parse::<Status>().is_err());
        assert!("PA".parse::<Status>().is_err());
    }

    #[test]
    fn half_attendance_is_detained() {
        let mut rec = StudentRecord::new("Kaushik Bagde");
        for s in [Status::Present, Status::Absent, Status::Present, Status::Absent] {
            rec.record(s);
        }
        assert_eq!(rec.total_days_marked, 4);
        assert_eq!(rec.present_days, 2);
        assert_eq!(rec.percentage(), Some(50.0));
        assert_eq!(rec.is_detained(), Some(true));
    }

    #[test]
    fn exactly_threshold_is_not_detained() {
        let mut rec = StudentRecord::new("Nikita Rathod");
        for s in [Status::Present, Status::Present, Status::Present, Status::Absent] {
            rec.record(s);
        }
        assert_eq!(rec.percentage(), Some(75.0));
        assert_eq!(rec.is_detained(), Some(false));
    }

    #[test]
    fn unmarked_student_has_no_verdict() {
        let rec = StudentRecord::new("Milind Kumar");
        assert_eq!(rec.percentage(), None);
        assert_eq!(rec.is_detained(), None);
    }
}
