use std::path::{Path, PathBuf};

use csv::Writer;

use crate::config::Config;
use crate::error::Result;

pub const CONFIG_FILE: &str = "roll-call.toml";
pub const ROSTER_FILE: &str = "roster.csv";

/// Writes a starter config and roster into `dir`, leaving existing files alone.
/// Returns the files that were created.
pub fn init_files(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut created = Vec::new();

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!("{} already exists, skipping.", config_path.display());
    } else {
        std::fs::write(&config_path, SAMPLE_CONFIG)?;
        println!("Created {}", config_path.display());
        created.push(config_path);
    }

    let roster_path = dir.join(ROSTER_FILE);
    if roster_path.exists() {
        println!("{} already exists, skipping.", roster_path.display());
    } else {
        let mut wtr = Writer::from_path(&roster_path)?;
        wtr.write_record(["Student Name", "Roll Number"])?;
        for student in Config::default().students {
            wtr.write_record([&student.name, &student.roll_number])?;
        }
        wtr.flush()?;
        println!("Created {}", roster_path.display());
        created.push(roster_path);
    }

    Ok(created)
}

const SAMPLE_CONFIG: &str = r#"# roll-call configuration

workbook = "attendance.xlsx"
batch = "Batch 2"
start_date = "2024-07-01"
end_date = "2024-10-31"
weekday = "Thursday"
holidays = ["2024-07-04", "2024-08-15", "2024-10-31"]

# CSV with "Student Name" and "Roll Number" columns, relative to this file.
roster = "roster.csv"
"#;
