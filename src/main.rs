use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roll_call::{AttendanceTable, Config, Session};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workbook to record attendance in (overrides the config)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML config with the roster, date range and holidays
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter config and roster CSV
    Init {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("roll_call=warn")),
        )
        .init();

    let args = Args::parse();

    if let Some(Command::Init { dir }) = args.command {
        roll_call::init::init_files(&dir)
            .with_context(|| format!("failed to initialize {}", dir.display()))?;
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    let path = args.file.unwrap_or_else(|| config.workbook.clone());

    if !path.exists() {
        println!("File not found. Creating a new workbook.");
    }
    let mut table = AttendanceTable::open_or_create(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let eligible = config.eligible_dates()?;
    let weekday = config.weekday_name()?;

    let stdin = io::stdin();
    Session::new(
        &mut table,
        &config.students,
        &eligible,
        stdin.lock(),
        io::stdout(),
    )
    .batch(&config.batch)
    .weekday(weekday)
    .run(&path)
    .with_context(|| format!("failed to record attendance in {}", path.display()))?;

    Ok(())
}
