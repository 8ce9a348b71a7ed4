// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::config::{self, AppOptions, ConfigError, ExportFormat, ExportType, Granularity};
use crate::error::ScrapeError;
use crate::file;
use crate::progress::Progress;
use crate::replay::ReplayDriver;
use crate::scrape::{Credentials, Session};

#[derive(Parser, Debug, Default)]
#[command(name = "trend_scrape")]
#[command(about = "Sweep the trends dashboard category by category and export the cards", long_about = None)]
#[command(version)]
pub struct Args {
    /// Recorded dashboard (JSON) to run against.
    #[arg(long)]
    pub fixture: PathBuf,

    /// TOML options file; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub granularity: Option<Granularity>,

    /// Page cap per category (0 = no cap).
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Category to sweep; repeat for several. Default: all.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// One file per category instead of one combined file.
    #[arg(long)]
    pub per_category: bool,

    /// Output directory.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

/// Fold flag values into the loaded options, then re-check them.
pub fn apply_overrides(args: &Args, opts: &mut AppOptions) -> Result<(), ConfigError> {
    if let Some(g) = args.granularity { opts.scrape.granularity = g; }
    if let Some(n) = args.max_pages { opts.scrape.max_pages = n; }
    if !args.categories.is_empty() { opts.scrape.categories = args.categories.clone(); }
    if let Some(f) = args.format { opts.export.format = f; }
    if args.per_category { opts.export.export_type = ExportType::PerCategory; }
    if let Some(dir) = &args.out { opts.export.dir = dir.clone(); }
    config::validate(&opts.scrape)
}

/// Prints one line per category to stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn item_done(&mut self, category: &str, rows: usize) {
        self.seen += 1;
        eprintln!("[{}/{}] {category}: {rows} rows", self.seen, self.total);
    }

    fn item_failed(&mut self, category: &str, err: &ScrapeError) {
        self.seen += 1;
        eprintln!("[{}/{}] {category}: skipped ({err})", self.seen, self.total);
    }
}

pub fn run(args: Args) -> Result<()> {
    let mut opts = match &args.config {
        Some(path) => config::load(path)?,
        None => AppOptions::default(),
    };
    apply_overrides(&args, &mut opts)?;

    let driver = ReplayDriver::from_path(&args.fixture)?;
    // Recorded waits resolve instantly; no need to let paint settle.
    let timeouts = opts.timeouts.clone().without_settle();
    let mut session = Session::new(&driver, timeouts);

    let creds = Credentials::from_env();
    session.prepare(creds.as_ref()).wrap_err("preparing the dashboard")?;

    let mut progress = ConsoleProgress::default();
    let report = session
        .sweep(&opts.scrape, Some(&mut progress))
        .wrap_err("configuring the dashboard")?;

    let written = file::export_report(&opts.export, &report)?;
    info!("Run: Done files={}", written.len());
    println!(
        "{} rows from {}/{} categories ({} skipped), {} file(s) written",
        report.row_count(),
        report.batches.len(),
        opts.scrape.categories.len(),
        report.failures.len(),
        written.len()
    );
    for p in &written {
        println!("  {}", p.display());
    }
    Ok(())
}
