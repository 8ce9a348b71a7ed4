// src/file.rs
//! Writing a [`SweepReport`] to disk as JSON, CSV or TSV.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::consts::RUN_TS_FORMAT;
use crate::config::{ExportFormat, ExportOptions, ExportType};
use crate::core::sanitize::slug;
use crate::store::{SweepReport, TrendRow};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("cannot write {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("cannot encode {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("cannot encode {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// Write the report per `export`. Returns the files written, in sweep order.
/// An empty report writes nothing.
pub fn export_report(export: &ExportOptions, report: &SweepReport) -> Result<Vec<PathBuf>, ExportError> {
    if report.is_empty() {
        warn!("Export: No rows to write ({} categories skipped)", report.failures.len());
        return Ok(Vec::new());
    }
    ensure_directory(&export.dir)?;

    let run_ts = report.scrape_time.format(RUN_TS_FORMAT).to_string();
    let granularity = report.granularity.label().to_ascii_lowercase();
    let ext = export.format.ext();
    let mut written = Vec::new();

    match export.export_type {
        ExportType::SingleFile => {
            let stem = join!(&export.file_stem, "_", &granularity, "_", &run_ts);
            let path = export.dir.join(format!("{stem}.{ext}"));
            let rows: Vec<&TrendRow> = report.rows().collect();
            write_rows(&path, export.format, &rows)?;
            written.push(path);
        }
        ExportType::PerCategory => {
            let mut seen: HashMap<String, usize> = HashMap::new();
            for batch in report.batches.iter().filter(|b| !b.rows.is_empty()) {
                let stem = join!(&export.file_stem, "_", &granularity, "_", &slug(&batch.category), "_", &run_ts);
                let path = resolve_filename(&export.dir, &stem, &mut seen, ext);
                let rows: Vec<&TrendRow> = batch.rows.iter().collect();
                write_rows(&path, export.format, &rows)?;
                written.push(path);
            }
        }
    }

    for p in &written {
        info!("Export: Wrote {}", p.display());
    }
    Ok(written)
}

/// Create/truncate `path` and write `rows` in `format`. Delimited formats get a header row.
pub fn write_rows(path: &Path, format: ExportFormat, rows: &[&TrendRow]) -> Result<(), ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io { path: path.to_path_buf(), source };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    match format.delimiter() {
        None => {
            serde_json::to_writer_pretty(&mut out, rows)
                .map_err(|source| ExportError::Json { path: path.to_path_buf(), source })?;
            out.write_all(b"\n").map_err(io_err)?;
        }
        Some(delim) => {
            let csv_err = |source: csv::Error| ExportError::Csv { path: path.to_path_buf(), source };
            let mut wtr = csv::WriterBuilder::new().delimiter(delim).from_writer(&mut out);
            for row in rows {
                wtr.serialize(row).map_err(csv_err)?;
            }
            wtr.flush().map_err(io_err)?;
        }
    }
    out.flush().map_err(io_err)
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}

/// Duplicate handling **only within this run**: "<stem>.ext", then "<stem> (2).ext", ...
pub fn resolve_filename(
    dir: &Path,
    stem: &str,
    seen_names: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };
    *count += 1;
    dir.join(filename)
}
