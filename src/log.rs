// src/log.rs
//! Logging setup.
//!
//! Code logs through `tracing` macros in an "Area: message" register
//! (`info!("Sweep: OK category='Sports' rows=42")`). `init` wires a stderr
//! layer and an append-only file under `.store/`.

use std::{fs, path::PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::consts::{LOG_FILE, STORE_DIR};

const DEFAULT_FILTER: &str = "trend_scrape=info";
const VERBOSE_FILTER: &str = "trend_scrape=debug";

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Debug level when `RUST_LOG` is unset.
    pub verbose: bool,
    /// Directory for the log file; `None` disables the file layer.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { verbose: false, dir: Some(PathBuf::from(STORE_DIR)) }
    }
}

fn filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber. Keep the returned guard alive for the whole
/// run or buffered file lines are lost. A second call is a no-op.
pub fn init(cfg: &LogConfig) -> Option<WorkerGuard> {
    let mut guard = None;
    let file_layer = match &cfg.dir {
        Some(dir) => match fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::never(dir, LOG_FILE);
                let (writer, g) = tracing_appender::non_blocking(appender);
                guard = Some(g);
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(false)
                        .with_filter(filter(cfg.verbose)),
                )
            }
            Err(err) => {
                eprintln!("Warning: cannot create log dir {}: {err}", dir.display());
                None
            }
        },
        None => None,
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(cfg.verbose));

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }
    guard
}
