// src/config/mod.rs
//! Run configuration.
//!
//! `options` holds the typed option structs (all with defaults from `consts`);
//! this module loads them from a TOML file and checks them against the
//! dashboard's fixed vocabulary before a run starts.

pub mod consts;
pub mod options;

use std::{fs, path::{Path, PathBuf}};

use thiserror::Error;

pub use options::{AppOptions, ExportFormat, ExportOptions, ExportType, Granularity, ScrapeOptions, Timeouts};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("category '{0}' listed more than once")]
    DuplicateCategory(String),
    #[error("no categories to scrape")]
    NoCategories,
}

/// Load options from a TOML file. Missing tables/keys fall back to defaults.
pub fn load(path: &Path) -> Result<AppOptions, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let opts: AppOptions = toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    validate(&opts.scrape)?;
    tracing::debug!("Config: Loaded {}", path.display());
    Ok(opts)
}

/// Categories must be non-empty, known, and unique.
pub fn validate(scrape: &ScrapeOptions) -> Result<(), ConfigError> {
    if scrape.categories.is_empty() {
        return Err(ConfigError::NoCategories);
    }
    for (i, cat) in scrape.categories.iter().enumerate() {
        if !consts::CATEGORIES.contains(&cat.as_str()) {
            return Err(ConfigError::UnknownCategory(cat.clone()));
        }
        if scrape.categories[..i].contains(cat) {
            return Err(ConfigError::DuplicateCategory(cat.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn toml_overrides_and_defaults_mix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, r#"
            [scrape]
            granularity = "weekly"
            categories = ["Sports", "Technology"]
            max_pages = 3

            [export]
            format = "csv"
            export_type = "per_category"

            [timeouts]
            cards = 2500
        "#).unwrap();

        let opts = load(&path).unwrap();
        assert_eq!(opts.scrape.granularity, Granularity::Weekly);
        assert_eq!(opts.scrape.categories, labels!["Sports", "Technology"]);
        assert_eq!(opts.scrape.page_cap(), Some(3));
        assert_eq!(opts.scrape.data_source, consts::DEFAULT_DATA_SOURCE);
        assert_eq!(opts.export.format, ExportFormat::Csv);
        assert_eq!(opts.export.export_type, ExportType::PerCategory);
        assert_eq!(opts.timeouts.cards, Duration::from_millis(2500));
        assert_eq!(opts.timeouts.next_page, Duration::from_millis(consts::NEXT_PAGE_MS));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut scrape = ScrapeOptions::default();
        scrape.categories = labels!["Sports", "Knitting"];
        assert!(matches!(validate(&scrape), Err(ConfigError::UnknownCategory(c)) if c == "Knitting"));
    }

    #[test]
    fn duplicates_and_empty_are_rejected() {
        let mut scrape = ScrapeOptions::default();
        scrape.categories = labels!["Sports", "Sports"];
        assert!(matches!(validate(&scrape), Err(ConfigError::DuplicateCategory(_))));
        scrape.categories.clear();
        assert!(matches!(validate(&scrape), Err(ConfigError::NoCategories)));
    }
}
