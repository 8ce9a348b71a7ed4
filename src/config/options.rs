// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
    pub timeouts: Timeouts,
}

/// Time bucketing of trend data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    #[serde(alias = "daily")]
    Daily,
    #[serde(alias = "weekly")]
    Weekly,
    #[serde(alias = "monthly")]
    Monthly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Daily, Granularity::Weekly, Granularity::Monthly];

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown granularity '{s}' (expected Daily, Weekly or Monthly)"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub data_source: String,
    pub view_mode: String,
    pub granularity: Granularity,
    /// Sweep order. Must be drawn from `CATEGORIES`.
    pub categories: Vec<String>,
    /// Page cap per category; 0 = walk until the last page.
    pub max_pages: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            data_source: s!(DEFAULT_DATA_SOURCE),
            view_mode: s!(DEFAULT_VIEW_MODE),
            granularity: Granularity::Daily,
            categories: CATEGORIES.iter().map(|c| s!(*c)).collect(),
            max_pages: MAX_PAGES,
        }
    }
}

impl ScrapeOptions {
    pub fn page_cap(&self) -> Option<usize> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Json => "json", ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    /// Field delimiter for the delimited formats.
    pub fn delimiter(&self) -> Option<u8> {
        match self { ExportFormat::Json => None, ExportFormat::Csv => Some(b','), ExportFormat::Tsv => Some(b'\t') }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(format!("unknown format '{other}' (expected json, csv or tsv)")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    /// All categories in one file.
    #[default]
    SingleFile,
    /// One file per category that produced rows.
    PerCategory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    pub dir: PathBuf,
    /// File name prefix; granularity, category slug and run timestamp are appended.
    pub file_stem: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            export_type: ExportType::SingleFile,
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: s!(DEFAULT_FILE_STEM),
        }
    }
}

/// Per-operation wait bounds. Each remote wait gets exactly one attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(with = "millis")] pub source_menu: Duration,
    #[serde(with = "millis")] pub option: Duration,
    #[serde(with = "millis")] pub view: Duration,
    #[serde(with = "millis")] pub granularity: Duration,
    #[serde(with = "millis")] pub filter_panel: Duration,
    #[serde(with = "millis")] pub filter_row: Duration,
    #[serde(with = "millis")] pub cards: Duration,
    #[serde(with = "millis")] pub next_page: Duration,
    #[serde(with = "millis")] pub popup: Duration,
    #[serde(with = "millis")] pub login: Duration,
    #[serde(with = "millis")] pub home_card: Duration,
    /// Pause after the first card shows, before snapshotting.
    #[serde(with = "millis")] pub paint_settle: Duration,
    /// Pause after a filter change, before extracting.
    #[serde(with = "millis")] pub category_settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        let ms = Duration::from_millis;
        Self {
            source_menu: ms(SOURCE_MENU_MS),
            option: ms(OPTION_MS),
            view: ms(VIEW_MS),
            granularity: ms(GRANULARITY_MS),
            filter_panel: ms(FILTER_PANEL_MS),
            filter_row: ms(FILTER_ROW_MS),
            cards: ms(CARDS_MS),
            next_page: ms(NEXT_PAGE_MS),
            popup: ms(POPUP_MS),
            login: ms(LOGIN_MS),
            home_card: ms(HOME_CARD_MS),
            paint_settle: ms(PAINT_SETTLE_MS),
            category_settle: ms(CATEGORY_SETTLE_MS),
        }
    }
}

impl Timeouts {
    /// Same bounds, no fixed pauses. For drivers whose waits resolve instantly (replay).
    pub fn without_settle(mut self) -> Self {
        self.paint_settle = Duration::ZERO;
        self.category_settle = Duration::ZERO;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_case_insensitively() {
        assert_eq!("weekly".parse::<Granularity>(), Ok(Granularity::Weekly));
        assert_eq!(" MONTHLY ".parse::<Granularity>(), Ok(Granularity::Monthly));
        assert!("hourly".parse::<Granularity>().is_err());
    }

    #[test]
    fn page_cap_zero_means_unbounded() {
        let mut o = ScrapeOptions::default();
        assert_eq!(o.page_cap(), Some(MAX_PAGES));
        o.max_pages = 0;
        assert_eq!(o.page_cap(), None);
    }

    #[test]
    fn defaults_cover_every_category() {
        let o = ScrapeOptions::default();
        assert_eq!(o.categories.len(), 19);
        assert_eq!(o.categories[0], "Arts & Culture");
    }
}
