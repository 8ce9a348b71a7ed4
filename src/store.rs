// src/store.rs
//
// Canonical output of a sweep.
//
// - TrendRow:      one flat, string-keyed output record (parsed card + run stamp).
// - CategoryBatch: the rows of one category that completed.
// - SweepReport:   every batch plus the categories that were skipped.
//
// Export formats (file.rs) read these; nothing here does IO.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{consts::SCRAPE_TIME_FORMAT, Granularity};
use crate::error::ScrapeError;
use crate::specs::card::TrendRecord;

/// Column order of every export.
pub const COLUMNS: [&str; 9] = [
    "scrape_time", "granularity", "category",
    "name", "sign", "value", "raw_growth", "ticker_symbol", "ticker_percent",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub scrape_time: String,
    pub granularity: String,
    pub category: String,
    pub name: String,
    pub sign: String,
    pub value: String,
    pub raw_growth: String,
    pub ticker_symbol: String,
    pub ticker_percent: String,
}

impl TrendRow {
    /// Stamp a parsed card with the run-wide context.
    pub fn stamp(record: TrendRecord, scrape_time: &str, granularity: Granularity, category: &str) -> Self {
        Self {
            scrape_time: s!(scrape_time),
            granularity: s!(granularity.label()),
            category: s!(category),
            name: record.name,
            sign: s!(record.sign.as_str()),
            value: record.value,
            raw_growth: record.raw_growth,
            ticker_symbol: record.ticker_symbol,
            ticker_percent: record.ticker_percent,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryBatch {
    pub category: String,
    pub rows: Vec<TrendRow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFailure {
    pub category: String,
    pub error: ScrapeError,
}

#[derive(Clone, Debug)]
pub struct SweepReport {
    pub scrape_time: DateTime<Utc>,
    pub granularity: Granularity,
    /// Completed categories, in sweep order.
    pub batches: Vec<CategoryBatch>,
    /// Skipped categories, in sweep order.
    pub failures: Vec<CategoryFailure>,
}

impl SweepReport {
    pub fn new(scrape_time: DateTime<Utc>, granularity: Granularity) -> Self {
        Self { scrape_time, granularity, batches: Vec::new(), failures: Vec::new() }
    }

    pub fn scrape_time_label(&self) -> String {
        self.scrape_time.format(SCRAPE_TIME_FORMAT).to_string()
    }

    /// All rows, category by category, page order within each.
    pub fn rows(&self) -> impl Iterator<Item = &TrendRow> {
        self.batches.iter().flat_map(|b| b.rows.iter())
    }

    pub fn row_count(&self) -> usize {
        self.batches.iter().map(|b| b.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool { self.row_count() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::specs::card::Sign;

    #[test]
    fn stamp_flattens_in_column_order() {
        let rec = TrendRecord {
            name: s!("Stanley Cup"),
            sign: Sign::Plus,
            value: s!("4454"),
            raw_growth: s!("+4,454%"),
            ticker_symbol: s!("AAPL"),
            ticker_percent: s!("83"),
        };
        let row = TrendRow::stamp(rec, "2025-10-29 23:38:30 UTC", Granularity::Daily, "Sports");
        let json = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let mut sorted_cols = COLUMNS.to_vec();
        sorted_cols.sort_unstable();
        assert_eq!(keys, sorted_cols); // serde_json maps sort keys
        assert_eq!(json["sign"], "+");
        assert_eq!(json["granularity"], "Daily");
    }

    #[test]
    fn empty_report_is_valid() {
        let t = Utc.with_ymd_and_hms(2025, 10, 29, 23, 38, 30).unwrap();
        let r = SweepReport::new(t, Granularity::Weekly);
        assert!(r.is_empty());
        assert_eq!(r.rows().count(), 0);
        assert_eq!(r.scrape_time_label(), "2025-10-29 23:38:30 UTC");
    }
}
