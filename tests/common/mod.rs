// tests/common/mod.rs
//
// Shared fixtures for the integration tests.
//
#![allow(dead_code)]

use std::cell::Cell;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use trend_scrape::config::{ScrapeOptions, Timeouts};
use trend_scrape::core::{Click, DocumentDriver, DriverError, DriverResult, Element, Query};
use trend_scrape::replay::{CategoryFixture, DashboardFixture, ReplayDriver, Screen};
use trend_scrape::specs::dashboard::{CARD, FILTER_PANEL};

/// Recorded waits resolve instantly, so skip the fixed pauses.
pub fn timeouts() -> Timeouts {
    Timeouts::default().without_settle()
}

/// 2025-10-29 23:38:30 UTC
pub fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 29, 23, 38, 30).unwrap()
}

/// Already on the dashboard, default axis labels, given sector rows.
pub fn dashboard(categories: Vec<CategoryFixture>) -> DashboardFixture {
    DashboardFixture { start: Screen::Dashboard, categories, ..DashboardFixture::default() }
}

pub fn driver(categories: Vec<CategoryFixture>) -> ReplayDriver {
    ReplayDriver::new(dashboard(categories))
}

pub fn scrape_opts(categories: &[&str]) -> ScrapeOptions {
    ScrapeOptions {
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..ScrapeOptions::default()
    }
}

/// Replay dashboard with one-off failures layered on top.
pub struct Flaky {
    pub inner: ReplayDriver,
    /// Panel-close waits that report a timeout even though the panel closed.
    panel_close_misses: Cell<usize>,
    /// Card snapshots fail while only this category is ticked and this page (1-based) shows.
    broken_page: Option<(String, usize)>,
}

impl Flaky {
    pub fn new(inner: ReplayDriver) -> Self {
        Self { inner, panel_close_misses: Cell::new(0), broken_page: None }
    }

    pub fn panel_close_misses(self, n: usize) -> Self {
        self.panel_close_misses.set(n);
        self
    }

    pub fn broken_page(mut self, category: &str, page: usize) -> Self {
        self.broken_page = Some((category.to_string(), page));
        self
    }
}

impl DocumentDriver for Flaky {
    fn find(&self, query: &Query) -> DriverResult<Vec<Element>> { self.inner.find(query) }
    fn text(&self, el: Element) -> DriverResult<String> { self.inner.text(el) }
    fn is_enabled(&self, el: Element) -> DriverResult<bool> { self.inner.is_enabled(el) }
    fn wait_visible(&self, query: &Query, timeout: Duration) -> DriverResult<Element> {
        self.inner.wait_visible(query, timeout)
    }

    fn wait_hidden(&self, query: &Query, timeout: Duration) -> DriverResult<()> {
        let res = self.inner.wait_hidden(query, timeout);
        let misses = self.panel_close_misses.get();
        if query.css == FILTER_PANEL && misses > 0 && res.is_ok() {
            self.panel_close_misses.set(misses - 1);
            return Err(DriverError::timeout(query, timeout));
        }
        res
    }

    fn click(&self, el: Element, opts: Click) -> DriverResult<()> { self.inner.click(el, opts) }
    fn fill(&self, el: Element, text: &str) -> DriverResult<()> { self.inner.fill(el, text) }
    fn current_location(&self) -> DriverResult<String> { self.inner.current_location() }
    fn wait_location_changed(&self, previous: &str, timeout: Duration) -> DriverResult<String> {
        self.inner.wait_location_changed(previous, timeout)
    }

    fn snapshot(&self, query: &Query) -> DriverResult<Vec<Element>> {
        if let Some((category, page)) = &self.broken_page {
            if query.css == CARD && self.inner.ticked() == [category.as_str()] && self.inner.page_number() == *page {
                return Err(DriverError::Backend(format!("page {page} went away")));
            }
        }
        self.inner.snapshot(query)
    }
}
