// src/scrape/filter.rs
//! Sector filter panel: one category at a time, toggle semantics.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Timeouts;
use crate::core::{Click, DocumentDriver};
use crate::error::{PanelState, Result, ScrapeError};
use crate::scrape::navigation::on_timeout;
use crate::specs::dashboard::{filter_commit, filter_panel, filter_row, filter_trigger};

/// Owns the active category filter. Nothing else changes it.
pub struct CategoryFilterController<'d, D: DocumentDriver + ?Sized> {
    driver: &'d D,
    panel_bound: Duration,
    row_bound: Duration,
    active: Option<String>,
}

impl<'d, D: DocumentDriver + ?Sized> CategoryFilterController<'d, D> {
    pub fn new(driver: &'d D, timeouts: &Timeouts) -> Self {
        Self {
            driver,
            panel_bound: timeouts.filter_panel,
            row_bound: timeouts.filter_row,
            active: None,
        }
    }

    /// Category the panel currently filters on, if any.
    pub fn active(&self) -> Option<&str> { self.active.as_deref() }

    /// Open the panel, tick the row for `category`, commit, and wait for the
    /// panel to close. Ticking the active category again clears it.
    ///
    /// The active filter follows the row click: if a later step fails, the
    /// controller still knows which row the page has ticked.
    pub fn apply(&mut self, category: &str) -> Result<()> {
        let panel = filter_panel();

        let trigger = self
            .driver
            .wait_visible(&filter_trigger(), self.panel_bound)
            .map_err(|e| on_timeout(e, trigger_missing))?;
        self.driver.click(trigger, Click::NORMAL)?;
        self.driver
            .wait_visible(&panel, self.panel_bound)
            .map_err(|e| on_timeout(e, || panel_timeout(category, PanelState::Open)))?;

        let row = self
            .driver
            .wait_visible(&filter_row(category), self.row_bound)
            .map_err(|e| on_timeout(e, || ScrapeError::FilterLabelNotFound { category: s!(category) }))?;
        self.driver.click(row, Click::NORMAL)?;
        self.toggle(category);

        let commit = self
            .driver
            .wait_visible(&filter_commit(), self.panel_bound)
            .map_err(|e| on_timeout(e, || ScrapeError::ControlNotFound { control: s!("sector filter commit") }))?;
        self.driver.click(commit, Click::NORMAL)?;
        self.driver
            .wait_hidden(&panel, self.panel_bound)
            .map_err(|e| on_timeout(e, || panel_timeout(category, PanelState::Closed)))?;

        match &self.active {
            Some(active) => info!("Filter: Applied '{active}'"),
            None => info!("Filter: Cleared '{category}'"),
        }
        Ok(())
    }

    /// Same clicks as `apply`; the panel toggles the row back off.
    pub fn clear(&mut self, category: &str) -> Result<()> {
        self.apply(category)
    }

    /// After a failed category: close a panel left open, untick whatever row
    /// is still active, then check the trigger no longer reports a selection.
    pub fn recover(&mut self, category: &str) -> Result<()> {
        let panel = filter_panel();
        if self.driver.find_first(&panel)?.is_some() {
            debug!("Filter: Closing panel left open by '{category}'");
            let trigger = self
                .driver
                .wait_visible(&filter_trigger(), self.panel_bound)
                .map_err(|e| on_timeout(e, trigger_missing))?;
            self.driver.click(trigger, Click::NORMAL)?;
            self.driver
                .wait_hidden(&panel, self.panel_bound)
                .map_err(|e| on_timeout(e, || panel_timeout(category, PanelState::Closed)))?;
        }
        if let Some(active) = self.active.clone() {
            debug!("Filter: Unticking '{active}' after '{category}'");
            self.clear(&active)?;
        }
        match self.selected_count()? {
            0 => Ok(()),
            selected => Err(ScrapeError::FilterStillApplied { selected }),
        }
    }

    /// Rows ticked on the page, read off the trigger ("2 selected").
    pub fn selected_count(&self) -> Result<usize> {
        let text = self.driver.text_of(&filter_trigger())?.ok_or_else(trigger_missing)?;
        Ok(parse_selected(&text))
    }

    fn toggle(&mut self, category: &str) {
        if self.active.as_deref() == Some(category) {
            self.active = None;
        } else {
            if let Some(prev) = &self.active {
                debug!("Filter: '{category}' ticked while '{prev}' was active");
            }
            self.active = Some(s!(category));
        }
    }
}

/// "3 selected" → 3; "Select sectors" → 0.
fn parse_selected(trigger: &str) -> usize {
    let t = trigger.trim();
    if !t.to_ascii_lowercase().ends_with("selected") {
        return 0;
    }
    t.split_whitespace().next().and_then(|n| n.parse().ok()).unwrap_or(0)
}

fn trigger_missing() -> ScrapeError {
    ScrapeError::ControlNotFound { control: s!("sector filter button") }
}

fn panel_timeout(category: &str, expected: PanelState) -> ScrapeError {
    ScrapeError::PanelStateTimeout { category: s!(category), expected }
}
