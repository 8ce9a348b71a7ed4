// src/scrape/pager.rs
//! Card extraction across result pages.

use std::{thread, time::Duration};

use tracing::{debug, warn};

use crate::config::Timeouts;
use crate::core::{Click, DocumentDriver};
use crate::error::{Result, ScrapeError};
use crate::scrape::navigation::on_timeout;
use crate::specs::card::{parse_card, read_card, TrendRecord};
use crate::specs::dashboard::{cards, next_button};

pub struct PaginationExtractor<'d, D: DocumentDriver + ?Sized> {
    driver: &'d D,
    cards_bound: Duration,
    next_bound: Duration,
    paint_settle: Duration,
}

impl<'d, D: DocumentDriver + ?Sized> PaginationExtractor<'d, D> {
    pub fn new(driver: &'d D, timeouts: &Timeouts) -> Self {
        Self {
            driver,
            cards_bound: timeouts.cards,
            next_bound: timeouts.next_page,
            paint_settle: timeouts.paint_settle,
        }
    }

    /// Parse every card on the current page, in document order.
    ///
    /// The card set is snapshotted once so a re-render mid-read cannot
    /// shift or duplicate cards.
    pub fn extract_current_page(&self) -> Result<Vec<TrendRecord>> {
        let query = cards();
        self.driver
            .wait_visible(&query.clone().first(), self.cards_bound)
            .map_err(|e| on_timeout(e, || ScrapeError::NoCards))?;
        if !self.paint_settle.is_zero() {
            thread::sleep(self.paint_settle);
        }

        let snapshot = self.driver.snapshot(&query)?;
        let mut out = Vec::with_capacity(snapshot.len());
        for card in snapshot {
            out.push(parse_card(&read_card(self.driver, card)?));
        }
        Ok(out)
    }

    /// A next control exists and is enabled.
    pub fn has_next(&self) -> Result<bool> {
        match self.driver.find_first(&next_button())? {
            Some(btn) => Ok(self.driver.is_enabled(btn)?),
            None => Ok(false),
        }
    }

    /// Click next and wait for the location to move.
    ///
    /// `Ok(false)` when there is no usable next control. `NavigationTimeout`
    /// means the click did not navigate; callers read it as "no more pages".
    pub fn go_next(&self) -> Result<bool> {
        let Some(btn) = self.driver.find_first(&next_button())? else { return Ok(false) };
        if !self.driver.is_enabled(btn)? {
            return Ok(false);
        }

        let before = self.driver.current_location()?;
        self.driver.click(btn, Click::NORMAL)?;
        let after = self
            .driver
            .wait_location_changed(&before, self.next_bound)
            .map_err(|e| on_timeout(e, || ScrapeError::NavigationTimeout))?;
        debug!("Pager: {before} → {after}");
        Ok(true)
    }

    /// Extract page after page until the last page or `max_pages`
    /// (`None`/`Some(0)` = no cap). The cap is checked after each extraction.
    pub fn extract_all(&self, max_pages: Option<usize>) -> Result<Vec<TrendRecord>> {
        let cap = max_pages.filter(|&n| n > 0);
        let mut all = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self.extract_current_page()?;
            pages += 1;
            debug!("Pager: Page {pages} → {} cards", page.len());
            all.extend(page);

            if cap.is_some_and(|n| pages >= n) {
                debug!("Pager: Stopped at page cap {pages}");
                break;
            }
            match self.go_next() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(ScrapeError::NavigationTimeout) => {
                    warn!("Pager: Next did not navigate after page {pages}; treating as last page");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(all)
    }
}
