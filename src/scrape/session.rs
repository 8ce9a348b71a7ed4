// src/scrape/session.rs
//! One scraping session against one document: prepare, configure, sweep.

use std::{env, fmt, thread};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::{ScrapeOptions, Timeouts};
use crate::core::{Click, DocumentDriver, DriverError, Query};
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;
use crate::scrape::filter::CategoryFilterController;
use crate::scrape::navigation::{AxisControls, NavigationState, Navigator, on_timeout};
use crate::scrape::pager::PaginationExtractor;
use crate::specs::card::TrendRecord;
use crate::specs::dashboard::{
    email_login_button, home_card, login_button, login_modal, overlay,
    EMAIL_INPUT, OVERLAY_CLOSE, PASSWORD_INPUT,
};
use crate::store::{CategoryBatch, CategoryFailure, SweepReport, TrendRow};

pub const EMAIL_VAR: &str = "TT_EMAIL";
pub const PASSWORD_VAR: &str = "TT_PASSWORD";

/// Account used for the optional login step.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Both `TT_EMAIL` and `TT_PASSWORD` set and non-empty, else `None`.
    pub fn from_env() -> Option<Self> {
        let email = env::var(EMAIL_VAR).ok().filter(|v| !v.trim().is_empty())?;
        let password = env::var(PASSWORD_VAR).ok().filter(|v| !v.is_empty())?;
        Some(Self::new(email, password))
    }

    pub fn password(&self) -> &str { &self.password }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of the newsletter overlay step. Never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Absent,
    Dismissed,
    Failed(String),
}

pub struct Session<'d, D: DocumentDriver + ?Sized> {
    driver: &'d D,
    timeouts: Timeouts,
    state: Option<NavigationState>,
    scrape_time: DateTime<Utc>,
}

impl<'d, D: DocumentDriver + ?Sized> Session<'d, D> {
    /// The scrape time is fixed here, once per session.
    pub fn new(driver: &'d D, timeouts: Timeouts) -> Self {
        Self { driver, timeouts, state: None, scrape_time: Utc::now() }
    }

    #[must_use]
    pub fn with_scrape_time(mut self, at: DateTime<Utc>) -> Self {
        self.scrape_time = at;
        self
    }

    /// Last confirmed axis labels; `None` until `configure` has observed the page.
    pub fn state(&self) -> Option<&NavigationState> { self.state.as_ref() }

    /// Close the newsletter overlay if it shows up within the popup bound.
    pub fn dismiss_overlay(&self) -> Outcome {
        let outcome = self.try_dismiss_overlay();
        match &outcome {
            Outcome::Absent => debug!("Popup: none"),
            Outcome::Dismissed => info!("Popup: Dismissed newsletter overlay"),
            Outcome::Failed(why) => warn!("Popup: Could not dismiss overlay: {why}"),
        }
        outcome
    }

    fn try_dismiss_overlay(&self) -> Outcome {
        let bound = self.timeouts.popup;
        let panel = match self.driver.wait_visible(&overlay(), bound) {
            Ok(el) => el,
            Err(e) if e.is_timeout() => return Outcome::Absent,
            Err(e) => return Outcome::Failed(e.to_string()),
        };

        let close = Query::css(OVERLAY_CLOSE).within(panel).first();
        let attempt = || -> std::result::Result<(), DriverError> {
            let Some(x) = self.driver.find_first(&close)? else {
                return Err(DriverError::Backend(s!("overlay has no close button")));
            };
            if self.driver.click(x, Click::NORMAL).is_err() {
                debug!("Popup: Plain click refused, forcing");
                self.driver.click(x, Click::FORCE)?;
            }
            self.driver.wait_hidden(&overlay(), bound)
        };
        match attempt() {
            Ok(()) => Outcome::Dismissed,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    /// Email login through the modal.
    pub fn login(&self, creds: &Credentials) -> Result<()> {
        let bound = self.timeouts.login;

        let open = self
            .driver
            .wait_visible(&login_button(), bound)
            .map_err(|e| on_timeout(e, || missing("Log In button")))?;
        self.driver.click(open, Click::NORMAL)?;

        let by_email = self
            .driver
            .wait_visible(&email_login_button(), bound)
            .map_err(|e| on_timeout(e, || missing("Continue with Email button")))?;
        self.driver.click(by_email, Click::NORMAL)?;

        let modal = self
            .driver
            .wait_visible(&login_modal(), bound)
            .map_err(|e| on_timeout(e, || missing("login modal")))?;

        let email = self
            .driver
            .find_first(&Query::css(EMAIL_INPUT).within(modal).first())?
            .ok_or_else(|| missing("email input"))?;
        self.driver.fill(email, &creds.email)?;

        let password = self
            .driver
            .find_first(&Query::css(PASSWORD_INPUT).within(modal).first())?
            .ok_or_else(|| missing("password input"))?;
        self.driver.fill(password, creds.password())?;

        let submit = self
            .driver
            .find_first(&login_button().within(modal))?
            .ok_or_else(|| missing("login submit button"))?;
        self.driver.click(submit, Click::NORMAL)?;

        info!("Login: Submitted for {}", creds.email);
        Ok(())
    }

    /// Wait for the home screen and open the trends dashboard from it.
    pub fn open_dashboard(&self) -> Result<()> {
        let card = self
            .driver
            .wait_visible(&home_card(), self.timeouts.home_card)
            .map_err(|e| on_timeout(e, || missing("Exploding Trends card")))?;
        self.driver.click(card, Click::NORMAL)?;
        info!("Home: Opened Exploding Trends");
        Ok(())
    }

    /// Overlay, optional login, dashboard.
    pub fn prepare(&self, creds: Option<&Credentials>) -> Result<Outcome> {
        let popup = self.dismiss_overlay();
        match creds {
            Some(c) => self.login(c)?,
            None => debug!("Login: No credentials, continuing anonymously"),
        }
        self.open_dashboard()?;
        Ok(popup)
    }

    /// Seed the state from the page, then select source, view and granularity.
    pub fn configure(&mut self, opts: &ScrapeOptions) -> Result<&NavigationState> {
        let nav = Navigator::new(self.driver, self.timeouts.clone());
        let mut state = match self.state.clone() {
            Some(s) => s,
            None => nav.observe()?,
        };
        // Keep whatever was confirmed so far if a later axis fails.
        self.state = Some(state.clone());

        state = nav.set_data_source(&state, &opts.data_source)?;
        self.state = Some(state.clone());
        state = nav.set_view_mode(&state, &opts.view_mode)?;
        self.state = Some(state.clone());
        state = nav.set_granularity(&state, opts.granularity)?;
        info!("Nav: Configured {state}");
        Ok(&*self.state.insert(state))
    }

    /// Configure once, then scrape every category in order.
    ///
    /// A failure while configuring is returned as-is: no category could be
    /// scraped. A failure inside a category skips that category only; its rows
    /// are dropped and it is listed in `SweepReport::failures`.
    pub fn sweep(
        &mut self,
        opts: &ScrapeOptions,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<SweepReport> {
        self.configure(opts)?;

        let mut report = SweepReport::new(self.scrape_time, opts.granularity);
        let stamp = report.scrape_time_label();
        let cap = opts.page_cap();
        let mut filter = CategoryFilterController::new(self.driver, &self.timeouts);
        let pager = PaginationExtractor::new(self.driver, &self.timeouts);

        if let Some(p) = progress.as_deref_mut() {
            p.begin(opts.categories.len());
        }
        info!("Sweep: Start categories={} cap={:?} time={stamp}", opts.categories.len(), cap);

        for category in &opts.categories {
            if !self.timeouts.category_settle.is_zero() {
                thread::sleep(self.timeouts.category_settle);
            }
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!("Scraping {category}"));
            }

            match scrape_category(&mut filter, &pager, category, cap) {
                Ok(records) => {
                    let rows: Vec<TrendRow> = records
                        .into_iter()
                        .map(|r| TrendRow::stamp(r, &stamp, opts.granularity, category))
                        .collect();
                    info!("Sweep: OK category='{category}' rows={}", rows.len());
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(category, rows.len());
                    }
                    report.batches.push(CategoryBatch { category: s!(category), rows });
                }
                Err(err) => {
                    error!("Sweep: Skipped category='{category}': {err}");
                    if let Err(e) = filter.recover(category) {
                        warn!("Sweep: Could not reset filter after '{category}': {e}");
                    }
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(category, &err);
                    }
                    report.failures.push(CategoryFailure { category: s!(category), error: err });
                }
            }
        }

        info!(
            "Sweep: Done rows={} ok={} skipped={}",
            report.row_count(),
            report.batches.len(),
            report.failures.len()
        );
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        Ok(report)
    }
}

/// Filter on, walk the pages, filter off.
fn scrape_category<D: DocumentDriver + ?Sized>(
    filter: &mut CategoryFilterController<'_, D>,
    pager: &PaginationExtractor<'_, D>,
    category: &str,
    cap: Option<usize>,
) -> Result<Vec<TrendRecord>> {
    filter.apply(category)?;
    let records = pager.extract_all(cap)?;
    filter.clear(category)?;
    Ok(records)
}

fn missing(what: &str) -> ScrapeError {
    ScrapeError::ControlNotFound { control: s!(what) }
}
