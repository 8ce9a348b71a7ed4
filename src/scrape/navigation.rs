// src/scrape/navigation.rs
//! Selection state for the dashboard's three single-choice axes.
//!
//! [`NavigationState`] is a value: transitions borrow the current state and
//! hand back a new one only after the page has confirmed the change, so a
//! failed transition can never leave the in-memory state ahead of the UI.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Granularity, Timeouts};
use crate::core::{Click, DocumentDriver, DriverError, Query, TextMatch};
use crate::core::sanitize::normalize_ws;
use crate::error::{Result, ScrapeError};
use crate::specs::dashboard::{self, axis_spec, AxisSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationAxis {
    DataSource,
    ViewMode,
    Granularity,
}

impl NavigationAxis {
    pub const ALL: [NavigationAxis; 3] =
        [NavigationAxis::DataSource, NavigationAxis::ViewMode, NavigationAxis::Granularity];
}

impl fmt::Display for NavigationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NavigationAxis::DataSource => "data source",
            NavigationAxis::ViewMode => "view mode",
            NavigationAxis::Granularity => "granularity",
        })
    }
}

/// Current label per axis. Exactly one label is active on each axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    data_source: String,
    view_mode: String,
    granularity: String,
}

impl NavigationState {
    pub fn new(data_source: &str, view_mode: &str, granularity: &str) -> Self {
        Self {
            data_source: s!(data_source.trim()),
            view_mode: s!(view_mode.trim()),
            granularity: s!(granularity.trim()),
        }
    }

    pub fn get(&self, axis: NavigationAxis) -> &str {
        match axis {
            NavigationAxis::DataSource => &self.data_source,
            NavigationAxis::ViewMode => &self.view_mode,
            NavigationAxis::Granularity => &self.granularity,
        }
    }

    /// Whether `axis` already shows `label` (ASCII case-insensitive).
    pub fn is_at(&self, axis: NavigationAxis, label: &str) -> bool {
        self.get(axis).eq_ignore_ascii_case(label.trim())
    }

    /// Copy with one axis replaced.
    #[must_use]
    pub fn with(&self, axis: NavigationAxis, label: &str) -> Self {
        let mut next = self.clone();
        let slot = match axis {
            NavigationAxis::DataSource => &mut next.data_source,
            NavigationAxis::ViewMode => &mut next.view_mode,
            NavigationAxis::Granularity => &mut next.granularity,
        };
        *slot = s!(label.trim());
        next
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.data_source, self.view_mode, self.granularity)
    }
}

/// One method per axis, each backed by that axis' structural selectors.
pub trait AxisControls {
    fn set_data_source(&self, state: &NavigationState, label: &str) -> Result<NavigationState>;
    fn set_view_mode(&self, state: &NavigationState, label: &str) -> Result<NavigationState>;
    fn set_granularity(&self, state: &NavigationState, granularity: Granularity) -> Result<NavigationState>;
}

/// Drives axis transitions against one document.
pub struct Navigator<'d, D: DocumentDriver + ?Sized> {
    driver: &'d D,
    timeouts: Timeouts,
}

impl<'d, D: DocumentDriver + ?Sized> Navigator<'d, D> {
    pub fn new(driver: &'d D, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// (open bound, option/confirmation bound) for an axis.
    fn bounds(&self, axis: NavigationAxis) -> (Duration, Duration) {
        let t = &self.timeouts;
        match axis {
            NavigationAxis::DataSource => (t.source_menu, t.option),
            NavigationAxis::ViewMode => (t.view, t.view),
            NavigationAxis::Granularity => (t.granularity, t.granularity),
        }
    }

    /// Read the labels the page currently shows, to seed the state.
    pub fn observe(&self) -> Result<NavigationState> {
        let source = self
            .driver
            .text_of(&dashboard::DATA_SOURCE.any_label())?
            .map(|t| normalize_ws(&t))
            .ok_or_else(|| control_missing("data source label"))?;

        // View and granularity share markup; tell them apart by vocabulary.
        let mut view = None;
        let mut granularity = None;
        for el in self.driver.find(&Query::css(dashboard::VIEW_MODE.label))? {
            let text = normalize_ws(&self.driver.text(el)?);
            if let Some(g) = Granularity::ALL
                .into_iter()
                .find(|g| TextMatch::PrefixCi(s!(g.label())).matches(&text))
            {
                granularity.get_or_insert(g.label());
            } else if text.contains(dashboard::VIEW_LABEL_MARKER) {
                view.get_or_insert(text);
            }
        }

        let view = view.ok_or_else(|| control_missing("view mode label"))?;
        let granularity = granularity.ok_or_else(|| control_missing("granularity label"))?;
        let state = NavigationState::new(&source, &view, granularity);
        debug!("Nav: Observed {state}");
        Ok(state)
    }

    /// Move `axis` to `target`.
    ///
    /// No remote operation at all if the axis is already there. Otherwise open
    /// the axis menu from the trigger showing the current label, click the
    /// matching option, and wait until the label reflects `target`. The
    /// returned state is the only place the new label appears; on error the
    /// caller's `state` is still accurate.
    pub fn transition(
        &self,
        state: &NavigationState,
        axis: NavigationAxis,
        target: &str,
    ) -> Result<NavigationState> {
        if state.is_at(axis, target) {
            debug!("Nav: {axis} already '{target}'");
            return Ok(state.clone());
        }

        let spec: &AxisSpec = axis_spec(axis);
        let current = state.get(axis);
        let (open_bound, pick_bound) = self.bounds(axis);

        let trigger = self
            .driver
            .wait_visible(&spec.trigger_showing(current), open_bound)
            .map_err(|e| on_timeout(e, || control_missing(&format!("{axis} control showing '{current}'"))))?;
        self.driver.click(trigger, Click::NORMAL)?;

        let option = self
            .driver
            .wait_visible(&spec.option(target), pick_bound)
            .map_err(|e| on_timeout(e, || ScrapeError::OptionNotFound { axis, label: s!(target) }))?;
        self.driver.click(option, Click::NORMAL)?;

        self.driver
            .wait_visible(&spec.confirmed(target), pick_bound)
            .map_err(|e| on_timeout(e, || ScrapeError::ConfirmationTimeout { axis, label: s!(target) }))?;

        info!("Nav: {axis} '{current}' → '{target}'");
        Ok(state.with(axis, target))
    }
}

impl<D: DocumentDriver + ?Sized> AxisControls for Navigator<'_, D> {
    fn set_data_source(&self, state: &NavigationState, label: &str) -> Result<NavigationState> {
        self.transition(state, NavigationAxis::DataSource, label)
    }

    fn set_view_mode(&self, state: &NavigationState, label: &str) -> Result<NavigationState> {
        self.transition(state, NavigationAxis::ViewMode, label)
    }

    fn set_granularity(&self, state: &NavigationState, granularity: Granularity) -> Result<NavigationState> {
        self.transition(state, NavigationAxis::Granularity, granularity.label())
    }
}

fn control_missing(what: &str) -> ScrapeError {
    ScrapeError::ControlNotFound { control: s!(what) }
}

/// Map a driver timeout to the step-specific error; pass anything else through.
pub(crate) fn on_timeout(err: DriverError, specific: impl FnOnce() -> ScrapeError) -> ScrapeError {
    if err.is_timeout() { specific() } else { ScrapeError::Driver(err) }
}
