// src/error.rs
use std::fmt;

use thiserror::Error;

use crate::core::DriverError;
use crate::scrape::navigation::NavigationAxis;

/// Which panel state a filter wait expected to observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState { Open, Closed }

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { PanelState::Open => "open", PanelState::Closed => "closed" })
    }
}

/// Everything that can go wrong while driving the dashboard.
///
/// All variants except `NavigationTimeout` are surfaced as-is to the sweep
/// loop, which turns them into a skipped category. `NavigationTimeout` is
/// consumed by the pager as "no further pages".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("{axis}: option '{label}' not found")]
    OptionNotFound { axis: NavigationAxis, label: String },

    #[error("{axis}: selection '{label}' was never confirmed by the page")]
    ConfirmationTimeout { axis: NavigationAxis, label: String },

    #[error("control not found: {control}")]
    ControlNotFound { control: String },

    #[error("category '{category}' not found in the filter panel")]
    FilterLabelNotFound { category: String },

    #[error("filter panel never became {expected} (category '{category}')")]
    PanelStateTimeout { category: String, expected: PanelState },

    #[error("filter still shows {selected} selected after reset")]
    FilterStillApplied { selected: usize },

    #[error("no trend cards rendered")]
    NoCards,

    #[error("page location did not change after clicking next")]
    NavigationTimeout,

    #[error(transparent)]
    Driver(#[from] DriverError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
