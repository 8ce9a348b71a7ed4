// src/specs/dashboard.rs
//! Selectors for the Exploding Trends dashboard and its surrounding screens.

use crate::core::{Query, TextMatch};
use crate::scrape::navigation::NavigationAxis;

/* ---------------- Axis controls ---------------- */

/// How an axis option's visible text is compared with a wanted label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMatch {
    /// Case-insensitive substring ("Tiktok" in "Tiktok Trends").
    Contains,
    /// Whole text ("List View", not "List View (beta)").
    Exact,
    /// Case-insensitive prefix, tolerating trailing decoration ("Daily ▾").
    Prefix,
}

impl OptionMatch {
    pub fn text(self, label: &str) -> TextMatch {
        match self {
            OptionMatch::Contains => TextMatch::ContainsCi(s!(label)),
            OptionMatch::Exact => TextMatch::Exact(s!(label)),
            OptionMatch::Prefix => TextMatch::PrefixCi(s!(label)),
        }
    }
}

/// Structural description of one selection axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisSpec {
    pub axis: NavigationAxis,
    /// Clickable control showing the current label; opens the option list.
    pub trigger: &'static str,
    /// Element whose text reflects the committed selection.
    pub label: &'static str,
    /// Entries of the opened option list.
    pub options: &'static str,
    pub matching: OptionMatch,
}

impl AxisSpec {
    /// The trigger currently displaying `current`.
    pub fn trigger_showing(&self, current: &str) -> Query {
        Query::css(self.trigger).with_text(TextMatch::ContainsCi(s!(current))).first()
    }

    /// Any trigger of this axis, whatever it displays.
    pub fn any_label(&self) -> Query {
        Query::css(self.label).first()
    }

    /// First option matching `target`.
    pub fn option(&self, target: &str) -> Query {
        Query::css(self.options).with_text(self.matching.text(target)).first()
    }

    /// Label element once it reflects `target`.
    pub fn confirmed(&self, target: &str) -> Query {
        Query::css(self.label).with_text(self.matching.text(target)).first()
    }
}

pub const DATA_SOURCE: AxisSpec = AxisSpec {
    axis: NavigationAxis::DataSource,
    trigger: "#type-selection .relative",
    label: "#type-selection .relative",
    options: "#type-selection ul li div",
    matching: OptionMatch::Contains,
};

pub const VIEW_MODE: AxisSpec = AxisSpec {
    axis: NavigationAxis::ViewMode,
    trigger: "div.relative.h-9.w-fit.cursor-pointer",
    label: "div.relative.h-9.w-fit.cursor-pointer p.whitespace-nowrap",
    options: "div.absolute ul li div",
    matching: OptionMatch::Exact,
};

pub const GRANULARITY: AxisSpec = AxisSpec {
    axis: NavigationAxis::Granularity,
    trigger: "div.relative.h-9.w-fit.cursor-pointer",
    label: "div.relative.h-9.w-fit.cursor-pointer p.whitespace-nowrap",
    options: "div.absolute ul li div",
    matching: OptionMatch::Prefix,
};

pub fn axis_spec(axis: NavigationAxis) -> &'static AxisSpec {
    match axis {
        NavigationAxis::DataSource => &DATA_SOURCE,
        NavigationAxis::ViewMode => &VIEW_MODE,
        NavigationAxis::Granularity => &GRANULARITY,
    }
}

/// View and granularity share trigger markup; their labels are told apart by
/// the vocabulary each one shows.
pub const VIEW_LABEL_MARKER: &str = "View";

/* ---------------- Sector filter ---------------- */

pub const FILTER_TRIGGER: &str = "button";
pub const FILTER_PANEL: &str = "div.max-h-60.space-y-2";
pub const FILTER_ROW: &str = "div.max-h-60.space-y-2 label span.text-sm";

/// "Select sectors" while empty, "1 selected" once a row is ticked.
pub fn filter_trigger() -> Query {
    Query::css(FILTER_TRIGGER)
        .with_text(TextMatch::AnyOf(vec![
            TextMatch::ContainsCi(s!("Select sectors")),
            TextMatch::ContainsCi(s!("selected")),
        ]))
        .first()
}

/// The panel closes from the same button that opened it.
pub fn filter_commit() -> Query { filter_trigger() }

/// Sentinel: visible exactly while the panel is open.
pub fn filter_panel() -> Query { Query::css(FILTER_PANEL).first() }

/// First row whose label contains `category` (case-sensitive).
pub fn filter_row(category: &str) -> Query {
    Query::css(FILTER_ROW).with_text(TextMatch::Contains(s!(category))).first()
}

/* ---------------- Cards + pagination ---------------- */

pub const CARD: &str = "div.grid div.trend-ultra-compact";
pub const CARD_TITLE: &str = "h3";
pub const CARD_BADGE: &str = "div.mb-2 > span";
pub const CARD_TICKER: &str = "button.flex.w-full.items-center.justify-between";
pub const TICKER_PART: &str = "span";

pub fn cards() -> Query { Query::css(CARD) }

/// The last "Next" button on the page is the pager's.
pub fn next_button() -> Query {
    Query::css("button").with_text(TextMatch::Contains(s!("Next"))).last()
}

/* ---------------- Newsletter overlay ---------------- */

pub const OVERLAY: &str = "div.fixed";
pub const OVERLAY_CLOSE: &str = "button.absolute.top-1.right-1";

pub fn overlay() -> Query {
    Query::css(OVERLAY)
        .with_text(TextMatch::ContainsCi(s!("Subscribe to TickerTrends Newsletter")))
        .first()
}

/* ---------------- Login + home ---------------- */

pub const LOGIN_MODAL: &str = "div:has(button:has-text('Reset Password'))";
pub const EMAIL_INPUT: &str = "input[type='email']";
pub const PASSWORD_INPUT: &str = "input[type='password']";
pub const HOME_CARD: &str = "div[title=\"Exploding Trends\"]";

pub fn login_button() -> Query {
    Query::css("button").with_text(TextMatch::Exact(s!("Log In"))).first()
}

pub fn email_login_button() -> Query {
    Query::css("button").with_text(TextMatch::Exact(s!("Continue with Email"))).first()
}

pub fn login_modal() -> Query { Query::css(LOGIN_MODAL).first() }

pub fn home_card() -> Query { Query::css(HOME_CARD).first() }
