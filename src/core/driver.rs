// src/core/driver.rs
//! The document driver seam.
//!
//! Everything the scraper does to the dashboard goes through [`DocumentDriver`]:
//! lookups, visibility waits, clicks, typing and location tracking. A browser
//! automation backend implements it for real runs; `replay::ReplayDriver`
//! implements it over a recorded dashboard for offline runs and tests.
//!
//! Queries are plain values. The driver re-resolves a [`Query`] on every call,
//! so it behaves like a live element set; [`DocumentDriver::snapshot`] is the
//! one call that freezes a set into stable [`Element`] handles.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Opaque handle to one element, valid for as long as the driver keeps it attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(pub u64);

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visible-text predicate attached to a query.
///
/// This is the only place label matching is defined; drivers call
/// [`TextMatch::matches`] instead of comparing strings themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextMatch {
    /// Whole trimmed text, case-sensitive.
    Exact(String),
    /// Substring, case-sensitive.
    Contains(String),
    /// Substring, ASCII case-insensitive.
    ContainsCi(String),
    /// Prefix of the trimmed text, ASCII case-insensitive. Tolerates trailing
    /// decoration such as chevrons after a label.
    PrefixCi(String),
    /// Any of the inner predicates.
    AnyOf(Vec<TextMatch>),
}

impl TextMatch {
    pub fn matches(&self, text: &str) -> bool {
        let t = text.trim();
        match self {
            TextMatch::Exact(want) => t == want,
            TextMatch::Contains(want) => t.contains(want.as_str()),
            TextMatch::ContainsCi(want) => {
                t.to_ascii_lowercase().contains(&want.to_ascii_lowercase())
            }
            TextMatch::PrefixCi(want) => t
                .get(..want.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(want)),
            TextMatch::AnyOf(all) => all.iter().any(|m| m.matches(text)),
        }
    }
}

/// Which of the matching elements a query resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pick {
    #[default]
    All,
    First,
    Last,
}

/// A structural selector plus optional text filter and scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub css: String,
    pub text: Option<TextMatch>,
    pub within: Option<Element>,
    pub pick: Pick,
}

impl Query {
    pub fn css(css: impl Into<String>) -> Self {
        Self { css: css.into(), text: None, within: None, pick: Pick::All }
    }
    pub fn with_text(mut self, text: TextMatch) -> Self {
        self.text = Some(text);
        self
    }
    pub fn within(mut self, scope: Element) -> Self {
        self.within = Some(scope);
        self
    }
    pub fn first(mut self) -> Self {
        self.pick = Pick::First;
        self
    }
    pub fn last(mut self) -> Self {
        self.pick = Pick::Last;
        self
    }

    /// Narrow a list of candidates (document order) by `pick`.
    pub fn pick_from<T>(&self, mut found: Vec<T>) -> Vec<T> {
        match self.pick {
            Pick::All => found,
            Pick::First => {
                found.truncate(1);
                found
            }
            Pick::Last => found.pop().into_iter().collect(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = self.within {
            write!(f, "{scope} >> ")?;
        }
        write!(f, "{}", self.css)?;
        if let Some(t) = &self.text {
            write!(f, " [text {t:?}]")?;
        }
        match self.pick {
            Pick::All => Ok(()),
            Pick::First => write!(f, " (first)"),
            Pick::Last => write!(f, " (last)"),
        }
    }
}

/// Click modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Click {
    /// Skip actionability checks (overlays, animations).
    pub force: bool,
}

impl Click {
    pub const NORMAL: Click = Click { force: false };
    pub const FORCE: Click = Click { force: true };
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },
    #[error("element {0} is no longer attached to the document")]
    Detached(Element),
    #[error("driver backend: {0}")]
    Backend(String),
}

impl DriverError {
    pub fn timeout(what: impl fmt::Display, after: Duration) -> Self {
        DriverError::Timeout { what: what.to_string(), after }
    }
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Primitive operations against one rendered document.
///
/// Every wait is bounded by its own timeout and blocks until the condition
/// holds or the bound elapses; there is no run-wide cancellation. Methods take
/// `&self` so one session's components can share a handle; a driver is still
/// meant for a single control flow.
pub trait DocumentDriver {
    /// Resolve `query` now, in document order.
    fn find(&self, query: &Query) -> DriverResult<Vec<Element>>;

    /// Rendered text of an element.
    fn text(&self, el: Element) -> DriverResult<String>;

    /// False for disabled controls.
    fn is_enabled(&self, el: Element) -> DriverResult<bool>;

    /// First visible match of `query`, or `DriverError::Timeout`.
    fn wait_visible(&self, query: &Query, timeout: Duration) -> DriverResult<Element>;

    /// Returns once nothing matching `query` is visible, or `DriverError::Timeout`.
    fn wait_hidden(&self, query: &Query, timeout: Duration) -> DriverResult<()>;

    fn click(&self, el: Element, opts: Click) -> DriverResult<()>;

    fn fill(&self, el: Element, text: &str) -> DriverResult<()>;

    fn current_location(&self) -> DriverResult<String>;

    /// New location once it differs from `previous`, or `DriverError::Timeout`.
    fn wait_location_changed(&self, previous: &str, timeout: Duration) -> DriverResult<String>;

    /// Stable handles for the current matches of `query`. Later mutations of
    /// the document do not reorder or extend the returned set.
    fn snapshot(&self, query: &Query) -> DriverResult<Vec<Element>>;

    /// First current match, if any.
    fn find_first(&self, query: &Query) -> DriverResult<Option<Element>> {
        Ok(self.find(query)?.into_iter().next())
    }

    /// Text of the first current match, if any.
    fn text_of(&self, query: &Query) -> DriverResult<Option<String>> {
        match self.find_first(query)? {
            Some(el) => self.text(el).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_tolerates_decoration() {
        let m = TextMatch::PrefixCi("daily".into());
        assert!(m.matches("Daily ▾"));
        assert!(m.matches("  DAILY"));
        assert!(!m.matches("Weekly"));
        assert!(!m.matches("Da"));
    }

    #[test]
    fn contains_is_case_sensitive_unless_ci() {
        assert!(TextMatch::Contains("Sports".into()).matches("Sports"));
        assert!(!TextMatch::Contains("sports".into()).matches("Sports"));
        assert!(TextMatch::ContainsCi("sports".into()).matches("Sports"));
    }

    #[test]
    fn any_of_and_exact() {
        let m = TextMatch::AnyOf(vec![
            TextMatch::ContainsCi("select sectors".into()),
            TextMatch::ContainsCi("selected".into()),
        ]);
        assert!(m.matches("1 selected"));
        assert!(m.matches("Select sectors"));
        assert!(!m.matches("Filters"));
        assert!(TextMatch::Exact("List View".into()).matches(" List View "));
        assert!(!TextMatch::Exact("List View".into()).matches("List Views"));
    }

    #[test]
    fn pick_narrows_in_document_order() {
        let q = Query::css("button");
        assert_eq!(q.clone().first().pick_from(vec![1, 2, 3]), vec![1]);
        assert_eq!(q.clone().last().pick_from(vec![1, 2, 3]), vec![3]);
        assert_eq!(q.pick_from(vec![1, 2, 3]), vec![1, 2, 3]);
        assert!(Query::css("x").last().pick_from(Vec::<u8>::new()).is_empty());
    }
}
