// src/replay.rs
//! Recorded dashboard, served through [`DocumentDriver`].
//!
//! A [`DashboardFixture`] describes what the site would show: the three axis
//! menus, the sector panel, card pages per category, the newsletter overlay,
//! the login modal and the home screen. [`ReplayDriver`] keeps the live UI
//! state (open menus, ticked rows, page number, ...) and applies clicks to it
//! the way the site does.
//!
//! Waits never sleep: a condition either holds when asked or the wait fails
//! with `DriverError::Timeout` carrying the caller's bound. Every trait call is
//! recorded in an op log so runs can be inspected afterwards.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::consts::HOME_URL;
use crate::core::{Click, DocumentDriver, DriverError, DriverResult, Element, Query};
use crate::scrape::navigation::NavigationAxis;
use crate::specs::dashboard::{
    self as dash, CARD, CARD_BADGE, CARD_TICKER, CARD_TITLE, EMAIL_INPUT, FILTER_PANEL, FILTER_ROW,
    FILTER_TRIGGER, HOME_CARD, LOGIN_MODAL, OVERLAY, OVERLAY_CLOSE, PASSWORD_INPUT, TICKER_PART,
};

pub const DASHBOARD_PATH: &str = "exploding-trends";

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read fixture {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid fixture {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/* ---------------- Fixture ---------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Home,
    Dashboard,
}

/// One selection axis: the label shown at start and the menu entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFixture {
    pub current: String,
    pub options: Vec<String>,
}

impl AxisFixture {
    pub fn new(current: &str, options: &[&str]) -> Self {
        Self { current: s!(current), options: options.iter().map(|o| s!(*o)).collect() }
    }
}

/// One rendered card. `None` parts are absent from the markup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFixture {
    pub title: Option<String>,
    pub growth: Option<String>,
    pub ticker: Option<Vec<String>>,
}

/// A sector row and the result pages shown while it is the filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryFixture {
    pub label: String,
    pub pages: Vec<Vec<CardFixture>>,
}

impl CategoryFixture {
    /// `pages` pages of `per_page` well-formed cards.
    pub fn synthetic(label: &str, pages: usize, per_page: usize) -> Self {
        let pages = (0..pages)
            .map(|p| {
                (0..per_page)
                    .map(|c| CardFixture {
                        title: Some(format!("{label} trend {}-{}", p + 1, c + 1)),
                        growth: Some(format!("+{},{:03}%", p + 1, c)),
                        ticker: Some(vec![format!("T{}{}", p + 1, c + 1), format!("{}%", 10 + c)]),
                    })
                    .collect()
            })
            .collect();
        Self { label: s!(label), pages }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFixture {
    pub email: String,
    pub password: String,
}

/// Switches that make the recorded site misbehave.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faults {
    /// Option clicks on these axes close the menu without changing the label.
    pub stuck_axes: Vec<NavigationAxis>,
    /// Next clicks never change the page.
    pub frozen_pagination: bool,
    /// The overlay's close button only reacts to forced clicks.
    pub overlay_needs_force: bool,
    /// The overlay never closes.
    pub overlay_stuck: bool,
    /// The sector panel never closes once opened.
    pub panel_stuck_open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardFixture {
    pub start: Screen,
    pub overlay: bool,
    /// Accepted account; `None` accepts any.
    pub login: Option<LoginFixture>,
    pub data_source: AxisFixture,
    pub view_mode: AxisFixture,
    pub granularity: AxisFixture,
    /// Sector rows, in panel order.
    pub categories: Vec<CategoryFixture>,
    /// Pages shown with no sector ticked.
    pub unfiltered: Vec<Vec<CardFixture>>,
    pub faults: Faults,
}

impl Default for DashboardFixture {
    fn default() -> Self {
        Self {
            start: Screen::Home,
            overlay: false,
            login: None,
            data_source: AxisFixture::new("Google Search", &["Google Search", "Tiktok", "Youtube"]),
            view_mode: AxisFixture::new("Chart View", &["Chart View", "List View"]),
            granularity: AxisFixture::new("Weekly", &["Daily", "Weekly", "Monthly"]),
            categories: Vec::new(),
            unfiltered: Vec::new(),
            faults: Faults::default(),
        }
    }
}

impl DashboardFixture {
    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ReplayError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| ReplayError::Parse { path: path.to_path_buf(), source })
    }

    fn axis(&self, axis: NavigationAxis) -> &AxisFixture {
        match axis {
            NavigationAxis::DataSource => &self.data_source,
            NavigationAxis::ViewMode => &self.view_mode,
            NavigationAxis::Granularity => &self.granularity,
        }
    }

    /// Result pages for a row index, or the unfiltered pages.
    fn pages(&self, set: Option<usize>) -> &[Vec<CardFixture>] {
        match set {
            Some(i) => self.categories.get(i).map(|c| c.pages.as_slice()).unwrap_or_default(),
            None => &self.unfiltered,
        }
    }

    fn card(&self, set: Option<usize>, page: usize, idx: usize) -> Option<&CardFixture> {
        self.pages(set).get(page)?.get(idx)
    }
}

/* ---------------- Live document ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Node {
    AxisTrigger(NavigationAxis),
    AxisLabel(NavigationAxis),
    AxisOption(NavigationAxis, usize),
    FilterTrigger,
    FilterPanel,
    FilterRow(usize),
    Card { set: Option<usize>, page: usize, idx: usize },
    CardTitle { set: Option<usize>, page: usize, idx: usize },
    CardBadge { set: Option<usize>, page: usize, idx: usize },
    CardTicker { set: Option<usize>, page: usize, idx: usize },
    TickerPart { set: Option<usize>, page: usize, idx: usize, part: usize },
    NextButton,
    Overlay,
    OverlayClose,
    LoginButton,
    EmailLoginButton,
    LoginModal,
    EmailInput,
    PasswordInput,
    LoginSubmit,
    HomeCard,
}

/// One recorded driver call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Find(String),
    Text(Element),
    IsEnabled(Element),
    WaitVisible(String),
    WaitHidden(String),
    Click(Element),
    Fill(Element),
    Location,
    WaitLocation,
    Snapshot(String),
}

#[derive(Clone, Debug)]
struct Live {
    screen: Screen,
    current: HashMap<NavigationAxis, String>,
    open_menu: Option<NavigationAxis>,
    panel_open: bool,
    ticked: BTreeSet<usize>,
    page: usize,
    overlay: bool,
    chooser_open: bool,
    modal_open: bool,
    email: String,
    password: String,
    logged_in: bool,
}

#[derive(Default)]
struct Handles {
    nodes: Vec<Node>,
    ids: HashMap<Node, u64>,
}

pub struct ReplayDriver {
    fixture: DashboardFixture,
    live: RefCell<Live>,
    handles: RefCell<Handles>,
    ops: RefCell<Vec<Op>>,
    next_clicks: RefCell<usize>,
}

impl ReplayDriver {
    pub fn new(fixture: DashboardFixture) -> Self {
        let current = NavigationAxis::ALL
            .into_iter()
            .map(|a| (a, fixture.axis(a).current.clone()))
            .collect();
        let live = Live {
            screen: fixture.start,
            current,
            open_menu: None,
            panel_open: false,
            ticked: BTreeSet::new(),
            page: 0,
            overlay: fixture.overlay,
            chooser_open: false,
            modal_open: false,
            email: s!(),
            password: s!(),
            logged_in: false,
        };
        Self {
            fixture,
            live: RefCell::new(live),
            handles: RefCell::new(Handles::default()),
            ops: RefCell::new(Vec::new()),
            next_clicks: RefCell::new(0),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        DashboardFixture::from_path(path).map(Self::new)
    }

    /* ---- inspection ---- */

    pub fn ops(&self) -> Vec<Op> { self.ops.borrow().clone() }
    pub fn op_count(&self) -> usize { self.ops.borrow().len() }
    pub fn clear_ops(&self) { self.ops.borrow_mut().clear() }
    pub fn click_count(&self) -> usize {
        self.ops.borrow().iter().filter(|op| matches!(op, Op::Click(_))).count()
    }
    /// Clicks that landed on the pager's next button.
    pub fn next_clicks(&self) -> usize { *self.next_clicks.borrow() }

    pub fn screen(&self) -> Screen { self.live.borrow().screen }
    pub fn shown(&self, axis: NavigationAxis) -> String {
        self.live.borrow().current.get(&axis).cloned().unwrap_or_default()
    }
    /// Labels of the ticked sector rows, in panel order.
    pub fn ticked(&self) -> Vec<String> {
        let live = self.live.borrow();
        live.ticked
            .iter()
            .filter_map(|&i| self.fixture.categories.get(i).map(|c| c.label.clone()))
            .collect()
    }
    pub fn page_number(&self) -> usize { self.live.borrow().page + 1 }
    pub fn panel_open(&self) -> bool { self.live.borrow().panel_open }
    pub fn overlay_visible(&self) -> bool { self.live.borrow().overlay }
    pub fn logged_in(&self) -> bool { self.live.borrow().logged_in }

    /* ---- internals ---- */

    fn record(&self, op: Op) { self.ops.borrow_mut().push(op) }

    fn handle(&self, node: Node) -> Element {
        let mut h = self.handles.borrow_mut();
        if let Some(&id) = h.ids.get(&node) {
            return Element(id);
        }
        let id = h.nodes.len() as u64;
        h.nodes.push(node);
        h.ids.insert(node, id);
        Element(id)
    }

    fn node(&self, el: Element) -> DriverResult<Node> {
        let h = self.handles.borrow();
        usize::try_from(el.0)
            .ok()
            .and_then(|i| h.nodes.get(i).copied())
            .ok_or(DriverError::Detached(el))
    }

    fn result_sets(live: &Live) -> Vec<Option<usize>> {
        if live.ticked.is_empty() { vec![None] } else { live.ticked.iter().map(|&i| Some(i)).collect() }
    }

    fn page_count(&self, live: &Live) -> usize {
        Self::result_sets(live).into_iter().map(|s| self.fixture.pages(s).len()).max().unwrap_or(0)
    }

    fn visible_cards(&self, live: &Live) -> Vec<Node> {
        let mut out = Vec::new();
        for set in Self::result_sets(live) {
            if let Some(cards) = self.fixture.pages(set).get(live.page) {
                out.extend((0..cards.len()).map(|idx| Node::Card { set, page: live.page, idx }));
            }
        }
        out
    }

    fn next_enabled(&self, live: &Live) -> bool { live.page + 1 < self.page_count(live) }

    fn location(&self, live: &Live) -> String {
        match live.screen {
            Screen::Home => s!(HOME_URL),
            Screen::Dashboard => format!("{HOME_URL}{DASHBOARD_PATH}?pageNo={}", live.page + 1),
        }
    }

    /// Visible top-level matches of a selector, in document order.
    fn top_level(&self, live: &Live, css: &str) -> Vec<Node> {
        use NavigationAxis::*;
        let on_dash = live.screen == Screen::Dashboard;
        let shared_menu = matches!(live.open_menu, Some(ViewMode | Granularity));
        let mut out = Vec::new();

        if css == OVERLAY {
            if live.overlay { out.push(Node::Overlay) }
        } else if css == LOGIN_MODAL {
            if live.modal_open { out.push(Node::LoginModal) }
        } else if css == EMAIL_INPUT {
            if live.modal_open { out.push(Node::EmailInput) }
        } else if css == PASSWORD_INPUT {
            if live.modal_open { out.push(Node::PasswordInput) }
        } else if css == HOME_CARD {
            if live.screen == Screen::Home && !live.modal_open && !live.chooser_open {
                out.push(Node::HomeCard)
            }
        } else if css == FILTER_TRIGGER {
            // every button on the page
            if live.overlay { out.push(Node::OverlayClose) }
            if live.screen == Screen::Home && !live.logged_in {
                out.push(Node::LoginButton)
            }
            if live.chooser_open { out.push(Node::EmailLoginButton) }
            if live.modal_open { out.push(Node::LoginSubmit) }
            if on_dash {
                out.push(Node::FilterTrigger);
                if self.page_count(live) > 0 { out.push(Node::NextButton) }
            }
        } else if !on_dash {
            // dashboard-only selectors below
        } else if css == dash::DATA_SOURCE.trigger {
            out.push(Node::AxisTrigger(DataSource));
        } else if css == dash::DATA_SOURCE.options {
            if live.open_menu == Some(DataSource) {
                out.extend((0..self.fixture.data_source.options.len()).map(|i| Node::AxisOption(DataSource, i)));
            }
        } else if css == dash::VIEW_MODE.trigger {
            out.extend([Node::AxisTrigger(ViewMode), Node::AxisTrigger(Granularity)]);
        } else if css == dash::VIEW_MODE.label {
            out.extend([Node::AxisLabel(ViewMode), Node::AxisLabel(Granularity)]);
        } else if css == dash::VIEW_MODE.options {
            if let (true, Some(axis)) = (shared_menu, live.open_menu) {
                out.extend((0..self.fixture.axis(axis).options.len()).map(|i| Node::AxisOption(axis, i)));
            }
        } else if css == FILTER_PANEL {
            if live.panel_open { out.push(Node::FilterPanel) }
        } else if css == FILTER_ROW {
            if live.panel_open {
                out.extend((0..self.fixture.categories.len()).map(Node::FilterRow));
            }
        } else if css == CARD {
            out.extend(self.visible_cards(live));
        }
        out
    }

    /// Matches of a selector inside one element.
    fn children(&self, live: &Live, scope: Node, css: &str) -> Vec<Node> {
        match scope {
            Node::Card { set, page, idx } => {
                let Some(card) = self.fixture.card(set, page, idx) else { return Vec::new() };
                if css == CARD_TITLE && card.title.is_some() {
                    vec![Node::CardTitle { set, page, idx }]
                } else if css == CARD_BADGE && card.growth.is_some() {
                    vec![Node::CardBadge { set, page, idx }]
                } else if css == CARD_TICKER && card.ticker.is_some() {
                    vec![Node::CardTicker { set, page, idx }]
                } else {
                    Vec::new()
                }
            }
            Node::CardTicker { set, page, idx } if css == TICKER_PART => {
                let parts = self.fixture.card(set, page, idx).and_then(|c| c.ticker.as_ref()).map_or(0, Vec::len);
                (0..parts).map(|part| Node::TickerPart { set, page, idx, part }).collect()
            }
            Node::Overlay if css == OVERLAY_CLOSE && live.overlay => vec![Node::OverlayClose],
            Node::LoginModal if live.modal_open => {
                if css == EMAIL_INPUT {
                    vec![Node::EmailInput]
                } else if css == PASSWORD_INPUT {
                    vec![Node::PasswordInput]
                } else if css == "button" {
                    vec![Node::LoginSubmit]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn node_text(&self, live: &Live, node: Node) -> String {
        let card = |set, page, idx| self.fixture.card(set, page, idx);
        match node {
            Node::AxisTrigger(a) | Node::AxisLabel(a) => live.current.get(&a).cloned().unwrap_or_default(),
            Node::AxisOption(a, i) => self.fixture.axis(a).options.get(i).cloned().unwrap_or_default(),
            Node::FilterTrigger => match live.ticked.len() {
                0 => s!("Select sectors"),
                n => format!("{n} selected"),
            },
            Node::FilterPanel => s!(),
            Node::FilterRow(i) => self.fixture.categories.get(i).map(|c| c.label.clone()).unwrap_or_default(),
            Node::Card { set, page, idx } => card(set, page, idx)
                .and_then(|c| c.title.clone())
                .unwrap_or_default(),
            Node::CardTitle { set, page, idx } => card(set, page, idx).and_then(|c| c.title.clone()).unwrap_or_default(),
            Node::CardBadge { set, page, idx } => card(set, page, idx).and_then(|c| c.growth.clone()).unwrap_or_default(),
            Node::CardTicker { set, page, idx } => card(set, page, idx)
                .and_then(|c| c.ticker.as_ref())
                .map(|parts| parts.join(" "))
                .unwrap_or_default(),
            Node::TickerPart { set, page, idx, part } => card(set, page, idx)
                .and_then(|c| c.ticker.as_ref()?.get(part).cloned())
                .unwrap_or_default(),
            Node::NextButton => s!("Next"),
            Node::Overlay => s!("Subscribe to TickerTrends Newsletter"),
            Node::OverlayClose => s!("×"),
            Node::LoginButton | Node::LoginSubmit => s!("Log In"),
            Node::EmailLoginButton => s!("Continue with Email"),
            Node::LoginModal => s!("Log In Reset Password"),
            Node::EmailInput => live.email.clone(),
            Node::PasswordInput => live.password.clone(),
            Node::HomeCard => s!("Exploding Trends"),
        }
    }

    fn resolve(&self, query: &Query) -> DriverResult<Vec<Node>> {
        let live = self.live.borrow();
        let found = match query.within {
            Some(scope) => self.children(&live, self.node(scope)?, &query.css),
            None => self.top_level(&live, &query.css),
        };
        let matched: Vec<Node> = match &query.text {
            Some(m) => found.into_iter().filter(|&n| m.matches(&self.node_text(&live, n))).collect(),
            None => found,
        };
        Ok(query.pick_from(matched))
    }

    fn resolve_handles(&self, query: &Query) -> DriverResult<Vec<Element>> {
        Ok(self.resolve(query)?.into_iter().map(|n| self.handle(n)).collect())
    }

    /// Apply one click to the live state.
    fn apply_click(&self, node: Node, opts: Click) -> DriverResult<()> {
        let faults = &self.fixture.faults;
        let mut live = self.live.borrow_mut();

        if live.overlay && !opts.force && node != Node::OverlayClose {
            return Err(DriverError::Backend(format!("click on {node:?} intercepted by overlay")));
        }

        match node {
            Node::AxisTrigger(a) => {
                live.open_menu = if live.open_menu == Some(a) { None } else { Some(a) };
            }
            Node::AxisOption(a, i) => {
                if live.open_menu != Some(a) {
                    return Err(DriverError::Backend(format!("{a} menu is closed")));
                }
                live.open_menu = None;
                if !faults.stuck_axes.contains(&a) {
                    let label = self.fixture.axis(a).options.get(i).cloned().unwrap_or_default();
                    live.current.insert(a, label);
                    live.page = 0;
                }
            }
            Node::FilterTrigger => {
                if !live.panel_open {
                    live.panel_open = true;
                } else if !faults.panel_stuck_open {
                    live.panel_open = false;
                }
            }
            Node::FilterRow(i) => {
                if !live.ticked.remove(&i) {
                    live.ticked.insert(i);
                }
                live.page = 0;
            }
            Node::NextButton => {
                *self.next_clicks.borrow_mut() += 1;
                if self.next_enabled(&live) && !faults.frozen_pagination {
                    live.page += 1;
                }
            }
            Node::OverlayClose => {
                if faults.overlay_needs_force && !opts.force {
                    return Err(DriverError::Backend(s!("close button is not actionable")));
                }
                if !faults.overlay_stuck {
                    live.overlay = false;
                }
            }
            Node::LoginButton => live.chooser_open = true,
            Node::EmailLoginButton => {
                live.chooser_open = false;
                live.modal_open = true;
            }
            Node::LoginSubmit => {
                let accepted = match &self.fixture.login {
                    Some(acct) => acct.email == live.email && acct.password == live.password,
                    None => !live.email.is_empty(),
                };
                if accepted {
                    live.modal_open = false;
                    live.logged_in = true;
                }
            }
            Node::HomeCard => {
                live.screen = Screen::Dashboard;
                live.page = 0;
            }
            _ => {}
        }
        Ok(())
    }
}

impl DocumentDriver for ReplayDriver {
    fn find(&self, query: &Query) -> DriverResult<Vec<Element>> {
        self.record(Op::Find(query.to_string()));
        self.resolve_handles(query)
    }

    fn text(&self, el: Element) -> DriverResult<String> {
        self.record(Op::Text(el));
        let node = self.node(el)?;
        Ok(self.node_text(&self.live.borrow(), node))
    }

    fn is_enabled(&self, el: Element) -> DriverResult<bool> {
        self.record(Op::IsEnabled(el));
        match self.node(el)? {
            Node::NextButton => Ok(self.next_enabled(&self.live.borrow())),
            _ => Ok(true),
        }
    }

    fn wait_visible(&self, query: &Query, timeout: Duration) -> DriverResult<Element> {
        self.record(Op::WaitVisible(query.to_string()));
        match self.resolve(query)?.into_iter().next() {
            Some(node) => Ok(self.handle(node)),
            None => Err(DriverError::timeout(query, timeout)),
        }
    }

    fn wait_hidden(&self, query: &Query, timeout: Duration) -> DriverResult<()> {
        self.record(Op::WaitHidden(query.to_string()));
        if self.resolve(query)?.is_empty() {
            Ok(())
        } else {
            Err(DriverError::timeout(format!("{query} to hide"), timeout))
        }
    }

    fn click(&self, el: Element, opts: Click) -> DriverResult<()> {
        self.record(Op::Click(el));
        let node = self.node(el)?;
        debug!("Replay: click {node:?}");
        self.apply_click(node, opts)
    }

    fn fill(&self, el: Element, text: &str) -> DriverResult<()> {
        self.record(Op::Fill(el));
        let mut live = self.live.borrow_mut();
        match self.node(el)? {
            Node::EmailInput => live.email = s!(text),
            Node::PasswordInput => live.password = s!(text),
            other => return Err(DriverError::Backend(format!("{other:?} is not an input"))),
        }
        Ok(())
    }

    fn current_location(&self) -> DriverResult<String> {
        self.record(Op::Location);
        Ok(self.location(&self.live.borrow()))
    }

    fn wait_location_changed(&self, previous: &str, timeout: Duration) -> DriverResult<String> {
        self.record(Op::WaitLocation);
        let now = self.location(&self.live.borrow());
        if now != previous {
            Ok(now)
        } else {
            Err(DriverError::timeout(format!("location to leave {previous}"), timeout))
        }
    }

    fn snapshot(&self, query: &Query) -> DriverResult<Vec<Element>> {
        self.record(Op::Snapshot(query.to_string()));
        // Card handles carry their page, so later page changes leave them intact.
        self.resolve_handles(query)
    }
}
