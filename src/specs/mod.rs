// src/specs/mod.rs
//! # Dashboard “specs” module
//!
//! Page knowledge for the trends dashboard: *where the ground truth lives in
//! the rendered document* and *how to turn it into typed values*.
//!
//! ## What lives here
//! - **Structural selectors** for every control the scraper touches
//!   (`dashboard`): axis triggers and option lists, the sector filter panel,
//!   card parts, pagination, popup and login controls.
//! - **Card reading and parsing** (`card`): pull the title, growth badge and
//!   ticker texts off one card, then normalize them into a `TrendRecord`.
//!   Parsing is pure and never touches the driver.
//!
//! ## What does **not** live here
//! - **Control flow**: which axis to set, when to paginate, how failures are
//!   isolated. That is `scrape::*`.
//! - **Persistence/export**: `file`.
//!
//! ## Conventions & invariants
//! - Selectors are structural; label text is only ever matched through
//!   `core::TextMatch`, built here per control.
//! - Parsers never drop information: anything that does not match a grammar
//!   is kept verbatim in a raw field or used as the fallback value.
//!
//! In short: **`specs` knows how to read the dashboard.** Other layers decide
//! what to click and in which order.
pub mod card;
pub mod dashboard;
