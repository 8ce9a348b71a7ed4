// src/scrape/mod.rs
//! Driving the dashboard.
//!
//! - `navigation`: data source / view / granularity selection (value-object state)
//! - `filter`:     one-category sector filter with toggle semantics
//! - `pager`:      card extraction across result pages
//! - `session`:    prepare → configure → per-category sweep

pub mod filter;
pub mod navigation;
pub mod pager;
pub mod session;

pub use filter::CategoryFilterController;
pub use navigation::{AxisControls, NavigationAxis, NavigationState, Navigator};
pub use pager::PaginationExtractor;
pub use session::{Credentials, Outcome, Session};
