// src/core/mod.rs

pub mod driver;
pub mod sanitize;

pub use driver::{Click, DocumentDriver, DriverError, DriverResult, Element, Pick, Query, TextMatch};
