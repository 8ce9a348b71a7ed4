// src/specs/card.rs
//! Trend card *spec*.
//!
//! Purpose:
//! - Read one rendered card into a [`RawCard`] (title, growth badge, ticker parts).
//! - Normalize a [`RawCard`] into a [`TrendRecord`] with [`parse_card`].
//!
//! Card shape on the dashboard:
//! ```text
//! div.trend-ultra-compact
//! ├── h3                      "Stanley Cup"
//! ├── div.mb-2 > span         "+4,454%"
//! └── button.flex…            <span>AAPL</span><span>83%</span>
//! ```
//!
//! Growth grammar: sign (`+`, `-`, `+-`), then a number with optional `,`
//! separators, optional fraction and optional exponent, then an optional `%`.
//! Anything else leaves `sign`/`value` empty and keeps the text in `raw_growth`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::core::{DocumentDriver, DriverResult, Element, Query};
use crate::core::sanitize::normalize_ws;
use super::dashboard::{CARD_BADGE, CARD_TICKER, CARD_TITLE, TICKER_PART};

static GROWTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\+-|\+|-)\s*((?:\d[\d,]*(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)\s*%?\s*$")
        .expect("growth pattern compiles")
});

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d*)?|\.\d+)\s*%?\s*$").expect("percent pattern compiles")
});

/// Texts read off one card, before any normalization. `None` = part absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawCard {
    pub name: Option<String>,
    pub growth: Option<String>,
    /// Texts of the ticker control's parts, in order; `None` if the card has no ticker.
    pub ticker: Option<Vec<String>>,
}

/// Direction of a growth badge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
    PlusMinus,
    /// Badge did not match the growth grammar.
    #[default]
    None,
}

impl Sign {
    pub fn as_str(self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
            Sign::PlusMinus => "+-",
            Sign::None => "",
        }
    }

    fn from_token(tok: &str) -> Sign {
        match tok {
            "+" => Sign::Plus,
            "-" => Sign::Minus,
            "+-" => Sign::PlusMinus,
            _ => Sign::None,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl Serialize for Sign {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// One parsed card. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrendRecord {
    pub name: String,
    pub sign: Sign,
    /// Non-negative decimal (may use an exponent) when `sign` is set, else empty.
    pub value: String,
    /// Badge text as rendered (trimmed).
    pub raw_growth: String,
    pub ticker_symbol: String,
    pub ticker_percent: String,
}

/// Split a growth badge into sign and separator-free value.
/// Returns `None` when the text does not follow the growth grammar.
pub fn parse_growth(text: &str) -> Option<(Sign, String)> {
    let caps = GROWTH_RE.captures(text)?;
    let sign = Sign::from_token(&caps[1]);
    let value = caps[2].replace(',', "");
    Some((sign, value))
}

/// "83%" → "83". Malformed text comes back unchanged (trimmed).
pub fn parse_percent(text: &str) -> String {
    match PERCENT_RE.captures(text) {
        Some(caps) => s!(&caps[1]),
        None => s!(text.trim()),
    }
}

pub fn parse_card(raw: &RawCard) -> TrendRecord {
    let name = raw.name.as_deref().map(normalize_ws).unwrap_or_default();
    let raw_growth = raw.growth.as_deref().map(str::trim).unwrap_or_default().to_string();

    let (sign, value) = parse_growth(&raw_growth).unwrap_or((Sign::None, s!()));

    let (ticker_symbol, ticker_percent) = match raw.ticker.as_deref() {
        Some([symbol, percent, ..]) => (s!(symbol.trim()), parse_percent(percent)),
        _ => (s!(), s!()),
    };

    TrendRecord { name, sign, value, raw_growth, ticker_symbol, ticker_percent }
}

/// Read the parts of one (snapshotted) card element.
pub fn read_card<D: DocumentDriver + ?Sized>(driver: &D, card: Element) -> DriverResult<RawCard> {
    let name = driver.text_of(&Query::css(CARD_TITLE).within(card).first())?;
    let growth = driver.text_of(&Query::css(CARD_BADGE).within(card).first())?;

    let ticker = match driver.find_first(&Query::css(CARD_TICKER).within(card).first())? {
        Some(button) => {
            let parts = driver.find(&Query::css(TICKER_PART).within(button))?;
            let mut texts = Vec::with_capacity(parts.len());
            for p in parts.into_iter().take(2) {
                texts.push(driver.text(p)?);
            }
            Some(texts)
        }
        None => None,
    };

    Ok(RawCard { name, growth, ticker })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card(name: &str, growth: &str, ticker: &[&str]) -> RawCard {
        RawCard {
            name: Some(s!(name)),
            growth: Some(s!(growth)),
            ticker: Some(ticker.iter().map(|t| s!(*t)).collect()),
        }
    }

    #[test]
    fn growth_with_thousands_separator() {
        let r = parse_card(&card("Stanley Cup", "+4,454%", &["AAPL", "83%"]));
        assert_eq!(r.sign, Sign::Plus);
        assert_eq!(r.value, "4454");
        assert_eq!(r.raw_growth, "+4,454%");
        assert_eq!(r.ticker_symbol, "AAPL");
        assert_eq!(r.ticker_percent, "83");
    }

    #[test]
    fn growth_with_exponent() {
        assert_eq!(parse_growth("-1.2e3%"), Some((Sign::Minus, s!("1.2e3"))));
        assert_eq!(parse_growth("+ 2E+4 %"), Some((Sign::Plus, s!("2E+4"))));
        assert_eq!(parse_growth("+-12"), Some((Sign::PlusMinus, s!("12"))));
    }

    #[test]
    fn unmatched_growth_keeps_raw_text() {
        let r = parse_card(&card("Thing", "n/a", &["TSLA", "high"]));
        assert_eq!(r.sign, Sign::None);
        assert_eq!(r.value, "");
        assert_eq!(r.raw_growth, "n/a");
        assert_eq!(r.ticker_percent, "high");
    }

    #[test]
    fn rejects_signless_and_doubled_signs() {
        assert_eq!(parse_growth("450%"), None);
        assert_eq!(parse_growth("--5%"), None);
        assert_eq!(parse_growth("+%"), None);
        assert_eq!(parse_growth("+,"), None);
    }

    #[test]
    fn missing_parts_are_empty_not_errors() {
        let r = parse_card(&RawCard::default());
        assert_eq!(r, TrendRecord::default());

        let short = RawCard { ticker: Some(vec![s!("AAPL")]), ..RawCard::default() };
        let r = parse_card(&short);
        assert_eq!((r.ticker_symbol.as_str(), r.ticker_percent.as_str()), ("", ""));
    }

    #[test]
    fn name_whitespace_is_collapsed() {
        let r = parse_card(&card("  Stanley\n Cup ", "+1%", &[]));
        assert_eq!(r.name, "Stanley Cup");
    }

    #[test]
    fn percent_grammar() {
        assert_eq!(parse_percent("83%"), "83");
        assert_eq!(parse_percent(" 12.5 % "), "12.5");
        assert_eq!(parse_percent("high"), "high");
        assert_eq!(parse_percent(""), "");
    }

    #[test]
    fn sign_serializes_as_symbol() {
        let json = serde_json::to_string(&Sign::PlusMinus).unwrap();
        assert_eq!(json, "\"+-\"");
    }

    proptest! {
        #[test]
        fn matched_values_are_plain_decimals(
            sign in prop::sample::select(vec!["+", "-", "+-"]),
            int in 0u64..10_000_000,
            frac in proptest::option::of(0u32..1000),
            sep in any::<bool>(),
        ) {
            let digits = if sep {
                // re-insert thousands separators
                let s = int.to_string();
                let mut out = String::new();
                for (i, ch) in s.chars().enumerate() {
                    if i > 0 && (s.len() - i) % 3 == 0 { out.push(','); }
                    out.push(ch);
                }
                out
            } else { int.to_string() };
            let number = match frac { Some(f) => format!("{digits}.{f}"), None => digits };
            let badge = format!("{sign}{number}%");

            let (got_sign, value) = parse_growth(&badge).expect("well-formed badge parses");
            prop_assert_eq!(got_sign.as_str(), sign);
            prop_assert!(!value.contains(','));
            prop_assert!(value.parse::<f64>().is_ok());
        }

        #[test]
        fn unmatched_badges_never_lose_text(text in "[a-zA-Z/ ]{0,12}") {
            let r = parse_card(&RawCard { growth: Some(text.clone()), ..RawCard::default() });
            prop_assert_eq!(r.sign, Sign::None);
            prop_assert_eq!(r.raw_growth, text.trim());
        }
    }
}
