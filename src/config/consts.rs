// src/config/consts.rs

// Dashboard
pub const HOME_URL: &str = "https://tickertrends.io/";
pub const DEFAULT_DATA_SOURCE: &str = "Tiktok";
pub const DEFAULT_VIEW_MODE: &str = "List View";

/// Closed category vocabulary of the sector filter, in sweep order.
pub const CATEGORIES: [&str; 19] = [
    "Arts & Culture",
    "Automotive & Mobility",
    "Business & Finance",
    "Consumer Products",
    "E-commerce & Retail",
    "Education & Learning",
    "Entertainment",
    "Fashion & Beauty",
    "Food & Beverage",
    "Gaming & Virtual Worlds",
    "Health & Wellness",
    "Home & Living",
    "Politics & Government",
    "Real Estate & Housing",
    "Science & Innovation",
    "Social Media & Influencers",
    "Sports",
    "Technology",
    "Travel & Hospitality",
];

// Scrape
pub const MAX_PAGES: usize = 11; // per category; bounds cost on a personal account

// Timeouts (ms)
pub const SOURCE_MENU_MS: u64 = 50_000;
pub const OPTION_MS: u64 = 10_000;
pub const VIEW_MS: u64 = 5_000;
pub const GRANULARITY_MS: u64 = 5_000;
pub const FILTER_PANEL_MS: u64 = 5_000;
pub const FILTER_ROW_MS: u64 = 15_000;
pub const CARDS_MS: u64 = 20_000;
pub const NEXT_PAGE_MS: u64 = 10_000;
pub const POPUP_MS: u64 = 1_500;
pub const LOGIN_MS: u64 = 10_000;
pub const HOME_CARD_MS: u64 = 20_000;
pub const PAINT_SETTLE_MS: u64 = 100;
pub const CATEGORY_SETTLE_MS: u64 = 300;

// Local cache + logs
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE_STEM: &str = "tickertrends";
pub const RUN_TS_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const SCRAPE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
