// tests/cli_e2e.rs
//
// Full run from the recorded fixture through to files on disk.
//
#![cfg(feature = "cli")]

use std::{fs, path::PathBuf};

use trend_scrape::cli::{self, Args};
use trend_scrape::replay::{DashboardFixture, Screen};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dashboard.json")
}

#[test]
fn sample_fixture_loads() {
    let f = DashboardFixture::from_path(&fixture_path()).unwrap();
    assert_eq!(f.start, Screen::Home);
    assert!(f.overlay);
    assert_eq!(f.categories.len(), 3);
}

#[test]
fn run_writes_one_file_per_category_with_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let args = Args {
        fixture: fixture_path(),
        categories: vec!["Food & Beverage".into(), "Sports".into(), "Technology".into()],
        per_category: true,
        out: Some(tmp.path().to_path_buf()),
        ..Args::default()
    };
    cli::run(args).unwrap();

    let mut names: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 2, "Technology has no cards: {names:?}");
    assert!(names[0].starts_with("tickertrends_daily_food-beverage_"));
    assert!(names[1].starts_with("tickertrends_daily_sports_"));

    let food: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(tmp.path().join(&names[0])).unwrap()).unwrap();
    assert_eq!(food.len(), 3);
    assert_eq!(food[0]["value"], "4454");
    assert_eq!(food[1]["name"], "Cottage Cheese Ice Cream");
    assert_eq!(food[2]["ticker_symbol"], "");
}
