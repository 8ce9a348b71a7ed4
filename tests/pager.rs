// tests/pager.rs
//
// Page walking: caps, natural end, frozen next, empty results.
//
mod common;

use trend_scrape::error::ScrapeError;
use trend_scrape::replay::{CategoryFixture, DashboardFixture, Faults, Op, ReplayDriver};
use trend_scrape::scrape::PaginationExtractor;
use trend_scrape::specs::card::Sign;

use common::{dashboard, timeouts};

fn unfiltered(pages: usize, per_page: usize) -> DashboardFixture {
    DashboardFixture {
        unfiltered: CategoryFixture::synthetic("All", pages, per_page).pages,
        ..dashboard(vec![])
    }
}

#[test]
fn page_cap_stops_before_clicking_next_again() {
    let d = ReplayDriver::new(unfiltered(15, 4));
    let t = timeouts();
    let pager = PaginationExtractor::new(&d, &t);

    let records = pager.extract_all(Some(11)).unwrap();
    assert_eq!(records.len(), 11 * 4);
    assert_eq!(d.next_clicks(), 10, "no 12th page requested");
    assert_eq!(d.page_number(), 11);
    assert_eq!(records[0].name, "All trend 1-1");
    assert_eq!(records.last().unwrap().name, "All trend 11-4");
}

#[test]
fn walks_to_the_natural_last_page() {
    let d = ReplayDriver::new(unfiltered(3, 2));
    let t = timeouts();
    let pager = PaginationExtractor::new(&d, &t);

    let records = pager.extract_all(None).unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(d.next_clicks(), 2);
    // Stopped on the disabled button, not on a location timeout.
    let location_waits = d.ops().iter().filter(|op| matches!(op, Op::WaitLocation)).count();
    assert_eq!(location_waits, 2);
    assert!(!pager.has_next().unwrap());
}

#[test]
fn zero_cap_means_uncapped() {
    let d = ReplayDriver::new(unfiltered(13, 1));
    let t = timeouts();
    let records = PaginationExtractor::new(&d, &t).extract_all(Some(0)).unwrap();
    assert_eq!(records.len(), 13);
}

#[test]
fn frozen_next_button_ends_the_walk() {
    let d = ReplayDriver::new(DashboardFixture {
        faults: Faults { frozen_pagination: true, ..Faults::default() },
        ..unfiltered(5, 2)
    });
    let t = timeouts();
    let pager = PaginationExtractor::new(&d, &t);

    assert_eq!(pager.go_next(), Err(ScrapeError::NavigationTimeout));
    let records = pager.extract_all(None).unwrap();
    assert_eq!(records.len(), 2, "only the first page");
}

#[test]
fn no_cards_is_an_error() {
    let d = ReplayDriver::new(unfiltered(0, 0));
    let t = timeouts();
    let pager = PaginationExtractor::new(&d, &t);
    assert_eq!(pager.extract_all(None).unwrap_err(), ScrapeError::NoCards);
    assert!(!pager.go_next().unwrap());
}

#[test]
fn cards_parse_in_document_order() {
    let d = ReplayDriver::new(unfiltered(1, 3));
    let t = timeouts();
    let page = PaginationExtractor::new(&d, &t).extract_current_page().unwrap();
    let names: Vec<&str> = page.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["All trend 1-1", "All trend 1-2", "All trend 1-3"]);
    assert_eq!(page[2].sign, Sign::Plus);
    assert_eq!(page[2].value, "1002");
    assert_eq!((page[2].ticker_symbol.as_str(), page[2].ticker_percent.as_str()), ("T13", "12"));
}
