// tests/navigation.rs
//
// Axis transitions against the replay dashboard.
//
mod common;

use trend_scrape::config::Granularity;
use trend_scrape::error::ScrapeError;
use trend_scrape::replay::{DashboardFixture, Faults, ReplayDriver};
use trend_scrape::scrape::{AxisControls, NavigationAxis, NavigationState, Navigator};

use common::{dashboard, driver, timeouts};

#[test]
fn observe_reads_all_three_axes() {
    let d = driver(vec![]);
    let nav = Navigator::new(&d, timeouts());
    let state = nav.observe().unwrap();
    assert_eq!(state, NavigationState::new("Google Search", "Chart View", "Weekly"));
}

#[test]
fn transition_to_current_label_touches_nothing() {
    let d = driver(vec![]);
    let nav = Navigator::new(&d, timeouts());
    let state = NavigationState::new("Google Search", "Chart View", "Weekly");

    d.clear_ops();
    let same = nav.transition(&state, NavigationAxis::DataSource, "google search").unwrap();
    let same = nav.set_granularity(&same, Granularity::Weekly).unwrap();
    assert_eq!(same, state);
    assert_eq!(d.op_count(), 0, "no driver call for a no-op transition");
}

#[test]
fn repeated_transition_runs_the_click_sequence_once() {
    let d = driver(vec![]);
    let nav = Navigator::new(&d, timeouts());
    let s0 = nav.observe().unwrap();

    d.clear_ops();
    let s1 = nav.set_data_source(&s0, "Tiktok").unwrap();
    let after_first = d.op_count();
    assert_eq!(d.click_count(), 2, "trigger, then option");
    assert!(after_first > 2);

    let s2 = nav.set_data_source(&s1, "Tiktok").unwrap();
    assert_eq!(s2, s1);
    assert_eq!(d.op_count(), after_first, "second call adds no driver calls");
    assert_eq!(d.shown(NavigationAxis::DataSource), "Tiktok");
}

#[test]
fn confirmed_transitions_return_new_state() {
    let d = driver(vec![]);
    let nav = Navigator::new(&d, timeouts());
    let s0 = nav.observe().unwrap();

    let s1 = nav.set_data_source(&s0, "Tiktok").unwrap();
    let s2 = nav.set_view_mode(&s1, "List View").unwrap();
    let s3 = nav.set_granularity(&s2, Granularity::Daily).unwrap();

    assert_eq!(s3, NavigationState::new("Tiktok", "List View", "Daily"));
    assert_eq!(s0.get(NavigationAxis::DataSource), "Google Search", "input state untouched");
    for axis in NavigationAxis::ALL {
        assert_eq!(d.shown(axis), s3.get(axis));
    }
}

#[test]
fn missing_option_leaves_state_and_page_alone() {
    let d = driver(vec![]);
    let nav = Navigator::new(&d, timeouts());
    let s0 = nav.observe().unwrap();

    let err = nav.set_data_source(&s0, "Facebook").unwrap_err();
    assert_eq!(
        err,
        ScrapeError::OptionNotFound { axis: NavigationAxis::DataSource, label: "Facebook".into() }
    );
    assert_eq!(s0.get(NavigationAxis::DataSource), "Google Search");
    assert_eq!(d.shown(NavigationAxis::DataSource), "Google Search");
}

#[test]
fn unconfirmed_selection_is_a_confirmation_timeout() {
    let d = ReplayDriver::new(DashboardFixture {
        faults: Faults { stuck_axes: vec![NavigationAxis::Granularity], ..Faults::default() },
        ..dashboard(vec![])
    });
    let nav = Navigator::new(&d, timeouts());
    let s0 = nav.observe().unwrap();

    let err = nav.set_granularity(&s0, Granularity::Monthly).unwrap_err();
    assert_eq!(
        err,
        ScrapeError::ConfirmationTimeout { axis: NavigationAxis::Granularity, label: "Monthly".into() }
    );
    assert_eq!(s0.get(NavigationAxis::Granularity), "Weekly");

    // Other axes still work.
    let s1 = nav.set_view_mode(&s0, "List View").unwrap();
    assert_eq!(s1.get(NavigationAxis::Granularity), "Weekly");
}

#[test]
fn stale_state_cannot_find_its_trigger() {
    let d = driver(vec![]);
    let nav = Navigator::new(&d, timeouts());
    let stale = NavigationState::new("Youtube", "Chart View", "Weekly");

    let err = nav.set_data_source(&stale, "Tiktok").unwrap_err();
    assert!(matches!(err, ScrapeError::ControlNotFound { .. }), "{err:?}");
}
