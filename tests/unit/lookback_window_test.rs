use chrono::{Duration, TimeZone, Utc};

use stoutly_dashboard::donations::LookbackWindow;

#[test]
fn test_all_selectors_parse() {
    assert_eq!("24h".parse::<LookbackWindow>().unwrap(), LookbackWindow::Day);
    assert_eq!("7d".parse::<LookbackWindow>().unwrap(), LookbackWindow::Week);
    assert_eq!("30d".parse::<LookbackWindow>().unwrap(), LookbackWindow::Month);
    assert_eq!("1y".parse::<LookbackWindow>().unwrap(), LookbackWindow::Year);
    assert_eq!("all".parse::<LookbackWindow>().unwrap(), LookbackWindow::All);
}

#[test]
fn test_unknown_selectors_are_rejected() {
    for raw in ["", "2d", "1w", "ALL", "24H", "yesterday"] {
        assert!(raw.parse::<LookbackWindow>().is_err(), "accepted {:?}", raw);
    }
}

#[test]
fn test_window_start_is_now_minus_duration() {
    let now = Utc.with_ymd_and_hms(2025, 3, 17, 12, 0, 0).unwrap();

    assert_eq!(
        LookbackWindow::Day.start_after(now),
        Some(now - Duration::hours(24))
    );
    assert_eq!(
        LookbackWindow::Week.start_after(now),
        Some(now - Duration::days(7))
    );
    assert_eq!(
        LookbackWindow::Month.start_after(now),
        Some(now - Duration::days(30))
    );
    assert_eq!(
        LookbackWindow::Year.start_after(now),
        Some(now - Duration::days(365))
    );
}

#[test]
fn test_all_time_has_no_lower_bound() {
    assert_eq!(LookbackWindow::All.start_after(Utc::now()), None);
}

#[test]
fn test_selector_round_trip() {
    for window in [
        LookbackWindow::Day,
        LookbackWindow::Week,
        LookbackWindow::Month,
        LookbackWindow::Year,
        LookbackWindow::All,
    ] {
        assert_eq!(window.as_str().parse::<LookbackWindow>().unwrap(), window);
    }
}
