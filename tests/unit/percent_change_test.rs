use proptest::prelude::*;

use stoutly_dashboard::analytics::services::shaper::percent_change;

/// Property-based tests for the period-over-period change rule
///
/// Validates:
/// - both periods zero means no movement (0)
/// - growth from a zero baseline reads as +100
/// - everywhere else the closed form ((current-previous)/previous)*100 holds

#[test]
fn test_both_zero_is_no_change() {
    assert_eq!(percent_change(0.0, 0.0), 0.0);
}

#[test]
fn test_growth_from_zero_baseline_is_plus_hundred() {
    assert_eq!(percent_change(1.0, 0.0), 100.0);
    assert_eq!(percent_change(12345.0, 0.0), 100.0);
}

#[test]
fn test_known_values() {
    assert_eq!(percent_change(10.0, 5.0), 100.0);
    assert_eq!(percent_change(5.0, 10.0), -50.0);
    assert_eq!(percent_change(7.0, 7.0), 0.0);
}

proptest! {
    #[test]
    fn test_matches_closed_form_for_nonzero_previous(
        current in 0.0f64..1_000_000.0,
        previous in 0.1f64..1_000_000.0
    ) {
        let expected = ((current - previous) / previous) * 100.0;
        let actual = percent_change(current, previous);
        prop_assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn test_equal_periods_have_zero_change(value in 0.1f64..1_000_000.0) {
        prop_assert!(percent_change(value, value).abs() < 1e-9);
    }

    #[test]
    fn test_zero_previous_never_divides(current in 0.0f64..1_000_000.0) {
        let change = percent_change(current, 0.0);
        prop_assert!(change.is_finite());
        prop_assert!(change == 0.0 || change == 100.0);
    }
}
