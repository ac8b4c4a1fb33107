//! Verification routines.
//!
//! Every routine returns a [`VerificationResult`]: a pass/fail flag plus a
//! message carrying the detected and expected values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locator::BoundingBox;

/// Horizontal distance from a zone's left edge within which a dropped item
/// counts as inside the zone
pub const MARGIN_TOLERANCE: i64 = 10;

/// Outcome of a verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the check held
    pub passed: bool,
    /// Detected vs expected values
    pub message: String,
}

impl VerificationResult {
    /// Passing result
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    /// Failing result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Result from a flag and a message
    #[must_use]
    pub fn from_check(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{verdict}] {}", self.message)
    }
}

/// Pass iff `zone.x <= item_x < zone.x + MARGIN_TOLERANCE`
#[must_use]
pub fn verify_draggable_position(item_x: i64, zone: &BoundingBox) -> VerificationResult {
    let (low, high) = (zone.x, zone.x + MARGIN_TOLERANCE);
    if (low..high).contains(&item_x) {
        VerificationResult::pass(format!(
            "Draggable item at x={item_x} in expected range: [{low}, {high})"
        ))
    } else {
        VerificationResult::fail(format!(
            "Draggable item at x={item_x} not in the expected range: [{low}, {high})"
        ))
    }
}

/// One component of a composite widget state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Text read from the page (label, bar value, option)
    Text(String),
    /// Flag read from the page (displayed, enabled, selected)
    Flag(bool),
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Build a `Vec<StateValue>` from mixed strings and booleans
#[macro_export]
macro_rules! state {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::verify::StateValue::from($value)),*]
    };
}

/// Structural equality over ordered widget state, no fuzzy matching
#[must_use]
pub fn verify_composite_widget_state(detected: &[StateValue], expected: &[StateValue]) -> bool {
    detected == expected
}

/// [`verify_composite_widget_state`] with a descriptive message
#[must_use]
pub fn compare_widget_state(
    widget: &str,
    detected: &[StateValue],
    expected: &[StateValue],
) -> VerificationResult {
    VerificationResult::from_check(
        verify_composite_widget_state(detected, expected),
        format!(
            "{widget}: detected value: {}, expecting value: {}",
            render(detected),
            render(expected)
        ),
    )
}

fn render(values: &[StateValue]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod draggable_tests {
        use super::*;

        fn zone() -> BoundingBox {
            BoundingBox::new(300, 600, 60, 60)
        }

        #[test]
        fn test_left_edge_passes() {
            assert!(verify_draggable_position(300, &zone()).passed);
        }

        #[test]
        fn test_last_point_inside_tolerance_passes() {
            assert!(verify_draggable_position(309, &zone()).passed);
        }

        #[test]
        fn test_tolerance_edge_fails() {
            let result = verify_draggable_position(310, &zone());
            assert!(!result.passed);
            assert!(result.message.contains("[300, 310)"));
        }

        #[test]
        fn test_left_of_zone_fails() {
            assert!(!verify_draggable_position(299, &zone()).passed);
        }

        #[test]
        fn test_zone_width_does_not_widen_range() {
            assert!(!verify_draggable_position(330, &zone()).passed);
        }

        #[test]
        fn test_message_carries_position() {
            let result = verify_draggable_position(305, &zone());
            assert_eq!(
                result.message,
                "Draggable item at x=305 in expected range: [300, 310)"
            );
        }
    }

    mod composite_state_tests {
        use super::*;

        #[test]
        fn test_radio_flags() {
            let detected = state![true, true, false];
            assert!(verify_composite_widget_state(&detected, &state![true, true, false]));
            assert!(!verify_composite_widget_state(&detected, &state![true, true, true]));
        }

        #[test]
        fn test_meter_values() {
            let detected = state!["Level 100", "100", "100"];
            assert!(verify_composite_widget_state(
                &detected,
                &state!["Level 100", "100", "100"]
            ));
        }

        #[test]
        fn test_no_fuzzy_matching() {
            assert!(!verify_composite_widget_state(&state!["100"], &state!["100 "]));
            assert!(!verify_composite_widget_state(&state!["true"], &state![true]));
            assert!(!verify_composite_widget_state(&state!["0"], &state!["0", "0"]));
        }

        #[test]
        fn test_compare_message() {
            let result = compare_widget_state("slider", &state!["0", "0"], &state!["100", "100"]);
            assert!(!result.passed);
            assert_eq!(
                result.message,
                r#"slider: detected value: ("0", "0"), expecting value: ("100", "100")"#
            );
        }

        #[test]
        fn test_display() {
            assert_eq!(VerificationResult::pass("ok").to_string(), "[PASS] ok");
            assert_eq!(VerificationResult::fail("no").to_string(), "[FAIL] no");
        }
    }

    mod property_tests {
        use super::*;

        proptest! {
            #[test]
            fn prop_half_open_tolerance(zone_x in -10_000i64..10_000, offset in -50i64..50) {
                let zone = BoundingBox::new(zone_x, 0, 40, 40);
                let result = verify_draggable_position(zone_x + offset, &zone);
                prop_assert_eq!(result.passed, (0..MARGIN_TOLERANCE).contains(&offset));
            }

            #[test]
            fn prop_state_equal_to_itself(values in proptest::collection::vec(any::<bool>(), 0..6)) {
                let state: Vec<StateValue> = values.into_iter().map(StateValue::from).collect();
                prop_assert!(verify_composite_widget_state(&state, &state));
            }
        }
    }
}
