//! Pagewright: page objects and verification routines for browser UI tests
//!
//! Tests drive a demo web page through a [`DemoPage`] page object. Element
//! locators are stored as named [`LocatorDescriptor`]s in a [`ConfigStore`],
//! so the page object contains no selectors of its own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   PAGEWRIGHT Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ WebDriver  │            │
//! │   │ Runner     │───►│ Object     │───►│ (mock or   │            │
//! │   │            │    │            │    │  chromium) │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │                           │                                      │
//! │                     ┌─────▼──────┐                               │
//! │                     │ Config     │  static / JSON+YAML / SQLite  │
//! │                     │ Store      │                               │
//! │                     └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagewright::prelude::*;
//!
//! let driver = MockDriver::with_page(demo_page());
//! let mut page = DemoPage::open(driver, StaticStore::demo_page(), "demo://page", false)?;
//! let result = scenarios::run(Scenario::RadioButtonSelection, &mut page)?;
//! assert!(result.passed, "{result}");
//! # Ok::<(), PagewrightError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Chromium backend (feature `browser`)
pub mod browser;

/// Suite and driver configuration
pub mod config;

/// Driver capability, element handles and the scripted mock backend
#[allow(clippy::module_name_repetitions)]
pub mod driver;

/// Scoped frame switching
pub mod frame;

/// Locator descriptors and selector resolution
pub mod locator;

/// Subscriber setup
pub mod logging;

/// Page Object Model for the demo page
pub mod page_object;

mod result;

/// End-to-end demo page scenarios
pub mod scenarios;

/// Locator and test data stores
pub mod store;

/// Verification routines
pub mod verify;

/// Wait mechanisms
pub mod wait;

#[cfg(feature = "browser")]
pub use browser::CdpDriver;
pub use config::{DriverConfig, SuiteConfig, SuiteFormat};
pub use driver::{demo_page, ElementHandle, MockDriver, MockElement, MockPage, WebDriver};
pub use frame::{within_frame, FrameScope};
pub use locator::{resolve, BoundingBox, LocatorDescriptor, LocatorType, Point, Selector};
pub use logging::LogConfig;
pub use page_object::{parse_label_value, DemoPage, PageObject};
pub use result::{PagewrightError, PagewrightResult};
pub use scenarios::{Scenario, ScenarioOutcome};
pub use store::{
    ConfigStore, FileStore, SqliteStore, StaticStore, TestDataSet, WidgetExpectation,
};
pub use verify::{
    compare_widget_state, verify_composite_widget_state, verify_draggable_position, StateValue,
    VerificationResult, MARGIN_TOLERANCE,
};
pub use wait::{ElementCondition, WaitOptions, WaitResult, Waiter};

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::browser::CdpDriver;
    pub use super::config::*;
    pub use super::driver::{
        demo_page, ElementHandle, MockDriver, MockElement, MockPage, WebDriver,
    };
    pub use super::frame::*;
    pub use super::locator::*;
    pub use super::logging::LogConfig;
    pub use super::page_object::*;
    pub use super::result::*;
    pub use super::scenarios::{self, Scenario, ScenarioOutcome};
    pub use super::state;
    pub use super::store::*;
    pub use super::verify::*;
    pub use super::wait::*;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::prelude::*;

    mod prelude_tests {
        use super::*;

        #[test]
        fn test_prelude_reaches_the_demo_suite() {
            let driver = MockDriver::with_page(demo_page());
            let mut page =
                DemoPage::open(driver, StaticStore::demo_page(), "demo://page", false).unwrap();
            let outcomes = scenarios::run_suite(&mut page).unwrap();
            assert!(outcomes.iter().all(|o| o.result.passed), "{outcomes:?}");
        }

        #[test]
        fn test_scenario_runners_live_under_their_module() {
            let driver = crate::MockDriver::with_page(crate::demo_page());
            let mut page =
                crate::DemoPage::open(driver, crate::StaticStore::demo_page(), "demo://page", false)
                    .unwrap();
            let result =
                crate::scenarios::run(crate::Scenario::RadioButtonSelection, &mut page).unwrap();
            assert!(result.passed, "{result}");
        }

        #[test]
        fn test_state_macro_is_exported() {
            let values = state!["Level 25", true];
            assert_eq!(
                values,
                vec![StateValue::Text("Level 25".into()), StateValue::Flag(true)]
            );
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_element_not_found_display() {
            let err = PagewrightError::ElementNotFound {
                selector: "id=\"colorButton\"".to_string(),
            };
            assert!(err.to_string().contains("colorButton"));
        }
    }
}
