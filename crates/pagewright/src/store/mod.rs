//! Config/locator stores.
//!
//! Page objects never read files or tables themselves: they ask a
//! [`ConfigStore`] for named [`LocatorDescriptor`]s, [`WidgetExpectation`]s and
//! [`TestDataSet`]s. Three backends implement the capability:
//!
//! - [`StaticStore`]: in-memory map, including the built-in demo page set
//! - [`FileStore`]: a JSON or YAML suite file
//! - [`SqliteStore`]: a table keyed by a filter column
//!
//! Every backend fails an unknown name with
//! [`PagewrightError::ConfigEntryNotFound`].

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::StaticStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::locator::LocatorDescriptor;
use crate::result::{PagewrightError, PagewrightResult};

/// Field holding a widget's value before the interaction
pub const START_VALUE_FIELD: &str = "start_progress_value";
/// Field holding a widget's value after the interaction
pub const END_VALUE_FIELD: &str = "end_progress_value";
/// Field naming the widget kind (`slider`, `dropdown`, ...)
pub const OBJECT_TYPE_FIELD: &str = "object_type";

/// Before/after states for sliders, meters and dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetExpectation {
    /// Value expected before the interaction
    pub start_value: String,
    /// Value expected after the interaction
    pub end_value: String,
    /// Widget kind, when the record names one
    pub object_type: Option<String>,
}

impl WidgetExpectation {
    /// Read the expectation fields carried by a locator record
    pub fn from_descriptor(name: &str, descriptor: &LocatorDescriptor) -> PagewrightResult<Self> {
        let field = |key: &str| {
            descriptor
                .str_field(key)
                .map_err(|_| PagewrightError::not_found(format!("{name}.{key}")))
        };
        Ok(Self {
            start_value: field(START_VALUE_FIELD)?,
            end_value: field(END_VALUE_FIELD)?,
            object_type: descriptor.str_field(OBJECT_TYPE_FIELD).ok(),
        })
    }
}

/// One parameter set for the color change scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDataSet {
    /// Color the page should end up showing
    pub color: String,
    /// Prefix typed into the text input
    pub text_input: String,
    /// Text appended to the pre-filled field
    pub pre_filled_input: String,
    /// Whether the placeholder field announces a color change
    pub color_to_change: bool,
}

impl TestDataSet {
    /// Create a data set
    #[must_use]
    pub fn new(
        color: impl Into<String>,
        text_input: impl Into<String>,
        pre_filled_input: impl Into<String>,
        color_to_change: bool,
    ) -> Self {
        Self {
            color: color.into(),
            text_input: text_input.into(),
            pre_filled_input: pre_filled_input.into(),
            color_to_change,
        }
    }
}

/// Source of locator descriptors, widget expectations and test data.
///
/// Stores are opened once and read-only afterwards, so a single store can
/// back any number of page objects.
pub trait ConfigStore {
    /// Look up a locator descriptor by name
    fn locator(&self, name: &str) -> PagewrightResult<LocatorDescriptor>;

    /// Look up the before/after expectation attached to a named record
    fn expectation(&self, name: &str) -> PagewrightResult<WidgetExpectation> {
        let descriptor = self.locator(name)?;
        WidgetExpectation::from_descriptor(name, &descriptor)
    }

    /// All data sets for parameterized scenarios
    fn test_data_sets(&self) -> PagewrightResult<Vec<TestDataSet>>;

    /// Names of every locator in the store
    fn locator_names(&self) -> PagewrightResult<Vec<String>>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn locator(&self, name: &str) -> PagewrightResult<LocatorDescriptor> {
        (**self).locator(name)
    }

    fn expectation(&self, name: &str) -> PagewrightResult<WidgetExpectation> {
        (**self).expectation(name)
    }

    fn test_data_sets(&self) -> PagewrightResult<Vec<TestDataSet>> {
        (**self).test_data_sets()
    }

    fn locator_names(&self) -> PagewrightResult<Vec<String>> {
        (**self).locator_names()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Arc<S> {
    fn locator(&self, name: &str) -> PagewrightResult<LocatorDescriptor> {
        (**self).locator(name)
    }

    fn expectation(&self, name: &str) -> PagewrightResult<WidgetExpectation> {
        (**self).expectation(name)
    }

    fn test_data_sets(&self) -> PagewrightResult<Vec<TestDataSet>> {
        (**self).test_data_sets()
    }

    fn locator_names(&self) -> PagewrightResult<Vec<String>> {
        (**self).locator_names()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::LocatorType;
    use tempfile::TempDir;

    fn sample_descriptor() -> LocatorDescriptor {
        LocatorDescriptor::new(LocatorType::CssSelector, "#meter")
            .with_clear_required(true)
            .with_field(START_VALUE_FIELD, "25")
            .with_field(END_VALUE_FIELD, "100")
            .with_field(OBJECT_TYPE_FIELD, "dropdown")
            .with_field("x_offset", 12)
            .with_field("is_selected", false)
    }

    fn backends(dir: &TempDir) -> Vec<(&'static str, Box<dyn ConfigStore>)> {
        let descriptor = sample_descriptor();
        let data_set = TestDataSet::new("Red", "Text", "more", true);

        let memory = StaticStore::new()
            .with_locator("meter", descriptor.clone())
            .with_data_set(data_set.clone());

        let json_path = dir.path().join("suite.json");
        let mut file = FileStore::default();
        file.insert_locator("meter", descriptor.clone());
        file.push_data_set(data_set.clone());
        file.save(&json_path).unwrap();

        let yaml_path = dir.path().join("suite.yaml");
        file.save(&yaml_path).unwrap();

        let sqlite = SqliteStore::open_memory().unwrap();
        sqlite.put_locator("meter", &descriptor).unwrap();
        sqlite.put_data_set(&data_set).unwrap();

        vec![
            ("memory", Box::new(memory)),
            ("json", Box::new(FileStore::open(&json_path).unwrap())),
            ("yaml", Box::new(FileStore::open(&yaml_path).unwrap())),
            ("sqlite", Box::new(sqlite)),
        ]
    }

    #[test]
    fn test_round_trip_through_every_backend() {
        let dir = TempDir::new().unwrap();
        for (label, store) in backends(&dir) {
            assert_eq!(store.locator("meter").unwrap(), sample_descriptor(), "{label}");
            assert_eq!(
                store.test_data_sets().unwrap(),
                vec![TestDataSet::new("Red", "Text", "more", true)],
                "{label}"
            );
        }
    }

    #[test]
    fn test_unknown_name_fails_for_every_backend() {
        let dir = TempDir::new().unwrap();
        for (label, store) in backends(&dir) {
            let err = store.locator("no_such_locator").unwrap_err();
            assert!(
                matches!(err, PagewrightError::ConfigEntryNotFound { ref name } if name == "no_such_locator"),
                "{label}: {err}"
            );
            assert!(store.expectation("no_such_locator").is_err(), "{label}");
        }
    }

    #[test]
    fn test_expectation_from_record() {
        let dir = TempDir::new().unwrap();
        for (label, store) in backends(&dir) {
            let expectation = store.expectation("meter").unwrap();
            assert_eq!(expectation.start_value, "25", "{label}");
            assert_eq!(expectation.end_value, "100", "{label}");
            assert_eq!(expectation.object_type.as_deref(), Some("dropdown"), "{label}");
        }
    }

    #[test]
    fn test_expectation_missing_fields() {
        let store = StaticStore::new()
            .with_locator("button", LocatorDescriptor::new(LocatorType::Id, "button"));
        let err = store.expectation("button").unwrap_err();
        assert!(
            matches!(err, PagewrightError::ConfigEntryNotFound { ref name } if name == "button.start_progress_value")
        );
    }

    #[test]
    fn test_store_shared_through_arc() {
        let store = Arc::new(StaticStore::demo_page());
        let a = Arc::clone(&store);
        let b = Arc::clone(&store);
        assert_eq!(a.locator("button").unwrap(), b.locator("button").unwrap());
    }
}
