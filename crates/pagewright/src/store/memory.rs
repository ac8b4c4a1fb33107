use std::collections::HashMap;

use super::{ConfigStore, TestDataSet, END_VALUE_FIELD, OBJECT_TYPE_FIELD, START_VALUE_FIELD};
use crate::locator::{LocatorDescriptor, LocatorType};
use crate::result::{PagewrightError, PagewrightResult};

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct StaticStore {
    locators: HashMap<String, LocatorDescriptor>,
    data_sets: Vec<TestDataSet>,
}

impl StaticStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locator record
    #[must_use]
    pub fn with_locator(mut self, name: impl Into<String>, descriptor: LocatorDescriptor) -> Self {
        self.insert_locator(name, descriptor);
        self
    }

    /// Add a data set
    #[must_use]
    pub fn with_data_set(mut self, data_set: TestDataSet) -> Self {
        self.data_sets.push(data_set);
        self
    }

    /// Add or replace a locator record
    pub fn insert_locator(&mut self, name: impl Into<String>, descriptor: LocatorDescriptor) {
        let _ = self.locators.insert(name.into(), descriptor);
    }

    /// Number of locator records
    #[must_use]
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Whether the store holds no locators
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    /// Built-in locators and data sets for the bundled demo page
    /// (`testdata/demopage.html`).
    #[must_use]
    pub fn demo_page() -> Self {
        use LocatorType::{CssSelector, Id, LinkText, TagName};

        let progress = |hook: &str, start: &str, end: &str| {
            LocatorDescriptor::new(Id, hook)
                .with_field(START_VALUE_FIELD, start)
                .with_field(END_VALUE_FIELD, end)
        };
        let radio = |value: &str, selected: bool| {
            LocatorDescriptor::new(CssSelector, format!("input[value='{value}']"))
                .with_field("is_displayed", true)
                .with_field("is_enabled", true)
                .with_field("is_selected", selected)
        };

        Self::new()
            .with_locator(
                "text_input_field",
                LocatorDescriptor::new(Id, "textInput").with_clear_required(true),
            )
            .with_locator(
                "pre_filled_text_field",
                LocatorDescriptor::new(Id, "prefilledInput"),
            )
            .with_locator(
                "placeholder_text_field",
                LocatorDescriptor::new(Id, "placeholderInput").with_clear_required(true),
            )
            .with_locator(
                "text_area",
                LocatorDescriptor::new(Id, "textArea").with_clear_required(true),
            )
            .with_locator("read_only_text_field", LocatorDescriptor::new(Id, "readOnlyField"))
            .with_locator("button", LocatorDescriptor::new(Id, "colorButton"))
            .with_locator("paragraph_with_text", LocatorDescriptor::new(Id, "paragraph"))
            .with_locator("dynamic_subhead", LocatorDescriptor::new(Id, "dynamicSubhead"))
            .with_locator(
                "hover_dropdown",
                LocatorDescriptor::new(CssSelector, ".hover-dropdown"),
            )
            .with_locator(
                "hover_option_text",
                LocatorDescriptor::new(LinkText, "Selenium"),
            )
            .with_locator(
                "select_dropdown",
                progress("meterSelect", "Level 25", "Level 100")
                    .with_field(OBJECT_TYPE_FIELD, "dropdown"),
            )
            .with_locator("meter_bar", progress("meterBar", "25", "100"))
            .with_locator("meter_label", progress("meterLabel", "25", "100"))
            .with_locator("progress_bar", progress("progressBar", "0", "100"))
            .with_locator("progress_label", progress("progressLabel", "0", "100"))
            .with_locator(
                "input_slider_control",
                LocatorDescriptor::new(Id, "slider")
                    .with_field(OBJECT_TYPE_FIELD, "slider")
                    .with_field("x_offset", 150)
                    .with_field("y_offset", 0),
            )
            .with_locator("checkbox", LocatorDescriptor::new(Id, "showDragDrop"))
            .with_locator("draggable_item", LocatorDescriptor::new(Id, "draggable"))
            .with_locator("dropzone_1", LocatorDescriptor::new(Id, "dropzone1"))
            .with_locator("dropzone_2", LocatorDescriptor::new(Id, "dropzone2"))
            .with_locator(
                "iframe2",
                LocatorDescriptor::new(TagName, "body")
                    .with_field("iframe_name", "iframe2")
                    .with_field("iframe_expected_text", "Hello from iframe 2"),
            )
            .with_locator(
                "iframe3",
                LocatorDescriptor::new(Id, "iframeCheckbox").with_field("iframe_name", "iframe3"),
            )
            .with_locator(
                "html_svg_rect",
                LocatorDescriptor::new(Id, "svgRect").with_field("max_width_px", "200px"),
            )
            .with_locator("radio_button1", radio("radio1", true))
            .with_locator("radio_button2", radio("radio2", false))
            .with_data_set(TestDataSet::new("Blue", "Blue", " and Blue", false))
            .with_data_set(TestDataSet::new("Red", "Red", " and Red", true))
            .with_data_set(TestDataSet::new("Green", "Green", " and Green", true))
    }
}

impl ConfigStore for StaticStore {
    fn locator(&self, name: &str) -> PagewrightResult<LocatorDescriptor> {
        self.locators
            .get(name)
            .cloned()
            .ok_or_else(|| PagewrightError::not_found(name))
    }

    fn test_data_sets(&self) -> PagewrightResult<Vec<TestDataSet>> {
        Ok(self.data_sets.clone())
    }

    fn locator_names(&self) -> PagewrightResult<Vec<String>> {
        let mut names: Vec<String> = self.locators.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use std::path::Path;

    #[test]
    fn test_empty_store() {
        let store = StaticStore::new();
        assert!(store.is_empty());
        assert!(store.locator("button").is_err());
        assert!(store.test_data_sets().unwrap().is_empty());
    }

    #[test]
    fn test_demo_page_is_complete() {
        let store = StaticStore::demo_page();
        assert_eq!(store.len(), 25);
        assert_eq!(store.test_data_sets().unwrap().len(), 3);
        assert!(store.locator("text_input_field").unwrap().clear_required);
        assert!(!store.locator("pre_filled_text_field").unwrap().clear_required);
        assert_eq!(
            store.expectation("input_slider_control").ok(),
            None,
            "slider record carries no before/after values"
        );
    }

    #[test]
    fn test_demo_page_matches_bundled_suite_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/demopage_data.json");
        let file = FileStore::open(path).unwrap();
        let memory = StaticStore::demo_page();
        assert_eq!(memory.locator_names().unwrap(), file.locator_names().unwrap());
        for name in memory.locator_names().unwrap() {
            assert_eq!(memory.locator(&name).unwrap(), file.locator(&name).unwrap(), "{name}");
        }
        assert_eq!(
            memory.test_data_sets().unwrap(),
            file.test_data_sets().unwrap()
        );
    }
}
