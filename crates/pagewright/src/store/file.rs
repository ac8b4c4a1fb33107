use std::path::Path;

use tracing::info;

use super::{ConfigStore, TestDataSet};
use crate::config::SuiteConfig;
use crate::locator::LocatorDescriptor;
use crate::result::{PagewrightError, PagewrightResult};

/// Store backed by a JSON or YAML suite file
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    config: SuiteConfig,
}

impl FileStore {
    /// Open a suite file
    pub fn open(path: impl AsRef<Path>) -> PagewrightResult<Self> {
        let path = path.as_ref();
        let config = SuiteConfig::load(path)?;
        info!(
            path = %path.display(),
            locators = config.locators.len(),
            data_sets = config.data_sets.len(),
            "opened suite file"
        );
        Ok(Self { config })
    }

    /// Wrap an already-loaded configuration
    #[must_use]
    pub const fn from_config(config: SuiteConfig) -> Self {
        Self { config }
    }

    /// The underlying suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Add or replace a locator record
    pub fn insert_locator(&mut self, name: impl Into<String>, descriptor: LocatorDescriptor) {
        let _ = self.config.locators.insert(name.into(), descriptor);
    }

    /// Append a data set
    pub fn push_data_set(&mut self, data_set: TestDataSet) {
        self.config.data_sets.push(data_set);
    }

    /// Write the store back to disk
    pub fn save(&self, path: impl AsRef<Path>) -> PagewrightResult<()> {
        self.config.save(path)
    }
}

impl ConfigStore for FileStore {
    fn locator(&self, name: &str) -> PagewrightResult<LocatorDescriptor> {
        self.config
            .locators
            .get(name)
            .cloned()
            .ok_or_else(|| PagewrightError::not_found(name))
    }

    fn test_data_sets(&self) -> PagewrightResult<Vec<TestDataSet>> {
        Ok(self.config.data_sets.clone())
    }

    fn locator_names(&self) -> PagewrightResult<Vec<String>> {
        Ok(self.config.locators.keys().cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::LocatorType;

    #[test]
    fn test_open_missing_file_is_io_error() {
        let err = FileStore::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PagewrightError::Io(_)));
    }

    #[test]
    fn test_from_config_lookup() {
        let mut store = FileStore::default();
        store.insert_locator("button", LocatorDescriptor::new(LocatorType::Id, "colorButton"));
        assert_eq!(store.locator("button").unwrap().locator_hook, "colorButton");
        assert_eq!(store.locator_names().unwrap(), vec!["button".to_string()]);
    }

    #[test]
    fn test_bundled_suite_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/demopage_data.json");
        let store = FileStore::open(path).unwrap();
        assert!(!store.test_data_sets().unwrap().is_empty());
        assert!(store.locator("hover_option_text").is_ok());
        assert!(store.expectation("progress_bar").is_ok());
    }
}
