//! Suite configuration: page URL, debug flag, data sets and locators.
//!
//! A suite file looks like:
//!
//! ```json
//! {
//!   "debug_showcase": false,
//!   "demopage_url": "http://localhost:8000/demopage.html",
//!   "testcase_name": "test_color_change_demo",
//!   "data_sets": [{"color": "Red", "text_input": "Red", "pre_filled_input": " and Red", "color_to_change": true}],
//!   "locators": {"button": {"locator_type": "ID", "locator_hook": "colorButton"}}
//! }
//! ```
//!
//! `.yaml`/`.yml` files carry the same fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::locator::LocatorDescriptor;
use crate::result::{PagewrightError, PagewrightResult};
use crate::store::TestDataSet;

/// On-disk format of a suite file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl SuiteFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> PagewrightResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(PagewrightError::invalid_config(format!(
                "unsupported suite file extension: {}",
                path.display()
            ))),
        }
    }
}

/// Suite configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Slow scenarios down and log verbosely for demonstrations
    #[serde(default)]
    pub debug_showcase: bool,
    /// Append suite logs to `logfile.log` in the working directory
    #[serde(default)]
    pub log_to_file: bool,
    /// URL of the page under test
    #[serde(default)]
    pub demopage_url: String,
    /// Local copy of the page; preferred over `demopage_url` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_demo_page: Option<PathBuf>,
    /// Name of the parameterized scenario the data sets feed
    #[serde(default)]
    pub testcase_name: String,
    /// Parameter sets
    #[serde(default)]
    pub data_sets: Vec<TestDataSet>,
    /// Named locator records
    #[serde(default)]
    pub locators: BTreeMap<String, LocatorDescriptor>,
}

impl SuiteConfig {
    /// Load a suite file (JSON or YAML by extension)
    pub fn load(path: impl AsRef<Path>) -> PagewrightResult<Self> {
        let path = path.as_ref();
        let format = SuiteFormat::from_path(path)?;
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw, format)
    }

    /// Parse suite text in the given format
    pub fn parse(raw: &str, format: SuiteFormat) -> PagewrightResult<Self> {
        let config = match format {
            SuiteFormat::Json => serde_json::from_str(raw)?,
            SuiteFormat::Yaml => serde_yaml_ng::from_str(raw)?,
        };
        Ok(config)
    }

    /// Write the suite file (JSON or YAML by extension)
    pub fn save(&self, path: impl AsRef<Path>) -> PagewrightResult<()> {
        let path = path.as_ref();
        let raw = match SuiteFormat::from_path(path)? {
            SuiteFormat::Json => serde_json::to_string_pretty(self)?,
            SuiteFormat::Yaml => serde_yaml_ng::to_string(self)?,
        };
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// URL the page object navigates to
    pub fn page_url(&self) -> PagewrightResult<String> {
        if let Some(ref local) = self.local_demo_page {
            let absolute = std::fs::canonicalize(local)?;
            return Ok(format!("file://{}", absolute.display()));
        }
        if self.demopage_url.is_empty() {
            return Err(PagewrightError::invalid_config(
                "neither demopage_url nor local_demo_page is set",
            ));
        }
        Ok(self.demopage_url.clone())
    }
}

/// Environment variable overriding [`DriverConfig::headless`]
pub const HEADLESS_ENV: &str = "PAGEWRIGHT_HEADLESS";
/// Environment variable overriding [`DriverConfig::chromium_path`]
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

/// Browser session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// How long `find_element` keeps polling before giving up
    pub implicit_wait: Duration,
    /// Bound for script evaluation
    pub script_timeout: Duration,
    /// Bound for navigation
    pub navigation_timeout: Duration,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chromium_path: None,
            implicit_wait: Duration::from_secs(5),
            script_timeout: Duration::from_secs(2),
            navigation_timeout: Duration::from_secs(30),
            sandbox: true,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `PAGEWRIGHT_HEADLESS` and `CHROMIUM_PATH`
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(HEADLESS_ENV) {
            config.headless = !matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Ok(path) = std::env::var(CHROMIUM_PATH_ENV) {
            if !path.trim().is_empty() {
                config.chromium_path = Some(path);
            }
        }
        config
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set the implicit element wait
    #[must_use]
    pub const fn implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    /// Set the script timeout
    #[must_use]
    pub const fn script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}
