//! Result and error types for Pagewright.

use thiserror::Error;

/// Result type for Pagewright operations
pub type PagewrightResult<T> = Result<T, PagewrightError>;

/// Errors that can occur in Pagewright
#[derive(Debug, Error)]
pub enum PagewrightError {
    /// The driver could not locate a descriptor's target
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Element exists but cannot receive the interaction (hidden, detached)
    #[error("Element not interactable: {selector}")]
    ElementNotInteractable {
        /// Selector of the element
        selector: String,
    },

    /// Wait condition unmet within its bound
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the condition
        waited_for: String,
    },

    /// Named locator or expectation missing from a config store
    #[error("Config entry not found: {name}")]
    ConfigEntryNotFound {
        /// Entry name
        name: String,
    },

    /// Operation attempted outside a valid frame scope
    #[error("Frame context error: {message}")]
    FrameContext {
        /// Error message
        message: String,
    },

    /// Generic driver failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script execution failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Malformed configuration entry
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl PagewrightError {
    /// Create a config-entry-not-found error
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ConfigEntryNotFound { name: name.into() }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a frame context error
    #[must_use]
    pub fn frame(message: impl Into<String>) -> Self {
        Self::FrameContext {
            message: message.into(),
        }
    }

    /// Whether this error came from a bounded wait running out
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = PagewrightError::not_found("hover_dropdown");
        assert_eq!(err.to_string(), "Config entry not found: hover_dropdown");
    }

    #[test]
    fn test_timeout_display_and_predicate() {
        let err = PagewrightError::Timeout {
            ms: 3000,
            waited_for: "visibility of #draggable".to_string(),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("3000ms"));
        assert!(err.to_string().contains("#draggable"));
        assert!(!PagewrightError::driver("boom").is_timeout());
    }

    #[test]
    fn test_json_conversion() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: PagewrightError = bad.unwrap_err().into();
        assert!(matches!(err, PagewrightError::Json(_)));
    }
}
