//! Bounded polling waits.
//!
//! Every wait polls a condition until it holds or the timeout elapses, then
//! fails with [`PagewrightError::Timeout`]. Nothing here blocks indefinitely.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::driver::{ElementHandle, WebDriver};
use crate::locator::Selector;
use crate::result::{PagewrightError, PagewrightResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Bound for the draggable item to become visible
pub const DRAG_VISIBILITY_TIMEOUT_MS: u64 = 3_000;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options bounded by a [`Duration`]
    #[must_use]
    pub fn within(timeout: Duration) -> Self {
        Self::default().with_timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a satisfied wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

// =============================================================================
// ELEMENT CONDITIONS
// =============================================================================

/// State an element must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCondition {
    /// Present in the current document
    Located,
    /// Present and displayed
    Visible,
    /// Present, displayed and enabled
    Clickable,
}

impl ElementCondition {
    fn describe(self, selector: &Selector) -> String {
        match self {
            Self::Located => format!("{selector} to be located"),
            Self::Visible => format!("{selector} to be visible"),
            Self::Clickable => format!("{selector} to be clickable"),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls conditions within a bound
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Options this waiter polls with
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `check` until it yields `Some`.
    ///
    /// The check always runs at least once, even with a zero timeout. Errors
    /// returned by `check` end the wait immediately.
    pub fn until<T, F>(&self, waited_for: &str, mut check: F) -> PagewrightResult<(T, WaitResult)>
    where
        F: FnMut() -> PagewrightResult<Option<T>>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        loop {
            if let Some(value) = check()? {
                let result = WaitResult {
                    elapsed: start.elapsed(),
                    waited_for: waited_for.to_string(),
                };
                return Ok((value, result));
            }
            if start.elapsed() >= timeout {
                debug!(waited_for, timeout_ms = self.options.timeout_ms, "wait timed out");
                return Err(PagewrightError::Timeout {
                    ms: self.options.timeout_ms,
                    waited_for: waited_for.to_string(),
                });
            }
            std::thread::sleep(self.options.poll_interval().min(timeout));
        }
    }

    /// Wait for a predicate to return true
    pub fn wait_for_function<F>(&self, waited_for: &str, mut predicate: F) -> PagewrightResult<WaitResult>
    where
        F: FnMut() -> bool,
    {
        self.until(waited_for, || Ok(predicate().then_some(())))
            .map(|((), result)| result)
    }

    /// Wait for the element behind `selector` to reach `condition`
    pub fn wait_for_element<D: WebDriver + ?Sized>(
        &self,
        driver: &mut D,
        selector: &Selector,
        condition: ElementCondition,
    ) -> PagewrightResult<ElementHandle> {
        let waited_for = condition.describe(selector);
        let (handle, _) = self.until(&waited_for, || {
            let Some(handle) = driver.try_find(selector)? else {
                return Ok(None);
            };
            let ready = match condition {
                ElementCondition::Located => true,
                ElementCondition::Visible => driver.is_displayed(&handle)?,
                ElementCondition::Clickable => {
                    driver.is_displayed(&handle)? && driver.is_enabled(&handle)?
                }
            };
            Ok(ready.then_some(handle))
        })?;
        Ok(handle)
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Wait for a predicate with default polling
pub fn wait_until<F>(predicate: F, timeout_ms: u64) -> PagewrightResult<()>
where
    F: FnMut() -> bool,
{
    Waiter::with_options(WaitOptions::new().with_timeout(timeout_ms))
        .wait_for_function("condition", predicate)?;
    Ok(())
}

/// Wait for an element to be displayed
pub fn wait_for_visible<D: WebDriver + ?Sized>(
    driver: &mut D,
    selector: &Selector,
    timeout_ms: u64,
) -> PagewrightResult<ElementHandle> {
    Waiter::with_options(WaitOptions::new().with_timeout(timeout_ms)).wait_for_element(
        driver,
        selector,
        ElementCondition::Visible,
    )
}
