//! Driver boundary: the capability page objects use to talk to a browser.
//!
//! # Implementations
//!
//! - [`MockDriver`]: scripted in-memory page with call history
//! - `CdpDriver` (feature `browser`): Chromium over the `DevTools` protocol
//!
//! The trait is blocking. One driver session backs one page object; the
//! session is passed in at construction and never shared globally.

mod demo_page;
mod mock;

pub use demo_page::demo_page;
pub use mock::{MockDriver, MockElement, MockPage, PageEffect};

use serde_json::Value;
use std::time::Duration;

use crate::locator::{BoundingBox, Point, Selector};
use crate::result::{PagewrightError, PagewrightResult};
use crate::wait::{WaitOptions, Waiter};

/// Handle to a located element.
///
/// Only valid in the document (top level or named frame) it was found in,
/// and not across navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Driver-assigned identifier
    pub id: String,
    /// Selector the element was found with
    pub selector: Selector,
    /// Frame the element lives in (`None` = top-level document)
    pub frame: Option<String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, selector: Selector, frame: Option<String>) -> Self {
        Self {
            id: id.into(),
            selector,
            frame,
        }
    }
}

/// Browser automation capability.
///
/// Element operations take a handle obtained from [`WebDriver::find_element`]
/// in the current frame context. Using a handle from another context fails
/// with [`PagewrightError::FrameContext`].
pub trait WebDriver {
    /// How long [`WebDriver::find_element`] polls before failing
    fn implicit_wait(&self) -> Duration;

    /// Load a URL in the session's page
    fn navigate(&mut self, url: &str) -> PagewrightResult<()>;

    /// Grow the window to the screen size
    fn maximize_window(&mut self) -> PagewrightResult<()>;

    /// URL of the loaded page
    fn current_url(&mut self) -> PagewrightResult<String>;

    /// Single, non-waiting lookup in the current frame context
    fn try_find(&mut self, selector: &Selector) -> PagewrightResult<Option<ElementHandle>>;

    /// Locate an element, polling up to the implicit wait
    fn find_element(&mut self, selector: &Selector) -> PagewrightResult<ElementHandle> {
        let options = WaitOptions::within(self.implicit_wait());
        let waited_for = selector.to_string();
        match Waiter::with_options(options).until(&waited_for, || self.try_find(selector)) {
            Ok((handle, _)) => Ok(handle),
            Err(err) if err.is_timeout() => Err(PagewrightError::ElementNotFound {
                selector: waited_for,
            }),
            Err(err) => Err(err),
        }
    }

    /// Enter a named child frame of the current document
    fn switch_to_frame(&mut self, name: &str) -> PagewrightResult<()>;

    /// Return to the top-level document
    fn switch_to_default_content(&mut self) -> PagewrightResult<()>;

    /// Name of the frame operations currently target (`None` = top level)
    fn current_frame(&self) -> Option<&str>;

    /// Run a script in the current document and return its value
    fn execute_script(&mut self, script: &str) -> PagewrightResult<Value>;

    /// Click the element
    fn click(&mut self, element: &ElementHandle) -> PagewrightResult<()>;

    /// Clear a text field
    fn clear(&mut self, element: &ElementHandle) -> PagewrightResult<()>;

    /// Type text into the element (appends to its content)
    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> PagewrightResult<()>;

    /// Rendered text
    fn text(&mut self, element: &ElementHandle) -> PagewrightResult<String>;

    /// DOM property (`value`, `placeholder`, ...)
    fn property(&mut self, element: &ElementHandle, name: &str)
        -> PagewrightResult<Option<String>>;

    /// Attribute; falls back to the property of the same name like WebDriver does
    fn attribute(&mut self, element: &ElementHandle, name: &str)
        -> PagewrightResult<Option<String>>;

    /// Computed CSS value
    fn css_value(&mut self, element: &ElementHandle, name: &str) -> PagewrightResult<String>;

    /// Page-space bounding box
    fn rect(&mut self, element: &ElementHandle) -> PagewrightResult<BoundingBox>;

    /// Top-left corner in page coordinates
    fn location(&mut self, element: &ElementHandle) -> PagewrightResult<Point> {
        Ok(self.rect(element)?.origin())
    }

    /// `(width, height)` in CSS pixels
    fn size(&mut self, element: &ElementHandle) -> PagewrightResult<(i64, i64)> {
        let rect = self.rect(element)?;
        Ok((rect.width, rect.height))
    }

    /// Whether the element is rendered
    fn is_displayed(&mut self, element: &ElementHandle) -> PagewrightResult<bool>;

    /// Whether the element accepts input
    fn is_enabled(&mut self, element: &ElementHandle) -> PagewrightResult<bool>;

    /// Whether a checkbox, radio button or option is selected
    fn is_selected(&mut self, element: &ElementHandle) -> PagewrightResult<bool>;

    /// Move the pointer over the element's center
    fn move_to(&mut self, element: &ElementHandle) -> PagewrightResult<()>;

    /// Press on the element's center, move by the offset and release
    fn drag_by_offset(&mut self, element: &ElementHandle, dx: i64, dy: i64)
        -> PagewrightResult<()>;

    /// Press on `source`, move onto `target` and release
    fn drag_and_drop(&mut self, source: &ElementHandle, target: &ElementHandle)
        -> PagewrightResult<()>;

    /// Select the `<option>` with the given value
    fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> PagewrightResult<()>;

    /// Text of the first selected `<option>`
    fn selected_option_text(&mut self, element: &ElementHandle) -> PagewrightResult<String>;

    /// End the session
    fn close(&mut self) -> PagewrightResult<()>;

    /// Fail unless `element` belongs to the current frame context
    fn ensure_same_frame(&self, element: &ElementHandle) -> PagewrightResult<()> {
        let current = self.current_frame();
        if element.frame.as_deref() == current {
            Ok(())
        } else {
            Err(PagewrightError::frame(format!(
                "{} was found in {} but the driver is in {}",
                element.selector,
                describe_frame(element.frame.as_deref()),
                describe_frame(current)
            )))
        }
    }
}

/// Human-readable frame name for messages
#[must_use]
pub fn describe_frame(frame: Option<&str>) -> String {
    frame.map_or_else(|| "the top-level document".to_string(), |name| format!("frame '{name}'"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let handle = ElementHandle::new("e1", Selector::id("btn"), None);
            assert_eq!(handle.id, "e1");
            assert_eq!(handle.selector, Selector::id("btn"));
            assert!(handle.frame.is_none());
        }

        #[test]
        fn test_describe_frame() {
            assert_eq!(describe_frame(None), "the top-level document");
            assert_eq!(describe_frame(Some("iframe2")), "frame 'iframe2'");
        }
    }

    mod implicit_wait_tests {
        use super::*;
        use std::time::Instant;

        #[test]
        fn test_find_element_fails_after_implicit_wait() {
            let mut driver = MockDriver::new().with_implicit_wait(Duration::from_millis(40));
            let start = Instant::now();
            let err = driver.find_element(&Selector::id("missing")).unwrap_err();
            assert!(start.elapsed() >= Duration::from_millis(40));
            assert!(
                matches!(err, PagewrightError::ElementNotFound { ref selector } if selector.contains("missing"))
            );
        }

        #[test]
        fn test_find_element_zero_wait() {
            let mut driver = MockDriver::new();
            assert_eq!(driver.implicit_wait(), Duration::ZERO);
            assert!(driver.find_element(&Selector::id("missing")).is_err());
        }

        #[test]
        fn test_handle_from_other_frame_is_rejected() {
            let mut page = MockPage::new();
            page.add(MockElement::new("p").with_id("top").with_text("top"));
            page.add_frame("inner", vec![MockElement::new("body").with_text("inside")]);
            let mut driver = MockDriver::with_page(page);

            let top = driver.find_element(&Selector::id("top")).unwrap();
            driver.switch_to_frame("inner").unwrap();
            let err = driver.text(&top).unwrap_err();
            assert!(matches!(err, PagewrightError::FrameContext { .. }));
        }
    }
}
