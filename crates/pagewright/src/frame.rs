//! Scoped frame context.
//!
//! A [`FrameScope`] switches the driver into a named frame and switches it
//! back to the top-level document when the scope ends, whether the work
//! inside returned normally, returned early with `?`, or panicked.

use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use crate::driver::{describe_frame, WebDriver};
use crate::result::{PagewrightError, PagewrightResult};

/// Driver borrowed inside a named frame
#[derive(Debug)]
pub struct FrameScope<'d, D: WebDriver + ?Sized> {
    driver: &'d mut D,
    name: String,
    restored: bool,
}

impl<'d, D: WebDriver + ?Sized> FrameScope<'d, D> {
    /// Switch into frame `name` of the top-level document.
    ///
    /// Fails with [`PagewrightError::FrameContext`] if the driver is already
    /// inside a frame.
    pub fn enter(driver: &'d mut D, name: &str) -> PagewrightResult<Self> {
        if let Some(current) = driver.current_frame() {
            return Err(PagewrightError::frame(format!(
                "cannot enter frame '{name}' from {}",
                describe_frame(Some(current))
            )));
        }
        driver.switch_to_frame(name)?;
        debug!(frame = name, "entered frame");
        Ok(Self {
            driver,
            name: name.to_string(),
            restored: false,
        })
    }

    /// Frame this scope targets
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leave the frame, reporting a failed switch instead of logging it
    pub fn exit(mut self) -> PagewrightResult<()> {
        self.restored = true;
        self.driver.switch_to_default_content()?;
        debug!(frame = %self.name, "left frame");
        Ok(())
    }
}

impl<D: WebDriver + ?Sized> Deref for FrameScope<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.driver
    }
}

impl<D: WebDriver + ?Sized> DerefMut for FrameScope<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.driver
    }
}

impl<D: WebDriver + ?Sized> Drop for FrameScope<'_, D> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        match self.driver.switch_to_default_content() {
            Ok(()) => debug!(frame = %self.name, "left frame"),
            Err(err) => warn!(frame = %self.name, error = %err, "failed to leave frame"),
        }
    }
}

/// Run `work` inside frame `name`, always returning to the top-level document
pub fn within_frame<D, T, F>(driver: &mut D, name: &str, work: F) -> PagewrightResult<T>
where
    D: WebDriver + ?Sized,
    F: FnOnce(&mut D) -> PagewrightResult<T>,
{
    let mut scope = FrameScope::enter(driver, name)?;
    let result = work(&mut *scope);
    match result {
        Ok(value) => {
            scope.exit()?;
            Ok(value)
        }
        Err(err) => {
            drop(scope);
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, MockPage};
    use crate::locator::Selector;

    fn framed() -> MockDriver {
        let mut page = MockPage::new();
        page.add(MockElement::new("p").with_id("top"));
        page.add_frame("one", vec![MockElement::new("body").with_text("first")]);
        page.add_frame("two", vec![MockElement::new("body").with_text("second")]);
        MockDriver::with_page(page)
    }

    #[test]
    fn test_scope_restores_on_drop() {
        let mut driver = framed();
        {
            let mut scope = FrameScope::enter(&mut driver, "one").unwrap();
            assert_eq!(scope.current_frame(), Some("one"));
            let body = scope.find_element(&Selector::TagName("body".into())).unwrap();
            assert_eq!(scope.text(&body).unwrap(), "first");
        }
        assert_eq!(driver.current_frame(), None);
        assert_eq!(driver.calls_to("switch_to_default_content"), 1);
    }

    #[test]
    fn test_explicit_exit_restores_once() {
        let mut driver = framed();
        let scope = FrameScope::enter(&mut driver, "one").unwrap();
        assert_eq!(scope.name(), "one");
        scope.exit().unwrap();
        assert_eq!(driver.current_frame(), None);
        assert_eq!(driver.calls_to("switch_to_default_content"), 1);
    }

    #[test]
    fn test_early_error_still_restores() {
        let mut driver = framed();
        let result: PagewrightResult<()> = within_frame(&mut driver, "one", |d| {
            d.find_element(&Selector::id("not-in-frame"))?;
            Ok(())
        });
        assert!(matches!(result, Err(PagewrightError::ElementNotFound { .. })));
        assert_eq!(driver.current_frame(), None);
        assert!(driver.find_element(&Selector::id("top")).is_ok());
    }

    #[test]
    fn test_panic_still_restores() {
        let mut driver = framed();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = FrameScope::enter(&mut driver, "two").unwrap();
            panic!("boom");
        }));
        assert!(outcome.is_err());
        assert_eq!(driver.current_frame(), None);
    }

    #[test]
    fn test_consecutive_frames() {
        let mut driver = framed();
        let first = within_frame(&mut driver, "one", |d| {
            let body = d.find_element(&Selector::TagName("body".into()))?;
            d.text(&body)
        })
        .unwrap();
        let second = within_frame(&mut driver, "two", |d| {
            let body = d.find_element(&Selector::TagName("body".into()))?;
            d.text(&body)
        })
        .unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("first", "second"));
    }

    #[test]
    fn test_nested_enter_is_frame_error() {
        let mut driver = framed();
        driver.switch_to_frame("one").unwrap();
        let err = FrameScope::enter(&mut driver, "two").unwrap_err();
        assert!(matches!(err, PagewrightError::FrameContext { .. }));
    }

    #[test]
    fn test_unknown_frame_leaves_driver_at_top() {
        let mut driver = framed();
        assert!(FrameScope::enter(&mut driver, "missing").is_err());
        assert_eq!(driver.current_frame(), None);
    }
}
