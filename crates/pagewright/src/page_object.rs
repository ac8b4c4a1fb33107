//! Page Object Model support.
//!
//! A page object owns one driver session and borrows its locators from a
//! [`ConfigStore`]. Every interaction follows the same path: look the
//! descriptor up by name, [`resolve`] it to a native selector, and call the
//! driver.
//!
//! [`DemoPage`] is the facade for the bundled demo page. It is generic over
//! the store, so the in-memory, file and SQLite sources all drive the same
//! code.

use std::time::Duration;
use tracing::{debug, info};

use crate::config::SuiteConfig;
use crate::driver::{ElementHandle, WebDriver};
use crate::frame::within_frame;
use crate::locator::{resolve, LocatorDescriptor, Selector};
use crate::result::PagewrightResult;
use crate::store::{ConfigStore, WidgetExpectation};
use crate::verify::{verify_draggable_position, VerificationResult};
use crate::wait::{ElementCondition, WaitOptions, Waiter, DRAG_VISIBILITY_TIMEOUT_MS};

/// A page or component under test, driven through named locators.
///
/// Implementors supply the driver, the store and the URL; locating elements
/// by name comes for free.
pub trait PageObject {
    /// Driver session the page talks to
    type Driver: WebDriver;
    /// Source of the page's locators
    type Store: ConfigStore;

    /// URL the page was opened at
    fn url(&self) -> &str;

    /// Driver session
    fn driver(&self) -> &Self::Driver;

    /// Mutable driver session
    fn driver_mut(&mut self) -> &mut Self::Driver;

    /// Locator source
    fn store(&self) -> &Self::Store;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Descriptor of a named locator
    fn descriptor(&self, name: &str) -> PagewrightResult<LocatorDescriptor> {
        self.store().locator(name)
    }

    /// Before/after values attached to a named locator
    fn expectation(&self, name: &str) -> PagewrightResult<WidgetExpectation> {
        self.store().expectation(name)
    }

    /// Native selector for a named locator
    fn selector(&self, name: &str) -> PagewrightResult<Selector> {
        Ok(resolve(&self.descriptor(name)?))
    }

    /// Find the element behind a named locator in the current frame context
    fn locate(&mut self, name: &str) -> PagewrightResult<ElementHandle> {
        let selector = self.selector(name)?;
        self.driver_mut().find_element(&selector)
    }

    /// Whether the driver still shows the page's URL
    fn is_loaded(&mut self) -> PagewrightResult<bool> {
        let current = self.driver_mut().current_url()?;
        Ok(current == self.url())
    }
}

/// Value part of a label such as `"Progress: (42)"`: the text after the last
/// `": "` with parentheses removed.
#[must_use]
pub fn parse_label_value(text: &str) -> String {
    text.rsplit(": ")
        .next()
        .unwrap_or(text)
        .replace(['(', ')'], "")
}

/// Facade over the demo page
#[derive(Debug)]
pub struct DemoPage<D: WebDriver, S: ConfigStore> {
    driver: D,
    store: S,
    url: String,
    debug_showcase: bool,
}

impl<D: WebDriver, S: ConfigStore> PageObject for DemoPage<D, S> {
    type Driver = D;
    type Store = S;

    fn url(&self) -> &str {
        &self.url
    }

    fn driver(&self) -> &D {
        &self.driver
    }

    fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn store(&self) -> &S {
        &self.store
    }

    fn page_name(&self) -> &str {
        "demo page"
    }
}

impl<D: WebDriver, S: ConfigStore> DemoPage<D, S> {
    /// Navigate the session to `url` and maximize the window
    pub fn open(
        mut driver: D,
        store: S,
        url: impl Into<String>,
        debug_showcase: bool,
    ) -> PagewrightResult<Self> {
        let url = url.into();
        driver.navigate(&url)?;
        driver.maximize_window()?;
        info!(url = %url, debug_showcase, "opened demo page");
        Ok(Self {
            driver,
            store,
            url,
            debug_showcase,
        })
    }

    /// Open the page the suite configuration points at
    pub fn from_suite(driver: D, store: S, suite: &SuiteConfig) -> PagewrightResult<Self> {
        let url = suite.page_url()?;
        Self::open(driver, store, url, suite.debug_showcase)
    }

    /// Whether scenarios should pause and log verbosely for an audience
    #[must_use]
    pub const fn debug_showcase(&self) -> bool {
        self.debug_showcase
    }

    /// Sleep for `pause` in showcase mode, do nothing otherwise
    pub fn showcase_pause(&self, pause: Duration) {
        if self.debug_showcase {
            std::thread::sleep(pause);
        }
    }

    /// Navigate to the page again, discarding every change made to it
    pub fn reload(&mut self) -> PagewrightResult<()> {
        self.driver.navigate(&self.url)?;
        debug!(url = %self.url, "reloaded demo page");
        Ok(())
    }

    /// End the session and hand the driver back
    pub fn close(mut self) -> PagewrightResult<D> {
        self.driver.close()?;
        Ok(self.driver)
    }

    // =========================================================================
    // TEXT FIELDS
    // =========================================================================

    fn inject(&mut self, name: &str, text: &str) -> PagewrightResult<()> {
        let descriptor = self.descriptor(name)?;
        let field = self.driver.find_element(&resolve(&descriptor))?;
        if descriptor.clear_required {
            self.driver.clear(&field)?;
        }
        self.driver.send_keys(&field, text)?;
        debug!(locator = name, clear = descriptor.clear_required, text, "injected text");
        Ok(())
    }

    /// Type into the text input
    pub fn inject_text_input_field(&mut self, text: &str) -> PagewrightResult<()> {
        self.inject("text_input_field", text)
    }

    /// Type into the pre-filled field
    pub fn inject_text_pre_filled_field(&mut self, text: &str) -> PagewrightResult<()> {
        self.inject("pre_filled_text_field", text)
    }

    /// Type into the placeholder field, returning the placeholder it showed
    pub fn inject_text_placeholder_field(&mut self, text: &str) -> PagewrightResult<String> {
        let field = self.locate("placeholder_text_field")?;
        let placeholder = self
            .driver
            .property(&field, "placeholder")?
            .unwrap_or_default();
        self.inject("placeholder_text_field", text)?;
        Ok(placeholder)
    }

    /// Type into the text area
    pub fn inject_text_area(&mut self, text: &str) -> PagewrightResult<()> {
        self.inject("text_area", text)
    }

    fn read_text(&mut self, name: &str) -> PagewrightResult<String> {
        let element = self.locate(name)?;
        let text = self.driver.text(&element)?;
        debug!(locator = name, text = %text, "read text");
        Ok(text)
    }

    /// Text of the dynamic subhead
    pub fn read_dynamic_subhead(&mut self) -> PagewrightResult<String> {
        self.read_text("dynamic_subhead")
    }

    /// Text of the color button
    pub fn read_button(&mut self) -> PagewrightResult<String> {
        self.read_text("button")
    }

    /// Text of the paragraph
    pub fn read_paragraph(&mut self) -> PagewrightResult<String> {
        self.read_text("paragraph_with_text")
    }

    /// Value of the read-only field
    pub fn read_only_field(&mut self) -> PagewrightResult<String> {
        let field = self.locate("read_only_text_field")?;
        let value = self.driver.property(&field, "value")?.unwrap_or_default();
        debug!(locator = "read_only_text_field", value = %value, "read field value");
        Ok(value)
    }

    // =========================================================================
    // MENUS
    // =========================================================================

    /// Hover the menu, wait for its option to show, click it and return the
    /// option's link text
    pub fn hover_click_option(&mut self) -> PagewrightResult<String> {
        let menu = self.locate("hover_dropdown")?;
        self.driver.move_to(&menu)?;

        let option = self.descriptor("hover_option_text")?;
        let waiter = Waiter::with_options(WaitOptions::within(self.driver.implicit_wait()));
        let link =
            waiter.wait_for_element(&mut self.driver, &resolve(&option), ElementCondition::Visible)?;
        self.driver.click(&link)?;
        debug!(option = %option.locator_hook, "clicked hover option");
        Ok(option.locator_hook)
    }

    /// Select the option whose value is the meter label's end value, and
    /// return that value
    pub fn select_click_option(&mut self) -> PagewrightResult<String> {
        let value = self.expectation("meter_label")?.end_value;
        let select = self.locate("select_dropdown")?;
        self.driver.select_by_value(&select, &value)?;
        debug!(value = %value, "selected dropdown option");
        Ok(value)
    }

    /// Text of the dropdown's selected option
    pub fn read_selected_option(&mut self) -> PagewrightResult<String> {
        let select = self.locate("select_dropdown")?;
        let option = self.driver.selected_option_text(&select)?;
        debug!(locator = "select_dropdown", option = %option, "read selected option");
        Ok(option)
    }

    // =========================================================================
    // CLICKS
    // =========================================================================

    fn click(&mut self, name: &str) -> PagewrightResult<()> {
        let element = self.locate(name)?;
        self.driver.click(&element)?;
        debug!(locator = name, "clicked");
        Ok(())
    }

    /// Click the color button
    pub fn click_button(&mut self) -> PagewrightResult<()> {
        self.click("button")
    }

    /// Click the checkbox revealing the drag-and-drop zones
    pub fn click_checkbox(&mut self) -> PagewrightResult<()> {
        self.click("checkbox")
    }

    /// Click the SVG rectangle
    pub fn click_html_svg_rect(&mut self) -> PagewrightResult<()> {
        self.click("html_svg_rect")
    }

    /// Computed CSS width of the SVG rectangle (`"200px"`)
    pub fn read_html_svg_rect_width(&mut self) -> PagewrightResult<String> {
        let rect = self.locate("html_svg_rect")?;
        self.driver.css_value(&rect, "width")
    }

    // =========================================================================
    // DRAG AND DROP
    // =========================================================================

    /// Drag the picture from the first drop zone onto the second.
    ///
    /// The picture must start inside the first zone; it must end inside the
    /// second. Both checks use [`verify_draggable_position`].
    pub fn drag_and_drop_picture(&mut self) -> PagewrightResult<VerificationResult> {
        let draggable = self.selector("draggable_item")?;
        let waiter =
            Waiter::with_options(WaitOptions::new().with_timeout(DRAG_VISIBILITY_TIMEOUT_MS));
        let item = waiter.wait_for_element(&mut self.driver, &draggable, ElementCondition::Visible)?;

        let source = self.locate("dropzone_1")?;
        let target = self.locate("dropzone_2")?;
        let mut log = Vec::new();

        let start = self.driver.location(&item)?;
        let source_zone = self.driver.rect(&source)?;
        let before = verify_draggable_position(start.x, &source_zone);
        debug!(passed = before.passed, message = %before.message, "drag start position");
        log.push(before.message);
        if !before.passed {
            return Ok(VerificationResult::fail(log.join("; ")));
        }

        self.driver.drag_and_drop(&item, &target)?;
        log.push("Drag and drop action performed".to_string());

        let item = self.driver.find_element(&draggable)?;
        let end = self.driver.location(&item)?;
        let target_zone = self.driver.rect(&target)?;
        let after = verify_draggable_position(end.x, &target_zone);
        debug!(passed = after.passed, message = %after.message, "drag end position");
        log.push(after.message);
        Ok(VerificationResult::from_check(after.passed, log.join("; ")))
    }

    // =========================================================================
    // FRAMES
    // =========================================================================

    /// Read the body of the first frame and compare it to its expected text,
    /// then click the checkbox inside the second frame. Each frame is left
    /// before the next step, whatever the outcome.
    pub fn switch_to_iframes(&mut self) -> PagewrightResult<VerificationResult> {
        let iframe2 = self.descriptor("iframe2")?;
        let frame2 = iframe2.str_field("iframe_name")?;
        let expected = iframe2.str_field("iframe_expected_text")?;
        let body = resolve(&iframe2);

        let detected = within_frame(&mut self.driver, &frame2, |driver| {
            let element = driver.find_element(&body)?;
            driver.text(&element)
        })?;
        if detected != expected {
            return Ok(VerificationResult::fail(format!(
                "Detected iFrame text: {detected}, expected: {expected}"
            )));
        }

        let iframe3 = self.descriptor("iframe3")?;
        let frame3 = iframe3.str_field("iframe_name")?;
        let checkbox = resolve(&iframe3);
        within_frame(&mut self.driver, &frame3, |driver| {
            let element = driver.find_element(&checkbox)?;
            driver.click(&element)
        })?;

        Ok(VerificationResult::pass(
            "Detected iFrame2 text as expected, iFrame3 checkbox clicked",
        ))
    }

    // =========================================================================
    // PROGRESS AND METER
    // =========================================================================

    fn read_value_attribute(&mut self, name: &str) -> PagewrightResult<String> {
        let bar = self.locate(name)?;
        let value = self.driver.attribute(&bar, "value")?.unwrap_or_default();
        debug!(locator = name, value = %value, "read value attribute");
        Ok(value)
    }

    fn read_label_value(&mut self, name: &str) -> PagewrightResult<String> {
        let value = parse_label_value(&self.read_text(name)?);
        debug!(locator = name, value = %value, "read label value");
        Ok(value)
    }

    /// `value` of the progress bar
    pub fn read_progress_bar_value(&mut self) -> PagewrightResult<String> {
        self.read_value_attribute("progress_bar")
    }

    /// `value` of the meter bar
    pub fn read_meter_bar_value(&mut self) -> PagewrightResult<String> {
        self.read_value_attribute("meter_bar")
    }

    /// Number shown by the progress label
    pub fn read_progress_label_value(&mut self) -> PagewrightResult<String> {
        self.read_label_value("progress_label")
    }

    /// Number shown by the meter label
    pub fn read_meter_label_value(&mut self) -> PagewrightResult<String> {
        self.read_label_value("meter_label")
    }

    /// Drag the slider knob by the offsets stored with its locator
    pub fn move_slider_control(&mut self) -> PagewrightResult<()> {
        let descriptor = self.descriptor("input_slider_control")?;
        let (dx, dy) = (
            descriptor.i64_field("x_offset")?,
            descriptor.i64_field("y_offset")?,
        );
        let slider = self.driver.find_element(&resolve(&descriptor))?;
        self.driver.drag_by_offset(&slider, dx, dy)?;
        debug!(dx, dy, "moved slider");
        Ok(())
    }

    // =========================================================================
    // RADIO BUTTONS
    // =========================================================================

    /// `(displayed, enabled, selected)` of a named radio button
    pub fn radio_button_state(&mut self, name: &str) -> PagewrightResult<(bool, bool, bool)> {
        let radio = self.locate(name)?;
        Ok((
            self.driver.is_displayed(&radio)?,
            self.driver.is_enabled(&radio)?,
            self.driver.is_selected(&radio)?,
        ))
    }

    /// Click a named radio button
    pub fn click_radio_button(&mut self, name: &str) -> PagewrightResult<()> {
        self.click(name)
    }
}
