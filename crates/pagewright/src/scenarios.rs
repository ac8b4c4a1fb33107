//! Demo page scenarios.
//!
//! Each scenario drives a [`DemoPage`] through one feature of the page and
//! returns a [`VerificationResult`]. A scenario stops at its first unmet
//! check; the message then carries the detected and expected values.
//! Driver and store failures propagate as errors.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::driver::WebDriver;
use crate::page_object::{DemoPage, PageObject};
use crate::result::{PagewrightError, PagewrightResult};
use crate::state;
use crate::store::{ConfigStore, TestDataSet, OBJECT_TYPE_FIELD};
use crate::verify::{compare_widget_state, StateValue, VerificationResult};
use crate::wait::{WaitOptions, Waiter};

/// How long the SVG rectangle may take to grow to its full width
pub const SVG_SETTLE_TIMEOUT_MS: u64 = 3_000;

const SHOWCASE_PAUSE: Duration = Duration::from_secs(3);

/// Every demo page scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Typed color shows up on the button, read-only field and paragraph
    ColorChange,
    /// Hover menu option lands in the subhead
    HoverSelectByText,
    /// Picture moves from the first drop zone to the second
    DragAndDrop,
    /// Frame text is read and a framed checkbox clicked
    IframeSwitch,
    /// Slider drives the progress bar and label
    InputSliderControl,
    /// Dropdown drives the meter bar and label
    SelectDropdown,
    /// SVG rectangle reaches full width, then shrinks on click
    HtmlSvgRectangle,
    /// Radio buttons select exclusively
    RadioButtonSelection,
}

impl Scenario {
    /// All scenarios in suite order
    pub const ALL: [Self; 8] = [
        Self::ColorChange,
        Self::HoverSelectByText,
        Self::DragAndDrop,
        Self::IframeSwitch,
        Self::InputSliderControl,
        Self::SelectDropdown,
        Self::HtmlSvgRectangle,
        Self::RadioButtonSelection,
    ];

    /// Snake-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ColorChange => "color_change",
            Self::HoverSelectByText => "hover_select_by_text",
            Self::DragAndDrop => "drag_and_drop",
            Self::IframeSwitch => "iframe_switch",
            Self::InputSliderControl => "input_slider_control",
            Self::SelectDropdown => "select_dropdown",
            Self::HtmlSvgRectangle => "html_svg_rectangle",
            Self::RadioButtonSelection => "radio_button_selection",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario that ran
    pub scenario: Scenario,
    /// Color of the data set, for the parameterized color change runs
    pub data_set: Option<String>,
    /// What the scenario verified
    pub result: VerificationResult,
}

/// Run every scenario against a freshly loaded page.
///
/// The color change scenario runs once per data set in the store. A
/// scenario that fails with an error is recorded as a failure and the suite
/// moves on.
pub fn run_suite<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<Vec<ScenarioOutcome>> {
    let data_sets = page.store().test_data_sets()?;
    let mut outcomes = Vec::new();

    for scenario in Scenario::ALL {
        if scenario == Scenario::ColorChange {
            for data_set in &data_sets {
                page.reload()?;
                let result = settle(scenario, color_change(page, data_set));
                outcomes.push(ScenarioOutcome {
                    scenario,
                    data_set: Some(data_set.color.clone()),
                    result,
                });
            }
            continue;
        }
        page.reload()?;
        let result = settle(scenario, run(scenario, page));
        outcomes.push(ScenarioOutcome {
            scenario,
            data_set: None,
            result,
        });
    }

    let failed = outcomes.iter().filter(|o| !o.result.passed).count();
    info!(total = outcomes.len(), failed, "scenario suite finished");
    Ok(outcomes)
}

/// Run one scenario; the color change scenario uses the store's first data set
pub fn run<D: WebDriver, S: ConfigStore>(
    scenario: Scenario,
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    match scenario {
        Scenario::ColorChange => {
            let data_set = page
                .store()
                .test_data_sets()?
                .into_iter()
                .next()
                .ok_or_else(|| PagewrightError::not_found("data_sets[0]"))?;
            color_change(page, &data_set)
        }
        Scenario::HoverSelectByText => hover_select_by_text(page),
        Scenario::DragAndDrop => drag_and_drop(page),
        Scenario::IframeSwitch => iframe_switch(page),
        Scenario::InputSliderControl => input_slider_control(page),
        Scenario::SelectDropdown => select_dropdown(page),
        Scenario::HtmlSvgRectangle => html_svg_rectangle(page),
        Scenario::RadioButtonSelection => radio_button_selection(page),
    }
}

fn settle(
    scenario: Scenario,
    outcome: PagewrightResult<VerificationResult>,
) -> VerificationResult {
    match outcome {
        Ok(result) => {
            info!(scenario = %scenario, passed = result.passed, message = %result.message, "scenario finished");
            result
        }
        Err(err) => {
            warn!(scenario = %scenario, error = %err, "scenario failed with an error");
            VerificationResult::fail(err.to_string())
        }
    }
}

// =============================================================================
// COLOR CHANGE
// =============================================================================

fn color_shown<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
    color: &str,
) -> PagewrightResult<(bool, String)> {
    let texts = [
        page.read_button()?,
        page.read_only_field()?,
        page.read_paragraph()?,
    ];
    let message = format!(
        "Button text: {}, Read only field text: {}, Paragraph text: {}",
        texts[0], texts[1], texts[2]
    );
    info!("{message}");
    Ok((texts.iter().all(|text| text.contains(color)), message))
}

/// Fill the text fields for `data_set` and check that its color shows on the
/// button, the read-only field and the paragraph. The button is clicked once
/// if the color is not shown yet.
pub fn color_change<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
    data_set: &TestDataSet,
) -> PagewrightResult<VerificationResult> {
    let TestDataSet {
        color,
        text_input,
        pre_filled_input,
        color_to_change,
    } = data_set;

    page.inject_text_input_field(&format!("{text_input}: for {color}"))?;
    page.inject_text_pre_filled_field(pre_filled_input)?;
    let placeholder_input = if *color_to_change {
        "Color change will execute"
    } else {
        "Color change will skip"
    };
    let placeholder = page.inject_text_placeholder_field(placeholder_input)?;
    page.inject_text_area(&format!("{text_input}: {color}\n{pre_filled_input}"))?;
    info!(initial = %placeholder, new = placeholder_input, "placeholder text");
    page.showcase_pause(Duration::from_secs(2));

    if !color_shown(page, color)?.0 {
        page.click_button()?;
    }
    let (passed, detected) = color_shown(page, color)?;
    page.showcase_pause(SHOWCASE_PAUSE);

    Ok(if passed {
        VerificationResult::pass(format!("Color changed to {color}: {detected}"))
    } else {
        VerificationResult::fail(format!(
            "Failed to change the color to {color}: {detected}"
        ))
    })
}

// =============================================================================
// MENUS, DRAG AND DROP, FRAMES
// =============================================================================

/// Click the hover menu option and find its text in the subhead
pub fn hover_select_by_text<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    let selected = page.hover_click_option()?;
    let subhead = page.read_dynamic_subhead()?;
    page.showcase_pause(SHOWCASE_PAUSE);
    Ok(VerificationResult::from_check(
        subhead.contains(&selected),
        format!("Selected option text: {selected}, dynamic subhead title: {subhead}"),
    ))
}

/// Reveal the drop zones and drag the picture across
pub fn drag_and_drop<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    page.click_checkbox()?;
    let result = page.drag_and_drop_picture()?;
    page.showcase_pause(SHOWCASE_PAUSE);
    Ok(result)
}

/// Read the first frame's text and click the checkbox in the second
pub fn iframe_switch<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    let result = page.switch_to_iframes()?;
    page.showcase_pause(SHOWCASE_PAUSE);
    Ok(result)
}

// =============================================================================
// PROGRESS WIDGETS
// =============================================================================

/// Displayed state of a progress widget: `(label, bar)` for the slider,
/// `(option, label, bar)` for the dropdown
fn read_progress_state<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
    object_type: &str,
) -> PagewrightResult<Vec<StateValue>> {
    Ok(if object_type == "slider" {
        state![page.read_progress_label_value()?, page.read_progress_bar_value()?]
    } else {
        state![
            page.read_selected_option()?,
            page.read_meter_label_value()?,
            page.read_meter_bar_value()?,
        ]
    })
}

/// Move the slider and check the progress bar and label before and after
pub fn input_slider_control<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    let object_type = page.descriptor("input_slider_control")?.str_field(OBJECT_TYPE_FIELD)?;
    let label = page.expectation("progress_label")?;
    let bar = page.expectation("progress_bar")?;

    let before = compare_widget_state(
        &object_type,
        &read_progress_state(page, &object_type)?,
        &state![label.start_value, bar.start_value],
    );
    if !before.passed {
        return Ok(before);
    }

    page.move_slider_control()?;
    page.showcase_pause(SHOWCASE_PAUSE);

    Ok(compare_widget_state(
        &object_type,
        &read_progress_state(page, &object_type)?,
        &state![label.end_value, bar.end_value],
    ))
}

/// Pick a dropdown option and check the meter bar and label before and after
pub fn select_dropdown<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    let dropdown = page.expectation("select_dropdown")?;
    let object_type = dropdown.object_type.clone().unwrap_or_else(|| "dropdown".to_string());
    let label = page.expectation("meter_label")?;
    let bar = page.expectation("meter_bar")?;

    let before = compare_widget_state(
        &object_type,
        &read_progress_state(page, &object_type)?,
        &state![dropdown.start_value, label.start_value, bar.start_value],
    );
    if !before.passed {
        return Ok(before);
    }
    page.showcase_pause(SHOWCASE_PAUSE);

    let selected = page.select_click_option()?;
    info!(selected = %selected, "selected option value");
    page.showcase_pause(SHOWCASE_PAUSE);

    Ok(compare_widget_state(
        &object_type,
        &read_progress_state(page, &object_type)?,
        &state![dropdown.end_value, label.end_value, bar.end_value],
    ))
}

// =============================================================================
// SVG AND RADIO BUTTONS
// =============================================================================

fn parse_px(width: &str) -> PagewrightResult<f64> {
    width
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse()
        .map_err(|_| PagewrightError::invalid_config(format!("not a pixel width: {width:?}")))
}

/// Wait for the SVG rectangle to reach its maximum width, click it and check
/// that it shrank
pub fn html_svg_rectangle<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    let max_width = parse_px(&page.descriptor("html_svg_rect")?.str_field("max_width_px")?)?;
    info!(max_width, "maximum SVG rectangle width");

    let waiter = Waiter::with_options(WaitOptions::new().with_timeout(SVG_SETTLE_TIMEOUT_MS));
    let reached = waiter.until("SVG rectangle to reach its maximum width", || {
        let width = parse_px(&page.read_html_svg_rect_width()?)?;
        Ok(((width - max_width).abs() < f64::EPSILON).then_some(width))
    });
    match reached {
        Ok((width, _)) => info!(width, "initial SVG rectangle width"),
        Err(err) if err.is_timeout() => {
            let width = page.read_html_svg_rect_width()?;
            return Ok(VerificationResult::fail(format!(
                "SVG rectangle width {width} never reached the maximum of {max_width}px"
            )));
        }
        Err(err) => return Err(err),
    }

    page.click_html_svg_rect()?;
    let width = parse_px(&page.read_html_svg_rect_width()?)?;
    Ok(VerificationResult::from_check(
        width < max_width,
        format!("SVG rectangle width after click: {width}px, maximum: {max_width}px"),
    ))
}

fn expected_radio_state<D: WebDriver, S: ConfigStore>(
    page: &DemoPage<D, S>,
    name: &str,
) -> PagewrightResult<(bool, bool, bool)> {
    let descriptor = page.descriptor(name)?;
    Ok((
        descriptor.bool_field("is_displayed")?,
        descriptor.bool_field("is_enabled")?,
        descriptor.bool_field("is_selected")?,
    ))
}

fn compare_radio<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
    name: &str,
    expected: (bool, bool, bool),
) -> PagewrightResult<VerificationResult> {
    let (displayed, enabled, selected) = page.radio_button_state(name)?;
    Ok(compare_widget_state(
        name,
        &state![displayed, enabled, selected],
        &state![expected.0, expected.1, expected.2],
    ))
}

/// Check both radio buttons, click the second and check that the selection
/// moved to it
pub fn radio_button_selection<D: WebDriver, S: ConfigStore>(
    page: &mut DemoPage<D, S>,
) -> PagewrightResult<VerificationResult> {
    let names = ["radio_button1", "radio_button2"];
    let mut expected = [
        expected_radio_state(page, names[0])?,
        expected_radio_state(page, names[1])?,
    ];

    for (name, state) in names.iter().zip(expected) {
        let result = compare_radio(page, name, state)?;
        if !result.passed {
            return Ok(result);
        }
    }
    page.showcase_pause(SHOWCASE_PAUSE);

    page.click_radio_button(names[1])?;
    page.showcase_pause(SHOWCASE_PAUSE);

    for state in &mut expected {
        state.2 = !state.2;
    }
    let mut messages = Vec::new();
    for (name, state) in names.iter().zip(expected) {
        let result = compare_radio(page, name, state)?;
        if !result.passed {
            return Ok(result);
        }
        messages.push(result.message);
    }
    Ok(VerificationResult::pass(messages.join("; ")))
}
