//! End-to-end tests for the demo page suite against the scripted mock page.
//!
//! Every scenario runs once per store backend: built-in, suite file and
//! SQLite. The stores carry the same records, so outcomes must agree.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use pagewright::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const URL: &str = "http://localhost:8000/demopage.html";

fn suite_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn open<S: ConfigStore>(store: S) -> DemoPage<MockDriver, S> {
    DemoPage::open(MockDriver::with_page(demo_page()), store, URL, false).unwrap()
}

// ============================================================================
// Text injection
// ============================================================================

#[test]
fn inject_replaces_existing_text_when_clear_is_required() {
    let mut mock = demo_page();
    mock.update("textInput", |el| el.value = "old".to_string());
    let driver = MockDriver::with_page(mock);
    let mut page = DemoPage::open(driver, StaticStore::demo_page(), URL, false).unwrap();

    page.inject_text_input_field("Red: for Red").unwrap();

    let selector = page.selector("text_input_field").unwrap();
    let driver = page.driver_mut();
    let field = driver.find_element(&selector).unwrap();
    assert_eq!(
        driver.property(&field, "value").unwrap().as_deref(),
        Some("Red: for Red")
    );
}

#[test]
fn inject_appends_when_clear_is_not_required() {
    let mut page = open(StaticStore::demo_page());
    page.inject_text_pre_filled_field(" and Red").unwrap();

    let selector = page.selector("pre_filled_text_field").unwrap();
    let driver = page.driver_mut();
    let field = driver.find_element(&selector).unwrap();
    assert_eq!(
        driver.property(&field, "value").unwrap().as_deref(),
        Some("Pre-filled text and Red")
    );
}

// ============================================================================
// Widgets
// ============================================================================

#[test]
fn radio_pair_flips_after_clicking_the_second_button() {
    let mut page = open(StaticStore::demo_page());
    assert_eq!(page.radio_button_state("radio_button1").unwrap(), (true, true, true));
    assert_eq!(page.radio_button_state("radio_button2").unwrap(), (true, true, false));

    page.click_radio_button("radio_button2").unwrap();

    assert_eq!(page.radio_button_state("radio_button1").unwrap(), (true, true, false));
    assert_eq!(page.radio_button_state("radio_button2").unwrap(), (true, true, true));
}

#[test]
fn slider_drives_progress_bar_and_label() {
    let mut page = open(StaticStore::demo_page());
    assert_eq!(page.read_progress_bar_value().unwrap(), "0");
    assert_eq!(page.read_progress_label_value().unwrap(), "0");

    page.move_slider_control().unwrap();

    assert_eq!(page.read_progress_bar_value().unwrap(), "100");
    assert_eq!(page.read_progress_label_value().unwrap(), "100");
}

#[test]
fn dropdown_selects_the_stored_end_value() {
    let mut page = open(StaticStore::demo_page());
    assert_eq!(page.select_click_option().unwrap(), "100");
    assert_eq!(page.read_selected_option().unwrap(), "Level 100");
    assert_eq!(page.read_meter_label_value().unwrap(), "100");
    assert_eq!(page.read_meter_bar_value().unwrap(), "100");
}

#[test]
fn hover_menu_option_updates_the_subhead() {
    let mut page = open(StaticStore::demo_page());
    assert_eq!(page.hover_click_option().unwrap(), "Selenium");
    assert_eq!(
        page.read_dynamic_subhead().unwrap(),
        "Dynamic subhead: Selenium"
    );
}

// ============================================================================
// Drag and drop
// ============================================================================

#[test]
fn drag_requires_the_zones_to_be_revealed() {
    let mut page = open(StaticStore::demo_page());
    let err = page.drag_and_drop_picture().unwrap_err();
    assert!(err.is_timeout(), "{err}");
}

#[test]
fn drag_moves_the_picture_between_zones() {
    let mut page = open(StaticStore::demo_page());
    page.click_checkbox().unwrap();

    let result = page.drag_and_drop_picture().unwrap();

    assert!(result.passed, "{result}");
    assert!(result.message.contains("x=105 in expected range: [100, 110)"));
    assert!(result.message.contains("Drag and drop action performed"));
    assert!(result.message.contains("x=305 in expected range: [300, 310)"));
}

#[test]
fn drag_fails_when_picture_starts_outside_the_tolerance() {
    let mut mock = demo_page();
    mock.update("draggable", |el| el.rect.x = 110);
    let driver = MockDriver::with_page(mock);
    let mut page = DemoPage::open(driver, StaticStore::demo_page(), URL, false).unwrap();
    page.click_checkbox().unwrap();

    let result = page.drag_and_drop_picture().unwrap();

    assert!(!result.passed);
    assert!(!result.message.contains("Drag and drop action performed"));
    assert!(!page.driver().was_called("drag_and_drop"));
}

// ============================================================================
// Full suite per backend
// ============================================================================

fn assert_suite_passes<S: ConfigStore>(store: S) {
    let mut page = open(store);
    let outcomes = scenarios::run_suite(&mut page).unwrap();
    assert_eq!(outcomes.len(), Scenario::ALL.len() - 1 + 3);
    for outcome in &outcomes {
        assert!(
            outcome.result.passed,
            "{} {:?}: {}",
            outcome.scenario, outcome.data_set, outcome.result
        );
    }
}

#[test]
fn suite_passes_with_builtin_store() {
    assert_suite_passes(StaticStore::demo_page());
}

#[test]
fn suite_passes_with_json_suite_file() {
    assert_suite_passes(FileStore::open(suite_file("demopage_data.json")).unwrap());
}

#[test]
fn suite_passes_with_yaml_suite_file() {
    assert_suite_passes(FileStore::open(suite_file("demopage_data.yaml")).unwrap());
}

#[test]
fn suite_passes_with_sqlite_store() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("locators.db")).unwrap();
    assert_eq!(store.import(&StaticStore::demo_page()).unwrap(), 25);
    assert_suite_passes(store);
}

#[test]
fn missing_record_surfaces_as_typed_error() {
    let mut page = open(StaticStore::new());
    let err = page.read_button().unwrap_err();
    assert!(
        matches!(err, PagewrightError::ConfigEntryNotFound { ref name } if name == "button"),
        "{err}"
    );
}

#[test]
fn suite_config_opens_the_page() {
    let suite = SuiteConfig::load(suite_file("demopage_data.yaml")).unwrap();
    let store = StaticStore::demo_page();
    let page = DemoPage::from_suite(MockDriver::with_page(demo_page()), store, &suite).unwrap();
    assert!(!page.debug_showcase());
    assert_eq!(page.url(), suite.demopage_url);
}
