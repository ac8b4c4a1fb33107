use super::mock::{MockElement, MockPage};
use crate::locator::BoundingBox;

/// Color the page shows before the button is clicked
pub const INITIAL_COLOR: &str = "Blue";

/// Scripted replica of `testdata/demopage.html`.
///
/// Same ids, initial values and reactions as the HTML page: the color button
/// applies the last word typed into the text input, the hover menu reveals
/// its links, the dropdown and slider drive their label and bar, the checkbox
/// reveals the drag-and-drop zones and the SVG rectangle halves on click.
#[must_use]
pub fn demo_page() -> MockPage {
    let mut page = MockPage::new();

    page.add(MockElement::new("h2").with_id("dynamicSubhead").with_text("Pagewright demo page"));

    // Text fields
    page.add(
        MockElement::new("input")
            .with_id("textInput")
            .with_attribute("type", "text"),
    );
    page.add(
        MockElement::new("input")
            .with_id("prefilledInput")
            .with_attribute("type", "text")
            .with_value("Pre-filled text"),
    );
    page.add(
        MockElement::new("input")
            .with_id("placeholderInput")
            .with_attribute("type", "text")
            .with_attribute("placeholder", "Enter the color change intent"),
    );
    page.add(MockElement::new("textarea").with_id("textArea"));
    page.add(
        MockElement::new("input")
            .with_id("readOnlyField")
            .with_attribute("type", "text")
            .with_attribute("readonly", "")
            .with_value(INITIAL_COLOR),
    );
    page.add(
        MockElement::new("button")
            .with_id("colorButton")
            .with_text(format!("Button: {INITIAL_COLOR}")),
    );
    page.add(
        MockElement::new("p")
            .with_id("paragraph")
            .with_text(format!("Paragraph in {INITIAL_COLOR}")),
    );
    page.on_click("colorButton", |page| {
        let Some(color) = page
            .element("textInput")
            .and_then(|input| input.value.split_whitespace().last().map(str::to_string))
        else {
            return;
        };
        page.update("colorButton", |el| el.text = format!("Button: {color}"));
        page.update("readOnlyField", |el| el.value.clone_from(&color));
        page.update("paragraph", |el| el.text = format!("Paragraph in {color}"));
    });

    // Hover menu
    page.add(
        MockElement::new("div")
            .with_id("hoverMenu")
            .with_class("hover-dropdown")
            .with_text("Hover menu")
            .with_rect(BoundingBox::new(20, 300, 120, 30)),
    );
    for (id, label) in [("optionSelenium", "Selenium"), ("optionPlaywright", "Playwright")] {
        page.add(
            MockElement::new("a")
                .with_id(id)
                .with_attribute("href", "#")
                .with_text(label)
                .hidden(),
        );
        page.on_click(id, move |page| {
            page.update("dynamicSubhead", |el| el.text = format!("Dynamic subhead: {label}"));
        });
    }
    page.on_hover("hoverMenu", |page| {
        for id in ["optionSelenium", "optionPlaywright"] {
            page.update(id, |el| el.displayed = true);
        }
    });

    // Meter dropdown
    let mut select = MockElement::new("select").with_id("meterSelect");
    for level in [25, 50, 75, 100] {
        select = select.with_option(level.to_string(), format!("Level {level}"));
    }
    page.add(select);
    page.add(MockElement::new("label").with_id("meterLabel").with_text("Meter: (25)"));
    page.add(MockElement::new("meter").with_id("meterBar").with_value("25"));
    page.on_change("meterSelect", |page| {
        let Some(level) = page.element("meterSelect").map(|el| el.value.clone()) else {
            return;
        };
        page.update("meterLabel", |el| el.text = format!("Meter: ({level})"));
        page.update("meterBar", |el| el.value.clone_from(&level));
    });

    // Slider
    page.add(
        MockElement::new("input")
            .with_id("slider")
            .with_range(0, 100)
            .with_value("0")
            .with_rect(BoundingBox::new(100, 450, 300, 20)),
    );
    page.add(MockElement::new("progress").with_id("progressBar").with_value("0"));
    page.add(MockElement::new("span").with_id("progressLabel").with_text("Progress: (0)"));
    page.on_change("slider", |page| {
        let Some(value) = page.element("slider").map(|el| el.value.clone()) else {
            return;
        };
        page.update("progressBar", |el| el.value.clone_from(&value));
        page.update("progressLabel", |el| el.text = format!("Progress: ({value})"));
    });

    // Drag and drop, revealed by the checkbox
    page.add(
        MockElement::new("input")
            .with_id("showDragDrop")
            .with_attribute("type", "checkbox"),
    );
    page.add(
        MockElement::new("div")
            .with_id("dropzone1")
            .with_rect(BoundingBox::new(100, 600, 60, 60))
            .hidden(),
    );
    page.add(
        MockElement::new("div")
            .with_id("dropzone2")
            .with_rect(BoundingBox::new(300, 600, 60, 60))
            .hidden(),
    );
    page.add(
        MockElement::new("img")
            .with_id("draggable")
            .with_attribute("draggable", "true")
            .with_rect(BoundingBox::new(105, 605, 50, 50))
            .hidden(),
    );
    page.on_click("showDragDrop", |page| {
        let shown = page.element("showDragDrop").is_some_and(|el| el.selected);
        for id in ["dropzone1", "dropzone2", "draggable"] {
            page.update(id, |el| el.displayed = shown);
        }
    });

    // SVG rectangle
    page.add(
        MockElement::new("rect")
            .with_id("svgRect")
            .with_css("width", "200px")
            .with_rect(BoundingBox::new(20, 800, 200, 40)),
    );
    page.on_click("svgRect", |page| {
        page.update("svgRect", |el| {
            let _ = el.css.insert("width".to_string(), "100px".to_string());
            el.rect.width = 100;
        });
    });

    // Radio buttons
    page.add(
        MockElement::new("input")
            .with_attribute("type", "radio")
            .with_name("radios")
            .with_value("radio1")
            .checked(),
    );
    page.add(
        MockElement::new("input")
            .with_attribute("type", "radio")
            .with_name("radios")
            .with_value("radio2"),
    );

    // Frames
    page.add(MockElement::new("iframe").with_name("iframe2"));
    page.add(MockElement::new("iframe").with_name("iframe3"));
    page.add_frame(
        "iframe2",
        vec![MockElement::new("body").with_text("Hello from iframe 2")],
    );
    page.add_frame(
        "iframe3",
        vec![
            MockElement::new("body").with_text("Check me"),
            MockElement::new("input")
                .with_id("iframeCheckbox")
                .with_attribute("type", "checkbox"),
        ],
    );

    page
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, WebDriver};
    use crate::locator::Selector;

    #[test]
    fn test_color_button_applies_last_word() {
        let mut driver = MockDriver::with_page(demo_page());
        let input = driver.find_element(&Selector::id("textInput")).unwrap();
        driver.send_keys(&input, "Red: for Red").unwrap();
        let button = driver.find_element(&Selector::id("colorButton")).unwrap();
        driver.click(&button).unwrap();
        assert_eq!(driver.text(&button).unwrap(), "Button: Red");
        assert_eq!(driver.page().element("readOnlyField").unwrap().value, "Red");
    }

    #[test]
    fn test_color_button_without_input_keeps_color() {
        let mut driver = MockDriver::with_page(demo_page());
        let button = driver.find_element(&Selector::id("colorButton")).unwrap();
        driver.click(&button).unwrap();
        assert_eq!(driver.text(&button).unwrap(), "Button: Blue");
    }

    #[test]
    fn test_hover_reveals_links() {
        let mut driver = MockDriver::with_page(demo_page());
        let link = driver.find_element(&Selector::LinkText("Selenium".into())).unwrap();
        assert!(!driver.is_displayed(&link).unwrap());
        let menu = driver.find_element(&Selector::css(".hover-dropdown")).unwrap();
        driver.move_to(&menu).unwrap();
        assert!(driver.is_displayed(&link).unwrap());
    }

    #[test]
    fn test_checkbox_reveals_drag_zones() {
        let mut driver = MockDriver::with_page(demo_page());
        let checkbox = driver.find_element(&Selector::id("showDragDrop")).unwrap();
        driver.click(&checkbox).unwrap();
        let item = driver.find_element(&Selector::id("draggable")).unwrap();
        assert!(driver.is_displayed(&item).unwrap());
        driver.click(&checkbox).unwrap();
        assert!(!driver.is_displayed(&item).unwrap());
    }

    #[test]
    fn test_frames_exist() {
        let mut driver = MockDriver::with_page(demo_page());
        driver.switch_to_frame("iframe3").unwrap();
        assert!(driver.find_element(&Selector::id("iframeCheckbox")).is_ok());
    }
}
