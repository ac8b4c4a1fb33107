//! Scripted in-memory driver for unit and integration tests.
//!
//! A [`MockPage`] is a flat list of [`MockElement`]s for the top-level
//! document plus one list per named frame. Built-in behaviors cover what the
//! page objects exercise: checkboxes toggle, radio buttons select within their
//! `name` group, sliders map drag offsets onto their range, selects switch
//! options. Anything page-specific is scripted with [`PageEffect`] closures
//! keyed by element id.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{ElementHandle, WebDriver};
use crate::locator::{BoundingBox, Point, Selector};
use crate::result::{PagewrightError, PagewrightResult};

/// Page reaction to an interaction
pub type PageEffect = Arc<dyn Fn(&mut MockPage) + Send + Sync>;

/// One element of a scripted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Tag name (lowercase)
    pub tag: String,
    /// `id` attribute
    pub id: Option<String>,
    /// `name` attribute
    pub name: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Rendered text
    pub text: String,
    /// `value` property
    pub value: String,
    /// Other attributes
    pub attributes: BTreeMap<String, String>,
    /// Computed style
    pub css: BTreeMap<String, String>,
    /// Page-space box
    pub rect: BoundingBox,
    /// Rendered
    pub displayed: bool,
    /// Accepts input
    pub enabled: bool,
    /// Checked/selected state
    pub selected: bool,
    /// `(value, text)` pairs for `<select>`
    pub options: Vec<(String, String)>,
    /// `(min, max)` for range inputs
    pub range: Option<(i64, i64)>,
}

impl MockElement {
    /// Visible, enabled element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            id: None,
            name: None,
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            attributes: BTreeMap::new(),
            css: BTreeMap::new(),
            rect: BoundingBox::new(0, 0, 100, 20),
            displayed: true,
            enabled: true,
            selected: false,
            options: Vec::new(),
            range: None,
        }
    }

    /// Set the `id`
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the `name`
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the `value` property
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a computed style value
    #[must_use]
    pub fn with_css(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.css.insert(name.into(), value.into());
        self
    }

    /// Set the bounding box
    #[must_use]
    pub const fn with_rect(mut self, rect: BoundingBox) -> Self {
        self.rect = rect;
        self
    }

    /// Add an `<option>`; the first one added becomes the value
    #[must_use]
    pub fn with_option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        let value = value.into();
        if self.options.is_empty() {
            self.value.clone_from(&value);
        }
        self.options.push((value, text.into()));
        self
    }

    /// Make this a range input
    #[must_use]
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self.with_attribute("type", "range")
    }

    /// Not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Not accepting input
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Checked/selected
    #[must_use]
    pub const fn checked(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Attribute lookup including `id`, `name`, `class` and `value`
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "name" => self.name.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "value" => Some(self.value.clone()),
            _ => self.attributes.get(name).cloned(),
        }
    }

    fn input_type(&self) -> Option<&str> {
        self.attributes.get("type").map(String::as_str)
    }

    fn matches(&self, selector: &Selector) -> PagewrightResult<bool> {
        Ok(match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Name(name) => self.name.as_deref() == Some(name.as_str()),
            Selector::TagName(tag) => self.tag.eq_ignore_ascii_case(tag),
            Selector::ClassName(class) => self.classes.iter().any(|c| c == class),
            Selector::LinkText(text) => self.tag == "a" && self.text.trim() == text.as_str(),
            Selector::PartialLinkText(text) => self.tag == "a" && self.text.contains(text.as_str()),
            Selector::Css(css) => SimpleCss::parse(css)?.matches(self),
            Selector::XPath(xpath) => SimpleXPath::parse(xpath)?.matches(self),
        })
    }
}

/// Scripted page: top-level elements, named frames and effects
#[derive(Clone, Default)]
pub struct MockPage {
    elements: Vec<MockElement>,
    frames: BTreeMap<String, Vec<MockElement>>,
    on_click: HashMap<String, Vec<PageEffect>>,
    on_hover: HashMap<String, Vec<PageEffect>>,
    on_change: HashMap<String, Vec<PageEffect>>,
    on_drop: HashMap<String, Vec<PageEffect>>,
}

impl fmt::Debug for MockPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPage")
            .field("elements", &self.elements.len())
            .field("frames", &self.frames.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MockPage {
    /// Empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level element
    pub fn add(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Add a named frame with its elements
    pub fn add_frame(&mut self, name: impl Into<String>, elements: Vec<MockElement>) {
        let _ = self.frames.insert(name.into(), elements);
    }

    /// Run `effect` after the element with `id` is clicked
    pub fn on_click<F>(&mut self, id: &str, effect: F)
    where
        F: Fn(&mut Self) + Send + Sync + 'static,
    {
        self.on_click.entry(id.to_string()).or_default().push(Arc::new(effect));
    }

    /// Run `effect` when the pointer moves over the element with `id`
    pub fn on_hover<F>(&mut self, id: &str, effect: F)
    where
        F: Fn(&mut Self) + Send + Sync + 'static,
    {
        self.on_hover.entry(id.to_string()).or_default().push(Arc::new(effect));
    }

    /// Run `effect` after the value of the element with `id` changes
    pub fn on_change<F>(&mut self, id: &str, effect: F)
    where
        F: Fn(&mut Self) + Send + Sync + 'static,
    {
        self.on_change.entry(id.to_string()).or_default().push(Arc::new(effect));
    }

    /// Run `effect` after something is dropped on the element with `id`
    pub fn on_drop<F>(&mut self, id: &str, effect: F)
    where
        F: Fn(&mut Self) + Send + Sync + 'static,
    {
        self.on_drop.entry(id.to_string()).or_default().push(Arc::new(effect));
    }

    /// Element by id, searching the top level first, then every frame
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&MockElement> {
        self.elements
            .iter()
            .chain(self.frames.values().flatten())
            .find(|el| el.id.as_deref() == Some(id))
    }

    /// Mutable element by id, searching the top level first, then every frame
    pub fn element_mut(&mut self, id: &str) -> Option<&mut MockElement> {
        self.elements
            .iter_mut()
            .chain(self.frames.values_mut().flatten())
            .find(|el| el.id.as_deref() == Some(id))
    }

    /// Apply `update` to the element with `id`, if present
    pub fn update(&mut self, id: &str, update: impl FnOnce(&mut MockElement)) {
        if let Some(element) = self.element_mut(id) {
            update(element);
        }
    }

    fn document(&self, frame: Option<&str>) -> PagewrightResult<&Vec<MockElement>> {
        match frame {
            None => Ok(&self.elements),
            Some(name) => self
                .frames
                .get(name)
                .ok_or_else(|| PagewrightError::frame(format!("no frame named '{name}'"))),
        }
    }

    fn document_mut(&mut self, frame: Option<&str>) -> PagewrightResult<&mut Vec<MockElement>> {
        match frame {
            None => Ok(&mut self.elements),
            Some(name) => self
                .frames
                .get_mut(name)
                .ok_or_else(|| PagewrightError::frame(format!("no frame named '{name}'"))),
        }
    }

    fn fire(&mut self, trigger: Trigger, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };
        let effects = match trigger {
            Trigger::Click => &self.on_click,
            Trigger::Hover => &self.on_hover,
            Trigger::Change => &self.on_change,
            Trigger::Drop => &self.on_drop,
        };
        let to_run: Vec<PageEffect> = effects.get(id).cloned().unwrap_or_default();
        for effect in to_run {
            effect(self);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Click,
    Hover,
    Change,
    Drop,
}

/// Scripted driver recording every action in `call_history`
#[derive(Debug, Default)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Call history for verification
    pub call_history: Vec<String>,
    page: MockPage,
    pristine: MockPage,
    frame: Option<String>,
    implicit_wait: Duration,
    generation: u64,
    pointer: Option<Point>,
    script_results: HashMap<String, Value>,
    maximized: bool,
    closed: bool,
}

impl MockDriver {
    /// Driver over an empty page with no implicit wait
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver over a scripted page; navigation restores this state
    #[must_use]
    pub fn with_page(page: MockPage) -> Self {
        Self {
            pristine: page.clone(),
            page,
            ..Self::default()
        }
    }

    /// Set the implicit wait
    #[must_use]
    pub const fn with_implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    /// Value returned when `script` is executed
    pub fn set_script_result(&mut self, script: impl Into<String>, result: Value) {
        let _ = self.script_results.insert(script.into(), result);
    }

    /// Live page state
    #[must_use]
    pub const fn page(&self) -> &MockPage {
        &self.page
    }

    /// Mutable page state, for arranging a test
    pub fn page_mut(&mut self) -> &mut MockPage {
        &mut self.page
    }

    /// Last pointer position
    #[must_use]
    pub const fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Whether the window was maximized
    #[must_use]
    pub const fn is_maximized(&self) -> bool {
        self.maximized
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Number of calls starting with `method`
    #[must_use]
    pub fn calls_to(&self, method: &str) -> usize {
        self.call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    fn record(&mut self, call: String) {
        debug!(call = %call, "mock driver");
        self.call_history.push(call);
    }

    fn ensure_open(&self) -> PagewrightResult<()> {
        if self.closed {
            Err(PagewrightError::driver("session is closed"))
        } else {
            Ok(())
        }
    }

    fn index_of(&self, handle: &ElementHandle) -> PagewrightResult<usize> {
        self.ensure_open()?;
        self.ensure_same_frame(handle)?;
        let stale = || PagewrightError::driver(format!("stale element reference: {}", handle.selector));
        let (generation, index) = handle.id.split_once(':').ok_or_else(stale)?;
        if generation.parse::<u64>().ok() != Some(self.generation) {
            return Err(stale());
        }
        let index: usize = index.parse().map_err(|_| stale())?;
        if index < self.page.document(self.frame.as_deref())?.len() {
            Ok(index)
        } else {
            Err(stale())
        }
    }

    fn element(&self, handle: &ElementHandle) -> PagewrightResult<&MockElement> {
        let index = self.index_of(handle)?;
        Ok(&self.page.document(self.frame.as_deref())?[index])
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> PagewrightResult<&mut MockElement> {
        let index = self.index_of(handle)?;
        let frame = self.frame.clone();
        Ok(&mut self.page.document_mut(frame.as_deref())?[index])
    }

    fn interactable(&self, handle: &ElementHandle) -> PagewrightResult<&MockElement> {
        let element = self.element(handle)?;
        if element.displayed {
            Ok(element)
        } else {
            Err(PagewrightError::ElementNotInteractable {
                selector: handle.selector.to_string(),
            })
        }
    }

    /// Radio buttons share their selection within a `name` group
    fn select_radio(&mut self, handle: &ElementHandle) -> PagewrightResult<()> {
        let index = self.index_of(handle)?;
        let frame = self.frame.clone();
        let document = self.page.document_mut(frame.as_deref())?;
        let group = document[index].name.clone();
        for (i, element) in document.iter_mut().enumerate() {
            if i == index {
                element.selected = true;
            } else if group.is_some()
                && element.name == group
                && element.input_type() == Some("radio")
            {
                element.selected = false;
            }
        }
        Ok(())
    }
}

impl WebDriver for MockDriver {
    fn implicit_wait(&self) -> Duration {
        self.implicit_wait
    }

    fn navigate(&mut self, url: &str) -> PagewrightResult<()> {
        self.ensure_open()?;
        self.record(format!("navigate:{url}"));
        self.current_url = url.to_string();
        self.page = self.pristine.clone();
        self.frame = None;
        self.pointer = None;
        self.generation += 1;
        Ok(())
    }

    fn maximize_window(&mut self) -> PagewrightResult<()> {
        self.ensure_open()?;
        self.record("maximize_window".to_string());
        self.maximized = true;
        Ok(())
    }

    fn current_url(&mut self) -> PagewrightResult<String> {
        self.ensure_open()?;
        Ok(self.current_url.clone())
    }

    fn try_find(&mut self, selector: &Selector) -> PagewrightResult<Option<ElementHandle>> {
        self.ensure_open()?;
        let document = self.page.document(self.frame.as_deref())?;
        for (index, element) in document.iter().enumerate() {
            if element.matches(selector)? {
                return Ok(Some(ElementHandle::new(
                    format!("{}:{index}", self.generation),
                    selector.clone(),
                    self.frame.clone(),
                )));
            }
        }
        Ok(None)
    }

    fn switch_to_frame(&mut self, name: &str) -> PagewrightResult<()> {
        self.ensure_open()?;
        if let Some(ref current) = self.frame {
            return Err(PagewrightError::frame(format!(
                "frame '{name}' is not a child of frame '{current}'"
            )));
        }
        if !self.page.frames.contains_key(name) {
            return Err(PagewrightError::frame(format!("no frame named '{name}'")));
        }
        self.record(format!("switch_to_frame:{name}"));
        self.frame = Some(name.to_string());
        Ok(())
    }

    fn switch_to_default_content(&mut self) -> PagewrightResult<()> {
        self.ensure_open()?;
        self.record("switch_to_default_content".to_string());
        self.frame = None;
        Ok(())
    }

    fn current_frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    fn execute_script(&mut self, script: &str) -> PagewrightResult<Value> {
        self.ensure_open()?;
        self.record(format!("execute_script:{script}"));
        Ok(self.script_results.get(script).cloned().unwrap_or(Value::Null))
    }

    fn click(&mut self, element: &ElementHandle) -> PagewrightResult<()> {
        let target = self.interactable(element)?;
        let (id, enabled, kind) = (
            target.id.clone(),
            target.enabled,
            target.input_type().map(str::to_string),
        );
        self.record(format!("click:{}", element.selector));
        if !enabled {
            return Ok(());
        }
        match kind.as_deref() {
            Some("checkbox") => {
                let target = self.element_mut(element)?;
                target.selected = !target.selected;
            }
            Some("radio") => self.select_radio(element)?,
            _ => {}
        }
        self.page.fire(Trigger::Click, id.as_deref());
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> PagewrightResult<()> {
        let _ = self.interactable(element)?;
        self.record(format!("clear:{}", element.selector));
        self.element_mut(element)?.value.clear();
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> PagewrightResult<()> {
        let target = self.interactable(element)?;
        if !target.enabled || target.attributes.contains_key("readonly") {
            return Err(PagewrightError::ElementNotInteractable {
                selector: element.selector.to_string(),
            });
        }
        self.record(format!("send_keys:{}:{text}", element.selector));
        self.element_mut(element)?.value.push_str(text);
        Ok(())
    }

    fn text(&mut self, element: &ElementHandle) -> PagewrightResult<String> {
        let target = self.element(element)?;
        Ok(if target.displayed {
            target.text.clone()
        } else {
            String::new()
        })
    }

    fn property(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> PagewrightResult<Option<String>> {
        let target = self.element(element)?;
        Ok(match name {
            "checked" | "selected" => Some(target.selected.to_string()),
            "disabled" => Some((!target.enabled).to_string()),
            "textContent" | "innerText" => Some(target.text.clone()),
            _ => target.attr(name),
        })
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> PagewrightResult<Option<String>> {
        let target = self.element(element)?;
        Ok(target.attr(name))
    }

    fn css_value(&mut self, element: &ElementHandle, name: &str) -> PagewrightResult<String> {
        Ok(self.element(element)?.css.get(name).cloned().unwrap_or_default())
    }

    fn rect(&mut self, element: &ElementHandle) -> PagewrightResult<BoundingBox> {
        Ok(self.element(element)?.rect)
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> PagewrightResult<bool> {
        Ok(self.element(element)?.displayed)
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> PagewrightResult<bool> {
        Ok(self.element(element)?.enabled)
    }

    fn is_selected(&mut self, element: &ElementHandle) -> PagewrightResult<bool> {
        Ok(self.element(element)?.selected)
    }

    fn move_to(&mut self, element: &ElementHandle) -> PagewrightResult<()> {
        let target = self.interactable(element)?;
        let (id, center) = (target.id.clone(), target.rect.center());
        self.record(format!("move_to:{}", element.selector));
        self.pointer = Some(center);
        self.page.fire(Trigger::Hover, id.as_deref());
        Ok(())
    }

    fn drag_by_offset(
        &mut self,
        element: &ElementHandle,
        dx: i64,
        dy: i64,
    ) -> PagewrightResult<()> {
        let target = self.interactable(element)?;
        let (id, rect, range) = (target.id.clone(), target.rect, target.range);
        self.record(format!("drag_by_offset:{}:{dx},{dy}", element.selector));

        let start = rect.center();
        let end = Point::new(start.x + dx, start.y + dy);
        self.pointer = Some(end);

        if let Some((min, max)) = range {
            let width = rect.width.max(1);
            let along = (end.x - rect.x).clamp(0, width);
            let value = min + (along * (max - min) + width / 2) / width;
            self.element_mut(element)?.value = value.to_string();
            self.page.fire(Trigger::Change, id.as_deref());
        } else {
            let moved = self.element_mut(element)?;
            moved.rect.x += dx;
            moved.rect.y += dy;
        }
        Ok(())
    }

    fn drag_and_drop(
        &mut self,
        source: &ElementHandle,
        target: &ElementHandle,
    ) -> PagewrightResult<()> {
        let _ = self.interactable(source)?;
        let zone = self.interactable(target)?;
        let (zone_id, zone_center) = (zone.id.clone(), zone.rect.center());
        self.record(format!("drag_and_drop:{}->{}", source.selector, target.selector));

        let dragged = self.element_mut(source)?;
        dragged.rect.x = zone_center.x - dragged.rect.width / 2;
        dragged.rect.y = zone_center.y - dragged.rect.height / 2;
        self.pointer = Some(zone_center);
        self.page.fire(Trigger::Drop, zone_id.as_deref());
        Ok(())
    }

    fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> PagewrightResult<()> {
        let target = self.interactable(element)?;
        if !target.options.iter().any(|(v, _)| v == value) {
            return Err(PagewrightError::ElementNotFound {
                selector: format!("{} option[value={value:?}]", element.selector),
            });
        }
        let id = target.id.clone();
        self.record(format!("select_by_value:{}:{value}", element.selector));
        self.element_mut(element)?.value = value.to_string();
        self.page.fire(Trigger::Change, id.as_deref());
        Ok(())
    }

    fn selected_option_text(&mut self, element: &ElementHandle) -> PagewrightResult<String> {
        let target = self.element(element)?;
        target
            .options
            .iter()
            .find(|(v, _)| *v == target.value)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| PagewrightError::ElementNotFound {
                selector: format!("{} option:checked", element.selector),
            })
    }

    fn close(&mut self) -> PagewrightResult<()> {
        self.ensure_open()?;
        self.record("close".to_string());
        self.closed = true;
        Ok(())
    }
}

/// Single compound CSS selector: `tag`, `#id`, `.class` and `[attr=value]`
/// parts without combinators.
#[derive(Debug, Default, PartialEq, Eq)]
struct SimpleCss {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl SimpleCss {
    fn parse(css: &str) -> PagewrightResult<Self> {
        let unsupported =
            || PagewrightError::driver(format!("mock driver cannot evaluate css selector {css:?}"));
        let css = css.trim();
        if css.is_empty() {
            return Err(unsupported());
        }

        let mut parsed = Self::default();
        let mut rest = css;
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '*'))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                parsed.tag = Some(tag.to_ascii_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let body = &rest[1..];
                    let len = body
                        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                        .unwrap_or(body.len());
                    if len == 0 {
                        return Err(unsupported());
                    }
                    let ident = body[..len].to_string();
                    if c == '#' {
                        parsed.id = Some(ident);
                    } else {
                        parsed.classes.push(ident);
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let end = rest.find(']').ok_or_else(unsupported)?;
                    let inner = &rest[1..end];
                    let attribute = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(|c| c == '\'' || c == '"').to_string()),
                        ),
                        None => (inner.trim().to_string(), None),
                    };
                    parsed.attributes.push(attribute);
                    rest = &rest[end + 1..];
                }
                _ => return Err(unsupported()),
            }
        }
        Ok(parsed)
    }

    fn matches(&self, element: &MockElement) -> bool {
        self.tag.as_ref().map_or(true, |tag| *tag == element.tag)
            && self.id.as_ref().map_or(true, |id| element.id.as_ref() == Some(id))
            && self.classes.iter().all(|c| element.classes.contains(c))
            && self.attributes.iter().all(|(name, value)| match value {
                Some(value) => element.attr(name).as_ref() == Some(value),
                None => element.attr(name).is_some(),
            })
    }
}

/// `//tag`, `//*`, optionally with one `[@attr='value']` or `[text()='value']`
/// predicate.
#[derive(Debug, PartialEq, Eq)]
struct SimpleXPath {
    tag: Option<String>,
    predicate: Option<(String, String)>,
}

impl SimpleXPath {
    fn parse(xpath: &str) -> PagewrightResult<Self> {
        let unsupported =
            || PagewrightError::driver(format!("mock driver cannot evaluate xpath {xpath:?}"));
        let body = xpath.trim().strip_prefix("//").ok_or_else(unsupported)?;
        let (tag, predicate) = match body.split_once('[') {
            Some((tag, rest)) => {
                let inner = rest.strip_suffix(']').ok_or_else(unsupported)?;
                let (key, value) = inner.split_once('=').ok_or_else(unsupported)?;
                let key = key.trim();
                let key = if key == "text()" {
                    "text()".to_string()
                } else {
                    key.strip_prefix('@').ok_or_else(unsupported)?.to_string()
                };
                let value = value.trim().trim_matches(|c| c == '\'' || c == '"').to_string();
                (tag, Some((key, value)))
            }
            None => (body, None),
        };
        if tag.is_empty() || tag.contains('/') {
            return Err(unsupported());
        }
        Ok(Self {
            tag: (tag != "*").then(|| tag.to_ascii_lowercase()),
            predicate,
        })
    }

    fn matches(&self, element: &MockElement) -> bool {
        self.tag.as_ref().map_or(true, |tag| *tag == element.tag)
            && self.predicate.as_ref().map_or(true, |(key, value)| {
                if key == "text()" {
                    element.text == *value
                } else {
                    element.attr(key).as_ref() == Some(value)
                }
            })
    }
}
