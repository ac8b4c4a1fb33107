//! Locator descriptors and their resolution to native selectors.
//!
//! A [`LocatorDescriptor`] is the declarative record a config store hands out
//! (`locator_type` + `locator_hook` + behavioral flags + widget fields). The
//! resolver turns it into a [`Selector`], the driver-native strategy used to
//! find the live element.
//!
//! # Design Philosophy
//!
//! - **Pure resolution**: [`resolve`] has no side effects and no I/O
//! - **Permissive default**: a missing or unrecognized type resolves to an ID
//!   lookup, matching what the page configs have always relied on
//! - **Query generation**: selectors render themselves as DOM queries so any
//!   script-capable backend can locate elements without a WebDriver server

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::result::{PagewrightError, PagewrightResult};

/// Locator-type tag as written in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorType {
    /// Element `id` attribute
    #[serde(rename = "ID")]
    Id,
    /// XPath expression
    #[serde(rename = "XPATH")]
    XPath,
    /// Exact anchor text
    #[serde(rename = "LINK_TEXT")]
    LinkText,
    /// Substring of anchor text
    #[serde(rename = "PARTIAL_LINK_TEXT")]
    PartialLinkText,
    /// Element `name` attribute
    #[serde(rename = "NAME")]
    Name,
    /// Tag name
    #[serde(rename = "TAG_NAME")]
    TagName,
    /// Single class name
    #[serde(rename = "CLASS_NAME")]
    ClassName,
    /// CSS selector
    #[serde(rename = "CSS_SELECTOR")]
    CssSelector,
    /// Any other tag; resolves like [`LocatorType::Id`]
    #[serde(rename = "UNRECOGNIZED", other)]
    Unrecognized,
}

impl LocatorType {
    /// All recognized tags, in config order
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::XPath,
        Self::LinkText,
        Self::PartialLinkText,
        Self::Name,
        Self::TagName,
        Self::ClassName,
        Self::CssSelector,
    ];

    /// Parse a tag string; anything unknown becomes [`LocatorType::Unrecognized`]
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ID" => Self::Id,
            "XPATH" => Self::XPath,
            "LINK_TEXT" => Self::LinkText,
            "PARTIAL_LINK_TEXT" => Self::PartialLinkText,
            "NAME" => Self::Name,
            "TAG_NAME" => Self::TagName,
            "CLASS_NAME" => Self::ClassName,
            "CSS_SELECTOR" => Self::CssSelector,
            _ => Self::Unrecognized,
        }
    }

    /// Tag string for this type
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::XPath => "XPATH",
            Self::LinkText => "LINK_TEXT",
            Self::PartialLinkText => "PARTIAL_LINK_TEXT",
            Self::Name => "NAME",
            Self::TagName => "TAG_NAME",
            Self::ClassName => "CLASS_NAME",
            Self::CssSelector => "CSS_SELECTOR",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl fmt::Display for LocatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Declarative record identifying how to locate a page element.
///
/// Widget-specific fields (iframe name, expected text, offsets, expected
/// progress values, radio flags) live in `extra` and are read through the
/// typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorDescriptor {
    /// Locator type; absent means ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator_type: Option<LocatorType>,
    /// Value handed to the locator strategy
    pub locator_hook: String,
    /// Clear the field before typing into it
    #[serde(default)]
    pub clear_required: bool,
    /// Widget-specific fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LocatorDescriptor {
    /// Create a descriptor with an explicit type
    #[must_use]
    pub fn new(locator_type: LocatorType, hook: impl Into<String>) -> Self {
        Self {
            locator_type: Some(locator_type),
            locator_hook: hook.into(),
            clear_required: false,
            extra: BTreeMap::new(),
        }
    }

    /// Create a descriptor without a type tag (resolves as ID)
    #[must_use]
    pub fn untyped(hook: impl Into<String>) -> Self {
        Self {
            locator_type: None,
            locator_hook: hook.into(),
            clear_required: false,
            extra: BTreeMap::new(),
        }
    }

    /// Set the clear-before-typing flag
    #[must_use]
    pub const fn with_clear_required(mut self, clear: bool) -> Self {
        self.clear_required = clear;
        self
    }

    /// Attach a widget-specific field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.extra.insert(key.into(), value.into());
        self
    }

    /// Effective locator type (ID when absent)
    #[must_use]
    pub fn effective_type(&self) -> LocatorType {
        self.locator_type.unwrap_or(LocatorType::Id)
    }

    /// Raw widget field
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Widget field as a string; numbers and booleans are rendered
    pub fn str_field(&self, key: &str) -> PagewrightResult<String> {
        match self.extra.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(PagewrightError::invalid_config(format!(
                "field '{key}' of '{}' is not a scalar: {other}",
                self.locator_hook
            ))),
            None => Err(PagewrightError::not_found(format!(
                "{}.{key}",
                self.locator_hook
            ))),
        }
    }

    /// Widget field as an integer (numeric strings accepted)
    pub fn i64_field(&self, key: &str) -> PagewrightResult<i64> {
        match self.extra.get(key) {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
                PagewrightError::invalid_config(format!("field '{key}' is not an integer: {n}"))
            }),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| {
                PagewrightError::invalid_config(format!("field '{key}' is not an integer: {s}"))
            }),
            Some(other) => Err(PagewrightError::invalid_config(format!(
                "field '{key}' is not an integer: {other}"
            ))),
            None => Err(PagewrightError::not_found(format!(
                "{}.{key}",
                self.locator_hook
            ))),
        }
    }

    /// Widget field as a boolean (`"true"`/`"false"` and 0/1 accepted)
    pub fn bool_field(&self, key: &str) -> PagewrightResult<bool> {
        match self.extra.get(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) if n.as_i64() == Some(0) => Ok(false),
            Some(Value::Number(n)) if n.as_i64() == Some(1) => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) => Err(PagewrightError::invalid_config(format!(
                "field '{key}' is not a boolean: {other}"
            ))),
            None => Err(PagewrightError::not_found(format!(
                "{}.{key}",
                self.locator_hook
            ))),
        }
    }
}

/// Driver-native locator strategy with its value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Lookup by `id`
    Id(String),
    /// XPath expression
    XPath(String),
    /// Anchor whose trimmed text equals the value
    LinkText(String),
    /// Anchor whose text contains the value
    PartialLinkText(String),
    /// Lookup by `name` attribute
    Name(String),
    /// Lookup by tag name
    TagName(String),
    /// Lookup by a single class name
    ClassName(String),
    /// CSS selector
    Css(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an ID selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Strategy name as WebDriver spells it
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::XPath(_) => "xpath",
            Self::LinkText(_) => "link text",
            Self::PartialLinkText(_) => "partial link text",
            Self::Name(_) => "name",
            Self::TagName(_) => "tag name",
            Self::ClassName(_) => "class name",
            Self::Css(_) => "css selector",
        }
    }

    /// The value the strategy searches for
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v)
            | Self::XPath(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v)
            | Self::Name(v)
            | Self::TagName(v)
            | Self::ClassName(v)
            | Self::Css(v) => v,
        }
    }

    /// JavaScript expression yielding the first match inside `doc`
    /// (an expression evaluating to a `Document`), or `null`.
    #[must_use]
    pub fn to_query(&self, doc: &str) -> String {
        match self {
            Self::Id(id) => format!("{doc}.getElementById({id:?})"),
            Self::XPath(x) => format!(
                "{doc}.evaluate({x:?}, {doc}, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            ),
            Self::LinkText(t) => format!(
                "Array.from({doc}.querySelectorAll('a')).find(el => el.textContent.trim() === {t:?}) || null"
            ),
            Self::PartialLinkText(t) => format!(
                "Array.from({doc}.querySelectorAll('a')).find(el => el.textContent.includes({t:?})) || null"
            ),
            Self::Name(n) => format!("{doc}.getElementsByName({n:?})[0] || null"),
            Self::TagName(t) => format!("{doc}.getElementsByTagName({t:?})[0] || null"),
            Self::ClassName(c) => format!("{doc}.getElementsByClassName({c:?})[0] || null"),
            Self::Css(s) => format!("{doc}.querySelector({s:?})"),
        }
    }

    /// JavaScript expression counting matches inside `doc`
    #[must_use]
    pub fn to_count_query(&self, doc: &str) -> String {
        match self {
            Self::Id(id) => format!("({doc}.getElementById({id:?}) ? 1 : 0)"),
            Self::XPath(x) => format!(
                "{doc}.evaluate({x:?}, {doc}, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
            ),
            Self::LinkText(t) => format!(
                "Array.from({doc}.querySelectorAll('a')).filter(el => el.textContent.trim() === {t:?}).length"
            ),
            Self::PartialLinkText(t) => format!(
                "Array.from({doc}.querySelectorAll('a')).filter(el => el.textContent.includes({t:?})).length"
            ),
            Self::Name(n) => format!("{doc}.getElementsByName({n:?}).length"),
            Self::TagName(t) => format!("{doc}.getElementsByTagName({t:?}).length"),
            Self::ClassName(c) => format!("{doc}.getElementsByClassName({c:?}).length"),
            Self::Css(s) => format!("{doc}.querySelectorAll({s:?}).length"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.strategy(), self.value())
    }
}

/// Resolve a descriptor to its native selector.
///
/// Missing and unrecognized types resolve to [`Selector::Id`]. This accepts
/// malformed config silently, so the unrecognized case is logged.
#[must_use]
pub fn resolve(descriptor: &LocatorDescriptor) -> Selector {
    let hook = descriptor.locator_hook.clone();
    match descriptor.effective_type() {
        LocatorType::XPath => Selector::XPath(hook),
        LocatorType::LinkText => Selector::LinkText(hook),
        LocatorType::PartialLinkText => Selector::PartialLinkText(hook),
        LocatorType::Name => Selector::Name(hook),
        LocatorType::TagName => Selector::TagName(hook),
        LocatorType::ClassName => Selector::ClassName(hook),
        LocatorType::CssSelector => Selector::Css(hook),
        LocatorType::Id => Selector::Id(hook),
        LocatorType::Unrecognized => {
            tracing::warn!(hook = %hook, "unrecognized locator type, falling back to ID");
            Selector::Id(hook)
        }
    }
}

/// A point in page coordinates (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i64,
    /// Y coordinate
    pub y: i64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Bounding box for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: i64,
    /// Y position
    pub y: i64,
    /// Width
    pub width: i64,
    /// Height
    pub height: i64,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the center point
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a point is inside this bounding box
    #[must_use]
    pub const fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_each_type_resolves_to_its_strategy() {
            let cases = [
                (LocatorType::Id, Selector::Id("hook".into())),
                (LocatorType::XPath, Selector::XPath("hook".into())),
                (LocatorType::LinkText, Selector::LinkText("hook".into())),
                (
                    LocatorType::PartialLinkText,
                    Selector::PartialLinkText("hook".into()),
                ),
                (LocatorType::Name, Selector::Name("hook".into())),
                (LocatorType::TagName, Selector::TagName("hook".into())),
                (LocatorType::ClassName, Selector::ClassName("hook".into())),
                (LocatorType::CssSelector, Selector::Css("hook".into())),
            ];
            for (ty, expected) in cases {
                assert_eq!(resolve(&LocatorDescriptor::new(ty, "hook")), expected);
            }
        }

        #[test]
        fn test_missing_type_defaults_to_id() {
            let descriptor = LocatorDescriptor::untyped("textInput");
            assert_eq!(resolve(&descriptor), Selector::Id("textInput".into()));
        }

        #[test]
        fn test_unrecognized_type_defaults_to_id() {
            let descriptor: LocatorDescriptor = serde_json::from_str(
                r#"{"locator_type": "ACCESSIBILITY_ID", "locator_hook": "btn"}"#,
            )
            .unwrap();
            assert_eq!(descriptor.locator_type, Some(LocatorType::Unrecognized));
            assert_eq!(resolve(&descriptor), Selector::Id("btn".into()));
        }

        #[test]
        fn test_resolve_does_not_touch_descriptor() {
            let descriptor = LocatorDescriptor::new(LocatorType::XPath, "//div")
                .with_clear_required(true)
                .with_field("iframe_name", "iframe2");
            let before = descriptor.clone();
            let _ = resolve(&descriptor);
            assert_eq!(descriptor, before);
        }
    }

    mod locator_type_tests {
        use super::*;

        #[test]
        fn test_tag_round_trip() {
            for ty in LocatorType::ALL {
                assert_eq!(LocatorType::from_tag(ty.as_tag()), ty);
            }
        }

        #[test]
        fn test_unknown_tag() {
            assert_eq!(LocatorType::from_tag("xpath"), LocatorType::Unrecognized);
            assert_eq!(LocatorType::from_tag(""), LocatorType::Unrecognized);
        }

        #[test]
        fn test_serde_tags_match_as_tag() {
            for ty in LocatorType::ALL {
                let json = serde_json::to_string(&ty).unwrap();
                assert_eq!(json, format!("\"{}\"", ty.as_tag()));
            }
        }
    }

    mod descriptor_tests {
        use super::*;

        #[test]
        fn test_deserialize_with_widget_fields() {
            let json = r#"{
                "locator_type": "ID",
                "locator_hook": "progressBar",
                "start_progress_value": "0",
                "end_progress_value": "100",
                "x_offset": 350,
                "is_selected": true
            }"#;
            let descriptor: LocatorDescriptor = serde_json::from_str(json).unwrap();
            assert!(!descriptor.clear_required);
            assert_eq!(descriptor.str_field("start_progress_value").unwrap(), "0");
            assert_eq!(descriptor.i64_field("x_offset").unwrap(), 350);
            assert!(descriptor.bool_field("is_selected").unwrap());
        }

        #[test]
        fn test_missing_field_is_not_found() {
            let descriptor = LocatorDescriptor::new(LocatorType::Id, "slider");
            let err = descriptor.i64_field("x_offset").unwrap_err();
            assert!(matches!(err, PagewrightError::ConfigEntryNotFound { .. }));
        }

        #[test]
        fn test_wrongly_typed_field_is_invalid() {
            let descriptor =
                LocatorDescriptor::new(LocatorType::Id, "slider").with_field("x_offset", "far");
            let err = descriptor.i64_field("x_offset").unwrap_err();
            assert!(matches!(err, PagewrightError::InvalidConfig { .. }));
        }

        #[test]
        fn test_untyped_omits_type_on_serialize() {
            let json = serde_json::to_value(LocatorDescriptor::untyped("x")).unwrap();
            assert!(json.get("locator_type").is_none());
            assert_eq!(json["locator_hook"], "x");
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let query = Selector::css("#draggable").to_query("document");
            assert!(query.contains("querySelector"));
            assert!(query.contains("#draggable"));
        }

        #[test]
        fn test_link_text_query_matches_exact_text() {
            let query = Selector::LinkText("Cypress".into()).to_query("document");
            assert!(query.contains("querySelectorAll('a')"));
            assert!(query.contains("=== \"Cypress\""));
        }

        #[test]
        fn test_query_uses_given_document() {
            let query = Selector::id("x").to_query("frameDoc");
            assert!(query.starts_with("frameDoc.getElementById"));
        }

        #[test]
        fn test_count_query() {
            let query = Selector::ClassName("btn".into()).to_count_query("document");
            assert!(query.contains("getElementsByClassName"));
            assert!(query.contains(".length"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::id("button").to_string(), "id=\"button\"");
        }
    }

    mod bounding_box_tests {
        use super::*;

        #[test]
        fn test_center_and_contains() {
            let bbox = BoundingBox::new(10, 20, 100, 50);
            assert_eq!(bbox.center(), Point::new(60, 45));
            assert!(bbox.contains(&Point::new(10, 20)));
            assert!(bbox.contains(&Point::new(110, 70)));
            assert!(!bbox.contains(&Point::new(111, 70)));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_resolve_keeps_hook(hook in "[a-zA-Z0-9_#./\\[\\]=' -]{0,40}", idx in 0usize..8) {
                let ty = LocatorType::ALL[idx];
                let selector = resolve(&LocatorDescriptor::new(ty, hook.clone()));
                prop_assert_eq!(selector.value(), hook.as_str());
            }

            #[test]
            fn prop_unknown_tags_resolve_to_id(tag in "[a-z]{1,12}", hook in "[a-zA-Z]{1,12}") {
                let mut descriptor = LocatorDescriptor::untyped(hook.clone());
                descriptor.locator_type = Some(LocatorType::from_tag(&tag));
                prop_assert_eq!(resolve(&descriptor), Selector::Id(hook));
            }
        }
    }
}
