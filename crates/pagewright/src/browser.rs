//! Chromium backend over the Chrome `DevTools` Protocol.
//!
//! `CdpDriver` owns a tokio runtime and blocks on every call, so it fits
//! the synchronous [`WebDriver`](crate::driver::WebDriver) trait.
//!
//! - Lookups evaluate the selector's DOM query in the current frame's
//!   document and tag the match with a `data-pagewright-handle` attribute
//!   holding a fresh uuid.
//! - Hover, clicks and drags dispatch real mouse events at the element's
//!   on-screen center.
//! - Typing inserts text through the input domain.

#![cfg_attr(not(feature = "browser"), allow(dead_code))]

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;

/// Attribute that ties a DOM element to an [`ElementHandle`](crate::driver::ElementHandle)
pub const HANDLE_ATTRIBUTE: &str = "data-pagewright-handle";

/// JavaScript string literal for `text`
fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Expression evaluating to the document operations target: the top-level
/// document, or the content document of the named frame (`null` if absent)
fn document_expression(frame: Option<&str>) -> String {
    match frame {
        None => "document".to_string(),
        Some(name) => {
            let name = js_string(name);
            format!(
                "((f) => f ? f.contentDocument : null)(Array.from(document.querySelectorAll('iframe, frame')).find(f => f.name === {name} || f.id === {name}))"
            )
        }
    }
}

/// Expression evaluating to the element carrying handle `id` inside `doc`
fn handle_query(doc: &str, id: &str) -> String {
    format!(
        "{doc}.querySelector('[{HANDLE_ATTRIBUTE}=' + {} + ']')",
        js_string(&js_string(id))
    )
}

/// Script that brings a drag source and its drop target into view together
/// and returns both centers in top-level viewport coordinates, or `null` if
/// either handle is gone.
///
/// Both centers are measured after the only scroll, so neither is stale when
/// the pointer events are dispatched.
fn drag_points_script(doc: &str, source: &str, target: &str) -> String {
    format!(
        "const doc = {doc}; \
         const src = doc && {}; const dst = doc && {}; \
         if (!src || !dst) {{ return null; }} \
         const win = doc.defaultView; \
         const a = src.getBoundingClientRect(); const b = dst.getBoundingClientRect(); \
         const cx = (Math.min(a.left, b.left) + Math.max(a.right, b.right)) / 2; \
         const cy = (Math.min(a.top, b.top) + Math.max(a.bottom, b.bottom)) / 2; \
         win.scrollBy(cx - win.innerWidth / 2, cy - win.innerHeight / 2); \
         const fr = win.frameElement; \
         const o = fr ? fr.getBoundingClientRect() : {{ left: 0, top: 0 }}; \
         const center = (el) => {{ const r = el.getBoundingClientRect(); \
           return [r.left + r.width / 2 + o.left, r.top + r.height / 2 + o.top]; }}; \
         return [center(src), center(dst)];",
        handle_query("doc", source),
        handle_query("doc", target)
    )
}

#[cfg(feature = "browser")]
#[allow(clippy::cast_possible_truncation, clippy::items_after_statements)]
mod cdp {
    use super::{
        document_expression, drag_points_script, handle_query, js_string, HANDLE_ATTRIBUTE,
    };
    use crate::config::DriverConfig;
    use crate::driver::{ElementHandle, WebDriver};
    use crate::locator::{BoundingBox, Selector};
    use crate::result::{PagewrightError, PagewrightResult};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchMouseEventParams, DispatchMouseEventType, InsertTextParams, MouseButton,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use serde_json::Value;
    use std::future::Future;
    use std::time::Duration;
    use tokio::runtime::Runtime;
    use tracing::{debug, info, warn};

    /// Intermediate pointer positions sent during a drag
    const DRAG_STEPS: u32 = 10;

    /// Chromium session driven over CDP
    #[derive(Debug)]
    pub struct CdpDriver {
        config: DriverConfig,
        runtime: Runtime,
        browser: Option<CdpBrowser>,
        page: CdpPage,
        handler: tokio::task::JoinHandle<()>,
        frame: Option<String>,
    }

    #[derive(Deserialize)]
    struct Reply {
        #[serde(default)]
        stale: bool,
        #[serde(default)]
        value: Value,
    }

    impl CdpDriver {
        /// Launch Chromium and open a blank page
        pub fn launch(config: DriverConfig) -> PagewrightResult<Self> {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            let mut builder =
                CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }
            let cdp_config = builder
                .build()
                .map_err(|message| PagewrightError::BrowserLaunch { message })?;

            let (browser, page, handler) = runtime.block_on(async {
                let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                    PagewrightError::BrowserLaunch {
                        message: e.to_string(),
                    }
                })?;
                let handler = tokio::spawn(async move {
                    while let Some(event) = handler.next().await {
                        if event.is_err() {
                            break;
                        }
                    }
                });
                let page = browser.new_page("about:blank").await.map_err(|e| {
                    PagewrightError::BrowserLaunch {
                        message: e.to_string(),
                    }
                })?;
                Ok::<_, PagewrightError>((browser, page, handler))
            })?;

            info!(headless = config.headless, "chromium launched");
            Ok(Self {
                config,
                runtime,
                browser: Some(browser),
                page,
                handler,
                frame: None,
            })
        }

        /// Session configuration
        #[must_use]
        pub const fn config(&self) -> &DriverConfig {
            &self.config
        }

        fn block_on<F: Future>(&self, future: F) -> F::Output {
            self.runtime.block_on(future)
        }

        /// Evaluate `body` as a function body and decode its JSON result
        fn eval<T: DeserializeOwned>(&self, body: &str) -> PagewrightResult<T> {
            let expression = format!("JSON.stringify((() => {{ {body} }})() ?? null)");
            let timeout = self.config.script_timeout;
            let evaluated = self
                .block_on(async {
                    tokio::time::timeout(timeout, self.page.evaluate(expression)).await
                })
                .map_err(|_| PagewrightError::Timeout {
                    ms: timeout.as_millis() as u64,
                    waited_for: "script evaluation".to_string(),
                })?
                .map_err(|e| PagewrightError::Script {
                    message: e.to_string(),
                })?;
            let raw: String = evaluated.into_value().map_err(|e| PagewrightError::Script {
                message: e.to_string(),
            })?;
            Ok(serde_json::from_str(&raw)?)
        }

        /// Evaluate `body` with `el` bound to the element behind `handle`
        fn on_element<T: DeserializeOwned>(
            &self,
            handle: &ElementHandle,
            body: &str,
        ) -> PagewrightResult<T> {
            self.ensure_same_frame(handle)?;
            let doc = document_expression(self.frame.as_deref());
            let script = format!(
                "const doc = {doc}; const el = doc && {}; \
                 if (!el) {{ return {{ stale: true }}; }} \
                 return {{ value: (() => {{ {body} }})() }};",
                handle_query("doc", &handle.id)
            );
            let reply: Reply = self.eval(&script)?;
            if reply.stale {
                return Err(PagewrightError::driver(format!(
                    "stale element reference: {}",
                    handle.selector
                )));
            }
            Ok(serde_json::from_value(reply.value)?)
        }

        fn ensure_interactable(&self, handle: &ElementHandle) -> PagewrightResult<()> {
            if self.displayed(handle)? {
                Ok(())
            } else {
                Err(PagewrightError::ElementNotInteractable {
                    selector: handle.selector.to_string(),
                })
            }
        }

        fn displayed(&self, handle: &ElementHandle) -> PagewrightResult<bool> {
            self.on_element(
                handle,
                "const s = getComputedStyle(el); \
                 return s.display !== 'none' && s.visibility !== 'hidden' && el.getClientRects().length > 0;",
            )
        }

        /// Scroll the element into view and return its center in viewport
        /// coordinates of the top-level window
        fn client_center(&self, handle: &ElementHandle) -> PagewrightResult<(f64, f64)> {
            self.on_element(
                handle,
                "el.scrollIntoView({ block: 'center', inline: 'center' }); \
                 const r = el.getBoundingClientRect(); \
                 const fr = doc.defaultView && doc.defaultView.frameElement; \
                 const o = fr ? fr.getBoundingClientRect() : { left: 0, top: 0 }; \
                 return [r.left + r.width / 2 + o.left, r.top + r.height / 2 + o.top];",
            )
        }

        fn mouse(
            &self,
            kind: DispatchMouseEventType,
            (x, y): (f64, f64),
            held: bool,
        ) -> PagewrightResult<()> {
            let mut builder = DispatchMouseEventParams::builder().r#type(kind).x(x).y(y);
            if held {
                builder = builder.button(MouseButton::Left).buttons(1).click_count(1);
            }
            let params = builder.build().map_err(PagewrightError::driver)?;
            self.block_on(self.page.execute(params))
                .map_err(|e| PagewrightError::driver(e.to_string()))?;
            Ok(())
        }

        /// Press at `from`, glide to `to` in steps and release
        fn drag(&self, from: (f64, f64), to: (f64, f64)) -> PagewrightResult<()> {
            self.mouse(DispatchMouseEventType::MouseMoved, from, false)?;
            self.mouse(DispatchMouseEventType::MousePressed, from, true)?;
            for step in 1..=DRAG_STEPS {
                let t = f64::from(step) / f64::from(DRAG_STEPS);
                let point = (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
                self.mouse(DispatchMouseEventType::MouseMoved, point, true)?;
            }
            self.mouse(DispatchMouseEventType::MouseReleased, to, true)
        }
    }

    impl WebDriver for CdpDriver {
        fn implicit_wait(&self) -> Duration {
            self.config.implicit_wait
        }

        fn navigate(&mut self, url: &str) -> PagewrightResult<()> {
            let timeout = self.config.navigation_timeout;
            let navigation = |message: String| PagewrightError::Navigation {
                url: url.to_string(),
                message,
            };
            self.block_on(async { tokio::time::timeout(timeout, self.page.goto(url)).await })
                .map_err(|_| navigation(format!("no load within {}ms", timeout.as_millis())))?
                .map_err(|e| navigation(e.to_string()))?;
            self.frame = None;
            debug!(url, "navigated");
            Ok(())
        }

        fn maximize_window(&mut self) -> PagewrightResult<()> {
            let (width, height): (i64, i64) =
                self.eval("return [screen.availWidth, screen.availHeight];")?;
            let params = SetDeviceMetricsOverrideParams::new(width, height, 0.0, false);
            self.block_on(self.page.execute(params))
                .map_err(|e| PagewrightError::driver(e.to_string()))?;
            debug!(width, height, "window maximized");
            Ok(())
        }

        fn current_url(&mut self) -> PagewrightResult<String> {
            let url = self
                .block_on(self.page.url())
                .map_err(|e| PagewrightError::driver(e.to_string()))?;
            Ok(url.unwrap_or_default())
        }

        fn try_find(&mut self, selector: &Selector) -> PagewrightResult<Option<ElementHandle>> {
            let doc = document_expression(self.frame.as_deref());
            let candidate = uuid::Uuid::new_v4().to_string();
            let script = format!(
                "const doc = {doc}; if (!doc) {{ return null; }} \
                 const el = {}; if (!el) {{ return null; }} \
                 if (!el.hasAttribute('{HANDLE_ATTRIBUTE}')) {{ el.setAttribute('{HANDLE_ATTRIBUTE}', {}); }} \
                 return el.getAttribute('{HANDLE_ATTRIBUTE}');",
                selector.to_query("doc"),
                js_string(&candidate)
            );
            let found: Option<String> = self.eval(&script)?;
            Ok(found.map(|id| ElementHandle::new(id, selector.clone(), self.frame.clone())))
        }

        fn switch_to_frame(&mut self, name: &str) -> PagewrightResult<()> {
            if let Some(ref current) = self.frame {
                return Err(PagewrightError::frame(format!(
                    "frame '{name}' is not a child of frame '{current}'"
                )));
            }
            let exists: bool = self.eval(&format!(
                "return {} !== null;",
                document_expression(Some(name))
            ))?;
            if !exists {
                return Err(PagewrightError::frame(format!("no frame named '{name}'")));
            }
            self.frame = Some(name.to_string());
            debug!(frame = name, "switched to frame");
            Ok(())
        }

        fn switch_to_default_content(&mut self) -> PagewrightResult<()> {
            self.frame = None;
            Ok(())
        }

        fn current_frame(&self) -> Option<&str> {
            self.frame.as_deref()
        }

        fn execute_script(&mut self, script: &str) -> PagewrightResult<Value> {
            self.eval(script)
        }

        fn click(&mut self, element: &ElementHandle) -> PagewrightResult<()> {
            self.ensure_interactable(element)?;
            let center = self.client_center(element)?;
            self.mouse(DispatchMouseEventType::MouseMoved, center, false)?;
            self.mouse(DispatchMouseEventType::MousePressed, center, true)?;
            self.mouse(DispatchMouseEventType::MouseReleased, center, true)
        }

        fn clear(&mut self, element: &ElementHandle) -> PagewrightResult<()> {
            self.ensure_interactable(element)?;
            self.on_element::<Value>(
                element,
                "el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true })); \
                 el.dispatchEvent(new Event('change', { bubbles: true })); return null;",
            )?;
            Ok(())
        }

        fn send_keys(&mut self, element: &ElementHandle, text: &str) -> PagewrightResult<()> {
            self.ensure_interactable(element)?;
            let editable: bool = self.on_element(
                element,
                "if (el.readOnly || el.disabled) { return false; } \
                 el.focus(); \
                 if (typeof el.setSelectionRange === 'function') { \
                   try { el.setSelectionRange(el.value.length, el.value.length); } catch (_) {} \
                 } \
                 return true;",
            )?;
            if !editable {
                return Err(PagewrightError::ElementNotInteractable {
                    selector: element.selector.to_string(),
                });
            }
            self.block_on(self.page.execute(InsertTextParams::new(text)))
                .map_err(|e| PagewrightError::driver(e.to_string()))?;
            Ok(())
        }

        fn text(&mut self, element: &ElementHandle) -> PagewrightResult<String> {
            self.on_element(
                element,
                "return (el.innerText ?? el.textContent ?? '').trim();",
            )
        }

        fn property(
            &mut self,
            element: &ElementHandle,
            name: &str,
        ) -> PagewrightResult<Option<String>> {
            self.on_element(
                element,
                &format!(
                    "const v = el[{}]; return v === undefined || v === null ? null : String(v);",
                    js_string(name)
                ),
            )
        }

        fn attribute(
            &mut self,
            element: &ElementHandle,
            name: &str,
        ) -> PagewrightResult<Option<String>> {
            let name = js_string(name);
            self.on_element(
                element,
                &format!(
                    "const p = el[{name}]; \
                     if (p !== undefined && p !== null && typeof p !== 'object' && typeof p !== 'function') {{ return String(p); }} \
                     return el.getAttribute({name});"
                ),
            )
        }

        fn css_value(&mut self, element: &ElementHandle, name: &str) -> PagewrightResult<String> {
            self.on_element(
                element,
                &format!(
                    "return getComputedStyle(el).getPropertyValue({});",
                    js_string(name)
                ),
            )
        }

        fn rect(&mut self, element: &ElementHandle) -> PagewrightResult<BoundingBox> {
            let [x, y, width, height]: [f64; 4] = self.on_element(
                element,
                "const r = el.getBoundingClientRect(); \
                 const fr = doc.defaultView && doc.defaultView.frameElement; \
                 const o = fr ? fr.getBoundingClientRect() : { left: 0, top: 0 }; \
                 return [r.left + o.left + window.scrollX, r.top + o.top + window.scrollY, r.width, r.height];",
            )?;
            Ok(BoundingBox::new(
                x.round() as i64,
                y.round() as i64,
                width.round() as i64,
                height.round() as i64,
            ))
        }

        fn is_displayed(&mut self, element: &ElementHandle) -> PagewrightResult<bool> {
            self.displayed(element)
        }

        fn is_enabled(&mut self, element: &ElementHandle) -> PagewrightResult<bool> {
            self.on_element(element, "return !el.disabled;")
        }

        fn is_selected(&mut self, element: &ElementHandle) -> PagewrightResult<bool> {
            self.on_element(element, "return !!(el.checked || el.selected);")
        }

        fn move_to(&mut self, element: &ElementHandle) -> PagewrightResult<()> {
            self.ensure_interactable(element)?;
            let center = self.client_center(element)?;
            self.mouse(DispatchMouseEventType::MouseMoved, center, false)
        }

        fn drag_by_offset(
            &mut self,
            element: &ElementHandle,
            dx: i64,
            dy: i64,
        ) -> PagewrightResult<()> {
            self.ensure_interactable(element)?;
            let from = self.client_center(element)?;
            let to = (from.0 + dx as f64, from.1 + dy as f64);
            self.drag(from, to)
        }

        fn drag_and_drop(
            &mut self,
            source: &ElementHandle,
            target: &ElementHandle,
        ) -> PagewrightResult<()> {
            self.ensure_interactable(source)?;
            self.ensure_interactable(target)?;
            let doc = document_expression(self.frame.as_deref());
            let points: Option<[(f64, f64); 2]> =
                self.eval(&drag_points_script(&doc, &source.id, &target.id))?;
            let Some([from, to]) = points else {
                return Err(PagewrightError::driver(format!(
                    "stale element reference: {} or {}",
                    source.selector, target.selector
                )));
            };
            debug!(?from, ?to, "dragging");
            self.drag(from, to)
        }

        fn select_by_value(&mut self, element: &ElementHandle, value: &str) -> PagewrightResult<()> {
            self.ensure_interactable(element)?;
            let selected: bool = self.on_element(
                element,
                &format!(
                    "const v = {}; \
                     if (!Array.from(el.options).some(o => o.value === v)) {{ return false; }} \
                     el.value = v; \
                     el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                     el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                     return true;",
                    js_string(value)
                ),
            )?;
            if selected {
                Ok(())
            } else {
                Err(PagewrightError::ElementNotFound {
                    selector: format!("{} option[value={value:?}]", element.selector),
                })
            }
        }

        fn selected_option_text(&mut self, element: &ElementHandle) -> PagewrightResult<String> {
            let text: Option<String> = self.on_element(
                element,
                "const o = el.selectedOptions && el.selectedOptions[0]; return o ? o.text : null;",
            )?;
            text.ok_or_else(|| PagewrightError::ElementNotFound {
                selector: format!("{} option:checked", element.selector),
            })
        }

        fn close(&mut self) -> PagewrightResult<()> {
            let Some(mut browser) = self.browser.take() else {
                return Err(PagewrightError::driver("session is closed"));
            };
            let closed = self.block_on(browser.close());
            self.handler.abort();
            closed.map_err(|e| PagewrightError::driver(e.to_string()))?;
            info!("chromium closed");
            Ok(())
        }
    }

    impl Drop for CdpDriver {
        fn drop(&mut self) {
            if let Some(mut browser) = self.browser.take() {
                if let Err(err) = self.runtime.block_on(browser.close()) {
                    warn!(error = %err, "failed to close chromium");
                }
                self.handler.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("iframe2"), "\"iframe2\"");
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_top_level_document() {
        assert_eq!(document_expression(None), "document");
    }

    #[test]
    fn test_frame_document_looks_up_name_and_id() {
        let expr = document_expression(Some("iframe3"));
        assert!(expr.contains("f.name === \"iframe3\""));
        assert!(expr.contains("f.id === \"iframe3\""));
        assert!(expr.contains("contentDocument"));
    }

    #[test]
    fn test_handle_query_quotes_the_id() {
        let query = handle_query("doc", "1234-abcd");
        assert_eq!(
            query,
            r#"doc.querySelector('[data-pagewright-handle=' + "\"1234-abcd\"" + ']')"#
        );
    }

    #[test]
    fn test_drag_points_measured_after_the_only_scroll() {
        let script = drag_points_script("document", "src-id", "dst-id");
        let scroll = script.find("scrollBy").unwrap();
        assert_eq!(script.matches("scrollBy").count(), 1);
        assert!(!script.contains("scrollIntoView"));
        let measure = script.find("return [center(src), center(dst)]").unwrap();
        assert!(measure > scroll);
        assert!(script.contains("\\\"src-id\\\""));
        assert!(script.contains("\\\"dst-id\\\""));
    }
}
