//! Browser bindings.
//!
//! Exposes `MinViewportWidth` to JavaScript. The embedding page creates
//! it once the viewport tag is parsed and calls `update()` from its
//! `resize` and `orientationchange` handlers:
//!
//! ```js
//! import init, { MinViewportWidth } from "./minvp_web.js";
//! await init();
//! const viewport = new MinViewportWidth();
//! viewport.update();
//! window.addEventListener("resize", () => viewport.update());
//! ```

use crate::console::ConsoleLayer;
use minvp_core::{HostError, ViewportAdjuster, ViewportHost, viewport_selector};
use tracing::{Level, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

fn platform(err: JsValue) -> HostError {
    HostError::Platform(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// `web-sys` access to the live document and screen.
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Bind to the global window and its document.
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoWindow)?;
        Ok(Self { window, document })
    }
}

impl ViewportHost for WebHost {
    type Element = Element;

    fn find_viewport(&self, meta_name: &str) -> Option<Element> {
        self.document
            .query_selector(&viewport_selector(meta_name))
            .ok()
            .flatten()
    }

    fn content(&self, element: &Element) -> Option<String> {
        element.get_attribute("content")
    }

    fn screen_width(&self) -> Result<u32, HostError> {
        let width = self.window.screen().map_err(platform)?.width().map_err(platform)?;
        u32::try_from(width).map_err(|_| HostError::Platform(format!("invalid screen width {}", width)))
    }

    fn replace_viewport(&mut self, element: &Element, content: &str) -> Result<Element, HostError> {
        let head = self.document.head().ok_or(HostError::NoHead)?;
        let parent = element.parent_node().ok_or(HostError::Detached)?;

        let replacement: Element = element
            .clone_node()
            .map_err(platform)?
            .dyn_into()
            .map_err(|_| HostError::Platform(String::from("cloned viewport is not an element")))?;
        replacement.set_attribute("content", content).map_err(platform)?;

        // Remove and re-append: Firefox ignores in-place content changes
        parent.remove_child(element).map_err(platform)?;
        head.append_child(&replacement).map_err(platform)?;
        Ok(replacement)
    }
}

fn console_sink(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

/// Route `tracing` warnings to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    let layer = ConsoleLayer::new(Level::WARN, Box::new(console_sink));
    // Another module may already own the global subscriber
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Minimum viewport width enforcer for the current page.
#[wasm_bindgen]
pub struct MinViewportWidth {
    inner: Option<(WebHost, ViewportAdjuster<Element>)>,
}

#[wasm_bindgen]
impl MinViewportWidth {
    /// Read `min-width` from the page's viewport tag.
    #[wasm_bindgen(constructor)]
    pub fn new() -> MinViewportWidth {
        let inner = match WebHost::new() {
            Ok(host) => {
                let adjuster = ViewportAdjuster::with_defaults(&host);
                Some((host, adjuster))
            }
            Err(e) => {
                warn!("Minimum viewport width unavailable: {}", e);
                None
            }
        };
        Self { inner }
    }

    /// Re-check the screen width; returns whether the tag was replaced.
    pub fn update(&mut self) -> bool {
        match &mut self.inner {
            Some((host, adjuster)) => adjuster.adjust(host).mutated(),
            None => {
                warn!("Minimum viewport width unavailable: no document");
                false
            }
        }
    }

    /// Configured minimum width, if the viewport tag declared one.
    #[wasm_bindgen(getter, js_name = minWidth)]
    pub fn min_width(&self) -> Option<u32> {
        self.inner.as_ref().and_then(|(_, adjuster)| adjuster.min_width())
    }
}

impl Default for MinViewportWidth {
    fn default() -> Self {
        Self::new()
    }
}
