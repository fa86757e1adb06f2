//! DOM access for the adjuster.
//!
//! The adjuster never touches a document directly. Everything it needs
//! from the page goes through [`ViewportHost`], implemented by the
//! `web-sys` bindings in the browser and by [`MemoryDocument`] natively.
//!
//! [`MemoryDocument`]: crate::MemoryDocument

use thiserror::Error;

/// Errors reported by a host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("No window object available")]
    NoWindow,

    #[error("Document has no head element")]
    NoHead,

    #[error("Viewport element is no longer attached to the document")]
    Detached,

    #[error("Platform error: {0}")]
    Platform(String),
}

/// CSS selector matching `<meta name="{meta_name}">`.
pub fn viewport_selector(meta_name: &str) -> String {
    format!("meta[name=\"{}\"]", meta_name)
}

/// Document and screen access used by [`ViewportAdjuster`].
///
/// [`ViewportAdjuster`]: crate::ViewportAdjuster
pub trait ViewportHost {
    /// Handle to a meta element
    type Element: Clone;

    /// Locate `<meta name="{meta_name}">` in the document.
    fn find_viewport(&self, meta_name: &str) -> Option<Self::Element>;

    /// Current `content` attribute of an element.
    fn content(&self, element: &Self::Element) -> Option<String>;

    /// Screen width in CSS pixels.
    fn screen_width(&self) -> Result<u32, HostError>;

    /// Detach `element` and append a copy carrying `content` to the head.
    ///
    /// The element is never mutated in place: some engines only re-read
    /// viewport settings when the tag itself is inserted.
    fn replace_viewport(
        &mut self,
        element: &Self::Element,
        content: &str,
    ) -> Result<Self::Element, HostError>;
}
