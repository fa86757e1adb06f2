//! minvp - Minimum Viewport Width
//!
//! Adds a `min-width` directive to the viewport meta tag. When the
//! device screen is narrower than that minimum, the tag's `width` is
//! rewritten to the minimum so the page lays out at the width it was
//! designed for and the browser scales it down to fit.
//!
//! # Lifecycle
//!
//! 1. [`ViewportAdjuster::initialize`] runs once after the viewport tag
//!    is in the document and caches the minimum width.
//! 2. [`ViewportAdjuster::adjust`] runs on load, resize and orientation
//!    change. It replaces the tag only when the screen is too narrow.
//!
//! The document is reached through [`ViewportHost`]; the browser bindings
//! live in `minvp-web` and [`MemoryDocument`] serves native callers.

mod adjuster;
mod config;
mod directive;
mod host;
mod memory;

pub use adjuster::{AdjustOutcome, AdjusterError, Phase, ViewportAdjuster};
pub use config::{AdjusterConfig, ConfigError};
pub use directive::{ConfigurationError, Directive, ViewportContent, parse_min_width, rewrite_width};
pub use host::{HostError, ViewportHost, viewport_selector};
pub use memory::{ElementId, MemoryDocument, MetaElement};
