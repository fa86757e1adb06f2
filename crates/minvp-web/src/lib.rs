//! Browser build of the minimum viewport width polyfill.
//!
//! Native builds carry only the console layer so the workspace builds
//! without a wasm toolchain. Enable the bindings with `--features web`
//! on a wasm32 target.

mod console;

pub use console::{ConsoleLayer, ConsoleSink};

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{MinViewportWidth, WebHost, start};
