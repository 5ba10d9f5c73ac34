//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A render pass reads the scene and camera; it never mutates them.
//! - Textures that have not resolved are drawn as if absent.
//!
//! The GPU backend lives in `skyscroll-render-wgpu`; `DebugTextRenderer` gives
//! the same pass a human-readable output for the CLI, logs and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "skyscroll-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
