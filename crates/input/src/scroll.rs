use serde::{Deserialize, Serialize};

/// Document geometry used to bound scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageScrollConfig {
    /// Total document height in logical pixels.
    pub document_height: f32,
    /// Pixels scrolled per wheel line.
    pub line_height: f32,
}

impl Default for PageScrollConfig {
    fn default() -> Self {
        Self {
            document_height: 6000.0,
            line_height: 40.0,
        }
    }
}

/// A scroll request from the host, in logical pixels or lines.
///
/// Positive values move content up (scroll down the page).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    Lines(f32),
    Pixels(f32),
    PageDown,
    PageUp,
    Home,
    End,
}

/// Vertical scroll position of a page shown in a fixed-height viewport.
#[derive(Debug, Clone)]
pub struct PageScroll {
    config: PageScrollConfig,
    viewport_height: f32,
    scrolled: f32,
}

impl PageScroll {
    pub fn new(config: PageScrollConfig, viewport_height: f32) -> Self {
        Self {
            config,
            viewport_height,
            scrolled: 0.0,
        }
    }

    pub fn max_scroll(&self) -> f32 {
        (self.config.document_height - self.viewport_height).max(0.0)
    }

    /// Distance from the document top to the viewport top.
    /// Zero at rest, negative once scrolled down.
    pub fn top(&self) -> f32 {
        -self.scrolled
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
        self.scrolled = self.scrolled.clamp(0.0, self.max_scroll());
    }

    /// Apply an input. Returns the new `top()` if the position moved.
    pub fn apply(&mut self, input: ScrollInput) -> Option<f32> {
        let target = match input {
            ScrollInput::Lines(n) => self.scrolled + n * self.config.line_height,
            ScrollInput::Pixels(px) => self.scrolled + px,
            ScrollInput::PageDown => self.scrolled + self.viewport_height * 0.9,
            ScrollInput::PageUp => self.scrolled - self.viewport_height * 0.9,
            ScrollInput::Home => 0.0,
            ScrollInput::End => self.max_scroll(),
        };
        if !target.is_finite() {
            return None;
        }
        let next = target.clamp(0.0, self.max_scroll());
        if next == self.scrolled {
            return None;
        }
        tracing::trace!(from = self.scrolled, to = next, "page scrolled");
        self.scrolled = next;
        Some(self.top())
    }
}
