//! Page scrolling: the only input the scene reacts to.
//!
//! # Invariants
//! - The scroll offset stays within the document's scrollable range.
//! - A scroll notification is produced only when the offset actually changes.

pub mod scroll;

pub use scroll::{PageScroll, PageScrollConfig, ScrollInput};

pub fn crate_info() -> &'static str {
    "skyscroll-input v0.1.0"
}
