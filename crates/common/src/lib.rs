//! Shared value types used across the skyscroll crates.

mod types;

pub use types::{Color, ObjectId, Transform};
