//! Texture loading for the scene.
//!
//! A load request returns a [`TextureHandle`] at once; the image arrives
//! later. Materials and the scene background hold the handle and pick up the
//! image whenever it has resolved. Nothing waits on a handle in the render
//! path.
//!
//! # Invariants
//! - A handle resolves at most once; later resolutions are ignored.
//! - A failed load never panics the caller; the handle records the error.

mod handle;
mod loader;

pub use handle::{TextureHandle, TextureId, TextureImage, TextureState};
pub use loader::{
    DeferredTextureLoader, ImmediateTextureLoader, ThreadedTextureLoader, TextureLoader,
    decode_bytes, decode_file,
};

/// Errors from texture loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {0} has zero size")]
    Empty(String),
    #[error("texture loader unavailable: {0}")]
    Unavailable(String),
}

pub fn crate_info() -> &'static str {
    "skyscroll-assets v0.1.0"
}
