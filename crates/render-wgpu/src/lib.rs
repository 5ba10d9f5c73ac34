//! wgpu render backend for the scene.
//!
//! Draws the scene background as a full-screen texture, then every mesh with
//! its material: lit meshes take the point and ambient lights plus optional
//! color and normal maps, unlit meshes show color times color map.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - A texture is uploaded the first frame after its handle resolves; until
//!   then the slot samples a neutral placeholder.
//! - Meshes with identical geometry share one set of GPU buffers.

mod context;
mod gpu;
mod lights;
mod shaders;

pub use context::{GpuContext, RenderError};
pub use gpu::WgpuRenderer;
pub use lights::LightRig;
