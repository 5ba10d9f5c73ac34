//! Scene graph: the objects and lights drawn each frame, plus the camera.
//!
//! # Invariants
//! - Objects keep insertion order; a render pass visits them in that order.
//! - A mesh always carries a geometry and a material (enforced by the type).
//! - The scene owns everything added to it for its whole lifetime; nothing is
//!   removed.

mod camera;
mod geometry;
mod material;
mod object;
mod scene;

pub use camera::PerspectiveCamera;
pub use geometry::{Geometry, MeshData};
pub use material::{Material, Shading};
pub use object::{Light, Mesh, ObjectKind, SceneObject};
pub use scene::Scene;

pub fn crate_info() -> &'static str {
    "skyscroll-scene v0.1.0"
}
