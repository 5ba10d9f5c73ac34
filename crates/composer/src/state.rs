use skyscroll_common::ObjectId;
use skyscroll_scene::{Mesh, PerspectiveCamera, Scene};

/// The shared state every callback mutates: scene, camera and the ids of
/// the meshes the animation rules touch.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub torus: ObjectId,
    pub avatar: ObjectId,
    pub moon: ObjectId,
    pub stars: Vec<ObjectId>,
    /// Seed the star field was drawn from.
    pub seed: u64,
}

impl SceneState {
    pub fn torus(&self) -> Option<&Mesh> {
        self.scene.mesh(self.torus)
    }

    pub fn avatar(&self) -> Option<&Mesh> {
        self.scene.mesh(self.avatar)
    }

    pub fn moon(&self) -> Option<&Mesh> {
        self.scene.mesh(self.moon)
    }
}
