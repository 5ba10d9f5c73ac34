use crate::object::{Light, Mesh, ObjectKind, SceneObject};
use skyscroll_assets::TextureHandle;
use skyscroll_common::ObjectId;
use std::collections::BTreeMap;

/// Root container of everything drawn in a render pass.
///
/// Children are kept in insertion order; `index` maps ids to positions for
/// direct lookups from the animation callbacks.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    index: BTreeMap<ObjectId, usize>,
    background: Option<TextureHandle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Returns its id.
    pub fn add(&mut self, kind: ObjectKind) -> ObjectId {
        let id = ObjectId::new();
        tracing::trace!(id = %id.short(), "scene add");
        self.index.insert(id, self.objects.len());
        self.objects.push(SceneObject { id, kind });
        id
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> ObjectId {
        self.add(ObjectKind::Mesh(mesh))
    }

    pub fn add_light(&mut self, light: Light) -> ObjectId {
        self.add(ObjectKind::Light(light))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        self.get(id).and_then(SceneObject::as_mesh)
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        let i = *self.index.get(&id)?;
        match &mut self.objects[i].kind {
            ObjectKind::Mesh(m) => Some(m),
            ObjectKind::Light(_) => None,
        }
    }

    /// All children in insertion order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn meshes(&self) -> impl Iterator<Item = (ObjectId, &Mesh)> {
        self.objects
            .iter()
            .filter_map(|o| o.as_mesh().map(|m| (o.id, m)))
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.objects.iter().filter_map(SceneObject::as_light)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes().count()
    }

    pub fn light_count(&self) -> usize {
        self.lights().count()
    }

    /// Replace the background. Renderers draw it once the handle resolves.
    pub fn set_background(&mut self, texture: TextureHandle) {
        self.background = Some(texture);
    }

    pub fn background(&self) -> Option<&TextureHandle> {
        self.background.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Material};
    use glam::Vec3;
    use skyscroll_common::Color;

    fn cube(name: &str) -> Mesh {
        Mesh::new(
            name,
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::standard(Color::WHITE),
        )
    }

    #[test]
    fn empty_scene() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert!(scene.background().is_none());
    }

    #[test]
    fn add_preserves_order_and_lookup() {
        let mut scene = Scene::new();
        let a = scene.add_mesh(cube("a"));
        let l = scene.add_light(Light::ambient(Color::WHITE));
        let b = scene.add_mesh(cube("b").at(Vec3::X));

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.mesh_count(), 2);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.objects()[0].id, a);
        assert_eq!(scene.objects()[1].id, l);
        assert_eq!(scene.mesh(b).unwrap().transform.position, Vec3::X);
        assert!(scene.mesh(l).is_none());
    }

    #[test]
    fn mesh_mut_edits_in_place() {
        let mut scene = Scene::new();
        let id = scene.add_mesh(cube("spin"));
        scene.mesh_mut(id).unwrap().transform.rotation.x += 0.5;
        assert_eq!(scene.mesh(id).unwrap().transform.rotation.x, 0.5);
    }

    #[test]
    fn background_is_replaced() {
        let mut scene = Scene::new();
        let first = TextureHandle::pending("a.jpg");
        let second = TextureHandle::pending("b.jpg");
        scene.set_background(first);
        scene.set_background(second.clone());
        assert_eq!(scene.background(), Some(&second));
    }
}
