use skyscroll_assets::TextureState;
use skyscroll_scene::{Light, ObjectKind, PerspectiveCamera, Scene};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// One call is one render pass over the scene as seen from the camera.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    type Output = R::Output;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output {
        (**self).render(scene, camera)
    }
}

/// Produces a text listing of the scene. Counts its passes.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    passes: u64,
    /// List every object rather than a per-kind summary.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing() -> Self {
        Self {
            passes: 0,
            verbose: true,
        }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }
}

fn texture_label(state: TextureState) -> &'static str {
    match state {
        TextureState::Pending => "pending",
        TextureState::Ready => "ready",
        TextureState::Failed => "failed",
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.passes += 1;
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Scene (pass={}, objects={}, meshes={}, lights={}) ===",
            self.passes,
            scene.len(),
            scene.mesh_count(),
            scene.light_count()
        );
        let p = camera.position;
        let r = camera.rotation;
        let _ = writeln!(
            out,
            "Camera: pos=({:.3}, {:.3}, {:.3}) rot=({:.4}, {:.4}, {:.4}) fov={:.0} aspect={:.3}",
            p.x, p.y, p.z, r.x, r.y, r.z, camera.fov, camera.aspect
        );
        match scene.background() {
            Some(bg) => {
                let _ = writeln!(
                    out,
                    "Background: {} ({})",
                    bg.path().display(),
                    texture_label(bg.state())
                );
            }
            None => {
                let _ = writeln!(out, "Background: none");
            }
        }

        let mut shapes: Vec<(&str, usize)> = Vec::new();
        for object in scene.objects() {
            match &object.kind {
                ObjectKind::Mesh(mesh) => {
                    let kind = mesh.geometry.kind();
                    match shapes.iter_mut().find(|(k, _)| *k == kind) {
                        Some((_, n)) => *n += 1,
                        None => shapes.push((kind, 1)),
                    }
                    if self.verbose {
                        let t = mesh.transform;
                        let _ = writeln!(
                            out,
                            "  [{}] {} {} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}) map={} normal={}",
                            object.id.short(),
                            mesh.name,
                            kind,
                            t.position.x,
                            t.position.y,
                            t.position.z,
                            t.rotation.x,
                            t.rotation.y,
                            t.rotation.z,
                            mesh.material.map.as_ref().map_or("none", |h| texture_label(h.state())),
                            mesh.material
                                .normal_map
                                .as_ref()
                                .map_or("none", |h| texture_label(h.state())),
                        );
                    }
                }
                ObjectKind::Light(light) => {
                    if self.verbose {
                        let _ = match light {
                            Light::Point { position, .. } => writeln!(
                                out,
                                "  [{}] point_light pos=({:.2}, {:.2}, {:.2})",
                                object.id.short(),
                                position.x,
                                position.y,
                                position.z
                            ),
                            Light::Ambient { .. } => {
                                writeln!(out, "  [{}] ambient_light", object.id.short())
                            }
                        };
                    }
                }
            }
        }
        if !self.verbose {
            for (kind, n) in shapes {
                let _ = writeln!(out, "  {kind}: {n}");
            }
        }
        tracing::trace!(pass = self.passes, "debug render");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use skyscroll_assets::TextureHandle;
    use skyscroll_common::Color;
    use skyscroll_scene::{Geometry, Material, Mesh};

    fn ball() -> Mesh {
        Mesh::new(
            "star",
            Geometry::Sphere {
                radius: 0.25,
                width_segments: 24,
                height_segments: 24,
            },
            Material::standard(Color::WHITE),
        )
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&Scene::new(), &PerspectiveCamera::default());
        assert!(output.contains("pass=1"));
        assert!(output.contains("objects=0"));
        assert!(output.contains("Background: none"));
        assert_eq!(renderer.passes(), 1);
    }

    #[test]
    fn debug_renderer_summarizes_kinds() {
        let mut scene = Scene::new();
        scene.add_mesh(ball());
        scene.add_mesh(ball().at(Vec3::ONE));
        scene.add_light(Light::ambient(Color::WHITE));
        scene.set_background(TextureHandle::pending("space.jpg"));

        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("meshes=2, lights=1"));
        assert!(output.contains("sphere: 2"));
        assert!(output.contains("space.jpg (pending)"));
    }

    #[test]
    fn verbose_lists_objects() {
        let mut scene = Scene::new();
        scene.add_mesh(ball().at(Vec3::new(1.0, 2.0, 3.0)));
        scene.add_light(Light::point(Color::WHITE, Vec3::splat(5.0)));

        let mut renderer = DebugTextRenderer::listing();
        let output = renderer.render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("star sphere pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("point_light pos=(5.00, 5.00, 5.00)"));
    }

    #[test]
    fn renders_through_mut_reference() {
        fn one_pass<R: Renderer>(mut renderer: R) -> R::Output {
            renderer.render(&Scene::new(), &PerspectiveCamera::default())
        }
        let mut renderer = DebugTextRenderer::new();
        one_pass(&mut renderer);
        assert_eq!(renderer.passes(), 1);
    }
}
