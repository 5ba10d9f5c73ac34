use crate::config::SceneConfig;
use crate::rng::SceneRng;
use crate::state::SceneState;
use glam::Vec3;
use skyscroll_assets::TextureLoader;
use skyscroll_common::{Color, ObjectId};
use skyscroll_render::Renderer;
use skyscroll_scene::{Geometry, Light, Material, Mesh, PerspectiveCamera, Scene};

pub const CAMERA_FOV: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START: Vec3 = Vec3::new(-3.0, 0.0, 30.0);
pub const TORUS_COLOR: Color = Color::from_hex(0xff6347);
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
pub const AVATAR_POSITION: Vec3 = Vec3::new(2.0, 0.0, -5.0);
pub const MOON_POSITION: Vec3 = Vec3::new(-10.0, 0.0, 30.0);

const TORUS: Geometry = Geometry::Torus {
    radius: 10.0,
    tube: 3.0,
    radial_segments: 16,
    tubular_segments: 100,
};
const STAR: Geometry = Geometry::Sphere {
    radius: 0.25,
    width_segments: 24,
    height_segments: 24,
};
const AVATAR: Geometry = Geometry::Box {
    width: 3.0,
    height: 3.0,
    depth: 3.0,
};
const MOON: Geometry = Geometry::Sphere {
    radius: 3.0,
    width_segments: 32,
    height_segments: 32,
};

/// Drawing surface size as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Physical pixels.
    pub width: u32,
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn logical_height(&self) -> f32 {
        (self.height as f64 / self.pixel_ratio.max(f64::EPSILON)) as f32
    }
}

fn add_star(scene: &mut Scene, rng: &mut SceneRng, spread: f32) -> ObjectId {
    let position = Vec3::new(rng.spread(spread), rng.spread(spread), rng.spread(spread));
    let star = Mesh::new("star", STAR, Material::standard(Color::WHITE)).at(position);
    scene.add_mesh(star)
}

/// Build the scene.
///
/// `renderer` must already be bound to its surface; it gets one pass right
/// after the camera is placed, before any object exists, and that pass's
/// output is returned alongside the state. Textures are requested from
/// `loader` and attached as pending handles; meshes are added without
/// waiting for them.
pub fn compose<R: Renderer>(
    config: &SceneConfig,
    viewport: Viewport,
    loader: &dyn TextureLoader,
    renderer: &mut R,
) -> (SceneState, R::Output) {
    let _span = tracing::info_span!("compose").entered();

    let mut scene = Scene::new();
    let mut camera =
        PerspectiveCamera::new(CAMERA_FOV, viewport.aspect(), CAMERA_NEAR, CAMERA_FAR);
    camera.position = CAMERA_START;

    let first_pass = renderer.render(&scene, &camera);

    let torus = scene.add_mesh(Mesh::new("torus", TORUS, Material::standard(TORUS_COLOR)));

    scene.add_light(Light::point(Color::WHITE, POINT_LIGHT_POSITION));
    scene.add_light(Light::ambient(Color::WHITE));

    let mut rng = match config.stars.seed {
        Some(seed) => SceneRng::new(seed),
        None => SceneRng::from_clock(),
    };
    let seed = rng.seed();
    let stars: Vec<ObjectId> = (0..config.stars.count)
        .map(|_| add_star(&mut scene, &mut rng, config.stars.spread))
        .collect();
    tracing::debug!(count = stars.len(), seed, "stars placed");

    scene.set_background(loader.load(&config.assets.background));

    let avatar_map = loader.load(&config.assets.avatar);
    let avatar = scene.add_mesh(
        Mesh::new("avatar", AVATAR, Material::basic().with_map(avatar_map)).at(AVATAR_POSITION),
    );

    let moon_map = loader.load(&config.assets.moon);
    let moon_normal = loader.load(&config.assets.moon_normal);
    let moon = scene.add_mesh(
        Mesh::new(
            "moon",
            MOON,
            Material::standard(Color::WHITE)
                .with_map(moon_map)
                .with_normal_map(moon_normal),
        )
        .at(MOON_POSITION),
    );

    tracing::info!(
        objects = scene.len(),
        meshes = scene.mesh_count(),
        lights = scene.light_count(),
        seed,
        "scene composed"
    );

    let state = SceneState {
        scene,
        camera,
        torus,
        avatar,
        moon,
        stars,
        seed,
    };
    (state, first_pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyscroll_assets::{DeferredTextureLoader, TextureImage, TextureState};
    use skyscroll_scene::Shading;

    /// Records what each pass saw.
    #[derive(Default)]
    struct Recorder {
        passes: Vec<(usize, Vec3)>,
    }

    impl Renderer for Recorder {
        type Output = usize;

        fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> usize {
            self.passes.push((scene.len(), camera.position));
            self.passes.len()
        }
    }

    fn seeded(seed: u64) -> SceneConfig {
        let mut config = SceneConfig::default();
        config.stars.seed = Some(seed);
        config
    }

    fn build(config: &SceneConfig) -> (SceneState, Recorder, DeferredTextureLoader) {
        let loader = DeferredTextureLoader::new();
        let mut recorder = Recorder::default();
        let (state, _) = compose(
            config,
            Viewport::new(1600, 900, 2.0),
            &loader,
            &mut recorder,
        );
        (state, recorder, loader)
    }

    #[test]
    fn scene_contains_all_objects() {
        let (state, _, _) = build(&seeded(1));
        assert_eq!(state.scene.mesh_count(), 203);
        assert_eq!(state.scene.light_count(), 2);
        assert_eq!(state.scene.len(), 205);
        assert_eq!(state.stars.len(), 200);
    }

    #[test]
    fn object_order_follows_construction() {
        let (state, _, _) = build(&seeded(1));
        let labels: Vec<&str> = state.scene.objects().iter().map(|o| o.label()).collect();
        assert_eq!(labels[0], "torus");
        assert_eq!(labels[1], "point_light");
        assert_eq!(labels[2], "ambient_light");
        assert!(labels[3..203].iter().all(|l| *l == "star"));
        assert_eq!(labels[203], "avatar");
        assert_eq!(labels[204], "moon");
    }

    #[test]
    fn first_pass_sees_empty_scene_and_start_camera() {
        let (_, recorder, _) = build(&seeded(1));
        assert_eq!(recorder.passes, vec![(0, CAMERA_START)]);
    }

    #[test]
    fn camera_setup() {
        let (state, _, _) = build(&seeded(1));
        let cam = state.camera;
        assert_eq!(cam.fov, 75.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(cam.position, Vec3::new(-3.0, 0.0, 30.0));
        assert_eq!(cam.rotation, Vec3::ZERO);
    }

    #[test]
    fn stars_within_spread() {
        let (state, _, _) = build(&seeded(5));
        for id in &state.stars {
            let star = state.scene.mesh(*id).unwrap();
            let p = star.transform.position;
            for c in p.to_array() {
                assert!((-50.0..=50.0).contains(&c), "star coordinate {c} out of range");
            }
            assert_eq!(star.geometry, STAR);
            assert_eq!(star.material.shading, Shading::Standard);
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let positions = |state: &SceneState| -> Vec<Vec3> {
            state
                .stars
                .iter()
                .map(|id| state.scene.mesh(*id).unwrap().transform.position)
                .collect()
        };
        let (a, _, _) = build(&seeded(1234));
        let (b, _, _) = build(&seeded(1234));
        let (c, _, _) = build(&seeded(4321));
        assert_eq!(positions(&a), positions(&b));
        assert_ne!(positions(&a), positions(&c));
        assert_eq!(a.seed, 1234);
    }

    #[test]
    fn zero_spread_stacks_every_star_at_origin() {
        let mut config = seeded(3);
        config.stars.spread = 0.0;
        let (state, _, _) = build(&config);
        assert_eq!(state.stars.len(), 200);
        assert!(state
            .stars
            .iter()
            .all(|id| state.scene.mesh(*id).unwrap().transform.position == Vec3::ZERO));
    }

    #[test]
    fn meshes_placed() {
        let (state, _, _) = build(&seeded(1));
        let torus = state.torus().unwrap();
        assert_eq!(torus.material.color, TORUS_COLOR);
        assert_eq!(torus.transform.position, Vec3::ZERO);
        assert_eq!(state.avatar().unwrap().transform.position, AVATAR_POSITION);
        assert_eq!(state.moon().unwrap().transform.position, MOON_POSITION);
        assert_eq!(state.avatar().unwrap().material.shading, Shading::Basic);
        assert!(state.moon().unwrap().material.is_lit());
    }

    #[test]
    fn textures_requested_in_order_and_pending() {
        let (state, _, loader) = build(&seeded(1));
        let paths: Vec<String> = loader
            .requested()
            .iter()
            .map(|h| h.path().display().to_string())
            .collect();
        assert_eq!(paths, vec!["space.jpg", "jeff.png", "moon.jpg", "normal.jpg"]);

        assert_eq!(
            state.scene.background().unwrap().state(),
            TextureState::Pending
        );
        assert!(state.avatar().unwrap().material.resolved_map().is_none());
        assert_eq!(state.moon().unwrap().material.pending_textures(), 2);
    }

    #[test]
    fn textures_attach_when_loads_complete() {
        let (state, _, loader) = build(&seeded(1));
        loader.complete("jeff.png", TextureImage::solid([200, 100, 50, 255]));
        loader.complete("space.jpg", TextureImage::solid([0, 0, 20, 255]));
        loader.fail("normal.jpg");

        assert!(state.avatar().unwrap().material.resolved_map().is_some());
        assert!(state.scene.background().unwrap().is_ready());
        let moon = &state.moon().unwrap().material;
        assert!(moon.resolved_map().is_none());
        assert!(moon.resolved_normal_map().is_none());
        assert_eq!(moon.pending_textures(), 1);
    }

    #[test]
    fn viewport_logical_height() {
        let v = Viewport::new(2560, 1440, 2.0);
        assert_eq!(v.logical_height(), 720.0);
        assert!((v.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }
}
