use crate::state::SceneState;
use glam::Vec3;

/// Moon rotation added per scroll event.
pub const MOON_SCROLL_SPIN: Vec3 = Vec3::new(0.05, 0.075, 0.05);
/// Avatar rotation added per scroll event.
pub const AVATAR_SCROLL_SPIN: Vec3 = Vec3::new(0.0, 0.01, 0.01);
/// Camera z per unit of scroll offset.
pub const CAMERA_SCROLL_DOLLY: f32 = -0.01;
/// Camera x per unit of scroll offset.
pub const CAMERA_SCROLL_DRIFT: f32 = -0.0002;
/// Camera yaw per unit of scroll offset.
pub const CAMERA_SCROLL_YAW: f32 = -0.0002;

/// Torus rotation added per frame.
pub const TORUS_FRAME_SPIN: Vec3 = Vec3::new(0.01, 0.005, 0.01);
/// Moon rotation about x added per frame.
pub const MOON_FRAME_SPIN: f32 = 0.005;

/// Scroll callback. `t` is the document top relative to the viewport top,
/// negative once the page is scrolled down.
///
/// Camera placement is recomputed from `t` alone; mesh rotations accumulate
/// with every call.
pub fn on_scroll(state: &mut SceneState, t: f32) {
    if let Some(moon) = state.scene.mesh_mut(state.moon) {
        moon.transform.rotation += MOON_SCROLL_SPIN;
    }
    if let Some(avatar) = state.scene.mesh_mut(state.avatar) {
        avatar.transform.rotation.y += AVATAR_SCROLL_SPIN.y;
        avatar.transform.rotation.z += AVATAR_SCROLL_SPIN.z;
    }

    state.camera.position.z = t * CAMERA_SCROLL_DOLLY;
    state.camera.position.x = t * CAMERA_SCROLL_DRIFT;
    state.camera.rotation.y = t * CAMERA_SCROLL_YAW;

    tracing::trace!(t, camera = ?state.camera.position, "scroll applied");
}

/// Per-frame animation step. Rendering is left to the caller.
pub fn on_frame(state: &mut SceneState) {
    if let Some(torus) = state.scene.mesh_mut(state.torus) {
        torus.transform.rotation += TORUS_FRAME_SPIN;
    }
    if let Some(moon) = state.scene.mesh_mut(state.moon) {
        moon.transform.rotation.x += MOON_FRAME_SPIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SceneConfig, Viewport, compose};
    use skyscroll_assets::DeferredTextureLoader;
    use skyscroll_render::DebugTextRenderer;

    const EPS: f32 = 1e-5;

    fn state() -> SceneState {
        let mut config = SceneConfig::default();
        config.stars.seed = Some(11);
        let loader = DeferredTextureLoader::new();
        let mut renderer = DebugTextRenderer::new();
        compose(
            &config,
            Viewport::new(1280, 720, 1.0),
            &loader,
            &mut renderer,
        )
        .0
    }

    fn close(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    fn rot(state: &SceneState, which: fn(&SceneState) -> skyscroll_common::ObjectId) -> Vec3 {
        state.scene.mesh(which(state)).unwrap().transform.rotation
    }

    #[test]
    fn scroll_sets_camera_from_offset() {
        let mut s = state();
        let moon_before = rot(&s, |s| s.moon);
        on_scroll(&mut s, -1000.0);

        assert!(close(s.camera.position, Vec3::new(0.2, 0.0, 10.0), EPS));
        assert!((s.camera.rotation.y - 0.2).abs() < EPS);
        assert!(close(rot(&s, |s| s.moon) - moon_before, MOON_SCROLL_SPIN, EPS));
    }

    #[test]
    fn scroll_leaves_camera_y_alone() {
        let mut s = state();
        s.camera.position.y = 4.0;
        on_scroll(&mut s, -250.0);
        assert_eq!(s.camera.position.y, 4.0);
    }

    #[test]
    fn repeated_scroll_is_absolute_for_camera_cumulative_for_meshes() {
        let mut s = state();
        on_scroll(&mut s, -420.0);
        let cam_first = s.camera;
        let moon_first = rot(&s, |s| s.moon);
        let avatar_first = rot(&s, |s| s.avatar);

        on_scroll(&mut s, -420.0);
        assert_eq!(s.camera.position, cam_first.position);
        assert_eq!(s.camera.rotation, cam_first.rotation);
        assert!(close(rot(&s, |s| s.moon) - moon_first, MOON_SCROLL_SPIN, EPS));
        assert!(close(
            rot(&s, |s| s.avatar) - avatar_first,
            AVATAR_SCROLL_SPIN,
            EPS
        ));
    }

    #[test]
    fn avatar_x_untouched_by_scroll() {
        let mut s = state();
        for _ in 0..10 {
            on_scroll(&mut s, 0.0);
        }
        let r = rot(&s, |s| s.avatar);
        assert_eq!(r.x, 0.0);
        assert!((r.y - 0.1).abs() < EPS);
        assert!((r.z - 0.1).abs() < EPS);
    }

    #[test]
    fn startup_scroll_at_top_moves_camera_to_origin() {
        let mut s = state();
        assert_eq!(s.camera.position, Vec3::new(-3.0, 0.0, 30.0));
        on_scroll(&mut s, 0.0);
        assert_eq!(s.camera.position, Vec3::ZERO);
        assert_eq!(s.camera.rotation.y, 0.0);
    }

    #[test]
    fn frames_accumulate_rotation() {
        let mut s = state();
        let n = 120;
        for _ in 0..n {
            on_frame(&mut s);
        }
        let expected = TORUS_FRAME_SPIN * n as f32;
        assert!(close(rot(&s, |s| s.torus), expected, 1e-4));
        let moon = rot(&s, |s| s.moon);
        assert!((moon.x - MOON_FRAME_SPIN * n as f32).abs() < 1e-4);
        assert_eq!(moon.y, 0.0);
        assert_eq!(rot(&s, |s| s.avatar), Vec3::ZERO);
    }

    #[test]
    fn frame_and_scroll_compound_on_moon_x() {
        let mut s = state();
        on_scroll(&mut s, -10.0);
        for _ in 0..4 {
            on_frame(&mut s);
        }
        on_scroll(&mut s, -20.0);
        let moon = rot(&s, |s| s.moon);
        assert!((moon.x - (2.0 * 0.05 + 4.0 * 0.005)).abs() < EPS);
        assert!((moon.y - 2.0 * 0.075).abs() < EPS);
    }

    #[test]
    fn stars_never_move() {
        let mut s = state();
        let before: Vec<_> = s
            .stars
            .iter()
            .map(|id| s.scene.mesh(*id).unwrap().transform)
            .collect();
        for i in 0..50 {
            on_frame(&mut s);
            on_scroll(&mut s, -(i as f32) * 30.0);
        }
        let after: Vec<_> = s
            .stars
            .iter()
            .map(|id| s.scene.mesh(*id).unwrap().transform)
            .collect();
        assert_eq!(before, after);
    }
}
