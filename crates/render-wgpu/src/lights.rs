use skyscroll_scene::{Light, Scene};

/// Lighting inputs for one frame, reduced to what the mesh shader takes:
/// one point light and the summed ambient term, both linear rgb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    /// xyz position, w = 1 when a point light is present.
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    pub ambient: [f32; 4],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            point_position: [0.0; 4],
            point_color: [0.0; 4],
            ambient: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl LightRig {
    /// Collect lights in scene order. The first point light wins; extra point
    /// lights are ignored. Ambient lights add up.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut rig = Self::default();
        let mut have_point = false;
        for light in scene.lights() {
            match *light {
                Light::Point {
                    color,
                    intensity,
                    position,
                } => {
                    if have_point {
                        tracing::trace!("extra point light ignored");
                        continue;
                    }
                    have_point = true;
                    let c = color.to_linear_rgba();
                    rig.point_position = [position.x, position.y, position.z, 1.0];
                    rig.point_color = [c[0] * intensity, c[1] * intensity, c[2] * intensity, 1.0];
                }
                Light::Ambient { color, intensity } => {
                    let c = color.to_linear_rgba();
                    for i in 0..3 {
                        rig.ambient[i] += c[i] * intensity;
                    }
                }
            }
        }
        rig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use skyscroll_common::Color;

    #[test]
    fn empty_scene_is_dark() {
        let rig = LightRig::from_scene(&Scene::new());
        assert_eq!(rig, LightRig::default());
        assert_eq!(rig.point_position[3], 0.0);
    }

    #[test]
    fn point_and_ambient_collected() {
        let mut scene = Scene::new();
        scene.add_light(Light::point(Color::WHITE, Vec3::splat(5.0)));
        scene.add_light(Light::ambient(Color::WHITE));
        let rig = LightRig::from_scene(&scene);
        assert_eq!(rig.point_position, [5.0, 5.0, 5.0, 1.0]);
        assert_eq!(rig.point_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(rig.ambient, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn first_point_light_wins_and_ambients_sum() {
        let mut scene = Scene::new();
        scene.add_light(Light::point(Color::WHITE, Vec3::X));
        scene.add_light(Light::point(Color::WHITE, Vec3::Y));
        scene.add_light(Light::ambient(Color::WHITE));
        scene.add_light(Light::ambient(Color::WHITE));
        let rig = LightRig::from_scene(&scene);
        assert_eq!(rig.point_position, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rig.ambient[0], 2.0);
    }
}
