use glam::Vec3;
use serde::Serialize;
use std::f32::consts::{PI, TAU};

/// Parametric shape description. Tessellated on demand by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
}

/// Triangle list with per-vertex position, normal and uv.
///
/// Uvs follow the image-space convention with v = 1 at the top edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv);
    }
}

impl Geometry {
    /// Stable key for sharing tessellated buffers between identical shapes.
    pub fn cache_key(&self) -> [u32; 5] {
        match *self {
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => [
                0,
                radius.to_bits(),
                tube.to_bits(),
                radial_segments,
                tubular_segments,
            ],
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => [1, radius.to_bits(), width_segments, height_segments, 0],
            Geometry::Box {
                width,
                height,
                depth,
            } => [2, width.to_bits(), height.to_bits(), depth.to_bits(), 0],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Torus { .. } => "torus",
            Geometry::Sphere { .. } => "sphere",
            Geometry::Box { .. } => "box",
        }
    }

    pub fn tessellate(&self) -> MeshData {
        match *self {
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments.max(2), tubular_segments.max(3)),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
            Geometry::Box {
                width,
                height,
                depth,
            } => cuboid(Vec3::new(width, height, depth) * 0.5),
        }
    }
}

fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push(
                position,
                (position - center).normalize_or_zero(),
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

fn sphere(radius: f32, width: u32, height: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        // Pole vertices sit under the middle of their quad.
        let u_offset = if iy == 0 {
            0.5 / width as f32
        } else if iy == height {
            -0.5 / width as f32
        } else {
            0.0
        };
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push(position, position.normalize_or_zero(), [u + u_offset, 1.0 - v]);
        }
    }

    let row = width + 1;
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn cuboid(half: Vec3) -> MeshData {
    // (normal, u axis, v axis) with u x v == normal so quads wind counter-clockwise.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u_axis, v_axis) in FACES {
        let base = mesh.positions.len() as u32;
        let center = normal * half;
        let du = u_axis * half;
        let dv = v_axis * half;
        for (su, sv, uv) in [
            (-1.0, -1.0, [0.0, 0.0]),
            (1.0, -1.0, [1.0, 0.0]),
            (1.0, 1.0, [1.0, 1.0]),
            (-1.0, 1.0, [0.0, 1.0]),
        ] {
            mesh.push(center + du * su + dv * sv, normal, uv);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}
