use crate::geometry::Geometry;
use crate::material::Material;
use glam::Vec3;
use skyscroll_common::{Color, ObjectId, Transform};

/// A renderable shape: geometry paired with a material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }
}

/// Light sources. Static once added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
    Ambient {
        color: Color,
        intensity: f32,
    },
}

impl Light {
    pub fn point(color: Color, position: Vec3) -> Self {
        Light::Point {
            color,
            intensity: 1.0,
            position,
        }
    }

    pub fn ambient(color: Color) -> Self {
        Light::Ambient {
            color,
            intensity: 1.0,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Light::Point { .. } => "point_light",
            Light::Ambient { .. } => "ambient_light",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Mesh(Mesh),
    Light(Light),
}

/// An entry in the scene's child list.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            ObjectKind::Mesh(m) => Some(m),
            ObjectKind::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(l) => Some(l),
            ObjectKind::Mesh(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            ObjectKind::Mesh(m) => &m.name,
            ObjectKind::Light(l) => l.kind(),
        }
    }
}
