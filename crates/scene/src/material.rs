use serde::Serialize;
use skyscroll_assets::{TextureHandle, TextureImage};
use skyscroll_common::Color;
use std::sync::Arc;

/// How a surface responds to light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shading {
    /// Lit by the scene's point and ambient lights.
    Standard,
    /// Ignores lights; shows color times color map.
    Basic,
}

/// Surface description. Texture slots hold handles that may still be loading;
/// until a handle resolves successfully the slot behaves as if empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub map: Option<TextureHandle>,
    pub normal_map: Option<TextureHandle>,
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self {
            shading: Shading::Standard,
            color,
            map: None,
            normal_map: None,
        }
    }

    /// Unlit material, white base color.
    pub fn basic() -> Self {
        Self {
            shading: Shading::Basic,
            color: Color::WHITE,
            map: None,
            normal_map: None,
        }
    }

    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_normal_map(mut self, normal_map: TextureHandle) -> Self {
        self.normal_map = Some(normal_map);
        self
    }

    pub fn is_lit(&self) -> bool {
        self.shading == Shading::Standard
    }

    /// Color map image, if its load has completed successfully.
    pub fn resolved_map(&self) -> Option<Arc<TextureImage>> {
        self.map.as_ref().and_then(TextureHandle::image)
    }

    /// Normal map image, if its load has completed successfully.
    pub fn resolved_normal_map(&self) -> Option<Arc<TextureImage>> {
        self.normal_map.as_ref().and_then(TextureHandle::image)
    }

    /// Handles still waiting on their load.
    pub fn pending_textures(&self) -> usize {
        [&self.map, &self.normal_map]
            .into_iter()
            .flatten()
            .filter(|h| h.state() == skyscroll_assets::TextureState::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_material_is_unlit_white() {
        let m = Material::basic();
        assert!(!m.is_lit());
        assert_eq!(m.color, Color::WHITE);
    }

    #[test]
    fn map_appears_only_after_resolution() {
        let handle = TextureHandle::pending("jeff.png");
        let m = Material::basic().with_map(handle.clone());
        assert!(m.resolved_map().is_none());
        assert_eq!(m.pending_textures(), 1);

        handle.resolve(Ok(TextureImage::solid([255; 4])));
        assert!(m.resolved_map().is_some());
        assert_eq!(m.pending_textures(), 0);
    }

    #[test]
    fn failed_normal_map_stays_empty() {
        let handle = TextureHandle::pending("normal.jpg");
        let m = Material::standard(Color::WHITE).with_normal_map(handle.clone());
        handle.resolve(Err(skyscroll_assets::AssetError::Empty("normal.jpg".into())));
        assert!(m.resolved_normal_map().is_none());
        assert_eq!(m.pending_textures(), 0);
    }
}
