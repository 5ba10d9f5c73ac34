use serde::{Deserialize, Serialize};
use skyscroll_input::PageScrollConfig;
use std::path::{Path, PathBuf};

/// Errors from loading a scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Host window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Update camera aspect and page height when the window is resized.
    /// Off by default: the viewport is read once at startup.
    pub track_resize: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "skyscroll".into(),
            width: 1280,
            height: 720,
            track_resize: false,
        }
    }
}

/// Texture file names, resolved against `dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub background: String,
    pub avatar: String,
    pub moon: String,
    pub moon_normal: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            background: "space.jpg".into(),
            avatar: "jeff.png".into(),
            moon: "moon.jpg".into(),
            moon_normal: "normal.jpg".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    /// Width of the cube stars are scattered in, centered on the origin.
    pub spread: f32,
    /// Fixed seed for a reproducible sky. Drawn from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 100.0,
            seed: None,
        }
    }
}

/// Everything configurable about the scene and its host. Every field has a
/// default, so an empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub stars: StarConfig,
    pub page: PageScrollConfig,
}

impl SceneConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        if !self.stars.spread.is_finite() || self.stars.spread < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "star spread must be a non-negative number, got {}",
                self.stars.spread
            )));
        }
        if self.page.line_height <= 0.0 || self.page.document_height < 0.0 {
            return Err(ConfigError::Invalid("page dimensions must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_page() {
        let c = SceneConfig::default();
        assert_eq!(c.stars.count, 200);
        assert_eq!(c.stars.spread, 100.0);
        assert_eq!(c.assets.background, "space.jpg");
        assert_eq!(c.assets.moon_normal, "normal.jpg");
        assert!(!c.window.track_resize);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(SceneConfig::from_yaml("").unwrap(), SceneConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let c = SceneConfig::from_yaml("stars:\n  seed: 42\nwindow:\n  title: demo\n").unwrap();
        assert_eq!(c.stars.seed, Some(42));
        assert_eq!(c.stars.count, 200);
        assert_eq!(c.window.title, "demo");
        assert_eq!(c.window.width, 1280);
    }

    #[test]
    fn rejects_zero_window() {
        let err = SceneConfig::from_yaml("window:\n  width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = SceneConfig::from_yaml("stars: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"assets:\n  dir: /srv/page\n").unwrap();
        let c = SceneConfig::load(file.path()).unwrap();
        assert_eq!(c.assets.dir, PathBuf::from("/srv/page"));
    }

    #[test]
    fn yaml_roundtrip_preserves_config() {
        let mut c = SceneConfig::default();
        c.stars.seed = Some(7);
        let text = c.to_yaml().unwrap();
        assert_eq!(SceneConfig::from_yaml(&text).unwrap(), c);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
