use crate::AssetError;
use crate::handle::{TextureHandle, TextureImage};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Load an image at a path relative to the loader's root, asynchronously.
///
/// The handle is returned immediately and resolves whenever the load finishes.
pub trait TextureLoader {
    fn load(&self, path: &str) -> TextureHandle;
}

/// Decode an in-memory png/jpeg into RGBA8.
pub fn decode_bytes(label: &str, bytes: &[u8]) -> Result<TextureImage, AssetError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: label.to_string(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::Empty(label.to_string()));
    }
    Ok(TextureImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Read and decode an image file.
pub fn decode_file(path: &Path) -> Result<TextureImage, AssetError> {
    let label = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: label.clone(),
        source,
    })?;
    decode_bytes(&label, &bytes)
}

fn log_outcome(handle: &TextureHandle, result: &Result<TextureImage, AssetError>) {
    match result {
        Ok(image) => tracing::debug!(
            path = %handle.path().display(),
            width = image.width,
            height = image.height,
            "texture loaded"
        ),
        Err(e) => tracing::warn!(path = %handle.path().display(), "texture load failed: {e}"),
    }
}

/// Reads and decodes on a worker thread per request.
#[derive(Debug, Clone)]
pub struct ThreadedTextureLoader {
    root: PathBuf,
}

impl ThreadedTextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TextureLoader for ThreadedTextureLoader {
    fn load(&self, path: &str) -> TextureHandle {
        let handle = TextureHandle::pending(self.root.join(path));
        let worker = handle.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("texture:{path}"))
            .spawn(move || {
                let result = decode_file(worker.path());
                log_outcome(&worker, &result);
                worker.resolve(result);
            });
        if let Err(e) = spawned {
            tracing::warn!(path, "could not spawn texture worker: {e}");
            handle.resolve(Err(AssetError::Unavailable(e.to_string())));
        }
        handle
    }
}

/// Decodes on the calling thread; the handle is resolved when `load` returns.
#[derive(Debug, Clone)]
pub struct ImmediateTextureLoader {
    root: PathBuf,
}

impl ImmediateTextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureLoader for ImmediateTextureLoader {
    fn load(&self, path: &str) -> TextureHandle {
        let handle = TextureHandle::pending(self.root.join(path));
        let result = decode_file(handle.path());
        log_outcome(&handle, &result);
        handle.resolve(result);
        handle
    }
}

/// Hands out pending handles and resolves them only when told to.
///
/// Lets callers control exactly when textures arrive.
#[derive(Debug, Default)]
pub struct DeferredTextureLoader {
    requested: Mutex<Vec<TextureHandle>>,
}

impl DeferredTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// All handles requested so far, in request order.
    pub fn requested(&self) -> Vec<TextureHandle> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve every still-pending request whose path ends with `name`.
    /// Returns how many handles were resolved.
    pub fn complete(&self, name: &str, image: TextureImage) -> usize {
        self.requested()
            .iter()
            .filter(|h| h.path().ends_with(name))
            .filter(|h| h.resolve(Ok(image.clone())))
            .count()
    }

    /// Fail every still-pending request whose path ends with `name`.
    pub fn fail(&self, name: &str) -> usize {
        self.requested()
            .iter()
            .filter(|h| h.path().ends_with(name))
            .filter(|h| h.resolve(Err(AssetError::Empty(name.to_string()))))
            .count()
    }

    /// Resolve all pending requests with `image`.
    pub fn complete_all(&self, image: TextureImage) -> usize {
        self.requested()
            .iter()
            .filter(|h| h.resolve(Ok(image.clone())))
            .count()
    }
}

impl TextureLoader for DeferredTextureLoader {
    fn load(&self, path: &str) -> TextureHandle {
        let handle = TextureHandle::pending(path);
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextureState;
    use std::time::Duration;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn immediate_loader_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "jeff.png", 4, 2);

        let loader = ImmediateTextureLoader::new(dir.path());
        let handle = loader.load("jeff.png");
        assert_eq!(handle.state(), TextureState::Ready);
        let image = handle.image().unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn immediate_loader_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ImmediateTextureLoader::new(dir.path());
        let handle = loader.load("space.jpg");
        assert_eq!(handle.state(), TextureState::Failed);
        assert!(matches!(*handle.error().unwrap(), AssetError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_bytes("noise", &[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn threaded_loader_resolves_later() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "moon.png", 3, 3);

        let loader = ThreadedTextureLoader::new(dir.path());
        let handle = loader.load("moon.png");
        assert_eq!(
            handle.wait_timeout(Duration::from_secs(10)),
            TextureState::Ready
        );
        assert_eq!(handle.image().unwrap().width, 3);
    }

    #[test]
    fn deferred_loader_resolves_on_demand() {
        let loader = DeferredTextureLoader::new();
        let moon = loader.load("moon.jpg");
        let normal = loader.load("normal.jpg");
        assert_eq!(loader.requested().len(), 2);

        assert_eq!(loader.complete("moon.jpg", TextureImage::solid([9; 4])), 1);
        assert!(moon.is_ready());
        assert_eq!(normal.state(), TextureState::Pending);

        assert_eq!(loader.fail("normal.jpg"), 1);
        assert_eq!(normal.state(), TextureState::Failed);
        assert_eq!(loader.complete_all(TextureImage::solid([0; 4])), 0);
    }
}
