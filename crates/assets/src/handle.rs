use crate::AssetError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique texture identity. GPU caches key uploads by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Decoded image, tightly packed RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// A single-pixel image, handy as a placeholder.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

/// Observable load state of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Ready,
    Failed,
}

enum Slot {
    Pending,
    Ready(Arc<TextureImage>),
    Failed(Arc<AssetError>),
}

struct Inner {
    id: TextureId,
    path: PathBuf,
    slot: Mutex<Slot>,
    resolved: Condvar,
}

/// Shared promise for a texture that may still be loading.
///
/// Cloning is cheap; every clone observes the same resolution.
#[derive(Clone)]
pub struct TextureHandle {
    inner: Arc<Inner>,
}

impl TextureHandle {
    /// A handle with no result yet.
    pub fn pending(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
                path: path.into(),
                slot: Mutex::new(Slot::Pending),
                resolved: Condvar::new(),
            }),
        }
    }

    /// A handle that is already resolved with `image`.
    pub fn ready(path: impl Into<PathBuf>, image: TextureImage) -> Self {
        let handle = Self::pending(path);
        handle.resolve(Ok(image));
        handle
    }

    pub fn id(&self) -> TextureId {
        self.inner.id
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Store the load result. Returns false if the handle had already resolved.
    pub fn resolve(&self, result: Result<TextureImage, AssetError>) -> bool {
        let mut slot = self.lock();
        if !matches!(*slot, Slot::Pending) {
            return false;
        }
        *slot = match result {
            Ok(image) => Slot::Ready(Arc::new(image)),
            Err(e) => Slot::Failed(Arc::new(e)),
        };
        self.inner.resolved.notify_all();
        true
    }

    pub fn state(&self) -> TextureState {
        match *self.lock() {
            Slot::Pending => TextureState::Pending,
            Slot::Ready(_) => TextureState::Ready,
            Slot::Failed(_) => TextureState::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == TextureState::Ready
    }

    /// The decoded image, once the load has succeeded.
    pub fn image(&self) -> Option<Arc<TextureImage>> {
        match &*self.lock() {
            Slot::Ready(image) => Some(Arc::clone(image)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<Arc<AssetError>> {
        match &*self.lock() {
            Slot::Failed(e) => Some(Arc::clone(e)),
            _ => None,
        }
    }

    /// Block until the handle resolves or `timeout` elapses.
    /// Returns the state observed at return. Never called from the render path.
    pub fn wait_timeout(&self, timeout: Duration) -> TextureState {
        let slot = self.lock();
        let (slot, _) = self
            .inner
            .resolved
            .wait_timeout_while(slot, timeout, |s| matches!(s, Slot::Pending))
            .unwrap_or_else(PoisonError::into_inner);
        match *slot {
            Slot::Pending => TextureState::Pending,
            Slot::Ready(_) => TextureState::Ready,
            Slot::Failed(_) => TextureState::Failed,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path)
            .field("state", &self.state())
            .finish()
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
