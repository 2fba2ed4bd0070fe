//! # Image store
//!
//! Image overlays carry only a cache key; the pixels live in a store the
//! host populates before attaching an overlay that references them. The
//! in-memory store here is what the cache-indirected schema resolves
//! through in tests and simple hosts; platform image loaders implement the
//! trait over their own caches.

use crate::capture::PixelBuffer;

/// Resolve a cache key to pixel data. Misses mean the host attached an
/// overlay before populating the store; the renderer skips the node.
pub trait ImageStore {
    fn resolve(&self, key: &str) -> Option<&PixelBuffer>;
}

/// Plain in-memory store.
#[derive(Default)]
pub struct MemoryImageStore {
    entries: hashbrown::HashMap<String, PixelBuffer>,
}

impl MemoryImageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Insert or replace an entry, returning the previous pixels if any.
    pub fn insert(&mut self, key: impl Into<String>, buffer: PixelBuffer) -> Option<PixelBuffer> {
        self.entries.insert(key.into(), buffer)
    }
    pub fn remove(&mut self, key: &str) -> Option<PixelBuffer> {
        self.entries.remove(key)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn resolve(&self, key: &str) -> Option<&PixelBuffer> {
        self.entries.get(key)
    }
}
