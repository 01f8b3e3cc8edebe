//! Render cache keyed by document identity, page and resolution.
//!
//! Rendering is a pure function of (document bytes, page, dpi), so entries
//! never go stale. A new document or a new dpi is simply a different key.
//! Capacity is bounded with LRU eviction since the cache is shared by every
//! session on the server.

use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::body::Bytes;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

use super::render::{PageHalves, PageRenderer, RenderError};
use crate::models::{Document, DocumentId};

/// Page counts are tiny; keep many more of them than rendered cards.
const PAGE_COUNT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RenderCacheKey {
    pub document: DocumentId,
    pub page_index: usize,
    pub dpi: u32,
}

/// Memoizing front for a [`PageRenderer`].
pub struct RenderCache {
    renderer: Arc<dyn PageRenderer>,
    renders: Mutex<LruCache<RenderCacheKey, Arc<PageHalves>>>,
    page_counts: Mutex<LruCache<DocumentId, usize>>,
}

impl RenderCache {
    pub fn new(renderer: Arc<dyn PageRenderer>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let count_capacity = NonZeroUsize::new(PAGE_COUNT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            renderer,
            renders: Mutex::new(LruCache::new(capacity)),
            page_counts: Mutex::new(LruCache::new(count_capacity)),
        }
    }

    /// Page count of a document, parsing it on first sight.
    pub async fn page_count(&self, id: &DocumentId, bytes: Bytes) -> Result<usize, RenderError> {
        if let Some(count) = self.page_counts.lock().await.get(id).copied() {
            debug!("Page count cache hit for {}", id);
            return Ok(count);
        }

        let renderer = Arc::clone(&self.renderer);
        let count = tokio::task::spawn_blocking(move || renderer.page_count(&bytes))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        self.page_counts.lock().await.put(id.clone(), count);
        Ok(count)
    }

    /// Both halves of `page_index`, rendering them on a miss.
    pub async fn get_or_render(
        &self,
        document: &Document,
        page_index: usize,
        dpi: u32,
    ) -> Result<Arc<PageHalves>, RenderError> {
        if page_index >= document.page_count {
            return Err(RenderError::IndexOutOfRange {
                index: page_index,
                total: document.page_count,
            });
        }

        let key = RenderCacheKey {
            document: document.id.clone(),
            page_index,
            dpi,
        };

        if let Some(halves) = self.renders.lock().await.get(&key) {
            debug!("Render cache hit: page {} at {} dpi", page_index + 1, dpi);
            return Ok(Arc::clone(halves));
        }
        debug!("Render cache miss: page {} at {} dpi", page_index + 1, dpi);

        let renderer = Arc::clone(&self.renderer);
        let bytes = document.bytes.clone();
        let halves = tokio::task::spawn_blocking(move || {
            renderer.render_halves(&bytes, page_index, dpi)
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;

        let halves = Arc::new(halves);
        self.renders.lock().await.put(key, Arc::clone(&halves));
        debug!("{} cards cached", self.len().await);
        Ok(halves)
    }

    /// Number of cached cards.
    pub async fn len(&self) -> usize {
        self.renders.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRenderer {
        counts: AtomicUsize,
        renders: AtomicUsize,
    }

    impl PageRenderer for CountingRenderer {
        fn page_count(&self, document: &[u8]) -> Result<usize, RenderError> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            Ok(document.len())
        }

        fn render_halves(
            &self,
            _document: &[u8],
            page_index: usize,
            dpi: u32,
        ) -> Result<PageHalves, RenderError> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(PageHalves {
                left: vec![page_index as u8, 0],
                right: dpi.to_le_bytes().to_vec(),
            })
        }
    }

    fn document(bytes: &'static [u8]) -> Document {
        Document {
            id: DocumentId::from_bytes(bytes),
            file_name: "deck.pdf".to_string(),
            bytes: Bytes::from_static(bytes),
            page_count: bytes.len(),
        }
    }

    fn setup(capacity: usize) -> (Arc<CountingRenderer>, RenderCache) {
        let renderer = Arc::new(CountingRenderer::default());
        let cache = RenderCache::new(renderer.clone(), capacity);
        (renderer, cache)
    }

    #[tokio::test]
    async fn renders_each_key_once() {
        let (renderer, cache) = setup(8);
        let doc = document(b"abcd");

        let first = cache.get_or_render(&doc, 2, 200).await.unwrap();
        let second = cache.get_or_render(&doc, 2, 200).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn dpi_change_is_a_miss() {
        let (renderer, cache) = setup(8);
        let doc = document(b"abcd");

        cache.get_or_render(&doc, 0, 200).await.unwrap();
        cache.get_or_render(&doc, 0, 240).await.unwrap();

        assert_eq!(renderer.renders.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn identical_uploads_share_entries() {
        let (renderer, cache) = setup(8);
        let a = document(b"same");
        let b = Document {
            file_name: "copy.pdf".to_string(),
            ..document(b"same")
        };

        cache.get_or_render(&a, 1, 200).await.unwrap();
        cache.get_or_render(&b, 1, 200).await.unwrap();

        assert_eq!(renderer.renders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn out_of_range_page_is_rejected_before_rendering() {
        let (renderer, cache) = setup(8);
        let doc = document(b"ab");

        let err = cache.get_or_render(&doc, 2, 200).await.unwrap_err();

        assert!(matches!(err, RenderError::IndexOutOfRange { index: 2, total: 2 }));
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn page_count_is_memoized() {
        let (renderer, cache) = setup(8);
        let bytes = Bytes::from_static(b"xyz");
        let id = DocumentId::from_bytes(&bytes);

        assert_eq!(cache.page_count(&id, bytes.clone()).await.unwrap(), 3);
        assert_eq!(cache.page_count(&id, bytes).await.unwrap(), 3);
        assert_eq!(renderer.counts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn capacity_bounds_entries() {
        let (_, cache) = setup(2);
        let doc = document(b"abcdef");

        for page in 0..5 {
            cache.get_or_render(&doc, page, 200).await.unwrap();
        }

        assert_eq!(cache.len().await, 2);
    }
}
