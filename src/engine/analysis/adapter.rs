// ── Analysis: Segmenter Adapter Boundary ───────────────────────────────────
// The morphological segmenter is an external capability. This module owns
// the trait seam and the one-time initialization guard; it never implements
// segmentation itself.
//
// Initialization contract: building a segmenter is asynchronous and may
// fail. Concurrent first callers must share one in-flight build instead of
// racing to build duplicates, and a build failure must surface to every
// pending and future caller until a retry succeeds. `tokio::sync::OnceCell::
// get_or_try_init` provides exactly these semantics.

use crate::atoms::error::EngineResult;
use crate::atoms::types::Morpheme;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A ready morphological segmenter.
#[async_trait]
pub trait MorphemeSegmenter: Send + Sync {
    /// Split raw text into an ordered morpheme sequence.
    async fn segment(&self, text: &str) -> EngineResult<Vec<Morpheme>>;
}

/// Builds a segmenter once. Supplied by the caller; the engine decides when.
#[async_trait]
pub trait SegmenterBuilder: Send + Sync {
    async fn build(&self) -> EngineResult<Arc<dyn MorphemeSegmenter>>;
}

/// Lazily-initialized, process-wide segmenter handle.
pub(crate) struct SegmenterHandle {
    builder: Box<dyn SegmenterBuilder>,
    cell: OnceCell<Arc<dyn MorphemeSegmenter>>,
}

impl SegmenterHandle {
    pub fn new(builder: Box<dyn SegmenterBuilder>) -> Self {
        SegmenterHandle {
            builder,
            cell: OnceCell::new(),
        }
    }

    /// Get the segmenter, building it on first use.
    pub async fn get(&self) -> EngineResult<&Arc<dyn MorphemeSegmenter>> {
        self.cell
            .get_or_try_init(|| async {
                info!("[analysis] Building morpheme segmenter");
                self.builder.build().await
            })
            .await
    }
}
