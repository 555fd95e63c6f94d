//! Adapter selection and caching.

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::{EditorAdapter, EditorDetector, EditorKind, NeovimAdapter, VimAdapter};
use crate::host::EditorHandle;

/// Selects the adapter variant matching the running editor and caches it.
///
/// Both detection and the legacy editor's capability probes are host
/// round-trips, so the constructed adapter is shared for the factory's
/// lifetime. One factory lives inside each
/// [`SessionManager`](crate::session::SessionManager).
pub struct AdapterFactory {
    host: Arc<dyn EditorHandle>,
    detector: EditorDetector,
    cached: OnceCell<Arc<dyn EditorAdapter>>,
}

impl AdapterFactory {
    /// Create a factory bound to a host handle.
    pub fn new(host: Arc<dyn EditorHandle>) -> Self {
        Self {
            host,
            detector: EditorDetector::new(),
            cached: OnceCell::new(),
        }
    }

    /// Get the adapter for the running editor, constructing it on first use.
    ///
    /// `terminal_tag` is the buffer-name tag the legacy adapter uses to
    /// re-resolve the assistant's terminal buffer; it is captured on first
    /// acquisition along with the capability probes.
    pub async fn get(&self, terminal_tag: &str) -> Arc<dyn EditorAdapter> {
        self.cached
            .get_or_init(|| async {
                match self.detector.detect(self.host.as_ref()).await {
                    EditorKind::Neovim => {
                        Arc::new(NeovimAdapter::new(Arc::clone(&self.host))) as Arc<dyn EditorAdapter>
                    }
                    EditorKind::Vim => Arc::new(
                        VimAdapter::probe(Arc::clone(&self.host), terminal_tag.to_string()).await,
                    ) as Arc<dyn EditorAdapter>,
                }
            })
            .await
            .clone()
    }

    /// Drop the cached adapter and detection memo.
    ///
    /// The next [`get`](Self::get) re-probes the host from scratch.
    pub fn reset(&mut self) {
        self.cached = OnceCell::new();
        self.detector.reset();
    }
}
