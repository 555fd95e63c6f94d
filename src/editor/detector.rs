//! Host-editor family detection.

use std::fmt;

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::host::{value_as_i64, EditorHandle};

/// The two supported host-editor families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    /// Editors exposing the `nvim_*` API surface.
    Neovim,
    /// Legacy editors driven through ex-commands and `term_*` functions.
    Vim,
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorKind::Neovim => write!(f, "neovim"),
            EditorKind::Vim => write!(f, "vim"),
        }
    }
}

/// Memoizing editor-family detector.
///
/// Detection is a host round-trip, so the result is probed once and cached
/// for the detector's lifetime. [`EditorDetector::reset`] clears the memo;
/// it exists for environment re-evaluation in tests and is not part of the
/// normal session flow.
#[derive(Debug, Default)]
pub struct EditorDetector {
    cached: OnceCell<EditorKind>,
}

impl EditorDetector {
    /// Create a detector with an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect the editor family, probing the host at most once.
    ///
    /// The probe asks for the `nvim` feature flag; anything other than a
    /// positive answer (including probe failures) classifies as
    /// [`EditorKind::Vim`].
    pub async fn detect(&self, host: &dyn EditorHandle) -> EditorKind {
        *self.cached.get_or_init(|| probe(host)).await
    }

    /// Clear the memo so the next [`detect`](Self::detect) probes again.
    pub fn reset(&mut self) {
        self.cached = OnceCell::new();
    }
}

async fn probe(host: &dyn EditorHandle) -> EditorKind {
    match host.call("has", vec![Value::from("nvim")]).await {
        Ok(value) if value_as_i64(&value) == Some(1) => EditorKind::Neovim,
        _ => EditorKind::Vim,
    }
}
