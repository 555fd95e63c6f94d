//! Terminal-multiplexer boundary.
//!
//! The assistant can run in a pane of an external multiplexer living next
//! to the editor. [`MuxClient`] covers the handful of pane operations the
//! session core needs; the real [`Tmux`] implementation shells out to the
//! `tmux` binary and parses its stdout as plain text.

mod tmux;

pub use tmux::Tmux;

use std::path::Path;

use async_trait::async_trait;

use crate::config::Layout;
use crate::Result;

/// Direction a new or rejoined pane is attached in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOrientation {
    /// Stack the pane below the current one.
    Below,
    /// Place the pane beside the current one.
    Beside,
}

impl SplitOrientation {
    /// Orientation matching a window layout.
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Vsplit => SplitOrientation::Beside,
            _ => SplitOrientation::Below,
        }
    }

    /// The multiplexer's flag for this orientation.
    pub fn flag(&self) -> &'static str {
        match self {
            SplitOrientation::Below => "-v",
            SplitOrientation::Beside => "-h",
        }
    }
}

/// Pane operations against the multiplexer.
///
/// All calls are fire-and-wait external command executions. Liveness
/// queries ([`pane_exists`](MuxClient::pane_exists)) never error: a failed
/// or garbled query means "does not exist", biasing callers toward safe
/// recreation over trusting a stale pane id.
#[async_trait]
pub trait MuxClient: Send + Sync {
    /// Split off a new pane running `command` under `shell` and return the
    /// new pane id reported by the multiplexer.
    async fn split_pane(
        &self,
        orientation: SplitOrientation,
        shell: &str,
        command: &str,
    ) -> Result<String>;

    /// List the ids of all live panes across all sessions.
    async fn list_panes(&self) -> Result<Vec<String>>;

    /// Whether `pane` is currently alive.
    async fn pane_exists(&self, pane: &str) -> bool {
        match self.list_panes().await {
            Ok(panes) => panes.iter().any(|p| p == pane),
            Err(_) => false,
        }
    }

    /// Rejoin a detached pane into the current window layout.
    async fn join_pane(&self, orientation: SplitOrientation, pane: &str) -> Result<()>;

    /// Detach `pane` into its own window without destroying it.
    async fn break_pane(&self, pane: &str) -> Result<()>;

    /// Inject a single keystroke (e.g. `C-m`, `C-c`) into `pane`.
    async fn send_key(&self, pane: &str, key: &str) -> Result<()>;

    /// Deliver the contents of `path` into `pane` verbatim via a scratch
    /// paste-buffer (load, paste, delete as one logical unit).
    async fn paste_file(&self, pane: &str, path: &Path) -> Result<()>;

    /// Kill `pane`.
    async fn kill_pane(&self, pane: &str) -> Result<()>;
}

/// Parse a pane-id listing: one id per line, optionally quoted.
pub(crate) fn parse_pane_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim().trim_matches('\'').to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
