//! Host-editor capability layer.
//!
//! Two editor families are supported and diverge in almost every primitive
//! the session core needs: buffer creation, overlay windows, terminal job
//! handles, sending bytes to a terminal. [`EditorAdapter`] absorbs all of
//! that divergence; callers pick an adapter through [`AdapterFactory`] once
//! and never branch on the editor family again.

mod detector;
mod factory;
mod neovim;
mod vim;

pub use detector::{EditorDetector, EditorKind};
pub use factory::AdapterFactory;
pub use neovim::NeovimAdapter;
pub use vim::VimAdapter;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Host buffer number.
pub type BufferId = i64;
/// Host window (or popup) id.
pub type WindowId = i64;
/// Terminal process channel id.
pub type JobId = i64;

/// Anchor for overlay-window positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Position relative to the whole editor grid.
    #[default]
    Editor,
    /// Position relative to the current window.
    Window,
    /// Position relative to the cursor.
    Cursor,
}

impl Anchor {
    /// Host-side name of the anchor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::Editor => "editor",
            Anchor::Window => "win",
            Anchor::Cursor => "cursor",
        }
    }
}

/// Geometry and decoration of a window to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Width in columns.
    pub width: u32,
    /// Height in rows.
    pub height: u32,
    /// Top row of the window.
    pub row: u32,
    /// Left column of the window.
    pub col: u32,
    /// Positioning anchor.
    pub relative: Anchor,
    /// Optional style, e.g. `minimal`.
    pub style: Option<String>,
    /// Optional border, e.g. `rounded`.
    pub border: Option<String>,
}

/// Buffer-local keymap definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    /// Map mode (`n`, `i`, `v`, ...).
    pub mode: String,
    /// Key sequence to map.
    pub lhs: String,
    /// Replacement sequence or command.
    pub rhs: String,
    /// Non-recursive mapping.
    pub noremap: bool,
    /// Suppress command-line echo.
    pub silent: bool,
    /// Evaluate `rhs` as an expression.
    pub expr: bool,
}

/// Editor-specific primitives behind one uniform contract.
///
/// Every operation is effectful against the host editor. Implementations
/// absorb all per-editor divergence; callers must treat this interface
/// uniformly and never branch on the concrete variant.
#[async_trait]
pub trait EditorAdapter: Send + Sync {
    /// Create a buffer; `listed` controls buffer-list visibility, `scratch`
    /// marks it as a throwaway buffer without a swapfile.
    async fn create_buffer(&self, listed: bool, scratch: bool) -> Result<BufferId>;

    /// Open a window showing `buffer`; `enter` moves focus into it.
    async fn open_window(&self, buffer: BufferId, enter: bool, spec: &WindowSpec)
        -> Result<WindowId>;

    /// Close a window; `force` discards unsaved state.
    async fn close_window(&self, window: WindowId, force: bool) -> Result<()>;

    /// Replace the line range `[start, end)` of `buffer`; `end == -1` means
    /// "to the end of the buffer".
    async fn set_buffer_lines(
        &self,
        buffer: BufferId,
        start: i64,
        end: i64,
        lines: &[String],
    ) -> Result<()>;

    /// Install a buffer-local keymap.
    async fn set_buffer_keymap(&self, buffer: BufferId, map: &Keymap) -> Result<()>;

    /// Set a window-local option.
    async fn set_window_option(&self, window: WindowId, name: &str, value: Value) -> Result<()>;

    /// Resolve the terminal job handle owned by `buffer`.
    ///
    /// Fails with [`crate::AgentDockError::TerminalNotFound`] when the
    /// buffer has no attached process.
    async fn terminal_job_id(&self, buffer: BufferId) -> Result<JobId>;

    /// Send text to a terminal job.
    async fn send_to_terminal(&self, job: JobId, data: &str) -> Result<()>;

    /// Spawn `command` in a new terminal buffer and return its job handle.
    async fn open_terminal(&self, command: &str) -> Result<JobId>;

    /// Whether this editor can show true (or emulated) overlay windows.
    fn supports_floating_windows(&self) -> bool;

    /// Whether this editor has an embedded terminal.
    fn supports_terminal(&self) -> bool;
}
