//! # agent-dock
//!
//! Session and backend core for hosting an interactive CLI coding
//! assistant inside an editor.
//!
//! The assistant process runs either in a terminal buffer embedded in the
//! editor or in a pane of a terminal multiplexer next to it. This crate
//! decides where it runs, tracks its lifecycle, relays prompts to it, and
//! normalizes the differences between editor families behind one contract.
//!
//! ## Architecture
//!
//! - [`host::EditorHandle`]: narrow RPC seam to the host editor, owned by
//!   the plugin glue embedding this crate
//! - [`editor`]: editor-family detection and the capability adapters
//! - [`mux`]: terminal-multiplexer pane operations (tmux)
//! - [`backend`]: the two session backends (embedded terminal, pane)
//! - [`session::SessionManager`]: the single handle external callers use
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use agent_dock::{ops, EditorHandle, SessionManager, Tmux};
//!
//! async fn plugin_init(host: Arc<dyn EditorHandle>) -> agent_dock::Result<()> {
//!     agent_dock::logging::try_init().ok();
//!
//!     let mut manager = SessionManager::new(host, Arc::new(Tmux::new()));
//!     ops::open(&mut manager).await?;
//!     ops::send(&mut manager, "explain this project", Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod editor;
pub mod error;
pub mod host;
pub mod logging;
pub mod mux;
pub mod ops;
pub mod session;

// Re-export commonly used types
pub use backend::{Backend, BackendKind, PaneBackend, SessionHandle, TerminalBackend};
pub use config::{Layout, SessionConfig};
pub use editor::{
    AdapterFactory, EditorAdapter, EditorDetector, EditorKind, NeovimAdapter, VimAdapter,
};
pub use error::{AgentDockError, Result};
pub use host::EditorHandle;
pub use mux::{MuxClient, SplitOrientation, Tmux};
pub use ops::SendOptions;
pub use session::SessionManager;
