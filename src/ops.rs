//! Inbound facade for the plugin glue.
//!
//! Editor commands resolve their arguments and call these thin wrappers;
//! they never touch adapters or the multiplexer directly.

use crate::session::SessionManager;
use crate::Result;

/// Options for prompt delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Surface the session window before delivering the prompt. Disabled
    /// by the silent command variants.
    pub open_buffer: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self { open_buffer: true }
    }
}

/// Open (or re-surface) the assistant session.
pub async fn open(manager: &mut SessionManager) -> Result<()> {
    manager.start(None).await
}

/// Send a prompt to the assistant, optionally surfacing its window first.
pub async fn send(manager: &mut SessionManager, text: &str, opts: SendOptions) -> Result<()> {
    if opts.open_buffer {
        manager.show().await?;
    }
    manager.send_prompt(text).await
}

/// Tear the assistant session down.
pub async fn close(manager: &mut SessionManager) -> Result<()> {
    manager.exit().await
}

/// Whether an assistant session is currently live.
pub async fn running(manager: &SessionManager) -> bool {
    manager.is_active().await
}
