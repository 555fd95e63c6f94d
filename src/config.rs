//! Session configuration.
//!
//! Configuration lives in host-editor global variables and is read once when
//! a backend is created; changing a variable afterwards does not affect the
//! live session. Malformed or missing values fold to the defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::{value_as_i64, EditorHandle};

/// Global variable holding the window layout (`split`, `vsplit`, `floating`).
pub const VAR_OPEN_TYPE: &str = "agent_dock_open_type";
/// Global variable holding the assistant launch command.
pub const VAR_COMMAND: &str = "agent_dock_command";
/// Global variable holding the floating-window width in columns.
pub const VAR_FLOAT_WIDTH: &str = "agent_dock_floatwin_width";
/// Global variable holding the floating-window height in rows.
pub const VAR_FLOAT_HEIGHT: &str = "agent_dock_floatwin_height";
/// Global variable holding the floating-window style (e.g. `minimal`).
pub const VAR_FLOAT_STYLE: &str = "agent_dock_floatwin_style";
/// Global variable holding the floating-window border (e.g. `rounded`).
pub const VAR_FLOAT_BORDER: &str = "agent_dock_floatwin_border";
/// Global variable holding the floating-window blend level (0-100).
pub const VAR_FLOAT_BLEND: &str = "agent_dock_floatwin_blend";

/// Default assistant launch command.
pub const DEFAULT_COMMAND: &str = "claude";
/// Default floating-window width in columns.
pub const DEFAULT_WIDTH: u32 = 100;
/// Default floating-window height in rows.
pub const DEFAULT_HEIGHT: u32 = 20;

/// Window arrangement used to present the assistant session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Horizontal split window.
    Split,
    /// Vertical split window.
    Vsplit,
    /// Floating overlay window.
    #[default]
    Floating,
}

impl Layout {
    /// Whether this layout uses a split window (as opposed to an overlay).
    pub fn is_split(&self) -> bool {
        matches!(self, Layout::Split | Layout::Vsplit)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Split => "split",
            Layout::Vsplit => "vsplit",
            Layout::Floating => "floating",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Layout {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "split" => Ok(Layout::Split),
            "vsplit" => Ok(Layout::Vsplit),
            "floating" => Ok(Layout::Floating),
            _ => Err(()),
        }
    }
}

/// Configuration snapshot for one assistant session.
///
/// Value object: read once at backend creation and owned by the backend for
/// its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Window layout for presenting the session.
    pub layout: Layout,
    /// Command line that launches the assistant process.
    pub command: String,
    /// Floating-window width in columns.
    pub width: u32,
    /// Floating-window height in rows.
    pub height: u32,
    /// Floating-window style, e.g. `minimal`.
    pub style: Option<String>,
    /// Floating-window border, e.g. `rounded`.
    pub border: Option<String>,
    /// Floating-window blend level (0-100).
    pub blend: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Floating,
            command: DEFAULT_COMMAND.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            style: None,
            border: None,
            blend: None,
        }
    }
}

impl SessionConfig {
    /// Load the configuration from host-editor global variables.
    ///
    /// Variables that are unset, of the wrong type, or fail to read fold to
    /// the corresponding default.
    pub async fn load(host: &dyn EditorHandle) -> Self {
        let mut config = Self::default();

        if let Some(layout) = get_str(host, VAR_OPEN_TYPE).await {
            if let Ok(layout) = layout.parse() {
                config.layout = layout;
            }
        }
        if let Some(command) = get_str(host, VAR_COMMAND).await {
            if !command.trim().is_empty() {
                config.command = command;
            }
        }
        if let Some(width) = get_u32(host, VAR_FLOAT_WIDTH).await {
            config.width = width;
        }
        if let Some(height) = get_u32(host, VAR_FLOAT_HEIGHT).await {
            config.height = height;
        }
        config.style = get_str(host, VAR_FLOAT_STYLE).await;
        config.border = get_str(host, VAR_FLOAT_BORDER).await;
        config.blend = get_u32(host, VAR_FLOAT_BLEND).await;

        config
    }

    /// Name tag identifying the assistant's terminal buffer.
    ///
    /// Terminal buffers are named after the command they run, so the
    /// basename of the command's program token is the stable piece to
    /// search for when scanning buffers.
    pub fn command_tag(&self) -> &str {
        command_tag(&self.command)
    }
}

/// Basename of a command line's program token.
pub fn command_tag(command: &str) -> &str {
    let program = command.split_whitespace().next().unwrap_or(DEFAULT_COMMAND);
    program.rsplit('/').next().unwrap_or(program)
}

async fn get_str(host: &dyn EditorHandle, name: &str) -> Option<String> {
    match host.get_var(name).await {
        Ok(Some(Value::String(s))) => Some(s),
        _ => None,
    }
}

async fn get_u32(host: &dyn EditorHandle, name: &str) -> Option<u32> {
    match host.get_var(name).await {
        Ok(Some(value)) => value_as_i64(&value).and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}
