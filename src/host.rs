//! Host editor RPC seam.
//!
//! The plugin glue that embeds this crate owns the actual wire connection to
//! the editor (stdio RPC, msgpack channel, or an in-process bridge) and
//! implements [`EditorHandle`] on top of it. Everything in the core reaches
//! the editor exclusively through this trait, so tests can substitute a
//! recording mock.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Narrow, dynamically typed surface of the host editor.
///
/// All methods are effectful round-trips; each call suspends until the
/// editor has processed it. Values cross the boundary as loosely typed
/// JSON, matching the host's own typing.
#[async_trait]
pub trait EditorHandle: Send + Sync {
    /// Invoke a host function (e.g. `bufnr`, `getbufinfo`, `nvim_open_win`).
    async fn call(&self, func: &str, args: Vec<Value>) -> Result<Value>;

    /// Execute an ex-command (e.g. `terminal claude`, `bdelete! 3`).
    async fn command(&self, cmd: &str) -> Result<()>;

    /// Evaluate an expression (e.g. `&channel`).
    async fn eval(&self, expr: &str) -> Result<Value>;

    /// Read a global variable; `None` when unset.
    async fn get_var(&self, name: &str) -> Result<Option<Value>>;

    /// Write a global variable.
    async fn set_var(&self, name: &str, value: Value) -> Result<()>;

    /// Fire a user event for external listeners.
    async fn emit(&self, event: &str) -> Result<()>;
}

/// Expand an editor expression like `$TMUX` or `$SHELL` to its string value.
///
/// Expansion failures and non-string results fold to an empty string; the
/// callers treat that as "not present".
pub async fn expand(host: &dyn EditorHandle, expr: &str) -> String {
    match host.call("expand", vec![Value::from(expr)]).await {
        Ok(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Extract an integer from a host value, accepting numeric strings.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_i64_number() {
        assert_eq!(value_as_i64(&json!(42)), Some(42));
        assert_eq!(value_as_i64(&json!(0)), Some(0));
    }

    #[test]
    fn test_value_as_i64_string() {
        assert_eq!(value_as_i64(&json!("17")), Some(17));
        assert_eq!(value_as_i64(&json!(" 17\n")), Some(17));
    }

    #[test]
    fn test_value_as_i64_rejects_other() {
        assert_eq!(value_as_i64(&json!("abc")), None);
        assert_eq!(value_as_i64(&json!(null)), None);
        assert_eq!(value_as_i64(&json!([1])), None);
    }
}
