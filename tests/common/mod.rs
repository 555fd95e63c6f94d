//! Shared mock collaborators for the integration suites.
//!
//! `MockHost` records every editor round-trip and answers from configured
//! responses; `MockMux` simulates a live multiplexer pane table. Both are
//! plain state behind std mutexes so assertions can inspect exact traffic.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use agent_dock::host::EditorHandle;
use agent_dock::mux::{MuxClient, SplitOrientation};
use agent_dock::{AgentDockError, Result};

/// Recording in-memory editor host.
#[derive(Default)]
pub struct MockHost {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    commands: Mutex<Vec<String>>,
    evals: Mutex<Vec<String>>,
    events: Mutex<Vec<String>>,
    vars: Mutex<HashMap<String, Value>>,
    responses: Mutex<HashMap<String, Value>>,
    keyed_responses: Mutex<HashMap<(String, String), Value>>,
    queued_responses: Mutex<HashMap<String, VecDeque<Value>>>,
    eval_responses: Mutex<HashMap<String, Value>>,
    failing: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `func` with `value` regardless of arguments.
    pub fn respond(&self, func: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(func.to_string(), value);
    }

    /// Answer `func` with `value` when its first argument equals `arg0`.
    pub fn respond_arg(&self, func: &str, arg0: &str, value: Value) {
        self.keyed_responses
            .lock()
            .unwrap()
            .insert((func.to_string(), arg0.to_string()), value);
    }

    /// Queue one-shot answers for `func`, consumed in order before any
    /// other configured response.
    pub fn respond_queue(&self, func: &str, values: Vec<Value>) {
        self.queued_responses
            .lock()
            .unwrap()
            .entry(func.to_string())
            .or_default()
            .extend(values);
    }

    /// Answer an expression eval with `value`.
    pub fn respond_eval(&self, expr: &str, value: Value) {
        self.eval_responses
            .lock()
            .unwrap()
            .insert(expr.to_string(), value);
    }

    /// Make calls to `func` fail.
    pub fn fail(&self, func: &str) {
        self.failing.lock().unwrap().push(func.to_string());
    }

    /// Pre-set a global variable.
    pub fn put_var(&self, name: &str, value: Value) {
        self.vars.lock().unwrap().insert(name.to_string(), value);
    }

    pub fn var(&self, name: &str) -> Option<Value> {
        self.vars.lock().unwrap().get(name).cloned()
    }

    pub fn call_count(&self, func: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == func)
            .count()
    }

    pub fn calls_of(&self, func: &str) -> Vec<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == func)
            .map(|(_, args)| args.clone())
            .collect()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn command_count(&self, prefix: &str) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .count()
    }

    pub fn eval_count(&self, expr: &str) -> usize {
        self.evals
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.as_str() == expr)
            .count()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Total host traffic of any kind.
    pub fn traffic(&self) -> usize {
        self.calls.lock().unwrap().len()
            + self.commands.lock().unwrap().len()
            + self.evals.lock().unwrap().len()
            + self.events.lock().unwrap().len()
    }

    fn lookup(&self, func: &str, args: &[Value]) -> Value {
        if let Some(queue) = self.queued_responses.lock().unwrap().get_mut(func) {
            if let Some(value) = queue.pop_front() {
                return value;
            }
        }
        if let Some(arg0) = args.first().and_then(Value::as_str) {
            if let Some(value) = self
                .keyed_responses
                .lock()
                .unwrap()
                .get(&(func.to_string(), arg0.to_string()))
            {
                return value.clone();
            }
        }
        self.responses
            .lock()
            .unwrap()
            .get(func)
            .cloned()
            .unwrap_or(Value::Null)
    }
}

#[async_trait]
impl EditorHandle for MockHost {
    async fn call(&self, func: &str, args: Vec<Value>) -> Result<Value> {
        if self.failing.lock().unwrap().iter().any(|f| f == func) {
            return Err(AgentDockError::Host(format!("{} failed", func)));
        }
        let reply = self.lookup(func, &args);
        self.calls
            .lock()
            .unwrap()
            .push((func.to_string(), args));
        Ok(reply)
    }

    async fn command(&self, cmd: &str) -> Result<()> {
        self.commands.lock().unwrap().push(cmd.to_string());
        Ok(())
    }

    async fn eval(&self, expr: &str) -> Result<Value> {
        self.evals.lock().unwrap().push(expr.to_string());
        Ok(self
            .eval_responses
            .lock()
            .unwrap()
            .get(expr)
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn get_var(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.vars.lock().unwrap().get(name).cloned())
    }

    async fn set_var(&self, name: &str, value: Value) -> Result<()> {
        self.vars.lock().unwrap().insert(name.to_string(), value);
        Ok(())
    }

    async fn emit(&self, event: &str) -> Result<()> {
        self.events.lock().unwrap().push(event.to_string());
        Ok(())
    }
}

/// Simulated multiplexer with a live pane table.
#[derive(Default)]
pub struct MockMux {
    live: Mutex<Vec<String>>,
    next_ids: Mutex<VecDeque<String>>,
    counter: AtomicUsize,
    splits: Mutex<Vec<(String, String, String)>>,
    joins: Mutex<Vec<String>>,
    breaks: Mutex<Vec<String>>,
    keys: Mutex<Vec<(String, String)>>,
    pasted: Mutex<Vec<(String, String)>>,
    killed: Mutex<Vec<String>>,
}

impl MockMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a pane as alive without going through `split_pane`.
    pub fn add_live_pane(&self, pane: &str) {
        self.live.lock().unwrap().push(pane.to_string());
    }

    /// Kill a pane behind the backend's back.
    pub fn drop_pane(&self, pane: &str) {
        self.live.lock().unwrap().retain(|p| p != pane);
    }

    /// Force the id the next `split_pane` reports (empty simulates a
    /// multiplexer that reported nothing).
    pub fn next_pane_id(&self, pane: &str) {
        self.next_ids.lock().unwrap().push_back(pane.to_string());
    }

    pub fn live_panes(&self) -> Vec<String> {
        self.live.lock().unwrap().clone()
    }

    pub fn splits(&self) -> Vec<(String, String, String)> {
        self.splits.lock().unwrap().clone()
    }

    pub fn joins(&self) -> Vec<String> {
        self.joins.lock().unwrap().clone()
    }

    pub fn breaks(&self) -> Vec<String> {
        self.breaks.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<(String, String)> {
        self.keys.lock().unwrap().clone()
    }

    /// Pane and prompt text of every paste, captured at paste time.
    pub fn pasted(&self) -> Vec<(String, String)> {
        self.pasted.lock().unwrap().clone()
    }

    pub fn killed(&self) -> Vec<String> {
        self.killed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MuxClient for MockMux {
    async fn split_pane(
        &self,
        orientation: SplitOrientation,
        shell: &str,
        command: &str,
    ) -> Result<String> {
        let id = self
            .next_ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("%{}", self.counter.fetch_add(1, Ordering::SeqCst)));
        self.splits.lock().unwrap().push((
            orientation.flag().to_string(),
            shell.to_string(),
            command.to_string(),
        ));
        if !id.is_empty() {
            self.live.lock().unwrap().push(id.clone());
        }
        Ok(id)
    }

    async fn list_panes(&self) -> Result<Vec<String>> {
        Ok(self.live.lock().unwrap().clone())
    }

    async fn join_pane(&self, _orientation: SplitOrientation, pane: &str) -> Result<()> {
        self.joins.lock().unwrap().push(pane.to_string());
        Ok(())
    }

    async fn break_pane(&self, pane: &str) -> Result<()> {
        self.breaks.lock().unwrap().push(pane.to_string());
        Ok(())
    }

    async fn send_key(&self, pane: &str, key: &str) -> Result<()> {
        self.keys
            .lock()
            .unwrap()
            .push((pane.to_string(), key.to_string()));
        Ok(())
    }

    async fn paste_file(&self, pane: &str, path: &Path) -> Result<()> {
        // Read at call time: the file is gone once the backend drops it.
        let content = std::fs::read_to_string(path)?;
        self.pasted
            .lock()
            .unwrap()
            .push((pane.to_string(), content));
        Ok(())
    }

    async fn kill_pane(&self, pane: &str) -> Result<()> {
        self.killed.lock().unwrap().push(pane.to_string());
        self.live.lock().unwrap().retain(|p| p != pane);
        Ok(())
    }
}
