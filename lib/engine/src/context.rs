//! Per-run execution context.
//!
//! Each run gets a fresh context: a variables map, an environment map, and
//! a logger. The logger is a seam so editors and CLIs can capture run
//! output; the default forwards to `tracing`.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Leveled logger receiving human-readable lines during a run.
pub trait RunLogger: Send + Sync {
    /// Logs a node start/finish or other informational line.
    fn info(&self, message: &str);

    /// Logs a skipped processing call or other warning.
    fn warn(&self, message: &str);

    /// Logs a node or flow failure.
    fn error(&self, message: &str);
}

/// Default logger forwarding to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RunLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "flowcap::run", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "flowcap::run", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "flowcap::run", "{message}");
    }
}

/// Per-run input: variables, environment, and a logger.
///
/// Created fresh for each run; never persisted.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Caller-supplied variables, available to capsules that look for them.
    pub variables: HashMap<String, JsonValue>,
    /// Environment values (API endpoints, tenant names, ...).
    pub env: HashMap<String, String>,
    /// Logger receiving leveled lines as the run progresses.
    pub logger: Arc<dyn RunLogger>,
}

impl ExecutionContext {
    /// Creates an empty context with the default tracing logger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            env: HashMap::new(),
            logger: Arc::new(TracingLogger),
        }
    }

    /// Adds a variable.
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.variables.insert(key.into(), value);
        self
    }

    /// Adds an environment value.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Replaces the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("variables", &self.variables)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}
