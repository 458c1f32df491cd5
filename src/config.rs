//! # Node Configuration
//!
//! Settings shared by every gating node, independent of its operator kind:
//! a diagnostic name, the dispatch mode, and whether upstream error values are
//! treated as ordinary values.
//!
//! An [`Observable`](crate::observable::Observable) carries a `NodeConfig` as
//! the defaults for the nodes built from it. Each node snapshots the config at
//! construction and never changes it afterwards.
//!
//! ## Example
//!
//! ```rust
//! use streamgate::config::{NodeConfig, ThreadingMode};
//!
//! let config = NodeConfig::default()
//!   .with_name("dedupe".to_string())
//!   .with_threading(ThreadingMode::Concurrent);
//! assert_eq!(config.threading(), ThreadingMode::Concurrent);
//! assert!(!config.accept_errors());
//! ```

use serde::{Deserialize, Serialize};

/// How a node runs its operator function for each item that survives gating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadingMode {
  /// Inline on the node's worker task. Preserves source order.
  #[default]
  Sequential,
  /// One independently scheduled task per item. Output order is not preserved.
  Concurrent,
}

/// Per-node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
  /// Optional name for identifying the node in logs.
  pub name: Option<String>,
  /// Dispatch mode for surviving items.
  pub threading: ThreadingMode,
  /// When set, upstream error values flow through gating like any other value
  /// and empty `first`/`last` resolve silently.
  pub accept_errors_as_values: bool,
}

impl NodeConfig {
  /// Sets the node name.
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Sets the dispatch mode.
  pub fn with_threading(mut self, threading: ThreadingMode) -> Self {
    self.threading = threading;
    self
  }

  /// Sets whether upstream error values are accepted as ordinary values.
  pub fn with_accept_errors(mut self, accept: bool) -> Self {
    self.accept_errors_as_values = accept;
    self
  }

  /// Returns the configured name, if any.
  pub fn name(&self) -> Option<String> {
    self.name.clone()
  }

  /// Returns the dispatch mode.
  pub fn threading(&self) -> ThreadingMode {
    self.threading
  }

  /// Returns whether error values are accepted as ordinary values.
  pub fn accept_errors(&self) -> bool {
    self.accept_errors_as_values
  }

  /// Parses a configuration from JSON. Missing fields take their defaults.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }
}
