//! # Dispatch Controller
//!
//! Runs a node's operator function ([`Action`]) for each item that survives
//! gating, either inline on the worker task or as a separately scheduled task
//! per item, and keeps a join barrier over the tasks it launched so the node
//! can wait for all of them before closing its queue.
//!
//! In [`ThreadingMode::Concurrent`] a `Flow::Stop` returned by a running task
//! is only noticed by the worker on its next item; a few extra items may be
//! dispatched before the node stops.

use crate::config::ThreadingMode;
use crate::error::Item;
use crate::queue::Outflow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinSet;
use tracing::warn;

/// Whether a node keeps pulling input after an action ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  /// Keep going.
  Continue,
  /// Stop dispatching; drain the rest of the input.
  Stop,
}

/// The per-item operator function of a node.
///
/// An action writes whatever it produces to the node's output queue and
/// reports whether the node should stop.
pub trait Action<T>: Send + Sync {
  /// Handles one surviving item.
  fn apply(&self, item: Item<T>, out: &Outflow<T>) -> Flow;
}

/// Forwards each item unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Forward;

impl<T> Action<T> for Forward {
  fn apply(&self, item: Item<T>, out: &Outflow<T>) -> Flow {
    if out.send(item) {
      Flow::Continue
    } else {
      Flow::Stop
    }
  }
}

/// Transforms each value, then forwards it. Error values pass through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct MapForward<F>(pub F);

impl<T, F> Action<T> for MapForward<F>
where
  F: Fn(T) -> T + Send + Sync,
{
  fn apply(&self, item: Item<T>, out: &Outflow<T>) -> Flow {
    Forward.apply(item.map(&self.0), out)
  }
}

/// Dispatches items for one node and tracks the work it launched.
pub struct Dispatcher<T> {
  mode: ThreadingMode,
  action: Arc<dyn Action<T>>,
  outflow: Arc<Outflow<T>>,
  stop: Arc<AtomicBool>,
  tasks: JoinSet<()>,
}

impl<T> Dispatcher<T>
where
  T: Send + 'static,
{
  /// Creates a dispatcher writing to `outflow`.
  pub fn new(mode: ThreadingMode, action: Arc<dyn Action<T>>, outflow: Arc<Outflow<T>>) -> Self {
    Self {
      mode,
      action,
      outflow,
      stop: Arc::new(AtomicBool::new(false)),
      tasks: JoinSet::new(),
    }
  }

  /// Runs the action for `item` according to the dispatch mode.
  ///
  /// Sequential dispatch reports the action's `Flow` immediately. Concurrent
  /// dispatch reports `Stop` only if an earlier task already asked to stop.
  pub fn dispatch(&mut self, item: Item<T>) -> Flow {
    match self.mode {
      ThreadingMode::Sequential => self.dispatch_inline(item),
      ThreadingMode::Concurrent => {
        let action = Arc::clone(&self.action);
        let outflow = Arc::clone(&self.outflow);
        let stop = Arc::clone(&self.stop);
        self.tasks.spawn(async move {
          if action.apply(item, &outflow) == Flow::Stop {
            stop.store(true, Ordering::Release);
          }
        });
        self.flow()
      }
    }
  }

  /// Runs the action for `item` on the caller's task, whatever the mode.
  pub fn dispatch_inline(&mut self, item: Item<T>) -> Flow {
    if self.action.apply(item, &self.outflow) == Flow::Stop {
      self.stop.store(true, Ordering::Release);
    }
    self.flow()
  }

  /// Writes `item` straight to the output queue, bypassing the action.
  pub fn emit(&self, item: Item<T>) -> bool {
    self.outflow.send(item)
  }

  /// Returns `Stop` once any action asked the node to stop.
  pub fn flow(&self) -> Flow {
    if self.stop.load(Ordering::Acquire) {
      Flow::Stop
    } else {
      Flow::Continue
    }
  }

  /// Number of launched tasks not yet joined.
  pub fn outstanding(&self) -> usize {
    self.tasks.len()
  }

  /// Waits for every launched task to finish.
  pub async fn join(&mut self) {
    while let Some(result) = self.tasks.join_next().await {
      if let Err(err) = result {
        if err.is_panic() {
          warn!("dispatch task panicked: {}", err);
        }
      }
    }
  }

  /// Cancels every launched task without waiting for it.
  ///
  /// A task already running its action finishes in the background; once the
  /// queue is closed its writes are dropped.
  pub fn abort(&mut self) {
    self.tasks.abort_all();
    self.tasks.detach_all();
  }
}
