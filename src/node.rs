//! # Pipeline Nodes
//!
//! A [`PipelineNode`] is one gating stage of a chain. It owns the write end of
//! its output queue and is driven by one dedicated worker task that:
//!
//! 1. pulls items from the predecessor's queue and runs them through the
//!    node's [`Gate`],
//! 2. dispatches surviving items through its [`Dispatcher`],
//! 3. once the predecessor closes, resolves buffered operators, joins all
//!    dispatch work, reports `InputNotFound` for an empty `first`/`last`,
//! 4. closes its own queue, which is the only termination signal downstream.
//!
//! Cancelling the node's token stops it abruptly at any point before its queue
//! is closed, including while it waits on dispatch work. Outstanding dispatch
//! tasks are aborted and the queue is closed without resolution.

use crate::clock::Clock;
use crate::config::NodeConfig;
use crate::dispatch::{Action, Dispatcher, Flow};
use crate::error::{ComponentInfo, FilterError};
use crate::gate::{Gate, Verdict};
use crate::operator::Operator;
use crate::queue::{self, Inflow, Outflow};
use crate::resolve::{Resolution, resolve};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node in a chain, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeInfo {
  /// Process-unique node id.
  pub id: u64,
  /// Node name; defaults to the operator kind.
  pub name: String,
  /// Operator kind, or `"source"` for chain origins.
  pub kind: &'static str,
}

impl NodeInfo {
  /// Allocates a fresh identity.
  pub fn new(name: impl Into<String>, kind: &'static str) -> Self {
    Self {
      id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
      name: name.into(),
      kind,
    }
  }

  /// Component information for error reporting.
  pub fn component_info(&self) -> ComponentInfo {
    ComponentInfo::new(self.name.clone(), self.kind.to_string())
  }
}

impl fmt::Display for NodeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}#{}", self.name, self.id)
  }
}

/// One gating stage of a chain.
pub struct PipelineNode<T> {
  info: NodeInfo,
  predecessor: NodeInfo,
  root: NodeInfo,
  config: NodeConfig,
  operator: Operator<T>,
  action: Arc<dyn Action<T>>,
  clock: Arc<dyn Clock>,
  outflow: Arc<Outflow<T>>,
}

impl<T> PipelineNode<T>
where
  T: Send + 'static,
{
  /// Creates a node and allocates its output queue.
  ///
  /// Returns the node together with the read end of its queue, which belongs
  /// to whatever sits downstream.
  pub fn new(
    operator: Operator<T>,
    action: Arc<dyn Action<T>>,
    config: NodeConfig,
    clock: Arc<dyn Clock>,
    predecessor: NodeInfo,
    root: NodeInfo,
  ) -> (Self, Inflow<T>) {
    let kind = operator.kind();
    let name = config.name().unwrap_or_else(|| kind.to_string());
    let (outflow, inflow) = queue::unbounded();
    let node = Self {
      info: NodeInfo::new(name, kind),
      predecessor,
      root,
      config,
      operator,
      action,
      clock,
      outflow: Arc::new(outflow),
    };
    (node, inflow)
  }

  /// This node's identity.
  pub fn info(&self) -> &NodeInfo {
    &self.info
  }

  /// The upstream node's identity.
  pub fn predecessor(&self) -> &NodeInfo {
    &self.predecessor
  }

  /// The chain origin's identity.
  pub fn root(&self) -> &NodeInfo {
    &self.root
  }

  /// The node's configuration.
  pub fn config(&self) -> &NodeConfig {
    &self.config
  }

  /// Starts the node's worker task draining `input`.
  pub fn spawn(self, input: Inflow<T>, cancel: CancellationToken) -> JoinHandle<()> {
    debug!(
      node = %self.info,
      predecessor = %self.predecessor,
      root = %self.root,
      threading = ?self.config.threading(),
      "spawning node"
    );
    tokio::spawn(self.run(input, cancel))
  }

  /// The worker loop. Completes once the output queue is closed.
  pub async fn run(self, mut input: Inflow<T>, cancel: CancellationToken) {
    let PipelineNode {
      info,
      config,
      operator,
      action,
      clock,
      outflow,
      ..
    } = self;

    let mut gate = Gate::new(operator, config.accept_errors(), clock.now());
    let mut dispatcher = Dispatcher::new(config.threading(), action, Arc::clone(&outflow));

    loop {
      let next = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
          shut_down(&info, &mut dispatcher, &outflow);
          return;
        }
        next = input.recv() => next,
      };
      let Some(item) = next else {
        break;
      };

      let now = clock.now();
      if !gate.is_done() && dispatcher.flow() == Flow::Stop {
        debug!(node = %info, "downstream stopped, draining input");
        gate.halt();
      }

      match gate.evaluate(item, now) {
        Verdict::Suppress => trace!(node = %info, "suppress"),
        Verdict::Buffer => trace!(node = %info, "buffer"),
        Verdict::Emit(item) => {
          trace!(node = %info, "emit error value");
          dispatcher.emit(item);
        }
        Verdict::Dispatch(item) => {
          trace!(node = %info, "dispatch");
          if dispatcher.dispatch(item) == Flow::Stop {
            gate.halt();
          }
        }
      }
    }

    if cancel.is_cancelled() {
      shut_down(&info, &mut dispatcher, &outflow);
      return;
    }

    let accumulated = gate.take_accumulated();
    match resolve(gate.operator(), accumulated) {
      Resolution::Nothing => {}
      Resolution::Dispatch(items) => {
        trace!(node = %info, count = items.len(), "dispatching resolved window");
        for item in items {
          if dispatcher.dispatch_inline(item) == Flow::Stop {
            break;
          }
        }
      }
      Resolution::Fail(err) => {
        warn!(component = %info.component_info(), error = %err, "window resolution failed");
        dispatcher.emit(Err(err));
      }
    }

    let cancelled = tokio::select! {
      biased;
      _ = cancel.cancelled() => true,
      _ = dispatcher.join() => false,
    };
    if cancelled {
      shut_down(&info, &mut dispatcher, &outflow);
      return;
    }

    if gate.operator().requires_survivor() && gate.survivors() == 0 && !gate.accepts_errors() {
      warn!(component = %info.component_info(), "no item survived gating");
      dispatcher.emit(Err(FilterError::InputNotFound));
    }

    outflow.close();
    debug!(node = %info, survivors = gate.survivors(), "node finished");
  }
}

/// Stops a node abruptly: outstanding dispatch work is aborted and the queue
/// is closed without resolving anything.
fn shut_down<T>(info: &NodeInfo, dispatcher: &mut Dispatcher<T>, outflow: &Outflow<T>)
where
  T: Send + 'static,
{
  debug!(node = %info, outstanding = dispatcher.outstanding(), "node cancelled");
  dispatcher.abort();
  outflow.close();
}
