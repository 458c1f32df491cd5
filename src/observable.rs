//! # Observable Chains
//!
//! [`Observable`] is the chain-building handle. Each operator method consumes
//! the handle, creates a [`PipelineNode`] wired to the current end of the
//! chain, starts the node's worker task, and returns a handle to the new end.
//!
//! Operator methods spawn Tokio tasks and must be called from within a Tokio
//! runtime.
//!
//! ## Example
//!
//! ```rust,no_run
//! use streamgate::observable::Observable;
//!
//! # async fn example() {
//! let out = Observable::just(vec![0, 1, 2, 3, 4, 5, 3, 4, 5])
//!   .distinct()
//!   .collect_values()
//!   .await;
//! assert_eq!(out, Ok(vec![0, 1, 2, 3, 4, 5]));
//! # }
//! ```
//!
//! ## Chain Defaults
//!
//! A handle carries a [`NodeConfig`], a [`Clock`] and a [`CancellationToken`].
//! Nodes built from it snapshot these at construction. A name set through
//! [`Observable::named`] applies to the next node only.

use crate::clock::{Clock, SystemClock};
use crate::config::{NodeConfig, ThreadingMode};
use crate::dispatch::{Action, Forward};
use crate::error::{FilterError, Item};
use crate::node::{NodeInfo, PipelineNode};
use crate::operator::{Operator, Seen, Window, WindowKind};
use crate::queue::{self, Inflow};
use futures::{Stream, StreamExt};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The current end of a chain of nodes.
pub struct Observable<T> {
  info: NodeInfo,
  predecessor: Option<NodeInfo>,
  root: NodeInfo,
  inflow: Inflow<T>,
  config: NodeConfig,
  clock: Arc<dyn Clock>,
  cancel: CancellationToken,
}

impl<T> Observable<T>
where
  T: Send + 'static,
{
  /// Wraps the read end of an existing queue as a chain origin.
  pub fn from_queue(name: impl Into<String>, inflow: Inflow<T>) -> Self {
    let info = NodeInfo::new(name, "source");
    Self {
      root: info.clone(),
      info,
      predecessor: None,
      inflow,
      config: NodeConfig::default(),
      clock: Arc::new(SystemClock),
      cancel: CancellationToken::new(),
    }
  }

  /// A chain origin emitting `items` (values and error values) and then closing.
  #[allow(clippy::should_implement_trait)]
  pub fn from_iter(items: impl IntoIterator<Item = Item<T>>) -> Self {
    let (outflow, inflow) = queue::unbounded();
    for item in items {
      outflow.send(item);
    }
    outflow.close();
    Self::from_queue("from_iter", inflow)
  }

  /// A chain origin emitting each of `values` and then closing.
  pub fn just(values: impl IntoIterator<Item = T>) -> Self {
    Self::from_iter(values.into_iter().map(Ok))
  }

  /// A chain origin that closes without emitting anything.
  pub fn empty() -> Self {
    Self::from_iter(std::iter::empty())
  }

  /// A chain origin fed by `stream`.
  ///
  /// The stream is pumped by its own task, which stops early when the chain is
  /// cancelled or nothing reads the queue anymore.
  pub fn from_stream<S>(stream: S) -> Self
  where
    S: Stream<Item = Item<T>> + Send + 'static,
  {
    let (outflow, inflow) = queue::unbounded();
    let observable = Self::from_queue("from_stream", inflow);
    let cancel = observable.cancel.clone();
    tokio::spawn(async move {
      let mut stream = Box::pin(stream);
      loop {
        let next = tokio::select! {
          biased;
          _ = cancel.cancelled() => break,
          next = stream.next() => next,
        };
        match next {
          Some(item) => {
            if !outflow.send(item) {
              break;
            }
          }
          None => break,
        }
      }
      outflow.close();
    });
    observable
  }

  /// Replaces the defaults used for nodes built from this handle.
  pub fn with_config(mut self, config: NodeConfig) -> Self {
    self.config = config;
    self
  }

  /// Sets the dispatch mode for subsequently built nodes.
  pub fn with_threading(mut self, threading: ThreadingMode) -> Self {
    self.config.threading = threading;
    self
  }

  /// Sets whether subsequently built nodes accept error values as values.
  pub fn accept_errors(mut self, accept: bool) -> Self {
    self.config.accept_errors_as_values = accept;
    self
  }

  /// Names the next node built from this handle.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.config.name = Some(name.into());
    self
  }

  /// Sets the clock used by subsequently built nodes.
  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  /// Replaces the chain's cancellation token.
  ///
  /// Nodes built afterwards stop when `token` (or any parent of it) is cancelled.
  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancel = token;
    self
  }

  /// The token that stops every node built from this handle.
  pub fn cancellation_token(&self) -> CancellationToken {
    self.cancel.clone()
  }

  /// Identity of the node at the end of the chain.
  pub fn info(&self) -> &NodeInfo {
    &self.info
  }

  /// Identity of the node before the end of the chain, if any.
  pub fn predecessor(&self) -> Option<&NodeInfo> {
    self.predecessor.as_ref()
  }

  /// Identity of the chain origin.
  pub fn root(&self) -> &NodeInfo {
    &self.root
  }

  /// Appends a node running `operator` with the given operator function.
  pub fn gate_with(self, operator: Operator<T>, action: Arc<dyn Action<T>>) -> Self {
    let Observable {
      info,
      root,
      inflow,
      mut config,
      clock,
      cancel,
      ..
    } = self;

    let node_config = config.clone();
    config.name = None;

    let (node, output) = PipelineNode::new(
      operator,
      action,
      node_config,
      Arc::clone(&clock),
      info.clone(),
      root.clone(),
    );
    let node_info = node.info().clone();
    debug!(node = %node_info, predecessor = %info, "chaining node");
    node.spawn(inflow, cancel.child_token());

    Observable {
      info: node_info,
      predecessor: Some(info),
      root,
      inflow: output,
      config,
      clock,
      cancel,
    }
  }

  /// Appends a node running `operator` that forwards surviving items unchanged.
  pub fn gate(self, operator: Operator<T>) -> Self {
    self.gate_with(operator, Arc::new(Forward))
  }

  /// Suppresses every item and mirrors only termination.
  pub fn ignore_elements(self) -> Self {
    self.gate(Operator::IgnoreElements)
  }

  /// Emits only the first item.
  pub fn first(self) -> Self {
    self.gate(Operator::First)
  }

  /// Emits only the first value matching `predicate`.
  pub fn first_where<P>(self, predicate: P) -> Self
  where
    P: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.gate(Operator::FirstWhere(Arc::new(predicate)))
  }

  /// Emits only the last item.
  pub fn last(self) -> Self {
    self.gate(Operator::Last)
  }

  /// Emits only the item at the 1-based `index`.
  pub fn element_at(self, index: usize) -> Self {
    self.gate(Operator::ElementAt(index))
  }

  /// Emits only the first `count` items.
  pub fn take(self, count: usize) -> Self {
    self.gate(Operator::Window(Window::new(WindowKind::Take, count)))
  }

  /// Emits only the last `count` items.
  pub fn take_last(self, count: usize) -> Self {
    self.gate(Operator::Window(Window::new(WindowKind::TakeLast, count)))
  }

  /// Suppresses the first `count` items.
  pub fn skip(self, count: usize) -> Self {
    self.gate(Operator::Window(Window::new(WindowKind::Skip, count)))
  }

  /// Suppresses the last `count` items.
  pub fn skip_last(self, count: usize) -> Self {
    self.gate(Operator::Window(Window::new(WindowKind::SkipLast, count)))
  }

  /// Suppresses items arriving less than `interval` after the previous arrival.
  pub fn debounce(self, interval: Duration) -> Self {
    self.gate(Operator::Debounce(interval))
  }

  /// Suppresses items arriving less than `interval` after the last accepted one.
  pub fn sample(self, interval: Duration) -> Self {
    self.gate(Operator::Sample(interval))
  }

  /// Suppresses values for which `predicate` is false.
  pub fn filter<P>(self, predicate: P) -> Self
  where
    P: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.gate(Operator::Filter(Arc::new(predicate)))
  }

  /// Hands out the read end of the chain's queue.
  pub fn into_stream(self) -> Inflow<T> {
    self.inflow
  }

  /// Drains the chain and returns every item, error values included.
  pub async fn collect(self) -> Vec<Item<T>> {
    self.inflow.collect().await
  }

  /// Drains the chain and returns its values, or the first error value.
  pub async fn collect_values(self) -> Result<Vec<T>, FilterError> {
    let mut values = Vec::new();
    let mut inflow = self.inflow;
    while let Some(item) = inflow.recv().await {
      values.push(item?);
    }
    Ok(values)
  }

  /// Drains the chain, calling `on_item` for each item until the queue closes.
  pub async fn subscribe<F>(self, mut on_item: F)
  where
    F: FnMut(Item<T>),
  {
    let mut inflow = self.inflow;
    while let Some(item) = inflow.recv().await {
      on_item(item);
    }
  }
}

impl<T> Observable<T>
where
  T: Clone + Hash + Eq + Send + 'static,
{
  /// Emits each value the first time it is seen.
  pub fn distinct(self) -> Self {
    self.gate(Operator::Distinct(Seen::by_value()))
  }
}
