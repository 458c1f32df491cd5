//! # Node Queues
//!
//! Every pipeline node owns one unbounded FIFO. The node holds the write end
//! ([`Outflow`]) and is its only writer; the downstream node or consumer holds
//! the read end ([`Inflow`]) and is its only reader. Closing the write end is
//! the sole end-of-stream signal.
//!
//! ## Usage
//!
//! ```rust
//! use streamgate::queue;
//! use futures::StreamExt;
//!
//! # async fn example() {
//! let (outflow, mut inflow) = queue::unbounded::<i32>();
//! outflow.send(Ok(1));
//! outflow.close();
//! assert_eq!(inflow.next().await, Some(Ok(1)));
//! assert_eq!(inflow.next().await, None);
//! # }
//! ```

use crate::error::Item;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::trace;

/// Allocates a new unbounded queue and returns its write and read ends.
pub fn unbounded<T>() -> (Outflow<T>, Inflow<T>) {
  let (tx, rx) = mpsc::unbounded_channel();
  (
    Outflow {
      tx: Mutex::new(Some(tx)),
    },
    Inflow {
      inner: UnboundedReceiverStream::new(rx),
    },
  )
}

/// Write end of a node queue.
///
/// Shared by reference between a node's worker and the concurrent dispatch
/// tasks it spawns. Closing happens at most once; sends after close are
/// dropped.
#[derive(Debug)]
pub struct Outflow<T> {
  tx: Mutex<Option<UnboundedSender<Item<T>>>>,
}

impl<T> Outflow<T> {
  /// Writes an item to the queue.
  ///
  /// Returns `false` when the item could not be delivered, either because the
  /// queue is closed or because the reader has gone away.
  pub fn send(&self, item: Item<T>) -> bool {
    let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
    match guard.as_ref() {
      Some(tx) => tx.send(item).is_ok(),
      None => false,
    }
  }

  /// Closes the queue.
  ///
  /// Returns `true` for the call that actually closed it and `false` for every
  /// later call.
  pub fn close(&self) -> bool {
    let taken = self.tx.lock().unwrap_or_else(|e| e.into_inner()).take();
    let closed = taken.is_some();
    trace!("Outflow::close() -> {}", closed);
    closed
  }

  /// Returns `true` once the queue is closed or its reader has been dropped.
  pub fn is_closed(&self) -> bool {
    let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
    guard.as_ref().is_none_or(|tx| tx.is_closed())
  }
}

/// Read end of a node queue.
///
/// Yields items in FIFO order and ends once the writer closes the queue.
#[pin_project]
#[derive(Debug)]
pub struct Inflow<T> {
  #[pin]
  inner: UnboundedReceiverStream<Item<T>>,
}

impl<T> Inflow<T> {
  /// Receives the next item, or `None` once the queue is closed and drained.
  pub async fn recv(&mut self) -> Option<Item<T>> {
    StreamExt::next(self).await
  }
}

impl<T> Stream for Inflow<T> {
  type Item = Item<T>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    self.project().inner.poll_next(cx)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.inner.size_hint()
  }
}
