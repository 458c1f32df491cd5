//! # Gating Pipeline
//!
//! Decides, for each item pulled from a node's predecessor, whether the item is
//! suppressed, written straight to the output queue, buffered for resolution at
//! end of stream, or dispatched to the node's operator function.
//!
//! Rules are applied in a fixed order:
//!
//! 1. A node that already finished (`first` fired, or its downstream went away)
//!    drains and discards.
//! 2. `ignore_elements` suppresses everything.
//! 3. `sample` suppresses items closer than the interval to the last accepted
//!    sample.
//! 4. `debounce` suppresses items closer than the interval to the previous
//!    arrival, accepted or not.
//! 5. `filter`/`first_where` suppress values failing the predicate.
//! 6. Error values are written straight through unless errors are accepted as
//!    values.
//! 7. The item counts as a survivor; buffering operators keep it for
//!    resolution and stop here.
//! 8. `distinct` suppresses values it has already forwarded.
//! 9. Everything else is dispatched, and `first` finishes the node.

use crate::error::Item;
use crate::operator::Operator;
use tokio::time::Instant;

/// Outcome of evaluating one item.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict<T> {
  /// Drop the item.
  Suppress,
  /// Write the item to the output queue without running the operator function.
  Emit(Item<T>),
  /// The item was kept for resolution at end of stream.
  Buffer,
  /// Run the operator function on the item.
  Dispatch(Item<T>),
}

/// Per-node gating state.
///
/// Owned by the node's worker task; nothing else reads or writes it.
#[derive(Debug)]
pub struct Gate<T> {
  operator: Operator<T>,
  accept_errors: bool,
  accumulated: Vec<Item<T>>,
  survivors: usize,
  last_arrival: Instant,
  last_sample: Instant,
  done: bool,
}

impl<T> Gate<T> {
  /// Creates a gate whose interval anchors start at `start`.
  pub fn new(operator: Operator<T>, accept_errors: bool, start: Instant) -> Self {
    Self {
      operator,
      accept_errors,
      accumulated: Vec::new(),
      survivors: 0,
      last_arrival: start,
      last_sample: start,
      done: false,
    }
  }

  /// Evaluates one item that arrived at `now`.
  pub fn evaluate(&mut self, item: Item<T>, now: Instant) -> Verdict<T> {
    let since_arrival = now.saturating_duration_since(self.last_arrival);
    self.last_arrival = now;

    if self.done {
      return Verdict::Suppress;
    }

    match &self.operator {
      Operator::IgnoreElements => return Verdict::Suppress,
      Operator::Sample(interval) => {
        if now.saturating_duration_since(self.last_sample) < *interval {
          return Verdict::Suppress;
        }
        self.last_sample = now;
      }
      Operator::Debounce(interval) => {
        if since_arrival < *interval {
          return Verdict::Suppress;
        }
      }
      Operator::Filter(predicate) | Operator::FirstWhere(predicate) => {
        if let Ok(value) = &item {
          if !predicate(value) {
            return Verdict::Suppress;
          }
        }
      }
      _ => {}
    }

    if item.is_err() && !self.accept_errors {
      return Verdict::Emit(item);
    }

    self.survivors += 1;
    if self.operator.buffers() {
      self.accumulated.push(item);
      return Verdict::Buffer;
    }

    if let Operator::Distinct(seen) = &mut self.operator {
      if !seen.insert(&item) {
        return Verdict::Suppress;
      }
    }

    if self.operator.is_first() {
      self.done = true;
    }
    Verdict::Dispatch(item)
  }

  /// Stops the gate; every later item is drained and discarded.
  pub fn halt(&mut self) {
    self.done = true;
  }

  /// Returns `true` once the gate discards everything.
  pub fn is_done(&self) -> bool {
    self.done
  }

  /// Number of items that passed gating so far.
  pub fn survivors(&self) -> usize {
    self.survivors
  }

  /// The operator this gate evaluates.
  pub fn operator(&self) -> &Operator<T> {
    &self.operator
  }

  /// Whether error values are treated as ordinary values.
  pub fn accepts_errors(&self) -> bool {
    self.accept_errors
  }

  /// Takes the buffered survivors, in arrival order.
  pub fn take_accumulated(&mut self) -> Vec<Item<T>> {
    std::mem::take(&mut self.accumulated)
  }
}
