//! # Windowing Resolver
//!
//! Runs once a node's predecessor has closed, over everything the gate
//! buffered. Produces the items to dispatch, in arrival order, or the error
//! value to emit instead.

use crate::error::{FilterError, Item};
use crate::operator::Operator;

/// Result of resolving a buffered sequence.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<T> {
  /// Nothing to emit.
  Nothing,
  /// Dispatch these items, in order.
  Dispatch(Vec<Item<T>>),
  /// Emit this error value.
  Fail(FilterError),
}

/// Resolves the buffered survivors for `operator`.
///
/// `last` over an empty buffer resolves to [`Resolution::Nothing`]; reporting
/// `InputNotFound` for it is left to the node's termination step, which covers
/// `first` and `last` together. Non-buffering operators always resolve to
/// `Nothing`.
pub fn resolve<T>(operator: &Operator<T>, mut accumulated: Vec<Item<T>>) -> Resolution<T> {
  match operator {
    Operator::Last => match accumulated.pop() {
      Some(last) => Resolution::Dispatch(vec![last]),
      None => Resolution::Nothing,
    },
    Operator::ElementAt(index) => {
      if *index == 0 || *index > accumulated.len() {
        Resolution::Fail(FilterError::OutOfBound)
      } else {
        Resolution::Dispatch(vec![accumulated.swap_remove(*index - 1)])
      }
    }
    Operator::Window(window) => match window.range(accumulated.len()) {
      Ok(range) => Resolution::Dispatch(accumulated.drain(range).collect()),
      Err(err) => Resolution::Fail(err),
    },
    _ => Resolution::Nothing,
  }
}
