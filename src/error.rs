//! # Error Values
//!
//! Errors produced by gating nodes are ordinary stream items. A node never
//! aborts the pipeline: an invalid window or an empty `first`/`last` is written
//! to the output queue as an `Err(FilterError)` and consumed downstream like any
//! other value.
//!
//! ## Core Types
//!
//! - **FilterError**: The error kinds a node can emit or forward
//! - **Item**: `Result<T, FilterError>`, the value-or-error wrapper flowing
//!   through every queue
//! - **ComponentInfo**: Name and type information used in diagnostics

use std::fmt;
use thiserror::Error;

/// An item travelling through a pipeline queue: either a value or an error value.
pub type Item<T> = Result<T, FilterError>;

/// Errors that flow through a pipeline as data.
///
/// `FilterError` is `Clone + Eq + Hash` so that it can pass through `distinct`
/// and the windowing buffer when a node accepts errors as values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum FilterError {
  /// A windowing index or count is invalid for the buffered length.
  #[error("OutOfBound")]
  OutOfBound,
  /// `first` or `last` was resolved against an empty survivor set.
  #[error("InputNotFound")]
  InputNotFound,
  /// An error value produced by an upstream collaborator.
  #[error("upstream error: {0}")]
  Upstream(String),
}

impl FilterError {
  /// Wraps any displayable upstream error as a [`FilterError::Upstream`] value.
  pub fn upstream(err: impl fmt::Display) -> Self {
    FilterError::Upstream(err.to_string())
  }
}

/// Information about a pipeline component.
///
/// Identifies a node in logs by its configured name and its operator kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
  /// The name of the component.
  pub name: String,
  /// The operator kind of the component.
  pub type_name: String,
}

impl Default for ComponentInfo {
  fn default() -> Self {
    Self {
      name: "default".to_string(),
      type_name: "default".to_string(),
    }
  }
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo` with the given name and type name.
  pub fn new(name: String, type_name: String) -> Self {
    Self { name, type_name }
  }
}

impl fmt::Display for ComponentInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.name, self.type_name)
  }
}
