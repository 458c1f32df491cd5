//! # Operator Kinds
//!
//! One variant per gating operator, each carrying only its own parameters.
//! A node holds exactly one `Operator` and hands it to its [`Gate`](crate::gate::Gate).
//!
//! The take/skip family shares one signed windowing rule, [`Window`], that is
//! resolved against the fully buffered sequence once the source ends.

use crate::error::{FilterError, Item};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

/// A shared predicate over values.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// The set of items a `distinct` node has already forwarded.
///
/// Wraps the membership test so that only `distinct` nodes require
/// `T: Hash + Eq`.
pub struct Seen<T> {
  first_sighting: Box<dyn FnMut(&Item<T>) -> bool + Send>,
}

impl<T> Seen<T>
where
  T: Clone + Hash + Eq + Send + 'static,
{
  /// Creates an empty set compared by value equality.
  pub fn by_value() -> Self {
    let mut seen: HashSet<Item<T>> = HashSet::new();
    Self {
      first_sighting: Box::new(move |item: &Item<T>| {
        if seen.contains(item) {
          false
        } else {
          seen.insert(item.clone());
          true
        }
      }),
    }
  }
}

impl<T> Seen<T> {
  /// Records `item` and returns `true` if it had not been seen before.
  pub fn insert(&mut self, item: &Item<T>) -> bool {
    (self.first_sighting)(item)
  }
}

/// Which end of the buffered sequence a window keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
  /// Keep the first `n` items.
  Take,
  /// Keep the last `n` items.
  TakeLast,
  /// Drop the first `n` items.
  Skip,
  /// Drop the last `n` items.
  SkipLast,
}

/// A take/skip window over a sequence of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
  /// Which end is kept.
  pub kind: WindowKind,
  /// The count passed to the operator.
  pub count: usize,
}

impl Window {
  /// Creates a window.
  pub fn new(kind: WindowKind, count: usize) -> Self {
    Self { kind, count }
  }

  /// Returns `true` for `skip(0)` and `skip_last(0)`, which keep everything.
  pub fn passes_through(&self) -> bool {
    self.count == 0 && matches!(self.kind, WindowKind::Skip | WindowKind::SkipLast)
  }

  /// Returns the index range kept out of `len` buffered items.
  ///
  /// A window that passes through keeps `0..len`. Otherwise the cut point is `count` for `Take`/`Skip` and `len - count` for
  /// `TakeLast`/`SkipLast`. It must fall strictly inside `(0, len)`, otherwise
  /// the window is [`FilterError::OutOfBound`]; in particular `Take(n)` with
  /// `n >= len` is out of bound.
  pub fn range(&self, len: usize) -> Result<Range<usize>, FilterError> {
    if self.passes_through() {
      return Ok(0..len);
    }
    let cut = match self.kind {
      WindowKind::Take | WindowKind::Skip => Some(self.count),
      WindowKind::TakeLast | WindowKind::SkipLast => len.checked_sub(self.count),
    };
    match cut {
      Some(cut) if cut > 0 && cut < len => Ok(match self.kind {
        WindowKind::Take | WindowKind::SkipLast => 0..cut,
        WindowKind::TakeLast | WindowKind::Skip => cut..len,
      }),
      _ => Err(FilterError::OutOfBound),
    }
  }
}

/// A gating operator.
pub enum Operator<T> {
  /// Suppress every item; only termination is mirrored.
  IgnoreElements,
  /// Forward each value the first time it is seen.
  Distinct(Seen<T>),
  /// Forward the first item, then drain.
  First,
  /// Forward the first value matching the predicate, then drain.
  FirstWhere(Predicate<T>),
  /// Forward the last item once the source ends.
  Last,
  /// Forward the item at this 1-based index once the source ends.
  ElementAt(usize),
  /// Forward a take/skip window once the source ends.
  Window(Window),
  /// Suppress items arriving sooner than the interval after the previous arrival.
  Debounce(Duration),
  /// Suppress items arriving sooner than the interval after the last accepted sample.
  Sample(Duration),
  /// Suppress values for which the predicate is false.
  Filter(Predicate<T>),
}

impl<T> Operator<T> {
  /// Returns the operator kind, used as the default node name.
  pub fn kind(&self) -> &'static str {
    match self {
      Operator::IgnoreElements => "ignore_elements",
      Operator::Distinct(_) => "distinct",
      Operator::First => "first",
      Operator::FirstWhere(_) => "first_where",
      Operator::Last => "last",
      Operator::ElementAt(_) => "element_at",
      Operator::Window(w) => match w.kind {
        WindowKind::Take => "take",
        WindowKind::TakeLast => "take_last",
        WindowKind::Skip => "skip",
        WindowKind::SkipLast => "skip_last",
      },
      Operator::Debounce(_) => "debounce",
      Operator::Sample(_) => "sample",
      Operator::Filter(_) => "filter",
    }
  }

  /// Returns `true` for operators resolved only after the source ends.
  ///
  /// A skip window of zero forwards items as they arrive instead.
  pub fn buffers(&self) -> bool {
    match self {
      Operator::Last | Operator::ElementAt(_) => true,
      Operator::Window(window) => !window.passes_through(),
      _ => false,
    }
  }

  /// Returns `true` for operators that stop after their first dispatch.
  pub fn is_first(&self) -> bool {
    matches!(self, Operator::First | Operator::FirstWhere(_))
  }

  /// Returns `true` for operators that report `InputNotFound` on an empty
  /// survivor set.
  pub fn requires_survivor(&self) -> bool {
    self.is_first() || matches!(self, Operator::Last)
  }
}

impl<T> fmt::Debug for Operator<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Operator::ElementAt(k) => write!(f, "ElementAt({})", k),
      Operator::Window(w) => write!(f, "Window({:?}, {})", w.kind, w.count),
      Operator::Debounce(d) => write!(f, "Debounce({:?})", d),
      Operator::Sample(d) => write!(f, "Sample({:?})", d),
      other => write!(f, "{}", other.kind()),
    }
  }
}
