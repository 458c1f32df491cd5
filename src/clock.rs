//! # Clocks
//!
//! Time source for the interval-based gates (`debounce`, `sample`).
//!
//! A node reads its clock once when its worker starts, which anchors both
//! intervals, and once for every item pulled from its predecessor. Tests inject
//! [`ManualClock`] or [`ScriptedClock`] to get deterministic timestamps instead
//! of sleeping.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// A source of monotonic instants.
pub trait Clock: Send + Sync + fmt::Debug {
  /// Returns the current instant.
  fn now(&self) -> Instant;
}

/// Wall clock backed by [`tokio::time::Instant`].
///
/// Follows Tokio's paused time when the runtime is started with
/// `start_paused = true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
  base: Instant,
  offset: Mutex<Duration>,
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new()
  }
}

impl ManualClock {
  /// Creates a manual clock frozen at the current instant.
  pub fn new() -> Self {
    Self {
      base: Instant::now(),
      offset: Mutex::new(Duration::ZERO),
    }
  }

  /// Moves the clock forward by `by`.
  pub fn advance(&self, by: Duration) {
    let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
    *offset += by;
  }

  /// Returns how far the clock has moved since it was created.
  pub fn elapsed(&self) -> Duration {
    *self.offset.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Instant {
    self.base + self.elapsed()
  }
}

/// A clock that replays a fixed list of offsets, one per call to [`Clock::now`].
///
/// Once the script is exhausted the last offset is repeated.
#[derive(Debug)]
pub struct ScriptedClock {
  base: Instant,
  state: Mutex<Script>,
}

#[derive(Debug)]
struct Script {
  pending: VecDeque<Duration>,
  last: Duration,
}

impl ScriptedClock {
  /// Creates a clock that returns `base + offset` for each offset in order.
  pub fn new(offsets: impl IntoIterator<Item = Duration>) -> Self {
    Self {
      base: Instant::now(),
      state: Mutex::new(Script {
        pending: offsets.into_iter().collect(),
        last: Duration::ZERO,
      }),
    }
  }

  /// Builds a script for a node: the worker start at zero, then one arrival
  /// per item at the given millisecond offsets.
  pub fn arrivals_ms(arrivals: &[u64]) -> Self {
    Self::new(
      std::iter::once(Duration::ZERO).chain(arrivals.iter().map(|ms| Duration::from_millis(*ms))),
    )
  }
}

impl Clock for ScriptedClock {
  fn now(&self) -> Instant {
    let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(next) = state.pending.pop_front() {
      state.last = next;
    }
    self.base + state.last
  }
}
