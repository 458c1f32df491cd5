//! Tests for the gating pipeline.

use crate::error::FilterError;
use crate::gate::{Gate, Verdict};
use crate::operator::{Operator, Seen, Window, WindowKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn ms(n: u64) -> Duration {
  Duration::from_millis(n)
}

#[test]
fn test_ignore_elements_suppresses_everything() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::<i32>::IgnoreElements, false, start);
  assert_eq!(gate.evaluate(Ok(1), start), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(2), start), Verdict::Suppress);
  assert_eq!(gate.survivors(), 0);
}

#[test]
fn test_distinct_forwards_first_occurrence_only() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::Distinct(Seen::<i32>::by_value()), false, start);
  let verdicts: Vec<_> = [0, 1, 0, 2, 1]
    .into_iter()
    .map(|v| gate.evaluate(Ok(v), start))
    .collect();
  assert_eq!(
    verdicts,
    vec![
      Verdict::Dispatch(Ok(0)),
      Verdict::Dispatch(Ok(1)),
      Verdict::Suppress,
      Verdict::Dispatch(Ok(2)),
      Verdict::Suppress,
    ]
  );
  assert_eq!(gate.survivors(), 5);
}

#[test]
fn test_first_finishes_after_dispatch() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::<i32>::First, false, start);
  assert_eq!(gate.evaluate(Ok(7), start), Verdict::Dispatch(Ok(7)));
  assert!(gate.is_done());
  assert_eq!(gate.evaluate(Ok(8), start), Verdict::Suppress);
  assert_eq!(gate.survivors(), 1);
}

#[test]
fn test_first_where_skips_non_matching() {
  let start = Instant::now();
  let mut gate = Gate::new(
    Operator::FirstWhere(Arc::new(|v: &i32| v % 2 == 1)),
    false,
    start,
  );
  assert_eq!(gate.evaluate(Ok(2), start), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(3), start), Verdict::Dispatch(Ok(3)));
  assert_eq!(gate.evaluate(Ok(5), start), Verdict::Suppress);
}

#[test]
fn test_buffering_operators_keep_items() {
  let start = Instant::now();
  let mut gate = Gate::new(
    Operator::<i32>::Window(Window::new(WindowKind::Take, 2)),
    false,
    start,
  );
  for v in 0..4 {
    assert_eq!(gate.evaluate(Ok(v), start), Verdict::Buffer);
  }
  assert_eq!(gate.take_accumulated(), vec![Ok(0), Ok(1), Ok(2), Ok(3)]);
  assert_eq!(gate.survivors(), 4);
}

#[test]
fn test_error_values_are_written_through() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::<i32>::Last, false, start);
  assert_eq!(
    gate.evaluate(Err(FilterError::upstream("bad")), start),
    Verdict::Emit(Err(FilterError::Upstream("bad".to_string())))
  );
  assert_eq!(gate.survivors(), 0);
  assert!(gate.take_accumulated().is_empty());
}

#[test]
fn test_error_values_accepted_as_values() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::<i32>::Last, true, start);
  assert_eq!(
    gate.evaluate(Err(FilterError::OutOfBound), start),
    Verdict::Buffer
  );
  assert_eq!(gate.take_accumulated(), vec![Err(FilterError::OutOfBound)]);
}

#[test]
fn test_filter_lets_error_values_reach_the_error_rule() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::Filter(Arc::new(|v: &i32| *v > 10)), false, start);
  assert_eq!(gate.evaluate(Ok(1), start), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(11), start), Verdict::Dispatch(Ok(11)));
  assert_eq!(
    gate.evaluate(Err(FilterError::OutOfBound), start),
    Verdict::Emit(Err(FilterError::OutOfBound))
  );
}

#[test]
fn test_debounce_measures_gap_since_previous_arrival() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::<i32>::Debounce(ms(10)), false, start);
  // Burst right after start: everything suppressed.
  assert_eq!(gate.evaluate(Ok(0), start + ms(1)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(1), start + ms(2)), Verdict::Suppress);
  // Quiet gap, then pass.
  assert_eq!(gate.evaluate(Ok(2), start + ms(20)), Verdict::Dispatch(Ok(2)));
  // Suppressed items still move the arrival anchor.
  assert_eq!(gate.evaluate(Ok(3), start + ms(25)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(4), start + ms(34)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(5), start + ms(44)), Verdict::Dispatch(Ok(5)));
}

#[test]
fn test_sample_measures_gap_since_last_accepted() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::<i32>::Sample(ms(10)), false, start);
  assert_eq!(gate.evaluate(Ok(0), start + ms(4)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(1), start + ms(8)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(2), start + ms(12)), Verdict::Dispatch(Ok(2)));
  assert_eq!(gate.evaluate(Ok(3), start + ms(16)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(4), start + ms(20)), Verdict::Suppress);
  assert_eq!(gate.evaluate(Ok(5), start + ms(24)), Verdict::Dispatch(Ok(5)));
}

#[test]
fn test_halt_drains() {
  let start = Instant::now();
  let mut gate = Gate::new(Operator::Filter(Arc::new(|_: &i32| true)), false, start);
  assert_eq!(gate.evaluate(Ok(1), start), Verdict::Dispatch(Ok(1)));
  gate.halt();
  assert_eq!(gate.evaluate(Ok(2), start), Verdict::Suppress);
  assert_eq!(gate.evaluate(Err(FilterError::OutOfBound), start), Verdict::Suppress);
}
