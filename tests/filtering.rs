use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use streamgate::clock::{ManualClock, ScriptedClock};
use streamgate::{FilterError, NodeConfig, Observable, ThreadingMode};

fn source() -> Observable<i32> {
  Observable::just(vec![0, 1, 2, 3, 4, 5])
}

#[tokio::test]
async fn debounce_without_gaps_emits_nothing() {
  // A clock that never moves: every arrival has a zero gap.
  let clock = Arc::new(ManualClock::new());
  let out = source()
    .with_clock(clock)
    .debounce(Duration::from_millis(100))
    .collect_values()
    .await;
  assert_eq!(out, Ok(vec![]));
}

#[tokio::test]
async fn sample_without_elapsed_time_emits_nothing() {
  let clock = Arc::new(ManualClock::new());
  let out = source()
    .with_clock(clock)
    .sample(Duration::from_millis(1))
    .collect_values()
    .await;
  assert_eq!(out, Ok(vec![]));
}

#[tokio::test]
async fn sample_with_zero_interval_passes_everything() {
  let out = source()
    .sample(Duration::ZERO)
    .collect_values()
    .await;
  assert_eq!(out, Ok(vec![0, 1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn windowing_operators() {
  assert_eq!(source().element_at(5).collect_values().await, Ok(vec![4]));
  assert_eq!(source().take(2).collect_values().await, Ok(vec![0, 1]));
  assert_eq!(source().take_last(3).collect_values().await, Ok(vec![3, 4, 5]));
  assert_eq!(source().skip(2).collect_values().await, Ok(vec![2, 3, 4, 5]));
  assert_eq!(source().skip_last(3).collect_values().await, Ok(vec![0, 1, 2]));
}

#[tokio::test]
async fn first_and_last_on_empty_source() {
  let first = Observable::<i32>::empty().first().collect_values().await;
  let last = Observable::<i32>::empty().last().collect_values().await;
  assert_eq!(first, Err(FilterError::InputNotFound));
  assert_eq!(last, Err(FilterError::InputNotFound));

  let silent = Observable::<i32>::empty()
    .with_config(NodeConfig::default().with_accept_errors(true))
    .last()
    .collect()
    .await;
  assert!(silent.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_pipeline_matches_sequential_set() {
  let values: Vec<i32> = (0..100).collect();
  let mut out: Vec<i32> = Observable::just(values.clone())
    .with_threading(ThreadingMode::Concurrent)
    .filter(|v| v % 3 == 0)
    .distinct()
    .into_stream()
    .filter_map(|item| async move { item.ok() })
    .collect()
    .await;
  out.sort();
  let expected: Vec<i32> = values.into_iter().filter(|v| v % 3 == 0).collect();
  assert_eq!(out, expected);
}

#[tokio::test]
async fn scripted_arrivals_drive_debounce_and_sample() {
  let arrivals = [5, 12, 40, 45, 60, 95, 100, 140, 150];
  let data = || Observable::just(vec![0, 1, 2, 3, 4, 5, 3, 4, 5]);

  let debounced = data()
    .with_clock(Arc::new(ScriptedClock::arrivals_ms(&arrivals)))
    .debounce(Duration::from_millis(10))
    .collect_values()
    .await;
  assert_eq!(debounced, Ok(vec![2, 4, 5, 4, 5]));

  let sampled = data()
    .with_clock(Arc::new(ScriptedClock::arrivals_ms(&arrivals)))
    .sample(Duration::from_millis(40))
    .collect_values()
    .await;
  assert_eq!(sampled, Ok(vec![2, 5, 4]));
}
