//! Tests for node queues.

use crate::error::FilterError;
use crate::queue;
use futures::StreamExt;
use tokio_test::{assert_pending, assert_ready_eq, task};

#[tokio::test]
async fn test_fifo_order_then_end() {
  let (outflow, mut inflow) = queue::unbounded::<i32>();
  for i in 0..4 {
    assert!(outflow.send(Ok(i)));
  }
  assert!(outflow.send(Err(FilterError::OutOfBound)));
  assert!(outflow.close());

  let items: Vec<_> = (&mut inflow).collect().await;
  assert_eq!(
    items,
    vec![Ok(0), Ok(1), Ok(2), Ok(3), Err(FilterError::OutOfBound)]
  );
  assert_eq!(inflow.recv().await, None);
}

#[test]
fn test_close_happens_once() {
  let (outflow, _inflow) = queue::unbounded::<i32>();
  assert!(!outflow.is_closed());
  assert!(outflow.close());
  assert!(!outflow.close());
  assert!(outflow.is_closed());
  assert!(!outflow.send(Ok(1)));
}

#[test]
fn test_dropped_reader_is_reported() {
  let (outflow, inflow) = queue::unbounded::<i32>();
  drop(inflow);
  assert!(outflow.is_closed());
  assert!(!outflow.send(Ok(7)));
}

#[test]
fn test_reader_waits_until_item_or_close() {
  let (outflow, mut inflow) = queue::unbounded::<i32>();
  {
    let mut next = task::spawn(inflow.next());
    assert_pending!(next.poll());
    outflow.send(Ok(9));
    assert!(next.is_woken());
    assert_ready_eq!(next.poll(), Some(Ok(9)));
  }

  let mut next = task::spawn(inflow.next());
  assert_pending!(next.poll());
  outflow.close();
  assert_ready_eq!(next.poll(), None);
}
