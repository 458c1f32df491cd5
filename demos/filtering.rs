//! Runs every gating operator over the same small sequence and prints the result.
//!
//! Node lifecycle events are logged at debug level. The interval gates run on a
//! scripted clock so their output does not depend on scheduling.

use std::sync::Arc;
use std::time::Duration;
use streamgate::clock::ScriptedClock;
use streamgate::{Item, Observable};

/// Arrival offsets in milliseconds, one per item of [`data`].
const ARRIVALS_MS: [u64; 9] = [5, 12, 40, 45, 60, 95, 100, 140, 150];

fn data() -> Observable<i32> {
  Observable::just(vec![0, 1, 2, 3, 4, 5, 3, 4, 5])
}

fn show(label: &str, items: Vec<Item<i32>>) {
  let rendered: Vec<String> = items
    .into_iter()
    .map(|item| match item {
      Ok(v) => v.to_string(),
      Err(e) => format!("<{}>", e),
    })
    .collect();
  println!("{:<20} {}", label, rendered.join("  "));
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .init();

  println!("input: 0, 1, 2, 3, 4, 5, 3, 4, 5");
  println!("arrivals (ms): {:?}", ARRIVALS_MS);
  show(
    "debounce(10ms):",
    data()
      .with_clock(Arc::new(ScriptedClock::arrivals_ms(&ARRIVALS_MS)))
      .debounce(Duration::from_millis(10))
      .collect()
      .await,
  );
  show("distinct():", data().distinct().collect().await);
  show("element_at(5):", data().element_at(5).collect().await);
  show("first():", data().first().collect().await);
  show("ignore_elements():", data().ignore_elements().collect().await);
  show("last():", data().last().collect().await);
  show(
    "sample(40ms):",
    data()
      .with_clock(Arc::new(ScriptedClock::arrivals_ms(&ARRIVALS_MS)))
      .sample(Duration::from_millis(40))
      .collect()
      .await,
  );
  show("skip(2):", data().skip(2).collect().await);
  show("skip_last(2):", data().skip_last(2).collect().await);
  show("take(4):", data().take(4).collect().await);
  show("take_last(3):", data().take_last(3).collect().await);
  show("take(20):", data().take(20).collect().await);
  show("first() on empty:", Observable::<i32>::empty().first().collect().await);
}
