//! # streamgate
//!
//! Gating and windowing operators for reactive streams, built on Tokio.
//!
//! A chain starts at a source and grows one node per operator. Every node owns
//! an unbounded output queue and a worker task that drains its predecessor's
//! queue, decides per item whether to suppress, forward or buffer it, and
//! closes its own queue once the predecessor has closed and all of its work is
//! done.
//!
//! ## Key Features
//!
//! - **Gating**: `distinct`, `filter`, `first`, `ignore_elements`, `debounce`, `sample`
//! - **Windowing**: `last`, `element_at`, `take`, `take_last`, `skip`, `skip_last`
//! - **Dispatch modes**: sequential (ordered) or one task per item (unordered)
//! - **Errors as data**: `OutOfBound` and `InputNotFound` travel as stream items
//! - **Injectable clocks**: deterministic timestamps for the interval gates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use streamgate::observable::Observable;
//!
//! # async fn example() {
//! let firsts = Observable::just(0..6).take(2).collect_values().await;
//! assert_eq!(firsts, Ok(vec![0, 1]));
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Injectable time sources for interval-based gates.
pub mod clock;
/// Per-node configuration.
pub mod config;
/// Dispatch of surviving items and the join barrier.
pub mod dispatch;
/// Error values carried through queues.
pub mod error;
/// Per-item gating decisions.
pub mod gate;
/// Pipeline nodes and their worker loop.
pub mod node;
/// The chain-building handle.
pub mod observable;
/// Operator kinds and windowing rules.
pub mod operator;
/// Unbounded node queues.
pub mod queue;
/// End-of-stream resolution of buffered operators.
pub mod resolve;

pub use config::{NodeConfig, ThreadingMode};
pub use error::{FilterError, Item};
pub use observable::Observable;

#[cfg(test)]
mod gate_test;
#[cfg(test)]
mod queue_test;
