//! # Event sinks: the consumer side of the broker.
//!
//! This module provides the [`SerialSink`] trait, the capability set a
//! consumer hands to [`EventBroker::attach`](crate::EventBroker::attach),
//! and the built-in `LogSink` demo implementation (behind the `logging`
//! feature).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Transport ── Producer ──► EventBroker ── consumer context ──► SerialSink
//!                                  │                                  │
//!                                  │                      ┌───────────┼─────────┐
//!                                  │                      ▼           ▼         ▼
//!                                  │                 on_connected  on_data  on_*_failed
//!                                  └── (detached) ──► buffers, drained on next attach
//! ```
//!
//! ## Implementing a sink
//! ```no_run
//! use seribus::{SerialSink, TransportError};
//!
//! struct Terminal;
//!
//! impl SerialSink for Terminal {
//!     fn on_connected(&self) { /* show "connected" banner */ }
//!     fn on_connect_failed(&self, _err: &TransportError) { /* show error */ }
//!     fn on_data_received(&self, chunks: &[Vec<u8>]) {
//!         for chunk in chunks { /* append to the receive view */ let _ = chunk; }
//!     }
//!     fn on_io_failed(&self, _err: &TransportError) { /* show error */ }
//! }
//! ```

mod sink;

pub use sink::SerialSink;
pub(crate) use sink::dispatch;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogSink;
