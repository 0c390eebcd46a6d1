//! Session events: the data model flowing from transport to consumer.
//!
//! This module groups the event **data model** produced by a transport's I/O
//! worker and observed by the attached [`SerialSink`](crate::SerialSink).
//!
//! ## Quick reference
//! - **Producers**: the transport worker, through [`Producer`](crate::Producer).
//! - **Consumers**: the attached sink, via direct dispatch or an attach-drain.
//!
//! See `core/broker.rs` for the buffering and delivery rules.

mod event;

pub use event::SerialEvent;
