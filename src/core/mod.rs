//! Broker core: gating, buffering, coalescing, and the consumer context.
//!
//! This module contains the embedded implementation of the broker. The
//! public API is [`EventBroker`] (with its builder) and the consumer-side
//! [`ConsumerContext`] / [`ContextHandle`] pair.
//!
//! Internal modules:
//! - [`broker`]: connection gate, buffers, submit paths, attach/detach drain;
//! - [`builder`]: construction-time configuration;
//! - [`coalesce`]: the DataReceived-in-progress accumulator;
//! - [`context`]: the consumer's cooperative job queue.

pub(crate) mod broker;
mod builder;
mod coalesce;
mod context;

pub use broker::EventBroker;
pub use builder::EventBrokerBuilder;
pub use context::{ConsumerContext, ContextHandle};
