//! # Core sink trait and event dispatch.
//!
//! `SerialSink` is the extension point a consumer implements to observe a
//! session. Callbacks run inline on the consumer's cooperative context (the
//! thread that drives [`ConsumerContext`](crate::ConsumerContext)), so they
//! must not block; hand long work to the host's own executor.
//!
//! ## Contract
//! - At most one sink is attached at a time.
//! - Callbacks are invoked in event submission order.
//! - A panicking callback is caught and reported; it does not kill the
//!   consumer context or abort an attach-drain.

use std::panic::{self, AssertUnwindSafe};

use crate::error::TransportError;
use crate::events::SerialEvent;

/// Capability set for the attached consumer.
pub trait SerialSink: Send + Sync + 'static {
    /// The transport handshake completed.
    fn on_connected(&self);

    /// The transport handshake failed. The session is over.
    fn on_connect_failed(&self, err: &TransportError);

    /// A batch of raw chunks arrived, oldest first.
    ///
    /// Chunks that raced each other on the producer side are delivered in a
    /// single call.
    fn on_data_received(&self, chunks: &[Vec<u8>]);

    /// The transport failed mid-session. The session is over.
    fn on_io_failed(&self, err: &TransportError);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Delivers one event to a sink, isolating panics.
///
/// Used by the scheduled delivery jobs and by the attach-drain; both run on
/// the consumer thread.
pub(crate) fn dispatch(sink: &dyn SerialSink, event: &SerialEvent) {
    let call = AssertUnwindSafe(|| match event {
        SerialEvent::Connected => sink.on_connected(),
        SerialEvent::ConnectFailed(err) => sink.on_connect_failed(err),
        SerialEvent::DataReceived(chunks) => sink.on_data_received(chunks),
        SerialEvent::IoFailed(err) => sink.on_io_failed(err),
    });
    if panic::catch_unwind(call).is_err() {
        eprintln!(
            "[seribus] sink '{}' panicked on {} event",
            sink.name(),
            event.as_label()
        );
    }
}
