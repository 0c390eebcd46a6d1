//! # Producer: the transport worker's handle into the broker.
//!
//! Cheap to clone; a transport usually moves one clone into its reader task
//! and keeps another for the handshake path. All methods are non-blocking:
//! they either append to a buffer under a short-lived lock or schedule a
//! delivery job, and return immediately.
//!
//! The producer also carries the session's stop signal. Workers should wind
//! down when it fires:
//!
//! ```no_run
//! # async fn worker(producer: seribus::Producer) {
//! loop {
//!     tokio::select! {
//!         _ = producer.stopped() => break,
//!         // chunk = device.read() => producer.chunk(chunk),
//!     }
//! }
//! # }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::broker::BrokerInner;
use crate::error::TransportError;
use crate::events::SerialEvent;

/// Event-submission handle held by a transport's I/O worker.
///
/// The single-producer assumption is by convention: one transport, one
/// worker. Clones exist so the handshake and reader paths can report
/// independently, not to fan in unrelated sources.
#[derive(Clone)]
pub struct Producer {
    broker: Arc<BrokerInner>,
    stop: CancellationToken,
}

impl Producer {
    pub(crate) fn new(broker: Arc<BrokerInner>, stop: CancellationToken) -> Self {
        Self { broker, stop }
    }

    /// Reports a completed handshake.
    pub fn connected(&self) {
        self.broker.submit_event(SerialEvent::Connected);
    }

    /// Reports a failed handshake. Terminal: tears the session down after
    /// the error is buffered or scheduled.
    pub fn connect_failed(&self, err: TransportError) {
        self.broker.submit_event(SerialEvent::ConnectFailed(err));
    }

    /// Submits one raw chunk read from the device.
    ///
    /// Chunks arriving faster than the consumer wakes are coalesced into a
    /// single delivery.
    pub fn chunk(&self, data: Vec<u8>) {
        self.broker.submit_chunk(data);
    }

    /// Reports a mid-session failure. Terminal, like
    /// [`connect_failed`](Producer::connect_failed).
    pub fn io_failed(&self, err: TransportError) {
        self.broker.submit_event(SerialEvent::IoFailed(err));
    }

    /// True once the broker has torn the session down.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Completes when the broker tears the session down.
    pub async fn stopped(&self) {
        self.stop.cancelled().await;
    }
}
