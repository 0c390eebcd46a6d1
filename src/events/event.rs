//! # Session events emitted by a transport.
//!
//! [`SerialEvent`] classifies everything a transport session can report:
//! - **Connected**: the handshake completed and the session is live.
//! - **ConnectFailed**: the handshake failed (terminal).
//! - **DataReceived**: one or more raw chunks read from the device, in
//!   arrival order. The chunk list grows by append only until it is drained
//!   to the consumer, so a burst of reads arrives as a single event.
//! - **IoFailed**: the session died mid-flight (terminal).
//!
//! ## Ordering guarantees
//! Events carry no sequence numbers; ordering is structural. The broker's
//! buffers are FIFO and the consumer context executes delivery jobs in
//! schedule order, which together preserve submission order end to end.

use crate::error::TransportError;

/// One event in a transport session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialEvent {
    /// The transport handshake completed; reads and writes are live.
    Connected,

    /// The transport handshake failed. Terminal: tears the session down.
    ConnectFailed(TransportError),

    /// Raw chunks read from the device, oldest first.
    ///
    /// Several rapid reads coalesce into one `DataReceived` so the consumer
    /// wakes at most once per batch.
    DataReceived(Vec<Vec<u8>>),

    /// The transport failed mid-session. Terminal: tears the session down.
    IoFailed(TransportError),
}

impl SerialEvent {
    /// True for events that end the session (`ConnectFailed`, `IoFailed`).
    ///
    /// A terminal event is still delivered exactly once; everything submitted
    /// after it is dropped.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SerialEvent::ConnectFailed(_) | SerialEvent::IoFailed(_)
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SerialEvent::Connected => "connected",
            SerialEvent::ConnectFailed(_) => "connect_failed",
            SerialEvent::DataReceived(_) => "data_received",
            SerialEvent::IoFailed(_) => "io_failed",
        }
    }
}
