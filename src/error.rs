//! Error types used by the seribus broker and transports.
//!
//! This module defines two error enums:
//!
//! - [`TransportError`] — failures raised by the transport's I/O worker.
//!   These are terminal: once one is submitted, the session is torn down and
//!   the broker goes inert.
//! - [`BrokerError`] — errors returned synchronously by broker operations
//!   (`connect`, `write`). These are never buffered or delivered as events.
//!
//! Both types provide `as_label` for logging/metrics.

use thiserror::Error;

/// # Failures raised by a transport.
///
/// Carried inside [`SerialEvent`](crate::SerialEvent) payloads and delivered
/// to the consumer exactly once. Both variants are terminal for the session;
/// reconnection means a new transport and a fresh broker.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The initial handshake with the device failed.
    #[error("connect failed: {reason}")]
    ConnectFailed {
        /// Human-readable failure description.
        reason: String,
    },

    /// The transport failed mid-session (read/write error, device gone).
    #[error("i/o error: {reason}")]
    Io {
        /// Human-readable failure description.
        reason: String,
    },
}

impl TransportError {
    /// Creates a handshake failure.
    pub fn connect(reason: impl Into<String>) -> Self {
        TransportError::ConnectFailed {
            reason: reason.into(),
        }
    }

    /// Creates a mid-session I/O failure.
    pub fn io(reason: impl Into<String>) -> Self {
        TransportError::Io {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use seribus::TransportError;
    ///
    /// let err = TransportError::io("device detached");
    /// assert_eq!(err.as_label(), "transport_io");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::ConnectFailed { .. } => "transport_connect_failed",
            TransportError::Io { .. } => "transport_io",
        }
    }
}

/// # Errors returned synchronously by broker operations.
///
/// Unlike [`TransportError`]s submitted by the I/O worker, these are surfaced
/// directly to the caller and never enter the event buffers.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BrokerError {
    /// `write` was called while no session is connected.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called while a session is already running.
    #[error("already connected")]
    AlreadyConnected,

    /// `connect` was called on a broker whose session has ended.
    ///
    /// A torn-down broker stays inert; start a new session with a fresh one.
    #[error("session ended")]
    SessionEnded,

    /// The transport rejected an operation (`open` or `write`).
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl BrokerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use seribus::BrokerError;
    ///
    /// assert_eq!(BrokerError::NotConnected.as_label(), "broker_not_connected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BrokerError::NotConnected => "broker_not_connected",
            BrokerError::AlreadyConnected => "broker_already_connected",
            BrokerError::SessionEnded => "broker_session_ended",
            BrokerError::Transport(e) => e.as_label(),
        }
    }
}
