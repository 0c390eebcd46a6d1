//! # Transport trait: the physical link behind a session.
//!
//! Implementations own the device handle and its I/O worker. The broker
//! calls [`Transport::open`] exactly once per session and forwards consumer
//! writes through [`Transport::write`].

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::Producer;

/// # One physical link (serial socket, bridge, mock).
///
/// `open` typically spawns an I/O worker that reads the device and reports
/// through the given [`Producer`] until the producer's stop signal fires:
///
/// - handshake done → [`Producer::connected`]
/// - handshake failed → [`Producer::connect_failed`]
/// - bytes read → [`Producer::chunk`]
/// - read/write died → [`Producer::io_failed`]
///
/// # Example
/// ```no_run
/// use async_trait::async_trait;
/// use seribus::{Producer, Transport, TransportError};
///
/// struct Loopback;
///
/// #[async_trait]
/// impl Transport for Loopback {
///     fn name(&self) -> &str { "loopback" }
///
///     async fn open(&self, producer: Producer) -> Result<(), TransportError> {
///         producer.connected();
///         Ok(())
///     }
///
///     async fn write(&self, _data: &[u8]) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Returns a stable, human-readable link name (device path, host:port).
    fn name(&self) -> &str;

    /// Establishes the link and starts the I/O worker.
    ///
    /// A synchronous failure here is returned to the `connect` caller and no
    /// session starts. Failures after `open` returns are reported through
    /// the producer instead.
    async fn open(&self, producer: Producer) -> Result<(), TransportError>;

    /// Writes bytes to the device.
    ///
    /// Called only while the session is connected; errors are surfaced
    /// synchronously to the `write` caller, not turned into events.
    async fn write(&self, data: &[u8]) -> Result<(), TransportError>;
}
