//! # Transport abstraction: the producer side of the broker.
//!
//! A [`Transport`] wraps the physical link (serial/USB socket, TCP bridge,
//! in-memory mock). The broker opens it once per session and hands it a
//! [`Producer`], the only way transport code feeds events back in.
//!
//! ## Stop signal
//! There is no explicit close call. The broker cancels the session's
//! `CancellationToken` on disconnect; the transport's I/O worker observes it
//! through [`Producer::is_stopped`] / [`Producer::stopped`] and winds down
//! cooperatively. Submits that race the teardown are dropped by the broker's
//! connection gate, so a worker that reacts late does no harm.

mod producer;
mod transport;

pub use producer::Producer;
pub use transport::Transport;
