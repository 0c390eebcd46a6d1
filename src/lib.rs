//! # seribus
//!
//! **Seribus** is a buffering event broker between a serial transport and an
//! attachable consumer.
//!
//! A transport's I/O worker produces events at device speed: a connect
//! confirmation, raw data chunks at hundreds per second, terminal errors.
//! The consumer (typically a UI or event loop) may be absent for long
//! stretches and reattaches at arbitrary times. The broker guarantees that
//! every event produced during a connected session is observed exactly once
//! and in order, and that chunk bursts reach the consumer as single
//! coalesced deliveries instead of a wake-up per read.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌────────────────┐ open/write  ┌──────────────────────────────────────┐
//!   │   Transport    │◄────────────┤  EventBroker                         │
//!   │ (serial, mock) │             │  - connection gate (per session)     │
//!   └──────┬─────────┘             │  - coalesce cell (chunk bursts)      │
//!          │ Producer              │  - pre-dispatch + post-detach buffers│
//!          │ connected/chunk/      │  - presence hook call sites          │
//!          │ *_failed              └──────┬───────────────────────┬───────┘
//!          └──────────────────────────────┘                       │
//!                                      schedule jobs              │ attach/
//!                                         ▼                       │ detach
//!                              ┌────────────────────┐             │
//!                              │  ConsumerContext   │             │
//!                              │  (FIFO job queue,  │◄────────────┘
//!                              │  consumer thread)  │
//!                              └─────────┬──────────┘
//!                                        ▼
//!                                 SerialSink callbacks
//!                          (on_connected / on_data_received /
//!                           on_connect_failed / on_io_failed)
//! ```
//!
//! ### Delivery decision, per event
//! ```text
//! submit
//!   ├─ session not connected ─► drop (a dead session never resurrects)
//!   ├─ consumer attached ─────► job on the consumer context
//!   │     └─ job re-checks attachment at run time:
//!   │          still attached ─► deliver
//!   │          detached since ─► pre-dispatch buffer
//!   └─ consumer detached ─────► post-detach buffer (chunks merge at tail)
//!
//! attach ─► deliver pre-dispatch buffer, then post-detach buffer, in order
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use seribus::{
//!     ConsumerContext, EventBroker, Producer, SerialSink, Transport, TransportError,
//! };
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Transport for Echo {
//!     fn name(&self) -> &str { "echo" }
//!     async fn open(&self, producer: Producer) -> Result<(), TransportError> {
//!         producer.connected();
//!         Ok(())
//!     }
//!     async fn write(&self, _data: &[u8]) -> Result<(), TransportError> { Ok(()) }
//! }
//!
//! struct Console;
//!
//! impl SerialSink for Console {
//!     fn on_connected(&self) { println!("connected"); }
//!     fn on_connect_failed(&self, err: &TransportError) { eprintln!("{err}"); }
//!     fn on_data_received(&self, chunks: &[Vec<u8>]) {
//!         for chunk in chunks { println!("read {} bytes", chunk.len()); }
//!     }
//!     fn on_io_failed(&self, err: &TransportError) { eprintln!("{err}"); }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = ConsumerContext::new();
//!     let broker = EventBroker::new(ctx.handle());
//!
//!     broker.connect(Arc::new(Echo)).await?;
//!     broker.attach(Arc::new(Console));
//!     broker.write(b"hello\r\n").await?;
//!
//!     ctx.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//! | Area           | Description                                             | Key types / traits             |
//! |----------------|---------------------------------------------------------|--------------------------------|
//! | **Broker**     | Gate, buffer, coalesce, and dispatch session events.    | [`EventBroker`]                |
//! | **Consumer**   | Observe a session from its own cooperative context.     | [`SerialSink`], [`ConsumerContext`] |
//! | **Transport**  | Plug in the physical link; feed events back in.         | [`Transport`], [`Producer`]    |
//! | **Presence**   | Side effect while a connected session runs unattended.  | [`PresenceHook`]               |
//! | **Errors**     | Typed errors for broker calls and transport failures.   | [`BrokerError`], [`TransportError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogSink`] _(demo/reference only)_.

mod core;
mod error;
mod events;
mod presence;
mod sinks;
mod transport;

// ---- Public re-exports ----

pub use crate::core::{ConsumerContext, ContextHandle, EventBroker, EventBrokerBuilder};
pub use error::{BrokerError, TransportError};
pub use events::SerialEvent;
pub use presence::{NullPresence, PresenceHook};
pub use sinks::SerialSink;
pub use transport::{Producer, Transport};

// Optional: expose a simple built-in logging sink (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sinks::LogSink;
