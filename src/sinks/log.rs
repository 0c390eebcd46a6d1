//! # Simple logging sink for debugging and demos.
//!
//! [`LogSink`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and the demos.
//!
//! ## Output format
//! ```text
//! [connected]
//! [data] chunks=3 bytes=182
//! [io-failed] err="i/o error: device detached"
//! ```

use crate::error::TransportError;
use crate::sinks::SerialSink;

/// Simple stdout logging sink.
///
/// Enabled via the `logging` feature. Prints one line per event for
/// debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`SerialSink`] for
/// structured logging or metrics collection.
pub struct LogSink;

impl SerialSink for LogSink {
    fn on_connected(&self) {
        println!("[connected]");
    }

    fn on_connect_failed(&self, err: &TransportError) {
        println!("[connect-failed] err=\"{err}\"");
    }

    fn on_data_received(&self, chunks: &[Vec<u8>]) {
        let bytes: usize = chunks.iter().map(Vec::len).sum();
        println!("[data] chunks={} bytes={}", chunks.len(), bytes);
    }

    fn on_io_failed(&self, err: &TransportError) {
        println!("[io-failed] err=\"{err}\"");
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
