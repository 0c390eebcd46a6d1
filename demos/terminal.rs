//! # Terminal Example
//!
//! A mock serial device streams lines while the consumer comes and goes:
//!
//! - attached: lines arrive live, bursts coalesced;
//! - detached: the session keeps running and events buffer;
//! - reattached: the buffered backlog arrives in order, then live delivery
//!   resumes until the device "unplugs" and the session ends.
//!
//! ## Run
//! ```bash
//! cargo run --example terminal
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use seribus::{
    ConsumerContext, EventBroker, Producer, SerialSink, Transport, TransportError,
};

/// Fake device: emits a line every 20ms, then dies.
struct MockDevice;

#[async_trait]
impl Transport for MockDevice {
    fn name(&self) -> &str {
        "mock-device"
    }

    async fn open(&self, producer: Producer) -> Result<(), TransportError> {
        std::thread::spawn(move || {
            producer.connected();
            for i in 0..40u32 {
                if producer.is_stopped() {
                    return;
                }
                producer.chunk(format!("line {i}\r\n").into_bytes());
                std::thread::sleep(Duration::from_millis(20));
            }
            producer.io_failed(TransportError::io("device unplugged"));
        });
        Ok(())
    }

    async fn write(&self, data: &[u8]) -> Result<(), TransportError> {
        println!("   (device received {} bytes)", data.len());
        Ok(())
    }
}

struct Console;

impl SerialSink for Console {
    fn on_connected(&self) {
        println!(" ├─► connected");
    }

    fn on_connect_failed(&self, err: &TransportError) {
        println!(" └─► connect failed: {err}");
    }

    fn on_data_received(&self, chunks: &[Vec<u8>]) {
        let text: String = chunks
            .iter()
            .map(|c| String::from_utf8_lossy(c).replace("\r\n", " "))
            .collect();
        println!(" ├─► data ({} chunks): {text}", chunks.len());
    }

    fn on_io_failed(&self, err: &TransportError) {
        println!(" └─► i/o failed: {err}");
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = ConsumerContext::new();
    let broker = EventBroker::new(ctx.handle());

    broker.connect(Arc::new(MockDevice)).await?;
    let sink = Arc::new(Console);

    println!("attached, streaming live:");
    broker.attach(sink.clone());
    for _ in 0..10 {
        ctx.run_until_idle();
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    broker.write(b"ack\r\n").await?;

    println!("detached for 300ms, session keeps running:");
    broker.detach();
    tokio::time::sleep(Duration::from_millis(300)).await;

    println!("reattached, backlog arrives coalesced:");
    broker.attach(sink);
    while broker.is_connected() {
        ctx.run_until_idle();
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    ctx.run_until_idle();

    Ok(())
}
