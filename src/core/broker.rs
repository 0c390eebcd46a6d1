//! # EventBroker: buffering dispatch between a transport and its consumer.
//!
//! The broker sits between one producer (the transport's I/O worker) and at
//! most one consumer (a sink living on its own cooperative context). Its job
//! is to make sure every event submitted during a connected session reaches
//! the consumer exactly once and in order, even though the consumer may be
//! absent or mid-handoff when the event arrives.
//!
//! ## Event flow
//! ```text
//! Producer thread                         Consumer thread
//! ───────────────                         ───────────────
//! submit_event(e)
//!   ├─ gate closed ──► drop
//!   ├─ attached ─────► schedule job ────► job: re-check attachment
//!   │                                       ├─ still attached ─► sink callback
//!   │                                       └─ detached since ─► `scheduled` buffer
//!   └─ detached ─────► `parked` buffer
//!
//! submit_chunk(bytes)
//!   ├─ attached ─────► coalesce cell ───► one drain job per burst
//!   └─ detached ─────► merge into tail of `parked`
//!
//! attach(sink):  publish sink, then deliver `scheduled` + `parked`, in order
//! detach():      clear sink; buffers fill lazily from here on
//! ```
//!
//! ## Rules
//! - **No waiting**: submits append under a short-lived mutex or schedule a
//!   job; they never wait for delivery.
//! - **No job cancellation**: a delivery job scheduled before a detach still
//!   runs; it re-checks attachment at run time and redirects the event into
//!   the `scheduled` buffer instead. This is what makes detach-during-flight
//!   race-free.
//! - **Buffer split**: `scheduled` holds events whose delivery job lost the
//!   race with a detach; `parked` holds events produced while detached.
//!   `scheduled` entries are strictly older, so an attach drains `scheduled`
//!   first and reconstructs causal order.
//! - **Terminal errors** (`ConnectFailed`, `IoFailed`) are buffered or
//!   scheduled first, then the session is torn down, so the error itself is
//!   still observed exactly once and nothing is produced after it.
//! - **Gate**: once `Disconnected`, every submit is a no-op. A torn-down
//!   session never resurrects stale buffers.

use std::collections::VecDeque;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use tokio_util::sync::CancellationToken;

use crate::core::coalesce::CoalesceCell;
use crate::core::context::ContextHandle;
use crate::error::BrokerError;
use crate::events::SerialEvent;
use crate::presence::PresenceHook;
use crate::sinks::{dispatch, SerialSink};
use crate::transport::{Producer, Transport};

/// Connection gate for one session.
///
/// `Idle` is the pre-connect state. `Disconnected` is terminal: submits are
/// dropped and `connect` refuses to run again on this broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gate {
    Idle,
    Connected,
    Disconnected,
}

/// Everything guarded by the broker-wide mutex.
///
/// Critical sections stay short (flag checks, buffer appends/drains); the
/// mutex is never held across a scheduling boundary or a sink callback.
struct BrokerState {
    gate: Gate,
    sink: Option<Arc<dyn SerialSink>>,
    transport: Option<Arc<dyn Transport>>,
    /// Pre-dispatch buffer: events whose delivery job found the consumer
    /// detached at run time.
    scheduled: VecDeque<SerialEvent>,
    /// Post-detach buffer: events produced while no consumer was attached.
    parked: VecDeque<SerialEvent>,
}

pub(crate) struct BrokerInner {
    state: Mutex<BrokerState>,
    cell: CoalesceCell,
    ctx: ContextHandle,
    presence: Arc<dyn PresenceHook>,
    stop: CancellationToken,
}

impl BrokerInner {
    pub(crate) fn new(ctx: ContextHandle, presence: Arc<dyn PresenceHook>) -> Self {
        Self {
            state: Mutex::new(BrokerState {
                gate: Gate::Idle,
                sink: None,
                transport: None,
                scheduled: VecDeque::new(),
                parked: VecDeque::new(),
            }),
            cell: CoalesceCell::new(),
            ctx,
            presence,
            stop: CancellationToken::new(),
        }
    }

    /// The state only ever moves forward (flags, appends, drains), so a
    /// poisoned lock still holds a coherent value.
    fn lock_state(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit path for connect and error events (producer thread).
    pub(crate) fn submit_event(self: &Arc<Self>, event: SerialEvent) {
        let terminal = event.is_terminal();
        {
            let mut st = self.lock_state();
            if st.gate != Gate::Connected {
                return;
            }
            if st.sink.is_some() {
                let broker = Arc::clone(self);
                self.ctx
                    .schedule(Box::new(move || broker.deliver_or_defer(event)));
            } else {
                st.parked.push_back(event);
            }
        }
        // Buffer the error first, then tear down: the error is still
        // delivered exactly once, and nothing is produced after it.
        if terminal {
            self.disconnect();
        }
    }

    /// Submit path for raw data (producer thread).
    ///
    /// While attached, chunks accumulate in the coalesce cell and the first
    /// chunk of a cycle schedules the single drain job for the whole burst.
    /// While detached, chunks merge into the tail of `parked`, which yields
    /// the same coalescing without waking anyone.
    pub(crate) fn submit_chunk(self: &Arc<Self>, data: Vec<u8>) {
        let mut st = self.lock_state();
        if st.gate != Gate::Connected {
            return;
        }
        if st.sink.is_some() {
            if self.cell.push(data) {
                let broker = Arc::clone(self);
                self.ctx.schedule(Box::new(move || {
                    let chunks = broker.cell.drain();
                    broker.deliver_or_defer(SerialEvent::DataReceived(chunks));
                }));
            }
        } else {
            match st.parked.back_mut() {
                Some(SerialEvent::DataReceived(chunks)) => chunks.push(data),
                _ => st.parked.push_back(SerialEvent::DataReceived(vec![data])),
            }
        }
    }

    /// Delivery job body (consumer thread): deliver if a sink is attached,
    /// otherwise defer into the pre-dispatch buffer.
    fn deliver_or_defer(&self, event: SerialEvent) {
        let sink = {
            let mut st = self.lock_state();
            match &st.sink {
                Some(sink) => Arc::clone(sink),
                None => {
                    st.scheduled.push_back(event);
                    return;
                }
            }
        };
        dispatch(sink.as_ref(), &event);
    }

    fn attach(&self, sink: Arc<dyn SerialSink>) {
        self.assert_consumer_thread("attach");
        self.presence.disarm();
        let pending = {
            let mut st = self.lock_state();
            st.sink = Some(Arc::clone(&sink));
            let mut pending = mem::take(&mut st.scheduled);
            pending.append(&mut st.parked);
            pending
        };
        for event in pending {
            dispatch(sink.as_ref(), &event);
        }
    }

    fn detach(&self) {
        self.assert_consumer_thread("detach");
        let arm = {
            let mut st = self.lock_state();
            st.sink = None;
            st.gate == Gate::Connected
        };
        if arm {
            self.presence.arm();
        }
    }

    /// Idempotent teardown; safe to call from the submit path (the broker
    /// mutex is never held while calling this).
    pub(crate) fn disconnect(&self) {
        let transport = {
            let mut st = self.lock_state();
            if st.gate == Gate::Disconnected {
                return;
            }
            st.gate = Gate::Disconnected;
            st.transport.take()
        };
        self.stop.cancel();
        self.presence.disarm();
        drop(transport);
    }

    fn assert_consumer_thread(&self, op: &str) {
        if thread::current().id() != self.ctx.thread_id() {
            panic!("{op}() must be called on the consumer context thread");
        }
    }
}

/// Buffering event broker for one transport session.
///
/// Cheap to clone (internally `Arc`-backed); clones share the session.
///
/// ### Responsibilities
/// - **Gatekeeping**: drop everything submitted outside a connected session
/// - **Dispatch**: forward events to the attached sink on its own context
/// - **Buffering**: hold events produced while detached or mid-handoff
/// - **Coalescing**: merge chunk bursts into single deliveries
/// - **Teardown**: stop the transport after a terminal error
///
/// ### Lifecycle
/// One broker serves one session: `connect` once, then any number of
/// `attach`/`detach` cycles, then `disconnect` (explicit or via a terminal
/// error). Reconnection is a new session with a fresh broker.
#[derive(Clone)]
pub struct EventBroker {
    inner: Arc<BrokerInner>,
}

impl EventBroker {
    /// Starts building a broker around the given consumer context.
    #[must_use]
    pub fn builder(ctx: ContextHandle) -> super::builder::EventBrokerBuilder {
        super::builder::EventBrokerBuilder::new(ctx)
    }

    /// Creates a broker with no presence hook.
    #[must_use]
    pub fn new(ctx: ContextHandle) -> Self {
        Self::builder(ctx).build()
    }

    pub(crate) fn from_inner(inner: Arc<BrokerInner>) -> Self {
        Self { inner }
    }

    /// Opens the session on the given transport.
    ///
    /// The connection gate opens before [`Transport::open`] runs, so
    /// handshake events from a fast transport are never dropped. A
    /// synchronous open failure rolls the gate back and is returned here;
    /// failures after `open` returns arrive as events instead.
    ///
    /// # Errors
    /// - [`BrokerError::AlreadyConnected`] while a session is running
    /// - [`BrokerError::SessionEnded`] on a torn-down broker
    /// - [`BrokerError::Transport`] when `open` fails synchronously
    pub async fn connect(&self, transport: Arc<dyn Transport>) -> Result<(), BrokerError> {
        {
            let mut st = self.inner.lock_state();
            match st.gate {
                Gate::Connected => return Err(BrokerError::AlreadyConnected),
                Gate::Disconnected => return Err(BrokerError::SessionEnded),
                Gate::Idle => {}
            }
            st.gate = Gate::Connected;
            st.transport = Some(Arc::clone(&transport));
        }
        let producer = Producer::new(Arc::clone(&self.inner), self.inner.stop.clone());
        match transport.open(producer).await {
            Ok(()) => Ok(()),
            Err(err) => {
                let mut st = self.inner.lock_state();
                st.gate = Gate::Idle;
                st.transport = None;
                Err(BrokerError::Transport(err))
            }
        }
    }

    /// Tears the session down: closes the gate, signals the transport to
    /// stop, disarms the presence hook.
    ///
    /// Idempotent. Buffers keep whatever was queued up to and including a
    /// terminal event, ready for a later attach. The coalesce cell is left
    /// alone: a drain job that was already scheduled still delivers the
    /// chunks accepted before the gate closed.
    pub fn disconnect(&self) {
        self.inner.disconnect();
    }

    /// Writes bytes to the device.
    ///
    /// # Errors
    /// - [`BrokerError::NotConnected`] unless a session is connected
    /// - [`BrokerError::Transport`] when the transport rejects the write
    pub async fn write(&self, data: &[u8]) -> Result<(), BrokerError> {
        let transport = {
            let st = self.inner.lock_state();
            if st.gate != Gate::Connected {
                return Err(BrokerError::NotConnected);
            }
            match &st.transport {
                Some(transport) => Arc::clone(transport),
                None => return Err(BrokerError::NotConnected),
            }
        };
        transport.write(data).await.map_err(BrokerError::from)
    }

    /// Attaches the consumer and drains both buffers to it, oldest first.
    ///
    /// Pre-dispatch events precede post-detach events; together with FIFO
    /// buffers this reconstructs submission order. Both buffers are empty
    /// when this returns.
    ///
    /// # Panics
    /// When called off the consumer context thread.
    pub fn attach(&self, sink: Arc<dyn SerialSink>) {
        self.inner.attach(sink);
    }

    /// Detaches the consumer; idempotent.
    ///
    /// Arms the presence hook when a connected session keeps running
    /// unattended. Buffers are not touched here; they fill lazily as
    /// later submits and delivery jobs observe the detached state.
    ///
    /// # Panics
    /// When called off the consumer context thread.
    pub fn detach(&self) {
        self.inner.detach();
    }

    /// True while the session is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.lock_state().gate == Gate::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ConsumerContext;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink that records every callback as the event it observed.
    struct RecordingSink {
        events: Mutex<Vec<SerialEvent>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }

        fn take(&self) -> Vec<SerialEvent> {
            mem::take(&mut *self.events.lock().unwrap())
        }

        fn push(&self, event: SerialEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl SerialSink for RecordingSink {
        fn on_connected(&self) {
            self.push(SerialEvent::Connected);
        }
        fn on_connect_failed(&self, err: &TransportError) {
            self.push(SerialEvent::ConnectFailed(err.clone()));
        }
        fn on_data_received(&self, chunks: &[Vec<u8>]) {
            self.push(SerialEvent::DataReceived(chunks.to_vec()));
        }
        fn on_io_failed(&self, err: &TransportError) {
            self.push(SerialEvent::IoFailed(err.clone()));
        }
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    /// Transport that hands its producer back out so tests can drive it.
    struct StubTransport {
        producer: Mutex<Option<Producer>>,
        writes: Mutex<Vec<Vec<u8>>>,
        fail_open: bool,
    }

    impl StubTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                producer: Mutex::new(None),
                writes: Mutex::new(Vec::new()),
                fail_open: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                producer: Mutex::new(None),
                writes: Mutex::new(Vec::new()),
                fail_open: true,
            })
        }

        fn producer(&self) -> Producer {
            self.producer.lock().unwrap().clone().expect("not opened")
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        fn name(&self) -> &str {
            "stub"
        }

        async fn open(&self, producer: Producer) -> Result<(), TransportError> {
            if self.fail_open {
                return Err(TransportError::connect("no device"));
            }
            *self.producer.lock().unwrap() = Some(producer);
            Ok(())
        }

        async fn write(&self, data: &[u8]) -> Result<(), TransportError> {
            self.writes.lock().unwrap().push(data.to_vec());
            Ok(())
        }
    }

    struct CountingPresence {
        arms: AtomicUsize,
        disarms: AtomicUsize,
    }

    impl CountingPresence {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                arms: AtomicUsize::new(0),
                disarms: AtomicUsize::new(0),
            })
        }
    }

    impl PresenceHook for CountingPresence {
        fn arm(&self) {
            self.arms.fetch_add(1, Ordering::SeqCst);
        }
        fn disarm(&self) {
            self.disarms.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn rig() -> (ConsumerContext, EventBroker, Arc<StubTransport>, Producer) {
        let ctx = ConsumerContext::new();
        let broker = EventBroker::new(ctx.handle());
        let transport = StubTransport::new();
        broker
            .connect(Arc::clone(&transport) as Arc<dyn Transport>)
            .await
            .unwrap();
        let producer = transport.producer();
        (ctx, broker, transport, producer)
    }

    fn data(chunks: &[&[u8]]) -> SerialEvent {
        SerialEvent::DataReceived(chunks.iter().map(|c| c.to_vec()).collect())
    }

    #[tokio::test]
    async fn test_detached_chunks_coalesce_until_attach() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        producer.chunk(b"A".to_vec());
        producer.chunk(b"B".to_vec());
        producer.chunk(b"C".to_vec());

        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert_eq!(sink.take(), vec![data(&[b"A", b"B", b"C"])]);

        // Buffers are empty: a fresh attach drains nothing.
        broker.detach();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert!(sink.take().is_empty());
        assert_eq!(ctx.run_until_idle(), 0);
    }

    #[tokio::test]
    async fn test_scheduled_delivery_parks_when_detach_races() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        let first = RecordingSink::new();
        broker.attach(Arc::clone(&first) as Arc<dyn SerialSink>);

        // Scheduled while attached, but the consumer detaches before the
        // job runs: the event must land in the pre-dispatch buffer.
        producer.connected();
        broker.detach();
        ctx.run_until_idle();
        assert!(first.take().is_empty());

        let second = RecordingSink::new();
        broker.attach(Arc::clone(&second) as Arc<dyn SerialSink>);
        assert_eq!(second.take(), vec![SerialEvent::Connected]);

        // Delivered exactly once: nothing left anywhere.
        assert_eq!(ctx.run_until_idle(), 0);
        broker.detach();
        broker.attach(Arc::clone(&second) as Arc<dyn SerialSink>);
        assert!(second.take().is_empty());
    }

    #[tokio::test]
    async fn test_io_failure_is_terminal_and_delivered_once() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);

        producer.io_failed(TransportError::io("device detached"));
        assert!(producer.is_stopped());
        assert!(!broker.is_connected());
        ctx.run_until_idle();
        assert_eq!(
            sink.take(),
            vec![SerialEvent::IoFailed(TransportError::io("device detached"))]
        );

        // The broker is inert: nothing new is buffered or delivered.
        producer.chunk(b"late".to_vec());
        producer.connected();
        ctx.run_until_idle();
        assert!(sink.take().is_empty());
        broker.detach();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert!(sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_terminal_error_while_detached_parks_then_tears_down() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        producer.chunk(b"A".to_vec());
        producer.connect_failed(TransportError::connect("handshake refused"));
        // Dropped: submitted after the gate closed.
        producer.chunk(b"B".to_vec());

        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert_eq!(
            sink.take(),
            vec![
                data(&[b"A"]),
                SerialEvent::ConnectFailed(TransportError::connect("handshake refused")),
            ]
        );
        assert_eq!(ctx.run_until_idle(), 0);
    }

    #[tokio::test]
    async fn test_chunks_coalesce_per_cycle_while_attached() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);

        producer.chunk(b"A".to_vec());
        producer.chunk(b"B".to_vec());
        ctx.run_until_idle();
        // A chunk after the drain opens a new cycle.
        producer.chunk(b"C".to_vec());
        ctx.run_until_idle();

        assert_eq!(sink.take(), vec![data(&[b"A", b"B"]), data(&[b"C"])]);
    }

    #[tokio::test]
    async fn test_order_preserved_across_detach_attach() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);

        // Both scheduled, neither run: connect lands in the job queue, the
        // chunk in the coalesce cell.
        producer.connected();
        producer.chunk(b"early".to_vec());
        broker.detach();
        ctx.run_until_idle();

        // Produced while detached: parked, coalescing at the tail.
        producer.chunk(b"late1".to_vec());
        producer.chunk(b"late2".to_vec());

        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert_eq!(
            sink.take(),
            vec![
                SerialEvent::Connected,
                data(&[b"early"]),
                data(&[b"late1", b"late2"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_detached_buffer_does_not_merge_across_other_events() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        producer.chunk(b"A".to_vec());
        producer.connected();
        producer.chunk(b"B".to_vec());
        producer.chunk(b"C".to_vec());

        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert_eq!(
            sink.take(),
            vec![
                data(&[b"A"]),
                SerialEvent::Connected,
                data(&[b"B", b"C"]),
            ]
        );
        assert_eq!(ctx.run_until_idle(), 0);
    }

    #[tokio::test]
    async fn test_pending_drain_still_delivers_after_disconnect() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);

        // Chunk accepted while connected; the drain job is already queued
        // when the session ends, so the data still arrives.
        producer.chunk(b"A".to_vec());
        broker.disconnect();
        ctx.run_until_idle();
        assert_eq!(sink.take(), vec![data(&[b"A"])]);
    }

    #[tokio::test]
    async fn test_detach_is_idempotent() {
        let (mut ctx, broker, _transport, producer) = rig().await;
        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        broker.detach();
        broker.detach();

        producer.chunk(b"A".to_vec());
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert_eq!(sink.take(), vec![data(&[b"A"])]);
        assert_eq!(ctx.run_until_idle(), 0);
    }

    #[tokio::test]
    async fn test_write_requires_connection() {
        let ctx = ConsumerContext::new();
        let broker = EventBroker::new(ctx.handle());
        assert!(matches!(
            broker.write(b"hello").await,
            Err(BrokerError::NotConnected)
        ));

        let transport = StubTransport::new();
        broker
            .connect(Arc::clone(&transport) as Arc<dyn Transport>)
            .await
            .unwrap();
        broker.write(b"hello").await.unwrap();
        assert_eq!(*transport.writes.lock().unwrap(), vec![b"hello".to_vec()]);

        broker.disconnect();
        assert!(matches!(
            broker.write(b"again").await,
            Err(BrokerError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_connect_gate_rejects_reuse() {
        let (_ctx, broker, _transport, _producer) = rig().await;
        let another = StubTransport::new();
        assert!(matches!(
            broker
                .connect(Arc::clone(&another) as Arc<dyn Transport>)
                .await,
            Err(BrokerError::AlreadyConnected)
        ));

        broker.disconnect();
        assert!(matches!(
            broker
                .connect(Arc::clone(&another) as Arc<dyn Transport>)
                .await,
            Err(BrokerError::SessionEnded)
        ));
    }

    #[tokio::test]
    async fn test_failed_open_rolls_the_gate_back() {
        let ctx = ConsumerContext::new();
        let broker = EventBroker::new(ctx.handle());
        let bad = StubTransport::failing();
        assert!(matches!(
            broker.connect(Arc::clone(&bad) as Arc<dyn Transport>).await,
            Err(BrokerError::Transport(TransportError::ConnectFailed { .. }))
        ));
        assert!(!broker.is_connected());

        // The broker is still usable with a working transport.
        let good = StubTransport::new();
        broker
            .connect(Arc::clone(&good) as Arc<dyn Transport>)
            .await
            .unwrap();
        assert!(broker.is_connected());
    }

    #[tokio::test]
    async fn test_presence_hook_follows_attendance() {
        let ctx = ConsumerContext::new();
        let presence = CountingPresence::new();
        let broker = EventBroker::builder(ctx.handle())
            .with_presence(Arc::clone(&presence) as Arc<dyn PresenceHook>)
            .build();
        let transport = StubTransport::new();
        broker
            .connect(Arc::clone(&transport) as Arc<dyn Transport>)
            .await
            .unwrap();

        let sink = RecordingSink::new();
        broker.attach(Arc::clone(&sink) as Arc<dyn SerialSink>);
        assert_eq!(presence.disarms.load(Ordering::SeqCst), 1);

        broker.detach();
        assert_eq!(presence.arms.load(Ordering::SeqCst), 1);

        broker.disconnect();
        assert_eq!(presence.disarms.load(Ordering::SeqCst), 2);

        // Detaching a dead session must not arm the hook again.
        broker.detach();
        assert_eq!(presence.arms.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attach_off_consumer_thread_panics() {
        let (_ctx, broker, _transport, _producer) = rig().await;
        let result = thread::spawn(move || {
            broker.attach(RecordingSink::new() as Arc<dyn SerialSink>);
        })
        .join();
        assert!(result.is_err());
    }
}
