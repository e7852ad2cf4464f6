//! The channel adapter: lifecycle, event bridging, and buffer wiring.

use crate::channel::{
    Capability, CloseInfo, Connect, ErrorInfo, NativeEvent, RawChannel, ReadyState,
};
use crate::error::{Error, Result};
use crate::recv::{BufferConfig, ReceiveBuffer};
use crate::send::SendBuffer;

/// Configuration for a [`ChannelAdapter`], set at construction.
#[derive(Debug, Clone, Copy)]
pub struct AdapterConfig {
    /// Sizing of the receive queue.
    pub receive: BufferConfig,
    /// Fixed capacity of the send queue.
    pub send_capacity: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            receive: BufferConfig::default(),
            send_capacity: 10 * 1024,
        }
    }
}

/// Lifecycle of an adapter.
///
/// `Uninitialized -> Attached -> (Open | Closed)`; `Attached` moves straight
/// to `Closed` when the raw channel never reaches its open-equivalent state.
/// Only a fresh `attach` leaves `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Attached,
    Open,
    Closed,
}

/// Keys of the event-notification table exposed to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Message,
    Open,
    Close,
    Error,
}

type MessageHandler = Box<dyn FnMut(&mut Session<'_>)>;
type OpenHandler = Box<dyn FnMut()>;
type CloseHandler = Box<dyn FnMut(&CloseInfo)>;
type ErrorHandler = Box<dyn FnMut(&ErrorInfo)>;

// One slot per event kind; registering overwrites, `None` is the no-op.
#[derive(Default)]
struct HandlerTable {
    message: Option<MessageHandler>,
    open: Option<OpenHandler>,
    close: Option<CloseHandler>,
    error: Option<ErrorHandler>,
}

/// The decoder's view of the connection during a `message` dispatch.
///
/// Exposes the receive-queue read API and the outbound write API over
/// disjoint borrows, so a handler may send or flush re-entrantly while
/// draining; the two queues share no state.
pub struct Session<'a> {
    recv: &'a mut ReceiveBuffer,
    send: &'a mut SendBuffer,
    raw: &'a mut (dyn RawChannel + 'a),
}

impl Session<'_> {
    /// The receive queue holding the bytes of this and any earlier
    /// undrained messages.
    pub fn recv(&mut self) -> &mut ReceiveBuffer {
        &mut *self.recv
    }

    /// Stages `bytes` and eagerly flushes them as one outbound message.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.send.append(bytes)?;
        flush_pending(self.send, self.raw);
        Ok(())
    }

    /// Sends a string, encoding each character's code point as one byte.
    /// Valid only for single-byte character ranges.
    pub fn send_string(&mut self, text: &str) -> Result<()> {
        let bytes: Vec<u8> = text.chars().map(|ch| ch as u8).collect();
        self.send(&bytes)
    }

    /// Transmits any staged bytes if the channel is open.
    pub fn flush(&mut self) {
        flush_pending(self.send, self.raw);
    }
}

// The flush discipline, shared by the adapter and the in-dispatch session:
// a no-op unless bytes are pending and the channel reports open.
fn flush_pending(send: &mut SendBuffer, raw: &mut dyn RawChannel) {
    if send.is_empty() || raw.ready_state() != ReadyState::Open {
        return;
    }
    let pending = send.take_and_reset();
    raw.send(pending);
}

/// Owns a raw channel plus the receive and send queues, bridges the
/// channel's native notifications to registered handlers, and drives
/// ingestion and flush.
///
/// Single-threaded and event-driven: every operation runs to completion on
/// the thread delivering channel notifications. Buffer cursor and mark
/// updates always complete before any handler is invoked.
pub struct ChannelAdapter<C: RawChannel> {
    raw: Option<C>,
    recv: ReceiveBuffer,
    send: SendBuffer,
    handlers: HandlerTable,
    state: AdapterState,
    // Set by `close` and by a native close: inbound payloads are dropped
    // without appending from then on.
    ingest_detached: bool,
    config: AdapterConfig,
}

impl<C: RawChannel> ChannelAdapter<C> {
    /// Creates an unattached adapter with default configuration.
    pub fn new() -> Self {
        Self::with_config(AdapterConfig::default())
    }

    /// Creates an unattached adapter with explicit buffer configuration.
    pub fn with_config(config: AdapterConfig) -> Self {
        Self {
            raw: None,
            recv: ReceiveBuffer::new(config.receive),
            send: SendBuffer::new(config.send_capacity),
            handlers: HandlerTable::default(),
            state: AdapterState::Uninitialized,
            ingest_detached: true,
            config,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// The receive queue, the decoder's sole means of consuming bytes.
    pub fn recv(&mut self) -> &mut ReceiveBuffer {
        &mut self.recv
    }

    /// The attached raw channel, if any.
    pub fn channel(&self) -> Option<&C> {
        self.raw.as_ref()
    }

    /// Mutable access to the attached raw channel, e.g. for the driver that
    /// feeds it.
    pub fn channel_mut(&mut self) -> Option<&mut C> {
        self.raw.as_mut()
    }

    /// Takes ownership of a raw channel and wires it up.
    ///
    /// Validates the capability set first. A failed validation aborts with
    /// [`Error::IncompatibleChannel`] naming the first missing capability
    /// and retains no partial state. On success both queues are freshly
    /// allocated, the channel is switched to binary mode, and the state
    /// machine moves to `Attached`. If the channel already reports its
    /// open-equivalent state, the `open` handler fires synchronously before
    /// `attach` returns.
    pub fn attach(&mut self, mut raw: C) -> Result<()> {
        for capability in Capability::REQUIRED {
            if !raw.supports(capability) {
                return Err(Error::incompatible_channel(capability));
            }
        }

        raw.set_binary_mode(true);
        self.recv = ReceiveBuffer::new(self.config.receive);
        self.send = SendBuffer::new(self.config.send_capacity);
        self.ingest_detached = false;
        self.state = AdapterState::Attached;

        let already_open = raw.ready_state() == ReadyState::Open;
        self.raw = Some(raw);

        if already_open {
            self.state = AdapterState::Open;
            if let Some(handler) = &mut self.handlers.open {
                handler();
            }
        }
        Ok(())
    }

    /// Constructs the default raw channel implementation for `uri` and
    /// delegates to [`attach`](Self::attach).
    pub fn open(&mut self, uri: &str, protocols: &[&str]) -> Result<()>
    where
        C: Connect,
    {
        let raw = C::connect(uri, protocols)?;
        self.attach(raw)
    }

    /// Drains the channel's queued native notifications, bridging each to
    /// its registered handler.
    ///
    /// Inbound messages are decoded to bytes and appended to the receive
    /// queue; the `message` handler fires at most once per network message
    /// (never for an empty payload, never batched across messages), and the
    /// queue resets to the origin once fully drained. A
    /// [`Error::BufferOverflow`] during ingestion is surfaced through the
    /// `error` notification and returned; the caller is expected to close.
    pub fn pump(&mut self) -> Result<()> {
        loop {
            let event = match self.raw.as_mut().and_then(|raw| raw.poll_event()) {
                Some(event) => event,
                None => return Ok(()),
            };
            self.dispatch(event)?;
        }
    }

    fn dispatch(&mut self, event: NativeEvent) -> Result<()> {
        match event {
            NativeEvent::Open => {
                self.state = AdapterState::Open;
                if let Some(handler) = &mut self.handlers.open {
                    handler();
                }
            }
            NativeEvent::Message(payload) => self.ingest(&payload)?,
            NativeEvent::Error(info) => {
                if let Some(handler) = &mut self.handlers.error {
                    handler(&info);
                }
            }
            NativeEvent::Close(info) => {
                self.state = AdapterState::Closed;
                self.ingest_detached = true;
                if let Some(handler) = &mut self.handlers.close {
                    handler(&info);
                }
            }
        }
        Ok(())
    }

    fn ingest(&mut self, payload: &[u8]) -> Result<()> {
        if self.ingest_detached || payload.is_empty() {
            return Ok(());
        }

        if let Err(overflow) = self.recv.append(payload) {
            if let Some(handler) = &mut self.handlers.error {
                handler(&ErrorInfo::new(overflow.to_string()));
            }
            return Err(overflow);
        }

        if self.recv.unread_len() > 0 {
            if let (Some(handler), Some(raw)) = (&mut self.handlers.message, self.raw.as_mut()) {
                let mut session = Session {
                    recv: &mut self.recv,
                    send: &mut self.send,
                    raw,
                };
                handler(&mut session);
            }
        }
        self.recv.reset_if_drained();
        Ok(())
    }

    /// Stages `bytes` and eagerly flushes them as one outbound message,
    /// with no batching window.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.send.append(bytes)?;
        self.flush();
        Ok(())
    }

    /// Sends a string, encoding each character's code point as one byte.
    /// Valid only for single-byte character ranges.
    pub fn send_string(&mut self, text: &str) -> Result<()> {
        let bytes: Vec<u8> = text.chars().map(|ch| ch as u8).collect();
        self.send(&bytes)
    }

    /// Transmits pending send-queue bytes as one message through the raw
    /// channel. A no-op unless bytes are pending and the channel reports
    /// its open-equivalent state.
    pub fn flush(&mut self) {
        if let Some(raw) = self.raw.as_mut() {
            flush_pending(&mut self.send, raw);
        }
    }

    /// Requests channel close when the channel is still connecting or open,
    /// and always detaches the inbound message path so no further bytes are
    /// appended. Pending send-queue bytes are not guaranteed to flush;
    /// unread receive-queue bytes are discarded without error.
    pub fn close(&mut self) {
        if let Some(raw) = self.raw.as_mut() {
            match raw.ready_state() {
                ReadyState::Connecting | ReadyState::Open => raw.close(),
                ReadyState::Closing | ReadyState::Closed => {}
            }
        }
        self.ingest_detached = true;
    }

    /// Registers the `message` handler, overwriting any previous one.
    pub fn on_message<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Session<'_>) + 'static,
    {
        self.handlers.message = Some(Box::new(handler));
    }

    /// Registers the `open` handler, overwriting any previous one.
    pub fn on_open<F>(&mut self, handler: F)
    where
        F: FnMut() + 'static,
    {
        self.handlers.open = Some(Box::new(handler));
    }

    /// Registers the `close` handler, overwriting any previous one.
    pub fn on_close<F>(&mut self, handler: F)
    where
        F: FnMut(&CloseInfo) + 'static,
    {
        self.handlers.close = Some(Box::new(handler));
    }

    /// Registers the `error` handler, overwriting any previous one.
    pub fn on_error<F>(&mut self, handler: F)
    where
        F: FnMut(&ErrorInfo) + 'static,
    {
        self.handlers.error = Some(Box::new(handler));
    }

    /// Restores the no-op handler for one event kind.
    pub fn off(&mut self, kind: EventKind) {
        match kind {
            EventKind::Message => self.handlers.message = None,
            EventKind::Open => self.handlers.open = None,
            EventKind::Close => self.handlers.close = None,
            EventKind::Error => self.handlers.error = None,
        }
    }
}

impl<C: RawChannel> Default for ChannelAdapter<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = AdapterConfig::default();
        assert!(config.send_capacity > 0);
        assert!(config.receive.initial_capacity <= config.receive.max_capacity);
        assert!(config.receive.growth_headroom >= 1);
    }
}
