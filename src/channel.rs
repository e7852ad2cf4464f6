//! The raw-channel capability contract consumed by [`ChannelAdapter`].
//!
//! A raw channel is any bidirectional transport delivering discrete binary
//! messages: a stream socket behind a framing layer, a peer data channel,
//! or a test double. The adapter is polymorphic over the capability set rather
//! than a concrete type hierarchy, and verifies the surface at attach time.
//!
//! [`ChannelAdapter`]: crate::adapter::ChannelAdapter

use crate::error::Result;
use std::fmt;

/// The four-valued connection-state abstraction unifying different raw
/// channel state encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl ReadyState {
    /// Maps a stream-socket-style numeric state code.
    pub fn from_socket_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Connecting),
            1 => Some(Self::Open),
            2 => Some(Self::Closing),
            3 => Some(Self::Closed),
            _ => None,
        }
    }

    /// Maps a data-channel-style string state label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "connecting" => Some(Self::Connecting),
            "open" => Some(Self::Open),
            "closing" => Some(Self::Closing),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// One operation of the capability set a raw channel must expose.
///
/// [`ChannelAdapter::attach`] checks every capability in [`REQUIRED`] order
/// and fails with [`Error::IncompatibleChannel`] naming the first one the
/// channel does not supply.
///
/// [`ChannelAdapter::attach`]: crate::adapter::ChannelAdapter::attach
/// [`Error::IncompatibleChannel`]: crate::error::Error::IncompatibleChannel
/// [`REQUIRED`]: Capability::REQUIRED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `send(bytes)` transmission.
    Send,
    /// `close()` teardown.
    Close,
    /// The readable readiness-state property.
    ReadyState,
    /// The mutable binary-mode setting.
    BinaryMode,
    /// Native open/message/error/close notification delivery.
    Events,
}

impl Capability {
    /// Every capability the adapter requires, in validation order.
    pub const REQUIRED: [Capability; 5] = [
        Capability::Send,
        Capability::Close,
        Capability::ReadyState,
        Capability::BinaryMode,
        Capability::Events,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Send => "send",
            Capability::Close => "close",
            Capability::ReadyState => "readiness-state",
            Capability::BinaryMode => "binary-mode",
            Capability::Events => "events",
        };
        f.write_str(name)
    }
}

/// Close details delivered by the raw channel's native close notification,
/// forwarded verbatim to the registered close handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
    pub clean: bool,
}

/// A native channel-level error, forwarded verbatim to the registered error
/// handler without further classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A native notification queued by the raw channel, oldest first.
#[derive(Debug, Clone)]
pub enum NativeEvent {
    /// The channel reached its open-equivalent state.
    Open,
    /// One discrete inbound binary message.
    Message(Vec<u8>),
    /// A channel-level error.
    Error(ErrorInfo),
    /// The channel closed.
    Close(CloseInfo),
}

/// The capability surface of a raw bidirectional message channel.
///
/// All methods are object-safe so the adapter can hand handlers a
/// `&mut dyn RawChannel` view during dispatch. Native notifications are
/// delivered through [`poll_event`](Self::poll_event): the channel queues
/// them in arrival order and the adapter's `pump` drains the queue, running
/// each notification to completion on the delivering thread.
pub trait RawChannel {
    /// Whether the channel supplies one operation of the capability set.
    fn supports(&self, capability: Capability) -> bool;

    /// Current readiness state.
    fn ready_state(&self) -> ReadyState;

    /// Switches payload delivery between binary and text framing.
    fn set_binary_mode(&mut self, binary: bool);

    /// Transmits one outbound message.
    fn send(&mut self, payload: &[u8]);

    /// Requests channel teardown.
    fn close(&mut self);

    /// Takes the oldest queued native notification, if any.
    fn poll_event(&mut self) -> Option<NativeEvent>;
}

/// Construction of a default raw channel implementation for a URI, backing
/// [`ChannelAdapter::open`].
///
/// [`ChannelAdapter::open`]: crate::adapter::ChannelAdapter::open
pub trait Connect: RawChannel + Sized {
    /// Opens a channel to `uri`, offering `protocols` as sub-protocol hints.
    fn connect(uri: &str, protocols: &[&str]) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_codes_map_to_ready_states() {
        assert_eq!(ReadyState::from_socket_code(0), Some(ReadyState::Connecting));
        assert_eq!(ReadyState::from_socket_code(1), Some(ReadyState::Open));
        assert_eq!(ReadyState::from_socket_code(2), Some(ReadyState::Closing));
        assert_eq!(ReadyState::from_socket_code(3), Some(ReadyState::Closed));
        assert_eq!(ReadyState::from_socket_code(7), None);
    }

    #[test]
    fn labels_map_to_ready_states() {
        assert_eq!(ReadyState::from_label("connecting"), Some(ReadyState::Connecting));
        assert_eq!(ReadyState::from_label("open"), Some(ReadyState::Open));
        assert_eq!(ReadyState::from_label("closing"), Some(ReadyState::Closing));
        assert_eq!(ReadyState::from_label("closed"), Some(ReadyState::Closed));
        assert_eq!(ReadyState::from_label("OPEN"), None);
    }

    #[test]
    fn capability_names_match_contract() {
        assert_eq!(Capability::ReadyState.to_string(), "readiness-state");
        assert_eq!(Capability::BinaryMode.to_string(), "binary-mode");
    }
}
