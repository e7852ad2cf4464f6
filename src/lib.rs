//! # bytequeue
//!
//! A buffering transport layer beneath streaming binary protocol clients.
//!
//! ## Overview
//!
//! `bytequeue` sits between a raw bidirectional message channel (a
//! WebSocket-like or data-channel-like abstraction delivering discrete
//! binary messages) and a protocol decoder that wants to read structured
//! binary fields from a continuous byte stream without caring about message
//! boundaries. It stores and exposes raw bytes; it never interprets
//! them.
//!
//! ## Key Features
//!
//! * **Amortized receive queue**: lazy compaction and headroom-targeted
//!   growth keep steady high-volume traffic off the allocator
//! * **Cursor-based read primitives**: big-endian integer reads, borrowed
//!   byte views, and a backpressure signal with partial-header rewind
//! * **Eager send queue**: fixed-capacity staging flushed as one message
//!   per write
//! * **Capability-checked attach**: any channel supplying the required
//!   operation set works; validation failures name the missing capability
//! * **Single-threaded**: event-driven, run-to-completion, no locking
//!
//! ## Quick Start
//!
//! ```rust
//! use bytequeue::{BufferConfig, ReceiveBuffer, Result, SendBuffer};
//!
//! fn main() -> Result<()> {
//!     // Inbound: messages arrive as discrete chunks, reads see one stream.
//!     let mut rq = ReceiveBuffer::new(BufferConfig::default());
//!     rq.append(&[0x00, 0x03])?;
//!     rq.append(b"abc")?;
//!
//!     let len = rq.read_u16() as usize;
//!     if rq.needs_more(len, 2)? {
//!         // Partial message: the two header bytes were given back and the
//!         // decoder waits for the next append.
//!         return Ok(());
//!     }
//!     assert_eq!(rq.read_string(len), "abc");
//!
//!     // Outbound: stage bytes, then hand them to the channel in one flush.
//!     let mut sq = SendBuffer::new(1024);
//!     sq.append(&[0x05, 0x00])?;
//!     assert_eq!(sq.take_and_reset(), &[0x05, 0x00]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The crate is built around three cooperating pieces:
//!
//! * **`ReceiveBuffer`**: accumulates inbound bytes and exposes the
//!   cursor-based read interface, growing or compacting itself on demand
//! * **`SendBuffer`**: accumulates outbound bytes and hands them to the
//!   flush path in one piece
//! * **`ChannelAdapter`**: owns a [`RawChannel`], validates its capability
//!   surface at attach time, bridges native notifications to registered
//!   handlers, and drives ingestion and flush
//!
//! The raw channel is a capability set, not a concrete type: implement
//! [`RawChannel`] (and optionally [`Connect`]) for whatever transport
//! delivers your messages.

pub mod adapter;
pub mod channel;
pub mod error;
pub mod recv;
pub mod send;

// Re-export the main public API for user convenience.
pub use adapter::{AdapterConfig, AdapterState, ChannelAdapter, EventKind, Session};
pub use channel::{
    Capability, CloseInfo, Connect, ErrorInfo, NativeEvent, RawChannel, ReadyState,
};
pub use error::{Error, Result};
pub use recv::{BufferConfig, ReceiveBuffer};
pub use send::SendBuffer;
