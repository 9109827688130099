//! The outbound message seam between event producers and the transport.
//!
//! Producers (clipboard watcher, HID forwarder) construct a
//! [`DeviceMessage`] and hand it to a [`DeviceChannel`]. The channel encodes
//! it and passes the complete byte sequence to the transport exactly once;
//! failures are propagated back to the producer, never retried here.

use async_trait::async_trait;
use devlink_core::{DeviceMessage, ProtocolError};
use thiserror::Error;

/// Errors that can occur when sending a message to the controller.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No connection to the controller is currently established.
    #[error("not connected to controller")]
    NotConnected,

    /// The message could not be encoded. With the current message set this
    /// only happens for an oversize HID report; nothing is written for it
    /// and earlier messages on the stream are unaffected.
    #[error("encode error: {0}")]
    Encode(#[from] ProtocolError),

    /// The transport failed while writing the encoded bytes.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outbound channel to the controller.
///
/// Implementations own the single-writer discipline: the bytes of one
/// message are written contiguously, never interleaved with another
/// message's bytes, and in the order the sends were accepted.
#[async_trait]
pub trait DeviceChannel: Send + Sync {
    /// Encodes `msg` and writes the full contiguous byte sequence to the
    /// controller.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if encoding or the underlying write fails.
    async fn send(&self, msg: &DeviceMessage) -> Result<(), ChannelError>;
}
