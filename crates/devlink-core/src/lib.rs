//! # devlink-core
//!
//! Shared library for the devlink control channel: the device-to-controller
//! message model and its binary wire codec.
//!
//! The *device* side of devlink runs on a managed machine and reports
//! discrete events back to the remote *controller* over a single byte
//! stream: clipboard changes, acknowledgements of controller-initiated
//! clipboard writes, and output reports produced by emulated HID devices.
//!
//! This crate defines:
//!
//! - **`protocol::messages`** – the [`DeviceMessage`] sum type, one variant
//!   per event kind, each identified by a single-byte discriminant on the
//!   wire.
//! - **`protocol::codec`** – the hand-rolled big-endian encoding of those
//!   variants, the mirror-image decoder, and a [`StreamDecoder`] that
//!   reassembles messages from arbitrarily chunked stream input.
//!
//! It has zero dependencies on OS APIs, sockets, or async runtimes; the
//! agent crate supplies all of that.

pub mod protocol;

pub use protocol::codec::{decode_message, encode_message, ProtocolError, StreamDecoder};
pub use protocol::messages::{DeviceMessage, DeviceMessageType};
