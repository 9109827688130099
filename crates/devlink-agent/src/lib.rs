//! devlink-agent library entry point.
//!
//! Re-exports all public modules so that integration tests and the binary
//! entry point in `main.rs` share the same module tree.
//!
//! The *agent* is the device-side half of the devlink control channel. It
//! watches local event sources and reports them to the remote controller as
//! encoded [`devlink_core::DeviceMessage`]s:
//!
//! 1. Connects to the controller over TCP and keeps the connection alive
//!    with a reconnect loop.
//! 2. Watches the device clipboard and sends a `ClipboardSync` whenever the
//!    text changes.
//! 3. Sends a `ClipboardAck` after a controller-initiated clipboard write
//!    has been applied locally.
//! 4. Forwards output reports from emulated HID devices as
//!    `HidOutputReport` messages.
//!
//! Message bytes for distinct events are written contiguously, one message
//! at a time, so the controller can demultiplex the stream by message
//! boundaries alone.

/// Application layer: use cases for the agent.
pub mod application;

/// Infrastructure layer: network transport, config storage, and device
/// adapters.
pub mod infrastructure;
