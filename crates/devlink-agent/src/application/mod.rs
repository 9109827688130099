//! Application layer: the agent's use cases.
//!
//! Use cases depend only on the [`channel::DeviceChannel`] seam; the
//! infrastructure layer supplies the real transport.

pub mod channel;
pub mod forward_hid;
pub mod sync_clipboard;
