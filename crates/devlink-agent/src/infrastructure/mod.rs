//! Infrastructure layer: network transport, config storage, and device
//! adapters (clipboard, emulated HID).

pub mod clipboard;
pub mod hid;
pub mod network;
pub mod storage;
