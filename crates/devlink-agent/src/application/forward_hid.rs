//! ForwardHidOutputUseCase: relays emulated-HID output reports to the
//! controller.
//!
//! The emulated-HID layer hands over raw output reports as they are produced
//! by the kernel-side device; this use case wraps each one in a
//! `HidOutputReport` message and sends it. The payload is opaque here and
//! passes through verbatim.

use std::sync::Arc;

use devlink_core::DeviceMessage;
use tracing::debug;

use crate::application::channel::{ChannelError, DeviceChannel};

/// The HID output forwarding use case.
pub struct ForwardHidOutputUseCase {
    channel: Arc<dyn DeviceChannel>,
}

impl ForwardHidOutputUseCase {
    /// Creates a new use case sending on the given channel.
    pub fn new(channel: Arc<dyn DeviceChannel>) -> Self {
        Self { channel }
    }

    /// Forwards one output report from device `id`, taking ownership of the
    /// report bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the send fails. A report larger than the
    /// wire format allows surfaces as an encode error; that single report is
    /// lost but the stream and subsequent reports are unaffected.
    pub async fn handle_report(&self, id: u16, data: Vec<u8>) -> Result<(), ChannelError> {
        debug!(id, bytes = data.len(), "forwarding HID output report");
        self.channel
            .send(&DeviceMessage::hid_output_report(id, data))
            .await
    }
}
