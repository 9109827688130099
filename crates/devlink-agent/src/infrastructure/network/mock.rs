//! Mock device channel for unit testing.
//!
//! The real [`ControllerConnection`](super::ControllerConnection) writes to
//! a TCP socket, which unit tests cannot observe directly. The
//! `RecordingChannel` goes through the same encode step and then records the
//! message in memory instead of writing bytes, so test assertions can
//! inspect exactly what was sent and in what order.
//!
//! With `fail_sends` set, every send returns `ChannelError::NotConnected`
//! before recording anything, which exercises the error-handling paths of
//! the use cases.

use std::sync::Mutex;

use async_trait::async_trait;
use devlink_core::{encode_message, DeviceMessage};

use crate::application::channel::{ChannelError, DeviceChannel};

/// A channel that records sent messages without a network connection.
#[derive(Default)]
pub struct RecordingChannel {
    /// Every successfully "sent" message, in send order.
    messages: Mutex<Vec<DeviceMessage>>,
    /// When `true`, every send fails with `NotConnected`.
    fail_sends: bool,
}

impl RecordingChannel {
    /// Creates a channel that accepts every send.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel on which every send fails.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    /// Returns a copy of the messages sent so far.
    pub fn sent(&self) -> Vec<DeviceMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceChannel for RecordingChannel {
    async fn send(&self, msg: &DeviceMessage) -> Result<(), ChannelError> {
        if self.fail_sends {
            return Err(ChannelError::NotConnected);
        }
        // Encode first, like the real transport: a message that cannot be
        // encoded is never recorded as sent.
        let _bytes = encode_message(msg)?;
        self.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_channel_preserves_send_order() {
        let channel = RecordingChannel::new();
        channel.send(&DeviceMessage::clipboard_ack(1)).await.unwrap();
        channel.send(&DeviceMessage::clipboard_ack(2)).await.unwrap();

        assert_eq!(
            channel.sent(),
            vec![
                DeviceMessage::clipboard_ack(1),
                DeviceMessage::clipboard_ack(2),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_channel_records_nothing() {
        let channel = RecordingChannel::failing();
        let result = channel.send(&DeviceMessage::clipboard_ack(1)).await;

        assert!(matches!(result, Err(ChannelError::NotConnected)));
        assert!(channel.sent().is_empty());
    }
}
