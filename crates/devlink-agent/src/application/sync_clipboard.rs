//! SyncClipboardUseCase: reports device clipboard changes to the controller
//! and acknowledges controller-initiated clipboard writes.
//!
//! The use case sits at the application layer and delegates to a
//! [`ClipboardSource`] for reading the local clipboard and a
//! [`DeviceChannel`] for the outbound transport. Platform clipboard adapters
//! live in the infrastructure layer.

use std::sync::Arc;

use devlink_core::DeviceMessage;
use thiserror::Error;
use tracing::debug;

use crate::application::channel::{ChannelError, DeviceChannel};

/// Error type for clipboard access.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// Errors surfaced by the clipboard sync use case.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Read access to the device clipboard.
///
/// Each supported platform provides an implementation in the infrastructure
/// layer; `None` means the clipboard is empty or holds no text content.
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSource: Send {
    /// Returns the current clipboard text, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError`] if the platform clipboard cannot be read.
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError>;
}

/// The clipboard sync use case.
///
/// Keeps the last text it has reported (or applied on behalf of the
/// controller) and suppresses consecutive duplicates, so polling the
/// clipboard faster than it changes costs nothing on the wire. A clipboard
/// update is never dropped for being large; the codec truncates oversize
/// text instead.
pub struct SyncClipboardUseCase {
    channel: Arc<dyn DeviceChannel>,
    last_text: Option<String>,
}

impl SyncClipboardUseCase {
    /// Creates a new use case sending on the given channel.
    pub fn new(channel: Arc<dyn DeviceChannel>) -> Self {
        Self {
            channel,
            last_text: None,
        }
    }

    /// Reads the clipboard once and reports it if the text changed.
    ///
    /// Returns `true` if a message was sent.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the clipboard cannot be read or the send
    /// fails.
    pub async fn poll_once(
        &mut self,
        source: &mut dyn ClipboardSource,
    ) -> Result<bool, SyncError> {
        match source.read_text()? {
            Some(text) => Ok(self.handle_clipboard_change(text).await?),
            None => Ok(false),
        }
    }

    /// Reports `text` as the new clipboard content unless it matches the
    /// last reported text.
    ///
    /// Returns `true` if a message was sent.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the send fails. The text is only
    /// remembered once it reaches the transport, so a change that failed to
    /// send stays pending and the next poll retries it.
    pub async fn handle_clipboard_change(&mut self, text: String) -> Result<bool, ChannelError> {
        if self.last_text.as_deref() == Some(text.as_str()) {
            return Ok(false);
        }
        debug!(bytes = text.len(), "clipboard changed; reporting");
        let msg = DeviceMessage::clipboard_sync(text.clone());
        self.channel.send(&msg).await?;
        self.last_text = Some(text);
        Ok(true)
    }

    /// Acknowledges that the controller set-request `sequence` has been
    /// applied, remembering `applied_text` so the watcher does not echo the
    /// controller's own write back as a fresh clipboard change.
    ///
    /// The sequence number is minted by the controller; this side only
    /// echoes it.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the send fails.
    pub async fn acknowledge_set(
        &mut self,
        sequence: u64,
        applied_text: String,
    ) -> Result<(), ChannelError> {
        self.last_text = Some(applied_text);
        debug!(sequence, "acknowledging controller clipboard write");
        self.channel.send(&DeviceMessage::clipboard_ack(sequence)).await
    }
}
