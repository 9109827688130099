//! Clipboard infrastructure: the polling loop that drives the sync use case
//! and a scripted in-memory clipboard for tests and demo wiring.
//!
//! Real platform adapters (X11 selections, Windows `OpenClipboard`, macOS
//! `NSPasteboard`) implement
//! [`ClipboardSource`](crate::application::sync_clipboard::ClipboardSource)
//! here and replace [`ScriptedClipboard`] in `main.rs`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::application::channel::ChannelError;
use crate::application::sync_clipboard::{
    ClipboardError, ClipboardSource, SyncClipboardUseCase, SyncError,
};

/// An in-memory clipboard that replays a scripted sequence of contents.
///
/// Each `read_text` call pops the next scripted value; once the script is
/// exhausted, the clipboard keeps reporting the last value, like a real
/// clipboard that stopped changing.
#[derive(Default)]
pub struct ScriptedClipboard {
    script: VecDeque<Option<String>>,
    current: Option<String>,
}

impl ScriptedClipboard {
    /// Creates a clipboard that is empty and never changes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a clipboard that replays `contents` one read at a time.
    pub fn with_contents(contents: Vec<Option<String>>) -> Self {
        Self {
            script: contents.into(),
            current: None,
        }
    }
}

impl ClipboardSource for ScriptedClipboard {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        Ok(self.current.clone())
    }
}

/// Polls the clipboard on `poll_interval` and reports changes until
/// `running` is cleared.
///
/// A send that fails because the controller is not connected is quiet (the
/// change stays pending and is retried on the next tick); other failures are
/// logged and polling continues.
pub async fn watch_clipboard(
    mut source: Box<dyn ClipboardSource>,
    mut use_case: SyncClipboardUseCase,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
) {
    let mut ticker = time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
        match use_case.poll_once(source.as_mut()).await {
            Ok(_) => {}
            Err(SyncError::Channel(ChannelError::NotConnected)) => {
                debug!("clipboard change pending; controller not connected");
            }
            Err(e) => warn!("clipboard sync failed: {e}"),
        }
    }
}
