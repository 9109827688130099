//! Emulated-HID infrastructure: the stream of output reports and the loop
//! that forwards them to the controller.
//!
//! The kernel-side emulated device layer owns the [`mpsc::Sender`] and
//! pushes an [`OutputReportEvent`] whenever a device produces an output
//! report (keyboard LED state, force feedback, and so on). This module only
//! consumes the stream; creating and feeding the emulated devices is that
//! layer's business.

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::application::channel::ChannelError;
use crate::application::forward_hid::ForwardHidOutputUseCase;

/// One output report produced by an emulated HID device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReportEvent {
    /// Identifier of the emulated device that produced the report.
    pub id: u16,
    /// Raw report bytes, passed through verbatim.
    pub data: Vec<u8>,
}

/// Returns a receiver that replays `reports` and then closes, standing in
/// for a live emulated-device layer in tests and demo wiring.
pub fn scripted_report_stream(
    reports: Vec<OutputReportEvent>,
) -> mpsc::Receiver<OutputReportEvent> {
    let (tx, rx) = mpsc::channel(reports.len().max(1));
    tokio::spawn(async move {
        for report in reports {
            if tx.send(report).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// Forwards every report from `rx` until the sending side closes.
///
/// An oversize report is logged and dropped; the stream and all later
/// reports continue. A report that cannot be sent because the controller is
/// not connected is dropped quietly: unlike clipboard text, a stale HID
/// report is worthless to a controller that reconnects later.
pub async fn forward_reports(
    mut rx: mpsc::Receiver<OutputReportEvent>,
    use_case: ForwardHidOutputUseCase,
) {
    while let Some(report) = rx.recv().await {
        match use_case.handle_report(report.id, report.data).await {
            Ok(()) => {}
            Err(ChannelError::Encode(e)) => error!("dropping HID output report: {e}"),
            Err(ChannelError::NotConnected) => {
                debug!("HID output report dropped; controller not connected");
            }
            Err(e) => warn!("failed to forward HID output report: {e}"),
        }
    }
}
