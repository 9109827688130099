//! Device-to-controller message types.
//!
//! Every event the device reports travels as one [`DeviceMessage`], tagged on
//! the wire by a single discriminant byte. The enum carries exactly the
//! fields that belong to each variant; a field that is meaningless for a
//! variant simply does not exist on it.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Protocol constants ────────────────────────────────────────────────────────

/// Ceiling for one encoded message on the wire, in bytes.
pub const MESSAGE_MAX_SIZE: usize = 1 << 18;

/// Largest clipboard text payload that fits in one message: the message
/// ceiling minus the discriminant byte and the u32 length prefix.
pub const CLIPBOARD_TEXT_MAX_BYTES: usize = MESSAGE_MAX_SIZE - 5;

/// Largest HID output report payload. Reports carry a u16 length on the wire
/// and real HID devices define report sizes far below this.
pub const HID_DATA_MAX_BYTES: usize = u16::MAX as usize;

// ── Message type codes ────────────────────────────────────────────────────────

/// Discriminant byte identifying which message variant follows on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceMessageType {
    ClipboardSync = 0,
    ClipboardAck = 1,
    HidOutputReport = 2,
}

impl TryFrom<u8> for DeviceMessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(DeviceMessageType::ClipboardSync),
            1 => Ok(DeviceMessageType::ClipboardAck),
            2 => Ok(DeviceMessageType::HidOutputReport),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DeviceMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Top-level message enum ────────────────────────────────────────────────────

/// All events the device reports to the controller, discriminated by type.
///
/// Instances are write-once: built by one of the named constructors,
/// encoded, and discarded. There is no mutation after construction, so a
/// message can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceMessage {
    /// The device clipboard changed; carries the full new text.
    ClipboardSync { text: String },
    /// A controller "set clipboard" request identified by `sequence` has
    /// been applied. The sequence number is minted by the controller and
    /// only echoed back here.
    ClipboardAck { sequence: u64 },
    /// Raw output report produced by the emulated HID device `id`. The
    /// payload is opaque and passed through verbatim.
    HidOutputReport { id: u16, data: Vec<u8> },
}

impl DeviceMessage {
    /// Builds a clipboard sync message. Any text is accepted, including
    /// empty; oversized payloads are handled by the encoder, not here.
    pub fn clipboard_sync(text: impl Into<String>) -> Self {
        DeviceMessage::ClipboardSync { text: text.into() }
    }

    /// Builds an acknowledgement for the controller set-request `sequence`.
    pub fn clipboard_ack(sequence: u64) -> Self {
        DeviceMessage::ClipboardAck { sequence }
    }

    /// Builds an output-report message for HID device `id`, taking ownership
    /// of the report bytes. A zero-length report is valid.
    pub fn hid_output_report(id: u16, data: Vec<u8>) -> Self {
        DeviceMessage::HidOutputReport { id, data }
    }

    /// Returns the [`DeviceMessageType`] discriminant for this message.
    pub fn message_type(&self) -> DeviceMessageType {
        match self {
            DeviceMessage::ClipboardSync { .. } => DeviceMessageType::ClipboardSync,
            DeviceMessage::ClipboardAck { .. } => DeviceMessageType::ClipboardAck,
            DeviceMessage::HidOutputReport { .. } => DeviceMessageType::HidOutputReport,
        }
    }
}

/// Human-readable rendering for logs and diagnostics. Has no effect on the
/// wire bytes; HID payloads are summarised by length rather than dumped.
impl fmt::Display for DeviceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceMessage::ClipboardSync { text } => {
                write!(f, "ClipboardSync(text={text:?})")
            }
            DeviceMessage::ClipboardAck { sequence } => {
                write!(f, "ClipboardAck(sequence={sequence})")
            }
            DeviceMessage::HidOutputReport { id, data } => {
                write!(f, "HidOutputReport(id={id}, {} bytes)", data.len())
            }
        }
    }
}
