//! Binary codec for encoding and decoding device messages.
//!
//! Wire format (all multi-byte integers big-endian):
//! ```text
//! message := discriminant(u8) payload
//! discriminant 0 (ClipboardSync):   length(u32) utf8_bytes[length]
//! discriminant 1 (ClipboardAck):    sequence(u64)
//! discriminant 2 (HidOutputReport): id(u16) length(u16) data_bytes[length]
//! ```
//!
//! The format is self-delimiting: every variant is either fixed-size or
//! length-prefixed, so a stream reader can pull arbitrarily chunked bytes
//! and still find message boundaries. [`decode_message`] reflects this by
//! returning `Ok(None)` ("need more bytes") for a proper prefix instead of
//! treating it as an error.

use thiserror::Error;
use tracing::warn;

use crate::protocol::messages::{
    DeviceMessage, DeviceMessageType, CLIPBOARD_TEXT_MAX_BYTES, HID_DATA_MAX_BYTES,
};

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The HID report payload exceeds the u16 wire length. Fatal to this one
    /// message only; nothing is written for it.
    #[error("HID output report too large: {len} bytes (max {max})")]
    HidReportTooLarge { len: usize, max: usize },

    /// The discriminant byte is not a known message type. The stream is
    /// desynchronised and cannot be recovered by skipping bytes.
    #[error("unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    /// The payload bytes cannot be interpreted (invalid UTF-8, or a declared
    /// length the encoder can never produce).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes a [`DeviceMessage`] into a freshly allocated byte vector holding
/// exactly one wire message.
///
/// Clipboard text longer than [`CLIPBOARD_TEXT_MAX_BYTES`] is truncated to
/// the largest UTF-8 character boundary below the cap and the truncated
/// length is what goes on the wire. This is deliberate best-effort policy: a
/// clipboard update is degraded rather than dropped. It is *not* an error.
///
/// # Errors
///
/// Returns [`ProtocolError::HidReportTooLarge`] for a HID report payload
/// over [`HID_DATA_MAX_BYTES`]; HID report sizes are hardware-defined, so an
/// oversize report is a caller bug and must not be silently shortened.
/// All other encodings are total.
///
/// # Examples
///
/// ```rust
/// use devlink_core::{encode_message, DeviceMessage};
///
/// let bytes = encode_message(&DeviceMessage::clipboard_ack(42)).unwrap();
/// assert_eq!(bytes, [0x01, 0, 0, 0, 0, 0, 0, 0, 0x2A]);
/// ```
pub fn encode_message(msg: &DeviceMessage) -> Result<Vec<u8>, ProtocolError> {
    match msg {
        DeviceMessage::ClipboardSync { text } => {
            let cut = utf8_truncation_index(text, CLIPBOARD_TEXT_MAX_BYTES);
            if cut < text.len() {
                warn!(
                    text_bytes = text.len(),
                    sent_bytes = cut,
                    "clipboard text exceeds wire capacity; truncating"
                );
            }
            let payload = &text.as_bytes()[..cut];
            let mut buf = Vec::with_capacity(1 + 4 + payload.len());
            buf.push(DeviceMessageType::ClipboardSync as u8);
            buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            buf.extend_from_slice(payload);
            Ok(buf)
        }
        DeviceMessage::ClipboardAck { sequence } => {
            let mut buf = Vec::with_capacity(1 + 8);
            buf.push(DeviceMessageType::ClipboardAck as u8);
            buf.extend_from_slice(&sequence.to_be_bytes());
            Ok(buf)
        }
        DeviceMessage::HidOutputReport { id, data } => {
            if data.len() > HID_DATA_MAX_BYTES {
                return Err(ProtocolError::HidReportTooLarge {
                    len: data.len(),
                    max: HID_DATA_MAX_BYTES,
                });
            }
            let mut buf = Vec::with_capacity(1 + 2 + 2 + data.len());
            buf.push(DeviceMessageType::HidOutputReport as u8);
            buf.extend_from_slice(&id.to_be_bytes());
            buf.extend_from_slice(&(data.len() as u16).to_be_bytes());
            buf.extend_from_slice(data);
            Ok(buf)
        }
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes one [`DeviceMessage`] from the beginning of `bytes`.
///
/// Returns the decoded message and the number of bytes it occupied so the
/// caller can advance their read cursor. Returns `Ok(None)` when `bytes` is
/// a proper prefix of a message; nothing is consumed and the caller should
/// retry once more bytes have arrived.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownMessageType`] for a discriminant outside
/// the known set, and [`ProtocolError::MalformedPayload`] for clipboard
/// payloads that are not valid UTF-8 or declare a length above
/// [`CLIPBOARD_TEXT_MAX_BYTES`].
pub fn decode_message(bytes: &[u8]) -> Result<Option<(DeviceMessage, usize)>, ProtocolError> {
    let Some(&tag) = bytes.first() else {
        return Ok(None);
    };
    let msg_type =
        DeviceMessageType::try_from(tag).map_err(|_| ProtocolError::UnknownMessageType(tag))?;

    match msg_type {
        DeviceMessageType::ClipboardSync => {
            if bytes.len() < 5 {
                return Ok(None);
            }
            let len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
            if len > CLIPBOARD_TEXT_MAX_BYTES {
                return Err(ProtocolError::MalformedPayload(format!(
                    "clipboard length {len} exceeds maximum {CLIPBOARD_TEXT_MAX_BYTES}"
                )));
            }
            let total = 5 + len;
            if bytes.len() < total {
                return Ok(None);
            }
            let text = std::str::from_utf8(&bytes[5..total])
                .map_err(|e| {
                    ProtocolError::MalformedPayload(format!("clipboard text is not UTF-8: {e}"))
                })?
                .to_string();
            Ok(Some((DeviceMessage::ClipboardSync { text }, total)))
        }
        DeviceMessageType::ClipboardAck => {
            if bytes.len() < 9 {
                return Ok(None);
            }
            let sequence = u64::from_be_bytes([
                bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7], bytes[8],
            ]);
            Ok(Some((DeviceMessage::ClipboardAck { sequence }, 9)))
        }
        DeviceMessageType::HidOutputReport => {
            if bytes.len() < 5 {
                return Ok(None);
            }
            let id = u16::from_be_bytes([bytes[1], bytes[2]]);
            let len = u16::from_be_bytes([bytes[3], bytes[4]]) as usize;
            let total = 5 + len;
            if bytes.len() < total {
                return Ok(None);
            }
            let data = bytes[5..total].to_vec();
            Ok(Some((DeviceMessage::HidOutputReport { id, data }, total)))
        }
    }
}

/// Returns the largest index `<= max_bytes` that falls on a UTF-8 character
/// boundary of `text`, so a truncated payload is still valid UTF-8.
fn utf8_truncation_index(text: &str, max_bytes: usize) -> usize {
    if text.len() <= max_bytes {
        return text.len();
    }
    let mut idx = max_bytes;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

// ── Stream decoding ───────────────────────────────────────────────────────────

/// Reassembles [`DeviceMessage`]s from arbitrarily chunked stream input.
///
/// Bytes arrive via [`push`](StreamDecoder::push) in whatever pieces the
/// transport delivers them; [`try_next`](StreamDecoder::try_next) drains one
/// complete message at a time. Feeding a stream one byte at a time yields
/// exactly the same messages as feeding it all at once.
///
/// A decode error is terminal for the stream: the buffer contents no longer
/// line up with a message boundary and the connection must be torn down.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buf: Vec<u8>,
}

impl StreamDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of stream bytes to the internal buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Decodes and removes the next complete message from the buffer, or
    /// returns `Ok(None)` if more bytes are needed.
    ///
    /// # Errors
    ///
    /// Propagates [`ProtocolError`] from [`decode_message`]; the buffered
    /// bytes are left untouched in that case.
    pub fn try_next(&mut self) -> Result<Option<DeviceMessage>, ProtocolError> {
        match decode_message(&self.buf)? {
            Some((msg, consumed)) => {
                self.buf.drain(..consumed);
                Ok(Some(msg))
            }
            None => Ok(None),
        }
    }

    /// Number of bytes currently buffered and not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
