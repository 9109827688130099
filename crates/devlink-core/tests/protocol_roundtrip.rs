//! Integration tests for the devlink-core codec.
//!
//! These tests exercise the message model and codec together through the
//! public API: round trips for every variant, the exact wire bytes a
//! compatible peer expects, the clipboard truncation policy, HID oversize
//! rejection, and stream reassembly from chunked input.

use devlink_core::{
    decode_message, encode_message,
    protocol::messages::{CLIPBOARD_TEXT_MAX_BYTES, HID_DATA_MAX_BYTES},
    DeviceMessage, ProtocolError, StreamDecoder,
};

/// Encodes a message and then decodes it, asserting that the decoded message
/// matches the original and every byte was consumed.
fn roundtrip(msg: DeviceMessage) -> DeviceMessage {
    let bytes = encode_message(&msg).expect("encode must succeed");
    let (decoded, consumed) = decode_message(&bytes)
        .expect("decode must succeed")
        .expect("encoded message must be complete");
    assert_eq!(consumed, bytes.len(), "all bytes must be consumed");
    decoded
}

#[test]
fn test_roundtrip_clipboard_sync() {
    let original = DeviceMessage::clipboard_sync("integration-test clipboard contents");
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_clipboard_sync_empty_text() {
    let original = DeviceMessage::clipboard_sync("");
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_clipboard_sync_multibyte_text() {
    let original = DeviceMessage::clipboard_sync("日本語テキスト и кириллица");
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_clipboard_ack() {
    let original = DeviceMessage::clipboard_ack(0x0123_4567_89AB_CDEF);
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_hid_output_report() {
    let original = DeviceMessage::hid_output_report(42, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_hid_output_report_zero_length() {
    let original = DeviceMessage::hid_output_report(0, vec![]);
    assert_eq!(original, roundtrip(original.clone()));
}

// ── Wire compatibility ────────────────────────────────────────────────────────

#[test]
fn test_clipboard_ack_wire_bytes() {
    // 1-byte tag + 8-byte big-endian sequence.
    let bytes = encode_message(&DeviceMessage::clipboard_ack(42)).unwrap();
    assert_eq!(bytes, [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A]);
}

#[test]
fn test_empty_hid_report_wire_bytes() {
    // tag, id=7, length=0, no data bytes.
    let bytes = encode_message(&DeviceMessage::hid_output_report(7, vec![])).unwrap();
    assert_eq!(bytes, [0x02, 0x00, 0x07, 0x00, 0x00]);
}

#[test]
fn test_clipboard_sync_wire_bytes() {
    let bytes = encode_message(&DeviceMessage::clipboard_sync("ok")).unwrap();
    assert_eq!(bytes, [0x00, 0x00, 0x00, 0x00, 0x02, b'o', b'k']);
}

// ── Policy boundaries ─────────────────────────────────────────────────────────

#[test]
fn test_truncated_clipboard_length_prefix_matches_payload_exactly() {
    let original = DeviceMessage::clipboard_sync("z".repeat(CLIPBOARD_TEXT_MAX_BYTES * 2));
    let bytes = encode_message(&original).unwrap();

    let prefix = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
    assert_eq!(prefix, CLIPBOARD_TEXT_MAX_BYTES);
    assert_eq!(bytes.len(), 5 + prefix);

    let (decoded, _) = decode_message(&bytes).unwrap().unwrap();
    let DeviceMessage::ClipboardSync { text } = decoded else {
        panic!("wrong variant");
    };
    assert_eq!(text.len(), CLIPBOARD_TEXT_MAX_BYTES);
}

#[test]
fn test_oversize_hid_report_writes_nothing() {
    let original = DeviceMessage::hid_output_report(1, vec![0; HID_DATA_MAX_BYTES + 1]);
    let result = encode_message(&original);
    assert!(matches!(
        result,
        Err(ProtocolError::HidReportTooLarge { .. })
    ));
}

#[test]
fn test_unknown_discriminant_is_rejected_without_panicking() {
    for tag in 3u8..=255 {
        let result = decode_message(&[tag, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(result, Err(ProtocolError::UnknownMessageType(tag)));
    }
}

// ── Streaming ─────────────────────────────────────────────────────────────────

#[test]
fn test_byte_at_a_time_stream_equals_single_buffer_decode() {
    let messages = vec![
        DeviceMessage::clipboard_sync("first"),
        DeviceMessage::clipboard_ack(7),
        DeviceMessage::hid_output_report(2, vec![0x10, 0x20, 0x30]),
        DeviceMessage::clipboard_sync(""),
        DeviceMessage::hid_output_report(9, vec![]),
    ];

    let mut wire = Vec::new();
    for msg in &messages {
        wire.extend(encode_message(msg).unwrap());
    }

    // Whole-buffer decode.
    let mut at_once = Vec::new();
    let mut rest = wire.as_slice();
    while let Some((msg, consumed)) = decode_message(rest).unwrap() {
        at_once.push(msg);
        rest = &rest[consumed..];
    }

    // One byte at a time through the stream decoder.
    let mut decoder = StreamDecoder::new();
    let mut dripped = Vec::new();
    for byte in &wire {
        decoder.push(std::slice::from_ref(byte));
        while let Some(msg) = decoder.try_next().unwrap() {
            dripped.push(msg);
        }
    }

    assert_eq!(at_once, messages);
    assert_eq!(dripped, messages);
    assert_eq!(decoder.buffered(), 0, "no stray bytes may remain");
}

#[test]
fn test_stream_decoder_recovers_messages_split_across_chunks() {
    let a = encode_message(&DeviceMessage::clipboard_sync("split across chunks")).unwrap();
    let b = encode_message(&DeviceMessage::clipboard_ack(99)).unwrap();

    // One chunk ending mid-message, the next carrying the remainder.
    let mut wire = a.clone();
    wire.extend(&b);
    let (chunk1, chunk2) = wire.split_at(a.len() + 3);

    let mut decoder = StreamDecoder::new();
    decoder.push(chunk1);
    assert_eq!(
        decoder.try_next().unwrap(),
        Some(DeviceMessage::clipboard_sync("split across chunks"))
    );
    assert_eq!(decoder.try_next().unwrap(), None);

    decoder.push(chunk2);
    assert_eq!(
        decoder.try_next().unwrap(),
        Some(DeviceMessage::clipboard_ack(99))
    );
}
