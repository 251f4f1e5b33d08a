//! Binary-safe textual transfer encoding.
//!
//! Course material bytes travel through JSON bodies as base64 strings. Two
//! forms exist: the *transport* form is bare base64 (what the courses service
//! stores and returns), and the *display* form prepends a self-describing
//! `data:<media-type>;base64,` prefix for inline rendering. The receiving
//! services only ever accept the bare form, so the prefix must be stripped
//! before a payload crosses the network.
//!
//! Decoding is strict: a payload with characters outside the alphabet or with
//! wrong padding fails, it is never truncated or repaired. No size cap is
//! enforced at this layer.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Errors that can occur handling transfer payloads.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The payload is not valid base64 (wrong alphabet or wrong padding).
    #[error("transfer payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    /// A display payload is missing the `data:...;base64,` prefix.
    #[error("display payload has no media-type prefix")]
    MissingPrefix,
}

/// Encode raw bytes into the bare transport form.
#[must_use]
pub fn encode_transport(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a bare transport payload back into bytes.
///
/// Handles payloads of arbitrary length; an empty payload decodes to an empty
/// buffer.
///
/// # Errors
///
/// Returns [`TransferError::Decode`] on malformed input. No partial buffer is
/// produced.
pub fn decode_transport(payload: &str) -> Result<Vec<u8>, TransferError> {
    Ok(STANDARD.decode(payload)?)
}

/// Encode raw bytes into the self-describing display form.
///
/// The result is a data URL: `data:<media_type>;base64,<bare payload>`.
#[must_use]
pub fn encode_display(bytes: &[u8], media_type: &str) -> String {
    format!("data:{media_type};base64,{}", encode_transport(bytes))
}

/// Split a display payload into its metadata prefix and bare payload.
///
/// The split point is the first comma: everything before it (the
/// `data:<media-type>;base64` declaration) is metadata, everything after it is
/// the bare transport payload. For any bytes `B`,
/// `split_display(&encode_display(B, mt))?.1 == encode_transport(B)`.
///
/// # Errors
///
/// Returns [`TransferError::MissingPrefix`] if the payload has no comma to
/// split on.
pub fn split_display(payload: &str) -> Result<(&str, &str), TransferError> {
    payload
        .split_once(',')
        .ok_or(TransferError::MissingPrefix)
}

/// Strip the metadata prefix from a display payload, yielding the bare form.
///
/// # Errors
///
/// Returns [`TransferError::MissingPrefix`] if the payload is not in display
/// form.
pub fn strip_display_prefix(payload: &str) -> Result<&str, TransferError> {
    split_display(payload).map(|(_, bare)| bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_roundtrip_exact() {
        let buffers: [&[u8]; 4] = [
            b"",
            b"\x00",
            &[0x00, 0xFF, 0x10],
            b"longer buffer with\x00embedded\xffbytes and text",
        ];
        for bytes in buffers {
            let payload = encode_transport(bytes);
            assert_eq!(
                decode_transport(&payload).expect("decode"),
                bytes,
                "roundtrip must be bit-exact for {bytes:?}"
            );
        }
    }

    #[test]
    fn test_empty_payload_decodes_to_empty_buffer() {
        assert_eq!(decode_transport("").expect("decode"), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_wrong_alphabet() {
        assert!(matches!(
            decode_transport("not!valid*base64"),
            Err(TransferError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_padding() {
        // "QQ" alone would need "==" padding in the standard engine.
        assert!(decode_transport("QQ=").is_err());
        assert!(decode_transport("Q===").is_err());
    }

    #[test]
    fn test_display_form_has_well_defined_split() {
        let bytes = [0x00, 0xFF, 0x10];
        let display = encode_display(&bytes, "image/png");
        let (meta, bare) = split_display(&display).expect("split");
        assert_eq!(meta, "data:image/png;base64");
        assert_eq!(bare, encode_transport(&bytes));
    }

    #[test]
    fn test_strip_prefix_matches_transport_form() {
        let bytes = b"course notes";
        let display = encode_display(bytes, "application/pdf");
        let bare = strip_display_prefix(&display).expect("strip");
        assert_eq!(bare, encode_transport(bytes));
        assert_eq!(decode_transport(bare).expect("decode"), bytes);
    }

    #[test]
    fn test_strip_prefix_rejects_bare_payload() {
        assert_eq!(
            strip_display_prefix("QUJD"),
            Err(TransferError::MissingPrefix)
        );
    }

    #[test]
    fn test_large_payload_no_truncation() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1 << 16).collect();
        let payload = encode_transport(&bytes);
        assert_eq!(decode_transport(&payload).expect("decode"), bytes);
    }
}
