//! Decoding and sanity checks for the base64 payload carried in a request.

use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::{Engine, alphabet};

use crate::ParseError;

/// Leading bytes of every PDF file.
pub const PDF_SIGNATURE: &[u8; 4] = b"%PDF";

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 payload into raw bytes, ignoring ASCII whitespace.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, ParseError> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    LENIENT
        .decode(&compact)
        .map_err(|e| ParseError::ExtractionFailure(format!("invalid base64 payload: {e}")))
}

/// Verify that `bytes` starts with the `%PDF` signature.
pub fn check_signature(bytes: &[u8]) -> Result<(), ParseError> {
    if bytes.starts_with(PDF_SIGNATURE) {
        Ok(())
    } else {
        Err(ParseError::ExtractionFailure(
            "payload is not a PDF document (missing %PDF signature)".to_string(),
        ))
    }
}
