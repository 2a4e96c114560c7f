//! Field canonicalization and keyed digest shared with the WalletOne gateway.
//!
//! The gateway recomputes the same bytes on its side, so every step here is
//! part of the wire contract: key order, list order, the Windows-1251
//! transliteration and the percent-decoding that follows it.

use std::cmp::Ordering;

use base64::Engine;
use common_utils::{
    crypto::{self, GenerateDigest, VerifySignature},
    CustomResult,
};
use domain_types::{
    errors::{SignatureError, WalletOneError},
    types::{FieldMap, FieldValue, OrderState, SignatureAlgorithm},
};
use encoding_rs::{EncoderResult, WINDOWS_1251};
use interfaces::verification::SourceVerification;
use secrecy::{ExposeSecret, SecretString};

use super::constants;

/// Serializes `fields` into the byte string the signature covers, without
/// the trailing secret.
pub fn canonicalize(fields: &FieldMap) -> Vec<u8> {
    let mut entries: Vec<(&String, &FieldValue)> = fields
        .iter()
        .filter(|(name, _)| name.as_str() != constants::WMI_SIGNATURE)
        .collect();
    // Keys equal up to case keep the map's byte order, not arrival order.
    entries.sort_by(|(left, _), (right, _)| compare_ignore_ascii_case(left, right));

    let mut message = Vec::new();
    for (name, value) in entries {
        let mut values: Vec<&String> = value.values().collect();
        values.sort_by(|left, right| compare_ignore_ascii_case(left, right));
        for item in values {
            message.extend(encode_value(name, item));
        }
    }
    message
}

/// Computes the base64 signature the gateway expects in `WMI_SIGNATURE`
pub fn generate_signature(
    fields: &FieldMap,
    secret: &SecretString,
    algorithm: SignatureAlgorithm,
) -> String {
    let message = signed_message(fields, secret.expose_secret().as_bytes());
    encode_digest(algorithm, &message)
}

/// Checks an inbound notification: the signature must match and the order
/// must be accepted. Tampering and declines surface as different errors.
pub fn verify_signature(
    fields: &FieldMap,
    secret: Option<&SecretString>,
    algorithm: Option<&str>,
) -> CustomResult<bool, WalletOneError> {
    verify_with(&NotificationVerifier { secret, algorithm }, fields)
}

pub(super) fn verify_with(
    verifier: &impl SourceVerification,
    fields: &FieldMap,
) -> CustomResult<bool, WalletOneError> {
    if fields.is_empty() {
        return Err(WalletOneError::Signature(SignatureError::EmptyPayload).into());
    }

    if !verifier.verify(fields)? {
        return Err(WalletOneError::Signature(SignatureError::SignatureMismatch).into());
    }

    check_order_state(fields)?;
    Ok(true)
}

pub(super) fn extract_signature(payload: &FieldMap) -> CustomResult<Vec<u8>, WalletOneError> {
    payload
        .get_scalar(constants::WMI_SIGNATURE)
        .map(|signature| signature.as_bytes().to_vec())
        .ok_or(WalletOneError::Signature(SignatureError::SignatureNotFound).into())
}

pub(super) fn signed_message(payload: &FieldMap, secret: &[u8]) -> Vec<u8> {
    let mut message = canonicalize(payload);
    message.extend_from_slice(secret);
    message
}

fn check_order_state(fields: &FieldMap) -> CustomResult<(), WalletOneError> {
    match fields
        .get_scalar(constants::WMI_ORDER_STATE)
        .map(OrderState::parse)
    {
        Some(OrderState::Accepted) => Ok(()),
        Some(OrderState::Other(state)) => Err(WalletOneError::PaymentRejected { state })?,
        None => Err(WalletOneError::PaymentRejected {
            state: constants::UNKNOWN_ORDER_STATE.to_string(),
        })?,
    }
}

struct NotificationVerifier<'a> {
    secret: Option<&'a SecretString>,
    algorithm: Option<&'a str>,
}

impl SourceVerification for NotificationVerifier<'_> {
    fn get_secrets(&self) -> CustomResult<Vec<u8>, WalletOneError> {
        match self.secret.map(|secret| secret.expose_secret().as_bytes()) {
            Some(secret) if !secret.is_empty() => Ok(secret.to_vec()),
            _ => Err(WalletOneError::Signature(SignatureError::NotConfigured))?,
        }
    }

    fn get_algorithm(
        &self,
    ) -> CustomResult<Box<dyn crypto::VerifySignature + Send>, WalletOneError> {
        let algorithm =
            SignatureAlgorithm::from_selector(self.algorithm).map_err(WalletOneError::from)?;
        Ok(Box::new(Base64Digest(algorithm)))
    }

    fn get_signature(&self, payload: &FieldMap) -> CustomResult<Vec<u8>, WalletOneError> {
        extract_signature(payload)
    }

    fn get_message(
        &self,
        payload: &FieldMap,
        secrets: &[u8],
    ) -> CustomResult<Vec<u8>, WalletOneError> {
        Ok(signed_message(payload, secrets))
    }
}

/// Digest rendered as standard padded base64, compared verbatim
#[derive(Debug, Clone, Copy)]
pub struct Base64Digest(pub SignatureAlgorithm);

impl VerifySignature for Base64Digest {
    fn verify_signature(
        &self,
        _secret: &[u8],
        signature: &[u8],
        msg: &[u8],
    ) -> bool {
        encode_digest(self.0, msg).as_bytes() == signature
    }
}

fn encode_digest(algorithm: SignatureAlgorithm, message: &[u8]) -> String {
    let digest = match algorithm {
        SignatureAlgorithm::Sha1 => crypto::Sha1.generate_digest(message),
        SignatureAlgorithm::Md5 => crypto::Md5.generate_digest(message),
    };
    base64::engine::general_purpose::STANDARD.encode(digest)
}

/// Byte-wise ordering after ASCII lowercasing; a shorter prefix sorts first
fn compare_ignore_ascii_case(left: &str, right: &str) -> Ordering {
    left.bytes()
        .map(|byte| byte.to_ascii_lowercase())
        .cmp(right.bytes().map(|byte| byte.to_ascii_lowercase()))
}

fn encode_value(field: &str, value: &str) -> Vec<u8> {
    match to_windows_1251(value) {
        Some(legacy) => url_decode(&legacy),
        None => {
            // The gateway's converter rejects the whole value in this case.
            tracing::warn!(
                field,
                "value is not representable in windows-1251, signing it as empty"
            );
            Vec::new()
        }
    }
}

/// Code point the WHATWG table maps to 0x98 although the codepage leaves
/// that byte undefined.
const UNDEFINED_IN_CP1251: char = '\u{0098}';

fn to_windows_1251(value: &str) -> Option<Vec<u8>> {
    if value.contains(UNDEFINED_IN_CP1251) {
        return None;
    }
    let mut encoder = WINDOWS_1251.new_encoder();
    let capacity = encoder.max_buffer_length_from_utf8_without_replacement(value.len())?;
    let mut buffer = Vec::with_capacity(capacity);
    let (result, _read) =
        encoder.encode_from_utf8_to_vec_without_replacement(value, &mut buffer, true);
    match result {
        EncoderResult::InputEmpty => Some(buffer),
        EncoderResult::OutputFull | EncoderResult::Unmappable(_) => None,
    }
}

/// Form-style decoding over raw bytes: `+` is a space and malformed escapes
/// are kept as-is.
fn url_decode(bytes: &[u8]) -> Vec<u8> {
    let unplussed: Vec<u8> = bytes
        .iter()
        .map(|&byte| if byte == b'+' { b' ' } else { byte })
        .collect();
    percent_encoding::percent_decode(&unplussed).collect()
}

#[cfg(test)]
mod signature_tests {
    use super::*;

    #[test]
    fn keys_sort_case_insensitively() {
        let fields = FieldMap::new()
            .with("b", "2")
            .with("A", "1")
            .with("c", "3");
        assert_eq!(canonicalize(&fields), b"123".to_vec());
    }

    #[test]
    fn shorter_key_prefix_sorts_first() {
        let fields = FieldMap::new().with("WMI_AB", "2").with("WMI_A", "1");
        assert_eq!(canonicalize(&fields), b"12".to_vec());
    }

    #[test]
    fn signature_field_is_excluded() {
        let fields = FieldMap::new()
            .with("WMI_PAYMENT_NO", "1")
            .with(constants::WMI_SIGNATURE, "abc");
        assert_eq!(canonicalize(&fields), b"1".to_vec());
    }

    #[test]
    fn list_values_are_sorted() {
        let fields = FieldMap::new().with("WMI_PTENABLED", vec!["c", "B", "a"]);
        assert_eq!(canonicalize(&fields), b"aBc".to_vec());
    }

    #[test]
    fn cyrillic_is_transliterated() {
        let fields = FieldMap::new().with("WMI_DESCRIPTION", "Заказ");
        assert_eq!(
            canonicalize(&fields),
            vec![0xC7, 0xE0, 0xEA, 0xE0, 0xE7]
        );
    }

    #[test]
    fn unmappable_value_contributes_nothing() {
        let fields = FieldMap::new().with("A", "x😀").with("B", "y");
        assert_eq!(canonicalize(&fields), b"y".to_vec());
    }

    #[test]
    fn undefined_codepage_slot_contributes_nothing() {
        let fields = FieldMap::new().with("A", "x\u{0098}").with("B", "y");
        assert_eq!(canonicalize(&fields), b"y".to_vec());
    }

    #[test]
    fn percent_escapes_are_decoded_after_transliteration() {
        let fields = FieldMap::new().with("A", "a+b%2Bc%2F");
        assert_eq!(canonicalize(&fields), b"a b+c/".to_vec());

        // decoded bytes are kept raw, never re-encoded
        let fields = FieldMap::new().with("A", "%D0%9F");
        assert_eq!(canonicalize(&fields), vec![0xD0, 0x9F]);
    }

    #[test]
    fn malformed_escape_is_kept() {
        let fields = FieldMap::new().with("A", "100%");
        assert_eq!(canonicalize(&fields), b"100%".to_vec());
    }

    #[test]
    fn compare_matches_strcasecmp_order() {
        assert_eq!(compare_ignore_ascii_case("abc", "ABD"), Ordering::Less);
        assert_eq!(compare_ignore_ascii_case("ABC", "abc"), Ordering::Equal);
        assert_eq!(compare_ignore_ascii_case("_", "a"), Ordering::Less);
        assert_eq!(compare_ignore_ascii_case("Z", "_"), Ordering::Greater);
    }
}
