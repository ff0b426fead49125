//! Inbound webhook callbacks and their signature check.
//!
//! The gateway signs each callback with
//! `hex(HMAC-SHA256(sign_key, register_id))` in the `signature_key` field.
//! Nothing in a callback should be trusted before [`validate_sign_key`]
//! returns `true`.

use serde::{Deserialize, Serialize};

use crate::hmac::{compute_hmac, verify_hmac};

/// Payload the gateway POSTs to a subscription's callback URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub register_id: String,
    pub signature_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charged_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Remaining webhook fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Signature the gateway attaches to callbacks for `register_id`.
pub fn expected_signature(sign_key: &[u8], register_id: &str) -> String {
    compute_hmac(sign_key, register_id.as_bytes())
}

/// True when the callback's `signature_key` matches the one derived from its
/// `register_id` and the shared secret.
///
/// Hex case is ignored. Malformed hex still goes through the MAC
/// comparison and fails there.
pub fn validate_sign_key(sign_key: &[u8], payload: &CallbackPayload) -> bool {
    verify_hmac(
        sign_key,
        payload.register_id.as_bytes(),
        &payload.signature_key,
    )
}

/// [`validate_sign_key`] over a raw webhook body. A body that does not parse
/// as a callback payload is `false`.
pub fn validate_sign_key_json(sign_key: &[u8], body: &[u8]) -> bool {
    verify_callback(sign_key, body).is_some()
}

/// Parse a raw callback body and return it only if its signature is valid.
pub fn verify_callback(sign_key: &[u8], body: &[u8]) -> Option<CallbackPayload> {
    let payload: CallbackPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, "callback body is not a valid payload");
            return None;
        }
    };

    if validate_sign_key(sign_key, &payload) {
        Some(payload)
    } else {
        tracing::warn!(register_id = %payload.register_id, "callback signature mismatch");
        None
    }
}
