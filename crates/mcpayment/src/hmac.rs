use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 over `message` using the shared secret.
/// Returns the lowercase hex-encoded MAC.
pub fn compute_hmac(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex-encoded HMAC-SHA256 signature over `message`.
///
/// Uses constant-time comparison. Malformed hex is replaced by a zero
/// buffer so the MAC comparison always runs.
pub fn verify_hmac(secret: &[u8], message: &[u8], signature: &str) -> bool {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(message);

    let expected = hex::decode(signature).unwrap_or_else(|_| vec![0u8; 32]);

    // verify_slice compares in constant time
    mac.verify_slice(&expected).is_ok()
}

/// Signature of an outbound request, sent in the `x-req-signature` header.
///
/// Covers method, path and body so a captured signature cannot be replayed
/// against another endpoint or with another payload.
pub fn sign_request(secret: &[u8], method: &str, path: &str, body: &[u8]) -> String {
    compute_hmac(secret, &request_message(method, path, body))
}

fn request_message(method: &str, path: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(method.len() + path.len() + body.len() + 2);
    message.extend_from_slice(method.as_bytes());
    message.push(b':');
    message.extend_from_slice(path.as_bytes());
    message.push(b':');
    message.extend_from_slice(body);
    message
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().fold(String::new(), |mut s, b| {
            use std::fmt::Write;
            let _ = write!(s, "{b:02x}");
            s
        })
    }

    pub fn decode(s: &str) -> Result<Vec<u8>, ()> {
        if s.len() % 2 != 0 || !s.is_ascii() {
            return Err(());
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
            .collect()
    }
}
