//! Signed token codec.
//!
//! Token layout: `base64(json) "." base64(hmac_sha256(secret, base64(json)))`,
//! both parts using the standard padded alphabet. The codec does not look at
//! expiry; callers compare the payload's `exp` themselves.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Separator between the payload and signature parts.
const SEPARATOR: char = '.';

/// Token signing errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("payload encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid signing key")]
    InvalidKey,
}

fn mac_for(secret: &[u8], encoded_payload: &str) -> Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::InvalidKey)?;
    mac.update(encoded_payload.as_bytes());
    Ok(mac)
}

/// Serialize `payload` and sign it with `secret`.
pub fn sign<T: Serialize>(payload: &T, secret: &[u8]) -> Result<String, TokenError> {
    let json = serde_json::to_vec(payload)?;
    let encoded = STANDARD.encode(json);
    let signature = mac_for(secret, &encoded)?.finalize().into_bytes();
    Ok(format!("{encoded}{SEPARATOR}{}", STANDARD.encode(signature)))
}

/// Verify `token` against `secret` and decode its payload.
///
/// Returns `None` for a missing part, bad base64, signature mismatch or a
/// payload that does not decode as `T`.
pub fn verify<T: DeserializeOwned>(token: &str, secret: &[u8]) -> Option<T> {
    let (encoded, signature) = token.split_once(SEPARATOR)?;
    if encoded.is_empty() || signature.is_empty() {
        return None;
    }
    let signature = STANDARD.decode(signature).ok()?;
    mac_for(secret, encoded)
        .ok()?
        .verify_slice(&signature)
        .ok()?;
    let json = STANDARD.decode(encoded).ok()?;
    serde_json::from_slice(&json).ok()
}
