//! Session token codec.
//!
//! Tokens are the compact three-segment `header.payload.signature` form,
//! base64url-unpadded, signed with HMAC-SHA256 over `header.payload`.
//!
//! Two decode paths exist on purpose:
//! - [`decode_unverified`] parses the claims without touching the signature
//!   segment or any secret. This is what the profile endpoint trusts, which
//!   makes the role claim forgeable by anyone holding a token.
//! - [`decode_verified`] is the correct HMAC-checking counterpart, kept for
//!   contrast and used only in tests.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl SessionTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by a session token.
///
/// `username` and `role` are typed fields but an absent claim decodes to the
/// empty string rather than failing the payload: a token is rejected only
/// when its payload is not a claims object at all. Anything else a token
/// carries is kept in the open `extra` map so foreign claims survive a
/// decode/encode cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionClaims {
    #[must_use]
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            iat: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("invalid secret")]
    Secret,
    #[error("invalid signature")]
    InvalidSignature,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn mac(secret: &str, signing_input: &str) -> Result<HmacSha256, Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| Error::Secret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Create an HS256 signed session token.
///
/// No expiry claim is added; the claims are serialized exactly as given.
///
/// # Errors
///
/// Returns an error if the claims or header cannot be encoded as JSON.
pub fn encode(claims: &SessionClaims, secret: &str) -> Result<String, Error> {
    let header_b64 = b64e_json(&SessionTokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let signature = mac(secret, &signing_input)?.finalize().into_bytes();
    let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Parse a session token's claims without checking its signature.
///
/// Only the shape is validated: exactly three dot-separated segments, with a
/// payload segment that base64url-decodes to a claims object. The header and
/// signature segments are not inspected at all and no secret is consulted, so
/// a token whose payload was rewritten after issuance decodes just as well as
/// a genuine one.
#[must_use]
pub fn decode_unverified(token: &str) -> Option<SessionClaims> {
    let mut parts = token.split('.');
    let _header_b64 = parts.next()?;
    let claims_b64 = parts.next()?;
    let _sig_b64 = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    b64d_json(claims_b64).ok()
}

/// Verify an HS256 session token and return its decoded claims.
///
/// # Errors
///
/// Returns an error if the token is malformed, contains invalid base64/json,
/// or its signature does not match the HMAC recomputed with `secret`.
pub fn decode_verified(token: &str, secret: &str) -> Result<SessionClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let sig_b64 = parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() {
        return Err(Error::TokenFormat);
    }

    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature_bytes = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Base64)?;
    mac(secret, &signing_input)?
        .verify_slice(&signature_bytes)
        .map_err(|_| Error::InvalidSignature)?;

    b64d_json(claims_b64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "secret123";

    fn forge_role(token: &str, role: &str) -> String {
        // Rewrite the payload segment, keep the original (now stale) signature.
        let parts: Vec<&str> = token.split('.').collect();
        let payload = Base64UrlUnpadded::decode_vec(parts[1]).unwrap();
        let mut claims: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        claims["role"] = json!(role);
        let forged = Base64UrlUnpadded::encode_string(&serde_json::to_vec(&claims).unwrap());
        format!("{}.{}.{}", parts[0], forged, parts[2])
    }

    #[test]
    fn test_round_trip_without_secret() {
        let claims = SessionClaims::new("alice", "user");
        let token = encode(&claims, SECRET).unwrap();

        // No secret involved on the decode side.
        let decoded = decode_unverified(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_verified_round_trip() {
        let mut claims = SessionClaims::new("alice", "user");
        claims.iat = Some(1_700_000_000);
        let token = encode(&claims, SECRET).unwrap();

        let decoded = decode_verified(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_forged_payload_still_decodes_unverified() {
        let token = encode(&SessionClaims::new("mallory", "user"), SECRET).unwrap();
        let forged = forge_role(&token, "admin");

        let decoded = decode_unverified(&forged).unwrap();
        assert_eq!(decoded.username, "mallory");
        assert_eq!(decoded.role, "admin");
    }

    #[test]
    fn test_forged_payload_rejected_by_verified_decode() {
        let token = encode(&SessionClaims::new("mallory", "user"), SECRET).unwrap();
        let forged = forge_role(&token, "admin");

        assert!(matches!(
            decode_verified(&forged, SECRET),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected_by_verified_decode() {
        let token = encode(&SessionClaims::new("alice", "user"), SECRET).unwrap();

        assert!(matches!(
            decode_verified(&token, "not-the-secret"),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn test_unverified_ignores_header_and_signature_segments() {
        let token = encode(&SessionClaims::new("alice", "user"), SECRET).unwrap();
        let payload = token.split('.').nth(1).unwrap();

        // Garbage header and signature, intact payload.
        let mangled = format!("!!!not-base64!!!.{payload}.???");
        let decoded = decode_unverified(&mangled).unwrap();
        assert_eq!(decoded.username, "alice");
    }

    #[test]
    fn test_unverified_rejects_wrong_segment_count() {
        assert!(decode_unverified("only.two").is_none());
        assert!(decode_unverified("one.two.three.four").is_none());
        assert!(decode_unverified("").is_none());
    }

    #[test]
    fn test_unverified_rejects_undecodable_payload() {
        let garbled = "eyJhbGciOiJIUzI1NiJ9.!!garbage!!.sig";
        assert!(decode_unverified(garbled).is_none());

        // Valid base64, but not a claims object.
        let not_json = Base64UrlUnpadded::encode_string(b"plain text");
        assert!(decode_unverified(&format!("h.{not_json}.s")).is_none());
    }

    #[test]
    fn test_absent_claims_decode_to_empty_strings() {
        // A claims object is enough; missing username/role fields degrade to
        // empty strings instead of failing the decode.
        let payload = Base64UrlUnpadded::encode_string(br#"{"username":"alice"}"#);
        let decoded = decode_unverified(&format!("h.{payload}.s")).unwrap();
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.role, "");

        let empty = Base64UrlUnpadded::encode_string(b"{}");
        let decoded = decode_unverified(&format!("h.{empty}.s")).unwrap();
        assert_eq!(decoded.username, "");
        assert_eq!(decoded.role, "");
    }

    #[test]
    fn test_extra_claims_survive_round_trip() {
        let mut claims = SessionClaims::new("alice", "user");
        claims
            .extra
            .insert("team".to_string(), json!("platform"));
        let token = encode(&claims, SECRET).unwrap();

        let decoded = decode_unverified(&token).unwrap();
        assert_eq!(decoded.extra["team"], json!("platform"));
    }
}
