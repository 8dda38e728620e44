//! Access decision for the protected profile resource.
//!
//! The decision trusts the token's claims as decoded, without signature
//! verification; see [`crate::token::decode_unverified`]. A structurally
//! valid token with a forged payload and a stale signature is therefore
//! indistinguishable from a genuine one here. That asserted trust is the
//! challenge this service exists to host.

use crate::token;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("invalid token")]
    InvalidToken,
}

/// What the profile endpoint returns, derived per request from the claims.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProfileResponse {
    Privileged {
        username: String,
        role: String,
        flag: String,
    },
    Denied {
        username: String,
        role: String,
        message: String,
    },
}

pub const ADMIN_ROLE: &str = "admin";
pub const DENIED_MESSAGE: &str = "Access Denied: Admins Only";

/// Decide what the holder of `token` may see.
///
/// `Unauthenticated` when no token is presented, `InvalidToken` when the
/// token does not decode. A decodable token is trusted as-is: any claims
/// with `role == "admin"` unlock the flag, everything else gets the denial
/// message. A wrong signature is never an error at this layer.
///
/// # Errors
///
/// Returns [`Error::Unauthenticated`] or [`Error::InvalidToken`] as above.
pub fn evaluate(token: Option<&str>, flag: &str) -> Result<ProfileResponse, Error> {
    let token = token.ok_or(Error::Unauthenticated)?;

    let claims = token::decode_unverified(token).ok_or(Error::InvalidToken)?;

    if claims.role == ADMIN_ROLE {
        Ok(ProfileResponse::Privileged {
            username: claims.username,
            role: claims.role,
            flag: flag.to_string(),
        })
    } else {
        Ok(ProfileResponse::Denied {
            username: claims.username,
            role: claims.role,
            message: DENIED_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::SessionClaims;
    use base64ct::{Base64UrlUnpadded, Encoding};

    const FLAG: &str = "FLAG{jwt_role_escalation_success}";

    #[test]
    fn test_no_token_is_unauthenticated() {
        assert_eq!(evaluate(None, FLAG), Err(Error::Unauthenticated));
    }

    #[test]
    fn test_garbled_token_is_invalid() {
        assert_eq!(evaluate(Some("not-a-token"), FLAG), Err(Error::InvalidToken));
        assert_eq!(evaluate(Some("a.!!.c"), FLAG), Err(Error::InvalidToken));
    }

    #[test]
    fn test_user_token_is_denied() {
        let token = token::encode(&SessionClaims::new("alice", "user"), "secret123").unwrap();

        let response = evaluate(Some(&token), FLAG).unwrap();
        assert_eq!(
            response,
            ProfileResponse::Denied {
                username: "alice".to_string(),
                role: "user".to_string(),
                message: DENIED_MESSAGE.to_string(),
            }
        );
    }

    #[test]
    fn test_forged_admin_token_unlocks_flag() {
        // A legitimately issued "user" token, payload rewritten to admin,
        // original signature left in place.
        let token = token::encode(&SessionClaims::new("mallory", "user"), "secret123").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let payload = Base64UrlUnpadded::decode_vec(parts[1]).unwrap();
        let forged_json = String::from_utf8(payload)
            .unwrap()
            .replace("\"role\":\"user\"", "\"role\":\"admin\"");
        let forged_payload = Base64UrlUnpadded::encode_string(forged_json.as_bytes());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        let response = evaluate(Some(&forged), FLAG).unwrap();
        assert_eq!(
            response,
            ProfileResponse::Privileged {
                username: "mallory".to_string(),
                role: "admin".to_string(),
                flag: FLAG.to_string(),
            }
        );
    }

    #[test]
    fn test_role_less_payload_is_denied_not_invalid() {
        // Any role other than admin unlocks only the standard response,
        // including a token that carries no role claim at all.
        let payload = Base64UrlUnpadded::encode_string(br#"{"username":"alice"}"#);
        let token = format!("h.{payload}.s");

        let response = evaluate(Some(&token), FLAG).unwrap();
        assert_eq!(
            response,
            ProfileResponse::Denied {
                username: "alice".to_string(),
                role: String::new(),
                message: DENIED_MESSAGE.to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_role_is_denied() {
        let token = token::encode(&SessionClaims::new("bob", "superuser"), "secret123").unwrap();

        match evaluate(Some(&token), FLAG).unwrap() {
            ProfileResponse::Denied { role, message, .. } => {
                assert_eq!(role, "superuser");
                assert_eq!(message, DENIED_MESSAGE);
            }
            ProfileResponse::Privileged { .. } => panic!("superuser must not unlock the flag"),
        }
    }
}
