//! Bearer credential claims decoding.
//!
//! A credential is an opaque signed token of three dot-separated segments
//! (header, payload, signature). Only the payload segment is decoded here;
//! the signature is never verified on this side - trust is delegated to the
//! issuing service. Decoding is pure: no I/O, no clock access.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Role, SubjectId};

/// Errors that can occur when decoding a [`Credential`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CredentialError {
    /// The token does not have the expected header.payload.signature shape.
    #[error("credential must have exactly three non-empty segments")]
    MalformedSegments,
    /// The payload segment is not valid url-safe base64.
    #[error("credential payload is not valid base64: {0}")]
    PayloadEncoding(#[from] base64::DecodeError),
    /// The decoded payload is not a valid claims record.
    #[error("credential payload is not a valid claims record: {0}")]
    PayloadShape(String),
    /// The claims carry a role outside the closed set.
    #[error("credential carries an unknown role: {0:?}")]
    UnknownRole(String),
}

/// An opaque bearer credential string.
///
/// Stored and sent verbatim; the only structure this type relies on is the
/// three-segment shape checked at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token string.
    #[must_use]
    pub const fn new(raw: String) -> Self {
        Self(raw)
    }

    /// The raw token, as received from the auth service.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload segment into a [`Claims`] record.
    ///
    /// Splits on `.`, requires exactly three non-empty segments, reverses the
    /// url-safe base64 encoding of the middle segment and parses it as JSON.
    /// The signature segment is carried but never verified, and expiry is not
    /// checked against any clock (see [`Claims::expires_at`]).
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the segment shape, the payload encoding,
    /// the claims JSON, or the role value is invalid.
    pub fn decode(&self) -> Result<Claims, CredentialError> {
        let mut segments = self.0.split('.');
        let (header, payload, signature) = (segments.next(), segments.next(), segments.next());
        let (Some(header), Some(payload), Some(signature)) = (header, payload, signature) else {
            return Err(CredentialError::MalformedSegments);
        };
        if segments.next().is_some() || header.is_empty() || payload.is_empty() || signature.is_empty()
        {
            return Err(CredentialError::MalformedSegments);
        }

        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        let raw: RawClaims = serde_json::from_slice(&bytes)
            .map_err(|e| CredentialError::PayloadShape(e.to_string()))?;

        let role = Role::parse(&raw.role).map_err(|e| CredentialError::UnknownRole(e.0))?;

        Ok(Claims {
            subject_id: SubjectId::new(raw.subject_id),
            role,
            issued_at: raw.issued_at,
            expires_at: raw.expires_at,
            extra: raw.extra,
        })
    }
}

impl From<String> for Credential {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for Credential {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Wire shape of the payload segment.
///
/// `user_id` and `user_type` are the claim names issued by the users service;
/// unrecognized claims are carried through untouched.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(rename = "user_id")]
    subject_id: i64,
    #[serde(rename = "user_type")]
    role: String,
    #[serde(rename = "iat", default, with = "chrono::serde::ts_seconds_option")]
    issued_at: Option<DateTime<Utc>>,
    #[serde(rename = "exp", default, with = "chrono::serde::ts_seconds_option")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

/// Claims decoded from a credential's payload segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// The authenticated user's ID (`user_id` claim).
    pub subject_id: SubjectId,
    /// Capability level (`user_type` claim), validated against the closed set.
    pub role: Role,
    /// Issue time, when present (`iat` claim).
    pub issued_at: Option<DateTime<Utc>>,
    /// Expiry, when present (`exp` claim).
    ///
    /// Not enforced here: an expired-but-structurally-valid credential still
    /// decodes. Only a refusing server call reveals expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Passthrough claims not interpreted by this client.
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_for(payload: &serde_json::Value) -> Credential {
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).expect("payload json"));
        Credential::new(format!("hdr.{body}.sig"))
    }

    #[test]
    fn test_decode_valid_credential() {
        let cred = token_for(&json!({ "user_id": 7, "user_type": "alumno" }));
        let claims = cred.decode().expect("decode");
        assert_eq!(claims.subject_id, SubjectId::new(7));
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.expires_at, None);
    }

    #[test]
    fn test_decode_mixed_case_role() {
        let cred = token_for(&json!({ "user_id": 1, "user_type": "Administrador" }));
        assert_eq!(cred.decode().expect("decode").role, Role::Administrator);
    }

    #[test]
    fn test_decode_carries_extra_claims() {
        let cred = token_for(&json!({
            "user_id": 3,
            "user_type": "alumno",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
            "username": "ana",
        }));
        let claims = cred.decode().expect("decode");
        assert_eq!(claims.issued_at.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(
            claims.expires_at.map(|t| t.timestamp()),
            Some(1_700_003_600)
        );
        assert_eq!(claims.extra.get("username"), Some(&json!("ana")));
    }

    #[test]
    fn test_decode_expired_credential_still_decodes() {
        // Expiry is deliberately not enforced client-side.
        let cred = token_for(&json!({ "user_id": 2, "user_type": "alumno", "exp": 1 }));
        assert!(cred.decode().is_ok());
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        for raw in ["", "onlyone", "two.segments", "a.b.c.d", ".b.c", "a..c", "a.b."] {
            let err = Credential::from(raw).decode();
            assert!(
                matches!(err, Err(CredentialError::MalformedSegments)),
                "{raw:?} should fail on segment shape"
            );
        }
    }

    #[test]
    fn test_decode_rejects_non_base64_payload() {
        let cred = Credential::from("hdr.!!not-base64!!.sig");
        assert!(matches!(
            cred.decode(),
            Err(CredentialError::PayloadEncoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let body = URL_SAFE_NO_PAD.encode(b"plain text");
        let cred = Credential::new(format!("hdr.{body}.sig"));
        assert!(matches!(cred.decode(), Err(CredentialError::PayloadShape(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_role() {
        let cred = token_for(&json!({ "user_id": 9, "user_type": "profesor" }));
        match cred.decode() {
            Err(CredentialError::UnknownRole(role)) => assert_eq!(role, "profesor"),
            other => panic!("expected UnknownRole, got {other:?}"),
        }
    }
}
