use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use super::SigningKey;

/// Various errors that can occur when handling owner tokens
#[derive(Debug, thiserror::Error)]
pub enum OwnerTokenError {
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature does not match")]
    SignatureMismatch,
    #[error("Token is expired")]
    Expired,
}

impl From<base64::DecodeError> for OwnerTokenError {
    fn from(_e: base64::DecodeError) -> Self {
        Self::Malformed
    }
}

impl From<serde_json::Error> for OwnerTokenError {
    fn from(_e: serde_json::Error) -> Self {
        Self::Malformed
    }
}

/// Signed claims naming the user a request acts for
#[derive(Debug, Serialize, Deserialize)]
struct OwnerClaims {
    sub: Uuid,
    exp: Option<i64>,
}

impl OwnerClaims {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp.map_or(false, |exp| now.timestamp() >= exp)
    }
}

/// Bearer token of the form `<base64 claims>.<base64 signature>`
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerToken(String);

impl OwnerToken {
    /// Sign a token for an owner, optionally expiring at a given instant
    pub fn sign(
        owner_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
        key: &SigningKey,
    ) -> Result<Self, OwnerTokenError> {
        let claims = OwnerClaims {
            sub: owner_id,
            exp: expires_at.map(|date| date.timestamp()),
        };
        let msg = serde_json::to_vec(&claims)?;
        let sig = key.sign(&msg);

        Ok(Self(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(msg),
            URL_SAFE_NO_PAD.encode(sig)
        )))
    }

    /// Verify the signature and expiry, returning the owner ID
    pub fn verify(&self, key: &SigningKey) -> Result<Uuid, OwnerTokenError> {
        let (msg, sig) = self.0.split_once('.').ok_or(OwnerTokenError::Malformed)?;
        let msg = URL_SAFE_NO_PAD.decode(msg)?;
        let sig = URL_SAFE_NO_PAD.decode(sig)?;

        key.verify(&msg, &sig)
            .map_err(|_| OwnerTokenError::SignatureMismatch)?;

        let claims: OwnerClaims = serde_json::from_slice(&msg)?;
        if claims.is_expired(Utc::now()) {
            return Err(OwnerTokenError::Expired);
        }

        Ok(claims.sub)
    }
}

impl AsRef<str> for OwnerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OwnerToken {
    type Err = OwnerTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token.is_empty() {
            return Err(OwnerTokenError::Malformed);
        }
        Ok(Self(token.to_string()))
    }
}
