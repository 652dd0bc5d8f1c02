use std::future::{ready, Ready};

use actix_web::http::header::{self, HeaderMap};
use actix_web::{dev, web, FromRequest, HttpRequest};

use anyhow::Context;

use uuid::Uuid;

use crate::crypto::{OwnerToken, SigningKey};
use crate::error::RestError;

const BEARER_AUTH_PREFIX: &str = "Bearer ";

/// The verified user a request acts for.
/// There is no fallback owner: requests without a valid token are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(Uuid);

impl Owner {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for Owner {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromRequest for Owner {
    type Error = RestError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[tracing::instrument(name = "Authenticate owner", skip(req))]
fn authenticate(req: &HttpRequest) -> Result<Owner, RestError> {
    // NOTE: Must be registered with the application at startup
    let signing_key = req
        .app_data::<web::Data<SigningKey>>()
        .context("Signing key not registered for application")?;

    let token = bearer_token(req.headers()).map_err(|e| {
        tracing::debug!(error.cause_chain = ?e, "Missing owner token");
        RestError::Unauthorized("Missing or malformed owner token".into())
    })?;

    let owner_id = token.verify(signing_key).map_err(|e| {
        tracing::debug!(error.cause_chain = ?e, "Rejected owner token");
        RestError::Unauthorized(e.to_string())
    })?;

    Ok(Owner(owner_id))
}

/// Extract a bearer token from the headers of a request
fn bearer_token(headers: &HeaderMap) -> anyhow::Result<OwnerToken> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .context("Missing authorization in header")?
        .to_str()?;

    let token = header_value
        .strip_prefix(BEARER_AUTH_PREFIX)
        .context("Authorization scheme not bearer")?;

    token.parse().context("Empty bearer token")
}
