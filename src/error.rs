use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::controller::Envelope;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Database errors
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),
}

pub type RestResult<T> = std::result::Result<T, RestError>;

/// Errors surfaced to REST clients.
/// Rendered as a failure envelope, internal details are only logged.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Unauthorized Access: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    /// The message shown to clients
    fn public_message(&self) -> String {
        match self {
            Self::ParseError(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::InternalError(_) | Self::Other(_) => "Internal Server Error".into(),
        }
    }
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::ParsingError(msg) => Self::ParseError(msg),
            Error::DatabaseError(e) => {
                tracing::error!(error.cause_chain = ?e, "Subscription store failure");
                Self::InternalError("Database error".into())
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Other(e) = self {
            tracing::error!(error.cause_chain = ?e, "Unhandled error");
        }
        HttpResponse::build(self.status_code()).json(Envelope::failure(self.public_message()))
    }
}
