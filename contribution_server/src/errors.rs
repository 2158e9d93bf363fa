use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use contribution_engine::ContributionError;
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid request. {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
    #[error(transparent)]
    ContributionError(#[from] ContributionError),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Could not issue access token. {0}")]
    CouldNotSerializeAccessToken(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::ContributionError(e) => match e {
                ContributionError::ValidationError(_) => StatusCode::BAD_REQUEST,
                ContributionError::SignatureError => StatusCode::BAD_REQUEST,
                ContributionError::AuthorizationError(_) => StatusCode::FORBIDDEN,
                ContributionError::NotFoundError(_) => StatusCode::NOT_FOUND,
                ContributionError::GatewayError(_) => StatusCode::BAD_GATEWAY,
                ContributionError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ContributionError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CouldNotSerializeAccessToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingToken,
    #[error("Invalid authorization format. Expected 'Bearer <token>'")]
    PoorlyFormattedToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token has expired")]
    ExpiredToken,
}
