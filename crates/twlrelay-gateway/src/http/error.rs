use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use twlrelay_core::error::{ClientCode, RelayError};

/// HTTP face of `RelayError`.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest
            | ClientCode::UpgradeFailed
            | ClientCode::UnknownKind
            | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::RoomNotFound => StatusCode::NOT_FOUND,
            ClientCode::InvalidSecret => StatusCode::FORBIDDEN,
            ClientCode::Transport | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !self.0.is_client_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
