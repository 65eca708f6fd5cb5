//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use daovote_clients::ClientError;
use daovote_governance::GovernanceError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("voter {0} has no voting power")]
    UnknownVoter(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::AlreadyExists(_) => StatusCode::CONFLICT,
            RpcError::InvalidRequest(_) | RpcError::UnknownVoter(_) => StatusCode::BAD_REQUEST,
            RpcError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RpcError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RpcError::Store(_) | RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GovernanceError> for RpcError {
    fn from(e: GovernanceError) -> Self {
        match e {
            GovernanceError::UnknownAddress(address) | GovernanceError::NotFound(address) => {
                RpcError::NotFound(format!("wallet {address}"))
            }
            GovernanceError::UnknownVoter(address) => RpcError::UnknownVoter(address),
            GovernanceError::AlreadyExists(address) => {
                RpcError::AlreadyExists(format!("wallet {address}"))
            }
            GovernanceError::ProposalNotFound(id) => RpcError::NotFound(format!("vote {id}")),
            GovernanceError::DivisionUndefined(what) => {
                RpcError::Server(format!("division undefined: {what} is zero"))
            }
            GovernanceError::Store(e) => RpcError::Store(e.to_string()),
        }
    }
}

impl From<ClientError> for RpcError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unauthorized(msg) => RpcError::Unauthorized(msg),
            other => RpcError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
