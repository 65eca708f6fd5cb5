use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ClientError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::RequestFailed(e.to_string())
        }
    }
}
