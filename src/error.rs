use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failures reported back to the caller of a ledger operation.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("missing values: {0}")]
    MissingFields(String),

    #[error("please supply a valid list of nodes")]
    EmptyPeerList,

    #[error("invalid node address `{0}`: no host")]
    InvalidPeerAddress(String),

    #[error("mining was cancelled before a proof was found")]
    MiningCancelled,
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::MiningCancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Why a peer's chain could not be fetched. Never fatal to a resolution pass.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("request to {peer} failed: {source}")]
    Request {
        peer: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{peer} answered with status {status}")]
    Status { peer: String, status: u16 },

    #[error("{peer} reported length {reported} but sent {actual} blocks")]
    LengthMismatch {
        peer: String,
        reported: usize,
        actual: usize,
    },
}
