use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CotacaoError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream answered with status {0}")]
    UpstreamStatus(u16),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed quote: {0}")]
    MalformedQuote(String),

    /// An operation did not finish within its time budget.
    #[error("{operation} exceeded the time limit of {}ms", .limit.as_millis())]
    DeadlineExceeded {
        operation: &'static str,
        limit: Duration,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl CotacaoError {
    pub fn deadline(operation: &'static str, limit: Duration) -> Self {
        Self::DeadlineExceeded { operation, limit }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

impl ResponseError for CotacaoError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}
