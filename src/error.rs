use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("⚠️ Please enter some text before submitting!")]
    EmptyInput,
    #[error("Unknown mood: {0}")]
    UnknownMood(String),
    #[error("Invalid file identifier")]
    InvalidFileId,
    #[error("The journal is not expecting {0} right now")]
    OutOfStep(&'static str),
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Upstream responded with HTTP {0}")]
    UpstreamStatus(u16),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Could not render page: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = match &self {
            Error::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnknownMood(_) => StatusCode::BAD_REQUEST,
            Error::InvalidFileId => StatusCode::BAD_REQUEST,
            Error::OutOfStep(_) => StatusCode::CONFLICT,
            Error::Upstream(_) | Error::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if code.is_server_error() {
            error!("{self}");
        }

        (code, self.to_string()).into_response()
    }
}
