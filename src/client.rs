//! Front-end data pipeline: the HTTP client for the portfolio API, the
//! retrying data loader with its skill merge, and the contact form controller.

pub mod api;
pub mod contact_form;
pub mod loader;
pub mod merge;
pub mod timer;

use derive_more::Display;

#[derive(Debug, Display)]
pub enum ClientError {
    #[display("Request failed: {_0}")]
    Transport(String),

    #[display("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[display("Unexpected response body: {_0}")]
    Decode(String),
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
