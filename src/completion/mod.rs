pub mod client;
pub mod openai;
pub mod types;

pub use client::*;
pub use openai::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("cannot reach completion service at {0}")]
    Connection(String),

    #[error("attempt timed out after {0}s")]
    Timeout(u64),

    #[error("completion service returned error (status {status}): {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}
