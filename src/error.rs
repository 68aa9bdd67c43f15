use thiserror::Error;

/// Errors raised while configuring, authenticating or talking to the API.
///
/// Assertion mismatches are not errors: they are recorded on the step
/// report so later steps keep running.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to authenticate. Status code: {status}, Content: {body}")]
    Authentication { status: u16, body: String },

    #[error("Failed to retrieve JWT token from the response: {0}")]
    CredentialExtraction(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Step precondition not met: {0}")]
    Precondition(String),

    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
