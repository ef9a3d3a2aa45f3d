use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors crossing the spreadsheet service boundary.
///
/// Covers transport failures, non-success HTTP statuses, credential
/// problems, and response payloads the client cannot decode.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to read credentials file '{path}': {source}")]
    Credentials {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// Top-level error type for price lookups.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the formula batch to the sheet failed. Not retried.
    #[error("failed to write formulas: {0}")]
    Write(#[source] GatewayError),

    /// Every read attempt failed or came back empty.
    #[error("unable to read evaluated values after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: Option<GatewayError>,
    },

    /// Clearing the written range failed. The batch is reported as failed
    /// even though values were already parsed.
    #[error("failed to clear formulas: {0}")]
    Clear(#[source] GatewayError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
