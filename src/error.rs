//! Error types for json-tsgen.
//!
//! The inference core only ever produces the first two variants; the rest
//! belong to the collaborators around it (request documents, fetching,
//! saving).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Core
    // ============================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to generate types: {0}")]
    InternalInferenceFailure(String),

    // ============================================================================
    // Request documents
    // ============================================================================
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid JSON pointer '{pointer}': no value at that location")]
    PointerMiss { pointer: String },

    // ============================================================================
    // Fetch
    // ============================================================================
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Only HTTP and HTTPS protocols are allowed (got '{scheme}')")]
    InvalidProtocol { scheme: String },

    #[error("Local addresses are not allowed: {host}")]
    LocalAddress { host: String },

    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Response too large: {size} bytes exceeds the {limit} byte limit")]
    ResponseTooLarge { size: u64, limit: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: unable to connect to the server ({0})")]
    Network(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The response is not valid JSON data")]
    NotJson,

    // ============================================================================
    // Persistence
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No home directory available for the default save path")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, Error>;
