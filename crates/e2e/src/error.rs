//! Error types for the harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Browser session failed to start: {0}")]
    SessionStartup(String),

    #[error("Webapp health check failed after {0} attempts")]
    AppHealthCheck(usize),

    #[error("Assertion failed: expected {0}")]
    AssertionFailed(String),

    #[error("Timed out after {timeout_ms} ms waiting for {what}")]
    WaitTimeout { what: String, timeout_ms: u64 },

    #[error("WebDriver command error: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
