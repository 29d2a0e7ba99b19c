//! Error types for starkit.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for listing, scraping and cloning.
#[derive(Error, Debug)]
pub enum StarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {message}")]
    GitHub { message: String },

    #[error("GitHub API rate limit exceeded (resets at {reset})")]
    RateLimited { reset: String },

    #[error("Input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("Could not run clone for {url}: {message}")]
    CloneInvocation { url: String, message: String },

    #[error("Browser error: {message}")]
    Browser { message: String },

    #[cfg(feature = "browser")]
    #[error("Browser error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Timed out after {secs}s waiting for GitHub login")]
    LoginTimeout { secs: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for starkit operations.
pub type Result<T> = std::result::Result<T, StarError>;
