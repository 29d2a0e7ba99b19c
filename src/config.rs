//! Run configuration for the three procedures.
//!
//! Each struct carries the defaults the CLI falls back to; the binary
//! overrides fields from flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size requested from the starred endpoint.
pub const STARRED_PAGE_SIZE: u32 = 100;

/// Upper bound for a single `git clone`.
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 300;

/// How long the scraper waits for a human to finish logging in.
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 300;

/// Pause after clicking "Next" on the stars listing.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2000;

/// Settings for the REST lister.
#[derive(Debug, Clone)]
pub struct ListerConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub per_page: u32,
    pub output_dir: PathBuf,
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            token: None,
            per_page: STARRED_PAGE_SIZE,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Settings for the bulk cloner.
#[derive(Debug, Clone)]
pub struct ClonerConfig {
    pub program: String,
    pub timeout: Duration,
}

impl Default for ClonerConfig {
    fn default() -> Self {
        Self {
            program: "git".into(),
            timeout: Duration::from_secs(DEFAULT_CLONE_TIMEOUT_SECS),
        }
    }
}

/// Settings for the browser scraper.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Where the opaque session blob is read from and written to.
    pub session_file: PathBuf,
    /// Persist the session after a successful login.
    pub save_session: bool,
    /// Ignore any saved session.
    pub fresh: bool,
    pub login_timeout: Duration,
    pub page_delay: Duration,
    /// Explicit Chrome/Chromium binary; searched for when unset.
    pub chrome: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from("session.json"),
            save_session: false,
            fresh: false,
            login_timeout: Duration::from_secs(DEFAULT_LOGIN_TIMEOUT_SECS),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            chrome: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ScraperConfig {
    /// Whether a saved session should be loaded for this run.
    pub fn use_saved_session(&self) -> bool {
        !self.fresh && self.session_file.exists()
    }
}
