//! Bulk cloning from a URL list file.
//!
//! Every non-blank, non-comment line of the input is handed to a
//! [`CloneRunner`]. Failures are logged and counted; they never stop the
//! run. Only a missing input file is fatal, and it is reported before any
//! clone is attempted.
//!
//! # Example
//!
//! ```rust,no_run
//! use starkit::clone::{GitCloner, clone_all};
//!
//! let tally = clone_all("2024-01-15-starred.txt", &GitCloner::new())?;
//! println!("{}", tally);
//! # Ok::<(), starkit::error::StarError>(())
//! ```

mod input;
mod runner;

pub use input::clone_targets;
pub use runner::{CloneOutcome, CloneRunner, GitCloner};

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Result, StarError};

/// Counters for one cloning run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CloneTally {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for CloneTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Successful: {}, Failed: {}",
            self.attempted, self.succeeded, self.failed
        )
    }
}

/// Clone every URL listed in `path`.
pub fn clone_all(path: impl AsRef<Path>, runner: &dyn CloneRunner) -> Result<CloneTally> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StarError::InputNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    Ok(clone_urls(clone_targets(&contents), runner))
}

/// Clone each URL in turn, logging and tallying the outcome.
pub fn clone_urls<'a>(urls: impl IntoIterator<Item = &'a str>, runner: &dyn CloneRunner) -> CloneTally {
    let mut tally = CloneTally::default();

    for url in urls {
        tally.attempted += 1;
        info!("Cloning repository {} ({})...", tally.attempted, url);

        match runner.clone_repo(url) {
            Ok(CloneOutcome::Success) => {
                info!("✓ Successfully cloned: {}", url);
                tally.succeeded += 1;
            }
            Ok(CloneOutcome::ExitFailure { stderr }) => {
                warn!("✗ Failed to clone {}: {}", url, stderr);
                tally.failed += 1;
            }
            Ok(CloneOutcome::TimedOut) => {
                warn!("✗ Timeout while cloning {}", url);
                tally.failed += 1;
            }
            Err(e) => {
                warn!("✗ Error cloning {}: {}", url, e);
                tally.failed += 1;
            }
        }
    }

    tally
}
