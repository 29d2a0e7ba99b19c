//! # starkit
//!
//! Tools for keeping a local copy of the repositories you starred on GitHub.
//!
//! - [`github`]: list a user's starred repositories through the REST API
//! - [`scrape`]: collect the same list from the web UI in a logged-in browser
//! - [`clone`]: clone every URL listed in a text file
//!
//! Listings are written to `<YYYY-MM-DD>-starred.txt` by [`output`], the
//! same format [`clone`] reads back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use starkit::prelude::*;
//!
//! let listing = GitHubClient::new().list_starred("octocat", 100);
//! if let Some(path) = write_todays_list(std::path::Path::new("."), &listing.urls)? {
//!     let tally = clone_all(&path, &GitCloner::new())?;
//!     println!("{}", tally);
//! }
//! # Ok::<(), starkit::error::StarError>(())
//! ```

pub mod clone;
pub mod config;
pub mod error;
pub mod github;
pub mod output;
pub mod scrape;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clone::{
        CloneOutcome, CloneRunner, CloneTally, GitCloner, clone_all, clone_targets, clone_urls,
    };
    pub use crate::config::{ClonerConfig, ListerConfig, ScraperConfig};
    pub use crate::error::{Result, StarError};
    pub use crate::github::{GitHubClient, StarredListing, StarredOps, StarredRepo};
    pub use crate::output::{dated_file_name, write_todays_list, write_url_list};
    pub use crate::scrape::{
        GitHubSession, StarCollector, StarsListing, collect_stars, scrape_starred, scrape_with,
    };
}

pub use prelude::*;
