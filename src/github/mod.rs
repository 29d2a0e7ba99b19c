//! GitHub REST API integration.
//!
//! Lists the repositories a user has starred, one page of 100 at a time.
//!
//! # Example
//!
//! ```rust,no_run
//! use starkit::github::{GitHubClient, StarredOps};
//!
//! let client = GitHubClient::new();
//! let listing = client.list_starred("octocat", 100);
//!
//! for url in &listing.urls {
//!     println!("{}", url);
//! }
//! ```

mod client;
mod starred;

pub use client::GitHubClient;
pub use starred::{StarredListing, StarredOps, StarredRepo};
