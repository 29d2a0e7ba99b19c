//! Starred repository listing.

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, StarError};
use crate::github::GitHubClient;

/// One entry of `GET /users/{user}/starred`.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredRepo {
    pub clone_url: String,
}

/// What a pagination run collected.
///
/// `error` holds the failure that ended the run early, if any; `urls`
/// still carries everything gathered before it.
#[derive(Debug, Default)]
pub struct StarredListing {
    pub urls: Vec<String>,
    pub requests: u32,
    pub error: Option<StarError>,
}

impl StarredListing {
    /// True when every page was fetched without error.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Starred repository operations.
pub trait StarredOps {
    /// Fetch a single page of a user's starred repositories.
    fn starred_page(&self, user: &str, page: u32, per_page: u32) -> Result<Vec<StarredRepo>>;

    /// Collect clone URLs for every starred repository.
    ///
    /// Stops at the first empty page. Any error also stops the run without
    /// retrying; the URLs gathered so far are kept.
    fn list_starred(&self, user: &str, per_page: u32) -> StarredListing {
        info!("Getting starred repos for {}...", user);

        let mut listing = StarredListing::default();
        let mut page = 1;

        loop {
            listing.requests += 1;
            let repos = match self.starred_page(user, page, per_page) {
                Ok(repos) => repos,
                Err(e) => {
                    warn!("An error occurred on page {}: {}", page, e);
                    listing.error = Some(e);
                    break;
                }
            };

            if repos.is_empty() {
                break;
            }

            info!("  ...downloaded page {} with {} repos", page, repos.len());
            listing.urls.extend(repos.into_iter().map(|r| r.clone_url));
            page += 1;
        }

        info!("Got {} starred repos.", listing.urls.len());
        listing
    }
}

impl StarredOps for GitHubClient {
    fn starred_page(&self, user: &str, page: u32, per_page: u32) -> Result<Vec<StarredRepo>> {
        let endpoint = format!("/users/{}/starred?per_page={}&page={}", user, per_page, page);
        self.get(&endpoint)
    }
}
