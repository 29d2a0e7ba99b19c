//! Accumulating repository links across listing pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Web root that repository hrefs are relative to.
pub const GITHUB_WEB_URL: &str = "https://github.com";

/// `/owner/repo` and nothing else.
static REPO_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[^/]+/[^/]+$").expect("valid repo path regex"));

/// Absolute URL for a repository href, or `None` if it isn't `/owner/repo`.
pub fn repo_url(href: &str) -> Option<String> {
    REPO_PATH
        .is_match(href)
        .then(|| format!("{}{}", GITHUB_WEB_URL, href))
}

/// Ordered, duplicate-free list of repository URLs.
#[derive(Debug, Default)]
pub struct StarCollector {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl StarCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the repository links found on one page; returns how many were new.
    pub fn add_page<'a>(&mut self, hrefs: impl IntoIterator<Item = &'a str>) -> usize {
        let before = self.urls.len();
        for url in hrefs.into_iter().filter_map(repo_url) {
            if self.seen.insert(url.clone()) {
                self.urls.push(url);
            }
        }
        self.urls.len() - before
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}
