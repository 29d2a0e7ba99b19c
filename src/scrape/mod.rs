//! Scraping starred repositories through a real, logged-in browser.
//!
//! A human logs in once in a visible browser window; the scraper then walks
//! the "stars" tab of their profile page by page. The login can be kept in
//! a session file so later runs skip the login step.
//!
//! The login flow in [`scrape_with`] and the page walking in
//! [`collect_stars`] only talk to the [`GitHubSession`] and [`StarsListing`]
//! traits, which the chromium driver implements.

mod chrome;
mod collector;
mod session;

#[cfg(feature = "browser")]
mod browser;

pub use chrome::find_chrome;
pub use collector::{GITHUB_WEB_URL, StarCollector, repo_url};
pub use session::{load_session, save_session};

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::error::Result;

/// A paginated list of repository links, positioned on some page.
#[async_trait]
pub trait StarsListing {
    /// `href`s of the repository links on the current page.
    async fn repo_links(&mut self) -> Result<Vec<String>>;

    /// Move to the next page if an enabled "Next" control exists.
    ///
    /// Returns `false` when there is no further page.
    async fn next_page(&mut self) -> Result<bool>;
}

/// A browser tab that can sign in to GitHub.
#[async_trait]
pub trait GitHubSession {
    /// Navigate to `url`.
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Load a blob produced by [`export_session`](Self::export_session).
    ///
    /// Returns how many entries were restored; fails if none could be.
    async fn restore_session(&mut self, blob: &[u8]) -> Result<usize>;

    /// Serialize the current login state.
    async fn export_session(&mut self) -> Result<Vec<u8>>;

    /// The signed-in username, or `None` when not logged in.
    async fn logged_in_user(&mut self) -> Result<Option<String>>;

    /// Open the login page and block until a human has signed in.
    ///
    /// Fails with [`StarError::LoginTimeout`](crate::error::StarError::LoginTimeout)
    /// once `timeout` passes.
    async fn wait_for_login(&mut self, timeout: Duration) -> Result<String>;
}

/// Walk every page of `listing`, collecting distinct repository URLs.
pub async fn collect_stars<L>(listing: &mut L, page_delay: Duration) -> Result<Vec<String>>
where
    L: StarsListing + Send + ?Sized,
{
    let mut collector = StarCollector::new();
    let mut page = 1;

    loop {
        info!("Scraping page {}...", page);
        let links = listing.repo_links().await?;
        let added = collector.add_page(links.iter().map(String::as_str));
        info!("  Found {} repositories on this page", added);

        if !listing.next_page().await? {
            break;
        }
        tokio::time::sleep(page_delay).await;
        page += 1;
    }

    Ok(collector.into_urls())
}

/// Poll `condition` every `interval` until it reports true or `timeout` passes.
///
/// Returns whether the condition was met.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let wait = async {
        loop {
            if condition().await {
                return;
            }
            tokio::time::sleep(interval).await;
        }
    };
    tokio::time::timeout(timeout, wait).await.is_ok()
}

/// URL of a user's starred repositories tab.
pub fn stars_url(user: &str) -> String {
    format!("{}/{}?tab=stars", GITHUB_WEB_URL, user)
}

/// Log in (reusing a saved session when allowed) and scrape the stars tab.
#[cfg(feature = "browser")]
pub async fn scrape_starred(config: &ScraperConfig) -> Result<Vec<String>> {
    let chrome = find_chrome(config.chrome.as_deref())?;
    let mut github = browser::GitHubBrowser::launch(&chrome, false).await?;

    let result = scrape_with(&mut github, config).await;
    github.close().await;
    result
}

/// Sign in on `github`, save the session if asked, then collect the stars.
pub async fn scrape_with<B>(github: &mut B, config: &ScraperConfig) -> Result<Vec<String>>
where
    B: GitHubSession + StarsListing + Send,
{
    let use_saved = config.use_saved_session();
    if use_saved {
        info!("Loading saved session from {}", config.session_file.display());
        if let Some(blob) = load_session(&config.session_file)? {
            if let Err(e) = github.restore_session(&blob).await {
                warn!("Could not restore saved session: {}", e);
            }
        }
    }

    let user = match github.logged_in_user().await? {
        Some(user) => {
            info!("Already logged in as: {}", user);
            user
        }
        None => {
            if use_saved {
                info!("Saved session expired, need to log in again...");
            }
            github.wait_for_login(config.login_timeout).await?
        }
    };

    if config.save_session {
        let blob = github.export_session().await?;
        save_session(&config.session_file, &blob)?;
        info!("Session saved to {}", config.session_file.display());
    }

    info!("Navigating to starred repositories...");
    github.open(&stars_url(&user)).await?;
    collect_stars(github, config.page_delay).await
}

#[cfg(not(feature = "browser"))]
pub async fn scrape_starred(_config: &ScraperConfig) -> Result<Vec<String>> {
    Err(crate::error::StarError::Browser {
        message: "Browser support not compiled. Rebuild with: cargo build --features browser"
            .into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StarError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Pages of hrefs served in order.
    struct FakeListing {
        pages: Vec<Vec<&'static str>>,
        current: usize,
    }

    impl FakeListing {
        fn new(pages: Vec<Vec<&'static str>>) -> Self {
            Self { pages, current: 0 }
        }
    }

    #[async_trait]
    impl StarsListing for FakeListing {
        async fn repo_links(&mut self) -> Result<Vec<String>> {
            Ok(self.pages[self.current].iter().map(|s| s.to_string()).collect())
        }

        async fn next_page(&mut self) -> Result<bool> {
            if self.current + 1 < self.pages.len() {
                self.current += 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    #[tokio::test]
    async fn test_collects_all_pages_in_order() {
        let mut listing = FakeListing::new(vec![
            vec!["/a/one", "/b/two"],
            vec!["/c/three"],
            vec!["/d/four", "/login"],
        ]);

        let urls = collect_stars(&mut listing, Duration::ZERO).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "https://github.com/a/one",
                "https://github.com/b/two",
                "https://github.com/c/three",
                "https://github.com/d/four",
            ]
        );
    }

    #[tokio::test]
    async fn test_stale_pager_duplicates_dropped() {
        let mut listing = FakeListing::new(vec![
            vec!["/a/one", "/b/two"],
            vec!["/b/two", "/c/three"],
        ]);

        let urls = collect_stars(&mut listing, Duration::ZERO).await.unwrap();

        assert_eq!(urls.len(), 3);
        assert_eq!(
            urls.iter().filter(|u| *u == "https://github.com/b/two").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_single_empty_page() {
        let mut listing = FakeListing::new(vec![vec![]]);
        let urls = collect_stars(&mut listing, Duration::ZERO).await.unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_poll_until_condition_met() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let met = poll_until(Duration::from_secs(5), Duration::from_millis(1), move || {
            let counter = counter.clone();
            async move { counter.fetch_add(1, Ordering::SeqCst) >= 2 }
        })
        .await;

        assert!(met);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let met = poll_until(Duration::from_millis(50), Duration::from_millis(5), || async {
            false
        })
        .await;
        assert!(!met);
    }

    #[test]
    fn test_stars_url() {
        assert_eq!(stars_url("octocat"), "https://github.com/octocat?tab=stars");
    }

    /// Scripted GitHub tab recording which steps ran.
    struct FakeGitHub {
        /// Whether a restored session is still accepted by the site.
        session_alive: bool,
        restore_fails: bool,
        login_times_out: bool,
        signed_in: Option<String>,
        restored: Option<Vec<u8>>,
        calls: Vec<&'static str>,
        opened: Vec<String>,
        listing: FakeListing,
    }

    impl FakeGitHub {
        fn new() -> Self {
            Self {
                session_alive: true,
                restore_fails: false,
                login_times_out: false,
                signed_in: None,
                restored: None,
                calls: Vec::new(),
                opened: Vec::new(),
                listing: FakeListing::new(vec![vec!["/a/one", "/b/two"]]),
            }
        }
    }

    #[async_trait]
    impl GitHubSession for FakeGitHub {
        async fn open(&mut self, url: &str) -> Result<()> {
            self.opened.push(url.to_string());
            Ok(())
        }

        async fn restore_session(&mut self, blob: &[u8]) -> Result<usize> {
            self.calls.push("restore");
            if self.restore_fails {
                return Err(StarError::Browser {
                    message: "none of the 1 saved cookies could be restored".into(),
                });
            }
            self.restored = Some(blob.to_vec());
            if self.session_alive {
                self.signed_in = Some("octocat".into());
            }
            Ok(1)
        }

        async fn export_session(&mut self) -> Result<Vec<u8>> {
            self.calls.push("export");
            Ok(b"exported-state".to_vec())
        }

        async fn logged_in_user(&mut self) -> Result<Option<String>> {
            self.calls.push("check_login");
            Ok(self.signed_in.clone())
        }

        async fn wait_for_login(&mut self, timeout: Duration) -> Result<String> {
            self.calls.push("login");
            if self.login_times_out {
                return Err(StarError::LoginTimeout {
                    secs: timeout.as_secs(),
                });
            }
            self.signed_in = Some("octocat".into());
            Ok("octocat".into())
        }
    }

    #[async_trait]
    impl StarsListing for FakeGitHub {
        async fn repo_links(&mut self) -> Result<Vec<String>> {
            self.listing.repo_links().await
        }

        async fn next_page(&mut self) -> Result<bool> {
            self.listing.next_page().await
        }
    }

    fn scraper_config(dir: &tempfile::TempDir) -> ScraperConfig {
        ScraperConfig {
            session_file: dir.path().join("session.json"),
            page_delay: Duration::ZERO,
            login_timeout: Duration::from_secs(1),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_saved_session_skips_login() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = scraper_config(&dir);
        std::fs::write(&config.session_file, b"saved-state").unwrap();
        let mut github = FakeGitHub::new();

        let urls = scrape_with(&mut github, &config).await.unwrap();

        assert_eq!(github.calls, vec!["restore", "check_login"]);
        assert_eq!(github.restored.as_deref(), Some(&b"saved-state"[..]));
        assert_eq!(github.opened, vec!["https://github.com/octocat?tab=stars"]);
        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_expired_session_falls_back_to_login() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = scraper_config(&dir);
        std::fs::write(&config.session_file, b"saved-state").unwrap();
        let mut github = FakeGitHub {
            session_alive: false,
            ..FakeGitHub::new()
        };

        let urls = scrape_with(&mut github, &config).await.unwrap();

        assert_eq!(github.calls, vec!["restore", "check_login", "login"]);
        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_restore_falls_back_to_login() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = scraper_config(&dir);
        std::fs::write(&config.session_file, b"saved-state").unwrap();
        let mut github = FakeGitHub {
            restore_fails: true,
            ..FakeGitHub::new()
        };

        scrape_with(&mut github, &config).await.unwrap();

        assert_eq!(github.calls, vec!["restore", "check_login", "login"]);
    }

    #[tokio::test]
    async fn test_fresh_run_never_loads_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ScraperConfig {
            fresh: true,
            ..scraper_config(&dir)
        };
        std::fs::write(&config.session_file, b"saved-state").unwrap();
        let mut github = FakeGitHub::new();

        scrape_with(&mut github, &config).await.unwrap();

        assert!(github.restored.is_none());
        assert_eq!(github.calls, vec!["check_login", "login"]);
    }

    #[tokio::test]
    async fn test_session_saved_only_when_requested() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = scraper_config(&dir);

        let mut github = FakeGitHub::new();
        scrape_with(&mut github, &config).await.unwrap();
        assert!(!github.calls.contains(&"export"));
        assert!(!config.session_file.exists());

        let config = ScraperConfig {
            save_session: true,
            ..config
        };
        let mut github = FakeGitHub::new();
        scrape_with(&mut github, &config).await.unwrap();
        assert_eq!(github.calls, vec!["check_login", "login", "export"]);
        assert_eq!(
            std::fs::read(&config.session_file).unwrap(),
            b"exported-state"
        );
    }

    #[tokio::test]
    async fn test_login_timeout_propagates() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ScraperConfig {
            save_session: true,
            ..scraper_config(&dir)
        };
        let mut github = FakeGitHub {
            login_times_out: true,
            ..FakeGitHub::new()
        };

        let err = scrape_with(&mut github, &config).await.unwrap_err();

        assert!(matches!(err, StarError::LoginTimeout { secs: 1 }));
        assert!(!github.calls.contains(&"export"));
        assert!(github.opened.is_empty());
    }
}
