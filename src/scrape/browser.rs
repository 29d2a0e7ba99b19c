//! Chromium driver for github.com, via chromiumoxide (CDP).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{GITHUB_WEB_URL, GitHubSession, StarsListing, poll_until};
use crate::error::{Result, StarError};

const LOGIN_URL: &str = "https://github.com/login";

/// Only rendered for a signed-in user.
const USER_MENU: &str = r#"button[aria-label="Open user navigation menu"]"#;

/// Username inside the opened user menu.
const MENU_USERNAME: &str = r#"div[aria-label="User navigation"] .text-bold"#;

/// Repository links on a stars listing page.
const REPO_LINKS: &str = r#"h3 a[href*="/"]"#;

/// Clicks the pager's "Next" control if it is enabled; reports whether it did.
const CLICK_NEXT: &str = r#"
(() => {
    const pager = document.querySelector('div[data-test-selector="pagination"]');
    if (!pager) return false;
    const next = Array.from(pager.querySelectorAll('a, button, span'))
        .find((el) => el.textContent.trim() === 'Next');
    if (!next) return false;
    const disabled = next.tagName === 'SPAN'
        || next.disabled
        || next.getAttribute('aria-disabled') === 'true'
        || next.classList.contains('disabled');
    if (disabled) return false;
    next.click();
    return true;
})()
"#;

const MENU_RENDER_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A browser with a single github.com tab.
pub struct GitHubBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
}

impl GitHubBrowser {
    /// Launch a browser; headed so a human can log in.
    pub async fn launch(chrome: &Path, headless: bool) -> Result<Self> {
        info!("Launching browser (headless={})", headless);

        let mut builder = BrowserConfig::builder().chrome_executable(chrome);

        // with_head means NOT headless
        if !headless {
            builder = builder.with_head();
        }

        let config = builder
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(|e| StarError::Browser {
                message: format!("Failed to build browser config: {}", e),
            })?;

        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut browser = browser;
                let _ = browser.close().await;
                handler.abort();
                return Err(e.into());
            }
        };

        Ok(Self {
            browser,
            handler,
            page,
        })
    }

    /// Open the user menu, read the bold username, close the menu.
    async fn read_username(&self) -> Result<String> {
        let menu = self.page.find_element(USER_MENU).await?;
        menu.click().await?;

        let page = &self.page;
        poll_until(MENU_RENDER_TIMEOUT, POLL_INTERVAL, || async move {
            page.find_element(MENU_USERNAME).await.is_ok()
        })
        .await;

        let username = self
            .page
            .find_element(MENU_USERNAME)
            .await?
            .inner_text()
            .await?
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        menu.press_key("Escape").await?;

        if username.is_empty() {
            return Err(StarError::Browser {
                message: "Could not determine username after login".into(),
            });
        }
        Ok(username)
    }

    /// Close the browser and wait for its event loop to finish.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        let _ = self.browser.wait().await;
        let _ = self.handler.await;
    }
}

/// The parts of an exported cookie needed to set it again.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    http_only: bool,
}

/// Build a settable cookie.
///
/// The URL is filled in from the domain so the cookie can be set while the
/// tab is still on `about:blank`.
fn cookie_param(cookie: &SavedCookie) -> Result<CookieParam> {
    let host = cookie.domain.trim_start_matches('.');
    CookieParam::builder()
        .name(cookie.name.clone())
        .value(cookie.value.clone())
        .url(format!("https://{}{}", host, cookie.path))
        .domain(cookie.domain.clone())
        .path(cookie.path.clone())
        .secure(cookie.secure)
        .http_only(cookie.http_only)
        .build()
        .map_err(|e| StarError::Browser {
            message: format!("Failed to build cookie {}: {}", cookie.name, e),
        })
}

#[async_trait]
impl GitHubSession for GitHubBrowser {
    async fn open(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn restore_session(&mut self, blob: &[u8]) -> Result<usize> {
        let cookies: Vec<SavedCookie> = serde_json::from_slice(blob)?;
        debug!("Restoring {} cookies", cookies.len());

        let mut restored = 0;
        for cookie in &cookies {
            let set = match cookie_param(cookie) {
                Ok(param) => self.page.set_cookie(param).await.map(|_| ()).map_err(StarError::from),
                Err(e) => Err(e),
            };
            match set {
                Ok(()) => restored += 1,
                Err(e) => warn!("Failed to set cookie {}: {}", cookie.name, e),
            }
        }

        if restored == 0 && !cookies.is_empty() {
            return Err(StarError::Browser {
                message: format!("none of the {} saved cookies could be restored", cookies.len()),
            });
        }
        Ok(restored)
    }

    async fn export_session(&mut self) -> Result<Vec<u8>> {
        let cookies = self.page.get_cookies().await?;
        debug!("Exporting {} cookies", cookies.len());
        Ok(serde_json::to_vec_pretty(&cookies)?)
    }

    async fn logged_in_user(&mut self) -> Result<Option<String>> {
        self.open(GITHUB_WEB_URL).await?;

        let menus = self.page.find_elements(USER_MENU).await?;
        if menus.is_empty() {
            return Ok(None);
        }
        Ok(self.read_username().await.ok())
    }

    async fn wait_for_login(&mut self, timeout: Duration) -> Result<String> {
        self.open(LOGIN_URL).await?;
        info!("Please log in to GitHub in the browser window...");
        info!("Waiting for login to complete...");

        let page = &self.page;
        let signed_in = poll_until(timeout, POLL_INTERVAL, || async move {
            page.find_element(USER_MENU).await.is_ok()
        })
        .await;
        if !signed_in {
            return Err(StarError::LoginTimeout {
                secs: timeout.as_secs(),
            });
        }

        let user = self.read_username().await?;
        info!("Logged in as: {}", user);
        Ok(user)
    }
}

#[async_trait]
impl StarsListing for GitHubBrowser {
    async fn repo_links(&mut self) -> Result<Vec<String>> {
        let mut hrefs = Vec::new();
        for link in self.page.find_elements(REPO_LINKS).await? {
            if let Some(href) = link.attribute("href").await? {
                hrefs.push(href);
            }
        }
        Ok(hrefs)
    }

    async fn next_page(&mut self) -> Result<bool> {
        let clicked: bool = self.page.evaluate(CLICK_NEXT.to_string()).await?.into_value()?;
        Ok(clicked)
    }
}
