//! Locating a Chrome/Chromium executable.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, StarError};

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Resolve the browser binary: `explicit` if given, else well-known paths, else `PATH`.
pub fn find_chrome(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(StarError::InvalidConfig(format!(
            "Chrome executable not found at {}",
            path.display()
        )));
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(StarError::Browser {
        message: "Chrome/Chromium not found. Install it or pass --chrome <path>".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path() {
        let dir = TempDir::new().unwrap();
        let chrome = dir.path().join("chrome");
        std::fs::write(&chrome, "").unwrap();

        assert_eq!(find_chrome(Some(&chrome)).unwrap(), chrome);
    }

    #[test]
    fn test_explicit_path_missing() {
        let dir = TempDir::new().unwrap();
        let err = find_chrome(Some(&dir.path().join("nope"))).unwrap_err();
        assert!(matches!(err, StarError::InvalidConfig(_)));
    }
}
