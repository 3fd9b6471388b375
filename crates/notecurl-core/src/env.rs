//! Session credentials from `--cookies` or a dotenv `COOKIES` entry.

use std::fmt;

/// Environment key holding the browser cookie string.
pub const COOKIES_KEY: &str = "COOKIES";

/// Opaque, non-empty cookie header value.
#[derive(Clone, PartialEq, Eq)]
pub struct Cookies(String);

impl Cookies {
    /// Returns `None` for an empty string.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps session tokens out of debug logs.
impl fmt::Debug for Cookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cookies(<{} bytes>)", self.0.len())
    }
}

/// Loads `.env` from the working directory or its ancestors into the process
/// environment, then reads `COOKIES`.
///
/// A missing file or key yields `None`; malformed files are logged and skipped.
pub fn load_cookies() -> Option<Cookies> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => tracing::warn!("failed to load .env: {}", e),
    }
    std::env::var(COOKIES_KEY).ok().and_then(Cookies::new)
}

/// An explicit non-empty flag wins over the environment.
pub fn resolve_cookies(flag: Option<&str>) -> Option<Cookies> {
    flag.and_then(Cookies::new).or_else(load_cookies)
}
