use std::time::Duration;

use url::Url;

use crate::{Error, Result};

pub const API_URL_ENV: &str = "NEWSPOST_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Where the backend lives and how long the transport may wait on it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(api_url: &str) -> Result<Self> {
        let api_url = Url::parse(api_url.trim())
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot be used as a base URL", api_url)));
        }
        Ok(Self { api_url, timeout: None })
    }

    /// Reads `NEWSPOST_API_URL`, falling back to the local development backend.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Self::new(DEFAULT_API_URL),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base has.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{} cannot be used as a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(path.trim_matches('/').split('/'));
        Ok(url)
    }

    /// Navigation target that starts the LinkedIn OAuth flow.
    pub fn auth_url(&self) -> Result<Url> {
        self.endpoint("auth/linkedin")
    }
}
