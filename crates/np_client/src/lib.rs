use np_core::Result;

pub mod models;

pub use models::create_backend;
pub use models::dummy::DummyBackend;
pub use models::http::HttpBackend;

/// Backend selected when nothing else is asked for.
pub const DEFAULT_BACKEND: &str = "http";

/// Names accepted by [`create_backend`].
pub fn available_backends() -> &'static [&'static str] {
    &["http", "dummy"]
}

pub fn is_known_backend(name: &str) -> bool {
    available_backends().contains(&name)
}

pub(crate) fn ensure_known(name: &str) -> Result<()> {
    if is_known_backend(name) {
        Ok(())
    } else {
        Err(np_core::Error::Config(format!(
            "Unknown backend '{}'. Available backends: {}",
            name,
            available_backends().join(", ")
        )))
    }
}

pub mod prelude {
    pub use super::models::create_backend;
    pub use super::{DummyBackend, HttpBackend};
    pub use np_core::{Article, ArticleDigest, Config, Error, NewsBackend, PublishRequest, Result};
}
