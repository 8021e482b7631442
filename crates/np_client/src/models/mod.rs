use std::sync::Arc;

use np_core::{Config, NewsBackend, Result};
use tracing::info;

pub mod dummy;
pub mod http;

use dummy::DummyBackend;
use http::HttpBackend;

/// Builds the backend registered under `name` (`http` or `dummy`).
pub fn create_backend(name: &str, config: Config) -> Result<Arc<dyn NewsBackend>> {
    crate::ensure_known(name)?;
    let backend: Arc<dyn NewsBackend> = match name {
        "dummy" => Arc::new(DummyBackend::new(Some(config))),
        _ => Arc::new(HttpBackend::new(config)?),
    };
    info!("🔌 Using {} backend", backend.name());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_backend() {
        let config = Config::new("http://localhost:5000").unwrap();

        let backend = create_backend("http", config.clone()).unwrap();
        assert_eq!(backend.name(), "HTTP");

        let backend = create_backend("dummy", config.clone()).unwrap();
        assert_eq!(backend.name(), "Dummy");
        assert_eq!(backend.auth_url().unwrap().as_str(), "http://localhost:5000/auth/linkedin");

        let err = create_backend("carrier-pigeon", config).unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
        assert!(err.to_string().contains("http, dummy"));
    }
}
