use std::sync::Arc;

use async_trait::async_trait;
use np_client::DummyBackend;
use np_core::{Article, ArticleDigest, Error, NewsBackend, Operation, PublishRequest, Result};
use tokio::sync::Notify;
use url::Url;

/// Wraps a [`DummyBackend`] and parks calls of one operation kind until the
/// test releases them. With `fail_with` set, the gated call fails once released.
#[derive(Debug)]
pub struct GatedBackend {
    pub inner: DummyBackend,
    pub gated: Operation,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
    pub fail_with: Option<String>,
}

impl GatedBackend {
    pub fn new(inner: DummyBackend, gated: Operation) -> Arc<Self> {
        Self::build(inner, gated, None)
    }

    pub fn failing(inner: DummyBackend, gated: Operation, message: &str) -> Arc<Self> {
        Self::build(inner, gated, Some(message.to_string()))
    }

    fn build(inner: DummyBackend, gated: Operation, fail_with: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            gated,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            fail_with,
        })
    }

    async fn gate(&self, operation: Operation) -> Result<()> {
        if operation != self.gated {
            return Ok(());
        }
        self.entered.notify_one();
        self.release.notified().await;
        match &self.fail_with {
            Some(message) => Err(Error::Backend { status: 502, message: Some(message.clone()) }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NewsBackend for GatedBackend {
    fn name(&self) -> &str {
        "Gated"
    }

    async fn search_news(&self, keyword: &str) -> Result<Vec<Article>> {
        self.gate(Operation::Search).await?;
        self.inner.search_news(keyword).await
    }

    async fn generate_post(&self, articles: &[ArticleDigest]) -> Result<String> {
        self.gate(Operation::Generate).await?;
        self.inner.generate_post(articles).await
    }

    async fn publish_post(&self, request: &PublishRequest) -> Result<bool> {
        self.gate(Operation::Publish).await?;
        self.inner.publish_post(request).await
    }

    fn auth_url(&self) -> Result<Url> {
        self.inner.auth_url()
    }
}
