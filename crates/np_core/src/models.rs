use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::types::{Article, ArticleDigest, PublishRequest};
use crate::Result;

/// The remote service that does the actual work: news retrieval, AI post
/// generation, the LinkedIn OAuth dance and publishing.
#[async_trait]
pub trait NewsBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Search articles matching `keyword`. An empty vector means nothing matched.
    async fn search_news(&self, keyword: &str) -> Result<Vec<Article>>;

    /// Ask the backend to write a post summarizing `articles`.
    async fn generate_post(&self, articles: &[ArticleDigest]) -> Result<String>;

    /// Publish a post. Returns the backend's `success` flag.
    async fn publish_post(&self, request: &PublishRequest) -> Result<bool>;

    /// Where the browser goes to start the OAuth flow.
    fn auth_url(&self) -> Result<Url>;
}
