use std::fmt;

use async_trait::async_trait;
use np_core::types::{
    ErrorBody, GeneratePostRequest, GeneratePostResponse, NewsResponse, PublishResponse,
};
use np_core::{Article, ArticleDigest, Config, Error, NewsBackend, PublishRequest, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Talks to the NewsPost backend over HTTP.
pub struct HttpBackend {
    client: Client,
    config: Config,
}

impl HttpBackend {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()?, config })
    }
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("client", &"<reqwest::Client>")
            .field("api_url", &self.config.api_url.as_str())
            .finish()
    }
}

/// Decodes a 2xx body (`Error::Serialization` when it is not the expected
/// JSON), or turns anything else into `Error::Backend` carrying the `error`
/// field of the body when there is one.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        let body = response.text().await?;
        return Ok(serde_json::from_str::<T>(&body)?);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.error);
    tracing::debug!("Backend answered {}: {}", status, body);
    Err(Error::Backend { status: status.as_u16(), message })
}

#[async_trait]
impl NewsBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn search_news(&self, keyword: &str) -> Result<Vec<Article>> {
        let mut url = self.config.endpoint("news")?;
        url.query_pairs_mut().append_pair("keyword", keyword);

        let response = self.client.get(url).send().await?;
        let news = decode::<NewsResponse>(response).await?;
        Ok(news.articles.unwrap_or_default())
    }

    async fn generate_post(&self, articles: &[ArticleDigest]) -> Result<String> {
        let request = GeneratePostRequest { articles: articles.to_vec() };

        let response = self.client
            .post(self.config.endpoint("generate-post")?)
            .json(&request)
            .send()
            .await?;
        Ok(decode::<GeneratePostResponse>(response).await?.post)
    }

    async fn publish_post(&self, request: &PublishRequest) -> Result<bool> {
        let response = self.client
            .post(self.config.endpoint("linkedin/post")?)
            .json(request)
            .send()
            .await?;
        Ok(decode::<PublishResponse>(response).await?.success)
    }

    fn auth_url(&self) -> Result<Url> {
        self.config.auth_url()
    }
}
