use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// A news article as returned by the backend's `/news` endpoint. Only these
/// three fields are read; anything else in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(rename = "pubDate", default, deserialize_with = "nullable_string")]
    pub pub_date: String,
}

impl Article {
    pub fn new(title: impl Into<String>, description: impl Into<String>, pub_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            pub_date: pub_date.into(),
        }
    }

    /// What gets sent for post generation. The publication date stays behind.
    pub fn digest(&self) -> ArticleDigest {
        ArticleDigest {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }

    /// Feeds usually carry RFC 2822 dates, some backends hand out RFC 3339.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.pub_date.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }

    pub fn date_line(&self) -> String {
        match self.published_at() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => self.pub_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDigest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePostRequest {
    pub articles: Vec<ArticleDigest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratePostResponse {
    #[serde(default, deserialize_with = "nullable_string")]
    pub post: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub token: String,
    pub content: String,
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("token", &"<redacted>")
            .field("content", &self.content)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PublishResponse {
    #[serde(default)]
    pub success: bool,
}

/// Body of a failed backend response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Query parameters the OAuth flow appends when it redirects back to the app.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub linkedin_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CallbackParams {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            linkedin_token: Some(token.into()),
            error: None,
        }
    }

    /// Reads the parameters from a query string (with or without the leading
    /// `?`). The first occurrence of each key wins.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "linkedin_token" if params.linkedin_token.is_none() => {
                    params.linkedin_token = Some(value.into_owned())
                }
                "error" if params.error.is_none() => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    pub fn from_url(location: &Url) -> Self {
        location.query().map(Self::from_query).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.linkedin_token.is_none() && self.error.is_none()
    }
}

impl fmt::Debug for CallbackParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackParams")
            .field("linkedin_token", &self.linkedin_token.as_deref().map(|_| "<redacted>"))
            .field("error", &self.error)
            .finish()
    }
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_from_backend_payload() {
        let payload = r#"{
            "articles": [
                {"title": "Chips", "description": "Fabs are booming", "pubDate": "Tue, 14 Oct 2025 09:30:00 GMT", "link": "https://example.com/chips"},
                {"title": "Rain", "description": null}
            ]
        }"#;
        let response: NewsResponse = serde_json::from_str(payload).unwrap();
        let articles = response.articles.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].pub_date, "Tue, 14 Oct 2025 09:30:00 GMT");
        assert_eq!(articles[0].date_line(), "2025-10-14 09:30");
        assert_eq!(articles[1].description, "");
        assert_eq!(articles[1].date_line(), "");
    }

    #[test]
    fn test_missing_articles_field() {
        let response: NewsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.articles.is_none());
    }

    #[test]
    fn test_digest_drops_publication_date() {
        let article = Article::new("Title", "Description", "2025-10-14T09:30:00Z");
        let body = serde_json::to_value(GeneratePostRequest { articles: vec![article.digest()] }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"articles": [{"title": "Title", "description": "Description"}]})
        );
    }

    #[test]
    fn test_unparseable_date_is_shown_verbatim() {
        let article = Article::new("t", "d", "yesterday-ish");
        assert!(article.published_at().is_none());
        assert_eq!(article.date_line(), "yesterday-ish");
    }

    #[test]
    fn test_callback_params_from_query() {
        let params = CallbackParams::from_query("?linkedin_token=abc123&error=ignored");
        assert_eq!(params.linkedin_token.as_deref(), Some("abc123"));

        let params = CallbackParams::from_query("error=access%20denied&error=second");
        assert_eq!(params.error.as_deref(), Some("access denied"));
        assert!(params.linkedin_token.is_none());

        assert!(CallbackParams::from_query("").is_empty());
        assert!(CallbackParams::from_query("page=2").is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let params = CallbackParams::with_token("secret-token");
        assert!(!format!("{:?}", params).contains("secret-token"));

        let request = PublishRequest { token: "secret-token".to_string(), content: "hello".to_string() };
        let debug = format!("{:?}", request);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("hello"));
    }
}
