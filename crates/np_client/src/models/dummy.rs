use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use np_core::config::DEFAULT_API_URL;
use np_core::{Article, ArticleDigest, Config, Error, NewsBackend, PublishRequest, Result};
use url::Url;

/// Offline backend with canned articles. Useful for demos and for driving a
/// session in tests without a network.
pub struct DummyBackend {
    config: Option<Config>,
    articles: Vec<Article>,
    fail_with: Option<String>,
    publish_accepted: bool,
    searches: AtomicUsize,
    generations: AtomicUsize,
    publications: AtomicUsize,
}

impl fmt::Debug for DummyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyBackend")
            .field("articles", &self.articles.len())
            .field("fail_with", &self.fail_with)
            .finish()
    }
}

impl DummyBackend {
    pub fn new(config: Option<Config>) -> Self {
        Self {
            config,
            articles: sample_articles(),
            fail_with: None,
            publish_accepted: true,
            searches: AtomicUsize::new(0),
            generations: AtomicUsize::new(0),
            publications: AtomicUsize::new(0),
        }
    }

    pub fn with_articles(mut self, articles: Vec<Article>) -> Self {
        self.articles = articles;
        self
    }

    /// Every call fails with a backend error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Publishing answers `success: false` instead of `true`.
    pub fn rejecting_publish(mut self) -> Self {
        self.publish_accepted = false;
        self
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn generations(&self) -> usize {
        self.generations.load(Ordering::SeqCst)
    }

    pub fn publications(&self) -> usize {
        self.publications.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.searches() + self.generations() + self.publications()
    }

    fn check(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(Error::Backend { status: 500, message: Some(message.clone()) }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NewsBackend for DummyBackend {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn search_news(&self, keyword: &str) -> Result<Vec<Article>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let needle = keyword.trim().to_lowercase();
        Ok(self.articles
            .iter()
            .filter(|a| {
                a.title.to_lowercase().contains(&needle) || a.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn generate_post(&self, articles: &[ArticleDigest]) -> Result<String> {
        let draft = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        self.check()?;
        let mut post = format!("📰 What caught my eye today (draft {}):\n", draft);
        for article in articles {
            post.push_str(&format!("\n• {}: {}", article.title, article.description));
        }
        post.push_str("\n\n#news #ai");
        Ok(post)
    }

    async fn publish_post(&self, _request: &PublishRequest) -> Result<bool> {
        self.publications.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.publish_accepted)
    }

    fn auth_url(&self) -> Result<Url> {
        match &self.config {
            Some(config) => config.auth_url(),
            None => Config::new(DEFAULT_API_URL)?.auth_url(),
        }
    }
}

fn sample_articles() -> Vec<Article> {
    vec![
        Article::new(
            "AI chips drive record quarter for foundries",
            "Demand for accelerators pushed utilization past 90% across leading fabs.",
            "Mon, 13 Oct 2025 08:00:00 GMT",
        ),
        Article::new(
            "Open-weight AI models close the gap",
            "Community releases now trail proprietary systems by a few months.",
            "Sun, 12 Oct 2025 17:45:00 GMT",
        ),
        Article::new(
            "Climate change reshapes coastal insurance",
            "Insurers are repricing flood risk after another record season.",
            "Sat, 11 Oct 2025 12:10:00 GMT",
        ),
        Article::new(
            "Technology spending rebounds in Europe",
            "Cloud and security budgets lead the recovery.",
            "Fri, 10 Oct 2025 06:30:00 GMT",
        ),
    ]
}
