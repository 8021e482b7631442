use std::sync::Arc;

use np_core::state::strip_callback_query;
use np_core::{
    AppState, ArticleDigest, CallbackOutcome, CallbackParams, Completion, Error, NewsBackend, Operation,
    Pending, PublishRequest, Result,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use url::Url;

use crate::logging::Logger;

/// One user's session: the UI state plus the backend the three operations
/// talk to. Cloning shares the same state.
///
/// The state lock is never held while a request is in flight, so other
/// operations (and renders) proceed while one is waiting on the backend.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<RwLock<AppState>>,
    backend: Arc<dyn NewsBackend>,
    logger: Logger,
}

impl Session {
    pub fn new(backend: Arc<dyn NewsBackend>) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppState::new())),
            backend,
            logger: Logger::new(),
        }
    }

    /// Creates a session and runs the page-load step for `location` once,
    /// stripping the callback parameters from it.
    pub async fn start(backend: Arc<dyn NewsBackend>, location: &mut Url) -> (Self, CallbackOutcome) {
        let session = Self::new(backend);
        let outcome = session.load_location(location).await;
        (session, outcome)
    }

    pub fn auth_url(&self) -> Result<Url> {
        self.backend.auth_url()
    }

    /// A copy of the current state for rendering.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn set_keyword(&self, keyword: &str) {
        self.state.write().await.set_keyword(keyword);
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.dismiss_error();
    }

    pub async fn take_notice(&self) -> Option<String> {
        self.state.write().await.take_notice()
    }

    /// Snapshot and pending notice taken together, so a notice is never
    /// consumed by a render that shows an older state.
    pub async fn take_view(&self) -> (AppState, Option<String>) {
        let mut state = self.state.write().await;
        let notice = state.take_notice();
        (state.clone(), notice)
    }

    /// Applies the OAuth callback result carried by a page load.
    pub async fn load_page(&self, params: &CallbackParams) -> CallbackOutcome {
        let logger = self.logger.clone().with_prefix("🔐 [auth]");
        let outcome = self.state.write().await.accept_callback(params);
        match &outcome {
            CallbackOutcome::Authenticated => logger.info("LinkedIn token received successfully"),
            CallbackOutcome::AuthError(message) => logger.warn(message),
            CallbackOutcome::Ignored => {}
        }
        outcome
    }

    /// Like [`Session::load_page`], reading the parameters from `location` and
    /// removing them from it when they were consumed.
    pub async fn load_location(&self, location: &mut Url) -> CallbackOutcome {
        let outcome = self.load_page(&CallbackParams::from_url(location)).await;
        if outcome.strips_query() {
            strip_callback_query(location);
        }
        outcome
    }

    pub async fn fetch_news(&self, keyword: &str) -> Completion {
        match self.begin_search(keyword).await {
            Some(pending) => self.run_search(pending).await,
            None => Completion::Rejected,
        }
    }

    /// Validates and raises the loading flag now, then leaves the request to
    /// a background task. `None` when the search was rejected.
    pub async fn start_fetch_news(&self, keyword: &str) -> Option<JoinHandle<Completion>> {
        let pending = self.begin_search(keyword).await?;
        let session = self.clone();
        Some(tokio::spawn(async move { session.run_search(pending).await }))
    }

    async fn begin_search(&self, keyword: &str) -> Option<Pending<String>> {
        let begun = {
            let mut state = self.state.write().await;
            state.set_keyword(keyword);
            state.begin_search()
        };
        accepted(begun, &self.tagged(Operation::Search))
    }

    async fn run_search(&self, Pending { ticket, payload }: Pending<String>) -> Completion {
        let logger = self.tagged(Operation::Search);
        logger.info(&format!("Searching news for '{}'", payload.trim()));
        let outcome = self.backend.search_news(&payload).await;
        match &outcome {
            Ok(articles) => logger.info(&format!("📰 Found {} articles", articles.len())),
            Err(e) => logger.error(&format!("Error fetching news: {}", e)),
        }
        let completion = self.state.write().await.finish_search(ticket, outcome);
        report(completion, Operation::Search, &logger);
        completion
    }

    pub async fn generate_post(&self) -> Completion {
        match self.begin_generate().await {
            Some(pending) => self.run_generate(pending).await,
            None => Completion::Rejected,
        }
    }

    pub async fn start_generate_post(&self) -> Option<JoinHandle<Completion>> {
        let pending = self.begin_generate().await?;
        let session = self.clone();
        Some(tokio::spawn(async move { session.run_generate(pending).await }))
    }

    async fn begin_generate(&self) -> Option<Pending<Vec<ArticleDigest>>> {
        let begun = self.state.write().await.begin_generate();
        accepted(begun, &self.tagged(Operation::Generate))
    }

    async fn run_generate(&self, Pending { ticket, payload }: Pending<Vec<ArticleDigest>>) -> Completion {
        let logger = self.tagged(Operation::Generate);
        logger.info(&format!("Generating post from {} articles", payload.len()));
        let outcome = self.backend.generate_post(&payload).await;
        match &outcome {
            Ok(post) => logger.info(&format!("✨ Post generated ({} chars)", post.chars().count())),
            Err(e) => logger.error(&format!("Error generating post: {}", e)),
        }
        let completion = self.state.write().await.finish_generate(ticket, outcome);
        report(completion, Operation::Generate, &logger);
        completion
    }

    pub async fn post_to_linkedin(&self) -> Completion {
        match self.begin_publish().await {
            Some(pending) => self.run_publish(pending).await,
            None => Completion::Rejected,
        }
    }

    pub async fn start_post_to_linkedin(&self) -> Option<JoinHandle<Completion>> {
        let pending = self.begin_publish().await?;
        let session = self.clone();
        Some(tokio::spawn(async move { session.run_publish(pending).await }))
    }

    async fn begin_publish(&self) -> Option<Pending<PublishRequest>> {
        let begun = self.state.write().await.begin_publish();
        accepted(begun, &self.tagged(Operation::Publish))
    }

    async fn run_publish(&self, Pending { ticket, payload }: Pending<PublishRequest>) -> Completion {
        let logger = self.tagged(Operation::Publish);
        logger.info("Posting to LinkedIn");
        let outcome = self.backend.publish_post(&payload).await;
        match &outcome {
            Ok(true) => logger.info("✅ Post shared on LinkedIn"),
            Ok(false) => logger.warn("Backend did not confirm the post"),
            Err(e) => logger.error(&format!("Error posting to LinkedIn: {}", e)),
        }
        let completion = self.state.write().await.finish_publish(ticket, outcome);
        report(completion, Operation::Publish, &logger);
        completion
    }

    fn tagged(&self, operation: Operation) -> Logger {
        let tag = match operation {
            Operation::Search => "🔍",
            Operation::Generate => "🧠",
            Operation::Publish => "🚀",
        };
        self.logger.clone().with_prefix(format!("{} [{}]", tag, operation))
    }
}

fn accepted<T>(begun: Result<Pending<T>>, logger: &Logger) -> Option<Pending<T>> {
    match begun {
        Ok(pending) => Some(pending),
        Err(Error::Validation(message)) => {
            logger.debug(&format!("Rejected: {}", message));
            None
        }
        Err(e) => {
            logger.error(&e.to_string());
            None
        }
    }
}

fn report(completion: Completion, operation: Operation, logger: &Logger) {
    if completion == Completion::Stale {
        logger.warn(&format!("Dropped a stale {} response", operation));
    }
}
