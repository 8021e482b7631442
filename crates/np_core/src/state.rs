//! UI state and the update functions that are allowed to change it.
//!
//! Every operation is split in two: `begin_*` validates, raises the loading
//! flag and hands out a [`Ticket`] together with the request payload;
//! `finish_*` applies the backend's answer. Only the answer to the most
//! recently issued request of each kind is applied, older ones are dropped.

use std::fmt;

use url::Url;

use crate::messages;
use crate::types::{Article, ArticleDigest, CallbackParams, PublishRequest};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    Generate,
    Publish,
}

impl Operation {
    fn index(self) -> usize {
        match self {
            Operation::Search => 0,
            Operation::Generate => 1,
            Operation::Publish => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Generate => "generate",
            Operation::Publish => "publish",
        }
    }

    /// Shown when a request fails without a message from the backend.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Search => messages::FETCH_NEWS_FAILED,
            Operation::Generate => messages::GENERATE_POST_FAILED,
            Operation::Publish => messages::PUBLISH_FAILED,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    operation: Operation,
    id: u64,
    epoch: u64,
}

impl Ticket {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A request that passed validation and is ready to be sent.
#[derive(Debug, Clone)]
pub struct Pending<T> {
    pub ticket: Ticket,
    pub payload: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Validation failed, nothing was sent.
    Rejected,
    /// The response was applied to the state.
    Applied,
    /// A newer request superseded this one; its response was dropped.
    Stale,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadingFlags {
    pub news: bool,
    pub post: bool,
    pub publish: bool,
}

impl LoadingFlags {
    fn set(&mut self, operation: Operation, value: bool) {
        match operation {
            Operation::Search => self.news = value,
            Operation::Generate => self.post = value,
            Operation::Publish => self.publish = value,
        }
    }

    pub fn get(&self, operation: Operation) -> bool {
        match operation {
            Operation::Search => self.news,
            Operation::Generate => self.post,
            Operation::Publish => self.publish,
        }
    }

    pub fn any(&self) -> bool {
        self.news || self.post || self.publish
    }
}

#[derive(Debug, Default, Clone)]
struct Sequencer {
    next_id: u64,
    latest: [Option<u64>; 3],
}

impl Sequencer {
    fn issue(&mut self, operation: Operation) -> u64 {
        self.next_id += 1;
        self.latest[operation.index()] = Some(self.next_id);
        self.next_id
    }

    /// Returns true when `id` is the latest outstanding request of its kind.
    fn complete(&mut self, operation: Operation, id: u64) -> bool {
        let slot = &mut self.latest[operation.index()];
        if *slot == Some(id) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Authenticated,
    AuthError(String),
    Ignored,
}

impl CallbackOutcome {
    /// Whether the callback parameters should disappear from the visible URL.
    pub fn strips_query(&self) -> bool {
        !matches!(self, CallbackOutcome::Ignored)
    }
}

/// Drops the OAuth callback parameters from a location, leaving the app root.
pub fn strip_callback_query(location: &mut Url) {
    location.set_query(None);
    location.set_fragment(None);
    location.set_path("/");
}

#[derive(Clone, Default)]
pub struct AppState {
    pub keyword: String,
    pub articles: Vec<Article>,
    /// Empty means nothing has been generated yet.
    pub generated_post: String,
    /// Empty means no error.
    pub error: String,
    /// One-shot acknowledgment, consumed by whoever displays it.
    pub notice: Option<String>,
    pub loading: LoadingFlags,
    token: Option<String>,
    sequencer: Sequencer,
    // Bumped whenever a search starts; a generated post belongs to one epoch.
    article_epoch: u64,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("keyword", &self.keyword)
            .field("articles", &self.articles.len())
            .field("generated_post", &self.generated_post)
            .field("error", &self.error)
            .field("notice", &self.notice)
            .field("loading", &self.loading)
            .field("token", &self.token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    pub fn dismiss_error(&mut self) {
        self.error.clear();
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn reject(&mut self, message: &str) -> Error {
        self.error = message.to_string();
        Error::Validation(message.to_string())
    }

    fn issue(&mut self, operation: Operation) -> Ticket {
        self.loading.set(operation, true);
        self.error.clear();
        Ticket {
            operation,
            id: self.sequencer.issue(operation),
            epoch: self.article_epoch,
        }
    }

    /// Settles the loading flag for `ticket`. False when the ticket is stale.
    fn settle(&mut self, ticket: Ticket) -> bool {
        if !self.sequencer.complete(ticket.operation, ticket.id) {
            return false;
        }
        self.loading.set(ticket.operation, false);
        true
    }

    fn fail(&mut self, operation: Operation, err: &Error) {
        self.error = err
            .backend_message()
            .unwrap_or(operation.fallback_message())
            .to_string();
    }

    /// Applies the result of the OAuth redirect. A token wins over an error.
    pub fn accept_callback(&mut self, params: &CallbackParams) -> CallbackOutcome {
        if let Some(token) = params.linkedin_token.as_deref().filter(|t| !t.is_empty()) {
            self.token = Some(token.to_string());
            self.error.clear();
            return CallbackOutcome::Authenticated;
        }
        if let Some(code) = params.error.as_deref().filter(|c| !c.is_empty()) {
            let message = messages::auth_error(&decode_component(code));
            self.error = message.clone();
            return CallbackOutcome::AuthError(message);
        }
        CallbackOutcome::Ignored
    }

    /// Starts a search for the current keyword. The payload is the keyword as
    /// typed; it only has to be non-blank.
    pub fn begin_search(&mut self) -> Result<Pending<String>> {
        if self.keyword.trim().is_empty() {
            return Err(self.reject(messages::EMPTY_KEYWORD));
        }
        self.article_epoch += 1;
        self.generated_post.clear();
        let ticket = self.issue(Operation::Search);
        Ok(Pending { ticket, payload: self.keyword.clone() })
    }

    pub fn finish_search(&mut self, ticket: Ticket, outcome: Result<Vec<Article>>) -> Completion {
        if !self.settle(ticket) {
            return Completion::Stale;
        }
        match outcome {
            Ok(articles) if !articles.is_empty() => self.articles = articles,
            Ok(_) => {
                self.error = messages::NO_ARTICLES_FOUND.to_string();
                self.articles.clear();
            }
            Err(err) => {
                self.fail(Operation::Search, &err);
                self.articles.clear();
            }
        }
        Completion::Applied
    }

    pub fn begin_generate(&mut self) -> Result<Pending<Vec<ArticleDigest>>> {
        if self.articles.is_empty() {
            return Err(self.reject(messages::NO_ARTICLES_TO_SUMMARIZE));
        }
        let ticket = self.issue(Operation::Generate);
        let payload = self.articles.iter().map(Article::digest).collect();
        Ok(Pending { ticket, payload })
    }

    pub fn finish_generate(&mut self, ticket: Ticket, outcome: Result<String>) -> Completion {
        if !self.settle(ticket) {
            return Completion::Stale;
        }
        // A search started since; the articles this post summarizes are gone.
        if ticket.epoch != self.article_epoch {
            return Completion::Stale;
        }
        match outcome {
            Ok(post) => self.generated_post = post,
            Err(err) => self.fail(Operation::Generate, &err),
        }
        Completion::Applied
    }

    pub fn begin_publish(&mut self) -> Result<Pending<PublishRequest>> {
        let token = match self.token.clone() {
            Some(token) => token,
            None => return Err(self.reject(messages::NOT_CONNECTED)),
        };
        if self.generated_post.is_empty() {
            return Err(self.reject(messages::NO_POST_CONTENT));
        }
        let ticket = self.issue(Operation::Publish);
        let payload = PublishRequest { token, content: self.generated_post.clone() };
        Ok(Pending { ticket, payload })
    }

    /// The generated post is kept after a successful publish.
    pub fn finish_publish(&mut self, ticket: Ticket, outcome: Result<bool>) -> Completion {
        if !self.settle(ticket) {
            return Completion::Stale;
        }
        match outcome {
            Ok(true) => self.notice = Some(messages::POST_SHARED.to_string()),
            Ok(false) => {}
            Err(err) => self.fail(Operation::Publish, &err),
        }
        Completion::Applied
    }
}

/// Percent-decodes an OAuth error code that the query parser already decoded
/// once. `+` stays literal; input that would not decode to valid UTF-8 is kept
/// as it is.
fn decode_component(code: &str) -> String {
    let escaped = code.replace('+', "%2B").replace('&', "%26").replace('=', "%3D");
    let decoded: String = url::form_urlencoded::parse(format!("v={}", escaped).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();
    if decoded.contains('\u{FFFD}') && !code.contains('\u{FFFD}') {
        code.to_string()
    } else {
        decoded
    }
}
